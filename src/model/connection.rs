//! Relationship kinds between agents and posts

use crate::cypher::RelationshipKind;
use crate::graph::{FromProperties, MappingResult, PropertyMap, PropertyReader, ToProperties};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connection strength used when none is stored
pub const DEFAULT_WEIGHT: f64 = 0.5;

macro_rules! agent_connection {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            pub created_at: DateTime<Utc>,
            /// Connection strength (0.0 to 1.0)
            pub weight: f64,
        }

        impl $name {
            pub fn new() -> Self {
                Self::with_weight(DEFAULT_WEIGHT)
            }

            pub fn with_weight(weight: f64) -> Self {
                Self {
                    created_at: Utc::now(),
                    weight,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl RelationshipKind for $name {
            const TYPE_NAME: &'static str = stringify!($name);
        }

        impl ToProperties for $name {
            fn to_properties(&self) -> PropertyMap {
                let mut props = PropertyMap::new();
                props.insert("CreatedAt".into(), self.created_at.into());
                props.insert("Weight".into(), self.weight.into());
                props
            }
        }

        impl FromProperties for $name {
            fn from_properties(properties: &PropertyMap) -> MappingResult<Self> {
                let reader = PropertyReader::new(properties);
                Ok(Self {
                    created_at: reader.required("CreatedAt")?,
                    weight: reader.or_default("Weight", DEFAULT_WEIGHT)?,
                })
            }
        }
    };
}

agent_connection!(
    /// One-way follow
    Follows
);
agent_connection!(
    /// Mutual connection
    Friends
);
agent_connection!(
    /// Blocked relationship
    Blocks
);
agent_connection!(
    /// Muted but still following
    Mutes
);

/// Agent to post authorship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authored {
    pub created_at: DateTime<Utc>,
}

impl Authored {
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
        }
    }
}

impl Default for Authored {
    fn default() -> Self {
        Self::new()
    }
}

impl RelationshipKind for Authored {
    const TYPE_NAME: &'static str = "Authored";
    const RELATIONSHIP_TYPE: Option<&'static str> = Some("AUTHORED");
}

impl ToProperties for Authored {
    fn to_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        props.insert("CreatedAt".into(), self.created_at.into());
        props
    }
}

impl FromProperties for Authored {
    fn from_properties(properties: &PropertyMap) -> MappingResult<Self> {
        let reader = PropertyReader::new(properties);
        Ok(Self {
            created_at: reader.required("CreatedAt")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::relationship_type_of;
    use crate::graph::PropertyValue;

    #[test]
    fn test_relationship_types() {
        assert_eq!(relationship_type_of::<Follows>().as_str(), "FOLLOWS");
        assert_eq!(relationship_type_of::<Friends>().as_str(), "FRIENDS");
        assert_eq!(relationship_type_of::<Blocks>().as_str(), "BLOCKS");
        assert_eq!(relationship_type_of::<Mutes>().as_str(), "MUTES");
        assert_eq!(relationship_type_of::<Authored>().as_str(), "AUTHORED");
    }

    #[test]
    fn test_default_weight() {
        assert_eq!(Follows::new().weight, DEFAULT_WEIGHT);
        assert_eq!(Mutes::with_weight(0.1).weight, 0.1);
    }

    #[test]
    fn test_missing_weight_decodes_to_default() {
        let follows = Follows::with_weight(0.8);
        let mut props = follows.to_properties();
        assert_eq!(Follows::from_properties(&props).unwrap(), follows);

        props.shift_remove("Weight");
        assert_eq!(Follows::from_properties(&props).unwrap().weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn test_integer_weight_widens() {
        let mut props = Blocks::new().to_properties();
        props.insert("Weight".into(), PropertyValue::Integer(1));
        assert_eq!(Blocks::from_properties(&props).unwrap().weight, 1.0);
    }
}
