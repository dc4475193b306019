//! Repository configuration

use serde::{Deserialize, Serialize};

/// Node repository settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRepositoryOptions {
    /// Property holding the node's unique key
    pub key_property: String,
    /// Target database (None = driver default)
    pub database: Option<String>,
}

impl Default for NodeRepositoryOptions {
    fn default() -> Self {
        Self {
            key_property: "Id".to_string(),
            database: None,
        }
    }
}

impl NodeRepositoryOptions {
    pub fn with_key_property(mut self, key_property: impl Into<String>) -> Self {
        self.key_property = key_property.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

/// Relationship repository settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipRepositoryOptions {
    /// Key property of the source node type
    pub from_key_property: String,
    /// Key property of the target node type
    pub to_key_property: String,
    /// Property updated by `set_weight`
    pub weight_property: String,
    /// Target database (None = driver default)
    pub database: Option<String>,
}

impl Default for RelationshipRepositoryOptions {
    fn default() -> Self {
        Self {
            from_key_property: "Id".to_string(),
            to_key_property: "Id".to_string(),
            weight_property: "Weight".to_string(),
            database: None,
        }
    }
}

impl RelationshipRepositoryOptions {
    pub fn with_from_key_property(mut self, property: impl Into<String>) -> Self {
        self.from_key_property = property.into();
        self
    }

    pub fn with_to_key_property(mut self, property: impl Into<String>) -> Self {
        self.to_key_property = property.into();
        self
    }

    pub fn with_weight_property(mut self, property: impl Into<String>) -> Self {
        self.weight_property = property.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let node = NodeRepositoryOptions::default();
        assert_eq!(node.key_property, "Id");
        assert!(node.database.is_none());

        let rel = RelationshipRepositoryOptions::default();
        assert_eq!(rel.from_key_property, "Id");
        assert_eq!(rel.to_key_property, "Id");
        assert_eq!(rel.weight_property, "Weight");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let rel: RelationshipRepositoryOptions =
            serde_json::from_str(r#"{"weight_property": "Strength", "database": "social"}"#)
                .unwrap();
        assert_eq!(rel.weight_property, "Strength");
        assert_eq!(rel.from_key_property, "Id");
        assert_eq!(rel.database.as_deref(), Some("social"));
    }

    #[test]
    fn test_setters() {
        let node = NodeRepositoryOptions::default()
            .with_key_property("Username")
            .with_database("social");
        assert_eq!(node.key_property, "Username");
        assert_eq!(node.database.as_deref(), Some("social"));
    }
}
