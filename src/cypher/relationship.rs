//! Relationship patterns: `-[alias:TYPE { props }*min..max]->`

use super::error::{CypherError, CypherResult};
use super::fragment::CypherFragment;
use super::naming::{relationship_type_of, RelationshipKind};
use std::fmt;
use std::marker::PhantomData;

/// Marker for relationship patterns that match any relationship type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnyRelationship;

impl RelationshipKind for AnyRelationship {
    const TYPE_NAME: &'static str = "";
}

/// Relationship direction relative to the pattern's left node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Outgoing: `-[]->`
    #[default]
    Outgoing,
    /// Incoming: `<-[]-`
    Incoming,
    /// Both: `-[]-`
    Both,
}

/// Variable length bounds: `*`, `*2..`, `*..6` or `*1..3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HopLength {
    /// Minimum hops (None = store default)
    pub min: Option<u32>,
    /// Maximum hops (None = unbounded)
    pub max: Option<u32>,
}

impl HopLength {
    /// `*`
    pub fn any() -> Self {
        Self::default()
    }

    /// `*min..max`
    pub fn between(min: u32, max: u32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// `*min..`
    pub fn at_least(min: u32) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// `*..max`
    pub fn at_most(max: u32) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn render(&self) -> CypherResult<String> {
        match (self.min, self.max) {
            (None, None) => Ok("*".to_string()),
            (Some(min), Some(max)) if min > max => Err(CypherError::InvalidArgument(format!(
                "minimum hops ({}) cannot be greater than maximum hops ({})",
                min, max
            ))),
            (min, max) => Ok(format!(
                "*{}..{}",
                min.map(|m| m.to_string()).unwrap_or_default(),
                max.map(|m| m.to_string()).unwrap_or_default()
            )),
        }
    }
}

/// Relationship pattern typed by the relationship it matches
///
/// The type comes from `R` unless overridden with
/// [`RelationshipPattern::with_type`]. All parts are optional: the bare
/// pattern renders as `-[]->`.
pub struct RelationshipPattern<R: RelationshipKind = AnyRelationship> {
    alias: Option<String>,
    rel_type: Option<String>,
    properties: Option<String>,
    direction: Direction,
    length: Option<HopLength>,
    _rel: PhantomData<fn() -> R>,
}

impl<R: RelationshipKind> RelationshipPattern<R> {
    pub fn new() -> Self {
        Self {
            alias: None,
            rel_type: None,
            properties: None,
            direction: Direction::Outgoing,
            length: None,
            _rel: PhantomData,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Override the relationship type derived from `R`
    pub fn with_type(mut self, rel_type: impl Into<String>) -> Self {
        self.rel_type = Some(rel_type.into());
        self
    }

    pub fn with_properties(mut self, properties: impl Into<String>) -> Self {
        self.properties = Some(properties.into());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_length(mut self, length: HopLength) -> Self {
        self.length = Some(length);
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Effective type: the explicit override, else the one declared by `R`
    pub fn rel_type(&self) -> String {
        match &self.rel_type {
            Some(rel_type) => rel_type.clone(),
            None => relationship_type_of::<R>().as_str().to_string(),
        }
    }
}

impl<R: RelationshipKind> Default for RelationshipPattern<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl<R: RelationshipKind> CypherFragment for RelationshipPattern<R> {
    fn render(&self) -> CypherResult<String> {
        let rel_type = self.rel_type();

        let alias_part = non_blank(self.alias.as_deref()).unwrap_or_default();
        let type_part = non_blank(Some(rel_type.as_str()))
            .map(|t| format!(":{}", t))
            .unwrap_or_default();
        let props_part = non_blank(self.properties.as_deref())
            .map(|p| format!(" {{ {} }}", p))
            .unwrap_or_default();
        let length_part = match &self.length {
            Some(length) => length.render()?,
            None => String::new(),
        };

        let bracket = format!("[{}{}{}{}]", alias_part, type_part, props_part, length_part);

        Ok(match self.direction {
            Direction::Outgoing => format!("-{}->", bracket),
            Direction::Incoming => format!("<-{}-", bracket),
            Direction::Both => format!("-{}-", bracket),
        })
    }
}

impl<R: RelationshipKind> Clone for RelationshipPattern<R> {
    fn clone(&self) -> Self {
        Self {
            alias: self.alias.clone(),
            rel_type: self.rel_type.clone(),
            properties: self.properties.clone(),
            direction: self.direction,
            length: self.length,
            _rel: PhantomData,
        }
    }
}

impl<R: RelationshipKind> fmt::Debug for RelationshipPattern<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipPattern")
            .field("alias", &self.alias)
            .field("rel_type", &self.rel_type())
            .field("properties", &self.properties)
            .field("direction", &self.direction)
            .field("length", &self.length)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FollowsAgent;
    impl RelationshipKind for FollowsAgent {
        const TYPE_NAME: &'static str = "FollowsAgent";
    }

    #[test]
    fn test_hop_length_rendering() {
        assert_eq!(HopLength::any().render().unwrap(), "*");
        assert_eq!(HopLength::at_least(2).render().unwrap(), "*2..");
        assert_eq!(HopLength::at_most(6).render().unwrap(), "*..6");
        assert_eq!(HopLength::between(1, 3).render().unwrap(), "*1..3");
        assert_eq!(HopLength::between(2, 2).render().unwrap(), "*2..2");
    }

    #[test]
    fn test_inverted_hop_bounds_fail() {
        let err = HopLength::between(5, 2).render().unwrap_err();
        assert!(matches!(err, CypherError::InvalidArgument(_)));
    }

    #[test]
    fn test_typed_relationship() {
        let rel = RelationshipPattern::<FollowsAgent>::new().with_alias("r");
        assert_eq!(rel.render().unwrap(), "-[r:FOLLOWS_AGENT]->");
    }

    #[test]
    fn test_directions() {
        let base = RelationshipPattern::<FollowsAgent>::new().with_type("KNOWS");
        assert_eq!(
            base.clone().with_direction(Direction::Incoming).render().unwrap(),
            "<-[:KNOWS]-"
        );
        assert_eq!(
            base.with_direction(Direction::Both).render().unwrap(),
            "-[:KNOWS]-"
        );
    }

    #[test]
    fn test_full_relationship() {
        let rel = RelationshipPattern::<FollowsAgent>::new()
            .with_alias("r")
            .with_properties("Weight: 0.5")
            .with_length(HopLength::at_most(6));
        assert_eq!(rel.render().unwrap(), "-[r:FOLLOWS_AGENT { Weight: 0.5 }*..6]->");
    }

    #[test]
    fn test_untyped_relationship() {
        let rel: RelationshipPattern = RelationshipPattern::new().with_length(HopLength::any());
        assert_eq!(rel.render().unwrap(), "-[*]->");
    }

    #[test]
    fn test_invalid_length_fails_render() {
        let rel: RelationshipPattern =
            RelationshipPattern::new().with_length(HopLength::between(3, 1));
        assert!(rel.render().is_err());
    }
}
