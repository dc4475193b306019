//! Schema name types for the property graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node label (e.g., "Agent", "Post")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Label(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

/// Relationship type (e.g., "FOLLOWS", "AUTHORED")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RelationshipType(String);

impl RelationshipType {
    pub fn new(relationship_type: impl Into<String>) -> Self {
        RelationshipType(relationship_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RelationshipType {
    fn from(s: String) -> Self {
        RelationshipType(s)
    }
}

impl From<&str> for RelationshipType {
    fn from(s: &str) -> Self {
        RelationshipType(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        let label = Label::new("Agent");
        assert_eq!(label.as_str(), "Agent");
        assert_eq!(format!("{}", label), "Agent");

        let label2: Label = "Post".into();
        assert_eq!(label2.as_str(), "Post");
    }

    #[test]
    fn test_relationship_type() {
        let rel_type = RelationshipType::new("FOLLOWS");
        assert_eq!(rel_type.as_str(), "FOLLOWS");
        assert_eq!(format!("{}", rel_type), "FOLLOWS");
    }
}
