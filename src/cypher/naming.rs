//! Schema names for node and relationship types
//!
//! Each persisted type declares its names at compile time. An explicit
//! override wins; otherwise node labels use the type name verbatim and
//! relationship types use its UPPER_SNAKE_CASE form.

use crate::graph::{Label, RelationshipType};

/// A Rust type stored as graph nodes
pub trait NodeType {
    /// Type name used when no label override is declared
    const TYPE_NAME: &'static str;

    /// Explicit label override
    const LABEL: Option<&'static str> = None;
}

/// A Rust type stored as graph relationships
pub trait RelationshipKind {
    /// Type name used when no relationship-type override is declared
    const TYPE_NAME: &'static str;

    /// Explicit relationship-type override
    const RELATIONSHIP_TYPE: Option<&'static str> = None;
}

/// Resolve the graph label of `N`
pub fn label_of<N: NodeType + ?Sized>() -> Label {
    match N::LABEL.map(str::trim).filter(|label| !label.is_empty()) {
        Some(label) => Label::new(label),
        None => Label::new(N::TYPE_NAME),
    }
}

/// Resolve the graph relationship type of `R`
pub fn relationship_type_of<R: RelationshipKind + ?Sized>() -> RelationshipType {
    match R::RELATIONSHIP_TYPE
        .map(str::trim)
        .filter(|rel_type| !rel_type.is_empty())
    {
        Some(rel_type) => RelationshipType::new(rel_type),
        None => RelationshipType::new(to_upper_snake_case(R::TYPE_NAME)),
    }
}

/// `FollowsAgent` -> `FOLLOWS_AGENT`, `HTTPRequest` -> `HTTP_REQUEST`
///
/// An underscore goes before an uppercase character (never the first one)
/// when the previous character is lowercase or the next one is lowercase.
pub fn to_upper_snake_case(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev_is_lower = chars[i - 1].is_lowercase();
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            if prev_is_lower || next_is_lower {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Person;
    impl NodeType for Person {
        const TYPE_NAME: &'static str = "Person";
    }

    struct SocialAgent;
    impl NodeType for SocialAgent {
        const TYPE_NAME: &'static str = "SocialAgent";
        const LABEL: Option<&'static str> = Some(" Agent ");
    }

    struct FollowsAgent;
    impl RelationshipKind for FollowsAgent {
        const TYPE_NAME: &'static str = "FollowsAgent";
    }

    struct Wrote;
    impl RelationshipKind for Wrote {
        const TYPE_NAME: &'static str = "Wrote";
        const RELATIONSHIP_TYPE: Option<&'static str> = Some("AUTHORED");
    }

    #[test]
    fn test_label_fallback_is_type_name() {
        assert_eq!(label_of::<Person>().as_str(), "Person");
    }

    #[test]
    fn test_label_override_wins() {
        assert_eq!(label_of::<SocialAgent>().as_str(), "Agent");
    }

    #[test]
    fn test_relationship_type_fallback() {
        assert_eq!(relationship_type_of::<FollowsAgent>().as_str(), "FOLLOWS_AGENT");
        assert_eq!(relationship_type_of::<Wrote>().as_str(), "AUTHORED");
    }

    #[test]
    fn test_upper_snake_case() {
        assert_eq!(to_upper_snake_case("Follows"), "FOLLOWS");
        assert_eq!(to_upper_snake_case("BlockedBy"), "BLOCKED_BY");
        assert_eq!(to_upper_snake_case("HTTPRequest"), "HTTP_REQUEST");
        assert_eq!(to_upper_snake_case("AgentID"), "AGENT_ID");
        assert_eq!(to_upper_snake_case("already_snake"), "ALREADY_SNAKE");
        assert_eq!(to_upper_snake_case(""), "");
    }

    #[test]
    fn test_resolution_is_stable() {
        assert_eq!(
            relationship_type_of::<FollowsAgent>(),
            relationship_type_of::<FollowsAgent>()
        );
    }
}
