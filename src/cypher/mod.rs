//! Cypher query construction
//!
//! - Compile-time label and relationship-type resolution
//! - Node, relationship and path pattern fragments
//! - Fluent clause builder producing immutable [`Query`] values

pub mod builder;
pub mod error;
pub mod fragment;
pub mod naming;
pub mod node;
pub mod query;
pub mod relationship;

// Re-export main types
pub use builder::{QueryBuilder, QueryMode};
pub use error::{CypherError, CypherResult};
pub use fragment::{CypherFragment, CypherPattern};
pub use naming::{label_of, relationship_type_of, to_upper_snake_case, NodeType, RelationshipKind};
pub use node::{AnyNode, NodePattern};
pub use query::{Parameters, Query};
pub use relationship::{AnyRelationship, Direction, HopLength, RelationshipPattern};
