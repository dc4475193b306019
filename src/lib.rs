//! SocialSim Graph
//!
//! Typed Cypher construction and generic Neo4j repositories for the
//! SocialSim social-network simulator.
//!
//! # Architecture
//!
//! - `cypher`: fragments, naming resolution and the fluent query builder.
//!   Pure text generation, no I/O.
//! - `graph`: property values and the explicit codecs between domain types
//!   and property maps
//! - `driver`: the `GraphDriver` seam and its Bolt implementation
//! - `repository`: keyed node and relationship repositories over a driver
//! - `model`: agents, posts and the relationships between them
//!
//! ## Example Usage
//!
//! ```rust
//! use socialsim::cypher::{CypherFragment, NodePattern, QueryBuilder};
//! use socialsim::model::SocialAgent;
//!
//! let agent = NodePattern::<SocialAgent>::new("a").with_properties("Username: $name");
//! assert_eq!(agent.render().unwrap(), "(a:Agent { Username: $name })");
//!
//! let query = QueryBuilder::new()
//!     .match_fragment(&agent)
//!     .using_index_on(&agent, &["Username"])
//!     .return_("a")
//!     .with_param("$name", "alice")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     query.text(),
//!     "MATCH (a:Agent { Username: $name }) USING INDEX a:Agent(Username)\nRETURN a"
//! );
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod cypher;
pub mod driver;
pub mod graph;
pub mod model;
pub mod repository;

// Re-export main types for convenience
pub use cypher::{
    CypherError, CypherResult, Direction, HopLength, NodePattern, NodeType, Query, QueryBuilder,
    RelationshipKind, RelationshipPattern,
};

pub use driver::{DriverError, DriverResult, GraphDriver, Neo4jConfig, Neo4jDriver};

pub use graph::{
    FromProperties, MappingError, MappingResult, PropertyMap, PropertyValue, ToProperties,
};

pub use repository::{
    NodeRepository, NodeRepositoryOptions, RelationshipRepository,
    RelationshipRepositoryOptions, RepositoryError, RepositoryResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
