//! Generic graph repositories
//!
//! - `NodeRepository<N>`: keyed CRUD over one node label
//! - `RelationshipRepository<R, F, T>`: CRUD and path queries over one
//!   relationship type between two node labels
//!
//! Every call runs exactly one transaction through the shared
//! [`GraphDriver`](crate::driver::GraphDriver). Argument checks happen
//! before the driver is touched.

pub mod node;
pub mod options;
pub mod relationship;

pub use node::NodeRepository;
pub use options::{NodeRepositoryOptions, RelationshipRepositoryOptions};
pub use relationship::RelationshipRepository;

use crate::cypher::CypherError;
use crate::driver::{DriverError, Record};
use crate::graph::{decode_entity, FromProperties, MappingError, PropertyValue};
use thiserror::Error;

/// Repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Blank key, blank property name or out-of-range bound
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Query construction rejected a clause sequence
    #[error("Invalid builder state: {0}")]
    InvalidBuilderState(String),

    /// Operation cannot run with the configured options
    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// A write that must echo its result returned no row
    #[error("No row returned: {0}")]
    NoRowReturned(String),

    /// Returned properties do not fit the target type
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Store or transport failure, passed through unchanged
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}

impl From<CypherError> for RepositoryError {
    fn from(error: CypherError) -> Self {
        match error {
            CypherError::InvalidArgument(msg) => RepositoryError::InvalidArgument(msg),
            CypherError::InvalidBuilderState(msg) => RepositoryError::InvalidBuilderState(msg),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Reject blank property names at construction
fn require_property_name(value: &str, what: &str) -> RepositoryResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RepositoryError::InvalidArgument(format!("{} is required", what)));
    }
    Ok(trimmed.to_string())
}

/// Reject null and blank-string keys before any query is issued
fn require_key(key: impl Into<PropertyValue>, what: &str) -> RepositoryResult<PropertyValue> {
    let key = key.into();
    if key.is_blank() {
        return Err(RepositoryError::InvalidArgument(format!("{} is required", what)));
    }
    Ok(key)
}

/// Decode the entity column of every record, preserving store order
fn decode_all<T: FromProperties>(records: &[Record], column: &str) -> RepositoryResult<Vec<T>> {
    records
        .iter()
        .map(|record| decode_column(record, column))
        .collect()
}

fn decode_column<T: FromProperties>(record: &Record, column: &str) -> RepositoryResult<T> {
    match record.get(column) {
        Some(value) => Ok(decode_entity(column, value)?),
        None => Err(MappingError::MissingProperty(column.to_string()).into()),
    }
}

/// Integer count column of the first record; no row counts as zero
fn first_count(records: &[Record], column: &str) -> u64 {
    records
        .first()
        .and_then(|record| record.get_integer(column))
        .map_or(0, |count| count.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cypher_errors_keep_their_kind() {
        let err: RepositoryError = CypherError::InvalidArgument("alias".into()).into();
        assert!(matches!(err, RepositoryError::InvalidArgument(_)));

        let err: RepositoryError = CypherError::InvalidBuilderState("hint".into()).into();
        assert!(matches!(err, RepositoryError::InvalidBuilderState(_)));
    }

    #[test]
    fn test_require_key() {
        assert!(require_key("a1", "key").is_ok());
        assert!(require_key(42i64, "key").is_ok());
        assert!(matches!(
            require_key("  ", "key"),
            Err(RepositoryError::InvalidArgument(_))
        ));
        assert!(require_key(PropertyValue::Null, "key").is_err());
    }

    #[test]
    fn test_first_count() {
        let records = vec![Record::new().with("deleted", 3i64)];
        assert_eq!(first_count(&records, "deleted"), 3);
        assert_eq!(first_count(&[], "deleted"), 0);
        assert_eq!(first_count(&records, "updated"), 0);
    }
}
