//! Graph store driver seam
//!
//! Repositories talk to the store only through [`GraphDriver`]: one call
//! runs one statement inside one transaction and materializes its rows.
//!
//! Implemented by:
//! - `Neo4jDriver`: Bolt connection pool via `neo4rs`
//! - `MockGraphDriver`: generated by mockall for unit tests

pub mod neo4j;
pub mod record;

pub use neo4j::{Neo4jConfig, Neo4jDriver};
pub use record::Record;

use crate::cypher::Query;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a driver while talking to the store
#[derive(Error, Debug)]
pub enum DriverError {
    /// Error reported by the Bolt client or the server
    #[error("Neo4j error: {0}")]
    Neo4j(#[from] neo4rs::Error),

    /// A result value could not be converted to a property value
    #[error("Decode error: {0}")]
    Decode(String),

    /// Connection settings were rejected
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type DriverResult<T> = Result<T, DriverError>;

/// Transaction access mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Read transaction, rolled back after the rows are read
    Read,
    /// Write transaction, committed after the rows are read
    Write,
}

/// One statement to run in its own transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    pub mode: AccessMode,
    /// Target database; `None` uses the driver's default
    pub database: Option<String>,
    pub query: Query,
    /// RETURN columns to read from every row
    pub columns: Vec<String>,
}

impl TransactionRequest {
    pub fn read(query: Query, columns: &[&str]) -> Self {
        Self::new(AccessMode::Read, query, columns)
    }

    pub fn write(query: Query, columns: &[&str]) -> Self {
        Self::new(AccessMode::Write, query, columns)
    }

    fn new(mode: AccessMode, query: Query, columns: &[&str]) -> Self {
        Self {
            mode,
            database: None,
            query,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn on_database(mut self, database: Option<String>) -> Self {
        self.database = database.filter(|db| !db.trim().is_empty());
        self
    }
}

/// Executes statements against a graph store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphDriver: Send + Sync {
    /// Run the request in a fresh transaction and return all rows
    async fn execute(&self, request: TransactionRequest) -> DriverResult<Vec<Record>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::Parameters;

    #[test]
    fn test_request_constructors() {
        let query = Query::new("MATCH (n) RETURN n", Parameters::new());

        let read = TransactionRequest::read(query.clone(), &["n"]);
        assert_eq!(read.mode, AccessMode::Read);
        assert_eq!(read.columns, vec!["n".to_string()]);
        assert!(read.database.is_none());

        let write = TransactionRequest::write(query, &[]).on_database(Some("social".into()));
        assert_eq!(write.mode, AccessMode::Write);
        assert_eq!(write.database.as_deref(), Some("social"));
    }

    #[test]
    fn test_blank_database_means_default() {
        let query = Query::new("RETURN 1", Parameters::new());
        let request = TransactionRequest::read(query, &[]).on_database(Some("  ".into()));
        assert!(request.database.is_none());
    }
}
