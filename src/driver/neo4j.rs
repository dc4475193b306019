//! Neo4j driver over Bolt
//!
//! Each request opens one explicit transaction: read requests are rolled
//! back once their rows are drained, write requests are committed.

use super::{AccessMode, DriverError, DriverResult, GraphDriver, Record, TransactionRequest};
use crate::cypher::Query;
use crate::graph::PropertyValue;
use async_trait::async_trait;
use neo4rs::{
    BoltBoolean, BoltFloat, BoltInteger, BoltList, BoltMap, BoltNull, BoltString, BoltType,
    ConfigBuilder, Graph,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Connection settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    /// Bolt URI
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Default database (None = server default)
    pub database: Option<String>,
    /// Connection pool size
    pub max_connections: usize,
    /// Rows pulled per round trip
    pub fetch_size: usize,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "password123".to_string(),
            database: None,
            max_connections: 16,
            fetch_size: 200,
        }
    }
}

impl Neo4jConfig {
    pub fn new(uri: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_fetch_size(mut self, fetch_size: usize) -> Self {
        self.fetch_size = fetch_size;
        self
    }

    /// Parse settings from YAML; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> DriverResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| DriverError::Config(e.to_string()))
    }

    fn validate(&self) -> DriverResult<()> {
        if self.uri.trim().is_empty() {
            return Err(DriverError::Config("uri is required".to_string()));
        }
        if self.max_connections == 0 {
            return Err(DriverError::Config(
                "max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Neo4jConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neo4jConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("fetch_size", &self.fetch_size)
            .finish()
    }
}

/// [`GraphDriver`] backed by a `neo4rs` connection pool
pub struct Neo4jDriver {
    graph: Graph,
}

impl Neo4jDriver {
    /// Connect to the server described by `config`
    pub async fn connect(config: &Neo4jConfig) -> DriverResult<Self> {
        config.validate()?;

        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size);
        if let Some(db) = config.database.as_deref() {
            builder = builder.db(db);
        }

        let graph = Graph::connect(builder.build()?).await?;
        info!("Connected to Neo4j at {}", config.uri);

        Ok(Self { graph })
    }

    /// Wrap an already connected graph handle
    pub fn from_graph(graph: Graph) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl GraphDriver for Neo4jDriver {
    async fn execute(&self, request: TransactionRequest) -> DriverResult<Vec<Record>> {
        let TransactionRequest {
            mode,
            database,
            query,
            columns,
        } = request;

        debug!("Executing {:?} transaction:\n{}", mode, query.text());

        let mut txn = match database.as_deref() {
            Some(db) => self.graph.start_txn_on(db).await?,
            None => self.graph.start_txn().await?,
        };

        let mut stream = txn.execute(to_bolt_query(query)).await?;
        let mut records = Vec::new();
        while let Some(row) = stream.next(txn.handle()).await? {
            records.push(decode_row(&row, &columns)?);
        }

        match mode {
            AccessMode::Read => txn.rollback().await?,
            AccessMode::Write => txn.commit().await?,
        }

        debug!("Transaction returned {} row(s)", records.len());
        Ok(records)
    }
}

/// Build the Bolt query carrying the statement text and every parameter
pub(crate) fn to_bolt_query(query: Query) -> neo4rs::Query {
    let (text, parameters) = query.into_parts();
    parameters
        .iter()
        .fold(neo4rs::query(&text), |q, (name, value)| {
            q.param(name, to_bolt(value))
        })
}

/// Convert a property value to its Bolt wire form
pub(crate) fn to_bolt(value: &PropertyValue) -> BoltType {
    match value {
        PropertyValue::String(s) => BoltType::String(BoltString::new(s)),
        PropertyValue::Integer(i) => BoltType::Integer(BoltInteger::new(*i)),
        PropertyValue::Float(f) => BoltType::Float(BoltFloat::new(*f)),
        PropertyValue::Boolean(b) => BoltType::Boolean(BoltBoolean::new(*b)),
        PropertyValue::Array(items) => {
            BoltType::List(BoltList::from(items.iter().map(to_bolt).collect::<Vec<_>>()))
        }
        PropertyValue::Map(map) => {
            let mut bolt = BoltMap::new();
            for (key, value) in map {
                bolt.put(BoltString::new(key), to_bolt(value));
            }
            BoltType::Map(bolt)
        }
        PropertyValue::Null => BoltType::Null(BoltNull),
    }
}

fn decode_row(row: &neo4rs::Row, columns: &[String]) -> DriverResult<Record> {
    let mut record = Record::new();
    for column in columns {
        let value: serde_json::Value = row
            .get(column)
            .map_err(|e| DriverError::Decode(format!("column '{}': {}", column, e)))?;
        record.bind(column.as_str(), PropertyValue::from_json(value));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PropertyMap;

    #[test]
    fn test_default_config() {
        let config = Neo4jConfig::default();
        assert_eq!(config.uri, "bolt://localhost:7687");
        assert_eq!(config.user, "neo4j");
        assert_eq!(config.max_connections, 16);
        assert!(config.database.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml_keeps_defaults() {
        let yaml = "uri: bolt://graph:7687\ndatabase: social\n";
        let config = Neo4jConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.uri, "bolt://graph:7687");
        assert_eq!(config.database.as_deref(), Some("social"));
        assert_eq!(config.user, "neo4j");
        assert_eq!(config.fetch_size, 200);
    }

    #[test]
    fn test_config_from_invalid_yaml() {
        let err = Neo4jConfig::from_yaml_str("max_connections: lots").unwrap_err();
        assert!(matches!(err, DriverError::Config(_)));
    }

    #[test]
    fn test_config_validation() {
        let config = Neo4jConfig::new(" ", "neo4j", "secret");
        assert!(matches!(config.validate(), Err(DriverError::Config(_))));

        let config = Neo4jConfig::default().with_max_connections(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let config = Neo4jConfig::new("bolt://x:7687", "neo4j", "hunter2").with_database("db");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("bolt://x:7687"));
    }

    #[test]
    fn test_scalar_to_bolt() {
        assert!(matches!(
            to_bolt(&PropertyValue::Integer(7)),
            BoltType::Integer(i) if i.value == 7
        ));
        assert!(matches!(
            to_bolt(&PropertyValue::from("a1")),
            BoltType::String(s) if s.value == "a1"
        ));
        assert!(matches!(to_bolt(&PropertyValue::Boolean(true)), BoltType::Boolean(_)));
        assert!(matches!(to_bolt(&PropertyValue::Float(0.5)), BoltType::Float(_)));
        assert!(matches!(to_bolt(&PropertyValue::Null), BoltType::Null(_)));
    }

    #[test]
    fn test_nested_to_bolt() {
        let mut row = PropertyMap::new();
        row.insert("Id".to_string(), PropertyValue::from("a1"));
        row.insert("Weight".to_string(), PropertyValue::Float(0.5));
        let rows = PropertyValue::Array(vec![PropertyValue::Map(row)]);

        match to_bolt(&rows) {
            BoltType::List(list) => {
                assert_eq!(list.value.len(), 1);
                assert!(matches!(list.value[0], BoltType::Map(_)));
            }
            other => panic!("expected list, got {:?}", other),
        }
    }
}
