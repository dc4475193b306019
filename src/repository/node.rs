//! Keyed CRUD over one node label

use super::options::NodeRepositoryOptions;
use super::{
    decode_all, decode_column, first_count, require_key, require_property_name, RepositoryError,
    RepositoryResult,
};
use crate::cypher::{label_of, NodePattern, NodeType, Parameters, Query, QueryBuilder};
use crate::driver::{GraphDriver, Record, TransactionRequest};
use crate::graph::{FromProperties, Label, PropertyValue, ToProperties};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

const NODE: &str = "n";
const RETURN_NODE: &str = "properties(n) AS n";

/// Repository for nodes of type `N`, addressed by a single key property
pub struct NodeRepository<N> {
    driver: Arc<dyn GraphDriver>,
    options: NodeRepositoryOptions,
    label: Label,
    key_property: String,
    _node: PhantomData<fn() -> N>,
}

impl<N> NodeRepository<N>
where
    N: NodeType + ToProperties + FromProperties,
{
    /// Bind a repository to `N`'s label; fails when the key property is blank
    pub fn new(
        driver: Arc<dyn GraphDriver>,
        options: NodeRepositoryOptions,
    ) -> RepositoryResult<Self> {
        let key_property = require_property_name(&options.key_property, "key property")?;
        let label = label_of::<N>();
        debug!("Node repository bound to :{} keyed by {}", label, key_property);

        Ok(Self {
            driver,
            options,
            label,
            key_property,
            _node: PhantomData,
        })
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn options(&self) -> &NodeRepositoryOptions {
        &self.options
    }

    fn keyed_pattern(&self) -> NodePattern<N> {
        NodePattern::new(NODE)
            .with_label(self.label.as_str())
            .with_properties(format!("{}: $key", self.key_property))
    }

    async fn read(&self, query: Query, columns: &[&str]) -> RepositoryResult<Vec<Record>> {
        let request =
            TransactionRequest::read(query, columns).on_database(self.options.database.clone());
        Ok(self.driver.execute(request).await?)
    }

    async fn write(&self, query: Query, columns: &[&str]) -> RepositoryResult<Vec<Record>> {
        let request =
            TransactionRequest::write(query, columns).on_database(self.options.database.clone());
        Ok(self.driver.execute(request).await?)
    }

    /// Create a node with the value's properties and return the stored value
    pub async fn create(&self, node: &N) -> RepositoryResult<N> {
        let query = QueryBuilder::new()
            .create_fragment(&NodePattern::<N>::new(NODE).with_label(self.label.as_str()))
            .set("n = $props")
            .return_(RETURN_NODE)
            .with_param("props", node.to_properties())
            .build()?;

        let records = self.write(query, &[NODE]).await?;
        debug!("Created :{} node", self.label);

        match records.first() {
            Some(record) => decode_column(record, NODE),
            None => Err(RepositoryError::NoRowReturned(format!(
                "create :{} returned no node",
                self.label
            ))),
        }
    }

    /// Create all nodes in one transaction, in store-return order
    pub async fn create_batch(&self, nodes: &[N]) -> RepositoryResult<Vec<N>> {
        if nodes.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<PropertyValue> = nodes
            .iter()
            .map(|node| PropertyValue::Map(node.to_properties()))
            .collect();

        let text = format!(
            "UNWIND $rows AS row\nCREATE (n:{})\nSET n = row\nRETURN {}",
            self.label, RETURN_NODE
        );
        let query = Query::new(text, Parameters::from([("rows".to_string(), rows.into())]));

        let records = self.write(query, &[NODE]).await?;
        debug!("Created {} :{} node(s) in batch", records.len(), self.label);

        decode_all(&records, NODE)
    }

    /// Node with the given key, or `None` when nothing matches
    pub async fn get_by_key(&self, key: impl Into<PropertyValue>) -> RepositoryResult<Option<N>> {
        let key = require_key(key, "key")?;

        let query = QueryBuilder::new()
            .match_fragment(&self.keyed_pattern())
            .return_(RETURN_NODE)
            .limit(1)
            .with_param("key", key)
            .build()?;

        let records = self.read(query, &[NODE]).await?;
        records
            .first()
            .map(|record| decode_column(record, NODE))
            .transpose()
    }

    /// Replace every property of the keyed node with the value's properties
    ///
    /// The key property is re-asserted from `key`, so the node stays
    /// addressable even when the value carries a different key. Properties
    /// absent from the value are dropped.
    pub async fn update(
        &self,
        key: impl Into<PropertyValue>,
        node: &N,
    ) -> RepositoryResult<Option<N>> {
        let key = require_key(key, "key")?;

        let mut props = node.to_properties();
        props.insert(self.key_property.clone(), key.clone());

        let query = QueryBuilder::new()
            .match_fragment(&self.keyed_pattern())
            .set("n = $props")
            .return_(RETURN_NODE)
            .limit(1)
            .with_param("key", key)
            .with_param("props", props)
            .build()?;

        let records = self.write(query, &[NODE]).await?;
        debug!("Updated {} :{} node(s)", records.len(), self.label);

        records
            .first()
            .map(|record| decode_column(record, NODE))
            .transpose()
    }

    /// Upsert every `(key, node)` pair: merge on the key, then overwrite
    pub async fn update_batch<K>(&self, items: &[(K, N)]) -> RepositoryResult<Vec<N>>
    where
        K: Clone + Into<PropertyValue>,
    {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let rows = items
            .iter()
            .map(|(key, node)| {
                let key = require_key(key.clone(), "key")?;
                let mut props = node.to_properties();
                props.insert(self.key_property.clone(), key);
                Ok(PropertyValue::Map(props))
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        let text = format!(
            "UNWIND $rows AS row\nMERGE (n:{label} {{{key}: row.{key}}})\nSET n = row\nRETURN {ret}",
            label = self.label,
            key = self.key_property,
            ret = RETURN_NODE
        );
        let query = Query::new(text, Parameters::from([("rows".to_string(), rows.into())]));

        let records = self.write(query, &[NODE]).await?;
        debug!("Upserted {} :{} node(s) in batch", records.len(), self.label);

        decode_all(&records, NODE)
    }

    /// Delete the keyed node; `true` when a node was removed
    pub async fn delete(&self, key: impl Into<PropertyValue>) -> RepositoryResult<bool> {
        let key = require_key(key, "key")?;

        let query = QueryBuilder::new()
            .match_fragment(&self.keyed_pattern())
            .delete(NODE)
            .return_("count(n) AS deleted")
            .with_param("key", key)
            .build()?;

        let records = self.write(query, &["deleted"]).await?;
        let deleted = first_count(&records, "deleted");
        debug!("Deleted {} :{} node(s)", deleted, self.label);

        Ok(deleted > 0)
    }

    /// Delete every keyed node with its relationships; returns the count
    pub async fn delete_batch<K>(&self, keys: &[K]) -> RepositoryResult<u64>
    where
        K: Clone + Into<PropertyValue>,
    {
        if keys.is_empty() {
            return Ok(0);
        }

        let keys = keys
            .iter()
            .map(|key| require_key(key.clone(), "key"))
            .collect::<RepositoryResult<Vec<_>>>()?;

        let text = format!(
            "UNWIND $keys AS key\nMATCH (n:{} {{{}: key}})\nWITH collect(n) AS nodes\nFOREACH (n IN nodes | DETACH DELETE n)\nRETURN size(nodes) AS deleted",
            self.label, self.key_property
        );
        let query = Query::new(text, Parameters::from([("keys".to_string(), keys.into())]));

        let records = self.write(query, &["deleted"]).await?;
        let deleted = first_count(&records, "deleted");
        debug!("Deleted {} :{} node(s) in batch", deleted, self.label);

        Ok(deleted)
    }
}
