//! CRUD and path queries over one relationship type
//!
//! Endpoints are always addressed by key: `from_key` against the source
//! label's key property and `to_key` against the target label's.

use super::options::RelationshipRepositoryOptions;
use super::{
    decode_all, decode_column, first_count, require_key, require_property_name, RepositoryError,
    RepositoryResult,
};
use crate::cypher::{
    label_of, relationship_type_of, CypherPattern, HopLength, NodePattern, NodeType, Parameters,
    Query, QueryBuilder, RelationshipKind, RelationshipPattern,
};
use crate::driver::{GraphDriver, Record, TransactionRequest};
use crate::graph::{
    FromProperties, FromPropertyValue, Label, PropertyMap, PropertyValue, RelationshipType,
    ToProperties,
};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

const REL: &str = "r";
const RETURN_REL: &str = "properties(r) AS r";

/// Repository for relationships of kind `R` from `F` nodes to `T` nodes
pub struct RelationshipRepository<R, F, T> {
    driver: Arc<dyn GraphDriver>,
    options: RelationshipRepositoryOptions,
    from_label: Label,
    to_label: Label,
    rel_type: RelationshipType,
    from_key: String,
    to_key: String,
    weight: String,
    _types: PhantomData<fn() -> (R, F, T)>,
}

impl<R, F, T> RelationshipRepository<R, F, T>
where
    R: RelationshipKind + ToProperties + FromProperties,
    F: NodeType,
    T: NodeType,
{
    /// Bind a repository to `R`'s type and the endpoint labels; fails when
    /// any key or weight property name is blank
    pub fn new(
        driver: Arc<dyn GraphDriver>,
        options: RelationshipRepositoryOptions,
    ) -> RepositoryResult<Self> {
        let from_key = require_property_name(&options.from_key_property, "from key property")?;
        let to_key = require_property_name(&options.to_key_property, "to key property")?;
        let weight = require_property_name(&options.weight_property, "weight property")?;

        let from_label = label_of::<F>();
        let to_label = label_of::<T>();
        let rel_type = relationship_type_of::<R>();
        debug!(
            "Relationship repository bound to (:{})-[:{}]->(:{})",
            from_label, rel_type, to_label
        );

        Ok(Self {
            driver,
            options,
            from_label,
            to_label,
            rel_type,
            from_key,
            to_key,
            weight,
            _types: PhantomData,
        })
    }

    pub fn rel_type(&self) -> &RelationshipType {
        &self.rel_type
    }

    pub fn options(&self) -> &RelationshipRepositoryOptions {
        &self.options
    }

    fn from_node(&self, key_expr: &str) -> NodePattern<F> {
        NodePattern::new("a")
            .with_label(self.from_label.as_str())
            .with_properties(format!("{}: {}", self.from_key, key_expr))
    }

    fn to_node(&self, key_expr: &str) -> NodePattern<T> {
        NodePattern::new("b")
            .with_label(self.to_label.as_str())
            .with_properties(format!("{}: {}", self.to_key, key_expr))
    }

    fn rel_pattern(&self) -> RelationshipPattern<R> {
        RelationshipPattern::new()
            .with_alias(REL)
            .with_type(self.rel_type.as_str())
    }

    /// `(a:F {..})-[r:TYPE]->(b:T {..})` bound to `$fromKey` / `$toKey`
    fn keyed_path(&self) -> RepositoryResult<CypherPattern> {
        Ok(CypherPattern::join(&[
            &self.from_node("$fromKey"),
            &self.rel_pattern(),
            &self.to_node("$toKey"),
        ])?)
    }

    fn endpoint_keys(
        from_key: impl Into<PropertyValue>,
        to_key: impl Into<PropertyValue>,
    ) -> RepositoryResult<(PropertyValue, PropertyValue)> {
        Ok((
            require_key(from_key, "from key")?,
            require_key(to_key, "to key")?,
        ))
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

    /// Merge a relationship between the keyed endpoints and overwrite its
    /// properties; fails with `NoRowReturned` when an endpoint is missing
    pub async fn create(
        &self,
        from_key: impl Into<PropertyValue>,
        to_key: impl Into<PropertyValue>,
        rel: &R,
    ) -> RepositoryResult<R> {
        let (from_key, to_key) = Self::endpoint_keys(from_key, to_key)?;

        let merged = CypherPattern::join(&[&"(a)", &self.rel_pattern(), &"(b)"])?;
        let query = QueryBuilder::new()
            .match_all(&[&self.from_node("$fromKey"), &self.to_node("$toKey")])
            .merge_fragment(&merged)
            .set("r = $props")
            .return_(RETURN_REL)
            .limit(1)
            .with_param("fromKey", from_key)
            .with_param("toKey", to_key)
            .with_param("props", rel.to_properties())
            .build()?;

        let records = self.write(query, &[REL]).await?;
        debug!("Merged :{} relationship", self.rel_type);

        match records.first() {
            Some(record) => decode_column(record, REL),
            None => Err(RepositoryError::NoRowReturned(format!(
                "create :{} returned no relationship; is an endpoint missing?",
                self.rel_type
            ))),
        }
    }

    /// Merge every `(from_key, to_key, rel)` triple in one transaction
    pub async fn create_batch<K1, K2>(&self, items: &[(K1, K2, R)]) -> RepositoryResult<Vec<R>>
    where
        K1: Clone + Into<PropertyValue>,
        K2: Clone + Into<PropertyValue>,
    {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let rows = items
            .iter()
            .map(|(from_key, to_key, rel)| {
                let (from_key, to_key) = Self::endpoint_keys(from_key.clone(), to_key.clone())?;
                let mut row = PropertyMap::new();
                row.insert("fromKey".to_string(), from_key);
                row.insert("toKey".to_string(), to_key);
                row.insert("props".to_string(), rel.to_properties().into());
                Ok(PropertyValue::Map(row))
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        let text = format!(
            "UNWIND $rows AS row\n\
             MATCH (a:{from} {{{fk}: row.fromKey}})\n\
             MATCH (b:{to} {{{tk}: row.toKey}})\n\
             MERGE (a)-[r:{rel}]->(b)\n\
             SET r = row.props\n\
             RETURN {ret}",
            from = self.from_label,
            fk = self.from_key,
            to = self.to_label,
            tk = self.to_key,
            rel = self.rel_type,
            ret = RETURN_REL
        );
        let query = Query::new(text, Parameters::from([("rows".to_string(), rows.into())]));

        let records = self.write(query, &[REL]).await?;
        debug!("Merged {} :{} relationship(s) in batch", records.len(), self.rel_type);

        decode_all(&records, REL)
    }

    /// Merge the value's properties onto an existing relationship
    ///
    /// Unlike node updates this is additive: properties the value does not
    /// carry keep their stored values.
    pub async fn update(
        &self,
        from_key: impl Into<PropertyValue>,
        to_key: impl Into<PropertyValue>,
        rel: &R,
    ) -> RepositoryResult<Option<R>> {
        let (from_key, to_key) = Self::endpoint_keys(from_key, to_key)?;

        let query = QueryBuilder::new()
            .match_fragment(&self.keyed_path()?)
            .set("r += $props")
            .return_(RETURN_REL)
            .limit(1)
            .with_param("fromKey", from_key)
            .with_param("toKey", to_key)
            .with_param("props", rel.to_properties())
            .build()?;

        let records = self.write(query, &[REL]).await?;
        debug!("Updated {} :{} relationship(s)", records.len(), self.rel_type);

        records
            .first()
            .map(|record| decode_column(record, REL))
            .transpose()
    }

    /// Set only the weight property; `true` when a relationship matched
    pub async fn set_weight(
        &self,
        from_key: impl Into<PropertyValue>,
        to_key: impl Into<PropertyValue>,
        weight: f64,
    ) -> RepositoryResult<bool> {
        let (from_key, to_key) = Self::endpoint_keys(from_key, to_key)?;

        let query = QueryBuilder::new()
            .match_fragment(&self.keyed_path()?)
            .set(format!("r.{} = $weight", self.weight))
            .return_("count(r) AS updated")
            .with_param("fromKey", from_key)
            .with_param("toKey", to_key)
            .with_param("weight", weight)
            .build()?;

        let records = self.write(query, &["updated"]).await?;
        let updated = first_count(&records, "updated");
        debug!("Set {} on {} :{} relationship(s)", self.weight, updated, self.rel_type);

        Ok(updated > 0)
    }

    /// Delete the relationship between the keyed endpoints
    pub async fn delete(
        &self,
        from_key: impl Into<PropertyValue>,
        to_key: impl Into<PropertyValue>,
    ) -> RepositoryResult<bool> {
        let (from_key, to_key) = Self::endpoint_keys(from_key, to_key)?;

        let query = QueryBuilder::new()
            .match_fragment(&self.keyed_path()?)
            .delete(REL)
            .return_("count(r) AS deleted")
            .with_param("fromKey", from_key)
            .with_param("toKey", to_key)
            .build()?;

        let records = self.write(query, &["deleted"]).await?;
        let deleted = first_count(&records, "deleted");
        debug!("Deleted {} :{} relationship(s)", deleted, self.rel_type);

        Ok(deleted > 0)
    }

    /// Delete the relationships of every `(from_key, to_key)` pair in one
    /// transaction; returns the count removed
    pub async fn delete_batch<K1, K2>(&self, pairs: &[(K1, K2)]) -> RepositoryResult<u64>
    where
        K1: Clone + Into<PropertyValue>,
        K2: Clone + Into<PropertyValue>,
    {
        if pairs.is_empty() {
            return Ok(0);
        }

        let rows = pairs
            .iter()
            .map(|(from_key, to_key)| {
                let (from_key, to_key) = Self::endpoint_keys(from_key.clone(), to_key.clone())?;
                let mut row = PropertyMap::new();
                row.insert("fromKey".to_string(), from_key);
                row.insert("toKey".to_string(), to_key);
                Ok(PropertyValue::Map(row))
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        let text = format!(
            "UNWIND $rows AS row\n\
             MATCH (a:{from} {{{fk}: row.fromKey}})-[r:{rel}]->(b:{to} {{{tk}: row.toKey}})\n\
             WITH collect(r) AS rels\n\
             FOREACH (r IN rels | DELETE r)\n\
             RETURN size(rels) AS deleted",
            from = self.from_label,
            fk = self.from_key,
            rel = self.rel_type,
            to = self.to_label,
            tk = self.to_key
        );
        let query = Query::new(text, Parameters::from([("rows".to_string(), rows.into())]));

        let records = self.write(query, &["deleted"]).await?;
        let deleted = first_count(&records, "deleted");
        debug!("Deleted {} :{} relationship(s) in batch", deleted, self.rel_type);

        Ok(deleted)
    }

    /// `MATCH p = shortestPath((a)-[r:TYPE*..max]->(b))` with keyed endpoints
    fn shortest_path_query(
        &self,
        from_key: PropertyValue,
        to_key: PropertyValue,
        max_hops: u32,
        projection: &str,
    ) -> RepositoryResult<Query> {
        let hops = self.rel_pattern().with_length(HopLength::at_most(max_hops));
        let path = CypherPattern::join(&[
            &self.from_node("$fromKey"),
            &hops,
            &self.to_node("$toKey"),
        ])?;
        let shortest = CypherPattern::path("p", &CypherPattern::shortest_path(&path)?)?;

        Ok(QueryBuilder::new()
            .match_fragment(&shortest)
            .return_(projection)
            .limit(1)
            .with_param("fromKey", from_key)
            .with_param("toKey", to_key)
            .build()?)
    }

    fn require_hops(max_hops: u32) -> RepositoryResult<()> {
        if max_hops == 0 {
            return Err(RepositoryError::InvalidArgument(
                "max hops must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Hop count of a shortest path along this relationship type, or
    /// `None` when no path exists within `max_hops`
    pub async fn degree_of_separation(
        &self,
        from_key: impl Into<PropertyValue>,
        to_key: impl Into<PropertyValue>,
        max_hops: u32,
    ) -> RepositoryResult<Option<u64>> {
        Self::require_hops(max_hops)?;
        let (from_key, to_key) = Self::endpoint_keys(from_key, to_key)?;

        let query = self.shortest_path_query(from_key, to_key, max_hops, "length(p) AS hops")?;
        let records = self.read(query, &["hops"]).await?;

        let hops = records
            .first()
            .and_then(|record| record.get_integer("hops"))
            .map(|hops| hops.max(0) as u64);
        debug!("Degree of separation over :{}: {:?}", self.rel_type, hops);

        Ok(hops)
    }

    /// Endpoint keys along a shortest path, source and target included
    ///
    /// Needs the same key property on both endpoint types, since one
    /// projection reads the key from every node on the path.
    pub async fn shortest_path<K: FromPropertyValue>(
        &self,
        from_key: impl Into<PropertyValue>,
        to_key: impl Into<PropertyValue>,
        max_hops: u32,
    ) -> RepositoryResult<Option<Vec<K>>> {
        if self.from_key != self.to_key {
            return Err(RepositoryError::UnsupportedConfiguration(format!(
                "shortest path keys need one key property, got {} and {}",
                self.from_key, self.to_key
            )));
        }
        Self::require_hops(max_hops)?;
        let (from_key, to_key) = Self::endpoint_keys(from_key, to_key)?;

        let projection = format!("[n IN nodes(p) | n.{}] AS keys", self.from_key);
        let query = self.shortest_path_query(from_key, to_key, max_hops, &projection)?;
        let records = self.read(query, &["keys"]).await?;

        let keys = match records.first().and_then(|record| record.get("keys")) {
            Some(value) => Some(Vec::<K>::from_property_value("keys", value)?),
            None => None,
        };
        debug!(
            "Shortest path over :{} has {} node(s)",
            self.rel_type,
            keys.as_ref().map_or(0, Vec::len)
        );

        Ok(keys)
    }
}
