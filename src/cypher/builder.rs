//! Fluent Cypher query builder
//!
//! Clauses are appended one line per call. Calls that can fail (hints,
//! options, parameter names, fragment rendering) record the first error;
//! every later call is ignored and [`QueryBuilder::build`] returns it.
//!
//! ```rust
//! use socialsim::cypher::QueryBuilder;
//!
//! let query = QueryBuilder::new()
//!     .match_("(a:Agent)-[:FOLLOWS]->(b:Agent)")
//!     .where_("a.Id = $id")
//!     .and_where("b.FollowerCount > 10")
//!     .return_("b")
//!     .limit(5)
//!     .with_param("$id", "a1")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     query.text(),
//!     "MATCH (a:Agent)-[:FOLLOWS]->(b:Agent)\nWHERE a.Id = $id AND b.FollowerCount > 10\nRETURN b\nLIMIT 5"
//! );
//! assert!(query.parameter("id").is_some());
//! ```

use super::error::{require_list, require_text, CypherError, CypherResult};
use super::fragment::{CypherFragment, CypherPattern};
use super::node::NodePattern;
use super::naming::NodeType;
use super::query::{Parameters, Query};
use crate::graph::PropertyValue;
use std::fmt;

/// Leading execution mode line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Explain,
    Profile,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Explain => write!(f, "EXPLAIN"),
            QueryMode::Profile => write!(f, "PROFILE"),
        }
    }
}

const HINT_POSITION: &str = "a Cypher hint must follow a MATCH/OPTIONAL MATCH clause";

/// Single-use accumulator of clauses, options and parameters
#[derive(Debug, Default)]
#[must_use = "a QueryBuilder does nothing until build() is called"]
pub struct QueryBuilder {
    clauses: Vec<String>,
    parameters: Parameters,
    options: Vec<String>,
    mode: Option<QueryMode>,
    error: Option<CypherError>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, clause: String) -> Self {
        if self.error.is_none() {
            self.clauses.push(clause);
        }
        self
    }

    fn fail(mut self, error: CypherError) -> Self {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self
    }

    fn push_rendered(self, keyword: &str, rendered: CypherResult<String>) -> Self {
        match rendered {
            Ok(text) => self.push(format!("{} {}", keyword, text)),
            Err(e) => self.fail(e),
        }
    }

    // ============================================================
    // Execution mode and planner options
    // ============================================================

    /// Prefix the statement with `EXPLAIN`
    pub fn explain(mut self) -> Self {
        self.mode = Some(QueryMode::Explain);
        self
    }

    /// Prefix the statement with `PROFILE`
    pub fn profile(mut self) -> Self {
        self.mode = Some(QueryMode::Profile);
        self
    }

    /// Add a `CYPHER` directive option; `None` adds the bare key
    pub fn with_cypher_option(mut self, key: &str, value: Option<&str>) -> Self {
        if self.error.is_some() {
            return self;
        }

        let key = match require_text(key, "option key") {
            Ok(key) => key.to_string(),
            Err(e) => return self.fail(e),
        };

        match value {
            None => self.options.push(key),
            Some(value) => match require_text(value, "option value") {
                Ok(value) => self.options.push(format!("{}={}", key, value)),
                Err(e) => return self.fail(e),
            },
        }
        self
    }

    /// `CYPHER runtime=<runtime>`
    pub fn with_cypher_runtime(self, runtime: &str) -> Self {
        match require_text(runtime, "runtime") {
            Ok(runtime) => {
                let runtime = runtime.to_string();
                self.with_cypher_option("runtime", Some(&runtime))
            }
            Err(e) => self.fail(e),
        }
    }

    /// `CYPHER planner=<planner>`
    pub fn with_cypher_planner(self, planner: &str) -> Self {
        match require_text(planner, "planner") {
            Ok(planner) => {
                let planner = planner.to_string();
                self.with_cypher_option("planner", Some(&planner))
            }
            Err(e) => self.fail(e),
        }
    }

    // ============================================================
    // Reading clauses
    // ============================================================

    /// `MATCH <pattern>`
    pub fn match_(self, pattern: impl AsRef<str>) -> Self {
        let clause = format!("MATCH {}", pattern.as_ref());
        self.push(clause)
    }

    /// `MATCH <fragment>`
    pub fn match_fragment(self, pattern: &dyn CypherFragment) -> Self {
        let rendered = pattern.render();
        self.push_rendered("MATCH", rendered)
    }

    /// `MATCH a, b, ...`; at least one pattern is required
    pub fn match_all(self, patterns: &[&dyn CypherFragment]) -> Self {
        let rendered = CypherPattern::comma_separated(patterns).map(|p| p.as_str().to_string());
        self.push_rendered("MATCH", rendered)
    }

    /// `OPTIONAL MATCH <pattern>`
    pub fn optional_match(self, pattern: impl AsRef<str>) -> Self {
        let clause = format!("OPTIONAL MATCH {}", pattern.as_ref());
        self.push(clause)
    }

    /// `OPTIONAL MATCH <fragment>`
    pub fn optional_match_fragment(self, pattern: &dyn CypherFragment) -> Self {
        let rendered = pattern.render();
        self.push_rendered("OPTIONAL MATCH", rendered)
    }

    /// `OPTIONAL MATCH a, b, ...`; at least one pattern is required
    pub fn optional_match_all(self, patterns: &[&dyn CypherFragment]) -> Self {
        let rendered = CypherPattern::comma_separated(patterns).map(|p| p.as_str().to_string());
        self.push_rendered("OPTIONAL MATCH", rendered)
    }

    // ============================================================
    // Planner hints (must directly follow a MATCH clause)
    // ============================================================

    fn append_hint(mut self, hint: CypherResult<String>) -> Self {
        if self.error.is_some() {
            return self;
        }

        let hint = match hint {
            Ok(hint) => hint,
            Err(e) => return self.fail(e),
        };

        match self.clauses.last_mut() {
            Some(last) if last.starts_with("MATCH ") || last.starts_with("OPTIONAL MATCH ") => {
                last.push(' ');
                last.push_str(&hint);
                self
            }
            _ => self.fail(CypherError::InvalidBuilderState(HINT_POSITION.to_string())),
        }
    }

    /// `USING INDEX variable:Label(prop, ...)`
    pub fn using_index(self, variable: &str, label: &str, properties: &[&str]) -> Self {
        let hint = (|| -> CypherResult<String> {
            let variable = require_text(variable, "variable")?;
            let label = require_text(label, "label")?;
            let props = require_list(properties, "property")?;
            Ok(format!("USING INDEX {}:{}({})", variable, label, props))
        })();
        self.append_hint(hint)
    }

    /// `USING INDEX` for a typed node pattern's alias and label
    pub fn using_index_on<N: NodeType>(self, node: &NodePattern<N>, properties: &[&str]) -> Self {
        let label = node.label();
        self.using_index(node.alias(), &label, properties)
    }

    /// `USING SCAN variable:Label`
    pub fn using_scan(self, variable: &str, label: &str) -> Self {
        let hint = (|| -> CypherResult<String> {
            let variable = require_text(variable, "variable")?;
            let label = require_text(label, "label")?;
            Ok(format!("USING SCAN {}:{}", variable, label))
        })();
        self.append_hint(hint)
    }

    /// `USING SCAN` for a typed node pattern's alias and label
    pub fn using_scan_on<N: NodeType>(self, node: &NodePattern<N>) -> Self {
        let label = node.label();
        self.using_scan(node.alias(), &label)
    }

    /// `USING JOIN ON a, b`
    pub fn using_join_on(self, variables: &[&str]) -> Self {
        let hint = require_list(variables, "join variable").map(|vars| format!("USING JOIN ON {}", vars));
        self.append_hint(hint)
    }

    // ============================================================
    // WHERE accumulation
    // ============================================================

    fn last_is_where(&self) -> bool {
        self.clauses
            .last()
            .map_or(false, |clause| clause.starts_with("WHERE "))
    }

    /// `WHERE <predicate>`; replaces the predicate when the previous clause
    /// is already a WHERE
    pub fn where_(mut self, predicate: impl AsRef<str>) -> Self {
        let clause = format!("WHERE {}", predicate.as_ref());
        if self.error.is_none() && self.last_is_where() {
            if let Some(last) = self.clauses.last_mut() {
                *last = clause;
            }
            return self;
        }
        self.push(clause)
    }

    /// Extend the trailing WHERE with `AND <predicate>`, or start one
    pub fn and_where(self, predicate: impl AsRef<str>) -> Self {
        self.append_to_where("AND", predicate.as_ref())
    }

    /// Extend the trailing WHERE with `OR <predicate>`, or start one
    pub fn or_where(self, predicate: impl AsRef<str>) -> Self {
        self.append_to_where("OR", predicate.as_ref())
    }

    fn append_to_where(mut self, op: &str, predicate: &str) -> Self {
        if self.error.is_none() && self.last_is_where() {
            if let Some(last) = self.clauses.last_mut() {
                last.push_str(&format!(" {} {}", op, predicate));
            }
            return self;
        }
        self.push(format!("WHERE {}", predicate))
    }

    // ============================================================
    // Writing clauses
    // ============================================================

    /// `CREATE <pattern>`
    pub fn create(self, pattern: impl AsRef<str>) -> Self {
        let clause = format!("CREATE {}", pattern.as_ref());
        self.push(clause)
    }

    /// `CREATE <fragment>`
    pub fn create_fragment(self, pattern: &dyn CypherFragment) -> Self {
        let rendered = pattern.render();
        self.push_rendered("CREATE", rendered)
    }

    /// `MERGE <pattern>`
    pub fn merge(self, pattern: impl AsRef<str>) -> Self {
        let clause = format!("MERGE {}", pattern.as_ref());
        self.push(clause)
    }

    /// `MERGE <fragment>`
    pub fn merge_fragment(self, pattern: &dyn CypherFragment) -> Self {
        let rendered = pattern.render();
        self.push_rendered("MERGE", rendered)
    }

    pub fn set(self, expression: impl AsRef<str>) -> Self {
        let clause = format!("SET {}", expression.as_ref());
        self.push(clause)
    }

    pub fn delete(self, expression: impl AsRef<str>) -> Self {
        let clause = format!("DELETE {}", expression.as_ref());
        self.push(clause)
    }

    pub fn detach_delete(self, expression: impl AsRef<str>) -> Self {
        let clause = format!("DETACH DELETE {}", expression.as_ref());
        self.push(clause)
    }

    // ============================================================
    // Projection and paging
    // ============================================================

    pub fn with(self, expression: impl AsRef<str>) -> Self {
        let clause = format!("WITH {}", expression.as_ref());
        self.push(clause)
    }

    pub fn return_(self, expression: impl AsRef<str>) -> Self {
        let clause = format!("RETURN {}", expression.as_ref());
        self.push(clause)
    }

    pub fn order_by(self, expression: impl AsRef<str>) -> Self {
        let clause = format!("ORDER BY {}", expression.as_ref());
        self.push(clause)
    }

    pub fn skip(self, count: u64) -> Self {
        self.push(format!("SKIP {}", count))
    }

    pub fn limit(self, count: u64) -> Self {
        self.push(format!("LIMIT {}", count))
    }

    // ============================================================
    // Parameters
    // ============================================================

    /// Bind a parameter; `"$x"` and `"x"` name the same parameter
    pub fn with_param(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        if self.error.is_some() {
            return self;
        }

        let name = match require_text(name, "parameter name") {
            Ok(name) => name.strip_prefix('$').unwrap_or(name).to_string(),
            Err(e) => return self.fail(e),
        };
        if name.is_empty() {
            return self.fail(CypherError::InvalidArgument(
                "parameter name is required".to_string(),
            ));
        }

        self.parameters.insert(name, value.into());
        self
    }

    /// Consume the builder: mode line, `CYPHER` options line, then clauses
    pub fn build(self) -> CypherResult<Query> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut lines = Vec::with_capacity(self.clauses.len() + 2);
        if let Some(mode) = self.mode {
            lines.push(mode.to_string());
        }
        if !self.options.is_empty() {
            lines.push(format!("CYPHER {}", self.options.join(" ")));
        }
        lines.extend(self.clauses);

        Ok(Query::new(lines.join("\n"), self.parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Person;
    impl NodeType for Person {
        const TYPE_NAME: &'static str = "Person";
    }

    #[test]
    fn test_clause_order() {
        let query = QueryBuilder::new()
            .match_("(n:Person)")
            .return_("n")
            .order_by("n.Name")
            .skip(10)
            .limit(5)
            .build()
            .unwrap();

        assert_eq!(
            query.text(),
            "MATCH (n:Person)\nRETURN n\nORDER BY n.Name\nSKIP 10\nLIMIT 5"
        );
        assert!(query.parameters().is_empty());
    }

    #[test]
    fn test_where_accumulates_into_one_clause() {
        let query = QueryBuilder::new()
            .match_("(n)")
            .where_("a")
            .and_where("b")
            .or_where("c")
            .build()
            .unwrap();

        assert_eq!(query.text(), "MATCH (n)\nWHERE a AND b OR c");
        assert_eq!(query.text().matches("WHERE").count(), 1);
    }

    #[test]
    fn test_where_replaces_trailing_where() {
        let query = QueryBuilder::new().where_("a").where_("b").build().unwrap();
        assert_eq!(query.text(), "WHERE b");
    }

    #[test]
    fn test_and_where_without_where_starts_one() {
        let query = QueryBuilder::new()
            .match_("(n)")
            .and_where("n.Age > 3")
            .build()
            .unwrap();
        assert_eq!(query.text(), "MATCH (n)\nWHERE n.Age > 3");
    }

    #[test]
    fn test_hint_appends_to_match_line() {
        let query = QueryBuilder::new()
            .match_("(n:Person)")
            .using_index("n", "Person", &["Id"])
            .return_("n")
            .build()
            .unwrap();
        assert_eq!(
            query.text(),
            "MATCH (n:Person) USING INDEX n:Person(Id)\nRETURN n"
        );
    }

    #[test]
    fn test_hints_after_optional_match() {
        let node = NodePattern::<Person>::new("p");
        let query = QueryBuilder::new()
            .optional_match_fragment(&node)
            .using_scan_on(&node)
            .using_join_on(&["p", " q "])
            .build()
            .unwrap();
        assert_eq!(
            query.text(),
            "OPTIONAL MATCH (p:Person) USING SCAN p:Person USING JOIN ON p, q"
        );
    }

    #[test]
    fn test_hint_without_match_fails() {
        let err = QueryBuilder::new()
            .using_scan("n", "Person")
            .build()
            .unwrap_err();
        assert!(matches!(err, CypherError::InvalidBuilderState(_)));

        let err = QueryBuilder::new()
            .match_("(n)")
            .return_("n")
            .using_index("n", "Person", &["Id"])
            .build()
            .unwrap_err();
        assert!(matches!(err, CypherError::InvalidBuilderState(_)));
    }

    #[test]
    fn test_hint_arguments_validated() {
        let err = QueryBuilder::new()
            .match_("(n)")
            .using_index("n", "Person", &[])
            .build()
            .unwrap_err();
        assert!(matches!(err, CypherError::InvalidArgument(_)));

        let err = QueryBuilder::new()
            .match_("(n)")
            .using_join_on(&["n", " "])
            .build()
            .unwrap_err();
        assert!(matches!(err, CypherError::InvalidArgument(_)));
    }

    #[test]
    fn test_first_error_wins() {
        let err = QueryBuilder::new()
            .using_scan("n", "Person")
            .with_param("  ", 1i64)
            .build()
            .unwrap_err();
        assert!(matches!(err, CypherError::InvalidBuilderState(_)));
    }

    #[test]
    fn test_mode_and_options_lines() {
        let query = QueryBuilder::new()
            .profile()
            .with_cypher_runtime("slotted")
            .with_cypher_planner(" cost ")
            .with_cypher_option("debug", None)
            .match_("(n)")
            .return_("n")
            .build()
            .unwrap();

        assert_eq!(
            query.text(),
            "PROFILE\nCYPHER runtime=slotted planner=cost debug\nMATCH (n)\nRETURN n"
        );
    }

    #[test]
    fn test_explain_mode() {
        let query = QueryBuilder::new().explain().match_("(n)").build().unwrap();
        assert_eq!(query.text(), "EXPLAIN\nMATCH (n)");
    }

    #[test]
    fn test_empty_option_value_fails() {
        let err = QueryBuilder::new()
            .with_cypher_option("runtime", Some("  "))
            .build()
            .unwrap_err();
        assert!(matches!(err, CypherError::InvalidArgument(_)));
    }

    #[test]
    fn test_param_marker_is_stripped() {
        let query = QueryBuilder::new()
            .with_param("$key", "a1")
            .with_param("key", "b1")
            .with_param(" limit ", 5i64)
            .build()
            .unwrap();

        assert_eq!(query.parameters().len(), 2);
        assert_eq!(query.parameter("key"), Some(&PropertyValue::from("b1")));
        assert_eq!(query.parameter("$limit"), Some(&PropertyValue::Integer(5)));
    }

    #[test]
    fn test_blank_param_name_fails() {
        assert!(QueryBuilder::new().with_param("$", 1i64).build().is_err());
        assert!(QueryBuilder::new().with_param("", 1i64).build().is_err());
    }

    #[test]
    fn test_match_all_requires_patterns() {
        let err = QueryBuilder::new().match_all(&[]).build().unwrap_err();
        assert!(matches!(err, CypherError::InvalidArgument(_)));

        let query = QueryBuilder::new()
            .match_all(&[&"(a)", &NodePattern::<Person>::new("b")])
            .build()
            .unwrap();
        assert_eq!(query.text(), "MATCH (a), (b:Person)");
    }

    #[test]
    fn test_fragment_render_error_propagates() {
        let err = QueryBuilder::new()
            .create_fragment(&NodePattern::<Person>::new(""))
            .build()
            .unwrap_err();
        assert!(matches!(err, CypherError::InvalidArgument(_)));
    }

    #[test]
    fn test_writing_clauses() {
        let query = QueryBuilder::new()
            .merge_fragment(&NodePattern::<Person>::new("n").with_properties("Id: $id"))
            .set("n += $props")
            .with("n")
            .detach_delete("n")
            .build()
            .unwrap();
        assert_eq!(
            query.text(),
            "MERGE (n:Person { Id: $id })\nSET n += $props\nWITH n\nDETACH DELETE n"
        );
    }
}
