//! Result rows returned by a graph driver
//!
//! Records keep the column order of the statement's RETURN projection

use crate::graph::{PropertyMap, PropertyValue};
use indexmap::IndexMap;

/// A single result row (column name -> value)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: IndexMap<String, PropertyValue>,
}

impl Record {
    /// Create a new empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style bind, mostly for tests and fakes
    pub fn with(mut self, column: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.bind(column, value);
        self
    }

    /// Bind a column to a value
    pub fn bind(&mut self, column: impl Into<String>, value: impl Into<PropertyValue>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Get a column value
    pub fn get(&self, column: &str) -> Option<&PropertyValue> {
        self.columns.get(column)
    }

    /// Check if a column is present
    pub fn has(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Integer column; absent and null columns read as `None`
    pub fn get_integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(PropertyValue::as_integer)
    }

    /// Map column, e.g. a `properties(n)` projection
    pub fn get_map(&self, column: &str) -> Option<&PropertyMap> {
        self.get(column).and_then(PropertyValue::as_map)
    }

    /// List of strings, skipping non-string entries
    pub fn get_strings(&self, column: &str) -> Option<Vec<String>> {
        let items = self.get(column)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| item.as_string().map(str::to_string))
                .collect(),
        )
    }
}

impl FromIterator<(String, PropertyValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_get() {
        let record = Record::new().with("deleted", 2i64).with("name", "a1");

        assert_eq!(record.len(), 2);
        assert!(record.has("deleted"));
        assert_eq!(record.get_integer("deleted"), Some(2));
        assert_eq!(record.get_integer("name"), None);
        assert_eq!(record.get_integer("missing"), None);
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["deleted", "name"]);
    }

    #[test]
    fn test_get_strings() {
        let record = Record::new().with(
            "keys",
            vec![
                PropertyValue::from("a1"),
                PropertyValue::Null,
                PropertyValue::from("b1"),
            ],
        );
        assert_eq!(
            record.get_strings("keys"),
            Some(vec!["a1".to_string(), "b1".to_string()])
        );
        assert_eq!(record.get_strings("missing"), None);
    }

    #[test]
    fn test_get_map() {
        let mut props = PropertyMap::new();
        props.insert("Id".to_string(), PropertyValue::from("a1"));
        let record = Record::new().with("n", props.clone());

        assert_eq!(record.get_map("n"), Some(&props));
        assert!(Record::new().with("n", PropertyValue::Null).get_map("n").is_none());
    }
}
