//! Finished Cypher statements

use crate::graph::PropertyValue;
use indexmap::IndexMap;
use std::fmt;

/// Named query parameters, keyed without the leading `$`
pub type Parameters = IndexMap<String, PropertyValue>;

/// Immutable Cypher statement: newline-joined clause text plus parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    text: String,
    parameters: Parameters,
}

impl Query {
    pub fn new(text: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            text: text.into(),
            parameters,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&PropertyValue> {
        self.parameters.get(name.trim_start_matches('$'))
    }

    pub fn into_parts(self) -> (String, Parameters) {
        (self.text, self.parameters)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
