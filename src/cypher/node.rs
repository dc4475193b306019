//! Node patterns: `(alias:Label { props })`

use super::error::{require_text, CypherResult};
use super::fragment::CypherFragment;
use super::naming::{label_of, NodeType};
use std::fmt;
use std::marker::PhantomData;

/// Marker for node patterns that carry no label unless one is set explicitly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnyNode;

impl NodeType for AnyNode {
    const TYPE_NAME: &'static str = "";
}

/// Node pattern typed by the node it matches
///
/// The label comes from `N` unless overridden with [`NodePattern::with_label`].
pub struct NodePattern<N: NodeType = AnyNode> {
    alias: String,
    label: Option<String>,
    properties: Option<String>,
    _node: PhantomData<fn() -> N>,
}

impl<N: NodeType> NodePattern<N> {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            label: None,
            properties: None,
            _node: PhantomData,
        }
    }

    /// Override the label derived from `N`
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Inline property constraints, e.g. `Id: $key`
    pub fn with_properties(mut self, properties: impl Into<String>) -> Self {
        self.properties = Some(properties.into());
        self
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Effective label: the explicit override, else the one declared by `N`
    pub fn label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => label_of::<N>().as_str().to_string(),
        }
    }
}

impl<N: NodeType> CypherFragment for NodePattern<N> {
    fn render(&self) -> CypherResult<String> {
        let alias = require_text(&self.alias, "node alias")?;

        let label = self.label();
        let label_part = if label.trim().is_empty() {
            String::new()
        } else {
            format!(":{}", label.trim())
        };

        let props_part = match self.properties.as_deref().map(str::trim) {
            Some(props) if !props.is_empty() => format!(" {{ {} }}", props),
            _ => String::new(),
        };

        Ok(format!("({}{}{})", alias, label_part, props_part))
    }
}

impl<N: NodeType> Clone for NodePattern<N> {
    fn clone(&self) -> Self {
        Self {
            alias: self.alias.clone(),
            label: self.label.clone(),
            properties: self.properties.clone(),
            _node: PhantomData,
        }
    }
}

impl<N: NodeType> fmt::Debug for NodePattern<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodePattern")
            .field("alias", &self.alias)
            .field("label", &self.label())
            .field("properties", &self.properties)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::CypherError;

    struct Person;
    impl NodeType for Person {
        const TYPE_NAME: &'static str = "Person";
    }

    #[test]
    fn test_render_with_type_label() {
        let node = NodePattern::<Person>::new("p");
        assert_eq!(node.render().unwrap(), "(p:Person)");
    }

    #[test]
    fn test_render_with_properties() {
        let node = NodePattern::<Person>::new(" p ").with_properties("Id: $key");
        assert_eq!(node.render().unwrap(), "(p:Person { Id: $key })");
    }

    #[test]
    fn test_label_override() {
        let node = NodePattern::<Person>::new("p").with_label("Agent");
        assert_eq!(node.label(), "Agent");
        assert_eq!(node.render().unwrap(), "(p:Agent)");
    }

    #[test]
    fn test_untyped_node_omits_label() {
        let node: NodePattern = NodePattern::new("n");
        assert_eq!(node.render().unwrap(), "(n)");
    }

    #[test]
    fn test_blank_alias_fails() {
        let err = NodePattern::<Person>::new("  ").render().unwrap_err();
        assert!(matches!(err, CypherError::InvalidArgument(_)));
    }

    #[test]
    fn test_blank_properties_are_omitted() {
        let node = NodePattern::<Person>::new("p").with_properties("   ");
        assert_eq!(node.render().unwrap(), "(p:Person)");
    }
}
