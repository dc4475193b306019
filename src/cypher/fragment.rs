//! Renderable pieces of Cypher pattern text
//!
//! Fragments never execute anything; they validate their own fields and
//! produce text that the query builder splices into clauses.

use super::error::{require_text, CypherError, CypherResult};
use std::fmt;

/// Anything that renders to a piece of Cypher pattern text
pub trait CypherFragment {
    fn render(&self) -> CypherResult<String>;
}

impl CypherFragment for &str {
    fn render(&self) -> CypherResult<String> {
        Ok((*self).to_string())
    }
}

impl CypherFragment for String {
    fn render(&self) -> CypherResult<String> {
        Ok(self.clone())
    }
}

/// Already-rendered pattern text and the pattern combinators
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CypherPattern(String);

impl CypherPattern {
    pub fn new(text: impl Into<String>) -> Self {
        CypherPattern(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Concatenate fragments in order, e.g. node + relationship + node
    pub fn join(fragments: &[&dyn CypherFragment]) -> CypherResult<Self> {
        let mut text = String::new();
        for fragment in fragments {
            text.push_str(&fragment.render()?);
        }
        Ok(CypherPattern(text))
    }

    /// `a, b, c`; at least one fragment is required
    pub fn comma_separated(fragments: &[&dyn CypherFragment]) -> CypherResult<Self> {
        if fragments.is_empty() {
            return Err(CypherError::InvalidArgument(
                "at least one pattern is required".to_string(),
            ));
        }

        let rendered = fragments
            .iter()
            .map(|fragment| fragment.render())
            .collect::<CypherResult<Vec<_>>>()?;
        Ok(CypherPattern(rendered.join(", ")))
    }

    /// `(fragment)`
    pub fn group(fragment: &dyn CypherFragment) -> CypherResult<Self> {
        Ok(CypherPattern(format!("({})", fragment.render()?)))
    }

    /// `alias = fragment`
    pub fn path(alias: &str, pattern: &dyn CypherFragment) -> CypherResult<Self> {
        let alias = require_text(alias, "path alias")?;
        Ok(CypherPattern(format!("{} = {}", alias, pattern.render()?)))
    }

    /// `shortestPath((...))`
    pub fn shortest_path(pattern: &dyn CypherFragment) -> CypherResult<Self> {
        let inner = ensure_wrapped_in_parentheses(&pattern.render()?)?;
        Ok(CypherPattern(format!("shortestPath({})", inner)))
    }

    /// `allShortestPaths((...))`
    pub fn all_shortest_paths(pattern: &dyn CypherFragment) -> CypherResult<Self> {
        let inner = ensure_wrapped_in_parentheses(&pattern.render()?)?;
        Ok(CypherPattern(format!("allShortestPaths({})", inner)))
    }
}

/// Parenthesise `text` unless its first and last characters already are
/// `(` and `)`.
fn ensure_wrapped_in_parentheses(text: &str) -> CypherResult<String> {
    let trimmed = require_text(text, "pattern text")?;
    if trimmed.len() >= 2 && trimmed.starts_with('(') && trimmed.ends_with(')') {
        return Ok(trimmed.to_string());
    }
    Ok(format!("({})", trimmed))
}

impl CypherFragment for CypherPattern {
    fn render(&self) -> CypherResult<String> {
        Ok(self.0.clone())
    }
}

impl fmt::Display for CypherPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CypherPattern {
    fn from(s: &str) -> Self {
        CypherPattern(s.to_string())
    }
}

impl From<String> for CypherPattern {
    fn from(s: String) -> Self {
        CypherPattern(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_concatenates_in_order() {
        let pattern = CypherPattern::join(&[&"(a)", &"-[:KNOWS]->", &"(b)"]).unwrap();
        assert_eq!(pattern.as_str(), "(a)-[:KNOWS]->(b)");
    }

    #[test]
    fn test_comma_separated() {
        let pattern = CypherPattern::comma_separated(&[&"(a)", &"(b)"]).unwrap();
        assert_eq!(pattern.to_string(), "(a), (b)");

        let err = CypherPattern::comma_separated(&[]).unwrap_err();
        assert!(matches!(err, CypherError::InvalidArgument(_)));
    }

    #[test]
    fn test_group_and_path() {
        let grouped = CypherPattern::group(&"a)-[:R]->(b").unwrap();
        assert_eq!(grouped.as_str(), "(a)-[:R]->(b)");

        let path = CypherPattern::path(" p ", &"(a)-->(b)").unwrap();
        assert_eq!(path.as_str(), "p = (a)-->(b)");

        assert!(CypherPattern::path("  ", &"(a)").is_err());
    }

    #[test]
    fn test_shortest_path_wraps_once() {
        let bare = CypherPattern::shortest_path(&"a-->b").unwrap();
        assert_eq!(bare.as_str(), "shortestPath((a-->b))");

        let wrapped = CypherPattern::shortest_path(&"((a)-->(b))").unwrap();
        assert_eq!(wrapped.as_str(), "shortestPath(((a)-->(b)))");

        let all = CypherPattern::all_shortest_paths(&" (a)-[*]->(b) ").unwrap();
        assert_eq!(all.as_str(), "allShortestPaths((a)-[*]->(b))");
    }

    #[test]
    fn test_shortest_path_requires_text() {
        assert!(matches!(
            CypherPattern::shortest_path(&"   "),
            Err(CypherError::InvalidArgument(_))
        ));
    }
}
