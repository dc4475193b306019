//! Errors raised while constructing Cypher text

use thiserror::Error;

/// Errors that can occur while rendering fragments or building a query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CypherError {
    /// A required argument was empty, blank or out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A builder call was made in a position the clause grammar forbids
    #[error("Invalid builder state: {0}")]
    InvalidBuilderState(String),
}

pub type CypherResult<T> = Result<T, CypherError>;

/// Reject empty or whitespace-only text, returning it trimmed
pub(crate) fn require_text<'a>(value: &'a str, what: &str) -> CypherResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CypherError::InvalidArgument(format!("{} is required", what)));
    }
    Ok(trimmed)
}

/// Trim every entry of a non-empty list and join with ", "
pub(crate) fn require_list(values: &[&str], what: &str) -> CypherResult<String> {
    if values.is_empty() {
        return Err(CypherError::InvalidArgument(format!(
            "at least one {} is required",
            what
        )));
    }

    let trimmed = values
        .iter()
        .map(|value| require_text(value, what))
        .collect::<CypherResult<Vec<_>>>()?;
    Ok(trimmed.join(", "))
}
