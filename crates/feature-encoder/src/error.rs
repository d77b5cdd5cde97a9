//! Encoding Error Types

use crate::input::Categorical;
use thiserror::Error;

/// A categorical literal outside the field's declared levels
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} level '{value}' (expected one of: {})", expected.join(", "))]
pub struct ParseLevelError {
    /// Field being parsed
    pub field: &'static str,
    /// Literal as received
    pub value: String,
    /// Accepted levels
    pub expected: Vec<&'static str>,
}

impl ParseLevelError {
    pub(crate) fn new<C: Categorical>(value: &str) -> Self {
        Self {
            field: C::FIELD,
            value: value.to_string(),
            expected: C::LEVELS.iter().map(|level| level.level()).collect(),
        }
    }
}

/// Errors building a training schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Schema has no columns
    #[error("training schema has no columns")]
    Empty,

    /// Column name is empty or whitespace
    #[error("training schema column {0} is blank")]
    BlankColumn(usize),

    /// Column name appears more than once
    #[error("training schema column '{0}' appears more than once")]
    DuplicateColumn(String),
}
