//! Interpreter error types.

use thiserror::Error;

/// A payload lacked something an interpreter needed to make a decision.
///
/// These are collected on the summary as warnings: whatever else the payload
/// carried is still displayed, only the dependent recommendation is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    /// A required field was absent or had the wrong type.
    #[error("{tool} result is missing '{field}'")]
    MissingField {
        tool: &'static str,
        field: &'static str,
    },
}
