//! Error types for selector parsing and requirement construction.

use thiserror::Error;

use crate::requirement::Operator;

/// Errors produced while parsing a selector string or constructing a
/// [`Requirement`](crate::Requirement).
///
/// Every variant carries enough context to point the user at the exact
/// part of the selector that was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input contained a token the grammar does not allow at that
    /// position.
    #[error("found {found:?} at position {position}, expected {expected}")]
    UnexpectedToken {
        /// Literal text of the offending token.
        found: String,
        /// Byte offset of the token within the selector string.
        position: usize,
        /// Description of what the grammar allows at this position.
        expected: String,
    },

    /// The label key does not satisfy the qualified-name rules.
    #[error("invalid label key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Which rule the key violated.
        reason: String,
    },

    /// A label value does not satisfy the value syntax rules.
    #[error("invalid label value {value:?} for key {key:?}: {reason}")]
    InvalidValue {
        /// The key the value belongs to.
        key: String,
        /// The rejected value.
        value: String,
        /// Which rule the value violated.
        reason: String,
    },

    /// The number of values does not fit the operator.
    #[error("operator '{operator}' on key {key:?} requires {expected}, got {actual}")]
    WrongValueCount {
        /// The key of the requirement under construction.
        key: String,
        /// The operator whose arity was violated.
        operator: Operator,
        /// Description of the allowed arity.
        expected: &'static str,
        /// How many values were actually supplied.
        actual: usize,
    },

    /// An ordering operator was given a value that is not an integer.
    #[error("operator '{operator}' on key {key:?} requires an integer value, got {value:?}")]
    NonIntegerValue {
        /// The key of the requirement under construction.
        key: String,
        /// The ordering operator in question.
        operator: Operator,
        /// The non-numeric value.
        value: String,
    },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
