//! Error types for the ce_numeric crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    /// Exact division (or exact power) by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The result cannot be represented exactly and the context does not
    /// allow approximation.
    #[error("result is not exactly representable")]
    Inexact,

    /// The operation has no value at this argument.
    #[error("undefined: {0}")]
    Undefined(&'static str),

    /// Literal text is not a number.
    #[error("invalid numeric literal '{0}'")]
    Parse(String),

    /// Result would exceed the size limits for exact values.
    #[error("exact result too large: {0}")]
    Overflow(&'static str),
}
