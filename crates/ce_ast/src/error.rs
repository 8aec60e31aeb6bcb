//! Error types for the ce_ast crate.

use thiserror::Error;

/// Errors raised while decoding MathJSON.
///
/// Recoverable input problems (a `null` operand, an unknown error code) decode
/// to `Error` nodes instead; these variants cover documents that have no
/// expression reading at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstError {
    #[error("empty function expression")]
    EmptyFunction,

    /// The first element of a function array must be a string head.
    #[error("invalid function head: {0}")]
    InvalidHead(String),

    #[error("invalid MathJSON object: {0}")]
    InvalidObject(String),

    /// Internal invariant violation
    #[error("internal error: {0}")]
    InternalError(String),
}

/// Helper macro for invariant assertions in ce_ast.
/// In debug: uses debug_assert!
/// In release: returns Err(AstError::InternalError) if condition fails.
#[macro_export]
macro_rules! ensure_ast_invariant {
    ($cond:expr, $msg:literal $(, $args:expr)* $(,)?) => {
        if cfg!(debug_assertions) {
            debug_assert!($cond, $msg $(, $args)*);
        }
        if !$cond {
            return Err($crate::error::AstError::InternalError(format!($msg $(, $args)*)));
        }
    };
}
