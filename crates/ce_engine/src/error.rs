use ce_ast::AstError;
use thiserror::Error;

use crate::scope::ScopeId;

/// Failures of the engine itself.
///
/// Malformed mathematics never ends up here: it is embedded in the result
/// as `Error` nodes. These variants are broken invariants and input that
/// cannot be read as an expression at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("scope {0} was destroyed while still referenced")]
    ScopeDestroyed(ScopeId),

    #[error("cannot pop the global scope")]
    GlobalScopePop,

    #[error("'{0}' is a constant and cannot be assigned")]
    ConstantAssignment(String),

    #[error(transparent)]
    Ast(#[from] AstError),

    /// Internal invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

/// Helper macro for invariant assertions in the engine.
/// In debug: uses debug_assert!
/// In release: returns Err(EngineError::Internal) if the condition fails.
#[macro_export]
macro_rules! ensure_invariant {
    ($cond:expr, $msg:literal $(, $args:expr)* $(,)?) => {
        if cfg!(debug_assertions) {
            debug_assert!($cond, $msg $(, $args)*);
        }
        if !$cond {
            return Err($crate::error::EngineError::Internal(format!($msg $(, $args)*)));
        }
    };
}
