//! Syntax diagnostics collected while parsing.

use ce_ast::{ErrorCode, Span};
use thiserror::Error;

/// One syntax problem, located in the source.
///
/// The parse result also carries an `Error` node at the same place; this is
/// the out-of-band copy for callers that want a flat list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code} at {span}{}", .detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
pub struct SyntaxError {
    pub code: ErrorCode,
    pub span: Span,
    pub detail: Option<String>,
}
