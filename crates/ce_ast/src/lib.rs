//! MathJSON expression tree shared by the LaTeX front end and the engine.

pub mod error;
pub mod error_code;
pub mod expression;
pub mod json;
pub mod span;

pub use error::AstError;
pub use error_code::{ErrorCategory, ErrorCode, UnknownErrorCode};
pub use expression::{Expression, Metadata};
pub use span::Span;
