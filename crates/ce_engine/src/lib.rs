//! Boxed expressions and the compute engine.
//!
//! An [`Engine`] parses LaTeX through `ce_latex`, boxes the resulting
//! MathJSON into canonical [`BoxedExpr`] trees and runs them through the
//! three tiers: [`Engine::simplify`], [`Engine::evaluate`] and
//! [`Engine::n`].
//!
//! ```
//! use ce_engine::Engine;
//!
//! let engine = Engine::default();
//! let expr = engine.parse("2^{10}");
//! assert_eq!(expr.to_string(), r#"["Power",2,10]"#);
//! assert_eq!(engine.evaluate(&expr).unwrap().to_string(), "1024");
//! ```

pub mod boxed;
pub mod builtin;
pub mod canonical;
pub mod definitions;
pub mod diagnostics;
pub mod domain;
pub mod engine;
pub mod error;
pub mod eval;
pub mod library;
#[macro_use]
pub mod macros;
pub mod options;
pub mod rule;
pub mod rules;
pub mod scope;
pub mod simplifier;
pub mod substitute;

pub use boxed::{BoxedExpr, ExprKind, Head, SymbolRef};
pub use builtin::Builtin;
pub use canonical::Boxer;
pub use definitions::{Definition, FunctionDef, SymbolDef, UserFunction};
pub use diagnostics::{Diagnostic, Severity};
pub use domain::Domain;
pub use engine::Engine;
pub use error::EngineError;
pub use eval::Evaluator;
pub use library::Library;
pub use options::EngineOptions;
pub use rule::{Rewrite, Rule};
pub use scope::ScopeId;
pub use simplifier::Simplifier;

pub use ce_ast::{ErrorCode, Expression};
pub use ce_numeric::{NumericMode, NumericValue};
