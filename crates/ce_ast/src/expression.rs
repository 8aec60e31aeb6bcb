//! Raw MathJSON expression tree.
//!
//! This is the exchange format between the LaTeX front end and the compute
//! engine: plain data, no canonical-form guarantees, cheap to build and to
//! serialize. The engine boxes it before doing any math.

use std::fmt;

use crate::error_code::ErrorCode;
use crate::span::Span;

/// Side-channel data attached by the parser in fidelity mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    /// Source range the node was parsed from.
    pub span: Option<Span>,
    /// Verbatim LaTeX source (only set on the root).
    pub latex: Option<String>,
    /// Cursor position passed to `parse`, if any.
    pub cursor: Option<usize>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.span.is_none() && self.latex.is_none() && self.cursor.is_none()
    }

    /// Fields of `self` win; gaps are filled from `other`.
    pub fn merge(self, other: Metadata) -> Metadata {
        Metadata {
            span: self.span.or(other.span),
            latex: self.latex.or(other.latex),
            cursor: self.cursor.or(other.cursor),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Numeric literal kept as text so arbitrary precision survives the
    /// exchange (`"3"`, `"-1.25"`, `"NaN"`, `"+Infinity"`).
    Number(String),
    Symbol(String),
    String(String),
    /// `[head, ...operands]`
    Function(String, Vec<Expression>),
    Annotated(Box<Expression>, Metadata),
}

impl Expression {
    pub fn num(value: impl ToString) -> Self {
        Expression::Number(value.to_string())
    }

    pub fn sym(name: impl Into<String>) -> Self {
        Expression::Symbol(name.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Expression::String(text.into())
    }

    pub fn func(head: impl Into<String>, ops: Vec<Expression>) -> Self {
        Expression::Function(head.into(), ops)
    }

    /// Build `["Error", ["ErrorCode", 'code', ...details], original?]`.
    pub fn error(code: ErrorCode, details: Vec<Expression>, original: Option<Expression>) -> Self {
        let mut code_ops = Vec::with_capacity(details.len() + 1);
        code_ops.push(Expression::String(code.as_str().to_string()));
        code_ops.extend(details);
        let mut ops = vec![Expression::Function("ErrorCode".into(), code_ops)];
        ops.extend(original);
        Expression::Function("Error".into(), ops)
    }

    /// Attach metadata, merging into an existing annotation layer.
    pub fn annotate(self, meta: Metadata) -> Self {
        if meta.is_empty() {
            return self;
        }
        match self {
            Expression::Annotated(inner, existing) => {
                Expression::Annotated(inner, meta.merge(existing))
            }
            other => Expression::Annotated(Box::new(other), meta),
        }
    }

    pub fn with_span(self, span: Span) -> Self {
        self.annotate(Metadata {
            span: Some(span),
            ..Metadata::default()
        })
    }

    /// The expression with annotation layers peeled off.
    pub fn inner(&self) -> &Expression {
        let mut expr = self;
        while let Expression::Annotated(inner, _) = expr {
            expr = inner;
        }
        expr
    }

    pub fn into_inner(self) -> Expression {
        let mut expr = self;
        while let Expression::Annotated(inner, _) = expr {
            expr = *inner;
        }
        expr
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Expression::Annotated(_, meta) => Some(meta),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        self.metadata().and_then(|m| m.span)
    }

    pub fn head(&self) -> Option<&str> {
        match self.inner() {
            Expression::Function(head, _) => Some(head),
            _ => None,
        }
    }

    /// Operands of a function node; empty for atoms.
    pub fn ops(&self) -> &[Expression] {
        match self.inner() {
            Expression::Function(_, ops) => ops,
            _ => &[],
        }
    }

    /// Split a function node into head and operands, dropping annotations.
    pub fn into_function(self) -> Result<(String, Vec<Expression>), Expression> {
        match self.into_inner() {
            Expression::Function(head, ops) => Ok((head, ops)),
            other => Err(other),
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        match self.inner() {
            Expression::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn number(&self) -> Option<&str> {
        match self.inner() {
            Expression::Number(text) => Some(text),
            _ => None,
        }
    }

    pub fn string_value(&self) -> Option<&str> {
        match self.inner() {
            Expression::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.head() == Some("Error")
    }

    /// Error code of an `Error` node.
    pub fn error_code(&self) -> Option<ErrorCode> {
        if !self.is_error() {
            return None;
        }
        let code = self.ops().first()?;
        if code.head() != Some("ErrorCode") {
            return None;
        }
        let name = code.ops().first()?;
        name.string_value()
            .or_else(|| name.symbol())
            .and_then(|n| n.parse().ok())
    }

    /// Every error node in the tree, outermost first.
    pub fn errors(&self) -> Vec<&Expression> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            if expr.is_error() {
                out.push(expr);
            }
            // Operands pushed in reverse so they are visited left to right.
            stack.extend(expr.ops().iter().rev());
        }
        out
    }

    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    /// Deep copy with every annotation removed.
    pub fn strip_metadata(&self) -> Expression {
        match self.inner() {
            Expression::Function(head, ops) => Expression::Function(
                head.clone(),
                ops.iter().map(Expression::strip_metadata).collect(),
            ),
            atom => atom.clone(),
        }
    }

    /// Number of nodes, annotations excluded.
    pub fn node_count(&self) -> usize {
        1 + self.ops().iter().map(Expression::node_count).sum::<usize>()
    }
}

impl From<i64> for Expression {
    fn from(value: i64) -> Self {
        Expression::Number(value.to_string())
    }
}

impl From<&str> for Expression {
    fn from(name: &str) -> Self {
        Expression::Symbol(name.to_string())
    }
}

/// Compact MathJSON text.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_node_shape() {
        let err = Expression::error(
            ErrorCode::UnexpectedCommand,
            vec![Expression::string("\\foo")],
            None,
        );
        assert!(err.is_error());
        assert_eq!(err.error_code(), Some(ErrorCode::UnexpectedCommand));
        assert_eq!(err.ops().len(), 1);
        assert_eq!(err.ops()[0].head(), Some("ErrorCode"));
    }

    #[test]
    fn annotations_are_transparent_to_accessors() {
        let e = Expression::func("Add", vec![1.into(), "x".into()]).with_span(Span::new(0, 3));
        assert_eq!(e.head(), Some("Add"));
        assert_eq!(e.ops().len(), 2);
        assert_eq!(e.span(), Some(Span::new(0, 3)));
        assert_eq!(e.strip_metadata(), Expression::func("Add", vec![1.into(), "x".into()]));
    }

    #[test]
    fn annotate_merges_layers() {
        let e = Expression::sym("x")
            .with_span(Span::new(0, 1))
            .annotate(Metadata {
                latex: Some("x".into()),
                ..Metadata::default()
            });
        let meta = e.metadata().cloned().unwrap_or_default();
        assert_eq!(meta.span, Some(Span::new(0, 1)));
        assert_eq!(meta.latex.as_deref(), Some("x"));
        assert!(matches!(e, Expression::Annotated(ref inner, _) if matches!(**inner, Expression::Symbol(_))));
    }

    #[test]
    fn errors_are_collected_in_order() {
        let e = Expression::func(
            "Add",
            vec![
                Expression::error(ErrorCode::Missing, vec![], None),
                Expression::func(
                    "Multiply",
                    vec![Expression::error(ErrorCode::UnexpectedToken, vec![], None)],
                ),
            ],
        );
        let codes: Vec<_> = e.errors().iter().filter_map(|x| x.error_code()).collect();
        assert_eq!(codes, vec![ErrorCode::Missing, ErrorCode::UnexpectedToken]);
    }
}
