use crate::boxed::BoxedExpr;
use crate::builtin::Builtin;
use crate::eval::Evaluator;

/// Result of a rule application.
pub struct Rewrite {
    /// The rewritten expression, already canonical.
    pub new_expr: BoxedExpr,
    /// Human-readable description of the transformation
    pub description: String,
}

impl Rewrite {
    pub fn simple(new_expr: BoxedExpr, description: impl Into<String>) -> Self {
        Rewrite {
            new_expr,
            description: description.into(),
        }
    }
}

/// A local rewrite. Rules only look at the node they are given; the
/// simplifier takes care of walking the tree.
pub trait Rule {
    fn name(&self) -> &str;

    fn apply(&self, ev: &mut Evaluator<'_>, expr: &BoxedExpr) -> Option<Rewrite>;

    // Heads this rule targets. If None, the rule is tried on every node.
    fn targets(&self) -> Option<&'static [Builtin]> {
        None
    }
}
