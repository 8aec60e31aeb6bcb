//! Default rewrite rules of the simplifier, grouped by subject. Each
//! module exposes a `register` function.

pub mod arithmetic;
pub mod exponents;
pub mod logarithms;
pub mod logic;
pub mod trigonometry;

use ce_numeric::NumericValue;

use crate::boxed::BoxedExpr;

pub(crate) fn exact(expr: &BoxedExpr) -> Option<&NumericValue> {
    expr.as_number().filter(|n| n.is_exact())
}
