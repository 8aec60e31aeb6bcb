use ce_numeric::rational::square_factor_split;
use ce_numeric::NumericValue;
use num_traits::{One, Signed};

use super::exact;
use crate::boxed::BoxedExpr;
use crate::builtin::Builtin;
use crate::rule::Rewrite;

define_rule!(
    PowerIdentityRule,
    "Power Identities",
    Some(&[Builtin::Power]),
    |_ev, expr| {
        let [base, exponent] = expr.ops() else {
            return None;
        };
        if exponent.is_zero() && !base.is_zero() {
            return Some(Rewrite::simple(BoxedExpr::one(), "x^0 = 1"));
        }
        if exponent.is_one() {
            return Some(Rewrite::simple(base.clone(), "x^1 = x"));
        }
        if base.is_one() {
            return Some(Rewrite::simple(BoxedExpr::one(), "1^x = 1"));
        }
        if base.is_zero() && exact(exponent).is_some_and(NumericValue::is_positive) {
            return Some(Rewrite::simple(BoxedExpr::zero(), "0^n = 0"));
        }
        None
    }
);

define_rule!(
    PowerOfPowerRule,
    "Power of a Power",
    Some(&[Builtin::Power]),
    |ev, expr| {
        // (x^a)^n -> x^(a*n), only for integer n
        let [inner, outer] = expr.ops() else {
            return None;
        };
        if !inner.is_head(Builtin::Power) || !exact(outer).is_some_and(NumericValue::is_integer) {
            return None;
        }
        let [base, exponent] = inner.ops() else {
            return None;
        };
        let product = ev.apply(Builtin::Multiply, vec![exponent.clone(), outer.clone()]);
        let new_expr = ev.apply(Builtin::Power, vec![base.clone(), product]);
        Some(Rewrite::simple(new_expr, "(x^a)^n = x^(a*n)"))
    }
);

/// `x^e` as `(x, e)`, any other factor as `(x, 1)`.
fn as_power(factor: &BoxedExpr) -> (BoxedExpr, BoxedExpr) {
    match factor.ops() {
        [base, exponent] if factor.is_head(Builtin::Power) => (base.clone(), exponent.clone()),
        _ => (factor.clone(), BoxedExpr::one()),
    }
}

define_rule!(
    ProductPowerRule,
    "Product of Powers",
    Some(&[Builtin::Multiply]),
    |ev, expr| {
        // x^a * x^b -> x^(a+b); numeric coefficients stay apart
        let mut coefficients = Vec::new();
        let mut groups: Vec<(BoxedExpr, Vec<BoxedExpr>)> = Vec::new();
        for factor in expr.ops() {
            if factor.is_number() {
                coefficients.push(factor.clone());
                continue;
            }
            let (base, exponent) = as_power(factor);
            match groups.iter_mut().find(|(b, _)| *b == base) {
                Some((_, exponents)) => exponents.push(exponent),
                None => groups.push((base, vec![exponent])),
            }
        }
        if groups.len() + coefficients.len() == expr.nops() {
            return None;
        }
        let mut factors = coefficients;
        for (base, exponents) in groups {
            let exponent = ev.apply(Builtin::Add, exponents);
            factors.push(ev.apply(Builtin::Power, vec![base, exponent]));
        }
        Some(Rewrite::simple(ev.apply(Builtin::Multiply, factors), "Combine powers with same base"))
    }
);

define_rule!(
    SqrtSimplifyRule,
    "Simplify Square Root",
    Some(&[Builtin::Sqrt]),
    |ev, expr| {
        let [radicand] = expr.ops() else {
            return None;
        };
        // sqrt(x^2) -> |x|
        if radicand.is_head(Builtin::Power) && radicand.op(1).is_some_and(|e| e.is_integer_literal(2)) {
            let new_expr = ev.apply(Builtin::Abs, vec![radicand.ops()[0].clone()]);
            return Some(Rewrite::simple(new_expr, "sqrt(x^2) = |x|"));
        }
        // sqrt(12) -> 2 sqrt(3)
        let n = exact(radicand)?.as_bigint()?;
        if !n.is_positive() {
            return None;
        }
        let (outside, inside) = square_factor_split(n);
        if outside.is_one() {
            return None;
        }
        let outside = BoxedExpr::number(NumericValue::Integer(outside));
        let new_expr = if inside.is_one() {
            outside
        } else {
            let root = ev.apply(Builtin::Sqrt, vec![BoxedExpr::number(NumericValue::Integer(inside))]);
            ev.apply(Builtin::Multiply, vec![outside, root])
        };
        Some(Rewrite::simple(new_expr, "Extract square factors"))
    }
);

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(PowerIdentityRule));
    simplifier.add_rule(Box::new(PowerOfPowerRule));
    simplifier.add_rule(Box::new(ProductPowerRule));
    simplifier.add_rule(Box::new(SqrtSimplifyRule));
}
