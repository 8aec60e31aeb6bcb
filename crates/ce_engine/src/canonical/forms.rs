//! Canonical-form handlers, one per head that has a non-default shape.
//!
//! Each handler receives canonical, validated operands and may only fold
//! what is exact: anything that would need an approximation is left to
//! `evaluate`/`N`.

use ce_numeric::{Complex, NumericValue};

use super::Boxer;
use crate::boxed::{canonical_order, BoxedExpr};
use crate::builtin::Builtin;

/// Identity for an empty operand list, the operand itself for one, the
/// default canonical node otherwise.
fn collapse(b: &mut Boxer<'_>, head: Builtin, mut ops: Vec<BoxedExpr>, identity: i64) -> BoxedExpr {
    match ops.len() {
        0 => BoxedExpr::integer(identity),
        1 => ops.swap_remove(0),
        _ => b.finish(head, ops),
    }
}

fn exact(expr: &BoxedExpr) -> Option<&NumericValue> {
    expr.as_number().filter(|n| n.is_exact())
}

pub(crate) fn add(b: &mut Boxer<'_>, ops: Vec<BoxedExpr>) -> BoxedExpr {
    let ctx = b.engine().numeric_context();
    let mut total: Option<NumericValue> = None;
    let mut terms = Vec::with_capacity(ops.len());
    for op in ops {
        match exact(&op) {
            Some(n) => total = Some(total.map_or_else(|| n.clone(), |t| t.add(n, &ctx))),
            None => terms.push(op),
        }
    }
    if let Some(total) = total {
        if !total.is_zero() || terms.is_empty() {
            terms.push(BoxedExpr::number(total));
        }
    }
    collapse(b, Builtin::Add, terms, 0)
}

pub(crate) fn multiply(b: &mut Boxer<'_>, ops: Vec<BoxedExpr>) -> BoxedExpr {
    let ctx = b.engine().numeric_context();
    let mut coefficient = NumericValue::one();
    let mut factors = Vec::with_capacity(ops.len());
    for op in ops {
        let (negated, factor) = match op.builtin() {
            Some(Builtin::Negate) if op.nops() == 1 => (true, op.ops()[0].clone()),
            _ => (false, op),
        };
        if negated {
            coefficient = coefficient.neg();
        }
        match exact(&factor) {
            Some(n) => coefficient = coefficient.mul(n, &ctx),
            None => factors.push(factor),
        }
    }
    if factors.is_empty() {
        return BoxedExpr::number(coefficient);
    }
    let negative_one = coefficient.is_exact() && coefficient.neg().is_one();
    if negative_one {
        let product = collapse(b, Builtin::Multiply, factors, 1);
        return BoxedExpr::function(Builtin::Negate, vec![product], true);
    }
    if !coefficient.is_one() {
        factors.push(BoxedExpr::number(coefficient));
    }
    collapse(b, Builtin::Multiply, factors, 1)
}

pub(crate) fn negate(b: &mut Boxer<'_>, mut ops: Vec<BoxedExpr>) -> BoxedExpr {
    let x = ops.swap_remove(0);
    if let Some(n) = x.as_number() {
        return BoxedExpr::number(n.neg());
    }
    match x.builtin() {
        Some(Builtin::Negate) => x.ops()[0].clone(),
        Some(Builtin::Multiply) if x.op(0).is_some_and(BoxedExpr::is_number) => {
            let mut factors = x.ops().to_vec();
            factors[0] = negate(b, vec![factors[0].clone()]);
            multiply(b, factors)
        }
        _ => BoxedExpr::function(Builtin::Negate, vec![x], true),
    }
}

/// `a - b` is `a + (-b)`; a lone operand is a negation.
pub(crate) fn subtract(b: &mut Boxer<'_>, mut ops: Vec<BoxedExpr>) -> BoxedExpr {
    if ops.len() == 1 {
        return b.apply(Builtin::Negate, ops);
    }
    let rhs = ops.swap_remove(1);
    let lhs = ops.swap_remove(0);
    let negated = b.apply(Builtin::Negate, vec![rhs]);
    b.apply(Builtin::Add, vec![lhs, negated])
}

pub(crate) fn divide(b: &mut Boxer<'_>, ops: Vec<BoxedExpr>) -> BoxedExpr {
    let (numer, denom) = (&ops[0], &ops[1]);
    if denom.is_one() {
        return numer.clone();
    }
    if let (Some(p), Some(q)) = (exact(numer), exact(denom)) {
        if let Ok(value) = p.div(q, &b.engine().numeric_context()) {
            return BoxedExpr::number(value);
        }
    }
    BoxedExpr::function(Builtin::Divide, ops, true)
}

/// `Rational(p, q)` with non-literal parts is an ordinary division.
pub(crate) fn rational(b: &mut Boxer<'_>, ops: Vec<BoxedExpr>) -> BoxedExpr {
    divide(b, ops)
}

pub(crate) fn power(b: &mut Boxer<'_>, ops: Vec<BoxedExpr>) -> BoxedExpr {
    let half = NumericValue::fraction(1, 2).ok();
    if ops[1].as_number().is_some() && ops[1].as_number() == half.as_ref() {
        return b.apply(Builtin::Sqrt, vec![ops[0].clone()]);
    }
    BoxedExpr::function(Builtin::Power, ops, true)
}

pub(crate) fn square(b: &mut Boxer<'_>, mut ops: Vec<BoxedExpr>) -> BoxedExpr {
    ops.push(BoxedExpr::integer(2));
    b.apply(Builtin::Power, ops)
}

pub(crate) fn exp(b: &mut Boxer<'_>, ops: Vec<BoxedExpr>) -> BoxedExpr {
    let e = b.symbol("ExponentialE");
    b.apply(Builtin::Power, vec![e, ops[0].clone()])
}

pub(crate) fn root(b: &mut Boxer<'_>, ops: Vec<BoxedExpr>) -> BoxedExpr {
    if ops[1].is_integer_literal(2) {
        return b.apply(Builtin::Sqrt, vec![ops[0].clone()]);
    }
    BoxedExpr::function(Builtin::Root, ops, true)
}

pub(crate) fn lb(b: &mut Boxer<'_>, mut ops: Vec<BoxedExpr>) -> BoxedExpr {
    ops.push(BoxedExpr::integer(2));
    b.apply(Builtin::Log, ops)
}

pub(crate) fn lg(b: &mut Boxer<'_>, ops: Vec<BoxedExpr>) -> BoxedExpr {
    b.apply(Builtin::Log, ops)
}

/// Base 10 is implicit; base `e` is `Ln`.
pub(crate) fn log(b: &mut Boxer<'_>, mut ops: Vec<BoxedExpr>) -> BoxedExpr {
    match ops.get(1) {
        Some(base) if base.is_integer_literal(10) => {
            ops.truncate(1);
            BoxedExpr::function(Builtin::Log, ops, true)
        }
        Some(base) if base.is_symbol("ExponentialE") => {
            ops.truncate(1);
            b.apply(Builtin::Ln, ops)
        }
        _ => BoxedExpr::function(Builtin::Log, ops, true),
    }
}

/// Parentheses vanish; a parenthesized list is a tuple.
pub(crate) fn delimiter(b: &mut Boxer<'_>, mut ops: Vec<BoxedExpr>) -> BoxedExpr {
    if ops.len() == 1 {
        return ops.swap_remove(0);
    }
    b.finish(Builtin::Tuple, ops)
}

pub(crate) fn sequence(b: &mut Boxer<'_>, mut ops: Vec<BoxedExpr>) -> BoxedExpr {
    if ops.len() == 1 {
        return ops.swap_remove(0);
    }
    b.finish(Builtin::Sequence, ops)
}

/// `x_0`, `x_n` name a symbol of their own.
pub(crate) fn subscript(b: &mut Boxer<'_>, ops: Vec<BoxedExpr>) -> BoxedExpr {
    let (base, sub) = (&ops[0], &ops[1]);
    let suffix = match (sub.as_number(), sub.symbol_name()) {
        (Some(n), _) if n.is_integer() && !n.is_negative() => Some(n.to_string()),
        (_, Some(name)) if name.chars().count() == 1 => Some(name.to_string()),
        _ => None,
    };
    match (base.symbol_name(), suffix) {
        (Some(name), Some(suffix)) => b.symbol(&format!("{name}_{suffix}")),
        _ => BoxedExpr::function(Builtin::Subscript, ops, true),
    }
}

pub(crate) fn complex(_: &mut Boxer<'_>, ops: Vec<BoxedExpr>) -> BoxedExpr {
    let parts = (ops[0].as_number(), ops[1].as_number());
    match parts {
        (Some(_), Some(im)) if im.is_exact() && im.is_zero() => ops[0].clone(),
        (Some(re), Some(im)) if re.is_real() && im.is_real() => {
            BoxedExpr::number(NumericValue::complex(Complex::new(re.to_f64(), im.to_f64())))
        }
        _ => BoxedExpr::function(Builtin::Complex, ops, true),
    }
}

/// Sets are unordered and hold each element once.
pub(crate) fn set(_: &mut Boxer<'_>, mut ops: Vec<BoxedExpr>) -> BoxedExpr {
    ops.sort_by(canonical_order);
    ops.dedup();
    BoxedExpr::function(Builtin::Set, ops, true)
}
