//! Evaluation handlers for arithmetic heads.

use std::cmp::Ordering;

use ce_ast::ErrorCode;
use ce_numeric::{NumericValue, Transcendental};

use super::Evaluator;
use crate::boxed::BoxedExpr;
use crate::builtin::Builtin;
use crate::error::EngineError;

type Outcome = Result<Option<BoxedExpr>, EngineError>;

/// Fold every numeric operand of an n-ary head with `op`. Declines when
/// fewer than two operands are numbers.
fn fold_numbers(
    ev: &Evaluator<'_>,
    builtin: Builtin,
    ops: &[BoxedExpr],
    op: impl Fn(&NumericValue, &NumericValue) -> NumericValue,
) -> Option<BoxedExpr> {
    let numbers: Vec<&NumericValue> = ops.iter().filter_map(BoxedExpr::as_number).collect();
    if numbers.len() < 2 {
        return None;
    }
    let total = numbers[1..]
        .iter()
        .fold(numbers[0].clone(), |acc, n| op(&acc, n));
    let mut rest: Vec<BoxedExpr> = ops.iter().filter(|o| !o.is_number()).cloned().collect();
    rest.push(ev.number(total));
    Some(ev.apply(builtin, rest))
}

pub(crate) fn add(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    let ctx = *ev.ctx();
    Ok(fold_numbers(ev, Builtin::Add, ops, |a, b| a.add(b, &ctx)))
}

pub(crate) fn multiply(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    let ctx = *ev.ctx();
    Ok(fold_numbers(ev, Builtin::Multiply, ops, |a, b| a.mul(b, &ctx)))
}

pub(crate) fn negate(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(ops[0].as_number().map(|n| ev.number(n.neg())))
}

pub(crate) fn divide(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    let (numer, denom) = (&ops[0], &ops[1]);
    let original = || BoxedExpr::function(Builtin::Divide, ops.to_vec(), true);
    // An inexact operand divides by zero the IEEE way.
    let inexact = |e: &BoxedExpr| e.as_number().is_some_and(|n| !n.is_exact());
    if denom.is_zero() && !inexact(numer) && !inexact(denom) {
        return Ok(Some(ev.error(ErrorCode::DivisionByZero, vec![], original())));
    }
    match (numer.as_number(), denom.as_number()) {
        (Some(p), Some(q)) => Ok(ev.numeric_outcome(p.div(q, ev.ctx()), original)),
        _ => Ok(None),
    }
}

pub(crate) fn power(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    let (Some(base), Some(exponent)) = (ops[0].as_number(), ops[1].as_number()) else {
        return Ok(None);
    };
    let original = || BoxedExpr::function(Builtin::Power, ops.to_vec(), true);
    Ok(ev.numeric_outcome(base.pow(exponent, ev.ctx()), original))
}

/// Exact square roots of negative numbers factor out the imaginary unit.
pub(crate) fn sqrt(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    let Some(x) = ops[0].as_number() else {
        return Ok(None);
    };
    if x.is_exact() && x.is_negative() && !ev.is_numeric() {
        let magnitude = x.neg();
        let root = match magnitude.sqrt(ev.ctx()) {
            Ok(root) => BoxedExpr::number(root),
            Err(_) => ev.apply(Builtin::Sqrt, vec![BoxedExpr::number(magnitude)]),
        };
        let i = ev.symbol("ImaginaryUnit");
        return Ok(Some(ev.apply(Builtin::Multiply, vec![root, i])));
    }
    let original = || BoxedExpr::function(Builtin::Sqrt, ops.to_vec(), true);
    Ok(ev.numeric_outcome(x.sqrt(ev.ctx()), original))
}

pub(crate) fn root(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    let (Some(x), Some(n)) = (ops[0].as_number(), ops[1].as_number()) else {
        return Ok(None);
    };
    if n.is_zero() {
        return Ok(None);
    }
    let ctx = *ev.ctx();
    let exponent = match NumericValue::one().div(n, &ctx) {
        Ok(e) => e,
        Err(_) => return Ok(None),
    };
    let original = || BoxedExpr::function(Builtin::Root, ops.to_vec(), true);
    Ok(ev.numeric_outcome(x.pow(&exponent, &ctx), original))
}

pub(crate) fn ln(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    let Some(x) = ops[0].as_number() else {
        return Ok(None);
    };
    let original = || BoxedExpr::function(Builtin::Ln, ops.to_vec(), true);
    Ok(ev.numeric_outcome(x.apply(Transcendental::Ln, ev.ctx()), original))
}

/// `Log(x)` is base 10.
pub(crate) fn log(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    let Some(x) = ops[0].as_number() else {
        return Ok(None);
    };
    let base = match ops.get(1) {
        Some(base) => match base.as_number() {
            Some(b) => b.clone(),
            None => return Ok(None),
        },
        None => NumericValue::from_i64(10),
    };
    let original = || BoxedExpr::function(Builtin::Log, ops.to_vec(), true);
    Ok(ev.numeric_outcome(x.log(&base, ev.ctx()), original))
}

pub(crate) fn abs(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    if let Some(x) = ops[0].as_number() {
        return Ok(Some(ev.number(x.abs())));
    }
    if ops[0].is_head(Builtin::Negate) {
        return Ok(Some(ev.apply(Builtin::Abs, ops[0].ops().to_vec())));
    }
    Ok(None)
}

pub(crate) fn sign(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(ops[0].as_number().map(|x| ev.number(x.sign())))
}

fn rounding(
    ev: &Evaluator<'_>,
    builtin: Builtin,
    ops: &[BoxedExpr],
    f: fn(&NumericValue) -> Result<NumericValue, ce_numeric::NumericError>,
) -> Option<BoxedExpr> {
    let x = ops[0].as_number()?;
    let original = || BoxedExpr::function(builtin, ops.to_vec(), true);
    ev.numeric_outcome(f(x), original)
}

pub(crate) fn floor(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(rounding(ev, Builtin::Floor, ops, NumericValue::floor))
}

pub(crate) fn ceil(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(rounding(ev, Builtin::Ceil, ops, NumericValue::ceil))
}

pub(crate) fn round(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(rounding(ev, Builtin::Round, ops, NumericValue::round))
}

pub(crate) fn factorial(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    let Some(x) = ops[0].as_number() else {
        return Ok(None);
    };
    let original = || BoxedExpr::function(Builtin::Factorial, ops.to_vec(), true);
    Ok(ev.numeric_outcome(x.factorial(ev.ctx()), original))
}

/// Keep the extreme numeric operand; symbolic operands stay.
fn extremum(ev: &Evaluator<'_>, builtin: Builtin, ops: &[BoxedExpr], keep: Ordering) -> Option<BoxedExpr> {
    let mut best: Option<&NumericValue> = None;
    let mut count = 0;
    for n in ops.iter().filter_map(BoxedExpr::as_number) {
        if n.is_nan() {
            return Some(ev.number(NumericValue::Float(f64::NAN)));
        }
        count += 1;
        best = match best {
            Some(b) if n.compare(b) != Some(keep) => Some(b),
            _ => Some(n),
        };
    }
    let best = best?;
    let rest: Vec<BoxedExpr> = ops.iter().filter(|o| !o.is_number()).cloned().collect();
    if rest.is_empty() {
        return Some(ev.number(best.clone()));
    }
    if count < 2 {
        return None;
    }
    let mut kept = rest;
    kept.push(ev.number(best.clone()));
    Some(ev.apply(builtin, kept))
}

pub(crate) fn max(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(extremum(ev, Builtin::Max, ops, Ordering::Greater))
}

pub(crate) fn min(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(extremum(ev, Builtin::Min, ops, Ordering::Less))
}
