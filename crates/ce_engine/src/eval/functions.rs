//! Evaluation handlers for trigonometric and hyperbolic heads.
//!
//! In the exact tier these only produce values the numeric tower knows
//! exactly (`sin 0 = 0`); the special angles are rewrite rules of the
//! simplifier.

use ce_numeric::{NumericContext, NumericError, NumericValue, Transcendental};

use super::Evaluator;
use crate::boxed::BoxedExpr;
use crate::builtin::Builtin;
use crate::error::EngineError;

type Outcome = Result<Option<BoxedExpr>, EngineError>;
type Kernel = fn(&NumericValue, &NumericContext) -> Result<NumericValue, NumericError>;

fn numeric(ev: &Evaluator<'_>, builtin: Builtin, ops: &[BoxedExpr], kernel: Kernel) -> Outcome {
    let Some(x) = ops[0].as_number() else {
        return Ok(None);
    };
    let original = || BoxedExpr::function(builtin, ops.to_vec(), true);
    Ok(ev.numeric_outcome(kernel(x, ev.ctx()), original))
}

fn reciprocal(f: Transcendental, x: &NumericValue, ctx: &NumericContext) -> Result<NumericValue, NumericError> {
    NumericValue::one().div(&x.apply(f, ctx)?, ctx)
}

/// `(e^x + s e^-x) / 2` with `s = ±1`.
fn exp_pair(x: &NumericValue, s: i64, ctx: &NumericContext) -> Result<NumericValue, NumericError> {
    let up = x.apply(Transcendental::Exp, ctx)?;
    let down = x.neg().apply(Transcendental::Exp, ctx)?;
    let sum = up.add(&down.mul(&NumericValue::from_i64(s), ctx), ctx);
    sum.div(&NumericValue::from_i64(2), ctx)
}

pub(crate) fn sin(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    numeric(ev, Builtin::Sin, ops, |x, ctx| x.apply(Transcendental::Sin, ctx))
}

pub(crate) fn cos(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    numeric(ev, Builtin::Cos, ops, |x, ctx| x.apply(Transcendental::Cos, ctx))
}

pub(crate) fn tan(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    numeric(ev, Builtin::Tan, ops, |x, ctx| x.apply(Transcendental::Tan, ctx))
}

pub(crate) fn cot(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    numeric(ev, Builtin::Cot, ops, |x, ctx| reciprocal(Transcendental::Tan, x, ctx))
}

pub(crate) fn sec(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    numeric(ev, Builtin::Sec, ops, |x, ctx| reciprocal(Transcendental::Cos, x, ctx))
}

pub(crate) fn csc(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    numeric(ev, Builtin::Csc, ops, |x, ctx| reciprocal(Transcendental::Sin, x, ctx))
}

pub(crate) fn arcsin(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    numeric(ev, Builtin::Arcsin, ops, |x, ctx| x.apply(Transcendental::Arcsin, ctx))
}

pub(crate) fn arccos(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    numeric(ev, Builtin::Arccos, ops, |x, ctx| x.apply(Transcendental::Arccos, ctx))
}

pub(crate) fn arctan(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    numeric(ev, Builtin::Arctan, ops, |x, ctx| x.apply(Transcendental::Arctan, ctx))
}

pub(crate) fn sinh(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    numeric(ev, Builtin::Sinh, ops, |x, ctx| exp_pair(x, -1, ctx))
}

pub(crate) fn cosh(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    numeric(ev, Builtin::Cosh, ops, |x, ctx| exp_pair(x, 1, ctx))
}

pub(crate) fn tanh(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    numeric(ev, Builtin::Tanh, ops, |x, ctx| {
        exp_pair(x, -1, ctx)?.div(&exp_pair(x, 1, ctx)?, ctx)
    })
}
