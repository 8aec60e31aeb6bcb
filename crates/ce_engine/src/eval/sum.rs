//! `Sum` and `Product` over an integer range.
//!
//! The index is bound in a child scope for each term, shadowing any outer
//! symbol of the same name; the scope is popped before returning.

use ce_numeric::NumericValue;
use tracing::debug;

use super::Evaluator;
use crate::boxed::BoxedExpr;
use crate::builtin::Builtin;
use crate::definitions::SymbolDef;
use crate::ensure_invariant;
use crate::error::EngineError;
use crate::scope::Binding;

type Outcome = Result<Option<BoxedExpr>, EngineError>;

struct Range {
    index: String,
    lower: i64,
    upper: i64,
}

/// `Triple(k, lo, hi)` with both bounds evaluating to machine integers.
fn range(ev: &mut Evaluator<'_>, limits: &BoxedExpr) -> Result<Option<Range>, EngineError> {
    if !limits.is_head(Builtin::Triple) || limits.nops() != 3 {
        return Ok(None);
    }
    let Some(index) = limits.ops()[0].symbol_name().map(str::to_owned) else {
        return Ok(None);
    };
    let mut bound = |expr: &BoxedExpr| -> Result<Option<i64>, EngineError> {
        let value = ev.evaluate(expr)?;
        Ok(value
            .as_number()
            .filter(|n| n.is_integral() && n.is_finite())
            .and_then(NumericValue::to_i64))
    };
    let (Some(lower), Some(upper)) = (bound(&limits.ops()[1])?, bound(&limits.ops()[2])?) else {
        return Ok(None);
    };
    Ok(Some(Range { index, lower, upper }))
}

fn accumulate(ev: &mut Evaluator<'_>, builtin: Builtin, ops: &[BoxedExpr]) -> Outcome {
    let [body, limits] = ops else {
        return Ok(None);
    };
    let Some(Range { index, lower, upper }) = range(ev, limits)? else {
        return Ok(None);
    };
    let count = upper.saturating_sub(lower).saturating_add(1).max(0);
    let limit = ev.engine().options().max_sum_iterations;
    if count as u64 > limit as u64 {
        debug!(count, limit, "range too long, keeping {} symbolic", builtin.name());
        return Ok(None);
    }

    let scopes = ev.engine().scopes();
    let mut terms = Vec::with_capacity(count as usize);
    for k in lower..=upper {
        let pushed = scopes.push();
        scopes
            .current()
            .declare(&index, Binding::Symbol(SymbolDef::with_value(BoxedExpr::integer(k))));
        let term = ev.evaluate(body);
        let popped = scopes.pop()?;
        ensure_invariant!(pushed == popped, "unbalanced scope {} in {}", popped, builtin);
        terms.push(term?);
    }

    let folded = match builtin {
        Builtin::Product => ev.apply(Builtin::Multiply, terms),
        _ => ev.apply(Builtin::Add, terms),
    };
    ev.evaluate(&folded).map(Some)
}

pub(crate) fn sum(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    accumulate(ev, Builtin::Sum, ops)
}

pub(crate) fn product(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    accumulate(ev, Builtin::Product, ops)
}
