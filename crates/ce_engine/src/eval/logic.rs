//! Relations, connectives, set operators and `Piecewise`.
//!
//! Each decision is three-valued: a relation between expressions that
//! cannot be compared yet (symbols without values) stays symbolic.

use std::cmp::Ordering;

use super::Evaluator;
use crate::boxed::BoxedExpr;
use crate::builtin::Builtin;
use crate::domain::Domain;
use crate::error::EngineError;

type Outcome = Result<Option<BoxedExpr>, EngineError>;

pub(crate) fn truth(expr: &BoxedExpr) -> Option<bool> {
    match expr.symbol_name() {
        Some("True") => Some(true),
        Some("False") => Some(false),
        _ => None,
    }
}

fn boolean(ev: &Evaluator<'_>, value: bool) -> BoxedExpr {
    ev.symbol(if value { "True" } else { "False" })
}

/// No free variables: structural comparison decides equality.
fn is_literal(expr: &BoxedExpr) -> bool {
    expr.free_variables().is_empty() && expr.is_valid()
}

pub(crate) fn decide_equal(a: &BoxedExpr, b: &BoxedExpr) -> Option<bool> {
    if !a.is_valid() || !b.is_valid() {
        return None;
    }
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        if x.is_nan() || y.is_nan() {
            return Some(false);
        }
        return match x.compare(y) {
            Some(order) => Some(order == Ordering::Equal),
            None => Some(x.approx_eq(y, 0.0)),
        };
    }
    if a == b {
        return Some(true);
    }
    if let (Some(x), Some(y)) = (a.as_string(), b.as_string()) {
        return Some(x == y);
    }
    if let (Some(x), Some(y)) = (truth(a), truth(b)) {
        return Some(x == y);
    }
    let comparable = |e: &BoxedExpr| e.is_number() || e.as_string().is_some() || truth(e).is_some();
    if comparable(a) && comparable(b) {
        return Some(false);
    }
    None
}

fn decide_order(a: &BoxedExpr, b: &BoxedExpr, accept: fn(Ordering) -> bool) -> Option<bool> {
    let (x, y) = (a.as_number()?, b.as_number()?);
    if x.is_nan() || y.is_nan() {
        return Some(false);
    }
    x.compare(y).map(accept)
}

/// Fold a chain `a R b R c` pairwise.
fn chain(ev: &Evaluator<'_>, ops: &[BoxedExpr], decide: impl Fn(&BoxedExpr, &BoxedExpr) -> Option<bool>) -> Option<BoxedExpr> {
    let mut all_true = true;
    for pair in ops.windows(2) {
        match decide(&pair[0], &pair[1]) {
            Some(false) => return Some(boolean(ev, false)),
            Some(true) => {}
            None => all_true = false,
        }
    }
    all_true.then(|| boolean(ev, true))
}

pub(crate) fn equal(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(chain(ev, ops, decide_equal))
}

pub(crate) fn not_equal(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(decide_equal(&ops[0], &ops[1]).map(|eq| boolean(ev, !eq)))
}

pub(crate) fn less(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(chain(ev, ops, |a, b| decide_order(a, b, Ordering::is_lt)))
}

pub(crate) fn less_equal(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(chain(ev, ops, |a, b| decide_order(a, b, Ordering::is_le)))
}

pub(crate) fn greater(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(chain(ev, ops, |a, b| decide_order(a, b, Ordering::is_gt)))
}

pub(crate) fn greater_equal(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(chain(ev, ops, |a, b| decide_order(a, b, Ordering::is_ge)))
}

/// Equality within the engine's tolerance.
pub(crate) fn approx(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    let tolerance = ev.ctx().tolerance;
    let decided = match (ops[0].as_number(), ops[1].as_number()) {
        (Some(x), Some(y)) => Some(x.approx_eq(y, tolerance)),
        _ => decide_equal(&ops[0], &ops[1]),
    };
    Ok(decided.map(|value| boolean(ev, value)))
}

/// Drop the neutral element, short-circuit on the absorbing one.
fn connective(ev: &Evaluator<'_>, builtin: Builtin, ops: &[BoxedExpr], absorbing: bool) -> Option<BoxedExpr> {
    if ops.iter().any(|op| truth(op) == Some(absorbing)) {
        return Some(boolean(ev, absorbing));
    }
    let rest: Vec<BoxedExpr> = ops.iter().filter(|op| truth(op).is_none()).cloned().collect();
    if rest.len() == ops.len() {
        return None;
    }
    Some(match rest.len() {
        0 => boolean(ev, !absorbing),
        _ => ev.apply(builtin, rest),
    })
}

pub(crate) fn and(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(connective(ev, Builtin::And, ops, false))
}

pub(crate) fn or(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(connective(ev, Builtin::Or, ops, true))
}

pub(crate) fn not(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(truth(&ops[0]).map(|value| boolean(ev, !value)))
}

pub(crate) fn implies(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(match (truth(&ops[0]), truth(&ops[1])) {
        (Some(false), _) | (_, Some(true)) => Some(boolean(ev, true)),
        (Some(true), _) => Some(ops[1].clone()),
        _ => None,
    })
}

fn is_collection(expr: &BoxedExpr) -> bool {
    matches!(
        expr.builtin(),
        Some(Builtin::List | Builtin::Set | Builtin::Tuple)
    )
}

fn as_domain(expr: &BoxedExpr) -> Option<Domain> {
    expr.symbol_name()?.parse().ok()
}

/// Membership of `x` in a domain, a collection or a string.
pub(crate) fn decide_element(x: &BoxedExpr, set: &BoxedExpr) -> Option<bool> {
    if let Some(domain) = as_domain(set) {
        let actual = match x.as_number() {
            Some(n) => Domain::of_number(n),
            None => x.domain(),
        };
        if actual.is_subdomain_of(domain) {
            return Some(true);
        }
        if x.is_number() || !actual.is_compatible(domain) {
            return Some(false);
        }
        return None;
    }
    if set.is_symbol("EmptySet") {
        return Some(false);
    }
    if let (Some(needle), Some(haystack)) = (x.as_string(), set.as_string()) {
        return Some(haystack.contains(needle));
    }
    if !is_collection(set) {
        return None;
    }
    let items = set.ops();
    if items.iter().any(|item| item == x) {
        return Some(true);
    }
    if x.is_head(Builtin::List) && !x.ops().is_empty() {
        let needle = x.ops();
        if items.windows(needle.len()).any(|w| w == needle) {
            return Some(true);
        }
    }
    (is_literal(x) && items.iter().all(is_literal)).then_some(false)
}

pub(crate) fn element(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(decide_element(&ops[0], &ops[1]).map(|value| boolean(ev, value)))
}

pub(crate) fn not_element(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(decide_element(&ops[0], &ops[1]).map(|value| boolean(ev, !value)))
}

fn decide_subset(a: &BoxedExpr, b: &BoxedExpr, proper: bool) -> Option<bool> {
    if let (Some(x), Some(y)) = (as_domain(a), as_domain(b)) {
        return Some(x.is_subdomain_of(y) && !(proper && x == y));
    }
    if !is_collection(a) || !is_collection(b) {
        return None;
    }
    let mut all = true;
    for item in a.ops() {
        match decide_element(item, b) {
            Some(true) => {}
            Some(false) => return Some(false),
            None => all = false,
        }
    }
    if !all {
        return None;
    }
    if proper {
        let reverse = b.ops().iter().all(|item| a.ops().contains(item));
        return Some(!reverse);
    }
    Some(true)
}

pub(crate) fn subset(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(decide_subset(&ops[0], &ops[1], true).map(|value| boolean(ev, value)))
}

pub(crate) fn subset_equal(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    Ok(decide_subset(&ops[0], &ops[1], false).map(|value| boolean(ev, value)))
}

pub(crate) fn union(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    let sets: Vec<&BoxedExpr> = ops.iter().filter(|op| !op.is_symbol("EmptySet")).collect();
    if !sets.iter().all(|s| is_collection(s)) {
        return Ok(None);
    }
    let items = sets.iter().flat_map(|s| s.ops().iter().cloned()).collect();
    Ok(Some(ev.apply(Builtin::Set, items)))
}

pub(crate) fn intersection(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    if ops.iter().any(|op| op.is_symbol("EmptySet")) {
        return Ok(Some(ev.symbol("EmptySet")));
    }
    if !ops.iter().all(is_collection) || ops.is_empty() {
        return Ok(None);
    }
    let mut items = Vec::new();
    for item in ops[0].ops() {
        let mut everywhere = true;
        for other in &ops[1..] {
            match decide_element(item, other) {
                Some(true) => {}
                Some(false) => everywhere = false,
                None => return Ok(None),
            }
        }
        if everywhere {
            items.push(item.clone());
        }
    }
    Ok(Some(ev.apply(Builtin::Set, items)))
}

/// `Piecewise(List(List(value, condition), ...))`: the value of the first
/// row whose condition holds; a row without a condition always applies.
pub(crate) fn piecewise(ev: &mut Evaluator<'_>, ops: &[BoxedExpr]) -> Outcome {
    let Some(rows) = ops.first().filter(|rows| rows.is_head(Builtin::List)) else {
        return Ok(None);
    };
    for row in rows.ops() {
        let (value, condition) = match row.ops() {
            [value] => (value, None),
            [value, condition] => (value, Some(condition)),
            _ => return Ok(None),
        };
        let holds = match condition {
            None => true,
            Some(condition) => match truth(&ev.evaluate(condition)?) {
                Some(holds) => holds,
                None => return Ok(None),
            },
        };
        if holds {
            return ev.evaluate(value).map(Some);
        }
    }
    Ok(Some(ev.symbol("Nothing")))
}
