use ce_numeric::NumericValue;

use super::exact;
use crate::boxed::BoxedExpr;
use crate::builtin::Builtin;
use crate::eval::Evaluator;
use crate::rule::Rewrite;

define_rule!(ExactFoldRule, "Fold Exact Constants", |ev, expr| {
    // f(2, 3) with exact operands: run the evaluate handler, keep the
    // result only when it is itself exact
    let builtin = expr.builtin()?;
    if expr.nops() == 0 || !expr.ops().iter().all(BoxedExpr::is_exact_number) {
        return None;
    }
    let def = ev.engine().library().function(builtin);
    let handler = def.evaluate?;
    if expr.nops() < def.signature.min_arity() {
        return None;
    }
    let mut trial = Evaluator::silent(ev.engine());
    let folded = handler(&mut trial, expr.ops()).ok()??;
    folded
        .is_exact_number()
        .then(|| Rewrite::simple(folded, format!("Evaluate {builtin} of constants")))
});

/// `c * rest` as `(c, rest)`; `Negate(x)` as `(-1, x)`; anything else has
/// coefficient 1.
fn split_term(term: &BoxedExpr) -> (NumericValue, BoxedExpr) {
    if term.is_head(Builtin::Negate) && term.nops() == 1 {
        return (NumericValue::from_i64(-1), term.ops()[0].clone());
    }
    if term.is_head(Builtin::Multiply) {
        if let [first, rest @ ..] = term.ops() {
            if let Some(c) = exact(first) {
                let rest = match rest {
                    [single] => single.clone(),
                    _ => BoxedExpr::function(Builtin::Multiply, rest.to_vec(), true),
                };
                return (c.clone(), rest);
            }
        }
    }
    (NumericValue::one(), term.clone())
}

define_rule!(
    CombineLikeTermsRule,
    "Combine Like Terms",
    Some(&[Builtin::Add]),
    |ev, expr| {
        // 2x + 3x -> 5x
        let ctx = *ev.ctx();
        let mut groups: Vec<(BoxedExpr, NumericValue)> = Vec::new();
        let mut constants = Vec::new();
        for term in expr.ops() {
            if term.is_number() {
                constants.push(term.clone());
                continue;
            }
            let (c, rest) = split_term(term);
            match groups.iter_mut().find(|(r, _)| *r == rest) {
                Some((_, total)) => *total = total.add(&c, &ctx),
                None => groups.push((rest, c)),
            }
        }
        if groups.len() + constants.len() == expr.nops() {
            return None;
        }
        let mut terms = constants;
        for (rest, c) in groups {
            if c.is_zero() {
                continue;
            }
            terms.push(ev.apply(Builtin::Multiply, vec![BoxedExpr::number(c), rest]));
        }
        Some(Rewrite::simple(ev.apply(Builtin::Add, terms), "Collect like terms"))
    }
);

define_rule!(
    ZeroProductRule,
    "Zero Property of Multiplication",
    Some(&[Builtin::Multiply]),
    |_ev, expr| {
        // 0 * x -> 0, unless a factor is a non-finite number
        let ops = expr.ops();
        let has_zero = ops.iter().any(BoxedExpr::is_zero);
        let all_finite = ops
            .iter()
            .filter_map(BoxedExpr::as_number)
            .all(NumericValue::is_finite);
        (has_zero && all_finite).then(|| Rewrite::simple(BoxedExpr::zero(), "0 * x = 0"))
    }
);

define_rule!(
    DivisionIdentityRule,
    "Division Identities",
    Some(&[Builtin::Divide]),
    |_ev, expr| {
        let [numer, denom] = expr.ops() else {
            return None;
        };
        if denom.is_zero() {
            return None;
        }
        if numer == denom {
            return Some(Rewrite::simple(BoxedExpr::one(), "x / x = 1"));
        }
        if numer.is_zero() {
            return Some(Rewrite::simple(BoxedExpr::zero(), "0 / x = 0"));
        }
        None
    }
);

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(ExactFoldRule));
    simplifier.add_rule(Box::new(ZeroProductRule));
    simplifier.add_rule(Box::new(CombineLikeTermsRule));
    simplifier.add_rule(Box::new(DivisionIdentityRule));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_term_coefficients() {
        let x = BoxedExpr::string("x");
        let negated = BoxedExpr::function(Builtin::Negate, vec![x.clone()], true);
        assert_eq!(split_term(&negated), (NumericValue::from_i64(-1), x.clone()));

        let scaled = BoxedExpr::function(Builtin::Multiply, vec![BoxedExpr::integer(3), x.clone()], true);
        assert_eq!(split_term(&scaled), (NumericValue::from_i64(3), x.clone()));

        assert_eq!(split_term(&x), (NumericValue::one(), x));
    }
}
