use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::ToPrimitive;

use super::exact;
use crate::boxed::BoxedExpr;
use crate::builtin::Builtin;
use crate::eval::Evaluator;
use crate::rule::Rewrite;

/// `r` for an argument of the form `r * Pi`, with `r` rational.
fn pi_multiple(expr: &BoxedExpr) -> Option<BigRational> {
    if expr.is_symbol("Pi") {
        return Some(BigRational::from_integer(1.into()));
    }
    match (expr.builtin()?, expr.ops()) {
        (Builtin::Negate, [x]) => pi_multiple(x).map(|r| -r),
        (Builtin::Multiply, [c, pi]) if pi.is_symbol("Pi") => exact(c)?.as_rational(),
        (Builtin::Divide, [numer, denom]) => {
            let d = exact(denom)?.as_rational()?;
            if d == BigRational::from_integer(0.into()) {
                return None;
            }
            Some(pi_multiple(numer)? / d)
        }
        _ => None,
    }
}

/// The angle in twelfths of `Pi`, reduced modulo `period` twelfths.
fn twelfths(angle: &BigRational, period: i64) -> Option<i64> {
    let scaled = angle * BigRational::from_integer(12.into());
    if !scaled.is_integer() {
        return None;
    }
    scaled.to_integer().mod_floor(&BigInt::from(period)).to_i64()
}

/// `sqrt(root) / denom`, with `root = 0` for zero and `root = 1` for a
/// rational value.
fn surd(ev: &Evaluator<'_>, root: i64, denom: i64) -> BoxedExpr {
    let numer = match root {
        0 | 1 => BoxedExpr::integer(root),
        _ => ev.apply(Builtin::Sqrt, vec![BoxedExpr::integer(root)]),
    };
    ev.apply(Builtin::Divide, vec![numer, BoxedExpr::integer(denom)])
}

fn signed(ev: &Evaluator<'_>, negative: bool, value: BoxedExpr) -> BoxedExpr {
    if negative {
        ev.apply(Builtin::Negate, vec![value])
    } else {
        value
    }
}

/// sin(k Pi / 12) for the angles with a closed form.
fn sine(ev: &Evaluator<'_>, k: i64) -> Option<BoxedExpr> {
    let (negative, k) = if k >= 12 { (true, k - 12) } else { (false, k) };
    let k = if k > 6 { 12 - k } else { k };
    let value = match k {
        0 => surd(ev, 0, 1),
        2 => surd(ev, 1, 2),
        3 => surd(ev, 2, 2),
        4 => surd(ev, 3, 2),
        6 => surd(ev, 1, 1),
        _ => return None,
    };
    Some(signed(ev, negative, value))
}

/// tan(k Pi / 12); `None` at the poles.
fn tangent(ev: &Evaluator<'_>, k: i64) -> Option<BoxedExpr> {
    let (negative, k) = if k > 6 { (true, 12 - k) } else { (false, k) };
    let value = match k {
        0 => surd(ev, 0, 1),
        2 => surd(ev, 3, 3),
        3 => surd(ev, 1, 1),
        4 => surd(ev, 3, 1),
        _ => return None,
    };
    Some(signed(ev, negative, value))
}

define_rule!(
    TrigSpecialValuesRule,
    "Evaluate Trigonometric Functions",
    Some(&[Builtin::Sin, Builtin::Cos, Builtin::Tan]),
    |ev, expr| {
        // sin(pi/6) -> 1/2, cos(pi) -> -1, tan(pi/4) -> 1
        let [argument] = expr.ops() else {
            return None;
        };
        let angle = pi_multiple(argument)?;
        let value = match expr.builtin()? {
            Builtin::Sin => sine(ev, twelfths(&angle, 24)?),
            Builtin::Cos => sine(ev, (twelfths(&angle, 24)? + 6) % 24),
            Builtin::Tan => tangent(ev, twelfths(&angle, 12)?),
            _ => None,
        }?;
        Some(Rewrite::simple(value, format!("Special value of {}", expr.builtin()?)))
    }
);

define_rule!(
    TrigParityRule,
    "Trigonometric Parity",
    Some(&[
        Builtin::Sin,
        Builtin::Cos,
        Builtin::Tan,
        Builtin::Cot,
        Builtin::Sec,
        Builtin::Csc,
        Builtin::Arcsin,
        Builtin::Arctan,
        Builtin::Sinh,
        Builtin::Cosh,
        Builtin::Tanh,
    ]),
    |ev, expr| {
        // sin(-x) -> -sin(x), cos(-x) -> cos(x)
        let builtin = expr.builtin()?;
        let [argument] = expr.ops() else {
            return None;
        };
        if !argument.is_head(Builtin::Negate) {
            return None;
        }
        let inner = ev.apply(builtin, argument.ops().to_vec());
        let even = matches!(builtin, Builtin::Cos | Builtin::Sec | Builtin::Cosh);
        if even {
            Some(Rewrite::simple(inner, format!("{builtin}(-x) = {builtin}(x)")))
        } else {
            let new_expr = ev.apply(Builtin::Negate, vec![inner]);
            Some(Rewrite::simple(new_expr, format!("{builtin}(-x) = -{builtin}(x)")))
        }
    }
);

define_rule!(
    InverseTrigCompositionRule,
    "Inverse Trig Composition",
    Some(&[Builtin::Sin, Builtin::Cos, Builtin::Tan]),
    |_ev, expr| {
        // sin(arcsin(x)) -> x
        let [argument] = expr.ops() else {
            return None;
        };
        let inverse = match expr.builtin()? {
            Builtin::Sin => Builtin::Arcsin,
            Builtin::Cos => Builtin::Arccos,
            Builtin::Tan => Builtin::Arctan,
            _ => return None,
        };
        match argument.ops() {
            [x] if argument.is_head(inverse) => {
                Some(Rewrite::simple(x.clone(), format!("f({inverse}(x)) = x")))
            }
            _ => None,
        }
    }
);

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(TrigSpecialValuesRule));
    simplifier.add_rule(Box::new(TrigParityRule));
    simplifier.add_rule(Box::new(InverseTrigCompositionRule));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelfths_reduction() {
        let third = BigRational::new(1.into(), 3.into());
        assert_eq!(twelfths(&third, 24), Some(4));
        let minus_half = BigRational::new((-1).into(), 2.into());
        assert_eq!(twelfths(&minus_half, 24), Some(18));
        assert_eq!(twelfths(&minus_half, 12), Some(6));
        let seventh = BigRational::new(1.into(), 7.into());
        assert_eq!(twelfths(&seventh, 24), None);
    }
}
