use crate::boxed::BoxedExpr;
use crate::builtin::Builtin;
use crate::rule::Rewrite;

fn is_e(expr: &BoxedExpr) -> bool {
    expr.is_symbol("ExponentialE")
}

define_rule!(
    LogInverseRule,
    "Logarithm of a Power of its Base",
    Some(&[Builtin::Ln, Builtin::Log]),
    |_ev, expr| {
        let (argument, base) = match (expr.builtin()?, expr.ops()) {
            (Builtin::Ln, [x]) => (x, None),
            (Builtin::Log, [x]) => (x, Some(BoxedExpr::integer(10))),
            (Builtin::Log, [x, b]) => (x, Some(b.clone())),
            _ => return None,
        };
        let matches_base = |candidate: &BoxedExpr| match &base {
            None => is_e(candidate),
            Some(b) => candidate == b,
        };
        // log_b(b) -> 1
        if matches_base(argument) {
            return Some(Rewrite::simple(BoxedExpr::one(), "log_b(b) = 1"));
        }
        // log_b(b^x) -> x
        if let [power_base, exponent] = argument.ops() {
            if argument.is_head(Builtin::Power) && matches_base(power_base) {
                return Some(Rewrite::simple(exponent.clone(), "log_b(b^x) = x"));
            }
        }
        None
    }
);

define_rule!(
    ExpLnRule,
    "Exponential of a Logarithm",
    Some(&[Builtin::Power]),
    |_ev, expr| {
        // e^(ln x) -> x
        let [base, exponent] = expr.ops() else {
            return None;
        };
        if !is_e(base) || !exponent.is_head(Builtin::Ln) {
            return None;
        }
        let [x] = exponent.ops() else {
            return None;
        };
        Some(Rewrite::simple(x.clone(), "e^ln(x) = x"))
    }
);

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(LogInverseRule));
    simplifier.add_rule(Box::new(ExpLnRule));
}
