use crate::builtin::Builtin;
use crate::domain::Domain;
use crate::eval::logic::truth;
use crate::eval::Evaluator;
use crate::rule::Rewrite;

define_rule!(InvolutionRule, "Double Negation", Some(&[Builtin::Not]), |_ev, expr| {
    // not(not(p)) -> p
    match expr.ops() {
        [inner] if inner.is_head(Builtin::Not) => {
            let [p] = inner.ops() else {
                return None;
            };
            Some(Rewrite::simple(p.clone(), "not(not(p)) = p"))
        }
        _ => None,
    }
});

define_rule!(
    IdempotentRule,
    "Idempotent Functions",
    Some(&[Builtin::Abs, Builtin::Floor, Builtin::Ceil, Builtin::Round]),
    |_ev, expr| {
        let builtin = expr.builtin()?;
        let [argument] = expr.ops() else {
            return None;
        };
        // floor(floor(x)) -> floor(x)
        if argument.is_head(builtin) {
            return Some(Rewrite::simple(argument.clone(), format!("{builtin}({builtin}(x)) = {builtin}(x)")));
        }
        // floor(n) -> n for integer-valued n
        let integral = argument.domain().is_subdomain_of(Domain::Integer);
        if integral && builtin != Builtin::Abs && !argument.is_number() {
            return Some(Rewrite::simple(argument.clone(), format!("{builtin} of an integer")));
        }
        None
    }
);

const DECIDABLE: &[Builtin] = &[
    Builtin::Equal,
    Builtin::NotEqual,
    Builtin::Less,
    Builtin::LessEqual,
    Builtin::Greater,
    Builtin::GreaterEqual,
    Builtin::And,
    Builtin::Or,
    Builtin::Not,
    Builtin::Implies,
    Builtin::Element,
    Builtin::NotElement,
    Builtin::Subset,
    Builtin::SubsetEqual,
];

define_rule!(DecideRule, "Decide Predicates", Some(DECIDABLE), |ev, expr| {
    // x = x -> True, p and True -> p
    let builtin = expr.builtin()?;
    let def = ev.engine().library().function(builtin);
    let handler = def.evaluate?;
    if expr.nops() < def.signature.min_arity() {
        return None;
    }
    let mut trial = Evaluator::silent(ev.engine());
    let decided = handler(&mut trial, expr.ops()).ok()??;
    let accept = truth(&decided).is_some() || decided.node_count() < expr.node_count();
    accept.then(|| Rewrite::simple(decided, format!("Decide {builtin}")))
});

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(InvolutionRule));
    simplifier.add_rule(Box::new(IdempotentRule));
    simplifier.add_rule(Box::new(DecideRule));
}
