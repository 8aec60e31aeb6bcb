//! Relations, logic and set operators.

use super::signatures::{ANY2, BOOLEAN, BOOLEAN2, NUMBER2};
use crate::definitions::{Codomain, EvaluateFn, FunctionDef, FunctionFlags, Signature};
use crate::domain::Domain;
use crate::eval::logic as eval;

const BOOLEAN_OUT: Codomain = Codomain::Fixed(Domain::Boolean);

/// Chains such as `a < b < c` carry more than two operands.
const CHAIN_ANY: Signature = Signature {
    params: ANY2,
    optional: &[],
    rest: Some(Domain::Anything),
};

const CHAIN_NUMBER: Signature = Signature {
    params: NUMBER2,
    optional: &[],
    rest: Some(Domain::Number),
};

fn relation(name: &'static str, signature: Signature, handler: EvaluateFn) -> FunctionDef {
    FunctionDef::new(name, signature, BOOLEAN_OUT)
        .complexity(8000)
        .evaluate(handler)
}

pub(super) fn definitions() -> Vec<FunctionDef> {
    vec![
        relation("Equal", CHAIN_ANY, eval::equal),
        relation("NotEqual", Signature::fixed(ANY2), eval::not_equal),
        relation("Less", CHAIN_NUMBER, eval::less),
        relation("LessEqual", CHAIN_NUMBER, eval::less_equal),
        relation("Greater", CHAIN_NUMBER, eval::greater),
        relation("GreaterEqual", CHAIN_NUMBER, eval::greater_equal),
        relation("Approx", Signature::fixed(ANY2), eval::approx),
        FunctionDef::new("And", Signature::variadic(Domain::Boolean), BOOLEAN_OUT)
            .flags(FunctionFlags::LATTICE)
            .complexity(9000)
            .evaluate(eval::and),
        FunctionDef::new("Or", Signature::variadic(Domain::Boolean), BOOLEAN_OUT)
            .flags(FunctionFlags::LATTICE)
            .complexity(9100)
            .evaluate(eval::or),
        FunctionDef::new("Not", Signature::fixed(BOOLEAN), BOOLEAN_OUT)
            .flags(FunctionFlags {
                involution: true,
                ..FunctionFlags::NONE
            })
            .complexity(8900)
            .evaluate(eval::not),
        FunctionDef::new("Implies", Signature::fixed(BOOLEAN2), BOOLEAN_OUT)
            .complexity(9200)
            .evaluate(eval::implies),
        relation("Element", Signature::fixed(ANY2), eval::element),
        relation("NotElement", Signature::fixed(ANY2), eval::not_element),
        relation("Subset", Signature::fixed(ANY2), eval::subset),
        relation("SubsetEqual", Signature::fixed(ANY2), eval::subset_equal),
        FunctionDef::new("Union", Signature::variadic(Domain::Anything), Codomain::Fixed(Domain::Collection))
            .flags(FunctionFlags::LATTICE)
            .complexity(7000)
            .evaluate(eval::union),
        FunctionDef::new(
            "Intersection",
            Signature::variadic(Domain::Anything),
            Codomain::Fixed(Domain::Collection),
        )
        .flags(FunctionFlags::LATTICE)
        .complexity(7100)
        .evaluate(eval::intersection),
    ]
}
