use super::signatures::NUMBER;
use crate::definitions::{Codomain, EvaluateFn, FunctionDef, FunctionFlags, Signature};
use crate::domain::Domain;
use crate::eval::functions as eval;

fn trig(name: &'static str, complexity: u16, handler: EvaluateFn) -> FunctionDef {
    FunctionDef::new(name, Signature::fixed(NUMBER), Codomain::Fixed(Domain::Number))
        .flags(FunctionFlags::THREADABLE)
        .complexity(complexity)
        .evaluate(handler)
}

pub(super) fn definitions() -> Vec<FunctionDef> {
    vec![
        trig("Sin", 5000, eval::sin),
        trig("Cos", 5050, eval::cos),
        trig("Tan", 5100, eval::tan),
        trig("Cot", 5150, eval::cot),
        trig("Sec", 5200, eval::sec),
        trig("Csc", 5250, eval::csc),
        trig("Arcsin", 5500, eval::arcsin),
        trig("Arccos", 5550, eval::arccos),
        trig("Arctan", 5600, eval::arctan),
        trig("Sinh", 6000, eval::sinh),
        trig("Cosh", 6050, eval::cosh),
        trig("Tanh", 6100, eval::tanh),
    ]
}
