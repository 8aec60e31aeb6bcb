use super::signatures::{NUMBER, NUMBER2};
use crate::canonical::forms;
use crate::definitions::{Codomain, FunctionDef, FunctionFlags, Signature};
use crate::domain::Domain;
use crate::eval::arithmetic as eval;

const REAL: Codomain = Codomain::Join {
    at_least: Domain::Nothing,
    within: Domain::RealNumber,
};

const RATIONAL: Codomain = Codomain::Join {
    at_least: Domain::RationalNumber,
    within: Domain::Number,
};

const EXTENDED_REAL: Codomain = Codomain::Join {
    at_least: Domain::Nothing,
    within: Domain::ExtendedRealNumber,
};

const NUMBER_OUT: Codomain = Codomain::Fixed(Domain::Number);

pub(super) fn definitions() -> Vec<FunctionDef> {
    let unary = Signature::fixed(NUMBER);
    let binary = Signature::fixed(NUMBER2);
    let numbers = Signature::variadic(Domain::Number);
    vec![
        FunctionDef::new("Add", numbers, Codomain::NUMERIC)
            .flags(FunctionFlags::MONOID)
            .complexity(1300)
            .canonical(forms::add)
            .evaluate(eval::add),
        FunctionDef::new("Subtract", unary.with_optional(NUMBER), Codomain::NUMERIC)
            .complexity(1350)
            .canonical(forms::subtract),
        FunctionDef::new("Negate", unary, Codomain::NUMERIC)
            .flags(FunctionFlags::THREADABLE)
            .complexity(2000)
            .canonical(forms::negate)
            .evaluate(eval::negate),
        FunctionDef::new("Multiply", numbers, Codomain::NUMERIC)
            .flags(FunctionFlags::MONOID)
            .complexity(2100)
            .canonical(forms::multiply)
            .evaluate(eval::multiply),
        FunctionDef::new("Divide", binary, RATIONAL)
            .flags(FunctionFlags::THREADABLE)
            .complexity(2500)
            .canonical(forms::divide)
            .evaluate(eval::divide),
        FunctionDef::new("Rational", binary, RATIONAL)
            .complexity(2400)
            .canonical(forms::rational),
        FunctionDef::new("Power", binary, NUMBER_OUT)
            .flags(FunctionFlags::THREADABLE)
            .complexity(3500)
            .canonical(forms::power)
            .evaluate(eval::power),
        FunctionDef::new("Square", unary, Codomain::NUMERIC)
            .complexity(3500)
            .canonical(forms::square),
        FunctionDef::new("Sqrt", unary, NUMBER_OUT)
            .flags(FunctionFlags::THREADABLE)
            .complexity(3600)
            .evaluate(eval::sqrt),
        FunctionDef::new("Root", binary, NUMBER_OUT)
            .complexity(3650)
            .canonical(forms::root)
            .evaluate(eval::root),
        FunctionDef::new("Exp", unary, NUMBER_OUT)
            .complexity(3500)
            .canonical(forms::exp),
        FunctionDef::new("Ln", unary, NUMBER_OUT)
            .flags(FunctionFlags::THREADABLE)
            .complexity(4000)
            .evaluate(eval::ln),
        FunctionDef::new("Log", unary.with_optional(NUMBER), NUMBER_OUT)
            .flags(FunctionFlags::THREADABLE)
            .complexity(4100)
            .canonical(forms::log)
            .evaluate(eval::log),
        FunctionDef::new("Lb", unary, NUMBER_OUT)
            .complexity(4100)
            .canonical(forms::lb),
        FunctionDef::new("Lg", unary, NUMBER_OUT)
            .complexity(4100)
            .canonical(forms::lg),
        FunctionDef::new("Abs", unary, REAL)
            .flags(FunctionFlags {
                idempotent: true,
                ..FunctionFlags::THREADABLE
            })
            .complexity(1200)
            .evaluate(eval::abs),
        FunctionDef::new("Sign", unary, NUMBER_OUT)
            .flags(FunctionFlags::THREADABLE)
            .complexity(1200)
            .evaluate(eval::sign),
        FunctionDef::new("Floor", unary, Codomain::Fixed(Domain::Integer))
            .flags(FunctionFlags {
                idempotent: true,
                ..FunctionFlags::THREADABLE
            })
            .complexity(1250)
            .evaluate(eval::floor),
        FunctionDef::new("Ceil", unary, Codomain::Fixed(Domain::Integer))
            .flags(FunctionFlags {
                idempotent: true,
                ..FunctionFlags::THREADABLE
            })
            .complexity(1250)
            .evaluate(eval::ceil),
        FunctionDef::new("Round", unary, Codomain::Fixed(Domain::Integer))
            .flags(FunctionFlags {
                idempotent: true,
                ..FunctionFlags::THREADABLE
            })
            .complexity(1250)
            .evaluate(eval::round),
        FunctionDef::new("Factorial", unary, NUMBER_OUT)
            .flags(FunctionFlags::THREADABLE)
            .complexity(3800)
            .evaluate(eval::factorial),
        FunctionDef::new("Max", numbers, EXTENDED_REAL)
            .flags(FunctionFlags::LATTICE)
            .complexity(1250)
            .evaluate(eval::max),
        FunctionDef::new("Min", numbers, EXTENDED_REAL)
            .flags(FunctionFlags::LATTICE)
            .complexity(1250)
            .evaluate(eval::min),
        FunctionDef::new("PlusMinus", unary.with_optional(NUMBER), NUMBER_OUT).complexity(1350),
        FunctionDef::new("Complex", binary, Codomain::Fixed(Domain::ComplexNumber))
            .complexity(1100)
            .canonical(forms::complex),
    ]
}
