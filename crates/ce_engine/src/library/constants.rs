use ce_numeric::{decimal, Complex, NumericContext, NumericValue};

use crate::definitions::{ConstantDef, ConstantValue};
use crate::domain::Domain;

const EULER_GAMMA: &str = "0.5772156649015328606065120900824024310421";
const CATALAN: &str = "0.9159655941772190150546035149323841107741";

fn pi(ctx: &NumericContext) -> NumericValue {
    if ctx.is_arbitrary() {
        NumericValue::Decimal(decimal::pi(ctx.precision))
    } else {
        NumericValue::Float(std::f64::consts::PI)
    }
}

fn e(ctx: &NumericContext) -> NumericValue {
    if ctx.is_arbitrary() {
        let one = decimal::from_i64(1, ctx.precision);
        NumericValue::Decimal(decimal::exp(&one, ctx.precision))
    } else {
        NumericValue::Float(std::f64::consts::E)
    }
}

fn golden_ratio(ctx: &NumericContext) -> NumericValue {
    if ctx.is_arbitrary() {
        let p = ctx.precision;
        let root5 = decimal::sqrt(&decimal::from_i64(5, p), p);
        let value = (decimal::from_i64(1, p) + root5) / decimal::from_i64(2, p);
        NumericValue::Decimal(decimal::round_to(value, p))
    } else {
        NumericValue::Float((1.0 + 5f64.sqrt()) / 2.0)
    }
}

/// Tabulated constants are only known to 40 digits.
fn tabulated(text: &str, fallback: f64, ctx: &NumericContext) -> NumericValue {
    NumericValue::parse(text, ctx).unwrap_or(NumericValue::Float(fallback))
}

fn euler_gamma(ctx: &NumericContext) -> NumericValue {
    tabulated(EULER_GAMMA, 0.577_215_664_901_532_9, ctx)
}

fn catalan(ctx: &NumericContext) -> NumericValue {
    tabulated(CATALAN, 0.915_965_594_177_219, ctx)
}

fn imaginary_unit(_: &NumericContext) -> NumericValue {
    NumericValue::complex(Complex::I)
}

fn machine_epsilon(_: &NumericContext) -> NumericValue {
    NumericValue::Float(f64::EPSILON)
}

fn half() -> NumericValue {
    NumericValue::fraction(1, 2).unwrap_or_else(|_| NumericValue::Float(0.5))
}

fn constant(name: &'static str, domain: Domain, value: ConstantValue) -> ConstantDef {
    ConstantDef { name, domain, value }
}

pub(super) fn definitions() -> Vec<ConstantDef> {
    use ConstantValue::{Approximate, Exact, Inert};
    vec![
        constant("Pi", Domain::RealNumber, Approximate(pi)),
        constant("ExponentialE", Domain::RealNumber, Approximate(e)),
        constant("ImaginaryUnit", Domain::ImaginaryNumber, Approximate(imaginary_unit)),
        constant("GoldenRatio", Domain::RealNumber, Approximate(golden_ratio)),
        constant("EulerGamma", Domain::RealNumber, Approximate(euler_gamma)),
        constant("CatalanConstant", Domain::RealNumber, Approximate(catalan)),
        constant("MachineEpsilon", Domain::RealNumber, Approximate(machine_epsilon)),
        constant("Half", Domain::RationalNumber, Exact(half)),
        constant("True", Domain::Boolean, Inert),
        constant("False", Domain::Boolean, Inert),
        constant("Nothing", Domain::Nothing, Inert),
        constant("EmptySet", Domain::Set, Inert),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pi_in_both_modes() {
        assert_eq!(pi(&NumericContext::machine()), NumericValue::Float(std::f64::consts::PI));
        let digits = pi(&NumericContext::arbitrary(30)).to_string();
        assert!(digits.starts_with("3.14159265358979323846"), "{digits}");
    }

    #[test]
    fn test_tabulated_constants() {
        let gamma = euler_gamma(&NumericContext::machine()).to_f64();
        assert!((gamma - 0.5772156649).abs() < 1e-9);
        let golden = golden_ratio(&NumericContext::machine()).to_f64();
        assert!((golden * golden - golden - 1.0).abs() < 1e-12);
    }
}
