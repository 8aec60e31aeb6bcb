//! The numeric tower.
//!
//! Exact values (`Integer`, `Rational`) are preferred; inexact results are
//! produced only when an operand is already inexact or the context allows
//! approximation. Non-finite values are always `Float` (IEEE semantics),
//! whatever the mode.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use dashu::float::DBig;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};
use tracing::debug;

use crate::complex::Complex;
use crate::context::{NumericContext, NumericMode};
use crate::decimal;
use crate::error::NumericError;
use crate::rational;

#[derive(Debug, Clone)]
pub enum NumericValue {
    Integer(BigInt),
    /// Never integral; see [`NumericValue::rational`].
    Rational(BigRational),
    Float(f64),
    Decimal(DBig),
    /// Never has a zero imaginary part; see [`NumericValue::complex`].
    Complex(Complex),
}

/// Transcendental functions evaluated through the tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transcendental {
    Exp,
    Ln,
    Sin,
    Cos,
    Tan,
    Arcsin,
    Arccos,
    Arctan,
}

impl Transcendental {
    fn real(self, x: f64) -> f64 {
        match self {
            Transcendental::Exp => x.exp(),
            Transcendental::Ln => x.ln(),
            Transcendental::Sin => x.sin(),
            Transcendental::Cos => x.cos(),
            Transcendental::Tan => x.tan(),
            Transcendental::Arcsin => x.asin(),
            Transcendental::Arccos => x.acos(),
            Transcendental::Arctan => x.atan(),
        }
    }

    fn complex(self, z: Complex) -> Complex {
        match self {
            Transcendental::Exp => z.exp(),
            Transcendental::Ln => z.ln(),
            Transcendental::Sin => z.sin(),
            Transcendental::Cos => z.cos(),
            Transcendental::Tan => z.tan(),
            Transcendental::Arcsin => z.asin(),
            Transcendental::Arccos => z.acos(),
            Transcendental::Arctan => z.atan(),
        }
    }

    fn decimal(self, x: &DBig, precision: usize) -> DBig {
        match self {
            Transcendental::Exp => decimal::exp(x, precision),
            Transcendental::Ln => decimal::ln(x, precision),
            Transcendental::Sin => decimal::sin(x, precision),
            Transcendental::Cos => decimal::cos(x, precision),
            Transcendental::Tan => decimal::tan(x, precision),
            Transcendental::Arcsin => decimal::asin(x, precision),
            Transcendental::Arccos => decimal::acos(x, precision),
            Transcendental::Arctan => decimal::atan(x, precision),
        }
    }

    /// Whether a real argument `x` leaves the real domain.
    fn needs_complex(self, x: f64) -> bool {
        match self {
            Transcendental::Ln => x < 0.0,
            Transcendental::Arcsin | Transcendental::Arccos => x.abs() > 1.0,
            _ => false,
        }
    }
}

/// Operands brought to a common representation.
enum Promoted {
    Exact(BigRational, BigRational),
    Machine(f64, f64),
    Decimal(DBig, DBig),
    Complex(Complex, Complex),
}

impl NumericValue {
    pub fn from_i64(n: i64) -> Self {
        NumericValue::Integer(BigInt::from(n))
    }

    pub fn zero() -> Self {
        NumericValue::Integer(BigInt::zero())
    }

    pub fn one() -> Self {
        NumericValue::Integer(BigInt::one())
    }

    /// Integral rationals collapse to `Integer`.
    pub fn rational(r: BigRational) -> Self {
        if r.is_integer() {
            NumericValue::Integer(r.to_integer())
        } else {
            NumericValue::Rational(r)
        }
    }

    pub fn fraction(numer: i64, denom: i64) -> Result<Self, NumericError> {
        if denom == 0 {
            return Err(NumericError::DivisionByZero);
        }
        Ok(Self::rational(BigRational::new(
            BigInt::from(numer),
            BigInt::from(denom),
        )))
    }

    /// Complex values with no imaginary part collapse to `Float`.
    pub fn complex(z: Complex) -> Self {
        if z.im == 0.0 {
            NumericValue::Float(z.re)
        } else {
            NumericValue::Complex(z)
        }
    }

    /// Parse a MathJSON numeral.
    ///
    /// Integers are always exact. Decimal text becomes a `Float` in machine
    /// mode and a `Decimal` in arbitrary mode.
    pub fn parse(text: &str, ctx: &NumericContext) -> Result<Self, NumericError> {
        let text = text.trim();
        match text {
            "NaN" => return Ok(NumericValue::Float(f64::NAN)),
            "+Infinity" | "Infinity" | "PositiveInfinity" => {
                return Ok(NumericValue::Float(f64::INFINITY))
            }
            "-Infinity" | "NegativeInfinity" => return Ok(NumericValue::Float(f64::NEG_INFINITY)),
            _ => {}
        }
        let digits = text.strip_prefix('+').unwrap_or(text);
        if let Ok(n) = digits.parse::<BigInt>() {
            return Ok(NumericValue::Integer(n));
        }
        let well_formed = text.chars().any(|c| c.is_ascii_digit())
            && text
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
        if !well_formed {
            return Err(NumericError::Parse(text.to_string()));
        }
        match ctx.mode {
            NumericMode::Machine => text
                .parse::<f64>()
                .map(NumericValue::Float)
                .map_err(|_| NumericError::Parse(text.to_string())),
            NumericMode::Arbitrary => {
                decimal::parse(text, ctx.precision).map(NumericValue::Decimal)
            }
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, NumericValue::Integer(_) | NumericValue::Rational(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, NumericValue::Integer(_))
    }

    /// Integral value in any representation.
    pub fn is_integral(&self) -> bool {
        match self {
            NumericValue::Integer(_) => true,
            NumericValue::Rational(_) | NumericValue::Complex(_) => false,
            NumericValue::Float(f) => f.is_finite() && f.fract() == 0.0,
            NumericValue::Decimal(d) => decimal::is_integral(d),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            NumericValue::Integer(n) => n.is_zero(),
            NumericValue::Rational(_) | NumericValue::Complex(_) => false,
            NumericValue::Float(f) => *f == 0.0,
            NumericValue::Decimal(d) => decimal::is_zero(d),
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            NumericValue::Integer(n) => n.is_one(),
            NumericValue::Float(f) => *f == 1.0,
            NumericValue::Decimal(d) => decimal::to_f64(d) == 1.0 && decimal::is_integral(d),
            _ => false,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            NumericValue::Integer(n) => n.is_negative(),
            NumericValue::Rational(r) => r.is_negative(),
            NumericValue::Float(f) => *f < 0.0,
            NumericValue::Decimal(d) => decimal::is_negative(d),
            NumericValue::Complex(_) => false,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.is_real() && !self.is_negative() && !self.is_zero() && !self.is_nan()
    }

    pub fn is_nan(&self) -> bool {
        match self {
            NumericValue::Float(f) => f.is_nan(),
            NumericValue::Complex(z) => z.is_nan(),
            _ => false,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            NumericValue::Float(f) => f.is_finite(),
            NumericValue::Complex(z) => z.re.is_finite() && z.im.is_finite(),
            _ => true,
        }
    }

    pub fn is_real(&self) -> bool {
        !matches!(self, NumericValue::Complex(_))
    }

    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            NumericValue::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_rational(&self) -> Option<BigRational> {
        match self {
            NumericValue::Integer(n) => Some(BigRational::from_integer(n.clone())),
            NumericValue::Rational(r) => Some(r.clone()),
            _ => None,
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.as_bigint().and_then(ToPrimitive::to_i64)
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            NumericValue::Integer(n) => n.to_f64().unwrap_or(f64::NAN),
            NumericValue::Rational(r) => rational::to_f64(r),
            NumericValue::Float(f) => *f,
            NumericValue::Decimal(d) => decimal::to_f64(d),
            NumericValue::Complex(z) => {
                if z.is_real() {
                    z.re
                } else {
                    f64::NAN
                }
            }
        }
    }

    pub fn to_complex(&self) -> Complex {
        match self {
            NumericValue::Complex(z) => *z,
            other => Complex::from_real(other.to_f64()),
        }
    }

    /// `None` for non-finite and complex values.
    pub fn to_decimal(&self, precision: usize) -> Option<DBig> {
        match self {
            NumericValue::Integer(n) => Some(decimal::from_bigint(n, precision)),
            NumericValue::Rational(r) => Some(decimal::from_rational(r, precision)),
            NumericValue::Float(f) => decimal::from_f64(*f, precision),
            NumericValue::Decimal(d) => Some(decimal::round_to(d.clone(), precision)),
            NumericValue::Complex(_) => None,
        }
    }

    /// Inexact rendition for the `N` tier.
    ///
    /// Integers stay exact; rationals become floats or decimals depending on
    /// the mode; floats and decimals are converted to the mode's
    /// representation.
    pub fn approximate(&self, ctx: &NumericContext) -> NumericValue {
        match (self, ctx.mode) {
            (NumericValue::Integer(_), _) | (NumericValue::Complex(_), _) => self.clone(),
            (NumericValue::Rational(r), NumericMode::Machine) => {
                NumericValue::Float(rational::to_f64(r))
            }
            (NumericValue::Rational(r), NumericMode::Arbitrary) => {
                NumericValue::Decimal(decimal::from_rational(r, ctx.precision))
            }
            (NumericValue::Decimal(d), NumericMode::Machine) => {
                NumericValue::Float(decimal::to_f64(d))
            }
            (NumericValue::Float(f), NumericMode::Arbitrary) => match decimal::from_f64(*f, ctx.precision) {
                Some(d) => NumericValue::Decimal(d),
                None => self.clone(),
            },
            _ => self.clone(),
        }
    }

    fn promote(&self, rhs: &NumericValue, ctx: &NumericContext) -> Promoted {
        if let (Some(a), Some(b)) = (self.as_rational(), rhs.as_rational()) {
            return Promoted::Exact(a, b);
        }
        if !self.is_real() || !rhs.is_real() {
            return Promoted::Complex(self.to_complex(), rhs.to_complex());
        }
        if ctx.is_arbitrary() {
            if let (Some(a), Some(b)) = (self.to_decimal(ctx.precision), rhs.to_decimal(ctx.precision)) {
                if matches!(self, NumericValue::Float(_)) || matches!(rhs, NumericValue::Float(_)) {
                    debug!("promoting machine float operand to decimal");
                }
                return Promoted::Decimal(a, b);
            }
        } else if matches!(self, NumericValue::Decimal(_)) || matches!(rhs, NumericValue::Decimal(_)) {
            debug!("demoting decimal operand to machine float");
        }
        Promoted::Machine(self.to_f64(), rhs.to_f64())
    }

    pub fn add(&self, rhs: &NumericValue, ctx: &NumericContext) -> NumericValue {
        match self.promote(rhs, ctx) {
            Promoted::Exact(a, b) => NumericValue::rational(a + b),
            Promoted::Machine(a, b) => NumericValue::Float(a + b),
            Promoted::Decimal(a, b) => NumericValue::Decimal(decimal::round_to(a + b, ctx.precision)),
            Promoted::Complex(a, b) => NumericValue::complex(a + b),
        }
    }

    pub fn sub(&self, rhs: &NumericValue, ctx: &NumericContext) -> NumericValue {
        self.add(&rhs.neg(), ctx)
    }

    pub fn mul(&self, rhs: &NumericValue, ctx: &NumericContext) -> NumericValue {
        match self.promote(rhs, ctx) {
            Promoted::Exact(a, b) => NumericValue::rational(a * b),
            Promoted::Machine(a, b) => NumericValue::Float(a * b),
            Promoted::Decimal(a, b) => NumericValue::Decimal(decimal::round_to(a * b, ctx.precision)),
            Promoted::Complex(a, b) => NumericValue::complex(a * b),
        }
    }

    /// Exact division by zero is an error; inexact division follows IEEE.
    pub fn div(&self, rhs: &NumericValue, ctx: &NumericContext) -> Result<NumericValue, NumericError> {
        match self.promote(rhs, ctx) {
            Promoted::Exact(a, b) => {
                if b.is_zero() {
                    Err(NumericError::DivisionByZero)
                } else {
                    Ok(NumericValue::rational(a / b))
                }
            }
            Promoted::Machine(a, b) => Ok(NumericValue::Float(a / b)),
            Promoted::Decimal(a, b) => {
                if decimal::is_zero(&b) {
                    Ok(NumericValue::Float(decimal::to_f64(&a) / 0.0))
                } else {
                    Ok(NumericValue::Decimal(decimal::round_to(a / b, ctx.precision)))
                }
            }
            Promoted::Complex(a, b) => Ok(NumericValue::complex(a / b)),
        }
    }

    pub fn pow(&self, exponent: &NumericValue, ctx: &NumericContext) -> Result<NumericValue, NumericError> {
        if let (Some(b), Some(e)) = (self.as_rational(), exponent.as_rational()) {
            match rational::rational_pow(&b, &e) {
                Ok(Some(r)) => return Ok(NumericValue::rational(r)),
                Err(NumericError::DivisionByZero) => return Err(NumericError::DivisionByZero),
                Ok(None) if !ctx.approximate => return Err(NumericError::Inexact),
                Err(err) if !ctx.approximate => return Err(err),
                _ => {}
            }
        }
        let needs_complex = !self.is_real()
            || !exponent.is_real()
            || (self.is_negative() && !exponent.is_integral());
        if needs_complex {
            return Ok(NumericValue::complex(self.to_complex().powc(exponent.to_complex())));
        }
        if ctx.is_arbitrary() && self.is_finite() && exponent.is_finite() {
            if let (Some(b), Some(e)) = (self.to_decimal(ctx.precision), exponent.to_decimal(ctx.precision)) {
                if decimal::is_zero(&b) {
                    return Ok(if exponent.is_negative() {
                        NumericValue::Float(f64::INFINITY)
                    } else {
                        NumericValue::Decimal(decimal::from_i64(0, ctx.precision))
                    });
                }
                if let Some(n) = exponent.to_i64().or_else(|| {
                    exponent.is_integral().then(|| exponent.to_f64() as i64)
                }) {
                    return Ok(NumericValue::Decimal(decimal::powi(&b, n, ctx.precision)));
                }
                return Ok(NumericValue::Decimal(decimal::powf(&b, &e, ctx.precision)));
            }
        }
        Ok(NumericValue::Float(self.to_f64().powf(exponent.to_f64())))
    }

    pub fn neg(&self) -> NumericValue {
        match self {
            NumericValue::Integer(n) => NumericValue::Integer(-n),
            NumericValue::Rational(r) => NumericValue::Rational(-r),
            NumericValue::Float(f) => NumericValue::Float(-f),
            NumericValue::Decimal(d) => NumericValue::Decimal(-d.clone()),
            NumericValue::Complex(z) => NumericValue::Complex(-*z),
        }
    }

    pub fn abs(&self) -> NumericValue {
        match self {
            NumericValue::Integer(n) => NumericValue::Integer(n.abs()),
            NumericValue::Rational(r) => NumericValue::Rational(r.abs()),
            NumericValue::Float(f) => NumericValue::Float(f.abs()),
            NumericValue::Decimal(d) => NumericValue::Decimal(decimal::abs(d)),
            NumericValue::Complex(z) => NumericValue::Float(z.abs()),
        }
    }

    /// `-1`, `0` or `1` for reals; `z / |z|` for complex values.
    pub fn sign(&self) -> NumericValue {
        match self {
            NumericValue::Complex(z) => {
                let r = z.abs();
                NumericValue::complex(Complex::new(z.re / r, z.im / r))
            }
            v if v.is_nan() => NumericValue::Float(f64::NAN),
            v if v.is_zero() => NumericValue::zero(),
            v if v.is_negative() => NumericValue::from_i64(-1),
            _ => NumericValue::one(),
        }
    }

    fn round_with(
        &self,
        exact: impl Fn(&BigRational) -> BigRational,
        machine: impl Fn(f64) -> f64,
        arbitrary: impl Fn(&DBig) -> Option<BigInt>,
    ) -> Result<NumericValue, NumericError> {
        match self {
            NumericValue::Integer(_) => Ok(self.clone()),
            NumericValue::Rational(r) => Ok(NumericValue::rational(exact(r))),
            NumericValue::Float(f) if !f.is_finite() => Ok(self.clone()),
            NumericValue::Float(f) => BigInt::from_f64(machine(*f))
                .map(NumericValue::Integer)
                .ok_or(NumericError::Undefined("rounding")),
            NumericValue::Decimal(d) => arbitrary(d)
                .map(NumericValue::Integer)
                .ok_or(NumericError::Undefined("rounding")),
            NumericValue::Complex(_) => Err(NumericError::Undefined("rounding a complex value")),
        }
    }

    pub fn floor(&self) -> Result<NumericValue, NumericError> {
        self.round_with(|r| r.floor(), f64::floor, decimal::floor)
    }

    pub fn ceil(&self) -> Result<NumericValue, NumericError> {
        self.round_with(|r| r.ceil(), f64::ceil, decimal::ceil)
    }

    /// Half away from zero.
    pub fn round(&self) -> Result<NumericValue, NumericError> {
        self.round_with(|r| r.round(), f64::round, decimal::round)
    }

    pub fn sqrt(&self, ctx: &NumericContext) -> Result<NumericValue, NumericError> {
        if let Some(r) = self.as_rational() {
            if !r.is_negative() {
                if let Some(root) = rational::rational_root(&r, 2) {
                    return Ok(NumericValue::rational(root));
                }
            }
            if !ctx.approximate {
                return Err(NumericError::Inexact);
            }
        }
        match self {
            NumericValue::Complex(z) => Ok(NumericValue::complex(z.sqrt())),
            v if v.is_negative() => {
                let magnitude = v.neg().sqrt(&ctx.with_approximation(true))?;
                Ok(NumericValue::complex(Complex::new(0.0, magnitude.to_f64())))
            }
            v if ctx.is_arbitrary() && v.is_finite() => match v.to_decimal(ctx.precision) {
                Some(d) => Ok(NumericValue::Decimal(decimal::sqrt(&d, ctx.precision))),
                None => Ok(NumericValue::Float(v.to_f64().sqrt())),
            },
            v => Ok(NumericValue::Float(v.to_f64().sqrt())),
        }
    }

    /// Values that are exact at exact arguments (`exp(0) = 1`, `ln(1) = 0`, ...).
    fn exact_special(&self, f: Transcendental) -> Option<NumericValue> {
        if self.is_exact() && self.is_zero() {
            return match f {
                Transcendental::Exp | Transcendental::Cos => Some(NumericValue::one()),
                Transcendental::Ln => None,
                Transcendental::Arccos => None,
                _ => Some(NumericValue::zero()),
            };
        }
        if self.is_exact() && self.is_one() {
            return match f {
                Transcendental::Ln | Transcendental::Arccos => Some(NumericValue::zero()),
                _ => None,
            };
        }
        None
    }

    pub fn apply(&self, f: Transcendental, ctx: &NumericContext) -> Result<NumericValue, NumericError> {
        if let Some(v) = self.exact_special(f) {
            return Ok(v);
        }
        if f == Transcendental::Ln && self.is_zero() {
            return Ok(NumericValue::Float(f64::NEG_INFINITY));
        }
        if self.is_exact() && !ctx.approximate {
            return Err(NumericError::Inexact);
        }
        if let NumericValue::Complex(z) = self {
            return Ok(NumericValue::complex(f.complex(*z)));
        }
        let x = self.to_f64();
        if f.needs_complex(x) {
            return Ok(NumericValue::complex(f.complex(Complex::from_real(x))));
        }
        if ctx.is_arbitrary() && self.is_finite() {
            if let Some(d) = self.to_decimal(ctx.precision) {
                return Ok(NumericValue::Decimal(f.decimal(&d, ctx.precision)));
            }
        }
        Ok(NumericValue::Float(f.real(x)))
    }

    /// Logarithm in an arbitrary base; exact when `base^k == self` for an
    /// integer `k`.
    pub fn log(&self, base: &NumericValue, ctx: &NumericContext) -> Result<NumericValue, NumericError> {
        if let (Some(x), Some(b)) = (self.as_rational(), base.as_rational()) {
            if let Some(k) = rational::exact_log(&x, &b) {
                return Ok(NumericValue::from_i64(k));
            }
            if !ctx.approximate {
                return Err(NumericError::Inexact);
            }
        }
        let approx = ctx.with_approximation(true);
        let numerator = self.apply(Transcendental::Ln, &approx)?;
        let denominator = base.apply(Transcendental::Ln, &approx)?;
        numerator.div(&denominator, &approx)
    }

    pub fn factorial(&self, ctx: &NumericContext) -> Result<NumericValue, NumericError> {
        if let NumericValue::Integer(n) = self {
            if n.is_negative() {
                return Err(NumericError::Undefined("factorial of a negative integer"));
            }
            match n.to_u64() {
                Some(k) if k <= rational::MAX_EXACT_FACTORIAL => {
                    return Ok(NumericValue::Integer(rational::factorial(k)))
                }
                _ if !ctx.approximate => return Err(NumericError::Overflow("factorial")),
                _ => return Ok(NumericValue::Float(f64::INFINITY)),
            }
        }
        if self.is_exact() && !ctx.approximate {
            return Err(NumericError::Inexact);
        }
        if !self.is_real() {
            return Err(NumericError::Undefined("factorial of a complex value"));
        }
        let x = self.to_f64();
        if x < 0.0 && x.fract() == 0.0 {
            return Err(NumericError::Undefined("factorial of a negative integer"));
        }
        let value = NumericValue::Float(gamma(x + 1.0));
        Ok(value.approximate(ctx))
    }

    /// Total order on reals; `None` for NaN and complex values.
    pub fn compare(&self, rhs: &NumericValue) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.as_rational(), rhs.as_rational()) {
            return Some(a.cmp(&b));
        }
        if !self.is_real() || !rhs.is_real() {
            return None;
        }
        let uses_decimal =
            matches!(self, NumericValue::Decimal(_)) || matches!(rhs, NumericValue::Decimal(_));
        if uses_decimal && self.is_finite() && rhs.is_finite() {
            let precision = self.decimal_precision().max(rhs.decimal_precision());
            if let (Some(a), Some(b)) = (self.to_decimal(precision), rhs.to_decimal(precision)) {
                return a.partial_cmp(&b);
            }
        }
        self.to_f64().partial_cmp(&rhs.to_f64())
    }

    fn decimal_precision(&self) -> usize {
        match self {
            NumericValue::Decimal(d) => d.precision().max(crate::context::MACHINE_PRECISION),
            _ => crate::context::MACHINE_PRECISION + 2,
        }
    }

    /// Equality within an absolute tolerance.
    pub fn approx_eq(&self, rhs: &NumericValue, tolerance: f64) -> bool {
        if let (Some(a), Some(b)) = (self.as_rational(), rhs.as_rational()) {
            return a == b;
        }
        let diff = self.to_complex() - rhs.to_complex();
        diff.abs() <= tolerance
    }
}

/// Lanczos approximation (g = 7, n = 9).
fn gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFICIENTS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if x < 0.5 {
        return std::f64::consts::PI / ((std::f64::consts::PI * x).sin() * gamma(1.0 - x));
    }
    let x = x - 1.0;
    let mut acc = COEFFICIENTS[0];
    for (i, c) in COEFFICIENTS.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + G + 0.5;
    (2.0 * std::f64::consts::PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * acc
}

/// Structural equality: same representation and same value. Floats compare
/// by bit pattern so the relation is reflexive for NaN.
impl PartialEq for NumericValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NumericValue::Integer(a), NumericValue::Integer(b)) => a == b,
            (NumericValue::Rational(a), NumericValue::Rational(b)) => a == b,
            (NumericValue::Float(a), NumericValue::Float(b)) => a.to_bits() == b.to_bits(),
            (NumericValue::Decimal(a), NumericValue::Decimal(b)) => a == b,
            (NumericValue::Complex(a), NumericValue::Complex(b)) => {
                a.re.to_bits() == b.re.to_bits() && a.im.to_bits() == b.im.to_bits()
            }
            _ => false,
        }
    }
}

impl Eq for NumericValue {}

impl Hash for NumericValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            NumericValue::Integer(n) => n.hash(state),
            NumericValue::Rational(r) => {
                r.numer().hash(state);
                r.denom().hash(state);
            }
            NumericValue::Float(f) => f.to_bits().hash(state),
            NumericValue::Decimal(d) => d.to_string().hash(state),
            NumericValue::Complex(z) => {
                z.re.to_bits().hash(state);
                z.im.to_bits().hash(state);
            }
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Integer(n) => write!(f, "{n}"),
            NumericValue::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            NumericValue::Float(x) if x.is_nan() => write!(f, "NaN"),
            NumericValue::Float(x) if x.is_infinite() => {
                write!(f, "{}", if *x > 0.0 { "+Infinity" } else { "-Infinity" })
            }
            // Debug keeps a fractional part or exponent so `3.0` never reads back as an Integer.
            NumericValue::Float(x) => write!(f, "{x:?}"),
            NumericValue::Decimal(d) => {
                let text = d.to_string();
                if text.contains(['.', 'e', 'E']) {
                    f.write_str(&text)
                } else {
                    write!(f, "{text}.0")
                }
            }
            NumericValue::Complex(z) => write!(f, "{z}"),
        }
    }
}
