//! Arbitrary-precision decimal kernels on top of `dashu`'s `DBig`.
//!
//! Only the basic field operations of `DBig` are used; roots, the
//! exponential, logarithm and trigonometric functions are computed here by
//! series and Newton iteration at a few guard digits above the requested
//! precision.

use dashu::float::DBig;
use dashu::integer::{IBig, UBig};
use num_bigint::{BigInt, Sign};
use num_rational::BigRational;

use crate::error::NumericError;

const GUARD_DIGITS: usize = 10;

/// Round to `precision` significant digits.
pub fn round_to(x: DBig, precision: usize) -> DBig {
    x.with_precision(precision).value()
}

pub fn from_i64(n: i64, precision: usize) -> DBig {
    round_to(DBig::from(IBig::from(n)), precision)
}

fn to_ibig(n: &BigInt) -> IBig {
    let (sign, bytes) = n.to_bytes_le();
    let magnitude = IBig::from(UBig::from_le_bytes(&bytes));
    if sign == Sign::Minus {
        -magnitude
    } else {
        magnitude
    }
}

pub fn from_bigint(n: &BigInt, precision: usize) -> DBig {
    round_to(DBig::from(to_ibig(n)), precision)
}

pub fn from_rational(r: &BigRational, precision: usize) -> DBig {
    let wp = precision + GUARD_DIGITS;
    let quotient = from_bigint(r.numer(), wp) / from_bigint(r.denom(), wp);
    round_to(quotient, precision)
}

/// `None` for NaN and infinities.
pub fn from_f64(x: f64, precision: usize) -> Option<DBig> {
    if !x.is_finite() {
        return None;
    }
    // `Display` for f64 is the shortest round-trip form and never uses an exponent.
    let text = format!("{x}");
    text.parse::<DBig>()
        .ok()
        .map(|d| round_to(d, precision))
}

/// Parse decimal text, with an optional `e` exponent.
pub fn parse(text: &str, precision: usize) -> Result<DBig, NumericError> {
    let invalid = || NumericError::Parse(text.to_string());
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(pos) => (
            &text[..pos],
            text[pos + 1..].parse::<i64>().map_err(|_| invalid())?,
        ),
        None => (text, 0),
    };
    let mantissa = mantissa.strip_prefix('+').unwrap_or(mantissa);
    let mantissa = if mantissa.ends_with('.') {
        &mantissa[..mantissa.len() - 1]
    } else {
        mantissa
    };
    let value = mantissa
        .parse::<DBig>()
        .map_err(|_| invalid())?;
    let value = round_to(value, precision + GUARD_DIGITS);
    let scaled = if exponent == 0 {
        value
    } else {
        let ten = from_i64(10, precision + GUARD_DIGITS);
        let scale = powi(&ten, exponent.abs(), precision + GUARD_DIGITS);
        if exponent > 0 {
            value * scale
        } else {
            value / scale
        }
    };
    Ok(round_to(scaled, precision))
}

pub fn to_f64(x: &DBig) -> f64 {
    x.to_f64().value()
}

/// Integer part, truncated toward zero.
pub fn trunc_to_bigint(x: &DBig) -> Option<BigInt> {
    x.trunc().to_int().value().to_string().parse::<BigInt>().ok()
}

pub fn is_zero(x: &DBig) -> bool {
    *x == DBig::ZERO
}

pub fn is_negative(x: &DBig) -> bool {
    *x < DBig::ZERO
}

pub fn abs(x: &DBig) -> DBig {
    if is_negative(x) {
        -x.clone()
    } else {
        x.clone()
    }
}

pub fn is_integral(x: &DBig) -> bool {
    x.trunc() == *x
}

pub fn floor(x: &DBig) -> Option<BigInt> {
    let t = trunc_to_bigint(x)?;
    if is_negative(x) && !is_integral(x) {
        Some(t - 1)
    } else {
        Some(t)
    }
}

pub fn ceil(x: &DBig) -> Option<BigInt> {
    let t = trunc_to_bigint(x)?;
    if !is_negative(x) && !is_integral(x) {
        Some(t + 1)
    } else {
        Some(t)
    }
}

/// Round half away from zero.
pub fn round(x: &DBig) -> Option<BigInt> {
    let half = from_i64(1, x.precision().max(2) + 1) / from_i64(2, x.precision().max(2) + 1);
    if is_negative(x) {
        trunc_to_bigint(&(x.clone() - half))
    } else {
        trunc_to_bigint(&(x.clone() + half))
    }
}

/// `x^n` by repeated squaring.
pub fn powi(x: &DBig, n: i64, precision: usize) -> DBig {
    let wp = precision + GUARD_DIGITS;
    let mut result = from_i64(1, wp);
    let mut base = round_to(x.clone(), wp);
    let mut e = n.unsigned_abs();
    while e > 0 {
        if e & 1 == 1 {
            result = result * base.clone();
        }
        base = base.clone() * base;
        e >>= 1;
    }
    if n < 0 {
        result = from_i64(1, wp) / result;
    }
    round_to(result, precision)
}

fn newton_iterations(wp: usize) -> usize {
    (usize::BITS - wp.leading_zeros()) as usize + 4
}

/// Square root of a non-negative value.
pub fn sqrt(x: &DBig, precision: usize) -> DBig {
    let wp = precision + GUARD_DIGITS;
    if is_zero(x) || is_negative(x) {
        return from_i64(0, precision);
    }
    let x = round_to(x.clone(), wp);
    let guess = to_f64(&x).sqrt();
    let mut y = from_f64(guess, wp)
        .filter(|g| !is_zero(g))
        .unwrap_or_else(|| x.clone());
    let two = from_i64(2, wp);
    for _ in 0..newton_iterations(wp) {
        y = (y.clone() + x.clone() / y) / two.clone();
    }
    round_to(y, precision)
}

pub fn exp(x: &DBig, precision: usize) -> DBig {
    let estimate = to_f64(x).abs();
    // Each halving step costs about log10(2) digits when squaring back.
    let halvings = if estimate > 0.5 {
        (estimate / 0.5).log2().ceil().min(4096.0) as usize
    } else {
        0
    };
    let wp = precision + GUARD_DIGITS + halvings / 3 + 1;
    let mut r = round_to(x.clone(), wp);
    let two = from_i64(2, wp);
    for _ in 0..halvings {
        r = r / two.clone();
    }
    let mut term = from_i64(1, wp);
    let mut sum = term.clone();
    for n in 1..(wp + 10) {
        term = term * r.clone() / from_i64(n as i64, wp);
        sum = sum + term.clone();
    }
    for _ in 0..halvings {
        sum = sum.clone() * sum;
    }
    round_to(sum, precision)
}

/// Natural logarithm of a positive value, by Halley iteration on `exp`.
pub fn ln(x: &DBig, precision: usize) -> DBig {
    let wp = precision + GUARD_DIGITS;
    let x = round_to(x.clone(), wp);
    let guess = to_f64(&x).ln();
    let mut y = from_f64(guess, wp).unwrap_or_else(|| from_i64(0, wp));
    let two = from_i64(2, wp);
    for _ in 0..newton_iterations(wp) {
        let e = exp(&y, wp);
        y = y + two.clone() * (x.clone() - e.clone()) / (x.clone() + e);
    }
    round_to(y, precision)
}

pub fn powf(x: &DBig, y: &DBig, precision: usize) -> DBig {
    let wp = precision + GUARD_DIGITS;
    exp(&(y.clone() * ln(x, wp)), precision)
}

/// `atan(1/n)` by its Taylor series.
fn atan_inv(n: i64, wp: usize) -> DBig {
    let n_sq = from_i64(n * n, wp);
    let mut power = from_i64(1, wp) / from_i64(n, wp);
    let mut sum = power.clone();
    let terms = (wp as f64 / ((n * n) as f64).log10()).ceil() as usize + 2;
    for k in 1..=terms {
        power = power / n_sq.clone();
        let term = power.clone() / from_i64(2 * k as i64 + 1, wp);
        sum = if k % 2 == 1 { sum - term } else { sum + term };
    }
    sum
}

/// π by Machin's formula: `π = 16 atan(1/5) - 4 atan(1/239)`.
pub fn pi(precision: usize) -> DBig {
    let wp = precision + GUARD_DIGITS;
    let value = from_i64(16, wp) * atan_inv(5, wp) - from_i64(4, wp) * atan_inv(239, wp);
    round_to(value, precision)
}

/// Reduce into `[-π, π]`.
fn reduce_angle(x: &DBig, wp: usize) -> DBig {
    let two_pi = pi(wp) * from_i64(2, wp);
    let turns = to_f64(&(x.clone() / two_pi.clone())).round();
    match from_f64(turns, wp) {
        Some(k) if !is_zero(&k) => x.clone() - k * two_pi,
        _ => x.clone(),
    }
}

fn series_terms(wp: usize) -> usize {
    wp / 2 + 25
}

pub fn sin(x: &DBig, precision: usize) -> DBig {
    let wp = precision + GUARD_DIGITS;
    let x = reduce_angle(&round_to(x.clone(), wp), wp);
    let x_sq = x.clone() * x.clone();
    let mut term = x.clone();
    let mut sum = x;
    for n in 1..series_terms(wp) {
        let k = 2 * n as i64;
        term = -(term * x_sq.clone()) / from_i64(k * (k + 1), wp);
        sum = sum + term.clone();
    }
    round_to(sum, precision)
}

pub fn cos(x: &DBig, precision: usize) -> DBig {
    let wp = precision + GUARD_DIGITS;
    let x = reduce_angle(&round_to(x.clone(), wp), wp);
    let x_sq = x.clone() * x;
    let mut term = from_i64(1, wp);
    let mut sum = term.clone();
    for n in 1..series_terms(wp) {
        let k = 2 * n as i64;
        term = -(term * x_sq.clone()) / from_i64((k - 1) * k, wp);
        sum = sum + term.clone();
    }
    round_to(sum, precision)
}

pub fn tan(x: &DBig, precision: usize) -> DBig {
    let wp = precision + GUARD_DIGITS;
    round_to(sin(x, wp) / cos(x, wp), precision)
}

pub fn atan(x: &DBig, precision: usize) -> DBig {
    let wp = precision + GUARD_DIGITS;
    if is_negative(x) {
        return -atan(&-x.clone(), precision);
    }
    let one = from_i64(1, wp);
    if *x > one {
        let half_pi = pi(wp) / from_i64(2, wp);
        let inverse = atan(&(one / round_to(x.clone(), wp)), wp);
        return round_to(half_pi - inverse, precision);
    }
    // Three argument halvings bring |y| below tan(π/32).
    let mut y = round_to(x.clone(), wp);
    for _ in 0..3 {
        y = y.clone() / (one.clone() + sqrt(&(one.clone() + y.clone() * y), wp));
    }
    let y_sq = y.clone() * y.clone();
    let mut power = y.clone();
    let mut sum = y;
    for k in 1..(wp / 2 + 5) {
        power = -(power * y_sq.clone());
        sum = sum + power.clone() / from_i64(2 * k as i64 + 1, wp);
    }
    round_to(sum * from_i64(8, wp), precision)
}

/// Defined on `[-1, 1]`; callers route other arguments to the complex path.
pub fn asin(x: &DBig, precision: usize) -> DBig {
    let wp = precision + GUARD_DIGITS;
    let one = from_i64(1, wp);
    let magnitude = abs(x);
    if magnitude >= one {
        let half_pi = round_to(pi(wp) / from_i64(2, wp), precision);
        return if is_negative(x) { -half_pi } else { half_pi };
    }
    let x = round_to(x.clone(), wp);
    let denom = sqrt(&(one - x.clone() * x.clone()), wp);
    atan(&(x / denom), precision)
}

pub fn acos(x: &DBig, precision: usize) -> DBig {
    let wp = precision + GUARD_DIGITS;
    let half_pi = pi(wp) / from_i64(2, wp);
    round_to(half_pi - asin(x, wp), precision)
}
