//! Exact helpers on big integers and rationals.

use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

use crate::error::NumericError;

/// Largest exponent magnitude computed exactly.
pub const MAX_EXACT_EXPONENT: u64 = 100_000;
/// Cap on the bit length of exact power results.
const MAX_EXACT_BITS: u64 = 1 << 20;
/// Largest `n` for which `n!` is computed exactly.
pub const MAX_EXACT_FACTORIAL: u64 = 10_000;
/// Trial-division bound when splitting out square factors.
const SQUARE_FACTOR_BOUND: u64 = 100_000;

/// Convert decimal text (`"8.2"`, `".5"`, `"-1.25e3"`) to an exact rational.
///
/// For `A.B` with `k` fractional digits the value is `(A * 10^k + B) / 10^k`,
/// then scaled by the exponent.
pub fn decimal_to_rational(text: &str) -> Option<BigRational> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], body[pos + 1..].parse::<i32>().ok()?),
        None => (body, 0),
    };
    let (integer_part, fractional_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if integer_part.is_empty() && fractional_part.is_empty() {
        return None;
    }
    if !integer_part
        .chars()
        .chain(fractional_part.chars())
        .all(|c| c.is_ascii_digit())
    {
        return None;
    }
    if exponent.unsigned_abs() > 10_000 {
        return None;
    }

    let ten = BigInt::from(10);
    let denominator = ten.pow(fractional_part.len() as u32);
    let int_val: BigInt = if integer_part.is_empty() {
        BigInt::zero()
    } else {
        integer_part.parse().ok()?
    };
    let frac_val: BigInt = if fractional_part.is_empty() {
        BigInt::zero()
    } else {
        fractional_part.parse().ok()?
    };
    let mut value = BigRational::new(int_val * &denominator + frac_val, denominator);
    let scale = BigRational::from_integer(ten.pow(exponent.unsigned_abs()));
    if exponent >= 0 {
        value *= scale;
    } else {
        value /= scale;
    }
    Some(if negative { -value } else { value })
}

/// Exact integer `k`-th root, if `n` is a perfect power.
pub fn exact_root(n: &BigInt, k: u32) -> Option<BigInt> {
    if k == 0 {
        return None;
    }
    if n.is_negative() {
        return if k % 2 == 1 {
            exact_root(&-n, k).map(|r| -r)
        } else {
            None
        };
    }
    let root = n.nth_root(k);
    (root.pow(k) == *n).then_some(root)
}

pub fn rational_root(r: &BigRational, k: u32) -> Option<BigRational> {
    let numer = exact_root(r.numer(), k)?;
    let denom = exact_root(r.denom(), k)?;
    Some(BigRational::new(numer, denom))
}

/// Exact `base^exponent`.
///
/// `Ok(None)` when the result is not rational (e.g. `2^(1/2)`).
pub fn rational_pow(
    base: &BigRational,
    exponent: &BigRational,
) -> Result<Option<BigRational>, NumericError> {
    if base.is_zero() {
        return if exponent.is_negative() {
            Err(NumericError::DivisionByZero)
        } else if exponent.is_zero() {
            Ok(Some(BigRational::one()))
        } else {
            Ok(Some(BigRational::zero()))
        };
    }
    if base.is_one() || exponent.is_zero() {
        return Ok(Some(BigRational::one()));
    }
    let Some(q) = exponent.denom().to_u32() else {
        return Ok(None);
    };
    let p = exponent
        .numer()
        .to_i64()
        .ok_or(NumericError::Overflow("exponent"))?;
    if p.unsigned_abs() > MAX_EXACT_EXPONENT {
        return Err(NumericError::Overflow("exponent"));
    }
    let bits = base.numer().bits().max(base.denom().bits());
    if bits.saturating_mul(p.unsigned_abs()) / u64::from(q) > MAX_EXACT_BITS {
        return Err(NumericError::Overflow("power"));
    }

    let root = if q == 1 {
        base.clone()
    } else {
        match rational_root(base, q) {
            Some(r) => r,
            None => return Ok(None),
        }
    };
    let e = p.unsigned_abs() as u32;
    let numer = root.numer().pow(e);
    let denom = root.denom().pow(e);
    Ok(Some(if p < 0 {
        BigRational::new(denom, numer)
    } else {
        BigRational::new(numer, denom)
    }))
}

/// Integer `k` with `base^k == x`, when one exists.
pub fn exact_log(x: &BigRational, base: &BigRational) -> Option<i64> {
    let one = BigRational::one();
    if !x.is_positive() || !base.is_positive() || *base == one {
        return None;
    }
    if *base < one {
        return exact_log(x, &base.recip()).map(|k| -k);
    }
    if *x < one {
        return exact_log(&x.recip(), base).map(|k| -k);
    }
    let mut power = one;
    let mut k = 0i64;
    while power < *x {
        power *= base;
        k += 1;
        if k > 4096 {
            return None;
        }
    }
    (power == *x).then_some(k)
}

pub fn factorial(n: u64) -> BigInt {
    (2..=n).fold(BigInt::one(), |acc, k| acc * k)
}

/// Split a positive integer as `outside^2 * inside`.
///
/// Square factors are found by trial division up to a fixed bound, so
/// `inside` may still hold squares of large primes.
pub fn square_factor_split(n: &BigInt) -> (BigInt, BigInt) {
    let mut remaining = n.abs();
    let mut outside = BigInt::one();
    let mut inside = BigInt::one();
    let mut d = 2u64;
    while d <= SQUARE_FACTOR_BOUND {
        let divisor = BigInt::from(d);
        if &divisor * &divisor > remaining {
            break;
        }
        let mut multiplicity = 0u32;
        while (&remaining % &divisor).is_zero() {
            remaining /= &divisor;
            multiplicity += 1;
        }
        outside *= divisor.pow(multiplicity / 2);
        if multiplicity % 2 == 1 {
            inside *= &divisor;
        }
        d += if d == 2 { 1 } else { 2 };
    }
    (outside, inside * remaining)
}

/// Best rational approximation of `x` within `tolerance`, by continued
/// fractions.
pub fn rationalize(x: f64, tolerance: f64) -> Option<BigRational> {
    if !x.is_finite() {
        return None;
    }
    let (mut h_prev, mut h) = (BigInt::zero(), BigInt::one());
    let (mut k_prev, mut k) = (BigInt::one(), BigInt::zero());
    let mut v = x;
    for _ in 0..64 {
        let a = v.floor();
        let a_int = BigInt::from_f64(a)?;
        let h_next = &a_int * &h + &h_prev;
        let k_next = &a_int * &k + &k_prev;
        h_prev = std::mem::replace(&mut h, h_next);
        k_prev = std::mem::replace(&mut k, k_next);
        let candidate = BigRational::new(h.clone(), k.clone());
        let frac = v - a;
        if (to_f64(&candidate) - x).abs() <= tolerance || frac == 0.0 {
            return Some(candidate);
        }
        v = 1.0 / frac;
    }
    if k.is_zero() {
        None
    } else {
        Some(BigRational::new(h, k))
    }
}

/// Nearest `f64`, scaling oversized operands so the quotient stays finite.
pub fn to_f64(r: &BigRational) -> f64 {
    let shift = r
        .numer()
        .bits()
        .max(r.denom().bits())
        .saturating_sub(1000);
    let (numer, denom) = if shift > 0 {
        (r.numer() >> shift as usize, r.denom() >> shift as usize)
    } else {
        (r.numer().clone(), r.denom().clone())
    };
    match (numer.to_f64(), denom.to_f64()) {
        (Some(n), Some(d)) if d != 0.0 => n / d,
        (Some(n), _) if r.numer().sign() != Sign::NoSign => {
            // Denominator underflowed after scaling: the value is huge.
            n.signum() * f64::INFINITY
        }
        _ => 0.0,
    }
}
