//! Machine-precision complex values.
//!
//! Complex results only arise from approximation (square roots and logarithms
//! of negative reals, inverse trig outside `[-1, 1]`), so an `f64` pair is
//! enough.

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::ops;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex::new(0.0, 0.0);
    pub const ONE: Complex = Complex::new(1.0, 0.0);
    pub const I: Complex = Complex::new(0.0, 1.0);

    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub const fn from_real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    pub fn is_real(&self) -> bool {
        self.im == 0.0
    }

    pub fn is_nan(&self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    pub fn abs(&self) -> f64 {
        self.re.hypot(self.im)
    }

    pub fn arg(&self) -> f64 {
        self.im.atan2(self.re)
    }

    pub fn conj(&self) -> Self {
        Complex::new(self.re, -self.im)
    }

    pub fn exp(&self) -> Self {
        let r = self.re.exp();
        Complex::new(r * self.im.cos(), r * self.im.sin())
    }

    /// Principal branch.
    pub fn ln(&self) -> Self {
        Complex::new(self.abs().ln(), self.arg())
    }

    /// Principal square root.
    pub fn sqrt(&self) -> Self {
        if self.is_real() && self.re >= 0.0 {
            return Complex::from_real(self.re.sqrt());
        }
        let r = self.abs();
        let re = ((r + self.re) / 2.0).sqrt();
        let im = ((r - self.re) / 2.0).sqrt();
        Complex::new(re, if self.im < 0.0 { -im } else { im })
    }

    pub fn powc(&self, exponent: Complex) -> Self {
        if *self == Complex::ZERO {
            return if exponent.re > 0.0 {
                Complex::ZERO
            } else {
                Complex::new(f64::NAN, f64::NAN)
            };
        }
        (exponent * self.ln()).exp()
    }

    pub fn sin(&self) -> Self {
        Complex::new(
            self.re.sin() * self.im.cosh(),
            self.re.cos() * self.im.sinh(),
        )
    }

    pub fn cos(&self) -> Self {
        Complex::new(
            self.re.cos() * self.im.cosh(),
            -self.re.sin() * self.im.sinh(),
        )
    }

    pub fn tan(&self) -> Self {
        self.sin() / self.cos()
    }

    /// `asin(z) = -i ln(iz + sqrt(1 - z^2))`
    pub fn asin(&self) -> Self {
        let iz = Complex::I * *self;
        let root = (Complex::ONE - *self * *self).sqrt();
        -(Complex::I * (iz + root).ln())
    }

    pub fn acos(&self) -> Self {
        Complex::from_real(FRAC_PI_2) - self.asin()
    }

    /// `atan(z) = (i/2) ln((i + z) / (i - z))`
    pub fn atan(&self) -> Self {
        let half_i = Complex::new(0.0, 0.5);
        half_i * ((Complex::I + *self) / (Complex::I - *self)).ln()
    }
}

impl ops::Add for Complex {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl ops::Sub for Complex {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl ops::Mul for Complex {
    type Output = Complex;
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl ops::Div for Complex {
    type Output = Complex;
    fn div(self, rhs: Complex) -> Complex {
        let denom = rhs.re * rhs.re + rhs.im * rhs.im;
        Complex::new(
            (self.re * rhs.re + self.im * rhs.im) / denom,
            (self.im * rhs.re - self.re * rhs.im) / denom,
        )
    }
}

impl ops::Neg for Complex {
    type Output = Complex;
    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.re, self.im) {
            (re, im) if im == 0.0 => write!(f, "{re}"),
            (re, im) if re == 0.0 => write!(f, "{im}i"),
            (re, im) if im > 0.0 => write!(f, "{re}+{im}i"),
            (re, im) => write!(f, "{re}-{}i", -im),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn close(a: Complex, b: Complex) -> bool {
        (a.re - b.re).abs() < 1e-12 && (a.im - b.im).abs() < 1e-12
    }

    #[test]
    fn sqrt_of_negative_is_imaginary() {
        assert!(close(Complex::from_real(-4.0).sqrt(), Complex::new(0.0, 2.0)));
    }

    #[test]
    fn ln_of_negative_one() {
        assert!(close(Complex::from_real(-1.0).ln(), Complex::new(0.0, PI)));
    }

    #[test]
    fn euler_identity() {
        let z = Complex::new(0.0, PI).exp();
        assert!(close(z, Complex::from_real(-1.0)));
    }

    #[test]
    fn asin_outside_unit_interval() {
        let z = Complex::from_real(2.0).asin();
        assert!((z.re - FRAC_PI_2).abs() < 1e-12);
        assert!(z.sin().re - 2.0 < 1e-9);
    }

    #[test]
    fn display() {
        assert_eq!(Complex::new(1.0, -2.0).to_string(), "1-2i");
        assert_eq!(Complex::new(0.0, 3.0).to_string(), "3i");
    }
}
