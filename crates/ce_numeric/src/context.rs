//! Numeric evaluation context.

use serde::{Deserialize, Serialize};

/// Precision used when nothing else is configured in arbitrary mode.
pub const DEFAULT_DECIMAL_PRECISION: usize = 100;
/// Significant decimal digits of an `f64`.
pub const MACHINE_PRECISION: usize = 15;

/// Backing representation for inexact values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericMode {
    /// IEEE-754 double precision.
    #[default]
    Machine,
    /// Arbitrary-precision decimals (`precision` significant digits).
    Arbitrary,
}

/// How arithmetic should behave for one call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericContext {
    pub mode: NumericMode,
    /// Significant digits for decimal results.
    pub precision: usize,
    /// When false, operations whose exact result is not representable
    /// return [`crate::NumericError::Inexact`] instead of rounding.
    pub approximate: bool,
    /// Absolute tolerance for approximate equality.
    pub tolerance: f64,
}

impl NumericContext {
    pub fn machine() -> Self {
        Self {
            mode: NumericMode::Machine,
            precision: MACHINE_PRECISION,
            approximate: false,
            tolerance: 1e-10,
        }
    }

    pub fn arbitrary(precision: usize) -> Self {
        Self {
            mode: NumericMode::Arbitrary,
            precision: precision.max(1),
            approximate: false,
            tolerance: 1e-10,
        }
    }

    pub fn with_approximation(self, approximate: bool) -> Self {
        Self {
            approximate,
            ..self
        }
    }

    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }

    pub fn is_arbitrary(&self) -> bool {
        self.mode == NumericMode::Arbitrary
    }
}

impl Default for NumericContext {
    fn default() -> Self {
        Self::machine()
    }
}
