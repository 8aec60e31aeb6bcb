//! Numeric tower for the compute engine.
//!
//! [`NumericValue`] covers exact integers and rationals (`num-bigint`,
//! `num-rational`), machine floats, arbitrary-precision decimals (`dashu`)
//! and machine-precision complex values. A [`NumericContext`] selects the
//! representation of inexact results and whether approximation is allowed.

pub mod complex;
pub mod context;
pub mod decimal;
pub mod error;
pub mod rational;
pub mod value;

pub use complex::Complex;
pub use context::{NumericContext, NumericMode, DEFAULT_DECIMAL_PRECISION, MACHINE_PRECISION};
pub use error::NumericError;
pub use value::{NumericValue, Transcendental};
