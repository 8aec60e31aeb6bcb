//! Engine configuration.
//!
//! Everything the host can tune lives in [`EngineOptions`]; the struct is
//! serde-friendly so a CLI or service can load it from a config file.
//! Callbacks (the diagnostic sink) are registered on the engine instead.

use ce_latex::{LibraryCategory, ParseOptions};
use ce_numeric::{NumericContext, NumericMode, DEFAULT_DECIMAL_PRECISION, MACHINE_PRECISION};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineOptions {
    /// Backing representation for inexact numbers.
    pub numeric_mode: NumericMode,
    /// Significant digits in arbitrary mode. Machine mode always uses an
    /// `f64`.
    pub precision: usize,
    /// Absolute tolerance for `Approx` and numeric comparisons.
    pub tolerance: f64,
    /// Recursion limit shared by the parser, boxing and evaluation.
    pub max_depth: usize,
    /// Upper bound on the terms a `Sum` or `Product` expands.
    pub max_sum_iterations: usize,
    /// Dictionary categories the parser recognizes.
    pub categories: Vec<LibraryCategory>,
    /// Single letters read as function application before `(`.
    pub function_names: Vec<String>,
    /// Annotate parse output with source spans and the verbatim LaTeX.
    pub preserve_fidelity: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            numeric_mode: NumericMode::Machine,
            precision: DEFAULT_DECIMAL_PRECISION,
            tolerance: 1e-10,
            max_depth: 256,
            max_sum_iterations: 10_000,
            categories: LibraryCategory::ALL.to_vec(),
            function_names: ["f", "g", "h"].map(String::from).to_vec(),
            preserve_fidelity: false,
        }
    }
}

impl EngineOptions {
    /// Effective precision in digits for the current mode.
    pub fn effective_precision(&self) -> usize {
        match self.numeric_mode {
            NumericMode::Machine => MACHINE_PRECISION,
            NumericMode::Arbitrary => self.precision.max(1),
        }
    }

    /// Exact-arithmetic context; `N` switches approximation on.
    pub fn numeric_context(&self) -> NumericContext {
        let ctx = match self.numeric_mode {
            NumericMode::Machine => NumericContext::machine(),
            NumericMode::Arbitrary => NumericContext::arbitrary(self.precision),
        };
        ctx.with_tolerance(self.tolerance)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            preserve_fidelity: self.preserve_fidelity,
            max_depth: self.max_depth,
            function_names: self.function_names.clone(),
        }
    }

    /// Whether the parser runs over the full default dictionary.
    pub fn uses_all_categories(&self) -> bool {
        LibraryCategory::ALL
            .iter()
            .all(|c| self.categories.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EngineOptions::default();
        assert_eq!(options.numeric_mode, NumericMode::Machine);
        assert_eq!(options.effective_precision(), MACHINE_PRECISION);
        assert!(options.uses_all_categories());
        assert!(!options.numeric_context().approximate);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let options: EngineOptions =
            serde_json::from_str(r#"{"numeric-mode":"arbitrary","precision":40}"#)
                .expect("valid options");
        assert_eq!(options.numeric_mode, NumericMode::Arbitrary);
        assert_eq!(options.effective_precision(), 40);
        assert_eq!(options.max_depth, 256);
        assert!(options.numeric_context().is_arbitrary());
    }
}
