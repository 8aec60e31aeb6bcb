use serde::{Deserialize, Serialize};

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Attach source spans to every node and the verbatim LaTeX to the root.
    pub preserve_fidelity: bool,
    /// Nesting limit; deeper input yields a `nesting-too-deep` error node.
    pub max_depth: usize,
    /// Single-letter names parsed as function application when directly
    /// followed by `(`.
    pub function_names: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            preserve_fidelity: false,
            max_depth: 256,
            function_names: vec!["f".into(), "g".into(), "h".into()],
        }
    }
}
