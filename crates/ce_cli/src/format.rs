//! Text rendering of results and diagnostics.

use anyhow::Result;
use ce_engine::{BoxedExpr, Diagnostic, Engine};

use crate::config::OutputFormat;

pub fn render(engine: &Engine, expr: &BoxedExpr, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => expr.to_string(),
        OutputFormat::Pretty => serde_json::to_string_pretty(&expr.json())?,
        OutputFormat::Latex => engine.serialize(expr),
    })
}

/// One line per diagnostic, e.g. `warning[unbound-symbol]: 'q' has no definition`.
pub fn diagnostic_line(d: &Diagnostic) -> String {
    let severity = format!("{:?}", d.severity).to_lowercase();
    format!("{severity}[{}]: {}", d.code.as_str(), d.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ce_engine::ErrorCode;

    #[test]
    fn test_render_formats() {
        let engine = Engine::default();
        let expr = engine.parse("x^2");
        assert_eq!(render(&engine, &expr, OutputFormat::Json).unwrap(), r#"["Power","x",2]"#);
        assert_eq!(render(&engine, &expr, OutputFormat::Latex).unwrap(), "x^{2}");
        let pretty = render(&engine, &expr, OutputFormat::Pretty).unwrap();
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_diagnostic_line() {
        let line = diagnostic_line(&Diagnostic::unbound("q"));
        assert_eq!(line, "warning[unbound-symbol]: 'q' has no definition");
        assert!(ErrorCode::UnboundSymbol.as_str().contains("unbound"));
    }
}
