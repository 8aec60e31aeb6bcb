//! End-to-end tests: LaTeX in, boxed expressions and MathJSON out.

use std::cell::RefCell;
use std::rc::Rc;

use ce_engine::{Engine, EngineError, EngineOptions, ErrorCode, NumericMode, Severity};
use ce_latex::LibraryCategory;

fn parsed(latex: &str) -> String {
    Engine::default().parse(latex).to_string()
}

/// Rule and tier events show up with `--nocapture`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn evaluated(latex: &str) -> String {
    let engine = Engine::default();
    let expr = engine.parse(latex);
    engine.evaluate(&expr).unwrap().to_string()
}

#[test]
fn test_precedence() {
    let engine = Engine::default();
    assert_eq!(
        engine.parse_raw("2^3^4", None).to_string(),
        r#"["Power",2,["Power",3,4]]"#
    );
    assert_eq!(
        engine.parse_raw("1+2*3", None).to_string(),
        r#"["Add",1,["Multiply",2,3]]"#
    );
    assert_eq!(parsed("2^3^4"), r#"["Power",2,["Power",3,4]]"#);
}

#[test]
fn test_power_scenario() {
    assert_eq!(parsed("2^{10}"), r#"["Power",2,10]"#);
    assert_eq!(evaluated("2^{10}"), "1024");
}

#[test]
fn test_division_by_zero_scenario() {
    let engine = Engine::default();
    let expr = engine.parse("1/0");
    let result = engine.evaluate(&expr).unwrap();
    assert!(result.is_error());
    assert_eq!(result.error_code(), Some(ErrorCode::DivisionByZero));
    assert_eq!(
        result.to_string(),
        r#"["Error",["ErrorCode",{"str":"division-by-zero"}],["Divide",1,0]]"#
    );
}

#[test]
fn test_unbound_symbol_scenario() {
    let engine = Engine::default();
    let expr = engine.parse("q+1");
    assert_eq!(expr.to_string(), r#"["Add",1,"q"]"#);
    assert_eq!(engine.evaluate(&expr).unwrap(), expr);
    assert!(engine.has_diagnostic(ErrorCode::UnboundSymbol));
}

#[test]
fn test_exact_then_numeric() {
    let engine = Engine::default();
    let expr = engine.parse("\\frac{1}{3} / \\frac{1}{3}");
    assert_eq!(engine.evaluate(&expr).unwrap().to_string(), "1");
    let numeric = engine.n(&expr).unwrap();
    let value = numeric.as_number().map(|n| n.to_f64()).unwrap_or(f64::NAN);
    assert!((value - 1.0).abs() <= f64::EPSILON);

    let half = engine.n(&engine.parse("\\frac{1}{2}")).unwrap();
    assert_eq!(half.to_string(), "0.5");
}

#[test]
fn test_summation() {
    assert_eq!(evaluated("\\sum_{k=1}^{10} k"), "55");
    assert_eq!(evaluated("\\sum_{k=1}^{3} k^2"), "14");
}

#[test]
fn test_logarithm_of_negative_number_enters_complex_plane() {
    let engine = Engine::default();
    let result = engine.n(&engine.parse("\\ln(-1)")).unwrap();
    let value = result.as_number().map(|n| n.to_complex()).unwrap();
    assert!(value.re.abs() < 1e-12);
    assert!((value.im - std::f64::consts::PI).abs() < 1e-12);
}

#[test]
fn test_syntax_errors_are_embedded_and_reported() {
    let engine = Engine::default();
    let expr = engine.parse("1+");
    assert!(!expr.is_valid());
    let diagnostics = engine.take_diagnostics();
    assert!(diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error && d.code == ErrorCode::Missing));

    let expr = engine.parse("(x+1");
    assert!(expr
        .errors()
        .iter()
        .any(|e| e.error_code() == Some(ErrorCode::ExpectedCloseDelimiter)));
}

#[test]
fn test_diagnostic_sink_receives_reports() {
    let engine = Engine::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    engine.on_diagnostic(move |d| sink.borrow_mut().push(d.code));
    let expr = engine.parse("w");
    engine.evaluate(&expr).unwrap();
    assert_eq!(seen.borrow().as_slice(), &[ErrorCode::UnboundSymbol]);
}

#[test]
fn test_panicking_sink_is_contained() {
    let engine = Engine::default();
    engine.on_diagnostic(|_| panic!("sink failure"));
    let expr = engine.parse("w+1");
    assert!(engine.evaluate(&expr).is_ok());
    assert!(engine.has_diagnostic(ErrorCode::UnboundSymbol));
}

#[test]
fn test_scopes_and_assignment() {
    let engine = Engine::default();
    engine.assign("a", engine.parse("2")).unwrap();
    engine.push_scope();
    engine.assign("a", engine.parse("40")).unwrap();
    engine.assign("b", engine.parse("1")).unwrap();
    let inner = engine.parse("a+b");
    assert_eq!(engine.evaluate(&inner).unwrap().to_string(), "41");
    engine.pop_scope().unwrap();
    // The innermost binding was updated in place.
    assert_eq!(engine.evaluate(&engine.parse("a")).unwrap().to_string(), "40");
    assert!(matches!(engine.evaluate(&inner), Err(EngineError::ScopeDestroyed(_))));
}

#[test]
fn test_constants_cannot_be_assigned() {
    let engine = Engine::default();
    engine.declare_constant("c_0", engine.parse("3")).unwrap();
    let err = engine.assign("c_0", engine.parse("4")).unwrap_err();
    assert_eq!(err, EngineError::ConstantAssignment("c_0".into()));
    assert!(engine.assign("ExponentialE", engine.parse("4")).is_err());
    assert!(engine.assign("Sin", engine.parse("4")).is_err());
}

#[test]
fn test_user_function_from_latex() {
    let engine = Engine::default();
    engine.define_function("f", &["x"], engine.parse("x^2+1")).unwrap();
    assert_eq!(engine.evaluate(&engine.parse("f(3)")).unwrap().to_string(), "10");
}

#[test]
fn test_simplify_keeps_exactness() {
    let engine = Engine::default();
    let simplify = |latex: &str| engine.simplify(&engine.parse(latex)).to_string();
    assert_eq!(simplify("x+x"), r#"["Multiply",2,"x"]"#);
    assert_eq!(simplify("\\sqrt{8}"), r#"["Multiply",2,["Sqrt",2]]"#);
    assert_eq!(simplify("\\sin(\\pi)"), "0");
    assert_eq!(simplify("\\ln(e)"), "1");
    assert_eq!(simplify("\\sqrt{2}"), r#"["Sqrt",2]"#);
}

#[test]
fn test_arbitrary_precision() {
    let mut engine = Engine::new(EngineOptions {
        numeric_mode: NumericMode::Arbitrary,
        precision: 40,
        ..EngineOptions::default()
    });
    let sqrt2 = engine.n(&engine.parse("\\sqrt{2}")).unwrap();
    let text = sqrt2.as_number().map(ToString::to_string).unwrap_or_default();
    assert!(text.starts_with("1.41421356237309504880168872420969807"), "{text}");

    engine.set_numeric_mode(NumericMode::Machine);
    let sqrt2 = engine.n(&engine.parse("\\sqrt{2}")).unwrap();
    let value = sqrt2.as_number().map(|n| n.to_f64());
    assert_eq!(value, Some(std::f64::consts::SQRT_2));
}

#[test]
fn test_restricted_categories() {
    let mut engine = Engine::default();
    engine.set_categories(vec![LibraryCategory::Arithmetic, LibraryCategory::Symbols]);
    let expr = engine.parse("\\sin x");
    assert!(!expr.is_valid());
    assert_eq!(engine.parse("1+x").to_string(), r#"["Add",1,"x"]"#);
}

#[test]
fn test_serialize_canonical_form() {
    let engine = Engine::default();
    let expr = engine.parse("x-y");
    assert_eq!(engine.serialize(&expr), "x - y");
    let expr = engine.parse("\\frac{3}{6}");
    assert_eq!(engine.serialize(&expr), "\\frac{1}{2}");
}

#[test]
fn test_inexact_results_round_trip() {
    init_tracing();
    let engine = Engine::default();
    for latex in ["3.0", "1.5+\\frac{1}{2}", "1.5\\cdot10^{20}"] {
        let value = engine.n(&engine.parse(latex)).unwrap();
        assert!(value.as_number().is_some_and(|n| !n.is_exact()), "{latex}: {value}");
        assert_eq!(engine.box_json(&value.json()).unwrap(), value, "{latex}");
        let written = engine.serialize(&value);
        assert_eq!(engine.parse(&written), value, "{latex} -> {written}");
    }
    assert_eq!(engine.n(&engine.parse("3.0")).unwrap().to_string(), "3.0");
}

#[test]
fn test_relation_chains() {
    assert_eq!(parsed("1<2<3"), r#"["Less",1,2,3]"#);
    assert_eq!(evaluated("1<2<3"), r#""True""#);
    assert_eq!(evaluated("1<3<2"), r#""False""#);
    assert_eq!(evaluated("1<2\\le2"), r#""True""#);
}
