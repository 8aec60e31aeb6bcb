use ce_ast::ErrorCode;
use ce_numeric::NumericMode;
use serde_json::json;

use crate::builtin::Builtin;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::options::EngineOptions;
use crate::BoxedExpr;

fn boxed(engine: &Engine, value: serde_json::Value) -> BoxedExpr {
    engine.box_json(&value).unwrap()
}

fn evaluate(engine: &Engine, value: serde_json::Value) -> String {
    let expr = boxed(engine, value);
    engine.evaluate(&expr).unwrap().to_string()
}

fn n(engine: &Engine, value: serde_json::Value) -> f64 {
    let expr = boxed(engine, value);
    let result = engine.n(&expr).unwrap();
    result.as_number().map(|v| v.to_f64()).unwrap_or(f64::NAN)
}

fn simplify(engine: &Engine, value: serde_json::Value) -> String {
    let expr = boxed(engine, value);
    engine.simplify(&expr).to_string()
}

#[test]
fn test_exact_arithmetic() {
    let engine = Engine::default();
    assert_eq!(evaluate(&engine, json!(["Power", 2, 10])), "1024");
    assert_eq!(evaluate(&engine, json!(["Power", 2, -2])), r#"["Rational",1,4]"#);
    assert_eq!(evaluate(&engine, json!(["Factorial", 5])), "120");
    assert_eq!(evaluate(&engine, json!(["Max", 1, 5, 3])), "5");
    assert_eq!(evaluate(&engine, json!(["Abs", -7])), "7");
    assert_eq!(evaluate(&engine, json!(["Floor", ["Rational", 7, 2]])), "3");
}

#[test]
fn test_rational_division_is_exact_then_numeric() {
    let engine = Engine::default();
    let third = json!(["Rational", 1, 3]);
    let quotient = json!(["Divide", third, third]);
    assert_eq!(evaluate(&engine, quotient.clone()), "1");
    assert!((n(&engine, quotient) - 1.0).abs() <= f64::EPSILON);
}

#[test]
fn test_inexact_results_stay_symbolic() {
    let engine = Engine::default();
    assert_eq!(evaluate(&engine, json!(["Sqrt", 2])), r#"["Sqrt",2]"#);
    assert_eq!(evaluate(&engine, json!(["Sqrt", 12])), r#"["Multiply",2,["Sqrt",3]]"#);
    assert_eq!(evaluate(&engine, json!(["Sqrt", -4])), r#"["Multiply",2,"ImaginaryUnit"]"#);
    assert_eq!(evaluate(&engine, json!(["Ln", 1])), "0");
    assert!((n(&engine, json!(["Sqrt", 2])) - std::f64::consts::SQRT_2).abs() < 1e-12);
}

#[test]
fn test_division_by_zero_is_an_error_node() {
    let engine = Engine::default();
    let result = engine.evaluate(&boxed(&engine, json!(["Divide", 1, 0]))).unwrap();
    assert_eq!(result.error_code(), Some(ErrorCode::DivisionByZero));
    assert!(engine.has_diagnostic(ErrorCode::DivisionByZero));
}

#[test]
fn test_inexact_division_by_zero_is_infinite() {
    let engine = Engine::default();
    for value in [json!(["Divide", 1.5, 0]), json!(["Divide", 2, 0.0])] {
        let result = engine.evaluate(&boxed(&engine, value)).unwrap();
        assert_eq!(result.as_number().map(|n| n.to_f64()), Some(f64::INFINITY));
    }
    assert!((n(&engine, json!(["Divide", -1.5, 0]))).is_infinite());
    assert!(!engine.has_diagnostic(ErrorCode::DivisionByZero));
}

#[test]
fn test_invalid_operands_are_not_evaluated() {
    let engine = Engine::default();
    let cases = [
        (json!(["Sin", 0, 1]), Builtin::Sin),
        (json!(["Sqrt", 4, 5]), Builtin::Sqrt),
        (json!(["Abs", -2, 7]), Builtin::Abs),
        (json!(["Element", 2, "Integer", "Number"]), Builtin::Element),
        (json!(["Sin", ["List", 0, 1], 2]), Builtin::Sin),
    ];
    for (value, head) in cases {
        let input = boxed(&engine, value);
        assert!(!input.is_valid(), "{input}");
        let result = engine.evaluate(&input).unwrap();
        assert!(result.is_head(head), "{result}");
        assert!(!result.is_valid(), "{result}");
        assert_eq!(result.errors().len(), input.errors().len(), "{result}");
    }
}

#[test]
fn test_unbound_symbols_stay_symbolic() {
    let engine = Engine::default();
    assert_eq!(evaluate(&engine, json!(["Add", "q", 1])), r#"["Add",1,"q"]"#);
    let diagnostics = engine.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::UnboundSymbol);
    assert_eq!(diagnostics[0].subject.as_deref(), Some("q"));
}

#[test]
fn test_assigned_values_are_substituted() {
    let engine = Engine::default();
    engine.assign("x", BoxedExpr::integer(5)).unwrap();
    assert_eq!(evaluate(&engine, json!(["Add", "x", 1])), "6");
    engine.assign("x", BoxedExpr::integer(7)).unwrap();
    assert_eq!(evaluate(&engine, json!(["Multiply", "x", 2])), "14");
    assert_eq!(
        engine.assign("Pi", BoxedExpr::integer(3)),
        Err(EngineError::ConstantAssignment("Pi".into()))
    );
}

#[test]
fn test_sum_index_shadows_outer_binding() {
    let engine = Engine::default();
    engine.assign("k", BoxedExpr::integer(100)).unwrap();
    let sum = json!(["Sum", "k", ["Triple", "k", 1, 4]]);
    assert_eq!(evaluate(&engine, sum), "10");
    assert_eq!(evaluate(&engine, json!("k")), "100");
    assert_eq!(evaluate(&engine, json!(["Product", "k", ["Triple", "k", 1, 5]])), "120");
    assert!(engine.scopes().current_id() == crate::ScopeId::GLOBAL);
}

#[test]
fn test_sum_with_symbolic_bounds_is_unchanged() {
    let engine = Engine::default();
    let sum = json!(["Sum", "k", ["Triple", "k", 1, "m"]]);
    assert_eq!(evaluate(&engine, sum), r#"["Sum","k",["Triple","k",1,"m"]]"#);
}

#[test]
fn test_destroyed_scope_is_fatal() {
    let engine = Engine::default();
    engine.push_scope();
    let local = engine.parse("z");
    engine.pop_scope().unwrap();
    assert!(matches!(engine.evaluate(&local), Err(EngineError::ScopeDestroyed(_))));
    assert_eq!(engine.pop_scope(), Err(EngineError::GlobalScopePop));
}

#[test]
fn test_user_functions() {
    let engine = Engine::default();
    let body = boxed(&engine, json!(["Power", "t", 2]));
    engine.define_function("f", &["t"], body).unwrap();
    assert_eq!(evaluate(&engine, json!(["f", 3])), "9");
    assert_eq!(evaluate(&engine, json!(["f", "y"])), r#"["Power","y",2]"#);
}

#[test]
fn test_threading_over_lists() {
    let engine = Engine::default();
    assert_eq!(evaluate(&engine, json!(["Sin", ["List", 0, 0]])), r#"["List",0,0]"#);
    assert_eq!(evaluate(&engine, json!(["Abs", ["List", -1, 2]])), r#"["List",1,2]"#);
}

#[test]
fn test_relations_and_logic() {
    let engine = Engine::default();
    assert_eq!(evaluate(&engine, json!(["Equal", 1, ["Rational", 2, 2]])), r#""True""#);
    assert_eq!(evaluate(&engine, json!(["Less", 1, 2, 3])), r#""True""#);
    assert_eq!(evaluate(&engine, json!(["Greater", 1, 2])), r#""False""#);
    assert_eq!(evaluate(&engine, json!(["And", "True", ["Less", 2, 1]])), r#""False""#);
    assert_eq!(evaluate(&engine, json!(["Not", ["Equal", 2, 3]])), r#""True""#);
    assert_eq!(evaluate(&engine, json!(["Equal", "a", "b"])), r#"["Equal","a","b"]"#);
}

#[test]
fn test_element_membership() {
    let engine = Engine::default();
    assert_eq!(evaluate(&engine, json!(["Element", 2, "Integer"])), r#""True""#);
    assert_eq!(evaluate(&engine, json!(["Element", ["Rational", 1, 2], "Integer"])), r#""False""#);
    assert_eq!(evaluate(&engine, json!(["Element", 3, ["List", 1, 2, 3]])), r#""True""#);
    assert_eq!(
        evaluate(&engine, json!(["Element", ["List", 2, 3], ["List", 1, 2, 3, 4]])),
        r#""True""#
    );
    assert_eq!(
        evaluate(&engine, json!(["Element", {"str": "ell"}, {"str": "hello"}])),
        r#""True""#
    );
    assert_eq!(evaluate(&engine, json!(["Element", 9, ["List", 1, 2]])), r#""False""#);
}

#[test]
fn test_piecewise_picks_first_true_branch() {
    let engine = Engine::default();
    engine.assign("x", BoxedExpr::integer(3)).unwrap();
    let expr = json!(["Piecewise", ["List", ["List", 1, ["Less", "x", 0]], ["List", 2]]]);
    assert_eq!(evaluate(&engine, expr), "2");
}

#[test]
fn test_numeric_constants() {
    let engine = Engine::default();
    assert!((n(&engine, json!("Pi")) - std::f64::consts::PI).abs() < 1e-15);
    assert!((n(&engine, json!(["Sin", ["Divide", "Pi", 2]])) - 1.0).abs() < 1e-15);
    assert_eq!(evaluate(&engine, json!("Pi")), r#""Pi""#);
}

#[test]
fn test_arbitrary_precision_mode() {
    let mut engine = Engine::new(EngineOptions {
        precision: 30,
        ..EngineOptions::default()
    });
    engine.set_numeric_mode(NumericMode::Arbitrary);
    let pi = engine.n(&engine.parse("\\pi")).unwrap();
    let digits = pi.as_number().map(ToString::to_string).unwrap_or_default();
    assert!(digits.starts_with("3.14159265358979323846"), "{digits}");
}

#[test]
fn test_simplify_rules() {
    let engine = Engine::default();
    assert_eq!(simplify(&engine, json!(["Add", "x", "x"])), r#"["Multiply",2,"x"]"#);
    assert_eq!(simplify(&engine, json!(["Multiply", "x", "x"])), r#"["Power","x",2]"#);
    assert_eq!(simplify(&engine, json!(["Power", "x", 1])), r#""x""#);
    assert_eq!(simplify(&engine, json!(["Sqrt", ["Power", "x", 2]])), r#"["Abs","x"]"#);
    assert_eq!(simplify(&engine, json!(["Ln", ["Power", "ExponentialE", "x"]])), r#""x""#);
    assert_eq!(simplify(&engine, json!(["Abs", ["Abs", "x"]])), r#"["Abs","x"]"#);
    assert_eq!(simplify(&engine, json!(["Equal", "x", "x"])), r#""True""#);
    assert_eq!(simplify(&engine, json!(["Power", 2, 10])), "1024");
}

#[test]
fn test_simplify_trig_special_values() {
    let engine = Engine::default();
    assert_eq!(simplify(&engine, json!(["Sin", "Pi"])), "0");
    assert_eq!(simplify(&engine, json!(["Cos", "Pi"])), "-1");
    assert_eq!(simplify(&engine, json!(["Sin", ["Divide", "Pi", 6]])), r#"["Rational",1,2]"#);
    assert_eq!(simplify(&engine, json!(["Tan", ["Divide", "Pi", 4]])), "1");
    assert_eq!(simplify(&engine, json!(["Sin", ["Negate", "x"]])), r#"["Negate",["Sin","x"]]"#);
}

#[test]
fn test_simplify_never_approximates() {
    let engine = Engine::default();
    assert_eq!(simplify(&engine, json!(["Sqrt", 2])), r#"["Sqrt",2]"#);
    assert_eq!(simplify(&engine, json!(["Ln", 2])), r#"["Ln",2]"#);
    assert_eq!(simplify(&engine, json!("Pi")), r#""Pi""#);
}

#[test]
fn test_disabled_rules_are_skipped() {
    let mut engine = Engine::default();
    engine.simplifier_mut().disable_rule("Combine Like Terms");
    assert_eq!(simplify(&engine, json!(["Add", "x", "x"])), r#"["Add","x","x"]"#);
    engine.simplifier_mut().enable_rule("Combine Like Terms");
    assert_eq!(simplify(&engine, json!(["Add", "x", "x"])), r#"["Multiply",2,"x"]"#);
}

#[test]
fn test_evaluation_depth_is_bounded() {
    let engine = Engine::new(EngineOptions {
        max_depth: 16,
        ..EngineOptions::default()
    });
    // x := x + 1 recurses until the limit
    engine.assign("x", boxed(&engine, json!(["Add", "x", 1]))).unwrap();
    let result = engine.evaluate(&engine.parse("x")).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors().iter().any(|e| e.error_code() == Some(ErrorCode::NestingTooDeep)));
}
