use ce_ast::{ErrorCode, Expression};
use serde_json::json;

use crate::engine::Engine;
use crate::options::EngineOptions;
use crate::BoxedExpr;

fn boxed(engine: &Engine, value: serde_json::Value) -> BoxedExpr {
    engine.box_json(&value).unwrap()
}

fn canonical(value: serde_json::Value) -> String {
    boxed(&Engine::default(), value).to_string()
}

fn first_error(expr: &BoxedExpr) -> Option<ErrorCode> {
    expr.errors().first().and_then(BoxedExpr::error_code)
}

#[test]
fn test_flattening_is_structural() {
    let engine = Engine::default();
    let nested = boxed(&engine, json!(["Add", ["Add", "a", "b"], "c"]));
    let flat = boxed(&engine, json!(["Add", "a", "b", "c"]));
    assert_eq!(nested, flat);
    assert_eq!(flat.to_string(), r#"["Add","a","b","c"]"#);
}

#[test]
fn test_commutative_operands_are_ordered() {
    let engine = Engine::default();
    let ab = boxed(&engine, json!(["Multiply", "a", "b"]));
    let ba = boxed(&engine, json!(["Multiply", "b", "a"]));
    assert_eq!(ab, ba);
    assert_eq!(canonical(json!(["Add", ["Sin", "x"], "x", 2])), r#"["Add",2,"x",["Sin","x"]]"#);
}

#[test]
fn test_exact_literals_fold() {
    assert_eq!(canonical(json!(["Add", "x", 1, 2])), r#"["Add",3,"x"]"#);
    assert_eq!(canonical(json!(["Add", "x", 0])), r#""x""#);
    assert_eq!(canonical(json!(["Multiply", 2, "x", 3])), r#"["Multiply",6,"x"]"#);
    assert_eq!(canonical(json!(["Divide", 6, 4])), r#"["Rational",3,2]"#);
    assert_eq!(canonical(json!(["Rational", 4, 2])), "2");
}

#[test]
fn test_inexact_and_undefined_folds_are_deferred() {
    assert_eq!(canonical(json!(["Power", 2, 10])), r#"["Power",2,10]"#);
    assert_eq!(canonical(json!(["Divide", 1, 0])), r#"["Divide",1,0]"#);
    assert_eq!(canonical(json!(["Sqrt", 2])), r#"["Sqrt",2]"#);
}

#[test]
fn test_negation_forms() {
    assert_eq!(canonical(json!(["Subtract", "a", "b"])), r#"["Add","a",["Negate","b"]]"#);
    assert_eq!(canonical(json!(["Negate", ["Negate", "x"]])), r#""x""#);
    assert_eq!(canonical(json!(["Multiply", -1, "x"])), r#"["Negate","x"]"#);
    assert_eq!(canonical(json!(["Negate", ["Multiply", 2, "x"]])), r#"["Multiply",-2,"x"]"#);
    assert_eq!(canonical(json!(["Negate", 5])), "-5");
}

#[test]
fn test_function_rewrites() {
    assert_eq!(canonical(json!(["Square", "x"])), r#"["Power","x",2]"#);
    assert_eq!(canonical(json!(["Exp", "x"])), r#"["Power","ExponentialE","x"]"#);
    assert_eq!(canonical(json!(["Root", "x", 2])), r#"["Sqrt","x"]"#);
    assert_eq!(canonical(json!(["Power", "x", ["Rational", 1, 2]])), r#"["Sqrt","x"]"#);
    assert_eq!(canonical(json!(["Lb", "x"])), r#"["Log","x",2]"#);
    assert_eq!(canonical(json!(["Lg", "x"])), r#"["Log","x"]"#);
    assert_eq!(canonical(json!(["Log", "x", 10])), r#"["Log","x"]"#);
    assert_eq!(canonical(json!(["Log", "x", "ExponentialE"])), r#"["Ln","x"]"#);
}

#[test]
fn test_structural_heads() {
    assert_eq!(canonical(json!(["Delimiter", "x"])), r#""x""#);
    assert_eq!(canonical(json!(["Delimiter", ["Sequence", "a", "b"]])), r#"["Tuple","a","b"]"#);
    assert_eq!(canonical(json!(["Add", "a", ["Sequence", "b", "c"]])), r#"["Add","a","b","c"]"#);
    assert_eq!(canonical(json!(["Subscript", "x", 0])), r#""x_0""#);
    assert_eq!(canonical(json!(["Subscript", "a", "n"])), r#""a_n""#);
    assert_eq!(canonical(json!(["Set", 3, 1, 3, 2])), r#"["Set",1,2,3]"#);
}

#[test]
fn test_validation_embeds_errors() {
    let engine = Engine::default();

    let missing = boxed(&engine, json!(["Sin"]));
    assert!(missing.is_head(crate::Builtin::Sin));
    assert_eq!(first_error(&missing), Some(ErrorCode::Missing));

    let extra = boxed(&engine, json!(["Sin", "x", "y"]));
    assert_eq!(first_error(&extra), Some(ErrorCode::UnexpectedArgument));
    assert_eq!(extra.op(0).and_then(BoxedExpr::symbol_name), Some("x"));

    let mismatch = boxed(&engine, json!(["Sin", {"str": "hello"}]));
    assert_eq!(first_error(&mismatch), Some(ErrorCode::IncompatibleDomain));
    let errors = mismatch.errors();
    assert_eq!(errors[0].op(1).and_then(BoxedExpr::as_string), Some("hello"));
}

#[test]
fn test_threadable_heads_accept_lists() {
    let expr = canonical(json!(["Sin", ["List", 1, 2]]));
    assert_eq!(expr, r#"["Sin",["List",1,2]]"#);
}

#[test]
fn test_canonical_is_idempotent() {
    let engine = Engine::default();
    let raw = Expression::from_json_str(r#"["Add", ["Multiply", "b", "a"], ["Add", 1, "c"], 2]"#).unwrap();
    let loose = engine.box_non_canonical(&raw);
    assert!(!loose.is_canonical());
    let once = engine.canonical(&loose);
    let twice = engine.canonical(&once);
    assert_eq!(once, twice);
    assert_eq!(once, engine.box_expr(&raw));
}

#[test]
fn test_nesting_limit_yields_error_node() {
    let engine = Engine::new(EngineOptions {
        max_depth: 8,
        ..EngineOptions::default()
    });
    let mut expr = Expression::sym("x");
    for _ in 0..20 {
        expr = Expression::func("Sin", vec![expr]);
    }
    let boxed = engine.box_expr(&expr);
    assert_eq!(first_error(&boxed), Some(ErrorCode::NestingTooDeep));
}

#[test]
fn test_symbols_keep_their_binding_scope() {
    let engine = Engine::default();
    engine.declare("n", crate::Domain::Integer);
    let outer = engine.parse("n");
    let scope = engine.push_scope();
    let inner_free = engine.parse("m");
    let inner_bound = engine.parse("n");
    engine.pop_scope().unwrap();

    assert_eq!(outer.as_symbol().map(|s| s.scope), Some(crate::ScopeId::GLOBAL));
    assert_eq!(inner_bound, outer);
    assert_eq!(inner_free.as_symbol().map(|s| s.scope), Some(scope));
    assert_eq!(outer.domain(), crate::Domain::Integer);
}
