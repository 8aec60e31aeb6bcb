use ce_ast::Expression;
use ce_engine::Engine;
use proptest::prelude::*;

mod strategies;

fn shuffled(head: &str, ops: &[Expression]) -> Expression {
    let mut reversed = ops.to_vec();
    reversed.reverse();
    Expression::func(head, reversed)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_canonical_is_idempotent(e in strategies::arb_expr()) {
        let engine = Engine::default();
        let once = engine.box_expr(&e);
        let again = engine.box_expr(&once.to_expression());
        prop_assert_eq!(&once, &again);
        prop_assert_eq!(engine.canonical(&engine.box_non_canonical(&e)), once);
    }

    #[test]
    fn test_flattening(a in strategies::arb_expr(), b in strategies::arb_expr(), c in strategies::arb_expr()) {
        let engine = Engine::default();
        for head in ["Add", "Multiply"] {
            let nested = Expression::func(head, vec![Expression::func(head, vec![a.clone(), b.clone()]), c.clone()]);
            let flat = Expression::func(head, vec![a.clone(), b.clone(), c.clone()]);
            prop_assert_eq!(engine.box_expr(&nested), engine.box_expr(&flat));
        }
    }

    #[test]
    fn test_commutative_order_is_irrelevant(ops in prop::collection::vec(strategies::arb_expr(), 2..5)) {
        let engine = Engine::default();
        for head in ["Add", "Multiply"] {
            let forward = engine.box_expr(&Expression::func(head, ops.clone()));
            let backward = engine.box_expr(&shuffled(head, &ops));
            prop_assert_eq!(forward.hash_value(), backward.hash_value());
            prop_assert_eq!(forward, backward);
        }
    }

    #[test]
    fn test_latex_round_trip(e in strategies::arb_expr()) {
        let engine = Engine::default();
        let boxed = engine.box_expr(&e);
        let latex = engine.serialize(&boxed);
        prop_assert_eq!(engine.parse(&latex), boxed, "latex: {}", latex);
    }

    #[test]
    fn test_json_round_trip(e in strategies::arb_expr()) {
        let engine = Engine::default();
        let boxed = engine.box_expr(&e);
        let reboxed = engine.box_json(&boxed.json());
        prop_assert_eq!(reboxed.ok(), Some(boxed));
    }

    #[test]
    fn test_boxing_is_total(e in strategies::arb_wild_expr()) {
        let engine = Engine::default();
        let boxed = engine.box_expr(&e);
        prop_assert!(boxed.is_canonical());
        prop_assert_eq!(boxed.is_valid(), boxed.errors().is_empty());
        // The MathJSON form is always readable again.
        prop_assert!(Expression::from_json(&boxed.json()).is_ok());
    }

    #[test]
    fn test_parsing_is_total(src in strategies::arb_latex()) {
        let engine = Engine::default();
        let raw = engine.parse_raw(&src, None);
        let reported = engine.take_diagnostics();
        prop_assert!(!raw.has_errors() || !reported.is_empty(), "{}: {}", src, raw);
        prop_assert!(engine.box_expr(&raw).is_canonical());
    }
}
