use ce_ast::Expression;
use ce_latex::LatexSyntax;
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "x", "y", "2", "10", ".", "+", "-", "^", "_", "!", "=", ",", "&", "|", "{", "}", "(", ")",
    "[", "]", " ", "\\", "\\frac", "\\sqrt", "\\sin", "\\sum", "\\pi", "\\left(", "\\right)",
    "\\begin{matrix}", "\\end{matrix}", "\\\\", "\\foo", "\\text{a}", "\\cdot", "\\le",
];

fn arb_latex() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..24).prop_map(|parts| parts.concat())
}

/// `(symbol, latex, precedence)` for left-associative binary operators.
const OPERATORS: &[(&str, &str, u16)] = &[
    ("Add", "+", 275),
    ("Subtract", "-", 275),
    ("Multiply", "\\cdot", 390),
    ("Divide", "/", 660),
    ("Equal", "=", 245),
];

/// Operators whose repeated use parses to one n-ary node.
const CHAINED: &[&str] = &["Add", "Multiply", "Equal"];

fn binary(head: &str, lhs: Expression, rhs: Expression) -> Expression {
    Expression::func(head, vec![lhs, rhs])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_parse_is_total(src in arb_latex()) {
        let syntax = LatexSyntax::default();
        let (expr, errors) = syntax.parse_with_errors(&src, None);
        // Every embedded error node was also reported.
        prop_assert!(!expr.has_errors() || !errors.is_empty(), "{src}: {expr}");
        // Whatever came out can be printed and read again.
        let latex = syntax.serialize(&expr);
        let _ = syntax.parse(&latex, None);
    }

    #[test]
    fn test_precedence_decides_grouping(
        first in prop::sample::select(OPERATORS),
        second in prop::sample::select(OPERATORS),
    ) {
        let (op1, tex1, prec1) = first;
        let (op2, tex2, prec2) = second;
        let src = format!("a {tex1} b {tex2} c");
        let (a, b, c) = (Expression::sym("a"), Expression::sym("b"), Expression::sym("c"));
        let expected = if prec2 > prec1 {
            binary(op1, a, binary(op2, b, c))
        } else if op1 == op2 && CHAINED.contains(&op1) {
            Expression::func(op1, vec![a, b, c])
        } else {
            binary(op2, binary(op1, a, b), c)
        };
        prop_assert_eq!(LatexSyntax::default().parse(&src, None), expected);
    }
}
