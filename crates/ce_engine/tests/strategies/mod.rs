use ce_ast::Expression;
use proptest::prelude::*;

/// Letters with no built-in meaning.
const LETTERS: &[&str] = &["a", "b", "c", "x", "y"];

/// Inexact numerals, including integral and scientific ones.
const FLOATS: &[&str] = &["0.5", "3.0", "2.25", "1.5e20", "1e-9"];

fn leaf() -> impl Strategy<Value = Expression> {
    prop_oneof![
        (0i64..10).prop_map(Expression::num),
        prop::sample::select(FLOATS).prop_map(Expression::num),
        prop::sample::select(LETTERS).prop_map(Expression::sym),
    ]
}

/// Expressions in the part of the grammar the serializer writes back
/// unambiguously.
pub fn arb_expr() -> impl Strategy<Value = Expression> {
    leaf().prop_recursive(
        4,  // levels deep
        48, // max size
        4,  // items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 2..4).prop_map(|ops| Expression::func("Add", ops)),
                prop::collection::vec(inner.clone(), 2..4)
                    .prop_map(|ops| Expression::func("Multiply", ops)),
                (inner.clone(), inner.clone())
                    .prop_map(|(b, e)| Expression::func("Power", vec![b, e])),
                inner.clone().prop_map(|e| Expression::func("Sin", vec![e])),
                inner.clone().prop_map(|e| Expression::func("Sqrt", vec![e])),
            ]
        },
    )
}

/// Anything MathJSON can say, including heads with the wrong arity,
/// strings where numbers belong and unknown function names.
pub fn arb_wild_expr() -> impl Strategy<Value = Expression> {
    let leaf = prop_oneof![
        (-100i64..100).prop_map(Expression::num),
        Just(Expression::num("NaN")),
        Just(Expression::num("+Infinity")),
        "[a-d]".prop_map(Expression::sym),
        Just(Expression::sym("Pi")),
        "[a-z]{0,3}".prop_map(Expression::string),
    ];
    let heads = prop::sample::select(&[
        "Add", "Subtract", "Negate", "Multiply", "Divide", "Power", "Sqrt", "Sin", "Ln", "Log",
        "Equal", "Less", "And", "Not", "List", "Set", "Delimiter", "Sequence", "Subscript", "f",
    ][..]);
    leaf.prop_recursive(4, 48, 4, move |inner| {
        (heads.clone(), prop::collection::vec(inner, 0..4))
            .prop_map(|(head, ops)| Expression::func(head, ops))
    })
}

const FRAGMENTS: &[&str] = &[
    "x", "y", "2", "10", "+", "-", "^", "_", "{", "}", "(", ")", "\\frac", "\\sqrt", "\\sin",
    "\\pi", "\\sum", "=", "\\le", ",", "!", "\\left(", "\\right)", "\\bogus", " ",
];

/// Arbitrary, mostly malformed LaTeX.
pub fn arb_latex() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..20).prop_map(|parts| parts.concat())
}
