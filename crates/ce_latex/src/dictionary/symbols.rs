//! Named symbols, constants, trigonometric functions and big operators.

use ce_ast::Expression;

use super::{precedence, LatexDictionaryEntry as Entry, LibraryCategory, ParseHandler};
use crate::parser::{ErrorTrail, Parsed, Parser, Terminator};

const GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "varepsilon", "zeta", "eta", "theta",
    "vartheta", "iota", "kappa", "lambda", "mu", "nu", "xi", "rho", "sigma", "tau", "upsilon",
    "phi", "varphi", "chi", "psi", "omega",
];

const TRIGONOMETRY: &[(&str, &str)] = &[
    ("Sin", "\\sin"),
    ("Cos", "\\cos"),
    ("Tan", "\\tan"),
    ("Cot", "\\cot"),
    ("Sec", "\\sec"),
    ("Csc", "\\csc"),
    ("Arcsin", "\\arcsin"),
    ("Arccos", "\\arccos"),
    ("Arctan", "\\arctan"),
    ("Sinh", "\\sinh"),
    ("Cosh", "\\cosh"),
    ("Tanh", "\\tanh"),
];

pub(super) fn entries() -> Vec<Entry> {
    let mut entries = vec![
        Entry::symbol("Pi", "\\pi"),
        Entry::symbol("ExponentialE", "e"),
        Entry::symbol("ExponentialE", "\\exponentialE"),
        Entry::symbol("ImaginaryUnit", "\\imaginaryI"),
    ];
    entries.extend(GREEK.iter().map(|name| Entry::symbol(name, &format!("\\{name}"))));
    let mut entries: Vec<Entry> = entries
        .into_iter()
        .map(|e| e.in_category(LibraryCategory::Symbols))
        .collect();

    entries.extend(TRIGONOMETRY.iter().map(|(name, trigger)| {
        Entry::function(name, trigger).in_category(LibraryCategory::Trigonometry)
    }));

    entries.extend(
        [
            Entry::function("Sum", "\\sum"),
            Entry::function("Product", "\\prod"),
        ]
        .into_iter()
        .map(|e| {
            e.with_handler(ParseHandler::Prefix(parse_big_operator))
                .in_category(LibraryCategory::Summation)
        }),
    );
    entries
}

/// `\sum_{k=1}^{n} body` becomes `["Sum", body, ["Triple", k, 1, n]]`.
///
/// Limits may come in either order; absent parts are `Nothing`. The body
/// extends over multiplicative operands only, so `\sum_k k + 1` adds one to
/// the sum.
fn parse_big_operator(p: &mut Parser<'_>, entry: &Entry) -> Parsed {
    let mut trail = ErrorTrail::default();
    let mut lower = None;
    let mut upper = None;
    loop {
        if p.match_token("_") {
            let arg = p.parse_argument();
            lower = Some(p.required(arg, &mut trail));
        } else if p.match_token("^") {
            let arg = p.parse_argument();
            upper = Some(p.required(arg, &mut trail));
        } else {
            break;
        }
    }
    let body = p.parse_expression(&Terminator::new(precedence::MULTIPLICATIVE));
    let body = p.required(body, &mut trail);

    let nothing = || Expression::sym("Nothing");
    let (index, low) = match lower.map(Expression::into_inner) {
        Some(Expression::Function(head, ops)) if head == "Equal" && ops.len() == 2 => {
            let mut ops = ops.into_iter();
            (
                ops.next().unwrap_or_else(nothing),
                ops.next().unwrap_or_else(nothing),
            )
        }
        Some(index) => (index, nothing()),
        None => (nothing(), nothing()),
    };
    let high = upper.unwrap_or_else(nothing);
    trail.finish(Expression::func(
        &entry.name,
        vec![body, Expression::func("Triple", vec![index, low, high])],
    ))
}
