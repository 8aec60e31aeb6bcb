//! Arithmetic operators, fractions, roots and the elementary functions.

use ce_ast::Expression;

use super::{precedence, LatexDictionaryEntry as Entry, LibraryCategory, ParseHandler};
use crate::parser::{ErrorTrail, Parsed, Parser, Terminator};

pub(super) fn entries() -> Vec<Entry> {
    let entries = vec![
        Entry::infix("Add", "+", precedence::ADDITIVE),
        Entry::infix("Subtract", "-", precedence::ADDITIVE),
        Entry::infix("PlusMinus", "\\pm", precedence::ADDITIVE),
        Entry::prefix("Negate", "-", precedence::NEGATE),
        Entry::prefix("PlusMinus", "\\pm", precedence::NEGATE),
        Entry::prefix("Plus", "+", precedence::NEGATE)
            .with_handler(ParseHandler::Prefix(parse_unary_plus)),
        Entry::infix("Multiply", "\\cdot", precedence::MULTIPLICATIVE),
        Entry::infix("Multiply", "\\times", precedence::MULTIPLICATIVE),
        Entry::infix("Multiply", "*", precedence::MULTIPLICATIVE),
        Entry::infix("Divide", "/", precedence::DIVIDE),
        Entry::infix("Divide", "\\div", precedence::DIVIDE),
        Entry::infix("Power", "^", precedence::POWER)
            .right_associative()
            .with_handler(ParseHandler::Infix(parse_power)),
        Entry::infix("Subscript", "_", precedence::POWER)
            .with_handler(ParseHandler::Infix(parse_subscript)),
        Entry::postfix("Factorial", "!", precedence::FACTORIAL),
        Entry::function("Divide", "\\frac").with_handler(ParseHandler::Prefix(parse_fraction)),
        Entry::function("Divide", "\\dfrac").with_handler(ParseHandler::Prefix(parse_fraction)),
        Entry::function("Divide", "\\tfrac").with_handler(ParseHandler::Prefix(parse_fraction)),
        Entry::function("Sqrt", "\\sqrt").with_handler(ParseHandler::Prefix(parse_root)),
        Entry::matchfix("Abs", "|", "|"),
        Entry::matchfix("Abs", "\\left|", "\\right|"),
        Entry::matchfix("Abs", "\\lvert", "\\rvert"),
        Entry::matchfix("Floor", "\\lfloor", "\\rfloor"),
        Entry::matchfix("Floor", "\\left\\lfloor", "\\right\\rfloor"),
        Entry::matchfix("Ceil", "\\lceil", "\\rceil"),
        Entry::matchfix("Ceil", "\\left\\lceil", "\\right\\rceil"),
        Entry::function("Exp", "\\exp"),
        Entry::function("Ln", "\\ln"),
        Entry::function("Log", "\\log"),
        Entry::function("Lg", "\\lg"),
        Entry::function("Lb", "\\lb"),
        Entry::function("Max", "\\max"),
        Entry::function("Min", "\\min"),
        Entry::symbol("Infinity", "\\infty").with_handler(ParseHandler::Prefix(parse_infinity)),
    ];
    entries
        .into_iter()
        .map(|e| e.in_category(LibraryCategory::Arithmetic))
        .collect()
}

fn parse_unary_plus(p: &mut Parser<'_>, entry: &Entry) -> Parsed {
    let mut trail = ErrorTrail::default();
    let operand = p.parse_expression(&Terminator::new(entry.precedence));
    let operand = p.required(operand, &mut trail);
    trail.finish(operand)
}

/// `x^2`, `x^{a+b}`, `x^2_0`, `x^a^b` (right-associative).
///
/// A superscript takes a single argument, so `x^23` is `x^2` times `3`.
fn parse_power(p: &mut Parser<'_>, _: &Entry, lhs: Expression, _: &Terminator) -> Parsed {
    let mut trail = ErrorTrail::default();
    let first = p.parse_argument();
    let mut exponents = vec![p.required(first, &mut trail)];
    let mut base = lhs;
    let mut subscripts = 0;
    loop {
        if p.match_token("^") {
            let next = p.parse_argument();
            exponents.push(p.required(next, &mut trail));
        } else if p.match_token("_") {
            let sub = p.parse_argument();
            let sub = p.required(sub, &mut trail);
            base = Expression::func("Subscript", vec![base, sub]);
            subscripts += 1;
        } else {
            break;
        }
        // `2^2^2...` nests one `Power` per exponent.
        if p.nesting_exceeded(exponents.len().max(subscripts)) {
            return p.nesting_too_deep();
        }
    }
    let mut exponents = exponents.into_iter().rev();
    let mut exponent = match exponents.next() {
        Some(e) => e,
        None => p.missing(&mut trail),
    };
    for e in exponents {
        exponent = Expression::func("Power", vec![e, exponent]);
    }
    trail.finish(Expression::func("Power", vec![base, exponent]))
}

fn parse_subscript(p: &mut Parser<'_>, _: &Entry, lhs: Expression, _: &Terminator) -> Parsed {
    let mut trail = ErrorTrail::default();
    let sub = p.parse_argument();
    let sub = p.required(sub, &mut trail);
    trail.finish(Expression::func("Subscript", vec![lhs, sub]))
}

/// `\frac{a}{b}`, `\frac12`.
fn parse_fraction(p: &mut Parser<'_>, _: &Entry) -> Parsed {
    let mut trail = ErrorTrail::default();
    let numer = p.parse_argument();
    let numer = p.required(numer, &mut trail);
    let denom = p.parse_argument();
    let denom = p.required(denom, &mut trail);
    trail.finish(Expression::func("Divide", vec![numer, denom]))
}

/// `\sqrt{x}` or `\sqrt[n]{x}`.
fn parse_root(p: &mut Parser<'_>, _: &Entry) -> Parsed {
    let mut trail = ErrorTrail::default();
    let mut index = None;
    let open = p.index();
    if p.match_token("[") {
        let (body, closed) = p.parse_enclosed(&["]"]);
        let body = p.required(body, &mut trail);
        index = Some(if closed {
            body
        } else {
            p.unclosed("]", body, open, &mut trail)
        });
    }
    let radicand = p.parse_argument();
    let radicand = p.required(radicand, &mut trail);
    let expr = match index {
        Some(n) => Expression::func("Root", vec![radicand, n]),
        None => Expression::func("Sqrt", vec![radicand]),
    };
    trail.finish(expr)
}

fn parse_infinity(_: &mut Parser<'_>, _: &Entry) -> Parsed {
    Parsed::Complete(Expression::num("+Infinity"))
}
