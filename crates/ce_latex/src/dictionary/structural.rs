//! Structural entries: delimiters, sequences, text and environments.

use std::str::FromStr;

use ce_ast::{ErrorCode, Expression};

use super::{precedence, LatexDictionaryEntry as Entry, ParseHandler};
use crate::parser::{ErrorTrail, Parsed, Parser, Terminator};

pub(super) fn entries() -> Vec<Entry> {
    vec![
        Entry::matchfix("Delimiter", "(", ")"),
        Entry::matchfix("Delimiter", "\\left(", "\\right)"),
        Entry::matchfix("List", "[", "]"),
        Entry::matchfix("List", "\\left[", "\\right]"),
        Entry::matchfix("List", "\\lbrack", "\\rbrack"),
        Entry::infix("Sequence", ",", precedence::SEQUENCE)
            .with_handler(ParseHandler::Infix(parse_sequence_item)),
        Entry::infix("Sequence", ";", precedence::STATEMENT)
            .with_handler(ParseHandler::Infix(parse_sequence_item)),
        Entry::symbol("String", "\\text").with_handler(ParseHandler::Prefix(parse_text)),
        Entry::symbol("String", "\\mbox").with_handler(ParseHandler::Prefix(parse_text)),
        Entry::symbol("Symbol", "\\operatorname")
            .with_handler(ParseHandler::Prefix(parse_named)),
        Entry::symbol("Symbol", "\\mathrm").with_handler(ParseHandler::Prefix(parse_named)),
        Entry::symbol("Symbol", "\\mathit").with_handler(ParseHandler::Prefix(parse_named)),
        Entry::symbol("Error", "\\error").with_handler(ParseHandler::Prefix(parse_error)),
        Entry::environment("Matrix", "matrix"),
        Entry::environment("Matrix", "pmatrix"),
        Entry::environment("Matrix", "bmatrix"),
        Entry::environment("Piecewise", "cases"),
    ]
}

/// `a, b, c` builds one flat `Sequence`.
fn parse_sequence_item(p: &mut Parser<'_>, entry: &Entry, lhs: Expression, _: &Terminator) -> Parsed {
    let mut trail = ErrorTrail::default();
    let rhs = p.parse_infix_operand(entry);
    let rhs = p.required(rhs, &mut trail);
    let mut items = if lhs.inner().head() == Some("Sequence") {
        match lhs.into_inner().into_function() {
            Ok((_, ops)) => ops,
            Err(expr) => vec![expr],
        }
    } else {
        vec![lhs]
    };
    items.push(rhs);
    trail.finish(Expression::func("Sequence", items))
}

fn parse_text(p: &mut Parser<'_>, _: &Entry) -> Parsed {
    match p.parse_raw_group() {
        Some(text) => Parsed::Complete(Expression::string(text)),
        None => {
            let mut trail = ErrorTrail::default();
            let missing = p.missing(&mut trail);
            trail.finish(missing)
        }
    }
}

/// `\operatorname{max}`, `\mathrm{e}`: a multi-letter name, applied to
/// arguments when `(` follows.
fn parse_named(p: &mut Parser<'_>, _: &Entry) -> Parsed {
    let mut trail = ErrorTrail::default();
    let Some(raw) = p.parse_raw_group() else {
        let missing = p.missing(&mut trail);
        return trail.finish(missing);
    };
    let name: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if name.is_empty() {
        let missing = p.missing(&mut trail);
        return trail.finish(missing);
    }
    let name = match name.as_str() {
        "e" => "ExponentialE".to_string(),
        "i" => "ImaginaryUnit".to_string(),
        _ => name,
    };
    if p.at_open_paren() {
        let args = p.parse_delimited_arguments(&mut trail).unwrap_or_default();
        return trail.finish(Expression::func(name, args));
    }
    trail.finish(Expression::sym(name))
}

/// `\error{code}`, as written by the serializer.
fn parse_error(p: &mut Parser<'_>, _: &Entry) -> Parsed {
    let start = p.index().saturating_sub(1);
    let code = p
        .parse_raw_group()
        .and_then(|text| ErrorCode::from_str(&text).ok())
        .unwrap_or(ErrorCode::Missing);
    let (expr, err) = p.error(code, Vec::new(), None, start);
    Parsed::Partial(expr, err)
}
