//! Relations, logic connectives and set notation.

use ce_ast::{ErrorCode, Expression};

use super::{precedence, LatexDictionaryEntry as Entry, LibraryCategory, ParseHandler};
use crate::parser::{ErrorTrail, Parsed, Parser, Terminator};

const IMPLIES: u16 = 220;
const SET_OPERATION: u16 = 350;

/// Relations that read `a < b < c` as a single n-ary node.
const CHAINABLE: &[&str] = &["Equal", "Less", "LessEqual", "Greater", "GreaterEqual"];
const RELATIONS: &[&str] = &[
    "Equal",
    "Less",
    "LessEqual",
    "Greater",
    "GreaterEqual",
    "NotEqual",
    "Approx",
];

pub(super) fn entries() -> Vec<Entry> {
    let relational = [
        ("Equal", "="),
        ("Approx", "\\approx"),
        ("NotEqual", "\\neq"),
        ("NotEqual", "\\ne"),
        ("LessEqual", "\\leq"),
        ("LessEqual", "\\le"),
        ("LessEqual", "<="),
        ("GreaterEqual", "\\geq"),
        ("GreaterEqual", "\\ge"),
        ("GreaterEqual", ">="),
        ("Less", "<"),
        ("Less", "\\lt"),
        ("Greater", ">"),
        ("Greater", "\\gt"),
    ]
    .into_iter()
    .map(|(name, trigger)| {
        Entry::infix(name, trigger, precedence::RELATIONAL)
            .with_handler(ParseHandler::Infix(parse_relation))
            .in_category(LibraryCategory::Relational)
    });

    let logic = [
        Entry::infix("And", "\\land", precedence::AND),
        Entry::infix("And", "\\wedge", precedence::AND),
        Entry::infix("Or", "\\lor", precedence::OR),
        Entry::infix("Or", "\\vee", precedence::OR),
        Entry::infix("Implies", "\\implies", IMPLIES).right_associative(),
        Entry::infix("Implies", "\\Rightarrow", IMPLIES).right_associative(),
        Entry::prefix("Not", "\\lnot", precedence::NOT),
        Entry::prefix("Not", "\\neg", precedence::NOT),
        Entry::symbol("True", "\\top"),
        Entry::symbol("False", "\\bot"),
    ]
    .into_iter()
    .map(|e| e.in_category(LibraryCategory::Logic));

    let sets = [
        Entry::infix("Element", "\\in", precedence::ELEMENT),
        Entry::infix("NotElement", "\\notin", precedence::ELEMENT),
        Entry::infix("Subset", "\\subset", precedence::ELEMENT),
        Entry::infix("SubsetEqual", "\\subseteq", precedence::ELEMENT),
        Entry::infix("Union", "\\cup", SET_OPERATION),
        Entry::infix("Intersection", "\\cap", SET_OPERATION),
        Entry::matchfix("Set", "\\{", "\\}"),
        Entry::matchfix("Set", "\\left\\{", "\\right\\}"),
        Entry::symbol("EmptySet", "\\emptyset"),
        Entry::symbol("EmptySet", "\\varnothing"),
    ]
    .into_iter()
    .map(|e| e.in_category(LibraryCategory::Sets));

    relational.chain(logic).chain(sets).collect()
}

/// `a < b < c` is one `Less` node. A mixed chain such as `a < b \le c`
/// becomes an `And` of pairwise relations sharing their middle terms.
fn parse_relation(p: &mut Parser<'_>, entry: &Entry, lhs: Expression, _: &Terminator) -> Parsed {
    let mut trail = ErrorTrail::default();
    let rhs = p.parse_infix_operand(entry);
    let rhs = p.required(rhs, &mut trail);
    trail.finish(chain_relation(&entry.name, lhs, rhs))
}

fn is_relation(expr: &Expression) -> bool {
    expr.head().is_some_and(|h| RELATIONS.contains(&h))
}

fn chain_relation(name: &str, lhs: Expression, rhs: Expression) -> Expression {
    let chainable = CHAINABLE.contains(&name);
    if chainable && lhs.head() == Some(name) {
        return push_operand(name, lhs, rhs);
    }
    if is_relation(&lhs) {
        let pivot = last_operand(&lhs);
        return Expression::func("And", vec![lhs, Expression::func(name, vec![pivot, rhs])]);
    }
    let extends_and = lhs.head() == Some("And") && lhs.ops().last().is_some_and(is_relation);
    if !extends_and {
        return Expression::func(name, vec![lhs, rhs]);
    }
    match lhs.into_function() {
        Ok((head, mut ops)) => {
            match ops.pop() {
                Some(last) if chainable && last.head() == Some(name) => {
                    ops.push(push_operand(name, last, rhs));
                }
                Some(last) => {
                    let pivot = last_operand(&last);
                    ops.push(last);
                    ops.push(Expression::func(name, vec![pivot, rhs]));
                }
                None => ops.push(rhs),
            }
            Expression::func(head, ops)
        }
        Err(lhs) => Expression::func(name, vec![lhs, rhs]),
    }
}

fn last_operand(relation: &Expression) -> Expression {
    relation
        .ops()
        .last()
        .cloned()
        .unwrap_or_else(|| Expression::error(ErrorCode::Missing, vec![], None))
}

fn push_operand(name: &str, expr: Expression, operand: Expression) -> Expression {
    match expr.into_function() {
        Ok((head, mut ops)) => {
            ops.push(operand);
            Expression::func(head, ops)
        }
        Err(expr) => Expression::func(name, vec![expr, operand]),
    }
}
