use std::cmp::Ordering;

use ce_numeric::NumericValue;

use super::{BoxedExpr, ExprKind, Head};
use crate::library::Library;

/// Total order used to sort the operands of commutative heads.
///
/// 1. Numbers first, by value.
/// 2. Then by complexity: strings, symbols, then functions by the weight of
///    their head and their size.
/// 3. Ties broken structurally, so two expressions compare `Equal` only
///    when they are structurally equal.
pub fn canonical_order(a: &BoxedExpr, b: &BoxedExpr) -> Ordering {
    if a.ptr_eq(b) {
        return Ordering::Equal;
    }
    match (a.kind(), b.kind()) {
        (ExprKind::Number(x), ExprKind::Number(y)) => compare_numbers(x, y),
        (ExprKind::Number(_), _) => Ordering::Less,
        (_, ExprKind::Number(_)) => Ordering::Greater,
        _ => complexity(a)
            .cmp(&complexity(b))
            .then_with(|| compare_structure(a, b)),
    }
}

fn compare_numbers(x: &NumericValue, y: &NumericValue) -> Ordering {
    x.compare(y)
        .unwrap_or(Ordering::Equal)
        .then_with(|| representation_rank(x).cmp(&representation_rank(y)))
        .then_with(|| x.to_string().cmp(&y.to_string()))
}

fn representation_rank(x: &NumericValue) -> u8 {
    match x {
        NumericValue::Integer(_) => 0,
        NumericValue::Rational(_) => 1,
        NumericValue::Decimal(_) => 2,
        NumericValue::Float(_) => 3,
        NumericValue::Complex(_) => 4,
    }
}

fn head_weight(head: &Head) -> u16 {
    match head {
        Head::Builtin(b) => Library::shared().function(*b).complexity,
        Head::User(_) => 5000,
    }
}

fn complexity(expr: &BoxedExpr) -> (u16, usize) {
    match expr.kind() {
        ExprKind::Number(_) => (0, 1),
        ExprKind::String(_) => (1, 1),
        ExprKind::Symbol(_) => (2, 1),
        ExprKind::Function(head, _) => (head_weight(head), expr.node_count()),
    }
}

fn kind_rank(expr: &BoxedExpr) -> u8 {
    match expr.kind() {
        ExprKind::Number(_) => 0,
        ExprKind::String(_) => 1,
        ExprKind::Symbol(_) => 2,
        ExprKind::Function(..) => 3,
    }
}

fn compare_structure(a: &BoxedExpr, b: &BoxedExpr) -> Ordering {
    match (a.kind(), b.kind()) {
        (ExprKind::Number(x), ExprKind::Number(y)) => compare_numbers(x, y),
        (ExprKind::String(x), ExprKind::String(y)) => x.cmp(y),
        (ExprKind::Symbol(x), ExprKind::Symbol(y)) => {
            x.name.cmp(&y.name).then_with(|| x.scope.cmp(&y.scope))
        }
        (ExprKind::Function(h1, ops1), ExprKind::Function(h2, ops2)) => h1
            .name()
            .cmp(h2.name())
            .then_with(|| ops1.len().cmp(&ops2.len()))
            .then_with(|| {
                ops1.iter()
                    .zip(ops2)
                    .map(|(x, y)| canonical_order(x, y))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| head_scope_order(h1, h2)),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn head_scope_order(h1: &Head, h2: &Head) -> Ordering {
    match (h1, h2) {
        (Head::User(x), Head::User(y)) => x.scope.cmp(&y.scope),
        (Head::Builtin(_), Head::User(_)) => Ordering::Less,
        (Head::User(_), Head::Builtin(_)) => Ordering::Greater,
        (Head::Builtin(x), Head::Builtin(y)) => x.cmp(y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxed::SymbolRef;
    use crate::builtin::Builtin;
    use crate::scope::ScopeId;

    fn sym(name: &str) -> BoxedExpr {
        BoxedExpr::symbol(SymbolRef::new(name, ScopeId::GLOBAL), None)
    }

    fn sorted(mut items: Vec<BoxedExpr>) -> Vec<String> {
        items.sort_by(canonical_order);
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_numbers_then_symbols_then_functions() {
        let square = BoxedExpr::function(Builtin::Power, vec![sym("x"), BoxedExpr::integer(2)], true);
        let items = vec![square, sym("y"), BoxedExpr::integer(3), sym("x"), BoxedExpr::integer(-1)];
        assert_eq!(sorted(items), vec!["-1", "3", "\"x\"", "\"y\"", r#"["Power","x",2]"#]);
    }

    #[test]
    fn test_order_is_total_on_distinct_values() {
        let one = BoxedExpr::integer(1);
        let one_float = BoxedExpr::number(NumericValue::Float(1.0));
        assert_ne!(canonical_order(&one, &one_float), Ordering::Equal);
        let f = BoxedExpr::function(Builtin::Sin, vec![sym("x")], true);
        let g = BoxedExpr::function(Builtin::Sin, vec![sym("y")], true);
        assert_eq!(canonical_order(&f, &g), Ordering::Less);
        assert_eq!(canonical_order(&g, &f), Ordering::Greater);
        assert_eq!(canonical_order(&f, &f.clone()), Ordering::Equal);
    }
}
