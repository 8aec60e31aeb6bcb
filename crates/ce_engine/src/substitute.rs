//! Symbol substitution.
//!
//! `expr.subs(&map, &engine)` replaces every free occurrence of a symbol
//! named in `map` and rebuilds the changed nodes through the [`Boxer`], so
//! the result is canonical again: `["Add","x",1]` with `x -> 2` becomes `3`.
//! The index of a `Sum` or `Product` shadows an outer symbol of the same
//! name inside the body; its limits still see the outer one.

use rustc_hash::FxHashMap;

use crate::boxed::{BoxedExpr, ExprKind, Head};
use crate::builtin::Builtin;
use crate::canonical::Boxer;
use crate::engine::Engine;

impl BoxedExpr {
    pub fn subs(&self, map: &FxHashMap<String, BoxedExpr>, engine: &Engine) -> BoxedExpr {
        let mut boxer = Boxer::new(engine);
        let expr = boxer.canonical(self);
        if map.is_empty() {
            return expr;
        }
        let mut substitution = Substitution {
            map,
            bound: Vec::new(),
            boxer,
        };
        substitution.apply(&expr)
    }
}

struct Substitution<'m, 'e> {
    map: &'m FxHashMap<String, BoxedExpr>,
    /// Indices of the enclosing `Sum`/`Product` nodes.
    bound: Vec<String>,
    boxer: Boxer<'e>,
}

impl Substitution<'_, '_> {
    fn apply(&mut self, expr: &BoxedExpr) -> BoxedExpr {
        match expr.kind() {
            ExprKind::Symbol(symbol) => {
                let name = &*symbol.name;
                if self.bound.iter().any(|b| b == name) {
                    return expr.clone();
                }
                match self.map.get(name) {
                    Some(value) => self.boxer.canonical(value),
                    None => expr.clone(),
                }
            }
            ExprKind::Function(Head::Builtin(Builtin::Error | Builtin::ErrorCode), _) => expr.clone(),
            ExprKind::Function(head @ Head::Builtin(Builtin::Sum | Builtin::Product), ops) => {
                self.apply_big_operator(expr, head, ops)
            }
            ExprKind::Function(head, ops) => {
                let new_ops: Vec<BoxedExpr> = ops.iter().map(|op| self.apply(op)).collect();
                self.rebuild(expr, head, ops, new_ops)
            }
            _ => expr.clone(),
        }
    }

    /// `Sum(body, Triple(index, lower, upper))`: the limits are substituted
    /// as written, the body with the index bound.
    fn apply_big_operator(&mut self, expr: &BoxedExpr, head: &Head, ops: &[BoxedExpr]) -> BoxedExpr {
        let index = ops
            .get(1)
            .and_then(|limits| limits.op(0))
            .and_then(BoxedExpr::symbol_name)
            .map(str::to_owned);
        let mut new_ops = Vec::with_capacity(ops.len());
        for (position, op) in ops.iter().enumerate() {
            let new_op = match (position, &index) {
                (0, Some(index)) => {
                    self.bound.push(index.clone());
                    let body = self.apply(op);
                    self.bound.pop();
                    body
                }
                (1, Some(_)) => self.apply_limits(op),
                _ => self.apply(op),
            };
            new_ops.push(new_op);
        }
        self.rebuild(expr, head, ops, new_ops)
    }

    fn apply_limits(&mut self, limits: &BoxedExpr) -> BoxedExpr {
        let Some(head) = limits.head() else {
            return limits.clone();
        };
        let ops = limits.ops();
        let new_ops = ops
            .iter()
            .enumerate()
            .map(|(position, op)| if position == 0 { op.clone() } else { self.apply(op) })
            .collect();
        self.rebuild(limits, head, ops, new_ops)
    }

    fn rebuild(&mut self, expr: &BoxedExpr, head: &Head, old: &[BoxedExpr], new: Vec<BoxedExpr>) -> BoxedExpr {
        if old.iter().zip(&new).all(|(a, b)| a.ptr_eq(b)) {
            return expr.clone();
        }
        self.boxer.apply_head(head.clone(), new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(engine: &Engine, pairs: &[(&str, &str)]) -> FxHashMap<String, BoxedExpr> {
        pairs
            .iter()
            .map(|(name, latex)| (name.to_string(), engine.parse(latex)))
            .collect()
    }

    #[test]
    fn test_substitute_simple() {
        let engine = Engine::default();
        let expr = engine.parse("x^2+y");
        let result = expr.subs(&bindings(&engine, &[("x", "3")]), &engine);
        assert_eq!(result, engine.parse("3^2+y"));
        assert!(result.is_canonical());
        assert_eq!(engine.evaluate(&result).unwrap(), engine.parse("9+y"));

        let twice = engine.parse("x+x").subs(&bindings(&engine, &[("x", "y")]), &engine);
        assert_eq!(twice, engine.parse("y+y"));
    }

    #[test]
    fn test_substitute_folds_exact_constants() {
        let engine = Engine::default();
        let expr = engine.parse("\\frac{x}{2}");
        let result = expr.subs(&bindings(&engine, &[("x", "1")]), &engine);
        assert_eq!(result.to_string(), r#"["Rational",1,2]"#);
    }

    #[test]
    fn test_untouched_expression_is_shared() {
        let engine = Engine::default();
        let expr = engine.parse("a+b");
        let result = expr.subs(&bindings(&engine, &[("z", "1")]), &engine);
        assert!(result.ptr_eq(&expr));
        assert!(expr.subs(&FxHashMap::default(), &engine).ptr_eq(&expr));
    }

    #[test]
    fn test_shadow_variable() {
        let engine = Engine::default();
        let sum = engine.parse("\\sum_{k=1}^{n} k");
        let map = bindings(&engine, &[("k", "5"), ("n", "3")]);
        let result = sum.subs(&map, &engine);
        assert!(result.is_head(Builtin::Sum));
        assert!(result.free_variables().is_empty());
        assert_eq!(engine.evaluate(&result).unwrap().to_string(), "6");

        let scaled = engine.parse("\\sum_{k=1}^{3} k x").subs(&bindings(&engine, &[("x", "2")]), &engine);
        assert_eq!(engine.evaluate(&scaled).unwrap().to_string(), "12");
    }
}
