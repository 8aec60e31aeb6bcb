//! Boxing: raw MathJSON to canonical boxed expressions.
//!
//! For each function node the [`Boxer`] boxes the operands, splices
//! `Sequence` operands into their parent, flattens associative heads,
//! validates operands against the head's signature, then hands over to
//! the head's canonical handler (or sorts and deduplicates per the head's
//! flags). Problems become `Error` nodes in place.

pub(crate) mod forms;
mod validate;

use ce_ast::{ErrorCode, Expression};
use ce_numeric::NumericValue;
use tracing::{debug, trace};

use crate::boxed::{canonical_order, BoxedExpr, ExprKind, Head, SymbolRef};
use crate::builtin::Builtin;
use crate::definitions::{Definition, Hold};
use crate::engine::Engine;

pub struct Boxer<'e> {
    engine: &'e Engine,
    depth: usize,
}

impl<'e> Boxer<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Self { engine, depth: 0 }
    }

    pub fn engine(&self) -> &'e Engine {
        self.engine
    }

    /// Box `expr` in canonical form.
    pub fn box_expr(&mut self, expr: &Expression) -> BoxedExpr {
        self.box_inner(expr, true)
    }

    /// Box `expr` keeping its structure: heads and symbols are resolved and
    /// numbers parsed, nothing else.
    pub fn box_non_canonical(&mut self, expr: &Expression) -> BoxedExpr {
        self.box_inner(expr, false)
    }

    fn box_inner(&mut self, expr: &Expression, canonical: bool) -> BoxedExpr {
        if self.depth >= self.engine.options().max_depth {
            debug!(depth = self.depth, "boxing depth limit reached");
            return BoxedExpr::error(ErrorCode::NestingTooDeep, vec![], None);
        }
        self.depth += 1;
        let boxed = match expr {
            Expression::Annotated(inner, meta) => {
                self.box_inner(inner, canonical).with_metadata(meta.clone())
            }
            Expression::Number(text) => self.number_literal(text),
            Expression::Symbol(name) => self.symbol(name),
            Expression::String(text) => BoxedExpr::string(text.as_str()),
            Expression::Function(head, ops) => self.box_function(head, ops, canonical),
        };
        self.depth -= 1;
        boxed
    }

    fn number_literal(&self, text: &str) -> BoxedExpr {
        match NumericValue::parse(text, &self.engine.numeric_context()) {
            Ok(value) => BoxedExpr::number(value),
            Err(err) => {
                trace!(%err, text, "invalid numeric literal");
                BoxedExpr::error(ErrorCode::UnexpectedToken, vec![BoxedExpr::string(text)], None)
            }
        }
    }

    /// A symbol keyed by the scope that binds it, or by the current scope
    /// when nothing does.
    pub fn symbol(&self, name: &str) -> BoxedExpr {
        let scopes = self.engine.scopes();
        if let Some((scope, binding)) = scopes.current().lookup(name) {
            let domain = Definition::from_binding(binding).domain();
            return BoxedExpr::symbol(SymbolRef::new(name, scope), Some(domain));
        }
        let domain = self.engine.library().constant(name).map(|c| c.domain);
        let scope = if domain.is_some() {
            crate::scope::ScopeId::GLOBAL
        } else {
            scopes.current_id()
        };
        BoxedExpr::symbol(SymbolRef::new(name, scope), domain)
    }

    fn head(&self, name: &str) -> Head {
        match Builtin::from_name(name) {
            Some(builtin) => Head::Builtin(builtin),
            None => {
                let scope = self
                    .engine
                    .scopes()
                    .current()
                    .lookup(name)
                    .map_or_else(|| self.engine.scopes().current_id(), |(scope, _)| scope);
                Head::User(SymbolRef::new(name, scope))
            }
        }
    }

    fn box_function(&mut self, name: &str, ops: &[Expression], canonical: bool) -> BoxedExpr {
        let head = self.head(name);
        let hold_all = matches!(
            head,
            Head::Builtin(Builtin::Error | Builtin::ErrorCode | Builtin::Hold)
        );
        if !canonical || hold_all {
            let ops = ops.iter().map(|op| self.box_inner(op, false)).collect();
            return BoxedExpr::function(head, ops, hold_all);
        }
        let ops = ops.iter().map(|op| self.box_inner(op, true)).collect();
        self.apply_head(head, ops)
    }

    /// Canonical form of an already boxed expression.
    pub fn canonical(&mut self, expr: &BoxedExpr) -> BoxedExpr {
        if expr.is_canonical() {
            return expr.clone();
        }
        let ExprKind::Function(head, ops) = expr.kind() else {
            return expr.clone();
        };
        let ops = ops.iter().map(|op| self.canonical(op)).collect();
        let result = self.apply_head(head.clone(), ops);
        match expr.metadata() {
            Some(meta) => result.with_metadata(meta.clone()),
            None => result,
        }
    }

    /// Apply a built-in head to canonical operands.
    pub fn apply(&mut self, builtin: Builtin, ops: Vec<BoxedExpr>) -> BoxedExpr {
        self.apply_head(Head::Builtin(builtin), ops)
    }

    /// Apply `head` to canonical operands and canonicalize the result.
    pub fn apply_head(&mut self, head: Head, ops: Vec<BoxedExpr>) -> BoxedExpr {
        let builtin = match head {
            Head::Builtin(b) => b,
            Head::User(_) => {
                let ops = splice_sequences(ops);
                return BoxedExpr::function(head, ops, true);
            }
        };
        if matches!(builtin, Builtin::Error | Builtin::ErrorCode | Builtin::Hold) {
            return BoxedExpr::function(head, ops, true);
        }
        let def = self.engine.library().function(builtin);
        let mut ops = splice_sequences(ops);
        if def.flags.associative {
            ops = flatten(builtin, ops);
        }
        let ops = validate::check_signature(def, ops);
        match def.canonical {
            Some(handler) => handler(self, ops),
            None => self.finish(builtin, ops),
        }
    }

    /// Default canonical shape: commutative heads sorted, idempotent
    /// n-ary heads deduplicated.
    pub fn finish(&mut self, builtin: Builtin, mut ops: Vec<BoxedExpr>) -> BoxedExpr {
        let def = self.engine.library().function(builtin);
        if def.flags.commutative {
            ops.sort_by(canonical_order);
        }
        if def.flags.idempotent && def.flags.associative {
            ops.dedup();
        }
        BoxedExpr::function(builtin, ops, true)
    }

    pub fn hold_policy(&self, builtin: Builtin) -> Hold {
        self.engine.library().function(builtin).hold
    }
}

/// `f(a, Sequence(b, c))` is `f(a, b, c)`.
fn splice_sequences(ops: Vec<BoxedExpr>) -> Vec<BoxedExpr> {
    if !ops.iter().any(|op| op.is_head(Builtin::Sequence)) {
        return ops;
    }
    let mut out = Vec::with_capacity(ops.len());
    for op in ops {
        if op.is_head(Builtin::Sequence) {
            out.extend(op.ops().iter().cloned());
        } else {
            out.push(op);
        }
    }
    out
}

fn flatten(builtin: Builtin, ops: Vec<BoxedExpr>) -> Vec<BoxedExpr> {
    if !ops.iter().any(|op| op.is_head(builtin)) {
        return ops;
    }
    let mut out = Vec::with_capacity(ops.len() + 2);
    for op in ops {
        if op.is_head(builtin) {
            out.extend(flatten(builtin, op.ops().to_vec()));
        } else {
            out.push(op);
        }
    }
    out
}

#[cfg(test)]
mod tests;
