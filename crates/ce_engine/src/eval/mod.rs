//! The `evaluate` and `N` tiers.
//!
//! An [`Evaluator`] walks a canonical expression, substitutes symbol
//! values found through the scope chain, evaluates operands according to
//! each head's hold policy and calls the head's evaluate handler. Heads
//! without a handler, and handlers that decline, fall back to the
//! head's canonical rebuild followed by a local simplification pass.
//!
//! In numeric mode (`N`) the numeric context allows approximation, so
//! handlers that would keep an inexact result symbolic produce a number
//! instead, and library constants are replaced by their values.

pub(crate) mod arithmetic;
pub(crate) mod functions;
pub(crate) mod logic;
pub(crate) mod sum;

use ce_ast::ErrorCode;
use ce_numeric::{NumericContext, NumericError, NumericValue};
use tracing::{debug, trace};

use crate::boxed::{BoxedExpr, ExprKind, Head, SymbolRef};
use crate::builtin::Builtin;
use crate::canonical::Boxer;
use crate::definitions::{ConstantValue, SymbolDef};
use crate::diagnostics::{Diagnostic, Severity};
use crate::domain::Domain;
use crate::engine::Engine;
use crate::ensure_invariant;
use crate::error::EngineError;
use crate::scope::Binding;

pub struct Evaluator<'e> {
    engine: &'e Engine,
    ctx: NumericContext,
    depth: usize,
    /// Report error nodes as diagnostics.
    reporting: bool,
}

impl<'e> Evaluator<'e> {
    /// `numeric` selects the `N` tier.
    pub fn new(engine: &'e Engine, numeric: bool) -> Self {
        Self {
            engine,
            ctx: engine.numeric_context().with_approximation(numeric),
            depth: 0,
            reporting: true,
        }
    }

    /// Exact evaluator used by simplification rules; trial evaluations
    /// report nothing.
    pub fn silent(engine: &'e Engine) -> Self {
        Self {
            reporting: false,
            ..Self::new(engine, false)
        }
    }

    pub fn engine(&self) -> &'e Engine {
        self.engine
    }

    pub fn ctx(&self) -> &NumericContext {
        &self.ctx
    }

    pub fn is_numeric(&self) -> bool {
        self.ctx.approximate
    }

    pub fn boxer(&self) -> Boxer<'e> {
        Boxer::new(self.engine)
    }

    /// Canonical application of a built-in head.
    pub fn apply(&self, builtin: Builtin, ops: Vec<BoxedExpr>) -> BoxedExpr {
        self.boxer().apply(builtin, ops)
    }

    pub fn symbol(&self, name: &str) -> BoxedExpr {
        self.boxer().symbol(name)
    }

    /// A numeric result; approximated in the `N` tier.
    pub fn number(&self, value: NumericValue) -> BoxedExpr {
        if self.is_numeric() {
            BoxedExpr::number(value.approximate(&self.ctx))
        } else {
            BoxedExpr::number(value)
        }
    }

    /// An error node, also reported as a diagnostic.
    pub fn error(&self, code: ErrorCode, details: Vec<BoxedExpr>, original: BoxedExpr) -> BoxedExpr {
        if self.reporting {
            let message = format!("{code} in {original}");
            self.engine.report(Diagnostic::new(Severity::Error, code, message));
        }
        BoxedExpr::error(code, details, Some(original))
    }

    /// Map the outcome of a numeric operation to a result. Results with no
    /// exact value decline, leaving the expression symbolic.
    pub fn numeric_outcome(
        &self,
        result: Result<NumericValue, NumericError>,
        original: impl FnOnce() -> BoxedExpr,
    ) -> Option<BoxedExpr> {
        match result {
            Ok(value) => Some(self.number(value)),
            Err(NumericError::Inexact | NumericError::Overflow(_) | NumericError::Parse(_)) => None,
            Err(NumericError::DivisionByZero) => {
                Some(self.error(ErrorCode::DivisionByZero, vec![], original()))
            }
            Err(NumericError::Undefined(what)) => Some(self.error(
                ErrorCode::Undefined,
                vec![BoxedExpr::string(what)],
                original(),
            )),
        }
    }

    pub fn evaluate(&mut self, expr: &BoxedExpr) -> Result<BoxedExpr, EngineError> {
        if self.depth >= self.engine.options().max_depth {
            debug!(depth = self.depth, "evaluation depth limit reached");
            return Ok(BoxedExpr::error(ErrorCode::NestingTooDeep, vec![], Some(expr.clone())));
        }
        self.depth += 1;
        let result = self.evaluate_node(expr);
        self.depth -= 1;
        result
    }

    fn evaluate_node(&mut self, expr: &BoxedExpr) -> Result<BoxedExpr, EngineError> {
        match expr.kind() {
            ExprKind::Number(n) => Ok(if self.is_numeric() {
                BoxedExpr::number(n.approximate(&self.ctx))
            } else {
                expr.clone()
            }),
            ExprKind::String(_) => Ok(expr.clone()),
            ExprKind::Symbol(symbol) => self.evaluate_symbol(expr, symbol),
            ExprKind::Function(Head::User(head), ops) => self.apply_user(expr, head, ops),
            ExprKind::Function(Head::Builtin(builtin), ops) => self.evaluate_builtin(expr, *builtin, ops),
        }
    }

    /// Binding of `symbol`: the current scope chain first, then the chain
    /// of the scope the symbol was boxed in.
    pub fn resolve(&self, symbol: &SymbolRef) -> Result<Option<Binding>, EngineError> {
        let scopes = self.engine.scopes();
        if let Some((_, binding)) = scopes.current().lookup(&symbol.name) {
            return Ok(Some(binding));
        }
        let home = scopes.get(symbol.scope)?;
        Ok(home.lookup(&symbol.name).map(|(_, binding)| binding))
    }

    fn evaluate_symbol(&mut self, expr: &BoxedExpr, symbol: &SymbolRef) -> Result<BoxedExpr, EngineError> {
        match self.resolve(symbol)? {
            Some(Binding::Symbol(SymbolDef { value: Some(value), .. })) => {
                trace!(name = %symbol.name, "substituting symbol value");
                return self.evaluate(&value);
            }
            Some(_) => return Ok(expr.clone()),
            None => {}
        }
        let library = self.engine.library();
        match library.constant(&symbol.name).map(|c| c.value) {
            Some(ConstantValue::Exact(value)) => Ok(self.number(value())),
            Some(ConstantValue::Approximate(value)) if self.is_numeric() => {
                Ok(BoxedExpr::number(value(&self.ctx)))
            }
            Some(_) => Ok(expr.clone()),
            None => {
                if self.reporting && symbol.name.parse::<Domain>().is_err() {
                    self.engine.report(Diagnostic::unbound(&symbol.name));
                }
                Ok(expr.clone())
            }
        }
    }

    /// Apply a user function: arguments are bound to its parameters in a
    /// fresh child scope for the duration of the body's evaluation.
    fn apply_user(&mut self, expr: &BoxedExpr, head: &SymbolRef, ops: &[BoxedExpr]) -> Result<BoxedExpr, EngineError> {
        let args = ops
            .iter()
            .map(|op| self.evaluate(op))
            .collect::<Result<Vec<_>, _>>()?;
        let function = match self.resolve(head)? {
            Some(Binding::Function(function)) => function,
            _ => return Ok(expr.with_ops(args, true)),
        };
        let scopes = self.engine.scopes();
        let pushed = scopes.push();
        for (param, arg) in function.params.iter().zip(args) {
            scopes
                .current()
                .declare(param, Binding::Symbol(SymbolDef::with_value(arg)));
        }
        let result = self.evaluate(&function.body);
        let popped = scopes.pop()?;
        ensure_invariant!(pushed == popped, "unbalanced scope {} in {}", popped, head.name);
        result
    }

    fn evaluate_builtin(&mut self, expr: &BoxedExpr, builtin: Builtin, ops: &[BoxedExpr]) -> Result<BoxedExpr, EngineError> {
        if matches!(builtin, Builtin::Error | Builtin::ErrorCode | Builtin::Hold) {
            return Ok(expr.clone());
        }
        let def = self.engine.library().function(builtin);
        let mut args = Vec::with_capacity(ops.len());
        for (position, op) in ops.iter().enumerate() {
            if def.hold.holds(position) {
                args.push(op.clone());
            } else {
                args.push(self.evaluate(op)?);
            }
        }
        if def.flags.threadable && args.iter().all(BoxedExpr::is_valid) {
            if let Some(threaded) = self.thread(builtin, &args)? {
                return Ok(threaded);
            }
        }
        self.dispatch(builtin, args)
    }

    /// Run the head's handler on evaluated operands, or rebuild. Operands
    /// carrying an error are rebuilt untouched so the error survives.
    fn dispatch(&mut self, builtin: Builtin, args: Vec<BoxedExpr>) -> Result<BoxedExpr, EngineError> {
        if !args.iter().all(BoxedExpr::is_valid) {
            return Ok(self.apply(builtin, args));
        }
        let def = self.engine.library().function(builtin);
        let arity_ok = args.len() >= def.signature.min_arity();
        if let (Some(handler), true) = (def.evaluate, arity_ok) {
            if let Some(result) = handler(self, &args)? {
                return Ok(self.simplify_local(&result));
            }
        }
        let rebuilt = self.apply(builtin, args);
        Ok(self.simplify_local(&rebuilt))
    }

    /// Element-wise application over `List` operands of equal length;
    /// other operands are repeated.
    fn thread(&mut self, builtin: Builtin, args: &[BoxedExpr]) -> Result<Option<BoxedExpr>, EngineError> {
        let mut lengths = args.iter().filter(|a| a.is_head(Builtin::List)).map(BoxedExpr::nops);
        let Some(len) = lengths.next() else {
            return Ok(None);
        };
        if lengths.any(|l| l != len) {
            return Ok(None);
        }
        let mut items = Vec::with_capacity(len);
        for i in 0..len {
            let row = args
                .iter()
                .map(|a| {
                    if a.is_head(Builtin::List) {
                        a.ops()[i].clone()
                    } else {
                        a.clone()
                    }
                })
                .collect();
            items.push(self.dispatch(builtin, row)?);
        }
        Ok(Some(BoxedExpr::function(Builtin::List, items, true)))
    }

    /// Local rewrite pass of the simplifier on a single node.
    pub fn simplify_local(&mut self, expr: &BoxedExpr) -> BoxedExpr {
        let engine = self.engine;
        engine.simplifier().simplify_local(self, expr)
    }
}

#[cfg(test)]
mod tests;
