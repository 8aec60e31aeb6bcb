//! The engine: one context owning the parser, the definition registry and
//! the scope chain.
//!
//! Everything mutable during a computation (current scope, numeric mode,
//! collected diagnostics) lives here, so an `Engine` belongs to one thread.
//! The grammar index and the built-in library are shared read-only.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use ce_ast::{ErrorCode, Expression};
use ce_latex::{default_dictionary, GrammarIndex, LatexSyntax, LibraryCategory};
use ce_numeric::{NumericContext, NumericMode};
use serde_json::Value;
use tracing::{debug, info};

use crate::boxed::BoxedExpr;
use crate::builtin::Builtin;
use crate::canonical::Boxer;
use crate::definitions::{Definition, SymbolDef, UserFunction};
use crate::diagnostics::{Diagnostic, Diagnostics, Severity};
use crate::domain::Domain;
use crate::error::EngineError;
use crate::eval::Evaluator;
use crate::library::Library;
use crate::options::EngineOptions;
use crate::scope::{Binding, ScopeId, ScopeRegistry};
use crate::simplifier::Simplifier;

pub struct Engine {
    options: EngineOptions,
    syntax: LatexSyntax,
    library: Arc<Library>,
    scopes: ScopeRegistry,
    simplifier: Simplifier,
    diagnostics: RefCell<Diagnostics>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

fn syntax_for(options: &EngineOptions) -> LatexSyntax {
    if options.uses_all_categories() {
        LatexSyntax::new(options.parse_options())
    } else {
        let index = GrammarIndex::new(default_dictionary(), &options.categories);
        LatexSyntax::with_index(Arc::new(index), options.parse_options())
    }
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        info!(mode = ?options.numeric_mode, precision = options.precision, "creating engine");
        Self {
            syntax: syntax_for(&options),
            options,
            library: Library::shared_arc(),
            scopes: ScopeRegistry::new(),
            simplifier: Simplifier::with_default_rules(),
            diagnostics: RefCell::new(Diagnostics::default()),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn scopes(&self) -> &ScopeRegistry {
        &self.scopes
    }

    pub fn simplifier(&self) -> &Simplifier {
        &self.simplifier
    }

    /// Rules can be added or disabled between computations.
    pub fn simplifier_mut(&mut self) -> &mut Simplifier {
        &mut self.simplifier
    }

    pub fn syntax(&self) -> &LatexSyntax {
        &self.syntax
    }

    /// Exact numeric context of the current mode.
    pub fn numeric_context(&self) -> NumericContext {
        self.options.numeric_context()
    }

    pub fn set_numeric_mode(&mut self, mode: NumericMode) {
        debug!(?mode, "numeric mode changed");
        self.options.numeric_mode = mode;
    }

    pub fn set_precision(&mut self, precision: usize) {
        self.options.precision = precision.max(1);
    }

    /// Restrict the parser to some dictionary categories.
    pub fn set_categories(&mut self, categories: Vec<LibraryCategory>) {
        self.options.categories = categories;
        self.syntax = syntax_for(&self.options);
    }

    // Diagnostics

    /// Forward every new diagnostic to `sink`.
    pub fn on_diagnostic(&self, sink: impl Fn(&Diagnostic) + 'static) {
        self.diagnostics.borrow_mut().set_sink(Box::new(sink));
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().report(diagnostic);
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().items().to_vec()
    }

    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow_mut().take()
    }

    // Parsing and boxing

    /// Parse LaTeX without boxing.
    pub fn parse_raw(&self, latex: &str, cursor: Option<usize>) -> Expression {
        let (expr, errors) = self.syntax.parse_with_errors(latex, cursor);
        for error in errors {
            let mut diagnostic = Diagnostic::new(Severity::Error, error.code, error.to_string());
            if let Some(detail) = error.detail {
                diagnostic = diagnostic.with_subject(detail);
            }
            self.report(diagnostic);
        }
        expr
    }

    /// Parse LaTeX into a canonical boxed expression.
    pub fn parse(&self, latex: &str) -> BoxedExpr {
        self.parse_with_cursor(latex, None)
    }

    pub fn parse_with_cursor(&self, latex: &str, cursor: Option<usize>) -> BoxedExpr {
        let raw = self.parse_raw(latex, cursor);
        self.box_expr(&raw)
    }

    pub fn box_expr(&self, expr: &Expression) -> BoxedExpr {
        Boxer::new(self).box_expr(expr)
    }

    pub fn box_non_canonical(&self, expr: &Expression) -> BoxedExpr {
        Boxer::new(self).box_non_canonical(expr)
    }

    /// Box a MathJSON document.
    pub fn box_json(&self, json: &Value) -> Result<BoxedExpr, EngineError> {
        let expr = Expression::from_json(json)?;
        Ok(self.box_expr(&expr))
    }

    pub fn canonical(&self, expr: &BoxedExpr) -> BoxedExpr {
        Boxer::new(self).canonical(expr)
    }

    /// LaTeX for `expr`.
    pub fn serialize(&self, expr: &BoxedExpr) -> String {
        self.syntax.serialize(&expr.to_expression())
    }

    // The three tiers

    /// Exact algebraic rewrites; never evaluates symbols.
    pub fn simplify(&self, expr: &BoxedExpr) -> BoxedExpr {
        let expr = self.canonical(expr);
        let mut ev = Evaluator::silent(self);
        self.simplifier.simplify(&mut ev, &expr)
    }

    /// Exact evaluation; results without an exact value stay symbolic.
    pub fn evaluate(&self, expr: &BoxedExpr) -> Result<BoxedExpr, EngineError> {
        let expr = self.canonical(expr);
        Evaluator::new(self, false).evaluate(&expr)
    }

    /// Numeric approximation under the current numeric mode.
    pub fn n(&self, expr: &BoxedExpr) -> Result<BoxedExpr, EngineError> {
        let exact = self.evaluate(expr)?;
        Evaluator::new(self, true).evaluate(&exact)
    }

    // Definitions and scopes

    /// Declare a symbol of `domain` in the current scope, without a value.
    pub fn declare(&self, name: &str, domain: Domain) {
        self.scopes
            .current()
            .declare(name, Binding::Symbol(SymbolDef::new(domain)));
    }

    /// Declare a symbol whose value can never be reassigned.
    pub fn declare_constant(&self, name: &str, value: BoxedExpr) -> Result<(), EngineError> {
        self.check_assignable(name)?;
        self.scopes
            .current()
            .declare(name, Binding::Symbol(SymbolDef::with_value(value).constant()));
        Ok(())
    }

    fn check_assignable(&self, name: &str) -> Result<(), EngineError> {
        if self.library.constant(name).is_some() || Builtin::from_name(name).is_some() {
            return Err(EngineError::ConstantAssignment(name.to_string()));
        }
        Ok(())
    }

    /// Set the value of `name`. The innermost binding is updated in place;
    /// an unbound name is declared in the current scope.
    pub fn assign(&self, name: &str, value: BoxedExpr) -> Result<(), EngineError> {
        self.check_assignable(name)?;
        let value = self.canonical(&value);
        match self.scopes.current().lookup(name) {
            Some((_, Binding::Symbol(def))) if def.constant => {
                Err(EngineError::ConstantAssignment(name.to_string()))
            }
            Some((scope, Binding::Symbol(_))) => {
                let domain = value.domain();
                self.scopes.get(scope)?.update_symbol(name, |def| {
                    def.domain = domain;
                    def.value = Some(value);
                });
                Ok(())
            }
            _ => {
                self.scopes
                    .current()
                    .declare(name, Binding::Symbol(SymbolDef::with_value(value)));
                Ok(())
            }
        }
    }

    /// Define a user function `name(params) = body` in the current scope.
    pub fn define_function(&self, name: &str, params: &[&str], body: BoxedExpr) -> Result<(), EngineError> {
        self.check_assignable(name)?;
        let function = UserFunction {
            params: params.iter().map(|p| p.to_string()).collect(),
            body: self.canonical(&body),
        };
        self.scopes
            .current()
            .declare(name, Binding::Function(Rc::new(function)));
        Ok(())
    }

    pub fn push_scope(&self) -> ScopeId {
        self.scopes.push()
    }

    pub fn pop_scope(&self) -> Result<ScopeId, EngineError> {
        self.scopes.pop()
    }

    /// What `name` means in the current scope.
    pub fn lookup(&self, name: &str) -> Option<Definition<'_>> {
        if let Some((_, binding)) = self.scopes.current().lookup(name) {
            return Some(Definition::from_binding(binding));
        }
        if let Some(constant) = self.library.constant(name) {
            return Some(Definition::Constant(constant));
        }
        Builtin::from_name(name).map(|b| Definition::Builtin(self.library.function(b)))
    }

    /// Like [`lookup`](Self::lookup), reporting an unbound name.
    pub fn resolve(&self, name: &str) -> Option<Definition<'_>> {
        let definition = self.lookup(name);
        if definition.is_none() {
            self.report(Diagnostic::unbound(name));
        }
        definition
    }

    /// Whether any diagnostic of `code` has been reported.
    pub fn has_diagnostic(&self, code: ErrorCode) -> bool {
        self.diagnostics.borrow().has_code(code)
    }
}
