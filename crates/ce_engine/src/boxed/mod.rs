//! Boxed expressions.
//!
//! A [`BoxedExpr`] is an immutable, reference-counted node. Its structural
//! hash is computed once at construction; equality compares hashes first
//! and falls back to a structural walk. Metadata and the canonical flag do
//! not take part in equality.

mod json;
pub mod ordering;

use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use ce_ast::{ErrorCode, Metadata};
use ce_numeric::NumericValue;
use rustc_hash::{FxHashSet, FxHasher};

use crate::builtin::Builtin;
use crate::domain::Domain;
use crate::library::Library;
use crate::scope::ScopeId;

pub use ordering::canonical_order;

/// A symbol name plus the scope it was boxed in. The scope is a lookup
/// key, not an owning reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolRef {
    pub name: Rc<str>,
    pub scope: ScopeId,
}

impl SymbolRef {
    pub fn new(name: &str, scope: ScopeId) -> Self {
        Self {
            name: Rc::from(name),
            scope,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Head {
    Builtin(Builtin),
    User(SymbolRef),
}

impl Head {
    pub fn name(&self) -> &str {
        match self {
            Head::Builtin(b) => b.name(),
            Head::User(s) => &s.name,
        }
    }

    pub fn builtin(&self) -> Option<Builtin> {
        match self {
            Head::Builtin(b) => Some(*b),
            Head::User(_) => None,
        }
    }
}

impl From<Builtin> for Head {
    fn from(b: Builtin) -> Self {
        Head::Builtin(b)
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Number(NumericValue),
    Symbol(SymbolRef),
    String(String),
    Function(Head, Vec<BoxedExpr>),
}

#[derive(Debug)]
struct Node {
    kind: ExprKind,
    hash: u64,
    canonical: bool,
    metadata: Option<Metadata>,
    domain: OnceCell<Domain>,
}

#[derive(Clone)]
pub struct BoxedExpr(Rc<Node>);

fn structural_hash(kind: &ExprKind) -> u64 {
    let mut hasher = FxHasher::default();
    match kind {
        ExprKind::Number(n) => {
            0u8.hash(&mut hasher);
            n.hash(&mut hasher);
        }
        ExprKind::Symbol(s) => {
            1u8.hash(&mut hasher);
            s.hash(&mut hasher);
        }
        ExprKind::String(text) => {
            2u8.hash(&mut hasher);
            text.hash(&mut hasher);
        }
        ExprKind::Function(head, ops) => {
            3u8.hash(&mut hasher);
            head.hash(&mut hasher);
            for op in ops {
                op.0.hash.hash(&mut hasher);
            }
        }
    }
    hasher.finish()
}

impl BoxedExpr {
    fn build(kind: ExprKind, canonical: bool, domain: Option<Domain>) -> Self {
        let hash = structural_hash(&kind);
        let cell = OnceCell::new();
        if let Some(domain) = domain {
            let _ = cell.set(domain);
        }
        BoxedExpr(Rc::new(Node {
            kind,
            hash,
            canonical,
            metadata: None,
            domain: cell,
        }))
    }

    pub fn number(value: NumericValue) -> Self {
        let domain = Domain::of_number(&value);
        Self::build(ExprKind::Number(value), true, Some(domain))
    }

    pub fn integer(n: i64) -> Self {
        Self::number(NumericValue::from_i64(n))
    }

    pub fn zero() -> Self {
        Self::integer(0)
    }

    pub fn one() -> Self {
        Self::integer(1)
    }

    /// A symbol; `domain` is the declared domain, if any.
    pub fn symbol(symbol: SymbolRef, domain: Option<Domain>) -> Self {
        Self::build(ExprKind::Symbol(symbol), true, domain)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::build(ExprKind::String(text.into()), true, Some(Domain::String))
    }

    /// A function node. `canonical` asserts the operands and the shape are
    /// already in canonical form.
    pub fn function(head: impl Into<Head>, ops: Vec<BoxedExpr>, canonical: bool) -> Self {
        Self::build(ExprKind::Function(head.into(), ops), canonical, None)
    }

    /// `["Error", ["ErrorCode", 'code', ...details], original?]`, built
    /// without validation.
    pub fn error(code: ErrorCode, details: Vec<BoxedExpr>, original: Option<BoxedExpr>) -> Self {
        let mut code_ops = Vec::with_capacity(details.len() + 1);
        code_ops.push(BoxedExpr::string(code.as_str()));
        code_ops.extend(details);
        let mut ops = vec![BoxedExpr::function(Builtin::ErrorCode, code_ops, true)];
        ops.extend(original);
        Self::build(
            ExprKind::Function(Head::Builtin(Builtin::Error), ops),
            true,
            Some(Domain::Nothing),
        )
    }

    /// Copy of this node carrying `metadata`.
    pub fn with_metadata(&self, metadata: Metadata) -> Self {
        if metadata.is_empty() {
            return self.clone();
        }
        let domain = self.0.domain.get().copied();
        let cell = OnceCell::new();
        if let Some(domain) = domain {
            let _ = cell.set(domain);
        }
        BoxedExpr(Rc::new(Node {
            kind: self.0.kind.clone(),
            hash: self.0.hash,
            canonical: self.0.canonical,
            metadata: Some(metadata),
            domain: cell,
        }))
    }

    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    pub fn hash_value(&self) -> u64 {
        self.0.hash
    }

    pub fn is_canonical(&self) -> bool {
        self.0.canonical
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.0.metadata.as_ref()
    }

    pub fn ptr_eq(&self, other: &BoxedExpr) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_number(&self) -> Option<&NumericValue> {
        match &self.0.kind {
            ExprKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        self.as_number().is_some()
    }

    pub fn is_exact_number(&self) -> bool {
        self.as_number().is_some_and(NumericValue::is_exact)
    }

    pub fn as_symbol(&self) -> Option<&SymbolRef> {
        match &self.0.kind {
            ExprKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn symbol_name(&self) -> Option<&str> {
        self.as_symbol().map(|s| &*s.name)
    }

    pub fn is_symbol(&self, name: &str) -> bool {
        self.symbol_name() == Some(name)
    }

    pub fn as_string(&self) -> Option<&str> {
        match &self.0.kind {
            ExprKind::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn head(&self) -> Option<&Head> {
        match &self.0.kind {
            ExprKind::Function(head, _) => Some(head),
            _ => None,
        }
    }

    pub fn builtin(&self) -> Option<Builtin> {
        self.head().and_then(Head::builtin)
    }

    pub fn is_head(&self, builtin: Builtin) -> bool {
        self.builtin() == Some(builtin)
    }

    /// Operands of a function node; empty for atoms.
    pub fn ops(&self) -> &[BoxedExpr] {
        match &self.0.kind {
            ExprKind::Function(_, ops) => ops,
            _ => &[],
        }
    }

    pub fn op(&self, index: usize) -> Option<&BoxedExpr> {
        self.ops().get(index)
    }

    pub fn nops(&self) -> usize {
        self.ops().len()
    }

    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(|n| n.is_exact() && n.is_zero())
    }

    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(|n| n.is_exact() && n.is_one())
    }

    pub fn is_integer_literal(&self, value: i64) -> bool {
        self.as_number().and_then(NumericValue::to_i64) == Some(value)
    }

    pub fn is_error(&self) -> bool {
        self.is_head(Builtin::Error)
    }

    /// Error code of an `Error` node.
    pub fn error_code(&self) -> Option<ErrorCode> {
        if !self.is_error() {
            return None;
        }
        self.op(0)?.op(0)?.as_string()?.parse().ok()
    }

    /// Every `Error` node, outermost first.
    pub fn errors(&self) -> Vec<BoxedExpr> {
        let mut out = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(expr) = stack.pop() {
            if expr.is_error() {
                out.push(expr.clone());
                continue;
            }
            stack.extend(expr.ops().iter().rev().cloned());
        }
        out
    }

    /// No error nodes anywhere in the tree.
    pub fn is_valid(&self) -> bool {
        if self.is_error() {
            return false;
        }
        self.ops().iter().all(BoxedExpr::is_valid)
    }

    /// Lazily inferred domain.
    pub fn domain(&self) -> Domain {
        *self.0.domain.get_or_init(|| self.infer_domain())
    }

    fn infer_domain(&self) -> Domain {
        match &self.0.kind {
            ExprKind::Number(n) => Domain::of_number(n),
            ExprKind::String(_) => Domain::String,
            ExprKind::Symbol(s) => Library::shared()
                .constant(&s.name)
                .map_or(Domain::Anything, |c| c.domain),
            ExprKind::Function(Head::Builtin(b), ops) => {
                if *b == Builtin::Error {
                    Domain::Nothing
                } else {
                    Library::shared().function(*b).codomain.infer(ops)
                }
            }
            ExprKind::Function(Head::User(_), _) => Domain::Anything,
        }
    }

    /// Every distinct symbol name, in first-occurrence order.
    pub fn symbols(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        self.visit(&mut |expr| {
            if let Some(name) = expr.symbol_name() {
                if seen.insert(name.to_string()) {
                    out.push(name.to_string());
                }
            }
        });
        out
    }

    /// Symbols that are neither library constants nor bound by an
    /// enclosing `Sum`/`Product` index.
    pub fn free_variables(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_free(&mut Vec::new(), &mut out);
        out
    }

    fn collect_free(&self, bound: &mut Vec<String>, out: &mut Vec<String>) {
        match &self.0.kind {
            ExprKind::Symbol(s) => {
                let name = &*s.name;
                let constant = Library::shared().constant(name).is_some();
                let is_domain = name.parse::<Domain>().is_ok();
                if !constant && !is_domain && !bound.iter().any(|b| b == name) && !out.iter().any(|o| o == name) {
                    out.push(name.to_string());
                }
            }
            ExprKind::Function(Head::Builtin(Builtin::Sum | Builtin::Product), ops) => {
                let limits = ops.get(1);
                if let Some(limits) = limits {
                    for bound_op in limits.ops().iter().skip(1) {
                        bound_op.collect_free(bound, out);
                    }
                }
                let index = limits.and_then(|l| l.op(0)).and_then(BoxedExpr::symbol_name);
                if let Some(index) = index {
                    bound.push(index.to_string());
                }
                if let Some(body) = ops.first() {
                    body.collect_free(bound, out);
                }
                if index.is_some() {
                    bound.pop();
                }
            }
            ExprKind::Function(_, ops) => {
                for op in ops {
                    op.collect_free(bound, out);
                }
            }
            _ => {}
        }
    }

    /// Pre-order walk.
    pub fn visit(&self, f: &mut impl FnMut(&BoxedExpr)) {
        f(self);
        for op in self.ops() {
            op.visit(f);
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.ops().iter().map(BoxedExpr::node_count).sum::<usize>()
    }

    /// Whether `sub` occurs anywhere in this tree.
    pub fn contains(&self, sub: &BoxedExpr) -> bool {
        self == sub || self.ops().iter().any(|op| op.contains(sub))
    }

    /// Rebuild with new operands, keeping the head.
    pub fn with_ops(&self, ops: Vec<BoxedExpr>, canonical: bool) -> BoxedExpr {
        match self.head() {
            Some(head) => BoxedExpr::function(head.clone(), ops, canonical),
            None => self.clone(),
        }
    }
}

impl PartialEq for BoxedExpr {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        if self.0.hash != other.0.hash {
            return false;
        }
        match (&self.0.kind, &other.0.kind) {
            (ExprKind::Number(a), ExprKind::Number(b)) => a == b,
            (ExprKind::Symbol(a), ExprKind::Symbol(b)) => a == b,
            (ExprKind::String(a), ExprKind::String(b)) => a == b,
            (ExprKind::Function(h1, ops1), ExprKind::Function(h2, ops2)) => h1 == h2 && ops1 == ops2,
            _ => false,
        }
    }
}

impl Eq for BoxedExpr {}

impl Hash for BoxedExpr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash.hash(state);
    }
}

impl fmt::Debug for BoxedExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for BoxedExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_expression())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> BoxedExpr {
        BoxedExpr::symbol(SymbolRef::new(name, ScopeId::GLOBAL), None)
    }

    #[test]
    fn test_structural_equality_ignores_metadata() {
        let a = BoxedExpr::function(Builtin::Add, vec![sym("x"), BoxedExpr::one()], true);
        let b = BoxedExpr::function(Builtin::Add, vec![sym("x"), BoxedExpr::one()], false);
        let annotated = a.with_metadata(Metadata {
            latex: Some("x+1".into()),
            ..Metadata::default()
        });
        assert_eq!(a, b);
        assert_eq!(a, annotated);
        assert_eq!(a.hash_value(), annotated.hash_value());
        assert!(annotated.metadata().is_some());
    }

    #[test]
    fn test_scope_is_part_of_identity() {
        let outer = sym("k");
        let inner = BoxedExpr::symbol(SymbolRef::new("k", ScopeId::GLOBAL), Some(Domain::Integer));
        assert_eq!(outer, inner);
        let elsewhere = BoxedExpr::symbol(
            SymbolRef {
                name: Rc::from("k"),
                scope: crate::scope::ScopeRegistry::new().push(),
            },
            None,
        );
        assert_ne!(outer, elsewhere);
    }

    #[test]
    fn test_errors_and_validity() {
        let err = BoxedExpr::error(ErrorCode::Missing, vec![], None);
        let expr = BoxedExpr::function(Builtin::Add, vec![sym("x"), err.clone()], true);
        assert!(!expr.is_valid());
        assert_eq!(expr.errors(), vec![err.clone()]);
        assert_eq!(err.error_code(), Some(ErrorCode::Missing));
        assert_eq!(err.domain(), Domain::Nothing);
    }

    #[test]
    fn test_free_variables_skip_constants_and_indices() {
        let k = sym("k");
        let limits = BoxedExpr::function(Builtin::Triple, vec![k.clone(), BoxedExpr::one(), sym("n")], true);
        let body = BoxedExpr::function(Builtin::Multiply, vec![k, sym("Pi"), sym("x")], true);
        let sum = BoxedExpr::function(Builtin::Sum, vec![body, limits], true);
        assert_eq!(sum.free_variables(), vec!["n".to_string(), "x".to_string()]);
        assert_eq!(sum.symbols(), vec!["k", "Pi", "x", "n"]);
    }

    #[test]
    fn test_inferred_domains() {
        let two = BoxedExpr::integer(2);
        let sum = BoxedExpr::function(Builtin::Add, vec![two.clone(), two.clone()], true);
        assert_eq!(sum.domain(), Domain::Integer);
        let with_symbol = BoxedExpr::function(Builtin::Add, vec![two, sym("x")], true);
        assert_eq!(with_symbol.domain(), Domain::Number);
        assert_eq!(sym("Pi").domain(), Domain::RealNumber);
    }
}
