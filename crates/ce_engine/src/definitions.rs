//! Definitions: what a name means.
//!
//! Built-in heads and constants live in the shared [`Library`]; user
//! symbols and functions live in scopes. [`Definition`] is what resolving
//! a name through the scope chain produces.
//!
//! [`Library`]: crate::library::Library

use std::fmt;
use std::rc::Rc;

use ce_numeric::{NumericContext, NumericValue};

use crate::boxed::BoxedExpr;
use crate::canonical::Boxer;
use crate::domain::Domain;
use crate::error::EngineError;
use crate::eval::Evaluator;
use crate::scope::Binding;

/// Algebraic properties of a function head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunctionFlags {
    /// `f(a, f(b, c)) = f(a, b, c)`
    pub associative: bool,
    /// Operand order is irrelevant.
    pub commutative: bool,
    /// `f(f(x)) = f(x)`; for n-ary heads, duplicate operands collapse.
    pub idempotent: bool,
    /// `f(f(x)) = x`
    pub involution: bool,
    /// Applied element-wise to `List` operands.
    pub threadable: bool,
}

impl FunctionFlags {
    pub const NONE: FunctionFlags = FunctionFlags {
        associative: false,
        commutative: false,
        idempotent: false,
        involution: false,
        threadable: false,
    };

    /// Add, Multiply.
    pub const MONOID: FunctionFlags = FunctionFlags {
        associative: true,
        commutative: true,
        threadable: true,
        ..FunctionFlags::NONE
    };

    /// And, Or, Max, Min, Union, Intersection.
    pub const LATTICE: FunctionFlags = FunctionFlags {
        associative: true,
        commutative: true,
        idempotent: true,
        ..FunctionFlags::NONE
    };

    pub const THREADABLE: FunctionFlags = FunctionFlags {
        threadable: true,
        ..FunctionFlags::NONE
    };
}

/// Which operands are left unevaluated before the handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hold {
    #[default]
    None,
    All,
    First,
    Rest,
}

impl Hold {
    pub fn holds(self, position: usize) -> bool {
        match self {
            Hold::None => false,
            Hold::All => true,
            Hold::First => position == 0,
            Hold::Rest => position > 0,
        }
    }
}

/// Operand domains: required, then optional, then a repeated tail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signature {
    pub params: &'static [Domain],
    pub optional: &'static [Domain],
    pub rest: Option<Domain>,
}

impl Signature {
    /// Any number of operands of any domain.
    pub const ANY: Signature = Signature::variadic(Domain::Anything);

    pub const fn fixed(params: &'static [Domain]) -> Self {
        Self {
            params,
            optional: &[],
            rest: None,
        }
    }

    pub const fn variadic(domain: Domain) -> Self {
        Self {
            params: &[],
            optional: &[],
            rest: Some(domain),
        }
    }

    pub const fn with_optional(mut self, optional: &'static [Domain]) -> Self {
        self.optional = optional;
        self
    }

    /// Expected domain at `position`, or `None` when the operand is surplus.
    pub fn expected(&self, position: usize) -> Option<Domain> {
        let optional_end = self.params.len() + self.optional.len();
        if position < self.params.len() {
            Some(self.params[position])
        } else if position < optional_end {
            Some(self.optional[position - self.params.len()])
        } else {
            self.rest
        }
    }

    pub fn min_arity(&self) -> usize {
        self.params.len()
    }
}

/// How the result domain of an application is inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codomain {
    Fixed(Domain),
    /// Join of the operand domains and `at_least`, clamped to `within`.
    Join { at_least: Domain, within: Domain },
}

impl Codomain {
    pub const NUMERIC: Codomain = Codomain::Join {
        at_least: Domain::Nothing,
        within: Domain::Number,
    };

    pub fn infer(&self, ops: &[BoxedExpr]) -> Domain {
        match *self {
            Codomain::Fixed(domain) => domain,
            Codomain::Join { at_least, within } => {
                let joined = ops
                    .iter()
                    .map(BoxedExpr::domain)
                    .fold(at_least, Domain::join);
                match joined.meet(within) {
                    Domain::Nothing if joined != Domain::Nothing => within,
                    domain => domain,
                }
            }
        }
    }
}

/// Canonical-form handler: receives canonical operands (flattened for
/// associative heads) and builds the canonical node.
pub type CanonicalFn = fn(&mut Boxer<'_>, Vec<BoxedExpr>) -> BoxedExpr;

/// Evaluation handler: receives operands evaluated per the hold policy.
/// `Ok(None)` means no dedicated rule applies.
pub type EvaluateFn = fn(&mut Evaluator<'_>, &[BoxedExpr]) -> Result<Option<BoxedExpr>, EngineError>;

/// A built-in function head.
#[derive(Clone)]
pub struct FunctionDef {
    pub name: &'static str,
    pub flags: FunctionFlags,
    pub hold: Hold,
    pub signature: Signature,
    pub codomain: Codomain,
    /// Ordering weight; cheaper heads sort first among commutative operands.
    pub complexity: u16,
    pub canonical: Option<CanonicalFn>,
    pub evaluate: Option<EvaluateFn>,
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("hold", &self.hold)
            .field("complexity", &self.complexity)
            .field("canonical", &self.canonical.is_some())
            .field("evaluate", &self.evaluate.is_some())
            .finish()
    }
}

impl FunctionDef {
    pub const fn new(name: &'static str, signature: Signature, codomain: Codomain) -> Self {
        Self {
            name,
            flags: FunctionFlags::NONE,
            hold: Hold::None,
            signature,
            codomain,
            complexity: 1000,
            canonical: None,
            evaluate: None,
        }
    }

    pub const fn flags(mut self, flags: FunctionFlags) -> Self {
        self.flags = flags;
        self
    }

    pub const fn hold(mut self, hold: Hold) -> Self {
        self.hold = hold;
        self
    }

    pub const fn complexity(mut self, complexity: u16) -> Self {
        self.complexity = complexity;
        self
    }

    pub const fn canonical(mut self, handler: CanonicalFn) -> Self {
        self.canonical = Some(handler);
        self
    }

    pub const fn evaluate(mut self, handler: EvaluateFn) -> Self {
        self.evaluate = Some(handler);
        self
    }
}

/// Numeric meaning of a library constant.
#[derive(Clone, Copy)]
pub enum ConstantValue {
    /// Stays symbolic until `N`.
    Approximate(fn(&NumericContext) -> NumericValue),
    /// Replaced by its exact value on evaluation.
    Exact(fn() -> NumericValue),
    /// Never replaced (`True`, `Nothing`, ...).
    Inert,
}

impl fmt::Debug for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstantValue::Approximate(_) => "Approximate(..)",
            ConstantValue::Exact(_) => "Exact(..)",
            ConstantValue::Inert => "Inert",
        })
    }
}

#[derive(Debug, Clone)]
pub struct ConstantDef {
    pub name: &'static str,
    pub domain: Domain,
    pub value: ConstantValue,
}

/// A user symbol declared in a scope.
#[derive(Debug, Clone)]
pub struct SymbolDef {
    pub domain: Domain,
    pub value: Option<BoxedExpr>,
    pub constant: bool,
}

impl SymbolDef {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            value: None,
            constant: false,
        }
    }

    pub fn with_value(value: BoxedExpr) -> Self {
        Self {
            domain: value.domain(),
            value: Some(value),
            constant: false,
        }
    }

    pub fn constant(mut self) -> Self {
        self.constant = true;
        self
    }
}

/// A user function: named parameters bound in a fresh scope around `body`.
#[derive(Debug, Clone)]
pub struct UserFunction {
    pub params: Vec<String>,
    pub body: BoxedExpr,
}

/// What a name resolves to.
#[derive(Debug, Clone)]
pub enum Definition<'a> {
    Symbol(SymbolDef),
    Function(Rc<UserFunction>),
    Constant(&'a ConstantDef),
    Builtin(&'a FunctionDef),
}

impl Definition<'_> {
    pub fn from_binding(binding: Binding) -> Self {
        match binding {
            Binding::Symbol(def) => Definition::Symbol(def),
            Binding::Function(def) => Definition::Function(def),
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            Definition::Symbol(def) => def.domain,
            Definition::Constant(def) => def.domain,
            Definition::Function(_) | Definition::Builtin(_) => Domain::Anything,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_positions() {
        const PARAMS: &[Domain] = &[Domain::Number];
        const OPTIONAL: &[Domain] = &[Domain::Integer];
        let sig = Signature::fixed(PARAMS).with_optional(OPTIONAL);
        assert_eq!(sig.expected(0), Some(Domain::Number));
        assert_eq!(sig.expected(1), Some(Domain::Integer));
        assert_eq!(sig.expected(2), None);
        assert_eq!(sig.min_arity(), 1);
        assert_eq!(Signature::ANY.expected(7), Some(Domain::Anything));
    }

    #[test]
    fn test_hold_positions() {
        assert!(Hold::All.holds(3));
        assert!(Hold::First.holds(0) && !Hold::First.holds(1));
        assert!(!Hold::Rest.holds(0) && Hold::Rest.holds(1));
        assert!(!Hold::None.holds(0));
    }
}
