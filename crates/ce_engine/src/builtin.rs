//! Closed set of built-in function heads.
//!
//! Heads outside this table are user heads, resolved through the scope
//! chain. Dispatch on a built-in goes through its library definition, so
//! nothing downstream branches on head strings.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

macro_rules! builtins {
    ($($variant:ident),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Builtin {
            $($variant),*
        }

        impl Builtin {
            pub const ALL: &'static [Builtin] = &[$(Builtin::$variant),*];

            pub const fn name(self) -> &'static str {
                match self {
                    $(Builtin::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

builtins! {
    // Arithmetic
    Add, Subtract, Negate, Multiply, Divide, Rational, Power, Square, Sqrt, Root,
    Exp, Ln, Log, Lb, Lg, Abs, Sign, Floor, Ceil, Round, Factorial, Max, Min,
    PlusMinus, Complex,
    // Trigonometry
    Sin, Cos, Tan, Cot, Sec, Csc, Arcsin, Arccos, Arctan, Sinh, Cosh, Tanh,
    // Relations
    Equal, NotEqual, Less, LessEqual, Greater, GreaterEqual, Approx,
    // Logic
    And, Or, Not, Implies,
    // Sets
    Element, NotElement, Subset, SubsetEqual, Union, Intersection,
    // Collections and structure
    Set, List, Tuple, Sequence, Delimiter, Triple, Subscript, Matrix, Piecewise,
    // Big operators
    Sum, Product,
    // Control
    Hold, Error, ErrorCode,
}

static BY_NAME: LazyLock<FxHashMap<&'static str, Builtin>> =
    LazyLock::new(|| Builtin::ALL.iter().map(|b| (b.name(), *b)).collect());

impl Builtin {
    pub fn from_name(name: &str) -> Option<Builtin> {
        BY_NAME.get(name).copied()
    }

    /// Relational operators; evaluate to `True`/`False`.
    pub fn is_relation(self) -> bool {
        matches!(
            self,
            Builtin::Equal
                | Builtin::NotEqual
                | Builtin::Less
                | Builtin::LessEqual
                | Builtin::Greater
                | Builtin::GreaterEqual
                | Builtin::Approx
        )
    }
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for builtin in Builtin::ALL {
            assert_eq!(Builtin::from_name(builtin.name()), Some(*builtin));
        }
        assert_eq!(Builtin::from_name("f"), None);
    }
}
