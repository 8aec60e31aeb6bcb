//! The domain lattice.
//!
//! Domains form a tree rooted at `Anything`, with `Nothing` below every
//! domain. Boxing checks operands against signatures with
//! [`Domain::is_compatible`]: an operand is rejected only when its domain
//! and the expected one are disjoint, so symbols of unknown domain pass.

use std::fmt;
use std::str::FromStr;

use ce_numeric::NumericValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    Anything,
    Value,
    Number,
    /// Numbers with a non-zero imaginary part.
    ComplexNumber,
    ImaginaryNumber,
    /// Reals plus the two infinities.
    ExtendedRealNumber,
    RealNumber,
    RationalNumber,
    Integer,
    Boolean,
    String,
    Collection,
    List,
    Set,
    Tuple,
    Nothing,
}

impl Domain {
    pub const ALL: [Domain; 16] = [
        Domain::Anything,
        Domain::Value,
        Domain::Number,
        Domain::ComplexNumber,
        Domain::ImaginaryNumber,
        Domain::ExtendedRealNumber,
        Domain::RealNumber,
        Domain::RationalNumber,
        Domain::Integer,
        Domain::Boolean,
        Domain::String,
        Domain::Collection,
        Domain::List,
        Domain::Set,
        Domain::Tuple,
        Domain::Nothing,
    ];

    pub fn parent(self) -> Option<Domain> {
        use Domain::*;
        match self {
            Anything | Nothing => None,
            Value => Some(Anything),
            Number | Boolean | String | Collection => Some(Value),
            ComplexNumber | ExtendedRealNumber => Some(Number),
            ImaginaryNumber => Some(ComplexNumber),
            RealNumber => Some(ExtendedRealNumber),
            RationalNumber => Some(RealNumber),
            Integer => Some(RationalNumber),
            List | Set | Tuple => Some(Collection),
        }
    }

    fn ancestors(self) -> impl Iterator<Item = Domain> {
        std::iter::successors(Some(self), |d| d.parent())
    }

    pub fn is_subdomain_of(self, other: Domain) -> bool {
        self == Domain::Nothing || other == Domain::Anything || self.ancestors().any(|d| d == other)
    }

    /// Not provably disjoint.
    pub fn is_compatible(self, other: Domain) -> bool {
        self.is_subdomain_of(other) || other.is_subdomain_of(self)
    }

    /// Least upper bound.
    pub fn join(self, other: Domain) -> Domain {
        if self.is_subdomain_of(other) {
            return other;
        }
        self.ancestors()
            .find(|d| other.is_subdomain_of(*d))
            .unwrap_or(Domain::Anything)
    }

    /// Greatest lower bound, `Nothing` for disjoint domains.
    pub fn meet(self, other: Domain) -> Domain {
        if self.is_subdomain_of(other) {
            self
        } else if other.is_subdomain_of(self) {
            other
        } else {
            Domain::Nothing
        }
    }

    pub fn is_numeric(self) -> bool {
        self != Domain::Nothing && self.is_subdomain_of(Domain::Number)
    }

    /// Narrowest domain containing a numeric value.
    pub fn of_number(value: &NumericValue) -> Domain {
        match value {
            NumericValue::Integer(_) => Domain::Integer,
            NumericValue::Rational(_) => Domain::RationalNumber,
            NumericValue::Complex(z) if z.re == 0.0 => Domain::ImaginaryNumber,
            NumericValue::Complex(_) => Domain::ComplexNumber,
            v if v.is_nan() => Domain::Number,
            v if !v.is_finite() => Domain::ExtendedRealNumber,
            v if v.is_integral() => Domain::Integer,
            _ => Domain::RealNumber,
        }
    }

    pub fn name(self) -> &'static str {
        use Domain::*;
        match self {
            Anything => "Anything",
            Value => "Value",
            Number => "Number",
            ComplexNumber => "ComplexNumber",
            ImaginaryNumber => "ImaginaryNumber",
            ExtendedRealNumber => "ExtendedRealNumber",
            RealNumber => "RealNumber",
            RationalNumber => "RationalNumber",
            Integer => "Integer",
            Boolean => "Boolean",
            String => "String",
            Collection => "Collection",
            List => "List",
            Set => "Set",
            Tuple => "Tuple",
            Nothing => "Nothing",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Domain {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // Common aliases
            "Integers" => Ok(Domain::Integer),
            "RealNumbers" => Ok(Domain::RealNumber),
            "ComplexNumbers" => Ok(Domain::ComplexNumber),
            "RationalNumbers" => Ok(Domain::RationalNumber),
            "Booleans" => Ok(Domain::Boolean),
            _ => Domain::ALL.iter().copied().find(|d| d.name() == s).ok_or(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdomains() {
        assert!(Domain::Integer.is_subdomain_of(Domain::RealNumber));
        assert!(Domain::Integer.is_subdomain_of(Domain::Number));
        assert!(Domain::Nothing.is_subdomain_of(Domain::Boolean));
        assert!(Domain::String.is_subdomain_of(Domain::Anything));
        assert!(!Domain::RealNumber.is_subdomain_of(Domain::Integer));
        assert!(!Domain::Boolean.is_subdomain_of(Domain::Number));
    }

    #[test]
    fn test_compatibility_is_symmetric() {
        assert!(Domain::Anything.is_compatible(Domain::Number));
        assert!(Domain::Number.is_compatible(Domain::Anything));
        assert!(!Domain::String.is_compatible(Domain::Number));
        assert!(!Domain::Boolean.is_compatible(Domain::Integer));
    }

    #[test]
    fn test_join_and_meet() {
        assert_eq!(Domain::Integer.join(Domain::RationalNumber), Domain::RationalNumber);
        assert_eq!(Domain::Integer.join(Domain::ImaginaryNumber), Domain::Number);
        assert_eq!(Domain::Integer.join(Domain::Boolean), Domain::Value);
        assert_eq!(Domain::List.join(Domain::Integer), Domain::Value);
        assert_eq!(Domain::Integer.meet(Domain::Number), Domain::Integer);
        assert_eq!(Domain::String.meet(Domain::Number), Domain::Nothing);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(Domain::of_number(&NumericValue::from_i64(3)), Domain::Integer);
        assert_eq!(
            Domain::of_number(&NumericValue::Float(f64::INFINITY)),
            Domain::ExtendedRealNumber
        );
        assert_eq!(Domain::of_number(&NumericValue::Float(0.5)), Domain::RealNumber);
    }

    #[test]
    fn test_names_round_trip() {
        for domain in Domain::ALL {
            assert_eq!(domain.name().parse::<Domain>(), Ok(domain));
        }
        assert_eq!("Integers".parse::<Domain>(), Ok(Domain::Integer));
    }
}
