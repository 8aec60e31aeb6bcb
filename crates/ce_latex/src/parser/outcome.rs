use ce_ast::Expression;

use crate::error::SyntaxError;

/// Result of one recursive-descent step.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// The input at the cursor does not start this construct; the cursor is
    /// where it was.
    NoMatch,
    Complete(Expression),
    /// A result with error placeholders inside, plus the first diagnostic
    /// raised while building it.
    Partial(Expression, SyntaxError),
}

impl Parsed {
    pub fn is_no_match(&self) -> bool {
        matches!(self, Parsed::NoMatch)
    }

    pub fn expr(&self) -> Option<&Expression> {
        match self {
            Parsed::NoMatch => None,
            Parsed::Complete(e) | Parsed::Partial(e, _) => Some(e),
        }
    }

    pub fn into_expr(self) -> Option<Expression> {
        match self {
            Parsed::NoMatch => None,
            Parsed::Complete(e) | Parsed::Partial(e, _) => Some(e),
        }
    }

    pub fn error(&self) -> Option<&SyntaxError> {
        match self {
            Parsed::Partial(_, err) => Some(err),
            _ => None,
        }
    }

    pub fn map(self, f: impl FnOnce(Expression) -> Expression) -> Parsed {
        match self {
            Parsed::NoMatch => Parsed::NoMatch,
            Parsed::Complete(e) => Parsed::Complete(f(e)),
            Parsed::Partial(e, err) => Parsed::Partial(f(e), err),
        }
    }
}

/// Remembers the first diagnostic while a compound result is assembled.
#[derive(Debug, Default)]
pub struct ErrorTrail {
    first: Option<SyntaxError>,
}

impl ErrorTrail {
    /// Unwrap a step, keeping its diagnostic. `None` for `NoMatch`.
    pub fn absorb(&mut self, parsed: Parsed) -> Option<Expression> {
        match parsed {
            Parsed::NoMatch => None,
            Parsed::Complete(e) => Some(e),
            Parsed::Partial(e, err) => {
                self.record(err);
                Some(e)
            }
        }
    }

    pub fn record(&mut self, err: SyntaxError) {
        if self.first.is_none() {
            self.first = Some(err);
        }
    }

    pub fn is_clean(&self) -> bool {
        self.first.is_none()
    }

    pub fn finish(self, expr: Expression) -> Parsed {
        match self.first {
            None => Parsed::Complete(expr),
            Some(err) => Parsed::Partial(expr, err),
        }
    }
}
