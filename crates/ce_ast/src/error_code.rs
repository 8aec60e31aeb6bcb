//! Error-code taxonomy carried by `Error` nodes.
//!
//! Every error node has the shape `["Error", ["ErrorCode", 'kind', ...details], original?]`
//! where `kind` is one of the kebab-case names below.

use std::fmt;
use std::str::FromStr;

/// Broad family an [`ErrorCode`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Tokenization anomalies (the tokenizer itself never fails).
    Lexical,
    /// Malformed LaTeX structure.
    Syntax,
    /// Argument does not fit a signature.
    Domain,
    /// Symbol with no definition in any visible scope.
    Unbound,
    /// A numeric operation is undefined.
    Evaluation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A lone `\` with nothing after it.
    InvalidEscape,
    UnexpectedToken,
    UnexpectedCommand,
    ExpectedCloseDelimiter,
    ExpectedOpenDelimiter,
    /// A required operand or argument is absent.
    Missing,
    NestingTooDeep,
    IncompatibleDomain,
    UnexpectedArgument,
    UnboundSymbol,
    DivisionByZero,
    Undefined,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 12] = [
        ErrorCode::InvalidEscape,
        ErrorCode::UnexpectedToken,
        ErrorCode::UnexpectedCommand,
        ErrorCode::ExpectedCloseDelimiter,
        ErrorCode::ExpectedOpenDelimiter,
        ErrorCode::Missing,
        ErrorCode::NestingTooDeep,
        ErrorCode::IncompatibleDomain,
        ErrorCode::UnexpectedArgument,
        ErrorCode::UnboundSymbol,
        ErrorCode::DivisionByZero,
        ErrorCode::Undefined,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidEscape => "invalid-escape",
            ErrorCode::UnexpectedToken => "unexpected-token",
            ErrorCode::UnexpectedCommand => "unexpected-command",
            ErrorCode::ExpectedCloseDelimiter => "expected-close-delimiter",
            ErrorCode::ExpectedOpenDelimiter => "expected-open-delimiter",
            ErrorCode::Missing => "missing",
            ErrorCode::NestingTooDeep => "nesting-too-deep",
            ErrorCode::IncompatibleDomain => "incompatible-domain",
            ErrorCode::UnexpectedArgument => "unexpected-argument",
            ErrorCode::UnboundSymbol => "unbound-symbol",
            ErrorCode::DivisionByZero => "division-by-zero",
            ErrorCode::Undefined => "undefined",
        }
    }

    pub const fn category(self) -> ErrorCategory {
        match self {
            ErrorCode::InvalidEscape => ErrorCategory::Lexical,
            ErrorCode::UnexpectedToken
            | ErrorCode::UnexpectedCommand
            | ErrorCode::ExpectedCloseDelimiter
            | ErrorCode::ExpectedOpenDelimiter
            | ErrorCode::Missing
            | ErrorCode::NestingTooDeep => ErrorCategory::Syntax,
            ErrorCode::IncompatibleDomain | ErrorCode::UnexpectedArgument => ErrorCategory::Domain,
            ErrorCode::UnboundSymbol => ErrorCategory::Unbound,
            ErrorCode::DivisionByZero | ErrorCode::Undefined => ErrorCategory::Evaluation,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code '{0}'")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Error codes may arrive quoted in the 'text' string shorthand.
        let name = s.trim_matches('\'');
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == name)
            .ok_or_else(|| UnknownErrorCode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for code in ErrorCode::ALL {
            assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(code));
        }
    }

    #[test]
    fn quoted_names_parse() {
        assert_eq!("'missing'".parse::<ErrorCode>(), Ok(ErrorCode::Missing));
        assert!("no-such-thing".parse::<ErrorCode>().is_err());
    }

    #[test]
    fn categories() {
        assert_eq!(ErrorCode::Missing.category(), ErrorCategory::Syntax);
        assert_eq!(ErrorCode::IncompatibleDomain.category(), ErrorCategory::Domain);
        assert_eq!(ErrorCode::DivisionByZero.category(), ErrorCategory::Evaluation);
        assert_eq!(ErrorCode::UnboundSymbol.category(), ErrorCategory::Unbound);
    }
}
