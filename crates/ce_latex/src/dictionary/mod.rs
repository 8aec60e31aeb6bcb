//! The LaTeX dictionary: data records describing how triggers map to
//! MathJSON heads.
//!
//! Every entry names a kind (prefix, infix, ...), the token sequence that
//! triggers it and, for operators, a precedence. Most entries are parsed
//! by the generic rules in the parser; entries that need bespoke treatment
//! (`\frac`, `^`, `\sum`, environments) carry a [`ParseHandler`].

mod arithmetic;
mod relational;
mod structural;
mod symbols;

use std::fmt;

use ce_ast::Expression;
use serde::{Deserialize, Serialize};

use crate::parser::{Parsed, Parser, Terminator};
use crate::tokenizer::trigger_tokens;

/// Binding strengths shared by the dictionary, the parser and the
/// serializer.
pub mod precedence {
    pub const STATEMENT: u16 = 19;
    pub const SEQUENCE: u16 = 20;
    pub const ELEMENT: u16 = 240;
    pub const RELATIONAL: u16 = 245;
    pub const ADDITIVE: u16 = 275;
    pub const OR: u16 = 310;
    pub const AND: u16 = 320;
    pub const MULTIPLICATIVE: u16 = 390;
    pub const NEGATE: u16 = 400;
    pub const DIVIDE: u16 = 660;
    pub const POWER: u16 = 720;
    pub const FACTORIAL: u16 = 810;
    pub const NOT: u16 = 880;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Prefix,
    Infix,
    Postfix,
    Matchfix,
    Environment,
    Symbol,
    Function,
}

impl EntryKind {
    pub const COUNT: usize = 7;

    pub(crate) fn index(self) -> usize {
        match self {
            EntryKind::Prefix => 0,
            EntryKind::Infix => 1,
            EntryKind::Postfix => 2,
            EntryKind::Matchfix => 3,
            EntryKind::Environment => 4,
            EntryKind::Symbol => 5,
            EntryKind::Function => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Associativity {
    #[default]
    Left,
    Right,
}

/// Groups of entries that can be switched on or off as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LibraryCategory {
    /// Delimiters, groups, sequences and the structural operators. Always on.
    Core,
    Arithmetic,
    Relational,
    Logic,
    Sets,
    Trigonometry,
    Symbols,
    Summation,
}

impl LibraryCategory {
    pub const ALL: [LibraryCategory; 8] = [
        LibraryCategory::Core,
        LibraryCategory::Arithmetic,
        LibraryCategory::Relational,
        LibraryCategory::Logic,
        LibraryCategory::Sets,
        LibraryCategory::Trigonometry,
        LibraryCategory::Symbols,
        LibraryCategory::Summation,
    ];
}

pub type PrefixHandler = fn(&mut Parser<'_>, &LatexDictionaryEntry) -> Parsed;
pub type InfixHandler =
    fn(&mut Parser<'_>, &LatexDictionaryEntry, Expression, &Terminator) -> Parsed;
pub type PostfixHandler = fn(&mut Parser<'_>, &LatexDictionaryEntry, Expression) -> Parsed;
pub type MatchfixHandler = fn(&mut Parser<'_>, &LatexDictionaryEntry, Vec<Expression>) -> Parsed;

/// Custom parse step attached to an entry. `Default` uses the generic rule
/// for the entry's kind.
#[derive(Clone, Copy, Default)]
pub enum ParseHandler {
    #[default]
    Default,
    /// Also used by symbol, function and environment entries: the cursor is
    /// just past the trigger.
    Prefix(PrefixHandler),
    Infix(InfixHandler),
    Postfix(PostfixHandler),
    /// Receives the items found between the delimiters.
    Matchfix(MatchfixHandler),
}

impl fmt::Debug for ParseHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseHandler::Default => "Default",
            ParseHandler::Prefix(_) => "Prefix(..)",
            ParseHandler::Infix(_) => "Infix(..)",
            ParseHandler::Postfix(_) => "Postfix(..)",
            ParseHandler::Matchfix(_) => "Matchfix(..)",
        })
    }
}

#[derive(Debug, Clone)]
pub struct LatexDictionaryEntry {
    /// MathJSON head or symbol produced.
    pub name: String,
    pub kind: EntryKind,
    /// Token texts that trigger the entry. For environments, the
    /// environment name.
    pub trigger: Vec<String>,
    /// Closing tokens of a matchfix entry.
    pub close: Vec<String>,
    pub precedence: u16,
    pub associativity: Associativity,
    pub category: LibraryCategory,
    pub parse: ParseHandler,
}

impl LatexDictionaryEntry {
    fn new(kind: EntryKind, name: &str, trigger: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            trigger: trigger_tokens(trigger),
            close: Vec::new(),
            precedence: 0,
            associativity: Associativity::Left,
            category: LibraryCategory::Core,
            parse: ParseHandler::Default,
        }
    }

    pub fn prefix(name: &str, trigger: &str, precedence: u16) -> Self {
        Self {
            precedence,
            ..Self::new(EntryKind::Prefix, name, trigger)
        }
    }

    pub fn infix(name: &str, trigger: &str, precedence: u16) -> Self {
        Self {
            precedence,
            ..Self::new(EntryKind::Infix, name, trigger)
        }
    }

    pub fn postfix(name: &str, trigger: &str, precedence: u16) -> Self {
        Self {
            precedence,
            ..Self::new(EntryKind::Postfix, name, trigger)
        }
    }

    pub fn matchfix(name: &str, open: &str, close: &str) -> Self {
        Self {
            close: trigger_tokens(close),
            ..Self::new(EntryKind::Matchfix, name, open)
        }
    }

    pub fn symbol(name: &str, trigger: &str) -> Self {
        Self::new(EntryKind::Symbol, name, trigger)
    }

    pub fn function(name: &str, trigger: &str) -> Self {
        Self::new(EntryKind::Function, name, trigger)
    }

    /// `\begin{environment}...\end{environment}`.
    pub fn environment(name: &str, environment: &str) -> Self {
        Self {
            trigger: vec![environment.to_string()],
            ..Self::new(EntryKind::Environment, name, "")
        }
    }

    pub fn right_associative(mut self) -> Self {
        self.associativity = Associativity::Right;
        self
    }

    pub fn in_category(mut self, category: LibraryCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_handler(mut self, handler: ParseHandler) -> Self {
        self.parse = handler;
        self
    }

    /// Trigger as LaTeX text, for serialization.
    pub fn trigger_text(&self) -> String {
        join_tokens(&self.trigger)
    }

    pub fn close_text(&self) -> String {
        join_tokens(&self.close)
    }
}

/// Rejoin trigger tokens, keeping a space only where a command would
/// otherwise run into a following letter.
fn join_tokens(tokens: &[String]) -> String {
    let mut out = String::new();
    for token in tokens {
        let glue = out.ends_with(|c: char| c.is_ascii_alphabetic())
            && out.contains('\\')
            && token.starts_with(|c: char| c.is_ascii_alphabetic());
        if glue {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

/// All built-in entries, in declaration order (earlier wins ties).
pub fn default_dictionary() -> Vec<LatexDictionaryEntry> {
    let mut entries = structural::entries();
    entries.extend(arithmetic::entries());
    entries.extend(relational::entries());
    entries.extend(symbols::entries());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_fill_in_fields() {
        let e = LatexDictionaryEntry::infix("Power", "^", precedence::POWER)
            .right_associative()
            .in_category(LibraryCategory::Arithmetic);
        assert_eq!(e.trigger, vec!["^"]);
        assert_eq!(e.associativity, Associativity::Right);
        assert_eq!(e.category, LibraryCategory::Arithmetic);

        let m = LatexDictionaryEntry::matchfix("Abs", "\\left|", "\\right|");
        assert_eq!(m.trigger, vec!["\\left", "|"]);
        assert_eq!(m.close_text(), "\\right|");
    }

    #[test]
    fn every_category_has_entries() {
        let entries = default_dictionary();
        for category in LibraryCategory::ALL {
            assert!(
                entries.iter().any(|e| e.category == category),
                "no entries for {category:?}"
            );
        }
    }

    #[test]
    fn operators_carry_precedence() {
        for entry in default_dictionary() {
            if matches!(entry.kind, EntryKind::Infix | EntryKind::Prefix | EntryKind::Postfix) {
                assert!(entry.precedence > 0, "{} has no precedence", entry.name);
            }
            assert!(!entry.trigger.is_empty(), "{} has no trigger", entry.name);
        }
    }
}
