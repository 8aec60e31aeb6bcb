//! Error-recovering recursive-descent parser.
//!
//! Grammar (informally):
//!
//! ```text
//! sequence   := expression { <unexpected token> expression }
//! expression := primary { infix expression | postfix | primary }
//! primary    := number | group | matchfix | environment | prefix
//!             | symbol | function | letter
//! ```
//!
//! Operator binding is driven by the dictionary precedences. Adjacent
//! primaries multiply. The parser never fails: unparseable input becomes
//! `Error` nodes and parsing resumes after the offending token.

mod outcome;
mod primary;

pub use outcome::{ErrorTrail, Parsed};

use ce_ast::{ErrorCode, Expression, Span};
use tracing::trace;

use crate::dictionary::{
    precedence, Associativity, EntryKind, LatexDictionaryEntry, ParseHandler,
};
use crate::error::SyntaxError;
use crate::index::GrammarIndex;
use crate::options::ParseOptions;
use crate::tokenizer::{is_spacing_command, Token, TokenKind};

/// Binding strength of juxtaposition (`2x`, `x\sin y`).
pub const IMPLICIT_MULTIPLY_PRECEDENCE: u16 = precedence::MULTIPLICATIVE;

/// Lower bound on the precedence of operators an expression may absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Terminator {
    pub min_prec: u16,
}

impl Terminator {
    pub const NONE: Terminator = Terminator { min_prec: 0 };

    pub fn new(min_prec: u16) -> Self {
        Self { min_prec }
    }
}

pub struct Parser<'a> {
    tokens: Vec<Token>,
    index: usize,
    grammar: &'a GrammarIndex,
    options: &'a ParseOptions,
    depth: usize,
    /// Closing triggers of every open construct, innermost last. Any of them
    /// ends the current sub-expression.
    closers: Vec<Vec<String>>,
    /// Non-zero while parsing the undelimited argument of a function such
    /// as `\sin x`.
    implicit_argument: usize,
    errors: Vec<SyntaxError>,
    source_len: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, grammar: &'a GrammarIndex, options: &'a ParseOptions) -> Self {
        let source_len = tokens.last().map_or(0, |t| t.span.end);
        Self {
            tokens,
            index: 0,
            grammar,
            options,
            depth: 0,
            closers: Vec::new(),
            implicit_argument: 0,
            errors: Vec::new(),
            source_len,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        self.options
    }

    pub fn grammar(&self) -> &'a GrammarIndex {
        self.grammar
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn rewind(&mut self, index: usize) {
        self.index = index;
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }

    // ---------- cursor ----------

    pub fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub fn peek_text(&self) -> Option<&str> {
        self.peek().map(|t| t.text.as_str())
    }

    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    /// Skip whitespace and spacing commands (`\,`, `\quad`, ...).
    pub fn skip_space(&mut self) {
        while let Some(token) = self.peek() {
            let spacing = token.is_space()
                || (token.kind == TokenKind::Command && is_spacing_command(&token.text));
            if !spacing {
                break;
            }
            self.index += 1;
        }
    }

    /// Consume `text` (after optional space) if it is next.
    pub fn match_token(&mut self, text: &str) -> bool {
        let save = self.index;
        self.skip_space();
        if self.peek_text() == Some(text) {
            self.index += 1;
            true
        } else {
            self.index = save;
            false
        }
    }

    /// Consume a multi-token trigger, spaces allowed between the parts.
    pub fn match_trigger<S: AsRef<str>>(&mut self, trigger: &[S]) -> bool {
        match self.trigger_len(trigger) {
            Some(len) => {
                self.index += len;
                true
            }
            None => false,
        }
    }

    fn trigger_len<S: AsRef<str>>(&self, trigger: &[S]) -> Option<usize> {
        let mut cursor = self.index;
        for part in trigger {
            while self.tokens.get(cursor).is_some_and(Token::is_space) {
                cursor += 1;
            }
            if self.tokens.get(cursor)?.text != part.as_ref() {
                return None;
            }
            cursor += 1;
        }
        (!trigger.is_empty()).then_some(cursor - self.index)
    }

    /// Whether the cursor sits on the closer of any enclosing construct.
    pub fn at_closer(&self) -> bool {
        self.closers.iter().any(|c| self.trigger_len(c.as_slice()).is_some())
    }

    /// End of input or an enclosing closer: nothing more belongs here.
    pub fn at_boundary(&mut self) -> bool {
        self.skip_space();
        self.at_end() || self.at_closer()
    }

    /// `(` or `\left(` next.
    pub fn at_open_paren(&mut self) -> bool {
        self.skip_space();
        self.peek_text() == Some("(") || self.trigger_len(&["\\left", "("]).is_some()
    }

    /// Next token after `offset` tokens, not skipping space.
    pub(crate) fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.index + offset)
    }

    // ---------- spans and errors ----------

    fn offset_of(&self, index: usize) -> usize {
        self.tokens
            .get(index)
            .map_or(self.source_len, |t| t.span.start)
    }

    /// Source span of the tokens consumed since `start`.
    pub fn span_from(&self, start: usize) -> Span {
        let begin = self.offset_of(start);
        let end = if self.index > start {
            self.tokens[self.index - 1].span.end
        } else {
            begin
        };
        Span::new(begin, end.max(begin))
    }

    /// Attach the source span when fidelity is requested.
    pub fn annotate(&self, start: usize, expr: Expression) -> Expression {
        if self.options.preserve_fidelity {
            expr.with_span(self.span_from(start))
        } else {
            expr
        }
    }

    /// Build an `Error` node covering the tokens since `start` and record
    /// the diagnostic.
    pub fn error(
        &mut self,
        code: ErrorCode,
        details: Vec<Expression>,
        original: Option<Expression>,
        start: usize,
    ) -> (Expression, SyntaxError) {
        let span = self.span_from(start);
        let detail = details
            .iter()
            .filter_map(|d| d.string_value().or_else(|| d.symbol()))
            .next()
            .map(str::to_string);
        let err = SyntaxError { code, span, detail };
        trace!(%code, %span, "syntax error");
        self.errors.push(err.clone());
        let expr = Expression::error(code, details, original);
        let expr = if self.options.preserve_fidelity {
            expr.with_span(span)
        } else {
            expr
        };
        (expr, err)
    }

    /// `Error(missing)` at the cursor.
    pub fn missing(&mut self, trail: &mut ErrorTrail) -> Expression {
        let (expr, err) = self.error(ErrorCode::Missing, Vec::new(), None, self.index);
        trail.record(err);
        expr
    }

    /// Unwrap a required operand, substituting `Error(missing)` for no match.
    pub fn required(&mut self, parsed: Parsed, trail: &mut ErrorTrail) -> Expression {
        match trail.absorb(parsed) {
            Some(expr) => expr,
            None => self.missing(trail),
        }
    }

    // ---------- depth ----------

    fn enter(&mut self) -> bool {
        self.depth += 1;
        self.depth <= self.options.max_depth
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Whether `extra` levels stacked without recursing would pass the limit.
    pub(crate) fn nesting_exceeded(&self, extra: usize) -> bool {
        self.depth + extra > self.options.max_depth
    }

    /// Skip to the next boundary after exceeding the nesting limit.
    pub(crate) fn nesting_too_deep(&mut self) -> Parsed {
        let start = self.index;
        while !self.at_end() && !self.at_closer() {
            self.index += 1;
        }
        let (expr, err) = self.error(ErrorCode::NestingTooDeep, Vec::new(), None, start);
        Parsed::Partial(expr, err)
    }

    // ---------- expressions ----------

    /// Parse operators binding at least as tightly as `term.min_prec`.
    pub fn parse_expression(&mut self, term: &Terminator) -> Parsed {
        self.parse_expression_with(term, true)
    }

    fn parse_expression_with(&mut self, term: &Terminator, allow_missing_lhs: bool) -> Parsed {
        let result = if self.enter() {
            self.parse_operators(term, allow_missing_lhs)
        } else {
            self.nesting_too_deep()
        };
        self.leave();
        result
    }

    fn parse_operators(&mut self, term: &Terminator, allow_missing_lhs: bool) -> Parsed {
        if self.at_boundary() {
            return Parsed::NoMatch;
        }
        let start = self.index;
        let mut trail = ErrorTrail::default();
        let mut lhs = match self.parse_primary() {
            Parsed::NoMatch => {
                if !allow_missing_lhs || !self.starts_operator(term) {
                    return Parsed::NoMatch;
                }
                self.missing(&mut trail)
            }
            parsed => match trail.absorb(parsed) {
                Some(expr) => expr,
                None => return Parsed::NoMatch,
            },
        };

        // Operators applied in this loop stack nodes on `lhs` without
        // recursing, so their depth is counted here.
        let mut nested = 0;
        loop {
            if self.at_boundary() {
                break;
            }
            let next = match self.parse_operator(term, &lhs) {
                Some(next) => Some(next),
                None if term.min_prec <= IMPLICIT_MULTIPLY_PRECEDENCE => self.parse_juxtaposition(&lhs),
                None => None,
            };
            let Some(expr) = next.and_then(|next| trail.absorb(next)) else {
                break;
            };
            if !extends(&lhs, &expr) {
                nested += 1;
            }
            lhs = self.annotate(start, expr);
            if self.nesting_exceeded(nested) {
                if let Some(expr) = trail.absorb(self.nesting_too_deep()) {
                    lhs = expr;
                }
                break;
            }
        }
        trail.finish(lhs)
    }

    fn starts_operator(&self, term: &Terminator) -> bool {
        [EntryKind::Infix, EntryKind::Postfix].into_iter().any(|kind| {
            self.grammar
                .lookup(&self.tokens, self.index, kind)
                .iter()
                .any(|(entry, _)| entry.precedence >= term.min_prec)
        })
    }

    fn parse_operator(&mut self, term: &Terminator, lhs: &Expression) -> Option<Parsed> {
        let grammar = self.grammar;
        for kind in [EntryKind::Infix, EntryKind::Postfix] {
            for (entry, len) in grammar.lookup(&self.tokens, self.index, kind) {
                if entry.precedence < term.min_prec {
                    continue;
                }
                let save = self.index;
                self.index += len;
                let parsed = match kind {
                    EntryKind::Infix => self.apply_infix(entry, lhs.clone(), term),
                    _ => self.apply_postfix(entry, lhs.clone()),
                };
                if !parsed.is_no_match() {
                    return Some(parsed);
                }
                self.index = save;
            }
        }
        None
    }

    fn apply_infix(
        &mut self,
        entry: &LatexDictionaryEntry,
        lhs: Expression,
        term: &Terminator,
    ) -> Parsed {
        match entry.parse {
            ParseHandler::Infix(handler) => handler(self, entry, lhs, term),
            _ => {
                let mut trail = ErrorTrail::default();
                let rhs = self.parse_infix_operand(entry);
                let rhs = self.required(rhs, &mut trail);
                trail.finish(fold_binary(&entry.name, lhs, rhs))
            }
        }
    }

    /// Right-hand operand of an infix entry, honouring associativity.
    pub fn parse_infix_operand(&mut self, entry: &LatexDictionaryEntry) -> Parsed {
        let min_prec = match entry.associativity {
            Associativity::Left => entry.precedence + 1,
            Associativity::Right => entry.precedence,
        };
        self.parse_expression(&Terminator::new(min_prec))
    }

    fn apply_postfix(&mut self, entry: &LatexDictionaryEntry, lhs: Expression) -> Parsed {
        match entry.parse {
            ParseHandler::Postfix(handler) => handler(self, entry, lhs),
            _ => Parsed::Complete(Expression::func(&entry.name, vec![lhs])),
        }
    }

    fn parse_juxtaposition(&mut self, lhs: &Expression) -> Option<Parsed> {
        // `a - b` is a subtraction, never `a` times `-b`.
        if self.starts_operator(&Terminator::NONE) {
            return None;
        }
        if self.implicit_argument > 0 && self.starts_function() {
            return None;
        }
        let save = self.index;
        let term = Terminator::new(IMPLICIT_MULTIPLY_PRECEDENCE + 1);
        match self.parse_expression_with(&term, false) {
            Parsed::NoMatch => {
                self.index = save;
                None
            }
            parsed => Some(parsed.map(|rhs| fold_binary("Multiply", lhs.clone(), rhs))),
        }
    }

    fn starts_function(&self) -> bool {
        !self
            .grammar
            .lookup(&self.tokens, self.index, EntryKind::Function)
            .is_empty()
    }

    // ---------- sequences and recovery ----------

    /// Parse everything up to the next boundary, turning tokens that start
    /// no expression into `Error` nodes. Several items make a `Sequence`.
    pub fn parse_sequence(&mut self) -> Parsed {
        let mut trail = ErrorTrail::default();
        let mut items = Vec::new();
        loop {
            let parsed = self.parse_expression(&Terminator::NONE);
            if let Some(expr) = trail.absorb(parsed) {
                items.push(expr);
            }
            if self.at_boundary() {
                break;
            }
            let (expr, err) = self.unexpected_token();
            trail.record(err);
            items.push(expr);
        }
        match items.len() {
            0 => Parsed::NoMatch,
            1 => trail.finish(items.remove(0)),
            _ => trail.finish(Expression::func("Sequence", items)),
        }
    }

    /// Consume one token that cannot start an expression.
    fn unexpected_token(&mut self) -> (Expression, SyntaxError) {
        let start = self.index;
        if let Some((entry, len)) = self.grammar.closing_delimiter(&self.tokens, self.index) {
            let open = entry.trigger_text();
            self.index += len;
            return self.error(
                ErrorCode::ExpectedOpenDelimiter,
                vec![Expression::string(open)],
                None,
                start,
            );
        }
        let Some(token) = self.advance() else {
            return self.error(ErrorCode::UnexpectedToken, Vec::new(), None, start);
        };
        let code = match token.kind {
            TokenKind::GroupClose => ErrorCode::ExpectedOpenDelimiter,
            TokenKind::Operator if token.text == "\\" => ErrorCode::InvalidEscape,
            TokenKind::Command => ErrorCode::UnexpectedCommand,
            _ => ErrorCode::UnexpectedToken,
        };
        let detail = if code == ErrorCode::ExpectedOpenDelimiter {
            "{".to_string()
        } else {
            token.text
        };
        self.error(code, vec![Expression::string(detail)], None, start)
    }

    /// Parse the body of a construct closed by `close`. Returns the body and
    /// whether the closer was found and consumed.
    pub fn parse_enclosed(&mut self, close: &[&str]) -> (Parsed, bool) {
        let closer: Vec<String> = close.iter().map(|s| s.to_string()).collect();
        let implicit = std::mem::take(&mut self.implicit_argument);
        self.closers.push(closer);
        let body = self.parse_sequence();
        let closer = self.closers.pop().unwrap_or_default();
        self.implicit_argument = implicit;
        let closed = self.match_trigger(closer.as_slice());
        (body, closed)
    }

    /// Wrap a construct whose closer never came.
    pub fn unclosed(
        &mut self,
        close: &str,
        partial: Expression,
        start: usize,
        trail: &mut ErrorTrail,
    ) -> Expression {
        let (expr, err) = self.error(
            ErrorCode::ExpectedCloseDelimiter,
            vec![Expression::string(close)],
            Some(partial),
            start,
        );
        trail.record(err);
        expr
    }

    /// Items of an enclosed body: a `Sequence` spreads, anything else is a
    /// single item.
    pub fn body_items(body: Option<Expression>) -> Vec<Expression> {
        match body {
            None => Vec::new(),
            Some(expr) if expr.head() == Some("Sequence") => match expr.into_function() {
                Ok((_, ops)) => ops,
                Err(expr) => vec![expr],
            },
            Some(expr) => vec![expr],
        }
    }

    /// `(a, b)` or `\left(a, b\right)` argument list, if one is next.
    pub fn parse_delimited_arguments(&mut self, trail: &mut ErrorTrail) -> Option<Vec<Expression>> {
        self.skip_space();
        let start = self.index;
        let close: &[&str] = if self.match_token("(") {
            &[")"]
        } else if self.match_trigger(&["\\left", "("]) {
            &["\\right", ")"]
        } else {
            return None;
        };
        let (body, closed) = self.parse_enclosed(close);
        let mut args = Self::body_items(trail.absorb(body));
        if !closed {
            let (expr, err) = self.error(
                ErrorCode::ExpectedCloseDelimiter,
                vec![Expression::string(close.concat())],
                None,
                start,
            );
            trail.record(err);
            args.push(expr);
        }
        Some(args)
    }

    /// Verbatim text of a `{...}` group (`\begin{matrix}`, `\mathrm{max}`).
    pub fn parse_raw_group(&mut self) -> Option<String> {
        let save = self.index;
        self.skip_space();
        if self.peek().map(|t| t.kind) != Some(TokenKind::GroupOpen) {
            self.index = save;
            return None;
        }
        self.index += 1;
        let mut depth = 0usize;
        let mut text = String::new();
        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::GroupOpen => depth += 1,
                TokenKind::GroupClose if depth == 0 => return Some(text.trim().to_string()),
                TokenKind::GroupClose => depth -= 1,
                _ => {}
            }
            text.push_str(&token.text);
        }
        self.index = save;
        None
    }
}

/// Operators written as chains (`1+2+3`, `2xy`) that parse to one n-ary node.
const FLAT_OPERATORS: &[&str] = &["Add", "Multiply"];

fn fold_binary(head: &str, lhs: Expression, rhs: Expression) -> Expression {
    if !FLAT_OPERATORS.contains(&head) || lhs.head() != Some(head) {
        return Expression::func(head, vec![lhs, rhs]);
    }
    match lhs.into_function() {
        Ok((head, mut ops)) => {
            ops.push(rhs);
            Expression::func(head, ops)
        }
        Err(lhs) => Expression::func(head, vec![lhs, rhs]),
    }
}

/// `next` is `prev` with one more operand rather than a node above it.
fn extends(prev: &Expression, next: &Expression) -> bool {
    prev.head().is_some() && prev.head() == next.head() && next.ops().len() == prev.ops().len() + 1
}

#[cfg(test)]
mod tests;
