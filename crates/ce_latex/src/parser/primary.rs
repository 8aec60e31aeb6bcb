//! Primaries: numbers, groups, delimiters, environments, symbols and
//! function applications.

use ce_ast::{ErrorCode, Expression, Span};

use super::{ErrorTrail, Parsed, Parser, Terminator, IMPLICIT_MULTIPLY_PRECEDENCE};
use crate::dictionary::{EntryKind, LatexDictionaryEntry, ParseHandler};
use crate::tokenizer::{Token, TokenKind};

/// Functions whose `^{-1}` means the inverse function.
const INVERSES: &[(&str, &str)] = &[
    ("Sin", "Arcsin"),
    ("Cos", "Arccos"),
    ("Tan", "Arctan"),
];

impl<'a> Parser<'a> {
    pub(crate) fn parse_primary(&mut self) -> Parsed {
        self.skip_space();
        let result = if self.enter() {
            self.parse_primary_inner()
        } else {
            self.nesting_too_deep()
        };
        self.leave();
        result
    }

    fn parse_primary_inner(&mut self) -> Parsed {
        let start = self.index;
        let Some(token) = self.peek().cloned() else {
            return Parsed::NoMatch;
        };
        let starts_decimal = token.text == "."
            && self
                .peek_at(1)
                .is_some_and(|t| t.kind == TokenKind::Digits);
        let parsed = match token.kind {
            TokenKind::Digits => self.parse_number(),
            TokenKind::Operator if starts_decimal => self.parse_number(),
            TokenKind::GroupOpen => self.parse_group(),
            _ => self.parse_dictionary_primary(&token),
        };
        parsed.map(|expr| self.annotate(start, expr))
    }

    /// Adjacent digit runs, an optional `.` and fraction digits.
    fn parse_number(&mut self) -> Parsed {
        let mut text = String::new();
        let mut last: Option<Span> = None;
        while let Some(token) = self.peek() {
            let touching = last.map_or(true, |span| span.end == token.span.start);
            if token.kind != TokenKind::Digits || !touching {
                break;
            }
            text.push_str(&token.text);
            last = Some(token.span);
            self.index += 1;
        }
        let fraction = self.peek_text() == Some(".")
            && self
                .peek_at(1)
                .is_some_and(|t| t.kind == TokenKind::Digits);
        if fraction {
            self.index += 1;
            text.push('.');
            if let Some(digits) = self.advance() {
                text.push_str(&digits.text);
            }
        }
        if text.starts_with('.') {
            text.insert(0, '0');
        }
        Parsed::Complete(Expression::Number(text))
    }

    /// `{...}`. An empty group is an empty `Sequence`.
    pub fn parse_group(&mut self) -> Parsed {
        let start = self.index;
        self.index += 1;
        let (body, closed) = self.parse_enclosed(&["}"]);
        let mut trail = ErrorTrail::default();
        let body = trail
            .absorb(body)
            .unwrap_or_else(|| Expression::func("Sequence", Vec::new()));
        if closed {
            trail.finish(body)
        } else {
            let expr = self.unclosed("}", body, start, &mut trail);
            trail.finish(expr)
        }
    }

    fn parse_dictionary_primary(&mut self, token: &Token) -> Parsed {
        let grammar = self.grammar;
        let start = self.index;

        for (entry, len) in grammar.lookup(&self.tokens, self.index, EntryKind::Matchfix) {
            self.index = start + len;
            let parsed = self.parse_matchfix(entry, start);
            if !parsed.is_no_match() {
                return parsed;
            }
            self.index = start;
        }
        if token.text == "\\begin" {
            return self.parse_environment();
        }
        for kind in [EntryKind::Prefix, EntryKind::Symbol, EntryKind::Function] {
            for (entry, len) in grammar.lookup(&self.tokens, self.index, kind) {
                self.index = start + len;
                let parsed = match (kind, entry.parse) {
                    (_, ParseHandler::Prefix(handler)) => handler(self, entry),
                    (EntryKind::Prefix, _) => self.default_prefix(entry),
                    (EntryKind::Symbol, _) => Parsed::Complete(Expression::sym(&entry.name)),
                    _ => self.parse_function_application(entry),
                };
                if !parsed.is_no_match() {
                    return parsed;
                }
                self.index = start;
            }
        }

        match token.kind {
            TokenKind::Letter => {
                self.index += 1;
                self.parse_letter(&token.text)
            }
            TokenKind::Command => {
                self.index += 1;
                let (expr, err) = self.error(
                    ErrorCode::UnexpectedCommand,
                    vec![Expression::string(&token.text)],
                    None,
                    start,
                );
                Parsed::Partial(expr, err)
            }
            _ => Parsed::NoMatch,
        }
    }

    fn default_prefix(&mut self, entry: &LatexDictionaryEntry) -> Parsed {
        let mut trail = ErrorTrail::default();
        let operand = self.parse_expression(&Terminator::new(entry.precedence));
        let operand = self.required(operand, &mut trail);
        trail.finish(Expression::func(&entry.name, vec![operand]))
    }

    /// A single letter; `f(x)` for configured function names.
    fn parse_letter(&mut self, name: &str) -> Parsed {
        let is_function = self.options.function_names.iter().any(|f| f == name);
        if is_function && self.peek_text() == Some("(") {
            let mut trail = ErrorTrail::default();
            let args = self.parse_delimited_arguments(&mut trail).unwrap_or_default();
            return trail.finish(Expression::func(name, args));
        }
        Parsed::Complete(Expression::sym(name))
    }

    fn parse_matchfix(&mut self, entry: &LatexDictionaryEntry, start: usize) -> Parsed {
        let close: Vec<&str> = entry.close.iter().map(String::as_str).collect();
        let (body, closed) = self.parse_enclosed(&close);
        let mut trail = ErrorTrail::default();
        let items = Self::body_items(trail.absorb(body));
        let result = match entry.parse {
            ParseHandler::Matchfix(handler) => handler(self, entry, items),
            _ => Parsed::Complete(Expression::func(&entry.name, items)),
        };
        let Some(expr) = trail.absorb(result) else {
            return Parsed::NoMatch;
        };
        if closed {
            trail.finish(expr)
        } else {
            let expr = self.unclosed(&entry.close_text(), expr, start, &mut trail);
            trail.finish(expr)
        }
    }

    /// `\begin{name} ... \end{name}`.
    fn parse_environment(&mut self) -> Parsed {
        let start = self.index;
        self.index += 1;
        let Some(name) = self.parse_raw_group() else {
            let (expr, err) = self.error(
                ErrorCode::UnexpectedCommand,
                vec![Expression::string("\\begin")],
                None,
                start,
            );
            return Parsed::Partial(expr, err);
        };
        let grammar = self.grammar;
        match grammar.environment(&name) {
            Some(entry) => match entry.parse {
                ParseHandler::Prefix(handler) => handler(self, entry),
                _ => {
                    let mut trail = ErrorTrail::default();
                    let rows = self.parse_tabular(&name, &mut trail);
                    trail.finish(Expression::func(&entry.name, vec![rows_to_list(rows)]))
                }
            },
            None => {
                let mut trail = ErrorTrail::default();
                let rows = self.parse_tabular(&name, &mut trail);
                let (expr, err) = self.error(
                    ErrorCode::UnexpectedCommand,
                    vec![Expression::string(format!("\\begin{{{name}}}"))],
                    Some(rows_to_list(rows)),
                    start,
                );
                trail.record(err);
                trail.finish(expr)
            }
        }
    }

    /// Cells of an environment body: `&` separates cells, `\\` rows, up to
    /// the matching `\end{name}`.
    pub fn parse_tabular(&mut self, name: &str, trail: &mut ErrorTrail) -> Vec<Vec<Expression>> {
        let start = self.index;
        let mut rows = Vec::new();
        let mut row = Vec::new();
        let separators = [vec!["&".to_string()], vec!["\\\\".to_string()], vec!["\\end".to_string()]];
        let implicit = std::mem::take(&mut self.implicit_argument);
        self.closers.extend(separators.iter().cloned());
        loop {
            let cell = self.parse_sequence();
            let cell = trail.absorb(cell);
            self.skip_space();
            match self.peek_text() {
                Some("&") => {
                    self.index += 1;
                    row.push(cell.unwrap_or_else(|| Expression::func("Sequence", Vec::new())));
                }
                Some("\\\\") => {
                    self.index += 1;
                    row.extend(cell);
                    if !row.is_empty() {
                        rows.push(std::mem::take(&mut row));
                    }
                }
                Some("\\end") => {
                    self.index += 1;
                    row.extend(cell);
                    if !row.is_empty() {
                        rows.push(std::mem::take(&mut row));
                    }
                    let end_start = self.index;
                    if self.parse_raw_group().as_deref() != Some(name) {
                        let (_, err) = self.error(
                            ErrorCode::ExpectedCloseDelimiter,
                            vec![Expression::string(format!("\\end{{{name}}}"))],
                            None,
                            end_start,
                        );
                        trail.record(err);
                    }
                    break;
                }
                _ => {
                    row.extend(cell);
                    if !row.is_empty() {
                        rows.push(std::mem::take(&mut row));
                    }
                    let (_, err) = self.error(
                        ErrorCode::ExpectedCloseDelimiter,
                        vec![Expression::string(format!("\\end{{{name}}}"))],
                        None,
                        start,
                    );
                    trail.record(err);
                    break;
                }
            }
        }
        let remaining = self.closers.len() - separators.len();
        self.closers.truncate(remaining);
        self.implicit_argument = implicit;
        rows
    }

    /// A single required argument: a `{}` group or one token. A digit run
    /// contributes only its first digit (`\frac12`).
    pub fn parse_argument(&mut self) -> Parsed {
        let result = if self.enter() {
            self.parse_argument_token()
        } else {
            self.nesting_too_deep()
        };
        self.leave();
        result
    }

    fn parse_argument_token(&mut self) -> Parsed {
        self.skip_space();
        let start = self.index;
        let Some(token) = self.peek().cloned() else {
            return Parsed::NoMatch;
        };
        let parsed = match token.kind {
            TokenKind::GroupOpen => {
                let group = self.parse_group();
                let empty = matches!(&group, Parsed::Complete(e)
                    if e.head() == Some("Sequence") && e.ops().is_empty());
                if empty {
                    let mut trail = ErrorTrail::default();
                    let missing = self.missing(&mut trail);
                    trail.finish(missing)
                } else {
                    group
                }
            }
            TokenKind::Digits => {
                self.split_digits();
                match self.advance() {
                    Some(digit) => Parsed::Complete(Expression::Number(digit.text)),
                    None => Parsed::NoMatch,
                }
            }
            TokenKind::Letter => {
                let grammar = self.grammar;
                let name = grammar
                    .lookup(&self.tokens, self.index, EntryKind::Symbol)
                    .first()
                    .map_or_else(|| token.text.clone(), |(entry, _)| entry.name.clone());
                self.index += 1;
                Parsed::Complete(Expression::sym(name))
            }
            TokenKind::Command => self.parse_primary(),
            TokenKind::Operator if token.text == "-" => {
                self.index += 1;
                let mut trail = ErrorTrail::default();
                let inner = self.parse_argument();
                let inner = self.required(inner, &mut trail);
                trail.finish(Expression::func("Negate", vec![inner]))
            }
            _ => Parsed::NoMatch,
        };
        parsed.map(|expr| self.annotate(start, expr))
    }

    fn split_digits(&mut self) {
        let Some(token) = self.tokens.get(self.index) else {
            return;
        };
        if token.kind != TokenKind::Digits || token.text.len() <= 1 {
            return;
        }
        let (first, rest) = token.text.split_at(1);
        let span = token.span;
        let head = Token::new(
            TokenKind::Digits,
            first,
            Span::new(span.start, span.start + 1),
        );
        let tail = Token::new(TokenKind::Digits, rest, Span::new(span.start + 1, span.end));
        self.tokens.splice(self.index..=self.index, [head, tail]);
    }

    /// `\sin x`, `\sin(x)`, `\sin^2 x`, `\sin^{-1} x`, `\log_2 x`.
    pub fn parse_function_application(&mut self, entry: &LatexDictionaryEntry) -> Parsed {
        let mut trail = ErrorTrail::default();
        let mut head = entry.name.clone();
        let mut power = None;
        let mut base = None;
        loop {
            if self.match_token("^") {
                let arg = self.parse_argument();
                power = Some(self.required(arg, &mut trail));
            } else if self.match_token("_") {
                let arg = self.parse_argument();
                base = Some(self.required(arg, &mut trail));
            } else {
                break;
            }
        }
        if power.as_ref().is_some_and(is_minus_one) {
            if let Some((_, inverse)) = INVERSES.iter().find(|(f, _)| *f == head) {
                head = inverse.to_string();
                power = None;
            }
        }

        let mut args = if self.at_open_paren() {
            self.parse_delimited_arguments(&mut trail).unwrap_or_default()
        } else {
            self.implicit_argument += 1;
            let arg = self.parse_expression(&Terminator::new(IMPLICIT_MULTIPLY_PRECEDENCE));
            self.implicit_argument -= 1;
            vec![self.required(arg, &mut trail)]
        };
        args.extend(base);
        let applied = Expression::func(head, args);
        let result = match power {
            Some(exponent) => Expression::func("Power", vec![applied, exponent]),
            None => applied,
        };
        trail.finish(result)
    }
}

pub(crate) fn rows_to_list(rows: Vec<Vec<Expression>>) -> Expression {
    Expression::func(
        "List",
        rows.into_iter()
            .map(|row| Expression::func("List", row))
            .collect(),
    )
}

fn is_minus_one(expr: &Expression) -> bool {
    match expr.inner() {
        Expression::Number(n) => n == "-1",
        Expression::Function(head, ops) if head == "Negate" && ops.len() == 1 => {
            ops[0].inner().number() == Some("1")
        }
        _ => false,
    }
}
