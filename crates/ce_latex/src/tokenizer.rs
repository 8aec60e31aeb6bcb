//! LaTeX tokenizer (nom).
//!
//! Tokenization is total: every input produces a token stream. Characters
//! no rule recognises become single-character operator tokens and are
//! diagnosed by the parser. `%` comments are dropped.

use ce_ast::Span;
use nom::{
    branch::alt,
    bytes::complete::{take, take_while1},
    character::complete::{char, digit1, multispace1, not_line_ending, satisfy},
    combinator::{map, recognize},
    sequence::pair,
    IResult,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// `\name` or a backslash followed by one non-letter (`\{`, `\,`).
    Command,
    GroupOpen,
    GroupClose,
    /// Run of ASCII digits; the parser may split it.
    Digits,
    /// Single alphabetic character.
    Letter,
    /// Any other single character, including `( ) [ ] | ^ _ &`.
    Operator,
    Space,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn is_space(&self) -> bool {
        self.kind == TokenKind::Space
    }
}

#[derive(Clone, Copy)]
enum Lexeme {
    Token(TokenKind),
    Comment,
}

fn command(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        char('\\'),
        alt((take_while1(|c: char| c.is_ascii_alphabetic()), take(1usize))),
    ))(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('%'), not_line_ending))(input)
}

fn letter(input: &str) -> IResult<&str, &str> {
    recognize(satisfy(|c| c.is_alphabetic()))(input)
}

fn any_char(input: &str) -> IResult<&str, &str> {
    take(1usize)(input)
}

fn lexeme(input: &str) -> IResult<&str, (Lexeme, &str)> {
    alt((
        map(comment, |s| (Lexeme::Comment, s)),
        map(command, |s| (Lexeme::Token(TokenKind::Command), s)),
        map(multispace1, |s| (Lexeme::Token(TokenKind::Space), s)),
        map(digit1, |s| (Lexeme::Token(TokenKind::Digits), s)),
        map(letter, |s| (Lexeme::Token(TokenKind::Letter), s)),
        map(recognize(char('{')), |s| (Lexeme::Token(TokenKind::GroupOpen), s)),
        map(recognize(char('}')), |s| (Lexeme::Token(TokenKind::GroupClose), s)),
        map(any_char, |s| (Lexeme::Token(TokenKind::Operator), s)),
    ))(input)
}

/// Split LaTeX source into tokens with byte spans.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut remaining = source;
    while !remaining.is_empty() {
        let start = source.len() - remaining.len();
        match lexeme(remaining) {
            Ok((rest, (Lexeme::Token(kind), text))) => {
                tokens.push(Token::new(kind, text, Span::new(start, start + text.len())));
                remaining = rest;
            }
            Ok((rest, (Lexeme::Comment, _))) => remaining = rest,
            Err(_) => {
                // `any_char` only fails on empty input, which the loop excludes.
                let width = remaining.chars().next().map_or(1, char::len_utf8);
                tokens.push(Token::new(
                    TokenKind::Operator,
                    &remaining[..width],
                    Span::new(start, start + width),
                ));
                remaining = &remaining[width..];
            }
        }
    }
    tokens
}

/// Concatenate token texts back into LaTeX.
pub fn tokens_to_string(tokens: &[Token]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        // A command followed directly by a letter needs a separator.
        if i > 0
            && tokens[i - 1].kind == TokenKind::Command
            && tokens[i - 1].text.len() > 2
            && token.kind == TokenKind::Letter
        {
            out.push(' ');
        }
        out.push_str(&token.text);
    }
    out
}

/// Tokenize a dictionary trigger; spaces are not significant in triggers.
pub(crate) fn trigger_tokens(trigger: &str) -> Vec<String> {
    tokenize(trigger)
        .into_iter()
        .filter(|t| !t.is_space())
        .map(|t| t.text)
        .collect()
}

/// Spacing commands the parser treats as whitespace.
pub(crate) fn is_spacing_command(text: &str) -> bool {
    matches!(
        text,
        "\\," | "\\;" | "\\:" | "\\!" | "\\ " | "\\quad" | "\\qquad"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(TokenKind, String)> {
        tokenize(src).into_iter().map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn commands_digits_and_letters() {
        assert_eq!(
            kinds("\\frac12x"),
            vec![
                (TokenKind::Command, "\\frac".into()),
                (TokenKind::Digits, "12".into()),
                (TokenKind::Letter, "x".into()),
            ]
        );
    }

    #[test]
    fn single_symbol_commands() {
        assert_eq!(
            kinds("\\{\\,"),
            vec![
                (TokenKind::Command, "\\{".into()),
                (TokenKind::Command, "\\,".into()),
            ]
        );
    }

    #[test]
    fn groups_operators_and_space() {
        let toks = kinds("{a} + (b)");
        assert_eq!(toks[0].0, TokenKind::GroupOpen);
        assert_eq!(toks[2].0, TokenKind::GroupClose);
        assert_eq!(toks[3].0, TokenKind::Space);
        assert_eq!(toks[4], (TokenKind::Operator, "+".into()));
        assert_eq!(toks[6], (TokenKind::Operator, "(".into()));
    }

    #[test]
    fn comments_are_dropped() {
        assert_eq!(
            kinds("x % note\ny"),
            vec![
                (TokenKind::Letter, "x".into()),
                (TokenKind::Space, " ".into()),
                (TokenKind::Space, "\n".into()),
                (TokenKind::Letter, "y".into()),
            ]
        );
    }

    #[test]
    fn lone_backslash_is_an_operator() {
        assert_eq!(kinds("x\\"), vec![
            (TokenKind::Letter, "x".into()),
            (TokenKind::Operator, "\\".into()),
        ]);
    }

    #[test]
    fn spans_are_byte_offsets() {
        let toks = tokenize("αx");
        assert_eq!(toks[0].span, Span::new(0, 2));
        assert_eq!(toks[1].span, Span::new(2, 3));
    }

    #[test]
    fn round_trip_to_string() {
        let src = "\\sin x+\\frac{1}{2}";
        assert_eq!(tokens_to_string(&tokenize(src)), src);
        assert_eq!(trigger_tokens("\\left ("), vec!["\\left", "("]);
    }
}
