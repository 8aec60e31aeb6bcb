//! LaTeX syntax for MathJSON expressions.
//!
//! [`LatexSyntax`] owns a shared [`GrammarIndex`] and parse options, parses
//! LaTeX into [`Expression`]s with error recovery, and serializes
//! expressions back to LaTeX.
//!
//! ```
//! use ce_latex::LatexSyntax;
//!
//! let syntax = LatexSyntax::default();
//! let expr = syntax.parse("\\frac{1}{2}+x", None);
//! assert_eq!(expr.to_string(), r#"["Add",["Divide",1,2],"x"]"#);
//! ```

pub mod dictionary;
pub mod error;
pub mod index;
pub mod options;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

use std::sync::Arc;

use ce_ast::{Expression, Metadata, Span};
use tracing::debug;

pub use dictionary::{
    default_dictionary, Associativity, EntryKind, LatexDictionaryEntry, LibraryCategory,
    ParseHandler,
};
pub use error::SyntaxError;
pub use index::GrammarIndex;
pub use options::ParseOptions;
pub use parser::{ErrorTrail, Parsed, Parser, Terminator};
pub use serializer::Serializer;
pub use tokenizer::{tokenize, Token, TokenKind};

#[derive(Debug, Clone)]
pub struct LatexSyntax {
    index: Arc<GrammarIndex>,
    options: ParseOptions,
}

impl Default for LatexSyntax {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl LatexSyntax {
    /// Syntax over the full default dictionary.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            index: GrammarIndex::shared(),
            options,
        }
    }

    /// Syntax over a custom index, e.g. one restricted to some categories.
    pub fn with_index(index: Arc<GrammarIndex>, options: ParseOptions) -> Self {
        Self { index, options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn index(&self) -> &Arc<GrammarIndex> {
        &self.index
    }

    /// Parse LaTeX. Never fails: problems are embedded as `Error` nodes.
    pub fn parse(&self, latex: &str, cursor: Option<usize>) -> Expression {
        self.parse_with_errors(latex, cursor).0
    }

    /// Parse LaTeX, also returning every syntax error in source order.
    pub fn parse_with_errors(
        &self,
        latex: &str,
        cursor: Option<usize>,
    ) -> (Expression, Vec<SyntaxError>) {
        let tokens = tokenize(latex);
        let mut parser = Parser::new(tokens, &self.index, &self.options);
        let body = parser.parse_sequence();
        let expr = body
            .into_expr()
            .unwrap_or_else(|| Expression::func("Sequence", Vec::new()));
        let mut errors = parser.into_errors();
        errors.sort_by_key(|e| (e.span.start, e.span.end));

        let meta = Metadata {
            span: self
                .options
                .preserve_fidelity
                .then(|| Span::new(0, latex.len())),
            latex: self.options.preserve_fidelity.then(|| latex.to_string()),
            cursor,
        };
        debug!(errors = errors.len(), "parsed latex");
        (expr.annotate(meta), errors)
    }

    pub fn serialize(&self, expr: &Expression) -> String {
        Serializer::new(&self.index, &self.options).serialize(expr)
    }
}
