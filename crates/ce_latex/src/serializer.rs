//! MathJSON to LaTeX.
//!
//! Output is meant to parse back to the same structure, so operands are
//! parenthesized by precedence rather than by how the input was written.

use ce_ast::Expression;

use crate::dictionary::{precedence, EntryKind, ParseHandler};
use crate::index::GrammarIndex;
use crate::options::ParseOptions;

/// Precedence of something that never needs parentheses.
const ATOMIC: u16 = u16::MAX;
const MAX_POSITIONAL_EXPONENT: u64 = 400;

pub struct Serializer<'a> {
    index: &'a GrammarIndex,
    options: &'a ParseOptions,
}

impl<'a> Serializer<'a> {
    pub fn new(index: &'a GrammarIndex, options: &'a ParseOptions) -> Self {
        Self { index, options }
    }

    pub fn serialize(&self, expr: &Expression) -> String {
        self.write(expr, 0)
    }

    fn write(&self, expr: &Expression, parent: u16) -> String {
        match expr.inner() {
            Expression::Number(text) => self.number(text, parent),
            Expression::Symbol(name) => self.symbol(name),
            Expression::String(text) => format!("\\text{{{text}}}"),
            Expression::Function(head, ops) => self.function(head, ops, parent),
            Expression::Annotated(..) => String::new(),
        }
    }

    fn number(&self, text: &str, parent: u16) -> String {
        let latex = match text {
            "+Infinity" | "Infinity" => "\\infty".to_string(),
            "-Infinity" => "-\\infty".to_string(),
            "NaN" => "\\operatorname{NaN}".to_string(),
            _ => match text.split_once(['e', 'E']) {
                Some((mantissa, exponent)) => positional(mantissa, exponent).unwrap_or_else(|| {
                    let exponent = exponent.trim_start_matches('+');
                    format!("{mantissa}\\cdot10^{{{exponent}}}")
                }),
                None => text.to_string(),
            },
        };
        let negative = latex.starts_with('-');
        let compound = latex.contains("\\cdot");
        if (negative && parent > precedence::ADDITIVE)
            || (compound && parent > precedence::MULTIPLICATIVE)
        {
            paren(&latex)
        } else {
            latex
        }
    }

    fn symbol(&self, name: &str) -> String {
        let entry = self
            .index
            .by_name(name, Some(EntryKind::Symbol))
            .filter(|e| matches!(e.parse, ParseHandler::Default));
        if let Some(entry) = entry {
            return entry.trigger_text();
        }
        if name.chars().count() == 1 {
            name.to_string()
        } else {
            format!("\\mathrm{{{name}}}")
        }
    }

    fn function(&self, head: &str, ops: &[Expression], parent: u16) -> String {
        let (latex, prec) = match head {
            "Add" => (self.sum_terms(ops), precedence::ADDITIVE),
            "Subtract" => (
                self.infix(ops, " - ", precedence::ADDITIVE),
                precedence::ADDITIVE,
            ),
            "Negate" => (
                format!("-{}", self.operand(ops, 0, precedence::NEGATE)),
                precedence::NEGATE,
            ),
            "Multiply" => (
                self.infix(ops, " \\cdot ", precedence::MULTIPLICATIVE),
                precedence::MULTIPLICATIVE,
            ),
            "Divide" | "Rational" => (
                format!(
                    "\\frac{{{}}}{{{}}}",
                    self.operand(ops, 0, 0),
                    self.operand(ops, 1, 0)
                ),
                ATOMIC,
            ),
            "Power" => (
                format!(
                    "{}^{{{}}}",
                    self.operand(ops, 0, precedence::POWER + 1),
                    self.operand(ops, 1, 0)
                ),
                precedence::POWER,
            ),
            "Subscript" => (
                format!(
                    "{}_{{{}}}",
                    self.operand(ops, 0, precedence::POWER + 1),
                    self.operand(ops, 1, 0)
                ),
                precedence::POWER,
            ),
            "Sqrt" => (format!("\\sqrt{{{}}}", self.operand(ops, 0, 0)), ATOMIC),
            "Root" => (
                format!(
                    "\\sqrt[{}]{{{}}}",
                    self.operand(ops, 1, 0),
                    self.operand(ops, 0, 0)
                ),
                ATOMIC,
            ),
            "Factorial" => (
                format!("{}!", self.operand(ops, 0, precedence::FACTORIAL)),
                precedence::FACTORIAL,
            ),
            "Not" => (
                format!("\\lnot {}", self.operand(ops, 0, precedence::NOT)),
                precedence::NOT,
            ),
            "Sequence" => (self.list(ops), precedence::SEQUENCE),
            "Delimiter" | "Tuple" => (format!("({})", self.list(ops)), ATOMIC),
            "List" => (format!("[{}]", self.list(ops)), ATOMIC),
            "Set" => (format!("\\{{{}\\}}", self.list(ops)), ATOMIC),
            "Abs" => (format!("\\left|{}\\right|", self.list(ops)), ATOMIC),
            "Floor" => (format!("\\lfloor {}\\rfloor", self.list(ops)), ATOMIC),
            "Ceil" => (format!("\\lceil {}\\rceil", self.list(ops)), ATOMIC),
            "Sum" | "Product" => (self.big_operator(head, ops), precedence::MULTIPLICATIVE),
            "Matrix" => (self.environment("pmatrix", ops), ATOMIC),
            "Piecewise" => (self.environment("cases", ops), ATOMIC),
            "Log" if ops.len() == 2 => (
                format!(
                    "\\log_{{{}}}({})",
                    self.operand(ops, 1, 0),
                    self.operand(ops, 0, 0)
                ),
                ATOMIC,
            ),
            "Error" => (self.error(ops), ATOMIC),
            _ => self.dictionary_function(head, ops),
        };
        if prec < parent {
            paren(&latex)
        } else {
            latex
        }
    }

    fn operand(&self, ops: &[Expression], i: usize, parent: u16) -> String {
        ops.get(i)
            .map(|e| self.write(e, parent))
            .unwrap_or_default()
    }

    /// Left operand at `prec`, the rest one tighter.
    fn infix(&self, ops: &[Expression], separator: &str, prec: u16) -> String {
        ops.iter()
            .enumerate()
            .map(|(i, e)| self.write(e, if i == 0 { prec } else { prec + 1 }))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn sum_terms(&self, ops: &[Expression]) -> String {
        let mut out = String::new();
        for (i, term) in ops.iter().enumerate() {
            if i == 0 {
                out.push_str(&self.write(term, precedence::ADDITIVE));
                continue;
            }
            let negated = match term.inner() {
                Expression::Function(head, inner) if head == "Negate" && inner.len() == 1 => {
                    Some(self.write(&inner[0], precedence::ADDITIVE + 1))
                }
                Expression::Number(text) if text.starts_with('-') && text != "-Infinity" => {
                    Some(text[1..].to_string())
                }
                _ => None,
            };
            match negated {
                Some(rest) => {
                    out.push_str(" - ");
                    out.push_str(&rest);
                }
                None => {
                    out.push_str(" + ");
                    out.push_str(&self.write(term, precedence::ADDITIVE + 1));
                }
            }
        }
        out
    }

    fn list(&self, ops: &[Expression]) -> String {
        ops.iter()
            .map(|e| self.write(e, precedence::SEQUENCE + 1))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn big_operator(&self, head: &str, ops: &[Expression]) -> String {
        let command = if head == "Sum" { "\\sum" } else { "\\prod" };
        let mut out = command.to_string();
        let limits = ops.get(1).map(Expression::ops).unwrap_or_default();
        let part = |i: usize| {
            limits
                .get(i)
                .filter(|e| e.inner().symbol() != Some("Nothing"))
                .map(|e| self.write(e, 0))
        };
        match (part(0), part(1)) {
            (Some(index), Some(low)) => out.push_str(&format!("_{{{index}={low}}}")),
            (Some(index), None) => out.push_str(&format!("_{{{index}}}")),
            _ => {}
        }
        if let Some(high) = part(2) {
            out.push_str(&format!("^{{{high}}}"));
        }
        out.push(' ');
        out.push_str(&self.operand(ops, 0, precedence::MULTIPLICATIVE + 1));
        out
    }

    fn environment(&self, name: &str, ops: &[Expression]) -> String {
        let rows = ops.first().map(Expression::ops).unwrap_or_default();
        let body = rows
            .iter()
            .map(|row| {
                row.ops()
                    .iter()
                    .map(|cell| self.write(cell, 0))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\");
        format!("\\begin{{{name}}}{body}\\end{{{name}}}")
    }

    fn error(&self, ops: &[Expression]) -> String {
        let code = ops
            .first()
            .and_then(|c| c.ops().first())
            .and_then(Expression::string_value)
            .unwrap_or("missing");
        format!("\\error{{{code}}}")
    }

    /// Operators and functions known to the dictionary; anything else is
    /// `\operatorname{Head}(args)`.
    fn dictionary_function(&self, head: &str, ops: &[Expression]) -> (String, u16) {
        let prefix = self.index.by_name(head, Some(EntryKind::Prefix));
        let infix = self
            .index
            .by_name(head, Some(EntryKind::Infix))
            .filter(|_| ops.len() > 1 || prefix.is_none());
        if let Some(entry) = infix {
            let separator = format!(" {} ", entry.trigger_text());
            return (self.infix(ops, &separator, entry.precedence), entry.precedence);
        }
        if let Some(entry) = prefix {
            let operand = self.operand(ops, 0, entry.precedence);
            return (format!("{} {operand}", entry.trigger_text()), entry.precedence);
        }
        let args = format!("({})", self.list(ops));
        if let Some(entry) = self
            .index
            .by_name(head, Some(EntryKind::Function))
            .filter(|e| matches!(e.parse, ParseHandler::Default))
        {
            return (format!("{}{args}", entry.trigger_text()), ATOMIC);
        }
        let applied = if self.options.function_names.iter().any(|f| f == head) {
            format!("{head}{args}")
        } else {
            format!("\\operatorname{{{head}}}{args}")
        };
        (applied, ATOMIC)
    }
}

/// Writes `1.5e20` as `150000000000000000000.0` so it reads back as one
/// inexact numeral. Exponents past `MAX_POSITIONAL_EXPONENT` keep the
/// `\cdot10^{n}` form.
fn positional(mantissa: &str, exponent: &str) -> Option<String> {
    let exponent: i64 = exponent.parse().ok()?;
    if exponent.unsigned_abs() > MAX_POSITIONAL_EXPONENT {
        return None;
    }
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int.is_empty() || !int.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let digits = format!("{int}{frac}");
    let point = int.len() as i64 + exponent;
    let (whole, fraction) = if point <= 0 {
        (String::new(), format!("{}{digits}", "0".repeat(point.unsigned_abs() as usize)))
    } else if point as usize >= digits.len() {
        (format!("{digits}{}", "0".repeat(point as usize - digits.len())), String::new())
    } else {
        let (w, f) = digits.split_at(point as usize);
        (w.to_string(), f.to_string())
    };
    let whole = match whole.trim_start_matches('0') {
        "" => "0",
        w => w,
    };
    let fraction = match fraction.trim_end_matches('0') {
        "" => "0",
        f => f,
    };
    Some(format!("{sign}{whole}.{fraction}"))
}

fn paren(latex: &str) -> String {
    format!("\\left({latex}\\right)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latex(expr: &Expression) -> String {
        let index = GrammarIndex::shared();
        let options = ParseOptions::default();
        Serializer::new(&index, &options).serialize(expr)
    }

    fn f(head: &str, ops: Vec<Expression>) -> Expression {
        Expression::func(head, ops)
    }

    #[test]
    fn arithmetic_with_precedence() {
        let e = f("Multiply", vec![f("Add", vec![1.into(), "x".into()]), "y".into()]);
        assert_eq!(latex(&e), "\\left(1 + x\\right) \\cdot y");
        let e = f("Add", vec!["x".into(), f("Negate", vec!["y".into()]), Expression::num(-2)]);
        assert_eq!(latex(&e), "x - y - 2");
        let e = f("Power", vec![f("Power", vec!["x".into(), 2.into()]), 3.into()]);
        assert_eq!(latex(&e), "\\left(x^{2}\\right)^{3}");
    }

    #[test]
    fn fractions_roots_and_symbols() {
        let e = f("Divide", vec!["Pi".into(), 2.into()]);
        assert_eq!(latex(&e), "\\frac{\\pi}{2}");
        let e = f("Root", vec!["x".into(), 3.into()]);
        assert_eq!(latex(&e), "\\sqrt[3]{x}");
        assert_eq!(latex(&Expression::sym("ExponentialE")), "e");
        assert_eq!(latex(&Expression::sym("speed")), "\\mathrm{speed}");
        assert_eq!(latex(&Expression::num("+Infinity")), "\\infty");
    }

    #[test]
    fn functions_and_relations() {
        let e = f("Sin", vec!["x".into()]);
        assert_eq!(latex(&e), "\\sin(x)");
        let e = f("Equal", vec!["x".into(), 1.into()]);
        assert_eq!(latex(&e), "x = 1");
        let e = f("PlusMinus", vec!["x".into()]);
        assert_eq!(latex(&e), "\\pm x");
        let e = f("PlusMinus", vec![1.into(), "x".into()]);
        assert_eq!(latex(&e), "1 \\pm x");
        let e = f("Foo", vec!["x".into()]);
        assert_eq!(latex(&e), "\\operatorname{Foo}(x)");
        let e = f("f", vec!["x".into()]);
        assert_eq!(latex(&e), "f(x)");
    }

    #[test]
    fn sums_and_errors() {
        let e = f(
            "Sum",
            vec![
                "k".into(),
                f("Triple", vec!["k".into(), 1.into(), 10.into()]),
            ],
        );
        assert_eq!(latex(&e), "\\sum_{k=1}^{10} k");
        let err = Expression::error(ce_ast::ErrorCode::Missing, vec![], None);
        assert_eq!(latex(&err), "\\error{missing}");
    }

    #[test]
    fn scientific_numerals_stay_single_numbers() {
        assert_eq!(latex(&Expression::num("1.5e20")), "150000000000000000000.0");
        assert_eq!(latex(&Expression::num("-2.5e-7")), "-0.00000025");
        assert_eq!(latex(&Expression::num("1e16")), "10000000000000000.0");
        assert_eq!(latex(&Expression::num("3.0")), "3.0");
        assert_eq!(latex(&Expression::num("1e999")), "1\\cdot10^{999}");
    }
}
