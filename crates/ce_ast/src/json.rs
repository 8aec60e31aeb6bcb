//! MathJSON encoding of [`Expression`].
//!
//! Encoding rules:
//! - numbers become bare JSON numbers when the text survives a trip through
//!   `f64` (integers up to 2^53, decimals up to 15 significant digits);
//!   anything else becomes `{"num": "..."}`
//! - symbols are bare strings, string literals are `{"str": "..."}`
//! - functions are arrays `[head, ...operands]`
//! - annotated nodes use the object form with `latex`, `sourceOffsets` and
//!   `cursorPosition` keys
//!
//! Decoding additionally accepts the `'text'` string shorthand, booleans as
//! `True`/`False` symbols, and `null` as a missing operand.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::ensure_ast_invariant;
use crate::error::AstError;
use crate::error_code::ErrorCode;
use crate::expression::{Expression, Metadata};
use crate::span::Span;

const MAX_SAFE_INTEGER: u64 = 1 << 53;
const MAX_FLOAT_DIGITS: usize = 15;

impl Expression {
    pub fn to_json(&self) -> Value {
        match self {
            Expression::Number(text) => number_to_json(text),
            Expression::Symbol(name) => Value::String(name.clone()),
            Expression::String(text) => json!({ "str": text }),
            Expression::Function(head, ops) => {
                let mut items = Vec::with_capacity(ops.len() + 1);
                items.push(Value::String(head.clone()));
                items.extend(ops.iter().map(Expression::to_json));
                Value::Array(items)
            }
            Expression::Annotated(inner, meta) => annotated_to_json(inner, meta),
        }
    }

    pub fn from_json(value: &Value) -> Result<Self, AstError> {
        match value {
            Value::Null => Ok(Expression::error(ErrorCode::Missing, vec![], None)),
            Value::Bool(b) => Ok(Expression::sym(if *b { "True" } else { "False" })),
            Value::Number(n) => Ok(Expression::Number(n.to_string())),
            Value::String(s) => Ok(decode_string(s)),
            Value::Array(items) => decode_function(items),
            Value::Object(map) => decode_object(map),
        }
    }

    /// Parse MathJSON text.
    pub fn from_json_str(text: &str) -> Result<Self, AstError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| AstError::InvalidObject(e.to_string()))?;
        Expression::from_json(&value)
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Expression::from_json(&value).map_err(D::Error::custom)
    }
}

fn number_to_json(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        if i.unsigned_abs() <= MAX_SAFE_INTEGER {
            return Value::from(i);
        }
    } else if is_plain_decimal(text) && significant_digits(text) <= MAX_FLOAT_DIGITS {
        if let Some(n) = text
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .and_then(serde_json::Number::from_f64)
        {
            return Value::Number(n);
        }
    }
    json!({ "num": text })
}

fn is_plain_decimal(text: &str) -> bool {
    let body = text.strip_prefix('-').unwrap_or(text);
    !body.is_empty()
        && body.chars().all(|c| c.is_ascii_digit() || c == '.')
        && body.chars().filter(|&c| c == '.').count() <= 1
}

fn significant_digits(text: &str) -> usize {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.trim_start_matches('0').len()
}

fn annotated_to_json(inner: &Expression, meta: &Metadata) -> Value {
    let mut map = match inner.to_json() {
        Value::Object(map) => map,
        Value::Array(items) => single("fn", Value::Array(items)),
        Value::String(name) => single("sym", Value::String(name)),
        other => match inner {
            Expression::Number(text) => single("num", Value::String(text.clone())),
            _ => single("fn", other),
        },
    };
    if let Some(latex) = &meta.latex {
        map.insert("latex".into(), Value::String(latex.clone()));
    }
    if let Some(span) = meta.span {
        map.insert("sourceOffsets".into(), json!([span.start, span.end]));
    }
    if let Some(cursor) = meta.cursor {
        map.insert("cursorPosition".into(), json!(cursor));
    }
    Value::Object(map)
}

fn single(key: &str, value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    map
}

fn decode_string(s: &str) -> Expression {
    if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        Expression::String(s[1..s.len() - 1].to_string())
    } else {
        Expression::Symbol(s.to_string())
    }
}

fn decode_function(items: &[Value]) -> Result<Expression, AstError> {
    let (head, rest) = items.split_first().ok_or(AstError::EmptyFunction)?;
    let head = match head {
        Value::String(name) => name.clone(),
        other => return Err(AstError::InvalidHead(other.to_string())),
    };
    ensure_ast_invariant!(!head.is_empty(), "function head must not be empty");
    let ops = rest
        .iter()
        .map(Expression::from_json)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expression::Function(head, ops))
}

fn decode_object(map: &Map<String, Value>) -> Result<Expression, AstError> {
    let expr = if let Some(num) = map.get("num") {
        match num {
            Value::String(text) => Expression::Number(text.clone()),
            Value::Number(n) => Expression::Number(n.to_string()),
            other => return Err(AstError::InvalidObject(format!("num: {other}"))),
        }
    } else if let Some(Value::String(name)) = map.get("sym") {
        Expression::Symbol(name.clone())
    } else if let Some(Value::String(text)) = map.get("str") {
        Expression::String(text.clone())
    } else if let Some(Value::Array(items)) = map.get("fn") {
        decode_function(items)?
    } else {
        return Err(AstError::InvalidObject(Value::Object(map.clone()).to_string()));
    };

    let span = match map.get("sourceOffsets") {
        Some(Value::Array(pair)) if pair.len() == 2 => {
            match (pair[0].as_u64(), pair[1].as_u64()) {
                (Some(start), Some(end)) => Some(Span::new(start as usize, end as usize)),
                _ => None,
            }
        }
        _ => None,
    };
    let meta = Metadata {
        span,
        latex: map.get("latex").and_then(Value::as_str).map(str::to_string),
        cursor: map
            .get("cursorPosition")
            .and_then(Value::as_u64)
            .map(|c| c as usize),
    };
    Ok(expr.annotate(meta))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Expression {
        match Expression::from_json_str(text) {
            Ok(e) => e,
            Err(e) => panic!("failed to decode {text}: {e}"),
        }
    }

    #[test]
    fn small_numbers_stay_bare() {
        assert_eq!(Expression::num(1024).to_json(), json!(1024));
        assert_eq!(Expression::num("-2.5").to_json(), json!(-2.5));
    }

    #[test]
    fn wide_numbers_use_object_form() {
        let big = "123456789012345678901234567890";
        assert_eq!(Expression::num(big).to_json(), json!({ "num": big }));
        assert_eq!(Expression::num("+Infinity").to_json(), json!({ "num": "+Infinity" }));
        assert_eq!(
            Expression::num("0.1234567890123456789").to_json(),
            json!({ "num": "0.1234567890123456789" })
        );
    }

    #[test]
    fn function_and_string_forms() {
        let e = Expression::func("Add", vec![1.into(), "x".into()]);
        assert_eq!(e.to_json(), json!(["Add", 1, "x"]));
        assert_eq!(Expression::string("hi").to_json(), json!({ "str": "hi" }));
        assert_eq!(e.to_string(), r#"["Add",1,"x"]"#);
    }

    #[test]
    fn decodes_shorthands() {
        assert_eq!(parse(r#""'hello'""#), Expression::string("hello"));
        assert_eq!(parse(r#""x""#), Expression::sym("x"));
        assert_eq!(parse("true"), Expression::sym("True"));
        assert_eq!(parse(r#"{"num": "1e400"}"#), Expression::num("1e400"));
        assert_eq!(
            parse(r#"["Power", "x", null]"#),
            Expression::func(
                "Power",
                vec!["x".into(), Expression::error(ErrorCode::Missing, vec![], None)]
            )
        );
    }

    #[test]
    fn annotated_round_trip() {
        let e = Expression::func("Add", vec![1.into(), 2.into()])
            .with_span(Span::new(0, 3))
            .annotate(Metadata {
                latex: Some("1+2".into()),
                cursor: Some(1),
                ..Metadata::default()
            });
        let json = e.to_json();
        assert_eq!(
            json,
            json!({ "fn": ["Add", 1, 2], "latex": "1+2", "sourceOffsets": [0, 3], "cursorPosition": 1 })
        );
        assert_eq!(Expression::from_json(&json), Ok(e));
    }

    #[test]
    fn rejects_non_string_heads() {
        assert_eq!(
            Expression::from_json(&json!([1, 2])),
            Err(AstError::InvalidHead("1".into()))
        );
        assert_eq!(Expression::from_json(&json!([])), Err(AstError::EmptyFunction));
    }

    #[test]
    fn serde_impls_delegate_to_mathjson() {
        let e = Expression::func("Sin", vec!["x".into()]);
        let text = serde_json::to_string(&e).unwrap_or_default();
        assert_eq!(text, r#"["Sin","x"]"#);
        let back: Expression = serde_json::from_str(&text).unwrap_or_else(|_| Expression::sym("?"));
        assert_eq!(back, e);
    }
}
