//! Conversion back to the raw MathJSON tree.

use ce_ast::Expression;
use ce_numeric::NumericValue;
use serde_json::Value;

use super::{BoxedExpr, ExprKind};

/// Numeral text for a real, non-rational value.
fn float_text(x: f64) -> String {
    let magnitude = x.abs();
    if x.is_finite() && magnitude != 0.0 && !(1e-6..1e16).contains(&magnitude) {
        format!("{x:e}")
    } else {
        NumericValue::Float(x).to_string()
    }
}

pub(crate) fn number_to_expression(value: &NumericValue) -> Expression {
    match value {
        NumericValue::Integer(n) => Expression::Number(n.to_string()),
        NumericValue::Rational(r) => Expression::func(
            "Rational",
            vec![
                Expression::Number(r.numer().to_string()),
                Expression::Number(r.denom().to_string()),
            ],
        ),
        NumericValue::Float(x) => Expression::Number(float_text(*x)),
        NumericValue::Decimal(_) => Expression::Number(value.to_string()),
        NumericValue::Complex(z) => Expression::func(
            "Complex",
            vec![
                Expression::Number(float_text(z.re)),
                Expression::Number(float_text(z.im)),
            ],
        ),
    }
}

impl BoxedExpr {
    /// Raw MathJSON form, keeping metadata annotations.
    pub fn to_expression(&self) -> Expression {
        let expr = match self.kind() {
            ExprKind::Number(n) => number_to_expression(n),
            ExprKind::Symbol(s) => Expression::sym(&*s.name),
            ExprKind::String(text) => Expression::string(text.as_str()),
            ExprKind::Function(head, ops) => Expression::func(
                head.name(),
                ops.iter().map(BoxedExpr::to_expression).collect(),
            ),
        };
        match self.metadata() {
            Some(meta) => expr.annotate(meta.clone()),
            None => expr,
        }
    }

    pub fn json(&self) -> Value {
        self.to_expression().to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::Builtin;

    #[test]
    fn test_numbers_to_json() {
        let third = BoxedExpr::number(NumericValue::fraction(1, 3).expect("non-zero denominator"));
        assert_eq!(third.to_string(), r#"["Rational",1,3]"#);
        assert_eq!(BoxedExpr::integer(-7).to_string(), "-7");
        assert_eq!(float_text(1e-20), "1e-20");
        assert_eq!(float_text(0.25), "0.25");
        assert_eq!(float_text(3.0), "3.0");
        assert_eq!(float_text(1.5e20), "1.5e20");
        assert_eq!(float_text(f64::INFINITY), "+Infinity");
    }

    #[test]
    fn test_function_to_json() {
        let expr = BoxedExpr::function(
            Builtin::Power,
            vec![BoxedExpr::integer(2), BoxedExpr::integer(10)],
            true,
        );
        assert_eq!(expr.json(), serde_json::json!(["Power", 2, 10]));
    }
}
