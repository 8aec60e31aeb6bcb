use ce_ast::{ErrorCode, Expression, Span};

use crate::{LatexSyntax, ParseOptions, SyntaxError};

fn parse(src: &str) -> String {
    LatexSyntax::default().parse(src, None).to_string()
}

fn parse_errors(src: &str) -> (Expression, Vec<SyntaxError>) {
    LatexSyntax::default().parse_with_errors(src, None)
}

fn codes(src: &str) -> Vec<ErrorCode> {
    parse_errors(src).1.into_iter().map(|e| e.code).collect()
}

#[test]
fn test_parse_arithmetic() {
    let cases = [
        ("1+2", r#"["Add",1,2]"#),
        ("1+2\\cdot3", r#"["Add",1,["Multiply",2,3]]"#),
        ("a-b+c", r#"["Add",["Subtract","a","b"],"c"]"#),
        ("2x", r#"["Multiply",2,"x"]"#),
        ("-x^2", r#"["Negate",["Power","x",2]]"#),
        ("x/y/z", r#"["Divide",["Divide","x","y"],"z"]"#),
        ("n!", r#"["Factorial","n"]"#),
        ("0.5", "0.5"),
        (".5", "0.5"),
        ("+x", "\"x\""),
    ];
    for (input, expected) in cases {
        assert_eq!(parse(input), expected, "input: {input}");
    }
}

#[test]
fn test_parse_superscripts_take_one_token() {
    let cases = [
        ("x^2", r#"["Power","x",2]"#),
        ("2^{10}", r#"["Power",2,10]"#),
        ("x^23", r#"["Multiply",["Power","x",2],3]"#),
        ("x_0^2", r#"["Power",["Subscript","x",0],2]"#),
        ("x^2_0", r#"["Power",["Subscript","x",0],2]"#),
        ("x^a^b", r#"["Power","x",["Power","a","b"]]"#),
        ("\\frac12", r#"["Divide",1,2]"#),
        ("\\frac{1}{2}+x", r#"["Add",["Divide",1,2],"x"]"#),
    ];
    for (input, expected) in cases {
        assert_eq!(parse(input), expected, "input: {input}");
    }
}

#[test]
fn test_parse_functions() {
    let cases = [
        ("\\sin x", r#"["Sin","x"]"#),
        ("\\sin(x)", r#"["Sin","x"]"#),
        ("\\sin 2x", r#"["Sin",["Multiply",2,"x"]]"#),
        ("\\sin^2 x", r#"["Power",["Sin","x"],2]"#),
        ("\\sin^{-1} x", r#"["Arcsin","x"]"#),
        ("\\sin x\\cos x", r#"["Multiply",["Sin","x"],["Cos","x"]]"#),
        ("\\sin x + 1", r#"["Add",["Sin","x"],1]"#),
        ("\\log_2 x", r#"["Log","x",2]"#),
        ("\\sqrt{x}", r#"["Sqrt","x"]"#),
        ("\\sqrt[3]{x}", r#"["Root","x",3]"#),
        ("f(x, y)", r#"["f","x","y"]"#),
        ("q(x)", r#"["Multiply","q",["Delimiter","x"]]"#),
        ("\\operatorname{max}(1,2)", r#"["max",1,2]"#),
        ("\\mathrm{speed}", "\"speed\""),
    ];
    for (input, expected) in cases {
        assert_eq!(parse(input), expected, "input: {input}");
    }
}

#[test]
fn test_parse_symbols_and_literals() {
    let cases = [
        ("\\pi", "\"Pi\""),
        ("\\alpha", "\"alpha\""),
        ("e^{i\\pi}", r#"["Power","ExponentialE",["Multiply","i","Pi"]]"#),
        ("\\mathrm{i}", "\"ImaginaryUnit\""),
        ("\\infty", r#"{"num":"+Infinity"}"#),
        ("\\text{hello}", r#"{"str":"hello"}"#),
        ("\\top", "\"True\""),
    ];
    for (input, expected) in cases {
        assert_eq!(parse(input), expected, "input: {input}");
    }
}

#[test]
fn test_parse_delimiters_and_environments() {
    let cases = [
        ("(1+2)", r#"["Delimiter",["Add",1,2]]"#),
        ("\\left(x\\right)", r#"["Delimiter","x"]"#),
        ("|x|", r#"["Abs","x"]"#),
        ("\\lfloor x\\rfloor", r#"["Floor","x"]"#),
        ("[1, 2]", r#"["List",1,2]"#),
        ("\\{1, 2\\}", r#"["Set",1,2]"#),
        ("a, b, c", r#"["Sequence","a","b","c"]"#),
        (
            "\\begin{pmatrix}1 & 2\\\\3 & 4\\end{pmatrix}",
            r#"["Matrix",["List",["List",1,2],["List",3,4]]]"#,
        ),
    ];
    for (input, expected) in cases {
        assert_eq!(parse(input), expected, "input: {input}");
    }
}

#[test]
fn test_parse_relations_and_logic() {
    let cases = [
        ("x = 1", r#"["Equal","x",1]"#),
        ("a \\le b", r#"["LessEqual","a","b"]"#),
        ("a <= b", r#"["LessEqual","a","b"]"#),
        ("x+1 < 2y", r#"["Less",["Add","x",1],["Multiply",2,"y"]]"#),
        ("\\lnot p \\land q", r#"["And",["Not","p"],"q"]"#),
        ("p \\lor q \\land r", r#"["Or","p",["And","q","r"]]"#),
        ("x \\in S", r#"["Element","x","S"]"#),
    ];
    for (input, expected) in cases {
        assert_eq!(parse(input), expected, "input: {input}");
    }
}

#[test]
fn test_parse_relation_chains() {
    let cases = [
        ("1<2<3", r#"["Less",1,2,3]"#),
        ("x=y=z", r#"["Equal","x","y","z"]"#),
        ("a \\ge b \\ge c", r#"["GreaterEqual","a","b","c"]"#),
        ("1<2\\le3", r#"["And",["Less",1,2],["LessEqual",2,3]]"#),
        ("1<2\\le3\\le4", r#"["And",["Less",1,2],["LessEqual",2,3,4]]"#),
        ("a \\neq b \\neq c", r#"["And",["NotEqual","a","b"],["NotEqual","b","c"]]"#),
        ("(a<b)<c", r#"["Less",["Delimiter",["Less","a","b"]],"c"]"#),
    ];
    for (input, expected) in cases {
        assert_eq!(parse(input), expected, "input: {input}");
    }
}

#[test]
fn test_parse_associative_chains_are_flat() {
    let cases = [
        ("1+2+3", r#"["Add",1,2,3]"#),
        ("a\\cdot b\\cdot c", r#"["Multiply","a","b","c"]"#),
        ("2xy", r#"["Multiply",2,"x","y"]"#),
        ("a-b-c", r#"["Subtract",["Subtract","a","b"],"c"]"#),
        ("\\pm 1", r#"["PlusMinus",1]"#),
        ("x \\pm 1", r#"["PlusMinus","x",1]"#),
    ];
    for (input, expected) in cases {
        assert_eq!(parse(input), expected, "input: {input}");
    }
}

#[test]
fn test_parse_sums() {
    let cases = [
        (
            "\\sum_{k=1}^{10} k^2",
            r#"["Sum",["Power","k",2],["Triple","k",1,10]]"#,
        ),
        (
            "\\sum^{n}_{i=0} i + 1",
            r#"["Add",["Sum","i",["Triple","i",0,"n"]],1]"#,
        ),
        ("\\prod_k k", r#"["Product","k",["Triple","k","Nothing","Nothing"]]"#),
    ];
    for (input, expected) in cases {
        assert_eq!(parse(input), expected, "input: {input}");
    }
}

#[test]
fn test_empty_input_is_an_empty_sequence() {
    assert_eq!(parse(""), r#"["Sequence"]"#);
    assert_eq!(parse("  "), r#"["Sequence"]"#);
}

#[test]
fn test_missing_operand() {
    let (expr, errors) = parse_errors("1+");
    assert_eq!(
        expr.to_string(),
        r#"["Add",1,["Error",["ErrorCode",{"str":"missing"}]]]"#
    );
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::Missing);
    assert_eq!(errors[0].span, Span::at(2));
    assert_eq!(codes("\\frac{1}{}"), vec![ErrorCode::Missing]);
}

#[test]
fn test_unbalanced_delimiters() {
    let (expr, _) = parse_errors("(1+2");
    assert_eq!(expr.error_code(), Some(ErrorCode::ExpectedCloseDelimiter));

    let (expr, _) = parse_errors("1+2)");
    assert_eq!(expr.head(), Some("Sequence"));
    assert_eq!(expr.ops()[0].to_string(), r#"["Add",1,2]"#);
    assert_eq!(expr.ops()[1].error_code(), Some(ErrorCode::ExpectedOpenDelimiter));

    assert_eq!(codes("}"), vec![ErrorCode::ExpectedOpenDelimiter]);
}

#[test]
fn test_inner_error_keeps_outer_delimiter() {
    // The unclosed group stops at `)`, which still closes the parenthesis.
    let (expr, errors) = parse_errors("(\\frac{1}{2)");
    assert_eq!(expr.head(), Some("Delimiter"));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::ExpectedCloseDelimiter);
}

#[test]
fn test_unknown_tokens_resume() {
    let (expr, errors) = parse_errors("x \\foo y");
    assert!(expr.has_errors());
    assert_eq!(errors[0].code, ErrorCode::UnexpectedCommand);
    assert_eq!(errors[0].detail.as_deref(), Some("\\foo"));
    assert!(expr.to_string().contains("\"y\""));

    assert_eq!(codes("x\\"), vec![ErrorCode::InvalidEscape]);
    assert_eq!(codes("1 & 2"), vec![ErrorCode::UnexpectedToken]);
    assert_eq!(
        codes("\\begin{foo}x\\end{foo}"),
        vec![ErrorCode::UnexpectedCommand]
    );
}

#[test]
fn test_nesting_limit() {
    let options = ParseOptions {
        max_depth: 8,
        ..ParseOptions::default()
    };
    let syntax = LatexSyntax::new(options);
    let deep = format!("{}x{}", "{".repeat(20), "}".repeat(20));
    let (expr, errors) = syntax.parse_with_errors(&deep, None);
    assert!(expr.has_errors());
    assert!(errors.iter().any(|e| e.code == ErrorCode::NestingTooDeep));

    let chained = "\\sqrt".repeat(50) + "x";
    let (_, errors) = syntax.parse_with_errors(&chained, None);
    assert!(errors.iter().any(|e| e.code == ErrorCode::NestingTooDeep));
}

#[test]
fn test_nesting_limit_applies_to_operator_chains() {
    let inputs = [
        "2^".repeat(1000),
        "2^".repeat(1000) + "2",
        "\\sqrt".repeat(1000) + "x",
        "\\frac1".repeat(1000) + "2",
        "x".to_string() + &"_1".repeat(1000),
        "1-".repeat(1000) + "1",
        "n".to_string() + &"!".repeat(1000),
    ];
    for input in &inputs {
        let (expr, errors) = parse_errors(input);
        let head = &input[..12];
        assert!(expr.has_errors(), "{head}...");
        assert!(errors.iter().any(|e| e.code == ErrorCode::NestingTooDeep), "{head}...");
        assert!(!expr.to_string().is_empty());
        assert!(!expr.to_json().is_null());
    }
    let (expr, errors) = parse_errors(&("1+".repeat(1000) + "1"));
    assert!(errors.is_empty());
    assert_eq!(expr.ops().len(), 1001);
}

#[test]
fn test_fidelity_spans() {
    let syntax = LatexSyntax::new(ParseOptions {
        preserve_fidelity: true,
        ..ParseOptions::default()
    });
    let expr = syntax.parse("1+x", Some(1));
    let meta = expr.metadata().cloned().unwrap_or_default();
    assert_eq!(meta.latex.as_deref(), Some("1+x"));
    assert_eq!(meta.span, Some(Span::new(0, 3)));
    assert_eq!(meta.cursor, Some(1));
    assert_eq!(expr.ops()[1].span(), Some(Span::new(2, 3)));
    assert_eq!(expr.strip_metadata().to_string(), r#"["Add",1,"x"]"#);
}
