//! Contract tests for the `ce` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("ce").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("eval"))
        .stdout(predicate::str::contains("repl"));
}

#[test]
fn test_parse_prints_canonical_json() {
    cli()
        .args(["parse", "2^3^4"])
        .assert()
        .success()
        .stdout(r#"["Power",2,["Power",3,4]]"#.to_string() + "\n");
}

#[test]
fn test_parse_raw_keeps_parser_output() {
    cli()
        .args(["parse", "--raw", "1+2*3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"["Add",1,["Multiply",2,3]]"#));
}

#[test]
fn test_syntax_errors_go_to_stderr() {
    cli()
        .args(["parse", "1+"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("error[missing]"));
}

#[test]
fn test_box_canonicalizes_mathjson() {
    cli()
        .args(["box", r#"["Add", ["Add", "b", "a"], 1, 2]"#])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"["Add",3,"a","b"]"#));

    cli().args(["box", "not json"]).assert().failure();
}

#[test]
fn test_eval_tiers() {
    cli()
        .args(["eval", "2^{10}"])
        .assert()
        .success()
        .stdout("1024\n");
    cli()
        .args(["eval", "--tier", "simplify", "x+x"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"["Multiply",2,"x"]"#));
    cli()
        .args(["eval", "--tier", "n", "\\frac{1}{4}"])
        .assert()
        .success()
        .stdout("0.25\n");
}

#[test]
fn test_eval_arbitrary_precision() {
    cli()
        .args(["eval", "--tier", "n", "--mode", "arbitrary", "--precision", "30", "\\pi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3.14159265358979323846264338"));
    cli()
        .args(["eval", "--mode", "quad", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown numeric mode"));
}

#[test]
fn test_eval_latex_output() {
    cli()
        .args(["eval", "--format", "latex", "x-y"])
        .assert()
        .success()
        .stdout("x - y\n");
}

#[test]
fn test_eval_json_envelope() {
    let output = cli().args(["eval", "--json", "q+1"]).output().unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("invalid JSON output");
    assert_eq!(json["ok"], true);
    assert_eq!(json["tier"], "evaluate");
    assert_eq!(json["result"], serde_json::json!(["Add", 1, "q"]));
    assert_eq!(json["diagnostics"][0]["code"], "unbound-symbol");
    assert_eq!(json["diagnostics"][0]["subject"], "q");
}

#[test]
fn test_strict_fails_on_error_nodes() {
    cli().args(["eval", "1/0"]).assert().success();
    cli()
        .args(["eval", "--strict", "1/0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[division-by-zero]"));
}

#[test]
fn test_config_file() {
    let dir = std::env::temp_dir().join(format!("ce_cli_config_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("ce.toml");
    std::fs::write(&path, "tier = \"canonical\"\nformat = \"latex\"\n").unwrap();
    cli()
        .arg("--config")
        .arg(&path)
        .args(["eval", "2^{10}"])
        .assert()
        .success()
        .stdout("2^{10}\n");

    cli()
        .args(["--config", "/nonexistent/ce.toml", "eval", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading config file"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_repl_reads_stdin() {
    cli()
        .arg("repl")
        .env("HOME", std::env::temp_dir())
        .write_stdin(":let a = 6\na \\cdot 7\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("a := 6"))
        .stdout(predicate::str::contains("42"));
}
