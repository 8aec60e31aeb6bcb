//! `eval` subcommand: parse, run one tier, print the result.

use anyhow::{bail, Result};
use ce_engine::Engine;
use clap::Args;

use super::flush_diagnostics;
use crate::config::{parse_mode, CliConfig, OutputFormat, Tier};
use crate::format::render;
use crate::json_types::{DiagnosticJson, ErrorJsonOutput, EvalJsonOutput, OptionsJson};

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// LaTeX to evaluate
    pub latex: String,

    #[arg(long, value_enum)]
    pub tier: Option<Tier>,

    /// Numeric mode: machine, arbitrary
    #[arg(long)]
    pub mode: Option<String>,

    /// Significant digits in arbitrary mode
    #[arg(long)]
    pub precision: Option<usize>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print a JSON envelope with the result and its diagnostics
    #[arg(long)]
    pub json: bool,

    /// Fail when the result contains an error node
    #[arg(long)]
    pub strict: bool,
}

pub fn run_eval(args: &EvalArgs, mut config: CliConfig) -> Result<()> {
    if let Some(mode) = &args.mode {
        config.engine.numeric_mode = parse_mode(mode)?;
    }
    if let Some(precision) = args.precision {
        config.engine.precision = precision.max(1);
    }
    let tier = args.tier.unwrap_or(config.tier);
    let engine = Engine::new(config.engine);

    let expr = engine.parse(&args.latex);
    let result = match tier.apply(&engine, &expr) {
        Ok(result) => result,
        Err(err) if args.json => {
            let output = ErrorJsonOutput::new(err.to_string(), Some(args.latex.clone()));
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    if args.json {
        let options = engine.options();
        let output = EvalJsonOutput {
            ok: result.is_valid(),
            input: args.latex.clone(),
            tier: format!("{tier:?}").to_lowercase(),
            result: result.json(),
            latex: engine.serialize(&result),
            valid: result.is_valid(),
            diagnostics: engine.take_diagnostics().iter().map(DiagnosticJson::from).collect(),
            options: OptionsJson {
                numeric_mode: format!("{:?}", options.numeric_mode).to_lowercase(),
                precision: options.effective_precision(),
            },
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", render(&engine, &result, args.format.unwrap_or(config.format))?);
        flush_diagnostics(&engine);
    }

    if args.strict && !result.is_valid() {
        bail!("result contains errors");
    }
    Ok(())
}
