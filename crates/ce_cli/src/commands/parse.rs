//! `parse` and `box` subcommands.

use anyhow::{Context, Result};
use ce_engine::Engine;
use clap::Args;

use super::flush_diagnostics;
use crate::config::{CliConfig, OutputFormat};
use crate::format::render;

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// LaTeX to parse
    pub latex: String,

    /// Print the parser output before boxing
    #[arg(long)]
    pub raw: bool,

    /// Cursor offset, recorded on the result
    #[arg(long)]
    pub cursor: Option<usize>,

    /// Attach source spans to every node
    #[arg(long)]
    pub spans: bool,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

pub fn run_parse(args: &ParseArgs, mut config: CliConfig) -> Result<()> {
    config.engine.preserve_fidelity |= args.spans;
    let engine = Engine::new(config.engine);
    let format = args.format.unwrap_or(config.format);
    if args.raw {
        let raw = engine.parse_raw(&args.latex, args.cursor);
        let text = match format {
            OutputFormat::Pretty => serde_json::to_string_pretty(&raw.to_json())?,
            OutputFormat::Latex => engine.syntax().serialize(&raw),
            OutputFormat::Json => raw.to_string(),
        };
        println!("{text}");
    } else {
        let expr = engine.parse_with_cursor(&args.latex, args.cursor);
        println!("{}", render(&engine, &expr, format)?);
    }
    flush_diagnostics(&engine);
    Ok(())
}

#[derive(Args, Debug)]
pub struct BoxArgs {
    /// MathJSON document
    pub json: String,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

pub fn run_box(args: &BoxArgs, config: CliConfig) -> Result<()> {
    let engine = Engine::new(config.engine);
    let value: serde_json::Value = serde_json::from_str(&args.json).context("input is not JSON")?;
    let expr = engine.box_json(&value)?;
    println!("{}", render(&engine, &expr, args.format.unwrap_or(config.format))?);
    flush_diagnostics(&engine);
    Ok(())
}
