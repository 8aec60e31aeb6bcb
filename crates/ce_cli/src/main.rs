mod commands;
mod completer;
mod config;
mod format;
mod json_types;
mod repl;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::eval::{run_eval, EvalArgs};
use crate::commands::parse::{run_box, run_parse, BoxArgs, ParseArgs};
use crate::config::CliConfig;
use crate::repl::Repl;

/// Parse LaTeX into MathJSON and compute with it.
#[derive(Parser, Debug)]
#[command(name = "ce", version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML); defaults to ./ce_config.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine internals to stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse LaTeX and print the canonical MathJSON
    Parse(ParseArgs),
    /// Box a MathJSON document and print its canonical form
    Box(BoxArgs),
    /// Evaluate LaTeX
    Eval(EvalArgs),
    /// Interactive session (the default)
    Repl,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "ce_engine=debug,ce_latex=debug,info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Repl) {
        Command::Parse(args) => run_parse(&args, config),
        Command::Box(args) => run_box(&args, config),
        Command::Eval(args) => run_eval(&args, config),
        Command::Repl => {
            Repl::new(config).run()?;
            Ok(())
        }
    }
}
