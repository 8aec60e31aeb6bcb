use std::path::Path;

use anyhow::{bail, Context as _, Result};
use ce_engine::Engine;
use clap::ValueEnum;
use rustyline::error::ReadlineError;

use crate::completer::CeHelper;
use crate::config::{parse_mode, CliConfig, OutputFormat, Tier};
use crate::format::{diagnostic_line, render};

pub const COMMANDS: &[&str] = &[
    ":help",
    ":quit",
    ":mode",
    ":precision",
    ":tier",
    ":format",
    ":let",
    ":def",
    ":push",
    ":pop",
    ":rules",
    ":disable",
    ":enable",
    ":save",
];

const HELP: &str = "\
Enter LaTeX to evaluate it with the current tier.
  :tier canonical|simplify|evaluate|n   choose what plain input runs
  :mode machine|arbitrary               numeric mode for n
  :precision DIGITS                     digits in arbitrary mode
  :format json|pretty|latex             output format
  :let NAME = LATEX                     assign the evaluated value
  :def F(X, Y) = LATEX                  define a function
  :push / :pop                          open or close a scope
  :rules                                list simplification rules
  :disable RULE / :enable RULE          switch a rule off or on
  :save FILE                            write the current settings
  :quit                                 leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Silent,
    Quit,
}

pub struct Repl {
    engine: Engine,
    config: CliConfig,
}

impl Repl {
    pub fn new(config: CliConfig) -> Self {
        Self {
            engine: Engine::new(config.engine.clone()),
            config,
        }
    }

    fn prompt(&self) -> String {
        let depth = self.engine.scopes().current().depth();
        let tier = format!("{:?}", self.config.tier).to_lowercase();
        if depth == 0 {
            format!("{tier}> ")
        } else {
            format!("{tier}[{depth}]> ")
        }
    }

    pub fn run(&mut self) -> rustyline::Result<()> {
        println!("Compute engine REPL. Type :help for commands.");

        let config = rustyline::Config::builder()
            .max_history_size(500)?
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut rl = rustyline::Editor::<CeHelper, rustyline::history::DefaultHistory>::with_config(config)?;
        rl.set_helper(Some(CeHelper::new()));

        let history_path = self.config.history_path();
        let _ = rl.load_history(&history_path);

        loop {
            match rl.readline(&self.prompt()) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line)?;
                    match self.handle_line(line) {
                        Ok(Reply::Text(text)) => println!("{text}"),
                        Ok(Reply::Silent) => {}
                        Ok(Reply::Quit) => break,
                        Err(err) => println!("Error: {err:#}"),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!("Error: {err:?}");
                    break;
                }
            }
        }

        let _ = rl.save_history(&history_path);
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Reply> {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return self.evaluate(line);
        };
        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map(|(n, a)| (n, a.trim()))
            .unwrap_or((command, ""));
        match name {
            "q" | "quit" | "exit" => Ok(Reply::Quit),
            "help" | "h" => Ok(Reply::Text(HELP.to_string())),
            "mode" => {
                let mode = parse_mode(arg)?;
                self.engine.set_numeric_mode(mode);
                Ok(Reply::Text(format!("numeric mode: {}", arg.to_lowercase())))
            }
            "precision" => {
                let digits: usize = arg
                    .parse()
                    .with_context(|| format!("'{arg}' is not a number of digits"))?;
                self.engine.set_precision(digits);
                Ok(Reply::Text(format!("precision: {}", self.engine.options().precision)))
            }
            "tier" => {
                self.config.tier = Tier::parse_name(arg)?;
                Ok(Reply::Silent)
            }
            "format" => {
                self.config.format = OutputFormat::from_str(arg, true).map_err(anyhow::Error::msg)?;
                Ok(Reply::Silent)
            }
            "let" => self.assign(arg),
            "def" => self.define(arg),
            "push" => Ok(Reply::Text(format!("scope {}", self.engine.push_scope()))),
            "pop" => {
                self.engine.pop_scope()?;
                Ok(Reply::Silent)
            }
            "rules" => Ok(Reply::Text(self.engine.simplifier().get_all_rule_names().join("\n"))),
            "disable" => {
                self.engine.simplifier_mut().disable_rule(arg);
                Ok(Reply::Silent)
            }
            "enable" => {
                self.engine.simplifier_mut().enable_rule(arg);
                Ok(Reply::Silent)
            }
            "save" => {
                if arg.is_empty() {
                    bail!("usage: :save FILE");
                }
                let mut config = self.config.clone();
                config.engine = self.engine.options().clone();
                config.save(Path::new(arg))?;
                Ok(Reply::Text(format!("saved {arg}")))
            }
            other => bail!("unknown command ':{other}' (try :help)"),
        }
    }

    fn evaluate(&mut self, latex: &str) -> Result<Reply> {
        let expr = self.engine.parse(latex);
        let result = self.config.tier.apply(&self.engine, &expr)?;
        let mut lines = vec![render(&self.engine, &result, self.config.format)?];
        lines.extend(self.engine.take_diagnostics().iter().map(diagnostic_line));
        Ok(Reply::Text(lines.join("\n")))
    }

    /// `NAME = LATEX`
    fn assign(&mut self, arg: &str) -> Result<Reply> {
        let Some((name, latex)) = arg.split_once('=') else {
            bail!("usage: :let NAME = LATEX");
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("usage: :let NAME = LATEX");
        }
        let value = self.engine.evaluate(&self.engine.parse(latex))?;
        self.engine.assign(name, value.clone())?;
        self.engine.take_diagnostics();
        let shown = render(&self.engine, &value, self.config.format)?;
        Ok(Reply::Text(format!("{name} := {shown}")))
    }

    /// `F(X, Y) = LATEX`
    fn define(&mut self, arg: &str) -> Result<Reply> {
        let usage = "usage: :def F(X, Y) = LATEX";
        let Some((signature, latex)) = arg.split_once('=') else {
            bail!(usage);
        };
        let Some((name, params)) = signature.trim().strip_suffix(')').and_then(|s| s.split_once('(')) else {
            bail!(usage);
        };
        let name = name.trim();
        let params: Vec<&str> = params
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if name.is_empty() {
            bail!(usage);
        }
        let body = self.engine.parse(latex);
        self.engine.define_function(name, &params, body)?;
        self.engine.take_diagnostics();
        Ok(Reply::Text(format!("{name}({}) defined", params.join(", "))))
    }
}
