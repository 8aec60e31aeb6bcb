use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ce_engine::{BoxedExpr, Engine, EngineError, EngineOptions, NumericMode};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ce_config.toml";

/// Which evaluation tier a command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Canonical form only.
    Canonical,
    Simplify,
    #[default]
    Evaluate,
    /// Numeric approximation.
    N,
}

impl Tier {
    pub fn apply(self, engine: &Engine, expr: &BoxedExpr) -> Result<BoxedExpr, EngineError> {
        match self {
            Tier::Canonical => Ok(engine.canonical(expr)),
            Tier::Simplify => Ok(engine.simplify(expr)),
            Tier::Evaluate => engine.evaluate(expr),
            Tier::N => engine.n(expr),
        }
    }

    pub fn parse_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "canonical" => Ok(Tier::Canonical),
            "simplify" => Ok(Tier::Simplify),
            "evaluate" | "eval" => Ok(Tier::Evaluate),
            "n" | "numeric" => Ok(Tier::N),
            other => bail!("unknown tier '{other}' (expected canonical, simplify, evaluate or n)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Compact MathJSON.
    #[default]
    Json,
    /// Indented MathJSON.
    Pretty,
    Latex,
}

pub fn parse_mode(name: &str) -> Result<NumericMode> {
    match name.trim().to_ascii_lowercase().as_str() {
        "machine" => Ok(NumericMode::Machine),
        "arbitrary" | "bignum" => Ok(NumericMode::Arbitrary),
        other => bail!("unknown numeric mode '{other}' (expected machine or arbitrary)"),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CliConfig {
    pub tier: Tier,
    pub format: OutputFormat,
    /// REPL history file; `~/.ce_history` when unset.
    pub history_file: Option<PathBuf>,
    pub engine: EngineOptions,
}

impl CliConfig {
    /// Read `path`, or [`DEFAULT_CONFIG_FILE`] if present. A missing
    /// explicit path is an error; a missing default file is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("writing config file {}", path.display()))
    }

    pub fn history_path(&self) -> PathBuf {
        self.history_file.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|p| p.join(".ce_history"))
                .unwrap_or_else(|| PathBuf::from(".ce_history"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: CliConfig = toml::from_str(
            r#"
            tier = "n"

            [engine]
            numeric-mode = "arbitrary"
            precision = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.tier, Tier::N);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.engine.numeric_mode, NumericMode::Arbitrary);
        assert_eq!(config.engine.precision, 50);
        assert_eq!(config.engine.max_depth, EngineOptions::default().max_depth);
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let mut config = CliConfig::default();
        config.format = OutputFormat::Latex;
        config.engine.tolerance = 1e-6;
        let text = toml::to_string_pretty(&config).unwrap();
        let back: CliConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.format, OutputFormat::Latex);
        assert_eq!(back.engine, config.engine);
    }

    #[test]
    fn test_names() {
        assert_eq!(Tier::parse_name("N").unwrap(), Tier::N);
        assert_eq!(Tier::parse_name("eval").unwrap(), Tier::Evaluate);
        assert!(Tier::parse_name("fast").is_err());
        assert_eq!(parse_mode("Arbitrary").unwrap(), NumericMode::Arbitrary);
        assert!(parse_mode("quad").is_err());
    }
}
