use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Machine-readable JSON
    Json,
    /// The fixed-format text digest
    Summary,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "summary" | "text" => Ok(OutputFormat::Summary),
            other => bail!("Unknown output format '{other}', expected json or summary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightConfig {
    pub output: OutputFormat, // INSIGHT_OUTPUT, default json
    pub pretty: bool,         // INSIGHT_PRETTY, default true
    pub json_logs: bool,      // RUST_LOG_FORMAT=json
}

impl InsightConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            output: lookup("INSIGHT_OUTPUT")
                .unwrap_or_else(|| "json".to_string())
                .parse()?,
            pretty: lookup("INSIGHT_PRETTY")
                .unwrap_or_else(|| "true".to_string())
                .trim()
                .parse()
                .context("INSIGHT_PRETTY must be true or false")?,
            json_logs: lookup("RUST_LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };
        Ok(config)
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, output: Option<OutputFormat>, compact: bool) -> Self {
        if let Some(output) = output {
            self.output = output;
        }
        if compact {
            self.pretty = false;
        }
        self
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            output: OutputFormat::Json,
            pretty: true,
            json_logs: false,
        }
    }
}
