use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::rules::RuleEntry;

/// CSV report written when no other path is configured
pub const DEFAULT_OUTPUT: &str = "app_service_report.csv";

/// Top-level configuration loaded from `.azeol.yaml` or an explicit path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
  /// Maximum number of in-flight per-resource reads for each resource kind (default 8).
  #[serde(default = "default_concurrency")]
  pub concurrency: usize,

  /// Timeout applied to every Azure call, in seconds (default 60).
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,

  /// Path of the CSV report.
  #[serde(default = "default_output")]
  pub output: String,

  #[serde(default)]
  pub rules: RulesConfig,
}

fn default_concurrency() -> usize {
  8
}

fn default_timeout_secs() -> u64 {
  60
}

fn default_output() -> String {
  DEFAULT_OUTPUT.to_owned()
}

impl Default for Config {
  fn default() -> Self {
    Self {
      concurrency: default_concurrency(),
      timeout_secs: default_timeout_secs(),
      output: default_output(),
      rules: RulesConfig::default(),
    }
  }
}

impl Config {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }

  /// Concurrency is never allowed to drop to zero
  pub fn concurrency(&self) -> usize {
    self.concurrency.max(1)
  }
}

/// Additional rules, evaluated ahead of the built-in ones.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RulesConfig {
  #[serde(default)]
  pub runtime: Vec<RuleEntry>,

  #[serde(default)]
  pub kubernetes: Vec<RuleEntry>,
}

const DEFAULT_CONFIG_FILE: &str = ".azeol.yaml";

/// Load configuration from an explicit path, the default `.azeol.yaml` in the
/// current working directory, or fall back to `Config::default()`.
pub fn load(path: Option<&str>) -> Result<Config> {
  load_from(path, std::env::current_dir().ok().as_deref())
}

fn load_from(path: Option<&str>, base_dir: Option<&std::path::Path>) -> Result<Config> {
  if let Some(p) = path {
    let contents = std::fs::read_to_string(p).with_context(|| format!("Failed to read config file: {p}"))?;
    let config: Config =
      serde_yaml::from_str(&contents).with_context(|| format!("Failed to parse config file: {p}"))?;
    return Ok(config);
  }

  // Try default path in base directory
  if let Some(dir) = base_dir {
    let default_path = dir.join(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
      let contents = std::fs::read_to_string(&default_path)
        .with_context(|| format!("Failed to read config file: {}", default_path.display()))?;
      let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", default_path.display()))?;
      return Ok(config);
    }
  }

  Ok(Config::default())
}
