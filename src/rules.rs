use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Compliance status assigned to a resource
///
/// The first eight variants are the statuses a rule can carry. The last two are
/// sentinels the scanners assign without consulting any rule table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
  UpToDate,
  Supported,
  NearEol,
  EolSoon,
  Eol,
  Outdated,
  VeryOutdated,
  Unsupported,
  /// No runtime descriptor is configured, so nothing was classified
  NotConfigured,
  /// The per-resource read failed; the record carries a diagnostic instead
  ConfigReadFailed,
}

impl Status {
  pub fn is_error(&self) -> bool {
    matches!(self, Status::ConfigReadFailed)
  }
}

impl std::fmt::Display for Status {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match *self {
      Status::UpToDate => write!(f, "Up-to-Date / Unchecked"),
      Status::Supported => write!(f, "Supported"),
      Status::NearEol => write!(f, "Near EOL"),
      Status::EolSoon => write!(f, "EOL Soon"),
      Status::Eol => write!(f, "EOL (End of Life)"),
      Status::Outdated => write!(f, "Outdated"),
      Status::VeryOutdated => write!(f, "Very Outdated"),
      Status::Unsupported => write!(f, "EOL/Unsupported"),
      Status::NotConfigured => write!(f, "N/A"),
      Status::ConfigReadFailed => write!(f, "ERROR: Config Read Failed"),
    }
  }
}

/// A known-obsolete version signature and what to report when it is found
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Tabled)]
#[tabled(rename_all = "UpperCase")]
pub struct RuleEntry {
  #[serde(rename = "match")]
  #[tabled(rename = "MATCH")]
  pub match_key: String,
  pub status: Status,
  pub recommendation: String,
}

impl RuleEntry {
  pub fn new(match_key: &str, status: Status, recommendation: &str) -> Self {
    Self {
      match_key: match_key.to_owned(),
      status,
      recommendation: recommendation.to_owned(),
    }
  }
}

/// Ordered list of rules; declaration order is match priority
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable(Vec<RuleEntry>);

impl RuleTable {
  pub fn new(entries: Vec<RuleEntry>) -> Self {
    Self(entries)
  }

  /// Returns a new table with `entries` placed ahead of the existing ones
  pub fn with_priority(&self, entries: &[RuleEntry]) -> Self {
    let mut merged = entries.to_vec();
    merged.extend(self.0.iter().cloned());
    Self(merged)
  }

  pub fn entries(&self) -> &[RuleEntry] {
    &self.0
  }

  pub fn iter(&self) -> std::slice::Iter<'_, RuleEntry> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// Built-in App Service runtime rules
///
/// Keys are matched as substrings of the upper-cased runtime descriptor, so
/// more specific keys must come before broader ones.
pub fn default_runtime_rules() -> RuleTable {
  RuleTable::new(vec![
    RuleEntry::new("NODE|14", Status::EolSoon, "Upgrade to Node 20 LTS (or 18 LTS)"),
    RuleEntry::new("NODE|16", Status::Outdated, "Upgrade to Node 20 LTS"),
    RuleEntry::new("DOTNETCORE|3.1", Status::Eol, "Upgrade to .NET 6 or 8 LTS"),
    RuleEntry::new("PYTHON|3.8", Status::EolSoon, "Upgrade to Python 3.11 or 3.12"),
    RuleEntry::new("PHP|7.4", Status::Eol, "Upgrade to PHP 8.2 or higher"),
    RuleEntry::new("JAVA|8", Status::VeryOutdated, "Upgrade to Java 17 LTS"),
    RuleEntry::new("ASP", Status::Unsupported, "Migrate to modern .NET"),
  ])
}

/// Built-in AKS rules, keyed by the exact `major.minor` version
pub fn default_kubernetes_rules() -> RuleTable {
  RuleTable::new(vec![
    RuleEntry::new("1.23", Status::Eol, "Upgrade to a supported AKS version (1.29 or later)"),
    RuleEntry::new("1.24", Status::Eol, "Upgrade to a supported AKS version (1.29 or later)"),
    RuleEntry::new("1.25", Status::Eol, "Upgrade to a supported AKS version (1.29 or later)"),
    RuleEntry::new("1.26", Status::Eol, "Upgrade to a supported AKS version (1.29 or later)"),
    RuleEntry::new("1.27", Status::EolSoon, "Only available with AKS LTS; upgrade to 1.29 or later"),
  ])
}

/// The two rule tables used by a scan, built once at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleTables {
  pub runtime: RuleTable,
  pub kubernetes: RuleTable,
}

impl RuleTables {
  /// Built-in tables with user supplied rules taking precedence
  ///
  /// User runtime keys are upper-cased so they compare like the built-in ones.
  pub fn from_config(config: &crate::config::RulesConfig) -> Self {
    let runtime: Vec<RuleEntry> = config
      .runtime
      .iter()
      .map(|rule| RuleEntry {
        match_key: rule.match_key.to_uppercase(),
        ..rule.clone()
      })
      .collect();

    Self {
      runtime: default_runtime_rules().with_priority(&runtime),
      kubernetes: default_kubernetes_rules().with_priority(&config.kubernetes),
    }
  }
}

impl Default for RuleTables {
  fn default() -> Self {
    Self {
      runtime: default_runtime_rules(),
      kubernetes: default_kubernetes_rules(),
    }
  }
}
