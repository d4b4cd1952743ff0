use std::{fs::File, io::prelude::*, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::{Table, settings::Style};
use tracing::{info, warn};

use crate::{azure::Account, record::ResourceRecord};

/// CSV header row
pub const CSV_HEADER: &str = "Name,Resource Group,Current Runtime,Status,Recommendation";

const TITLE: &str = "Azure Runtime Status Report - EOL Check";

#[derive(Clone, Copy, Debug, Default, ValueEnum, Serialize, Deserialize)]
pub enum Format {
  /// JSON format used for logging or piping into other tools
  Json,
  /// Text format used for writing to stdout
  #[default]
  Text,
}

/// Console view of the records
///
/// An empty set of records produces an alert naming the scanned subscription
/// instead of an empty table.
pub fn render(records: &[ResourceRecord], account: &Account) -> String {
  if records.is_empty() {
    return alert(account);
  }

  let mut table = Table::new(records);
  table.with(Style::psql());

  format!("{TITLE}\n{table}\n")
}

fn alert(account: &Account) -> String {
  let border = "#".repeat(80);
  format!(
    "{border}\n\
     ALERT: Scan completed without results. (No App Service or AKS resources found)\n\
     The active subscription ({account}) does not contain any App Service or AKS resources.\n\
     {border}\n"
  )
}

/// Render records as CSV (RFC 4180), header first
pub fn to_csv(records: &[ResourceRecord]) -> String {
  let mut out = String::new();

  out.push_str(CSV_HEADER);
  out.push('\n');

  for record in records {
    let status = record.status.to_string();
    let fields = [
      record.name.as_str(),
      record.resource_group.as_str(),
      record.version.as_str(),
      status.as_str(),
      record.recommendation.as_str(),
    ];
    let row: Vec<String> = fields.iter().map(|f| escape_csv_field(f)).collect();
    out.push_str(&row.join(","));
    out.push('\n');
  }

  out
}

/// Escapes a field for CSV according to RFC 4180.
///
/// Fields containing commas, double quotes, or newlines are quoted.
/// Double quotes within the field are escaped by doubling them.
fn escape_csv_field(s: &str) -> String {
  let needs_quoting = s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r');

  if needs_quoting {
    format!("\"{}\"", s.replace('"', "\"\""))
  } else {
    s.to_owned()
  }
}

/// Result of attempting to save the CSV report
#[derive(Debug, PartialEq, Eq)]
pub enum Persisted {
  Written { rows: usize },
  /// There were no records, so no file was written
  Skipped,
  /// The file could not be written; the scan itself is unaffected
  Failed(String),
}

/// Save the records as CSV at `path`
///
/// Write errors are logged and returned as [`Persisted::Failed`], never propagated.
pub fn persist(records: &[ResourceRecord], path: &Path) -> Persisted {
  if records.is_empty() {
    warn!("No resources found; nothing was saved to {}", path.display());
    return Persisted::Skipped;
  }

  match write_file(path, &to_csv(records)) {
    Ok(()) => {
      info!("Report saved to {} ({} rows)", path.display(), records.len());
      Persisted::Written { rows: records.len() }
    }
    Err(err) => {
      warn!("Unable to save report: {err:#}");
      Persisted::Failed(format!("{err:#}"))
    }
  }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
  let mut file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
  file
    .write_all(contents.as_bytes())
    .with_context(|| format!("Failed to write {}", path.display()))?;

  Ok(())
}

/// Format the records for stdout
pub fn to_stdout(records: &[ResourceRecord], account: &Account, format: &Format) -> Result<String> {
  let output = match format {
    Format::Json => serde_json::to_string_pretty(records)?,
    Format::Text => render(records, account),
  };

  Ok(output)
}
