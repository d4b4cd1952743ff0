use serde::{Deserialize, Serialize};

use crate::{
  clients::AzureClients,
  record::ResourceRecord,
  rules::RuleTables,
  scanner::{self, ScanOptions},
};

/// Container of all records collected, one section per resource kind
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Report {
  pub web_apps: Vec<ResourceRecord>,
  pub clusters: Vec<ResourceRecord>,
}

impl Report {
  /// Returns true if no scanner produced a record
  pub fn is_empty(&self) -> bool {
    self.web_apps.is_empty() && self.clusters.is_empty()
  }

  pub fn len(&self) -> usize {
    self.web_apps.len() + self.clusters.len()
  }

  /// Number of records whose per-item read failed
  pub fn error_count(&self) -> usize {
    self.records().filter(|r| r.status.is_error()).count()
  }

  /// All records in report order: App Service first, then AKS
  pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
    self.web_apps.iter().chain(self.clusters.iter())
  }

  pub fn into_records(self) -> Vec<ResourceRecord> {
    let mut records = self.web_apps;
    records.extend(self.clusters);
    records
  }
}

/// Run every scanner against the data source and collect their records
///
/// Scanners run concurrently but their output is kept in fixed kind order. A
/// scanner whose listing fails simply contributes no records.
pub async fn aggregate<C: AzureClients>(client: &C, rules: &RuleTables, options: &ScanOptions) -> Report {
  let (web_apps, clusters) = tokio::join!(
    scanner::scan_web_apps(client, &rules.runtime, options),
    scanner::scan_clusters(client, &rules.kubernetes, options),
  );

  Report { web_apps, clusters }
}
