use std::time::Duration;

use anyhow::{Result, bail};
use futures::{StreamExt, stream};
use tracing::{debug, error, info, warn};

use crate::{
  azure::{ManagedCluster, WebApp},
  clients::AzureClients,
  config::Config,
  matcher,
  record::{ResourceKind, ResourceRecord},
  rules::RuleTable,
};

/// Knobs shared by all scanners
#[derive(Clone, Copy, Debug)]
pub struct ScanOptions {
  /// Maximum number of per-resource reads in flight for a single scanner
  pub concurrency: usize,
  /// Applied to every call made against the data source
  pub timeout: Duration,
}

impl Default for ScanOptions {
  fn default() -> Self {
    ScanOptions::from(&Config::default())
  }
}

impl From<&Config> for ScanOptions {
  fn from(config: &Config) -> Self {
    Self {
      concurrency: config.concurrency(),
      timeout: config.timeout(),
    }
  }
}

/// Error returned when a data source call exceeds [`ScanOptions::timeout`]
#[derive(Debug)]
pub struct TimedOut(pub Duration);

impl std::fmt::Display for TimedOut {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "Operation timed out after {:?}", self.0)
  }
}

impl std::error::Error for TimedOut {}

pub(crate) async fn with_timeout<T>(timeout: Duration, future: impl Future<Output = Result<T>>) -> Result<T> {
  match tokio::time::timeout(timeout, future).await {
    Ok(result) => result,
    Err(_) => Err(TimedOut(timeout).into()),
  }
}

/// Short description of why a per-item read failed, used in the recommendation
///
/// Azure CLI errors embed the ARM error code in parentheses, e.g.
/// `(AuthorizationFailed) The client ...`; that code is preferred when present.
pub fn failure_class(err: &anyhow::Error) -> String {
  if err.downcast_ref::<TimedOut>().is_some() {
    return "Timeout".to_owned();
  }

  let message = format!("{err:#}");
  if let Some(start) = message.find('(') {
    let rest = &message[start + 1..];
    if let Some(end) = rest.find(')') {
      let code = &rest[..end];
      if !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return code.to_owned();
      }
    }
  }

  message.lines().next().unwrap_or("Unknown error").trim().to_owned()
}

fn require_identity(name: &str, resource_group: &str) -> Result<()> {
  if name.trim().is_empty() || resource_group.trim().is_empty() {
    bail!("MissingIdentity");
  }
  Ok(())
}

/// Read the runtime descriptor for a single web app
///
/// `Ok(None)` means the app has no runtime stack configured
async fn read_runtime<C: AzureClients>(client: &C, app: &WebApp, timeout: Duration) -> Result<Option<String>> {
  require_identity(&app.name, &app.resource_group)?;

  let config = with_timeout(timeout, client.get_web_app_config(&app.resource_group, &app.name)).await?;
  Ok(config.runtime().map(str::to_owned))
}

async fn web_app_record<C: AzureClients>(
  client: &C,
  rules: &RuleTable,
  app: &WebApp,
  timeout: Duration,
) -> ResourceRecord {
  match read_runtime(client, app, timeout).await {
    Ok(Some(runtime)) => {
      let result = matcher::classify_runtime(rules, &runtime);
      debug!("{}/{}: {runtime} => {}", app.resource_group, app.name, result.status);
      ResourceRecord::classified(ResourceKind::WebApp, &app.name, &app.resource_group, &runtime, result)
    }
    Ok(None) => ResourceRecord::not_configured(ResourceKind::WebApp, &app.name, &app.resource_group),
    Err(err) => {
      warn!("Unable to read configuration for {}/{}: {err:#}", app.resource_group, app.name);
      ResourceRecord::read_failed(ResourceKind::WebApp, &app.name, &app.resource_group, &failure_class(&err))
    }
  }
}

/// Scan all App Service web apps in the subscription
///
/// A failed listing is logged and yields no records. Configuration reads run with
/// bounded concurrency and are returned in listing order; a failed read turns
/// into an error record for that app only.
pub async fn scan_web_apps<C: AzureClients>(client: &C, rules: &RuleTable, options: &ScanOptions) -> Vec<ResourceRecord> {
  let apps = match with_timeout(options.timeout, client.list_web_apps()).await {
    Ok(apps) => apps,
    Err(err) => {
      error!("Failed during App Service listing. Details: {err:#}");
      return Vec::new();
    }
  };
  info!("Successfully fetched list of App Services. Scanning {} apps...", apps.len());

  stream::iter(&apps)
    .map(|app| web_app_record(client, rules, app, options.timeout))
    .buffered(options.concurrency.max(1))
    .collect()
    .await
}

fn cluster_record(rules: &RuleTable, cluster: &ManagedCluster) -> ResourceRecord {
  if let Err(err) = require_identity(&cluster.name, &cluster.resource_group) {
    warn!("Skipping classification of cluster with incomplete identity: {err:#}");
    return ResourceRecord::read_failed(
      ResourceKind::AksCluster,
      &cluster.name,
      &cluster.resource_group,
      &failure_class(&err),
    );
  }

  match cluster.version() {
    Some(version) => {
      let result = matcher::classify_kubernetes(rules, version);
      debug!(
        "{}/{}: {version} (prefix {}) => {}",
        cluster.resource_group, cluster.name, result.prefix, result.classification.status
      );
      ResourceRecord::classified(
        ResourceKind::AksCluster,
        &cluster.name,
        &cluster.resource_group,
        version,
        result.classification,
      )
    }
    None => ResourceRecord::not_configured(ResourceKind::AksCluster, &cluster.name, &cluster.resource_group),
  }
}

/// Scan all AKS managed clusters in the subscription
///
/// The Kubernetes version is part of the listing, so no per-cluster read is made.
pub async fn scan_clusters<C: AzureClients>(client: &C, rules: &RuleTable, options: &ScanOptions) -> Vec<ResourceRecord> {
  let clusters = match with_timeout(options.timeout, client.list_managed_clusters()).await {
    Ok(clusters) => clusters,
    Err(err) => {
      error!("Failed during AKS cluster listing. Details: {err:#}");
      return Vec::new();
    }
  };
  info!("Successfully fetched list of AKS clusters. Scanning {} clusters...", clusters.len());

  clusters.iter().map(|cluster| cluster_record(rules, cluster)).collect()
}
