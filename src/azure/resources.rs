use std::{io::ErrorKind, process::Stdio};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use tokio::process::Command;
use tracing::debug;

#[cfg(windows)]
const AZ: &str = "az.cmd";
#[cfg(not(windows))]
const AZ: &str = "az";

/// The signed-in account and its active subscription, as reported by `az account show`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
  /// Subscription ID
  pub id: String,
  /// Subscription display name
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub tenant_id: String,
  #[serde(default)]
  pub user: Option<AccountUser>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUser {
  pub name: String,
  #[serde(default, rename = "type")]
  pub user_type: String,
}

impl std::fmt::Display for Account {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match (self.name.is_empty(), &self.user) {
      (false, Some(user)) => write!(f, "{} / {} ({})", self.id, self.name, user.name),
      (false, None) => write!(f, "{} / {}", self.id, self.name),
      (true, _) => write!(f, "{}", self.id),
    }
  }
}

/// Deserialize a null string as empty
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// App Service web app as listed by `az webapp list`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebApp {
  #[serde(default, deserialize_with = "null_as_empty")]
  pub name: String,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub resource_group: String,
}

/// The subset of a web app's site configuration that identifies its runtime
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
  #[serde(default)]
  pub linux_fx_version: Option<String>,
  #[serde(default)]
  pub net_framework_version: Option<String>,
}

impl SiteConfig {
  /// The runtime descriptor: Linux stack first, then .NET framework version
  ///
  /// Returns `None` when neither is set to a non-empty value
  pub fn runtime(&self) -> Option<&str> {
    [&self.linux_fx_version, &self.net_framework_version]
      .into_iter()
      .filter_map(|v| v.as_deref())
      .find(|v| !v.trim().is_empty())
  }
}

/// AKS managed cluster as listed by `az aks list`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedCluster {
  #[serde(default, deserialize_with = "null_as_empty")]
  pub name: String,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub resource_group: String,
  #[serde(default)]
  pub kubernetes_version: Option<String>,
  #[serde(default)]
  pub current_kubernetes_version: Option<String>,
}

impl ManagedCluster {
  /// The requested control plane version, falling back to the running version
  pub fn version(&self) -> Option<&str> {
    [&self.kubernetes_version, &self.current_kubernetes_version]
      .into_iter()
      .filter_map(|v| v.as_deref())
      .find(|v| !v.trim().is_empty())
  }
}

/// Run an Azure CLI command with JSON output and deserialize the result
async fn az<T: DeserializeOwned>(args: &[&str], subscription: Option<&str>) -> Result<T> {
  let mut command = Command::new(AZ);
  command
    .args(args)
    .args(["--output", "json", "--only-show-errors"])
    .stdin(Stdio::null())
    .kill_on_drop(true);

  if let Some(subscription) = subscription {
    command.args(["--subscription", subscription]);
  }

  let command_line = args.join(" ");
  debug!("Running: az {command_line}");

  let output = match command.output().await {
    Ok(output) => output,
    Err(err) if err.kind() == ErrorKind::NotFound => {
      bail!("Azure CLI not found. Please install Azure CLI and try again.")
    }
    Err(err) => return Err(err).with_context(|| format!("Failed to run `az {command_line}`")),
  };

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    bail!("`az {command_line}` failed: {}", stderr.trim());
  }

  serde_json::from_slice(&output.stdout).with_context(|| format!("Unable to parse output of `az {command_line}`"))
}

/// Describe the active account to determine the subscription being scanned
pub(crate) async fn get_account(subscription: Option<&str>) -> Result<Account> {
  let account: Account = az(&["account", "show"], subscription).await.context(
    "Failed to retrieve Subscription ID. Please ensure you ran 'az login' and set an active subscription",
  )?;

  if account.id.trim().is_empty() {
    bail!("No subscription ID found. Please ensure you ran 'az login' and set an active subscription");
  }

  Ok(account)
}

pub(crate) async fn list_web_apps(subscription: Option<&str>) -> Result<Vec<WebApp>> {
  az(&["webapp", "list"], subscription).await
}

pub(crate) async fn get_web_app_config(subscription: Option<&str>, resource_group: &str, name: &str) -> Result<SiteConfig> {
  az(
    &["webapp", "config", "show", "--resource-group", resource_group, "--name", name],
    subscription,
  )
  .await
}

pub(crate) async fn list_managed_clusters(subscription: Option<&str>) -> Result<Vec<ManagedCluster>> {
  az(&["aks", "list"], subscription).await
}
