use std::{collections::HashMap, time::Duration};

use anyhow::{Result, anyhow, bail};

use azeol::azure::{Account, ManagedCluster, SiteConfig, WebApp};
use azeol::clients::AzureClients;

/// Mock Azure client for testing. Defaults to an account with no resources.
/// Override specific fields to simulate different subscription states.
#[derive(Clone)]
pub struct MockAzureClients {
  pub account: Account,
  pub web_apps: Vec<WebApp>,
  /// Site configuration per web app name; a missing entry makes the read fail
  pub site_configs: HashMap<String, SiteConfig>,
  pub clusters: Vec<ManagedCluster>,
  pub fail_account: bool,
  pub fail_web_app_listing: bool,
  pub fail_cluster_listing: bool,
  /// Per web app name delay applied before the configuration read returns
  pub config_delays: HashMap<String, Duration>,
}

impl Default for MockAzureClients {
  fn default() -> Self {
    Self {
      account: Account {
        id: "00000000-0000-0000-0000-000000000001".into(),
        name: "test-subscription".into(),
        ..Default::default()
      },
      web_apps: vec![],
      site_configs: HashMap::new(),
      clusters: vec![],
      fail_account: false,
      fail_web_app_listing: false,
      fail_cluster_listing: false,
      config_delays: HashMap::new(),
    }
  }
}

impl AzureClients for MockAzureClients {
  async fn get_account(&self) -> Result<Account> {
    if self.fail_account {
      bail!("Failed to retrieve Subscription ID. Please ensure you ran 'az login'");
    }
    Ok(self.account.clone())
  }

  async fn list_web_apps(&self) -> Result<Vec<WebApp>> {
    if self.fail_web_app_listing {
      bail!("`az webapp list` failed: ERROR: (AuthorizationFailed) listing denied");
    }
    Ok(self.web_apps.clone())
  }

  async fn get_web_app_config(&self, _resource_group: &str, name: &str) -> Result<SiteConfig> {
    if let Some(delay) = self.config_delays.get(name) {
      tokio::time::sleep(*delay).await;
    }
    self.site_configs.get(name).cloned()
      .ok_or_else(|| anyhow!("`az webapp config show` failed: ERROR: (AuthorizationFailed) no access to {name}"))
  }

  async fn list_managed_clusters(&self) -> Result<Vec<ManagedCluster>> {
    if self.fail_cluster_listing {
      bail!("`az aks list` failed: ERROR: (SubscriptionNotRegistered) Microsoft.ContainerService");
    }
    Ok(self.clusters.clone())
  }
}

/// Mock that returns errors for all methods
pub struct MockAzureClientsError;

impl AzureClients for MockAzureClientsError {
  async fn get_account(&self) -> Result<Account> { bail!("mock Azure error") }
  async fn list_web_apps(&self) -> Result<Vec<WebApp>> { bail!("mock Azure error") }
  async fn get_web_app_config(&self, _resource_group: &str, _name: &str) -> Result<SiteConfig> { bail!("mock Azure error") }
  async fn list_managed_clusters(&self) -> Result<Vec<ManagedCluster>> { bail!("mock Azure error") }
}
