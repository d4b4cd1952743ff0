use anyhow::Result;

use crate::azure::{Account, ManagedCluster, SiteConfig, WebApp, resources};

/// Trait abstracting all Azure operations used by azeol
///
/// Listing failures and per-item failures are reported separately so the
/// scanners can treat them differently.
pub trait AzureClients: Sync {
  fn get_account(&self) -> impl std::future::Future<Output = Result<Account>> + Send;
  fn list_web_apps(&self) -> impl std::future::Future<Output = Result<Vec<WebApp>>> + Send;
  fn get_web_app_config(&self, resource_group: &str, name: &str) -> impl std::future::Future<Output = Result<SiteConfig>> + Send;
  fn list_managed_clusters(&self) -> impl std::future::Future<Output = Result<Vec<ManagedCluster>>> + Send;
}

/// Real client implementation backed by the Azure CLI and its cached login
#[derive(Clone, Debug, Default)]
pub struct AzCliClients {
  subscription: Option<String>,
}

impl AzCliClients {
  /// Target `subscription` instead of the CLI's active one when provided
  pub fn new(subscription: Option<String>) -> Self {
    Self { subscription }
  }
}

impl AzureClients for AzCliClients {
  async fn get_account(&self) -> Result<Account> {
    resources::get_account(self.subscription.as_deref()).await
  }

  async fn list_web_apps(&self) -> Result<Vec<WebApp>> {
    resources::list_web_apps(self.subscription.as_deref()).await
  }

  async fn get_web_app_config(&self, resource_group: &str, name: &str) -> Result<SiteConfig> {
    resources::get_web_app_config(self.subscription.as_deref(), resource_group, name).await
  }

  async fn list_managed_clusters(&self) -> Result<Vec<ManagedCluster>> {
    resources::list_managed_clusters(self.subscription.as_deref()).await
  }
}
