use std::collections::HashMap;

use azeol::azure::{ManagedCluster, SiteConfig, WebApp};

use super::mock_azure::MockAzureClients;

/// Creates a web app in the given resource group
pub fn make_web_app(name: &str, resource_group: &str) -> WebApp {
  WebApp {
    name: name.into(),
    resource_group: resource_group.into(),
  }
}

/// Site configuration for a Linux app running the given stack
pub fn linux_config(linux_fx_version: &str) -> SiteConfig {
  SiteConfig {
    linux_fx_version: Some(linux_fx_version.into()),
    net_framework_version: Some("v4.0".into()),
  }
}

/// Site configuration for a Windows app running the given .NET framework
pub fn windows_config(net_framework_version: &str) -> SiteConfig {
  SiteConfig {
    linux_fx_version: Some(String::new()),
    net_framework_version: Some(net_framework_version.into()),
  }
}

/// Creates an AKS cluster at the given Kubernetes version
pub fn make_cluster(name: &str, resource_group: &str, version: &str) -> ManagedCluster {
  ManagedCluster {
    name: name.into(),
    resource_group: resource_group.into(),
    kubernetes_version: Some(version.into()),
    current_kubernetes_version: Some(version.into()),
  }
}

/// Three web apps (Node 14, Python 3.12, .NET Core 3.1) and two clusters (1.24, 1.28)
pub fn mixed_subscription() -> MockAzureClients {
  MockAzureClients {
    web_apps: vec![
      make_web_app("web-node", "rg-web"),
      make_web_app("web-python", "rg-web"),
      make_web_app("web-dotnet", "rg-legacy"),
    ],
    site_configs: HashMap::from([
      ("web-node".to_string(), linux_config("NODE|14-lts")),
      ("web-python".to_string(), linux_config("PYTHON|3.12")),
      ("web-dotnet".to_string(), linux_config("DOTNETCORE|3.1")),
    ]),
    clusters: vec![
      make_cluster("aks-old", "rg-aks", "1.24.10"),
      make_cluster("aks-new", "rg-aks", "1.28.5"),
    ],
    ..Default::default()
  }
}
