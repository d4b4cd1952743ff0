use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::{matcher::Classification, rules::Status};

/// Runtime reported for a web app without a Linux or .NET stack configured
pub const UNKNOWN_STACK: &str = "Unknown Stack / Not configured";

/// Version reported for a cluster whose listing carries no Kubernetes version
pub const UNKNOWN_VERSION: &str = "Unknown Version / Not reported";

/// Resource kinds covered by a scan, in report order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
  WebApp,
  AksCluster,
}

impl ResourceKind {
  /// Placeholder used in place of a version descriptor that is not available
  pub fn unknown_version(&self) -> &'static str {
    match self {
      ResourceKind::WebApp => UNKNOWN_STACK,
      ResourceKind::AksCluster => UNKNOWN_VERSION,
    }
  }
}

impl std::fmt::Display for ResourceKind {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match *self {
      ResourceKind::WebApp => write!(f, "App Service"),
      ResourceKind::AksCluster => write!(f, "AKS Cluster"),
    }
  }
}

/// A single row of the compliance report
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct ResourceRecord {
  #[tabled(rename = "Type")]
  pub kind: ResourceKind,
  #[tabled(rename = "Name")]
  pub name: String,
  #[tabled(rename = "Resource Group")]
  pub resource_group: String,
  /// Raw version descriptor: runtime stack for web apps, Kubernetes version for clusters
  #[tabled(rename = "Current Version")]
  pub version: String,
  #[tabled(rename = "Status")]
  pub status: Status,
  #[tabled(rename = "Recommendation")]
  pub recommendation: String,
}

impl ResourceRecord {
  pub fn classified(kind: ResourceKind, name: &str, resource_group: &str, version: &str, result: Classification) -> Self {
    Self {
      kind,
      name: name.to_owned(),
      resource_group: resource_group.to_owned(),
      version: version.to_owned(),
      status: result.status,
      recommendation: result.recommendation,
    }
  }

  /// Resource with no version descriptor; classification is skipped
  pub fn not_configured(kind: ResourceKind, name: &str, resource_group: &str) -> Self {
    Self {
      kind,
      name: name.to_owned(),
      resource_group: resource_group.to_owned(),
      version: kind.unknown_version().to_owned(),
      status: Status::NotConfigured,
      recommendation: "N/A".to_owned(),
    }
  }

  /// Record standing in for a resource whose per-item read failed
  pub fn read_failed(kind: ResourceKind, name: &str, resource_group: &str, failure: &str) -> Self {
    Self {
      kind,
      name: name.to_owned(),
      resource_group: resource_group.to_owned(),
      version: kind.unknown_version().to_owned(),
      status: Status::ConfigReadFailed,
      recommendation: format!("Check permissions or resource status: {failure}"),
    }
  }
}
