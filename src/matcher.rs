use serde::{Deserialize, Serialize};

use crate::{
  rules::{RuleTable, Status},
  version,
};

/// Outcome of classifying a single version string
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
  pub status: Status,
  /// Empty when no rule matched
  pub recommendation: String,
}

impl Classification {
  fn unmatched(status: Status) -> Self {
    Self {
      status,
      recommendation: String::new(),
    }
  }
}

/// Classify an App Service runtime descriptor
///
/// The descriptor is upper-cased and each rule key is searched for as a substring,
/// in table order. The first hit wins; no hit means up-to-date (or unchecked).
pub fn classify_runtime(rules: &RuleTable, runtime: &str) -> Classification {
  let runtime = runtime.to_uppercase();

  rules
    .iter()
    .find(|rule| runtime.contains(rule.match_key.as_str()))
    .map(|rule| Classification {
      status: rule.status,
      recommendation: rule.recommendation.clone(),
    })
    .unwrap_or_else(|| Classification::unmatched(Status::UpToDate))
}

/// Kubernetes classification along with the `major.minor` prefix used for lookup
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesClassification {
  pub prefix: String,
  #[serde(flatten)]
  pub classification: Classification,
}

/// Classify an AKS Kubernetes version
///
/// The `major.minor` prefix is looked up as an exact key. Versions that cannot be
/// parsed get the `Unknown` prefix, which never matches and so reports Supported.
pub fn classify_kubernetes(rules: &RuleTable, version: &str) -> KubernetesClassification {
  let prefix = version::major_minor_or_unknown(version);

  let classification = rules
    .iter()
    .find(|rule| rule.match_key == prefix)
    .map(|rule| Classification {
      status: rule.status,
      recommendation: rule.recommendation.clone(),
    })
    .unwrap_or_else(|| Classification::unmatched(Status::Supported));

  KubernetesClassification { prefix, classification }
}
