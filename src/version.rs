use anyhow::{Context, Result, bail};

/// Prefix reported when a Kubernetes version cannot be parsed
pub const UNKNOWN_PREFIX: &str = "Unknown";

/// Given a Kubernetes version, return its `major.minor` prefix
///
/// For example, the AKS format of 1.28.5 returns "1.28", and 1.29 returns "1.29".
/// Both components must be non-empty and purely numeric.
pub(crate) fn parse_major_minor(version: &str) -> Result<String> {
  let mut parts = version.split('.');
  let major = parts.next().unwrap_or_default();
  let minor = parts
    .next()
    .context(format!("Invalid version format '{version}', expected 'X.Y[.Z]'"))?;

  for part in [major, minor] {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
      bail!("Invalid version component '{part}' in '{version}'");
    }
  }

  Ok(format!("{major}.{minor}"))
}

/// Same as [`parse_major_minor`] but falls back to [`UNKNOWN_PREFIX`]
pub fn major_minor_or_unknown(version: &str) -> String {
  parse_major_minor(version).unwrap_or_else(|_| UNKNOWN_PREFIX.to_owned())
}
