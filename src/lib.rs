pub mod azure;
pub mod clients;
pub mod config;
pub mod matcher;
pub mod output;
pub mod record;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod version;

use std::{io::IsTerminal, path::Path, time::Duration};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use tabled::{Table, settings::Style};
use tracing::{info, warn};

use crate::{
  azure::Account,
  clients::{AzCliClients, AzureClients},
  config::Config,
  record::ResourceRecord,
  rules::RuleTables,
  scanner::ScanOptions,
};

#[derive(Parser, Debug)]
#[command(author, about, version)]
#[command(propagate_version = true)]
pub struct Cli {
  #[command(subcommand)]
  pub commands: Commands,

  #[clap(flatten)]
  pub verbose: Verbosity<WarnLevel>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  Scan(Scan),
  Rules(Rules),
}

/// Scan App Service web apps and AKS clusters for end-of-life runtimes
#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct Scan {
  /// Subscription to scan instead of the Azure CLI's active subscription
  #[arg(short, long)]
  pub subscription: Option<String>,

  /// Path to a configuration file (defaults to .azeol.yaml when present)
  #[arg(short, long)]
  pub config: Option<String>,

  /// Path of the CSV report
  #[arg(short, long)]
  pub output: Option<String>,

  #[arg(short, long, value_enum, default_value_t)]
  pub format: output::Format,

  /// Maximum number of concurrent configuration reads per resource kind
  #[arg(long)]
  pub concurrency: Option<usize>,

  /// Timeout in seconds for each Azure call
  #[arg(long)]
  pub timeout: Option<u64>,

  /// Do not write the CSV report
  #[arg(long)]
  pub no_csv: bool,
}

/// Show the rule tables in the order they are evaluated
#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct Rules {
  /// Path to a configuration file (defaults to .azeol.yaml when present)
  #[arg(short, long)]
  pub config: Option<String>,
}

/// Load the configuration file and apply command line overrides
fn resolve_config(args: &Scan) -> Result<Config> {
  let mut config = config::load(args.config.as_deref())?;

  if let Some(concurrency) = args.concurrency {
    config.concurrency = concurrency;
  }
  if let Some(timeout) = args.timeout {
    config.timeout_secs = timeout;
  }
  if let Some(output) = &args.output {
    config.output = output.to_owned();
  }

  Ok(config)
}

/// Scan the subscription, print the report and save it as CSV
pub async fn scan(args: &Scan) -> Result<()> {
  let config = resolve_config(args)?;
  let rules = RuleTables::from_config(&config.rules);
  let options = ScanOptions::from(&config);
  let client = AzCliClients::new(args.subscription.to_owned());

  let (account, records) = run(&client, &rules, &options).await?;

  println!("{}", output::to_stdout(&records, &account, &args.format)?);

  if args.no_csv {
    return Ok(());
  }
  // Write failures are logged by `persist` and never fail the scan
  output::persist(&records, Path::new(&config.output));

  Ok(())
}

/// Resolve the account then collect every record for it
///
/// Only a failure to determine the account is returned as an error; every other
/// failure is captured in the records.
pub async fn run<C: AzureClients>(
  client: &C,
  rules: &RuleTables,
  options: &ScanOptions,
) -> Result<(Account, Vec<ResourceRecord>)> {
  let account = scanner::with_timeout(options.timeout, client.get_account()).await?;
  info!("Scanning subscription: {account}");

  let progress = if std::io::stderr().is_terminal() {
    ProgressBar::new_spinner()
  } else {
    ProgressBar::hidden()
  };
  progress.set_message("Scanning App Services and AKS clusters...");
  progress.enable_steady_tick(Duration::from_millis(120));

  let report = report::aggregate(client, rules, options).await;
  progress.finish_and_clear();

  if report.is_empty() {
    warn!("Scan completed without results for subscription {}", account.id);
  } else {
    info!(
      "Scan complete: {} resources, {} with read errors",
      report.len(),
      report.error_count()
    );
  }

  Ok((account, report.into_records()))
}

/// Print the effective rule tables
pub fn rules(args: &Rules) -> Result<()> {
  let config = config::load(args.config.as_deref())?;
  let rules = RuleTables::from_config(&config.rules);

  for (title, table) in [
    ("App Service runtime rules (substring match, first match wins)", &rules.runtime),
    ("AKS Kubernetes rules (exact major.minor match)", &rules.kubernetes),
  ] {
    let mut output = Table::new(table.entries());
    output.with(Style::psql());
    println!("{title}\n{output}\n");
  }

  Ok(())
}
