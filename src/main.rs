use anstyle::{AnsiColor, Color, Style};
use anyhow::Result;
use azeol::{Cli, Commands};
use clap::{CommandFactory, FromArgMatches};
use tracing_log::AsTrace;
use tracing_subscriber::FmtSubscriber;

pub fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
    )
    .header(
      Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
    )
    .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
    .invalid(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
    .error(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
    .valid(
      Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Green))),
    )
    .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}

#[tokio::main]
async fn main() -> Result<()> {
  let matches = Cli::command().styles(get_styles()).get_matches();
  let cli = Cli::from_arg_matches(&matches)?;

  let subscriber = FmtSubscriber::builder()
    .with_max_level(cli.verbose.log_level_filter().as_trace())
    .with_writer(std::io::stderr)
    .without_time()
    .finish();
  tracing::subscriber::set_global_default(subscriber)?;

  match &cli.commands {
    Commands::Scan(args) => azeol::scan(args).await?,
    Commands::Rules(args) => azeol::rules(args)?,
  }

  Ok(())
}
