// Entrypoint for the `arrow` command.
// - Keeps `main` small: parse flags, set up logging, build the API client
//   and run the selected subcommand.
// - Any failure is reported on stderr through `ui::print_error` and the
//   process exits with status 1.

use anyhow::Context;
use apollo_arrow::{cli::Cli, ui, ApiClient};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries results.
    let filter = tracing_subscriber::EnvFilter::try_new(cli.effective_log_level())
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::print_error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let session = cli.session().context("failed to configure apollo session")?;
    let api = ApiClient::new(session)?;
    tracing::debug!(url = api.session().base_url(), "using apollo instance");

    let output = cli.command.execute(&api)?;
    ui::print_output(&output)?;
    Ok(())
}
