//! Ledgerscope command-line explorer.

mod cli;
mod commands;
mod config;

use clap::Parser;
use eyre::WrapErr;
use ledgerscope_gateway::HttpGateway;
use ledgerscope_observability::init_logging;
use tracing::debug;

use crate::cli::Cli;
use crate::config::ExplorerConfig;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.logs)?;

    let mut config = ExplorerConfig::load(cli.config.as_deref())?;
    config.apply_args(&cli.api);

    let gateway = HttpGateway::new(config.gateway()).wrap_err("invalid ledger service settings")?;
    debug!(base_url = %gateway.base_url(), "using ledger service");
    commands::run(cli.command, &gateway, &config).await
}
