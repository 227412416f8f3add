//! Subcommand implementations. Each drives one store to completion and
//! prints its snapshot.

mod browse;
mod detail;
mod summary;

use eyre::{Result, bail};
use ledgerscope_gateway::HttpGateway;
use ledgerscope_primitives::{Block, Entry};
use ledgerscope_sync::ErrorDescriptor;

use crate::cli::Commands;
use crate::config::ExplorerConfig;

pub(crate) async fn run(
    command: Commands,
    gateway: &HttpGateway,
    config: &ExplorerConfig,
) -> Result<()> {
    match command {
        Commands::Blocks(args) => browse::blocks(gateway, config, args).await,
        Commands::Page(args) => browse::page(gateway, config, args).await,
        Commands::Window(args) => browse::window(gateway, config, args).await,
        Commands::Block { id } => detail::block(gateway, id).await,
        Commands::Entry { id } => detail::entry(gateway, id).await,
        Commands::Info => summary::info(gateway).await,
        Commands::Nodes => summary::nodes(gateway).await,
    }
}

/// Turn a settled store error into a report, keeping "not found" apart from
/// other failures.
fn check(error: Option<&ErrorDescriptor>, what: &str) -> Result<()> {
    match error {
        None => Ok(()),
        Some(err) if err.is_not_found() => bail!("no such {what}"),
        Some(err) => bail!("could not load {what}: {err}"),
    }
}

/// One-line table row.
trait Row {
    fn row(&self) -> String;
}

impl Row for Block {
    fn row(&self) -> String {
        format!("{:>8}  {}  {}", self.index, self.hash, self.timestamp)
    }
}

impl Row for Entry {
    fn row(&self) -> String {
        format!(
            "{:>8}  {}  {} -> {}  {}",
            self.index, self.entry_id, self.from, self.to, self.amount
        )
    }
}
