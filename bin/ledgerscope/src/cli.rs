//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ledgerscope_observability::LogArgs;
use ledgerscope_primitives::{BlockId, SortDirection};

/// Ledgerscope - browse a ledger service from the terminal
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Logging configuration (applies to all subcommands).
    #[command(flatten)]
    pub(crate) logs: LogArgs,

    /// Path to a TOML configuration file.
    #[arg(long, global = true, value_name = "FILE", env = "LEDGERSCOPE_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) api: ApiArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Ledger service overrides.
#[derive(Debug, Clone, Default, Args)]
#[command(next_help_heading = "Ledger service")]
pub(crate) struct ApiArgs {
    /// Root URL of the service API.
    #[arg(long = "api.url", global = true, value_name = "URL")]
    pub(crate) url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long = "api.timeout", global = true, value_name = "SECS")]
    pub(crate) timeout: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Scroll through blocks, newest first by default.
    Blocks(BlocksArgs),
    /// Show one numbered page of blocks or entries.
    Page(PageArgs),
    /// Show the blocks around an index.
    Window(WindowArgs),
    /// Show a single block by index or hash.
    Block {
        id: BlockId,
    },
    /// Show a single entry by id.
    Entry {
        id: String,
    },
    /// Show chain info and its integrity verdict.
    Info,
    /// List the ledger's nodes.
    Nodes,
}

#[derive(Debug, Args)]
pub(crate) struct BlocksArgs {
    /// Scan direction; defaults to `browse.sort`.
    #[arg(long, value_enum)]
    pub(crate) sort: Option<SortDirection>,

    /// Number of batches to fetch.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum KindArg {
    Blocks,
    Entries,
}

#[derive(Debug, Args)]
pub(crate) struct PageArgs {
    #[arg(long, value_enum, default_value_t = KindArg::Blocks)]
    pub(crate) kind: KindArg,

    /// 1-based page number.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) page: u32,

    /// Only entries sent or received by this key.
    #[arg(long = "public-key", value_name = "KEY")]
    pub(crate) public_key: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct WindowArgs {
    /// Index to center on.
    #[arg(long)]
    pub(crate) center: u64,

    /// Records on either side of the center; defaults to `browse.window_radius`.
    #[arg(long)]
    pub(crate) radius: Option<u64>,
}
