//! Logging for ledgerscope: CLI arguments and global subscriber setup.

mod args;
mod logging;

pub use args::LogArgs;
pub use logging::{build_filter, init_logging};
