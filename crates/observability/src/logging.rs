//! Global subscriber setup.

use eyre::Context;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::LogArgs;

/// Build the filter for `args`.
///
/// Precedence:
/// 1. `--quiet` shows errors only, whatever else is set
/// 2. Otherwise start from `env` directives (normally `RUST_LOG`) when given,
///    or from the level implied by `-v`
/// 3. Add every directive from `--log.filter`; unparsable ones are skipped
pub fn build_filter(args: &LogArgs, env: Option<&str>) -> EnvFilter {
    if args.quiet {
        return EnvFilter::new("error");
    }

    let mut filter = match env {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(args.level()),
    };

    if let Some(custom) = &args.filter {
        for directive in custom.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }
    }

    filter
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays clean.
pub fn init_logging(args: &LogArgs) -> eyre::Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(args, env.as_deref());

    let layer = fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_target(true);
    let layer = if args.json {
        layer.json().boxed()
    } else {
        layer.without_time().boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .wrap_err("failed to install the global log subscriber")?;

    Ok(())
}
