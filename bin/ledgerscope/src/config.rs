//! Figment-based configuration loading.
//!
//! Configuration priority (highest wins):
//! 1. CLI arguments (applied after Figment load)
//! 2. Config file (TOML)
//! 3. Environment variables (`LEDGERSCOPE_` prefix, `__` between sections,
//!    e.g. `LEDGERSCOPE_API__BASE_URL`)
//! 4. Defaults

use std::path::Path;
use std::time::Duration;

use eyre::{Result, WrapErr};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use ledgerscope_gateway::GatewayConfig;
use ledgerscope_primitives::SortDirection;
use ledgerscope_sync::{
    CursorConfig, DEFAULT_CURSOR_LIMIT, DEFAULT_PAGE_SIZE, DEFAULT_WINDOW_RADIUS, PageConfig,
};
use serde::{Deserialize, Serialize};

use crate::cli::ApiArgs;

/// Environment variable prefix.
pub(crate) const ENV_PREFIX: &str = "LEDGERSCOPE_";

/// Ledger service connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ApiConfig {
    /// Root of the service API.
    pub(crate) base_url: String,
    pub(crate) timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8100/api".to_owned(),
            timeout_secs: 10,
        }
    }
}

/// Browsing defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct BrowseConfig {
    pub(crate) page_size: u32,
    pub(crate) cursor_limit: u32,
    pub(crate) window_radius: u64,
    pub(crate) sort: SortDirection,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            cursor_limit: DEFAULT_CURSOR_LIMIT,
            window_radius: DEFAULT_WINDOW_RADIUS,
            sort: SortDirection::Descending,
        }
    }
}

/// Complete explorer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ExplorerConfig {
    pub(crate) api: ApiConfig,
    pub(crate) browse: BrowseConfig,
}

impl ExplorerConfig {
    /// Load configuration from defaults, environment, and config file.
    /// CLI overrides should be applied separately after loading.
    pub(crate) fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::figment(config_path)
            .extract()
            .wrap_err("Failed to load configuration")
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(path) = config_path {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment
    }

    pub(crate) fn apply_args(&mut self, args: &ApiArgs) {
        if let Some(url) = &args.url {
            self.api.base_url.clone_from(url);
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_secs = timeout;
        }
    }

    pub(crate) fn gateway(&self) -> GatewayConfig {
        GatewayConfig::new(self.api.base_url.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
    }

    pub(crate) fn cursor(&self, sort: Option<SortDirection>) -> CursorConfig {
        CursorConfig {
            limit: self.browse.cursor_limit,
            direction: sort.unwrap_or(self.browse.sort),
        }
    }

    pub(crate) fn page(&self, public_key: Option<String>) -> PageConfig {
        PageConfig {
            page_size: self.browse.page_size,
            direction: self.browse.sort,
            public_key,
        }
    }
}
