//! Runtime settings.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `HOSTWATCH_*` environment variables. Command-line flags are applied on top
//! by the binary.
//!
//! ```toml
//! bind = "127.0.0.1:61208"
//! cadence_secs = 30
//! capacity = 2880
//! log_level = "info"
//! title = "x260"
//! page_refresh_secs = 10
//! ```

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::Level;

use crate::history::{DEFAULT_CADENCE, DEFAULT_CAPACITY};

/// Default listener address.
pub const DEFAULT_BIND: &str = "0.0.0.0:61208";

/// Prefix for environment overrides, e.g. `HOSTWATCH_BIND`.
pub const ENV_PREFIX: &str = "HOSTWATCH";

/// Settings for the hostwatch service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the HTTP listener binds to.
    pub bind: String,
    /// Seconds between history samples.
    pub cadence_secs: u64,
    /// Number of samples the history keeps.
    pub capacity: usize,
    /// One of trace, debug, info, warn, error.
    pub log_level: String,
    /// Status page heading. Falls back to the hostname when unset.
    pub title: Option<String>,
    /// Seconds between automatic reloads of the status page.
    pub page_refresh_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            cadence_secs: DEFAULT_CADENCE.as_secs(),
            capacity: DEFAULT_CAPACITY,
            log_level: "info".to_string(),
            title: None,
            page_refresh_secs: 10,
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let settings: Settings = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .with_context(|| match path {
                Some(path) => format!("failed to load settings from {}", path.display()),
                None => "failed to load settings".to_string(),
            })?;

        Ok(settings)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        if self.cadence_secs == 0 {
            bail!("cadence_secs must be greater than zero");
        }
        if self.capacity == 0 {
            bail!("capacity must be greater than zero");
        }
        if parse_level(&self.log_level).is_none() {
            bail!("unknown log_level {:?}", self.log_level);
        }
        Ok(())
    }

    /// The listener address, parsed.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("invalid bind address {:?}", self.bind))
    }

    pub fn cadence(&self) -> Duration {
        Duration::from_secs(self.cadence_secs)
    }

    /// Tracing level for `log_level`, defaulting to INFO.
    pub fn level(&self) -> Level {
        parse_level(&self.log_level).unwrap_or(Level::INFO)
    }
}

/// Parse a log level name, case-insensitively.
pub fn parse_level(name: &str) -> Option<Level> {
    match name.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}
