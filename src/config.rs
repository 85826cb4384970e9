// config.rs
//
// responsible for handling config.toml

use std::{
    env,
    fs,
    io,
    path::{
        Path,
        PathBuf,
    },
};

use anyhow::{
    Context,
    Result,
};
use serde::Deserialize;
use tracing::{
    debug,
    instrument,
};

use crate::{
    flags::DebugState,
    sink::DebugSink,
};

pub const CONFIG_ENV: &str = "PAMDEBUG_CONFIG";
const DEFAULT_PATH: &str = "config.toml";

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub debug: DebugConfig,
    pub log:   LogConfig,
}

/// Initial debug flags
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DebugConfig {
    pub engine:  bool,
    pub storage: bool,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub dir:   String,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir:   "/tmp/pamdebug".to_string(),
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Finds the config path: explicit, then `PAMDEBUG_CONFIG`, then `config.toml`
    pub fn locate(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PATH))
    }

    /// Loads the config at `path`
    ///
    /// A missing file yields the defaults.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = match fs::read_to_string(path) {
            | Ok(s) => s,
            | Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            },
            | Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
        };

        Self::parse(&config_str).with_context(|| format!("Invalid config at {}", path.display()))
    }

    pub fn parse(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        Ok(config)
    }

    /// Sets the configured flags through the regular mutator
    pub fn apply<S: DebugSink>(&self, state: &DebugState, sink: S) {
        state.set_debug(sink, self.debug.engine, self.debug.storage)
    }
}
