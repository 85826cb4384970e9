use anyhow::{
    Result,
    anyhow,
};
use once_cell::sync::OnceCell;

use crate::config::Config;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Stores the config for the rest of the process. Only the first call sticks.
pub fn init_config(config: Config) -> Result<&'static Config> {
    CONFIG.set(config).map_err(|_| anyhow!("Config was already initialized"))?;
    config_ref()
}

pub fn config_ref() -> Result<&'static Config> { CONFIG.get().ok_or_else(|| anyhow!("Config is not initialized")) }
