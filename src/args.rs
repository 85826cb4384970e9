use std::path::PathBuf;

use clap::Parser;

use crate::{
    config::DebugConfig,
    flags::SetDebug,
};

/// pamdebug: Toggle debug output for the PAM engine and jmatrix storage
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Enable PAM/silhouette debugging (default: from config)
    #[arg(short, long)]
    pub engine: Option<bool>,

    /// Enable jmatrix debugging (default: from config)
    #[arg(short, long)]
    pub storage: Option<bool>,

    /// Config file (default: $PAMDEBUG_CONFIG or ./config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Apply the flags and exit without starting a session
    #[arg(short, long)]
    pub batch: bool,
}

impl Args {
    /// Startup flags: each one given on the command line overrides the config
    pub fn resolve(&self, config: &DebugConfig) -> SetDebug {
        SetDebug {
            engine:  self.engine.unwrap_or(config.engine),
            storage: self.storage.unwrap_or(config.storage),
        }
    }
}

pub fn parse_args() -> Args { Args::parse() }
