use crate::types::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "projdeck")]
#[command(about = "Discover local projects and render one unified dashboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to PROJDECK_PATH, then the XDG data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Config file override (defaults to <data-dir>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run discovery and regenerate the dashboard (the default)
    Generate,

    /// Print the unified catalog
    List,

    /// Refresh this machine's state document without rendering
    Sync,

    /// Generate, then serve the dashboard with an editor-launch relay
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a starter configuration
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}
