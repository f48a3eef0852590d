//! CLI definitions.

use clap::Parser;
use std::path::PathBuf;

/// Laurel - peer testimonial bot for Discord
#[derive(Parser, Debug)]
#[command(name = "laurel")]
#[command(about = "Peer testimonial bot with a button-driven review flow", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the settings and backup store files
    /// (overrides LAUREL_DATA_DIR)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
