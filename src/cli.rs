//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

use crate::shell::DEFAULT_DISPLAY_LIMIT;

#[derive(Parser, Debug)]
#[command(name = "gmail-console")]
#[command(version)]
#[command(about = "Interactive Gmail mailbox console", long_about = None)]
pub struct Cli {
    /// Path to token cache file
    #[arg(long, default_value = "token.json")]
    pub token_cache: PathBuf,

    /// How many entries list-style commands display
    #[arg(long, default_value_t = DEFAULT_DISPLAY_LIMIT)]
    pub display_limit: usize,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
