use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "musicova", version)]
#[command(about = "A terminal music player that gives every track its own card")]
pub struct Args {
    /// Audio files or folders to import at startup
    pub paths: Vec<PathBuf>,

    /// Read settings from FILE instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write log files into DIR
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}
