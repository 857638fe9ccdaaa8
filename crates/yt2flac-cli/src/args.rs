use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "yt2flac")]
#[command(author, version, about = "Download YouTube audio and convert it to FLAC")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// YouTube URL (prompted on stdin when omitted)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Output directory for finished FLAC files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep the temporary download directory (for debugging)
    #[arg(long)]
    pub keep_temp: bool,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that yt-dlp and ffmpeg are installed
    Doctor,

    /// Show effective configuration
    Config,
}
