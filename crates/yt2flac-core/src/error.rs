//! Error types for yt2flac-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error("download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("conversion failed: {0}")]
    Convert(#[from] ConvertError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("yt-dlp not found. Install with: pip install yt-dlp")]
    YtDlpNotFound,

    #[error("ffmpeg not found. Install it with your system package manager")]
    FfmpegNotFound,
}

impl DependencyError {
    /// Name of the missing tool, for reporting.
    pub fn tool(&self) -> &'static str {
        match self {
            DependencyError::YtDlpNotFound => "yt-dlp",
            DependencyError::FfmpegNotFound => "ffmpeg",
        }
    }
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("yt-dlp exited with code {code:?}: {stderr}")]
    YtDlpFailed { code: Option<i32>, stderr: String },

    #[error("failed to parse yt-dlp metadata: {0}")]
    MetadataParse(String),

    #[error("expected exactly one downloaded file, found {0}")]
    UnexpectedFileCount(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("ffmpeg exited with code {code:?}: {stderr}")]
    FfmpegFailed { code: Option<i32>, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
