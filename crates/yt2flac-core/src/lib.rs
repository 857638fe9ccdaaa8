//! yt2flac-core: download-convert-cleanup pipeline for YouTube audio

pub mod config;
pub mod converter;
pub mod deps;
pub mod downloader;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod process;
pub mod url;

pub use config::Config;
pub use error::{PipelineError, Result};
