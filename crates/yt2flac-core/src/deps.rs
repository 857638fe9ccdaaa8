//! Dependency resolution for the external tools
//!
//! Pure path resolution: a configured path must exist, otherwise the tool is
//! looked up on PATH. Nothing is spawned here, so a failed check is
//! guaranteed to have run zero child processes.

use crate::config::PathsConfig;
use crate::error::DependencyError;
use std::path::PathBuf;
use tracing::debug;

/// Resolved locations of the two external tools.
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub yt_dlp: PathBuf,
    pub ffmpeg: PathBuf,
}

/// Resolve yt-dlp and ffmpeg, failing on the first missing tool.
pub fn resolve_tools(paths: &PathsConfig) -> Result<ToolPaths, DependencyError> {
    let yt_dlp = resolve(paths.yt_dlp.as_deref(), "yt-dlp")
        .ok_or(DependencyError::YtDlpNotFound)?;
    let ffmpeg = resolve(paths.ffmpeg.as_deref(), "ffmpeg")
        .ok_or(DependencyError::FfmpegNotFound)?;

    debug!("yt-dlp: {}", yt_dlp.display());
    debug!("ffmpeg: {}", ffmpeg.display());

    Ok(ToolPaths { yt_dlp, ffmpeg })
}

fn resolve(configured: Option<&std::path::Path>, name: &str) -> Option<PathBuf> {
    match configured {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(_) => None,
        None => which::which(name).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &std::path::Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn configured_paths_are_used_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathsConfig {
            yt_dlp: Some(touch(dir.path(), "yt-dlp")),
            ffmpeg: Some(touch(dir.path(), "ffmpeg")),
        };

        let tools = resolve_tools(&paths).unwrap();
        assert_eq!(tools.yt_dlp, dir.path().join("yt-dlp"));
        assert_eq!(tools.ffmpeg, dir.path().join("ffmpeg"));
    }

    #[test]
    fn missing_downloader_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathsConfig {
            yt_dlp: Some(dir.path().join("nonexistent")),
            ffmpeg: Some(touch(dir.path(), "ffmpeg")),
        };

        let err = resolve_tools(&paths).unwrap_err();
        assert!(matches!(err, DependencyError::YtDlpNotFound));
        assert_eq!(err.tool(), "yt-dlp");
    }

    #[test]
    fn missing_transcoder_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathsConfig {
            yt_dlp: Some(touch(dir.path(), "yt-dlp")),
            ffmpeg: Some(dir.path().join("nonexistent")),
        };

        let err = resolve_tools(&paths).unwrap_err();
        assert!(matches!(err, DependencyError::FfmpegNotFound));
        assert_eq!(err.tool(), "ffmpeg");
    }
}
