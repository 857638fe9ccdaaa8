//! Configuration management for yt2flac

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub temp: TempConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (PATH lookup if not set)
    pub yt_dlp: Option<PathBuf>,
    /// Path to ffmpeg binary (PATH lookup if not set)
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for finished FLAC files
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempConfig {
    /// Parent for the per-invocation download directory (system temp if not set)
    pub directory: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig { yt_dlp: None, ffmpeg: None },
            output: OutputConfig { directory: PathBuf::from("flac_output") },
            temp: TempConfig { directory: None },
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Merge order: defaults, then `$CONFIG_DIR/yt2flac/config.toml`, then an
    /// explicitly specified file, then `YT2FLAC_*` environment variables with
    /// `__` as the section separator (`YT2FLAC_PATHS__YT_DLP`), keeping keys
    /// that themselves contain `_` addressable.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(config_dir) = dirs::config_dir() {
            let default_config = config_dir.join("yt2flac/config.toml");
            if default_config.exists() {
                figment = figment.merge(Toml::file(&default_config));
            }
        }

        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("YT2FLAC_").split("__"));

        figment.extract().map_err(|e| ConfigError::LoadError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_flac_output() {
        let config = Config::default();
        assert_eq!(config.output.directory, PathBuf::from("flac_output"));
        assert!(config.paths.yt_dlp.is_none());
        assert!(config.paths.ffmpeg.is_none());
        assert!(config.temp.directory.is_none());
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(
            &file,
            "[paths]\nyt_dlp = \"/opt/yt-dlp\"\n\n[output]\ndirectory = \"/music/flac\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&file)).unwrap();
        assert_eq!(config.paths.yt_dlp, Some(PathBuf::from("/opt/yt-dlp")));
        assert_eq!(config.output.directory, PathBuf::from("/music/flac"));
        // Untouched sections keep their defaults
        assert!(config.paths.ffmpeg.is_none());
    }

    #[test]
    fn environment_overrides_reach_underscored_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("YT2FLAC_PATHS__YT_DLP", "/env/yt-dlp");
            jail.set_env("YT2FLAC_OUTPUT__DIRECTORY", "/env/flac");

            let config = Config::load(None).expect("config should load");
            assert_eq!(config.paths.yt_dlp, Some(PathBuf::from("/env/yt-dlp")));
            assert_eq!(config.output.directory, PathBuf::from("/env/flac"));
            Ok(())
        });
    }
}
