//! Pipeline orchestration: validate, check deps, download, convert, clean up
//!
//! One URL per pipeline run. The stages run strictly in order and every
//! failure is terminal for the invocation; once a download happened the
//! temporary audio file is removed exactly once, whether or not the
//! conversion succeeded. `keep_temp` opts out of cleanup entirely so the
//! downloaded file can be inspected afterwards.

use crate::config::PathsConfig;
use crate::converter::{ConversionResult, Converter};
use crate::deps::resolve_tools;
use crate::downloader::Downloader;
use crate::error::PipelineError;
use crate::process::ProcessRunner;
use crate::url::is_valid_youtube_url;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub url: String,
    pub output_dir: PathBuf,
    /// Parent for the per-invocation temp directory (system temp if `None`)
    pub temp_parent: Option<PathBuf>,
    pub keep_temp: bool,
    pub paths: PathsConfig,
}

/// Pipeline progress stages
#[derive(Debug, Clone)]
pub enum PipelineStage {
    Validating,
    CheckingDeps,
    Downloading,
    Downloaded { title: String, uploader: Option<String>, duration: Option<f64>, bytes: u64 },
    Converting { title: String },
    CleaningUp,
    Complete { output: PathBuf, bytes: u64, duration: Duration },
    Failed { stage: String, error: String },
}

/// Main processing pipeline
pub struct Pipeline {
    config: PipelineConfig,
    runner: Arc<dyn ProcessRunner>,
    progress_tx: mpsc::Sender<PipelineStage>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        runner: Arc<dyn ProcessRunner>,
        progress_tx: mpsc::Sender<PipelineStage>,
    ) -> Self {
        Self { config, runner, progress_tx }
    }

    pub async fn run(&self) -> Result<ConversionResult, PipelineError> {
        let start_time = Instant::now();

        // 1. Validate, before anything touches the filesystem or spawns
        let _ = self.progress_tx.send(PipelineStage::Validating).await;

        if !is_valid_youtube_url(&self.config.url) {
            let err = PipelineError::InvalidUrl(self.config.url.clone());
            self.fail("validate", &err);
            return Err(err);
        }

        // 2. Both tools must resolve before either invoker is reached
        let _ = self.progress_tx.send(PipelineStage::CheckingDeps).await;

        let tools = match resolve_tools(&self.config.paths) {
            Ok(tools) => tools,
            Err(e) => {
                let err = PipelineError::from(e);
                self.fail("dependencies", &err);
                return Err(err);
            }
        };

        info!("Starting pipeline for: {}", self.config.url);

        // Fresh temp directory, owned exclusively for this invocation
        let temp_dir = match &self.config.temp_parent {
            Some(parent) => {
                tokio::fs::create_dir_all(parent).await?;
                tempfile::Builder::new().prefix("yt2flac-").tempdir_in(parent)?
            }
            None => tempfile::Builder::new().prefix("yt2flac-").tempdir()?,
        };
        let temp_path = temp_dir.path().to_path_buf();
        debug!("Temp directory: {}", temp_path.display());

        // 3. Download
        let _ = self.progress_tx.send(PipelineStage::Downloading).await;

        let downloader = Downloader::new(tools.yt_dlp, temp_path.clone(), self.runner.clone());
        let download = match downloader.download(&self.config.url).await {
            Ok(result) => result,
            Err(e) => {
                // Nothing durable was produced; dropping the temp dir takes
                // any partial files with it.
                let err = PipelineError::from(e);
                self.fail("download", &err);
                return Err(err);
            }
        };

        let _ = self
            .progress_tx
            .send(PipelineStage::Downloaded {
                title: download.metadata.title.clone(),
                uploader: download.metadata.uploader.clone(),
                duration: download.metadata.duration,
                bytes: download.bytes,
            })
            .await;

        // 4. Convert
        let _ = self
            .progress_tx
            .send(PipelineStage::Converting { title: download.metadata.title.clone() })
            .await;

        let converter = Converter::new(tools.ffmpeg, self.runner.clone());
        let conversion = converter
            .convert(&download.audio_path, &self.config.output_dir, &download.metadata.title)
            .await;

        // 5. Cleanup runs regardless of the conversion outcome
        let _ = self.progress_tx.send(PipelineStage::CleaningUp).await;

        if self.config.keep_temp {
            info!("Skipping cleanup, temp files kept at: {}", temp_path.display());
            std::mem::forget(temp_dir);
        } else {
            if let Err(e) = tokio::fs::remove_file(&download.audio_path).await {
                warn!(
                    "could not remove temporary audio file {}: {}",
                    download.audio_path.display(),
                    e
                );
            }
            drop(temp_dir);
        }

        // 6. Report
        match conversion {
            Ok(result) => {
                let duration = start_time.elapsed();
                info!(
                    "Pipeline complete: {} ({:.1}s)",
                    result.flac_path.display(),
                    duration.as_secs_f32()
                );
                let _ = self
                    .progress_tx
                    .send(PipelineStage::Complete {
                        output: result.flac_path.clone(),
                        bytes: result.bytes,
                        duration,
                    })
                    .await;
                Ok(result)
            }
            Err(e) => {
                let err = PipelineError::from(e);
                self.fail("convert", &err);
                Err(err)
            }
        }
    }

    fn fail(&self, stage: &str, error: &PipelineError) {
        let _ = self.progress_tx.try_send(PipelineStage::Failed {
            stage: stage.to_string(),
            error: error.to_string(),
        });
    }
}
