//! FLAC conversion using ffmpeg

use crate::error::ConvertError;
use crate::naming::sanitize_filename;
use crate::process::ProcessRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Invokes ffmpeg to convert a downloaded audio file into a FLAC container
/// at maximum compression, writing into the persistent output directory.
pub struct Converter {
    ffmpeg_path: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

#[derive(Debug)]
pub struct ConversionResult {
    pub flac_path: PathBuf,
    pub bytes: u64,
}

impl Converter {
    pub fn new(ffmpeg_path: PathBuf, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { ffmpeg_path, runner }
    }

    /// Convert `input` to `<output_dir>/<sanitized title>.flac`.
    ///
    /// ffmpeg writes to a `.part` name which is renamed only on a zero exit,
    /// so a failed conversion never leaves a partial file under the final
    /// name.
    pub async fn convert(
        &self,
        input: &Path,
        output_dir: &Path,
        title: &str,
    ) -> Result<ConversionResult, ConvertError> {
        tokio::fs::create_dir_all(output_dir).await?;

        let filename = format!("{}.flac", sanitize_filename(title));
        let flac_path = output_dir.join(&filename);
        let part_path = output_dir.join(format!("{}.part", filename));

        info!("Converting to FLAC: {}", filename);

        let args = vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            input.to_string_lossy().into_owned(),
            "-c:a".to_string(),
            "flac".to_string(),
            // Maximum compression, still lossless
            "-compression_level".to_string(),
            "12".to_string(),
            // The .part suffix hides the container from extension inference
            "-f".to_string(),
            "flac".to_string(),
            "-y".to_string(),
            part_path.to_string_lossy().into_owned(),
        ];

        let output = self.runner.run(&self.ffmpeg_path, &args).await?;

        if !output.success() {
            let stderr = output.stderr_utf8().into_owned();
            debug!("ffmpeg stderr: {}", stderr);
            if let Err(e) = tokio::fs::remove_file(&part_path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("could not remove partial output {}: {}", part_path.display(), e);
                }
            }
            return Err(ConvertError::FfmpegFailed { code: output.code, stderr });
        }

        tokio::fs::rename(&part_path, &flac_path).await?;
        let bytes = tokio::fs::metadata(&flac_path).await?.len();

        debug!("Converted to: {} ({} bytes)", flac_path.display(), bytes);
        Ok(ConversionResult { flac_path, bytes })
    }
}
