//! YouTube audio downloader using yt-dlp

use crate::error::DownloadError;
use crate::process::ProcessRunner;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Invokes yt-dlp for the best available audio-only stream, writing into a
/// temporary directory owned exclusively by the current invocation.
pub struct Downloader {
    yt_dlp_path: PathBuf,
    temp_dir: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

#[derive(Debug)]
pub struct DownloadResult {
    pub audio_path: PathBuf,
    pub bytes: u64,
    pub metadata: TrackMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackMetadata {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub ext: String,
}

impl Downloader {
    pub fn new(yt_dlp_path: PathBuf, temp_dir: PathBuf, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { yt_dlp_path, temp_dir, runner }
    }

    /// Download the audio stream for one URL.
    ///
    /// The temp directory must be empty on entry; after yt-dlp exits it is
    /// expected to hold exactly one file, anything else is an inconsistent
    /// download result.
    pub async fn download(&self, url: &str) -> Result<DownloadResult, DownloadError> {
        info!("Downloading audio from: {}", url);

        let output_template = self.temp_dir.join("%(id)s.%(ext)s");

        let args = vec![
            // Best available audio-only stream
            "-f".to_string(),
            "bestaudio/best".to_string(),
            "--no-playlist".to_string(),
            "--no-overwrites".to_string(),
            // Metadata on stdout
            "--print-json".to_string(),
            "-o".to_string(),
            output_template.to_string_lossy().into_owned(),
            url.to_string(),
        ];

        let output = self.runner.run(&self.yt_dlp_path, &args).await?;

        if !output.success() {
            let stderr = output.stderr_utf8().into_owned();
            debug!("yt-dlp stderr: {}", stderr);
            return Err(DownloadError::YtDlpFailed { code: output.code, stderr });
        }

        let metadata: TrackMetadata = serde_json::from_str(&output.stdout_utf8())
            .map_err(|e| DownloadError::MetadataParse(e.to_string()))?;

        debug!("Downloaded: {} ({})", metadata.title, metadata.id);

        let audio_path = self.find_downloaded_file()?;
        let bytes = std::fs::metadata(&audio_path)?.len();

        Ok(DownloadResult { audio_path, bytes, metadata })
    }

    /// The temp dir is fresh per invocation, so whatever yt-dlp wrote is the
    /// download. Zero or multiple candidates mean the result is ambiguous
    /// and must not be guessed at.
    fn find_downloaded_file(&self) -> Result<PathBuf, DownloadError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.temp_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }

        match files.len() {
            1 => Ok(files.remove(0)),
            n => Err(DownloadError::UnexpectedFileCount(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessOutput;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// Fake yt-dlp: records its arguments, writes the given files into the
    /// temp dir and prints canned JSON metadata.
    struct FakeYtDlp {
        files: Vec<&'static str>,
        stdout: &'static str,
        code: i32,
        calls: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl ProcessRunner for FakeYtDlp {
        async fn run(&self, _program: &Path, args: &[String]) -> std::io::Result<ProcessOutput> {
            self.calls.lock().unwrap().push(args.to_vec());

            let template = args
                .iter()
                .position(|a| a == "-o")
                .map(|i| PathBuf::from(&args[i + 1]))
                .unwrap();
            let dir = template.parent().unwrap();
            for name in &self.files {
                std::fs::write(dir.join(name), b"fake audio data")?;
            }

            Ok(ProcessOutput {
                code: Some(self.code),
                stdout: self.stdout.as_bytes().to_vec(),
                stderr: b"ERROR: something".to_vec(),
            })
        }
    }

    const METADATA_JSON: &str =
        r#"{"id":"abc123","title":"My Song","uploader":"someone","duration":215.0,"ext":"m4a"}"#;

    fn downloader(temp: &Path, fake: FakeYtDlp) -> (Downloader, Arc<FakeYtDlp>) {
        let fake = Arc::new(fake);
        let dl = Downloader::new(PathBuf::from("/usr/bin/yt-dlp"), temp.to_path_buf(), fake.clone());
        (dl, fake)
    }

    #[tokio::test]
    async fn single_file_download_succeeds() {
        let temp = tempfile::tempdir().unwrap();
        let (dl, fake) = downloader(
            temp.path(),
            FakeYtDlp {
                files: vec!["abc123.m4a"],
                stdout: METADATA_JSON,
                code: 0,
                calls: Mutex::new(Vec::new()),
            },
        );

        let result = dl.download("https://youtu.be/abc123").await.unwrap();
        assert_eq!(result.audio_path, temp.path().join("abc123.m4a"));
        assert_eq!(result.bytes, "fake audio data".len() as u64);
        assert_eq!(result.metadata.title, "My Song");

        let calls = fake.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains(&"bestaudio/best".to_string()));
        assert!(calls[0].contains(&"--no-playlist".to_string()));
    }

    #[tokio::test]
    async fn nonzero_exit_carries_stderr() {
        let temp = tempfile::tempdir().unwrap();
        let (dl, _) = downloader(
            temp.path(),
            FakeYtDlp {
                files: vec![],
                stdout: "",
                code: 1,
                calls: Mutex::new(Vec::new()),
            },
        );

        let err = dl.download("https://youtu.be/abc123").await.unwrap_err();
        match err {
            DownloadError::YtDlpFailed { code, stderr } => {
                assert_eq!(code, Some(1));
                assert!(stderr.contains("ERROR"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_files_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let (dl, _) = downloader(
            temp.path(),
            FakeYtDlp {
                files: vec![],
                stdout: METADATA_JSON,
                code: 0,
                calls: Mutex::new(Vec::new()),
            },
        );

        let err = dl.download("https://youtu.be/abc123").await.unwrap_err();
        assert!(matches!(err, DownloadError::UnexpectedFileCount(0)));
    }

    #[tokio::test]
    async fn multiple_files_are_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let (dl, _) = downloader(
            temp.path(),
            FakeYtDlp {
                files: vec!["abc123.m4a", "abc123.webm"],
                stdout: METADATA_JSON,
                code: 0,
                calls: Mutex::new(Vec::new()),
            },
        );

        let err = dl.download("https://youtu.be/abc123").await.unwrap_err();
        assert!(matches!(err, DownloadError::UnexpectedFileCount(2)));
    }

    #[tokio::test]
    async fn garbage_metadata_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let (dl, _) = downloader(
            temp.path(),
            FakeYtDlp {
                files: vec!["abc123.m4a"],
                stdout: "not json",
                code: 0,
                calls: Mutex::new(Vec::new()),
            },
        );

        let err = dl.download("https://youtu.be/abc123").await.unwrap_err();
        assert!(matches!(err, DownloadError::MetadataParse(_)));
    }
}
