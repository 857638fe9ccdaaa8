//! External process execution seam
//!
//! The pipeline only ever talks to yt-dlp and ffmpeg through this trait, so
//! tests can substitute a fake runner and assert on the spawned arguments
//! without touching real binaries.

use async_trait::async_trait;
use std::borrow::Cow;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of one child process run.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stdout_utf8(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_utf8(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

/// Runs an external command to completion, capturing stdout and stderr.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, program: &Path, args: &[String]) -> std::io::Result<ProcessOutput>;
}

/// Real runner backed by tokio's process API.
#[derive(Debug, Default)]
pub struct SystemRunner;

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, program: &Path, args: &[String]) -> std::io::Result<ProcessOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_requires_zero_exit() {
        let ok = ProcessOutput { code: Some(0), stdout: vec![], stderr: vec![] };
        let failed = ProcessOutput { code: Some(1), stdout: vec![], stderr: vec![] };
        let killed = ProcessOutput { code: None, stdout: vec![], stderr: vec![] };
        assert!(ok.success());
        assert!(!failed.success());
        assert!(!killed.success());
    }
}
