//! FFmpeg execution adapter
//!
//! Runs the ffmpeg binary as a child process and captures its output.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::ffmpeg_args;
use crate::domain::model::*;
use crate::ports::*;

/// Run `program` with `args`, capturing stdout and stderr.
pub(crate) async fn run_tool(program: &Path, args: &[String]) -> Result<ToolOutput, DomainError> {
    debug!(program = %program.display(), ?args, "spawning tool");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                DomainError::ToolMissing(format!("{} is not installed or not on PATH", program.display()))
            }
            _ => DomainError::ToolFailed(format!("Failed to run {}: {}", program.display(), e)),
        })?;

    let result = ToolOutput {
        status: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };

    if !result.success() {
        debug!(
            program = %program.display(),
            status = %result.status_label(),
            "tool exited unsuccessfully"
        );
    }

    Ok(result)
}

/// Whether `program -version` runs and exits 0
pub(crate) async fn responds_to_version(program: &Path) -> bool {
    match run_tool(program, &["-version".to_string()]).await {
        Ok(output) => output.success(),
        Err(e) => {
            debug!("{} unavailable: {}", program.display(), e);
            false
        }
    }
}

/// Absolute location of `program` on PATH, if any
pub fn locate(program: &Path) -> Option<PathBuf> {
    which::which(program).ok()
}

/// FFmpeg-based execution adapter
pub struct FfmpegAdapter {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegAdapter {
    /// Create new FFmpeg adapter for the given binaries
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }
}

#[async_trait]
impl MediaToolPort for FfmpegAdapter {
    async fn ffmpeg(&self, args: &[String]) -> Result<ToolOutput, DomainError> {
        run_tool(&self.ffmpeg, args).await
    }

    async fn ffmpeg_available(&self) -> bool {
        responds_to_version(&self.ffmpeg).await
    }

    async fn ffprobe_available(&self) -> bool {
        responds_to_version(&self.ffprobe).await
    }

    async fn encoders(&self) -> Result<String, DomainError> {
        let output = run_tool(&self.ffmpeg, &ffmpeg_args::list_encoders_command()).await?;
        if !output.success() {
            warn!("ffmpeg -encoders exited with {}", output.status_label());
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_tool_missing() {
        let program = PathBuf::from("mediaprep-definitely-not-a-real-binary");
        let err = run_tool(&program, &[]).await.unwrap_err();
        assert!(matches!(err, DomainError::ToolMissing(_)));
        assert!(!responds_to_version(&program).await);
    }

    #[tokio::test]
    async fn test_adapter_reports_missing_tools_unavailable() {
        let adapter = FfmpegAdapter::new("mediaprep-no-ffmpeg", "mediaprep-no-ffprobe");
        assert!(!adapter.ffmpeg_available().await);
        assert!(!adapter.ffprobe_available().await);
        assert!(adapter.encoders().await.is_err());
    }
}
