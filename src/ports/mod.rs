// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for running the transcoder
#[async_trait]
pub trait MediaToolPort: Send + Sync {
    /// Run ffmpeg with the given arguments and capture its output.
    ///
    /// A non-zero exit is reported through `ToolOutput::status`, not as an
    /// error; `Err` means the process could not be started at all.
    async fn ffmpeg(&self, args: &[String]) -> Result<ToolOutput, DomainError>;

    /// Whether `ffmpeg -version` runs successfully
    async fn ffmpeg_available(&self) -> bool;

    /// Whether `ffprobe -version` runs successfully
    async fn ffprobe_available(&self) -> bool;

    /// Raw `ffmpeg -encoders` listing
    async fn encoders(&self) -> Result<String, DomainError>;
}

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Dimensions, timing and alpha of the first video stream.
    ///
    /// `Ok(None)` when the file has no video stream.
    async fn video_properties(&self, path: &Path) -> Result<Option<VideoProperties>, DomainError>;

    /// Alpha fields of the first video stream; `AlphaProbe::unknown()` on any failure
    async fn alpha(&self, path: &Path) -> AlphaProbe;
}

/// Port for still-image optimization
#[async_trait]
pub trait ImagePort: Send + Sync {
    /// Write `<output_base>.jpg` and `<output_base>.webp` for `input`.
    ///
    /// Fails only when the JPEG cannot be produced; a WebP failure is
    /// reported inside the outcome.
    async fn optimize(
        &self,
        input: &Path,
        output_base: &Path,
        settings: &ImageSettings,
    ) -> Result<ImageOutcome, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if a path exists
    async fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a directory
    async fn is_dir(&self, path: &Path) -> bool;

    /// Check that the file can be opened for reading
    async fn is_readable(&self, path: &Path) -> bool;

    /// Create directory (including parent directories)
    async fn create_dir_all(&self, path: &Path) -> Result<(), DomainError>;

    /// Get file size in bytes
    async fn file_size(&self, path: &Path) -> Result<u64, DomainError>;

    async fn read_to_string(&self, path: &Path) -> Result<String, DomainError>;

    async fn write(&self, path: &Path, content: &str) -> Result<(), DomainError>;

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), DomainError>;

    /// Regular files directly inside `dir`
    async fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, DomainError>;

    /// Regular files anywhere below `dir`
    async fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>, DomainError>;

    /// Canonical form of a path, used to tell two names for the same file apart
    async fn canonicalize(&self, path: &Path) -> Result<PathBuf, DomainError>;
}
