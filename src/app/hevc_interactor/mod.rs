// HEVC interactor - Batch transcodes clips to HEVC .mov files that keep alpha

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::ffmpeg_args::{self, HEVC_ENCODER};
use crate::domain::model::*;
use crate::domain::rules;
use crate::ports::*;
use crate::utils::console::Console;
use crate::utils::path::{display_name, extension_lower};

/// What one optimize-videos run should do
#[derive(Debug, Clone)]
pub struct HevcRequest {
    /// Absolute input directory
    pub input_dir: PathBuf,
    /// Absolute output directory
    pub output_dir: PathBuf,
    pub bitrate: String,
    pub overwrite: bool,
    pub recursive: bool,
    pub sanitize: bool,
}

/// Interactor for the optimize-videos use case
pub struct HevcInteractor {
    tool_port: Arc<dyn MediaToolPort>,
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
    console: Console,
}

impl HevcInteractor {
    /// Create new HEVC interactor with injected ports
    pub fn new(
        tool_port: Arc<dyn MediaToolPort>,
        probe_port: Arc<dyn ProbePort>,
        fs_port: Arc<dyn FsPort>,
        console: Console,
    ) -> Self {
        Self {
            tool_port,
            probe_port,
            fs_port,
            console,
        }
    }

    /// Transcode every source; errors only when preflight fails
    pub async fn execute(&self, request: HevcRequest) -> Result<HevcReport, DomainError> {
        let started_at = Utc::now();
        let out = &self.console;

        if !self.fs_port.is_dir(&request.input_dir).await {
            return Err(DomainError::FileNotFound(format!(
                "input directory not found: {}",
                request.input_dir.display()
            )));
        }
        self.fs_port.create_dir_all(&request.output_dir).await?;

        self.check_tools().await?;

        out.line(format!("Input dir:  {}", request.input_dir.display()));
        out.line(format!("Output dir: {}", request.output_dir.display()));
        out.line(format!("Bitrate:    {}", request.bitrate));
        out.line(format!("Overwrite:  {}", request.overwrite));
        out.line(format!("Recursive:  {}", request.recursive));
        out.blank();

        let mut renamed = 0;
        if request.sanitize {
            renamed = self.sanitize_filenames(&request.input_dir).await?;
            if renamed > 0 {
                out.line(format!("Sanitized {} filename(s).", renamed));
                out.blank();
            }
        }

        let sources = self.collect_sources(&request).await?;
        let mut report = HevcReport {
            started_at,
            finished_at: started_at,
            renamed,
            total: 0,
            encoded: 0,
            skipped: 0,
            failed: 0,
            files: Vec::new(),
        };

        if sources.is_empty() {
            out.line("No source files found. Nothing to do.");
            report.finished_at = Utc::now();
            return Ok(report);
        }

        for source in sources {
            report.total += 1;
            let output = output_path_for(&source, &request.output_dir);
            let status = self.transcode(&source, &output, &request).await;

            match status {
                HevcStatus::Encoded => report.encoded += 1,
                HevcStatus::SkippedExisting => report.skipped += 1,
                _ => report.failed += 1,
            }
            report.files.push(HevcFileResult {
                source,
                output,
                status,
            });
        }

        out.line("Done.");
        out.line(format!("Total:   {}", report.total));
        out.line(format!("Encoded: {}", report.encoded));
        out.line(format!("Skipped: {}", report.skipped));
        out.line(format!("Failed:  {}", report.failed));

        info!(
            total = report.total,
            encoded = report.encoded,
            skipped = report.skipped,
            failed = report.failed,
            "optimize-videos run finished"
        );

        report.finished_at = Utc::now();
        Ok(report)
    }

    async fn check_tools(&self) -> Result<(), DomainError> {
        if !self.tool_port.ffmpeg_available().await {
            return Err(DomainError::ToolMissing(
                "ffmpeg not found. Install with Homebrew: brew install ffmpeg".to_string(),
            ));
        }
        if !self.tool_port.ffprobe_available().await {
            return Err(DomainError::ToolMissing(
                "ffprobe not found. Install with Homebrew: brew install ffmpeg".to_string(),
            ));
        }

        let encoders = self.tool_port.encoders().await?;
        if !encoders.contains(HEVC_ENCODER) {
            return Err(DomainError::ToolMissing(format!(
                "Your ffmpeg is missing the {} encoder (needed for HEVC with alpha on macOS). \
                 Fix: brew reinstall ffmpeg (Homebrew builds include VideoToolbox).",
                HEVC_ENCODER
            )));
        }

        Ok(())
    }

    /// Rename top-level `.webm` files whose names carry control or format characters
    async fn sanitize_filenames(&self, dir: &Path) -> Result<usize, DomainError> {
        let mut renamed = 0;

        let mut files = self.fs_port.list_files(dir).await?;
        files.sort();

        for path in files {
            if extension_lower(&path).as_deref() != Some("webm") {
                continue;
            }
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };
            let cleaned = rules::clean_file_name(&name);
            if cleaned == name {
                continue;
            }
            if cleaned.is_empty() {
                warn!("Not renaming {:?}: nothing left after cleaning", name);
                continue;
            }

            let target = self.free_name(&path, &cleaned).await;
            self.console.line(format!(
                "Renaming: <{}> -> <{}>",
                name,
                display_name(&target)
            ));
            match self.fs_port.rename(&path, &target).await {
                Ok(()) => renamed += 1,
                Err(e) => self.console.line(format!("Rename failed: {}", e)),
            }
        }

        Ok(renamed)
    }

    /// First of `cleaned`, `base (1).ext`, `base (2).ext`... not taken by another file
    async fn free_name(&self, path: &Path, cleaned: &str) -> PathBuf {
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        let cleaned_path = Path::new(cleaned);
        let base = cleaned_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let ext = cleaned_path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let original = self.fs_port.canonicalize(path).await.ok();
        let mut target = parent.join(cleaned);
        let mut index = 1;

        while self.fs_port.exists(&target).await {
            let existing = self.fs_port.canonicalize(&target).await.ok();
            if existing.is_some() && existing == original {
                break;
            }
            target = parent.join(rules::deduplicated_name(&base, &ext, index));
            index += 1;
        }

        target
    }

    /// `.webm`/`.mov` files sorted by lowercase file name
    async fn collect_sources(&self, request: &HevcRequest) -> Result<Vec<PathBuf>, DomainError> {
        let mut sources = if request.recursive {
            self.fs_port.walk_files(&request.input_dir).await?
        } else {
            self.fs_port.list_files(&request.input_dir).await?
        };

        sources.retain(|p| extension_lower(p).is_some_and(|ext| rules::is_source_video_ext(&ext)));
        sources.sort_by_key(|p| display_name(p).to_lowercase());
        debug!("collected {} source file(s)", sources.len());

        Ok(sources)
    }

    async fn transcode(&self, source: &Path, output: &Path, request: &HevcRequest) -> HevcStatus {
        let out = &self.console;
        let source_name = display_name(source);
        let output_name = display_name(output);

        if !request.overwrite && self.fs_port.exists(output).await {
            out.line(format!("Skipping (exists): {}", output_name));
            return HevcStatus::SkippedExisting;
        }

        if !self.fs_port.is_readable(source).await {
            out.line(format!("Cannot read (permissions/missing): <{}>", source_name));
            return HevcStatus::Unreadable;
        }

        out.line("Encoding:");
        out.line(format!("  IN : <{}>", source_name));
        out.line(format!("  OUT: <{}>", output_name));

        let source_alpha = self.probe_port.alpha(source).await;
        debug!(
            pix_fmt = ?source_alpha.pix_fmt,
            alpha_mode = ?source_alpha.alpha_mode,
            "source alpha probe"
        );

        let args = ffmpeg_args::hevc_alpha_command(
            source,
            output,
            &request.bitrate,
            request.overwrite,
            source_alpha.has_alpha,
        );

        let exit = match self.tool_port.ffmpeg(&args).await {
            Ok(result) if result.success() => None,
            Ok(result) => {
                if !result.stderr.trim().is_empty() {
                    warn!("ffmpeg: {}", result.stderr_tail(300).trim());
                }
                Some(result.status_label())
            }
            Err(e) => {
                warn!("ffmpeg could not run: {}", e);
                Some(e.to_string())
            }
        };

        if let Some(exit) = exit {
            out.line(format!("FAILED (ffmpeg exit {}): {}", exit, source_name));
            out.blank();
            return HevcStatus::FfmpegFailed { exit };
        }

        let output_alpha = self.probe_port.alpha(output).await;
        if output_alpha.has_alpha || !source_alpha.has_alpha {
            out.line(format!("OK: {}", output_name));
            out.blank();
            HevcStatus::Encoded
        } else {
            out.line(format!(
                "WARNING: {} appears to have lost alpha (pix_fmt={}).",
                output_name,
                output_alpha.pix_fmt.as_deref().unwrap_or("None")
            ));
            out.blank();
            HevcStatus::LostAlpha
        }
    }
}

/// `<output_dir>/<stem>.mov`
pub fn output_path_for(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    output_dir.join(format!("{}.mov", stem))
}
