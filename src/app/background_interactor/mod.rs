// Background interactor - Renders solid-background variants of transparent clips

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::ffmpeg_args;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::console::Console;
use crate::utils::path::display_name;
use crate::utils::tail_chars;

/// What one ios-videos run should produce
#[derive(Debug, Clone)]
pub struct BackgroundRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub sources: Vec<SourceSpec>,
    pub create_mov: bool,
}

impl BackgroundRequest {
    /// Number of variants over all sources
    pub fn total_variants(&self) -> usize {
        self.sources.iter().map(|s| s.variants.len()).sum()
    }
}

/// Interactor for the ios-videos use case
pub struct BackgroundInteractor {
    tool_port: Arc<dyn MediaToolPort>,
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
    console: Console,
}

impl BackgroundInteractor {
    /// Create new background interactor with injected ports
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

    /// Generate every configured variant.
    ///
    /// Errors only when preflight fails; per-variant failures are counted in
    /// the report.
    pub async fn execute(&self, request: BackgroundRequest) -> Result<BackgroundReport, DomainError> {
        let started_at = Utc::now();
        let out = &self.console;

        out.section("🎥 iOS Video Background Generator", 50);
        self.check_tools().await?;

        if !self.fs_port.is_dir(&request.input_dir).await {
            out.line(format!("❌ Input directory not found: {}", request.input_dir.display()));
            out.line("   Please run this script from your website root directory.");
            return Err(DomainError::FileNotFound(format!(
                "Input directory not found: {}",
                request.input_dir.display()
            )));
        }

        self.fs_port.create_dir_all(&request.output_dir).await?;

        let total = request.total_variants();
        let mut processed = 0;
        let mut successful = 0;
        let mut variants = Vec::with_capacity(total);

        out.blank();
        out.line(format!("📊 Processing {} video variants...", total));
        out.rule('-', 50);

        for source in &request.sources {
            let input_path = request.input_dir.join(&source.source_name);
            out.blank();
            out.line(format!("🎯 Source: {}", source.source_name));

            for variant in &source.variants {
                let output_path = request.output_dir.join(&variant.output_name);
                processed += 1;

                let mut result = VariantResult {
                    source: source.source_name.clone(),
                    output: variant.output_name.clone(),
                    background: variant.background,
                    status: VariantStatus::Failed,
                    mov_created: None,
                    error: None,
                };

                match self.generate(&input_path, &output_path, variant).await {
                    Ok(status) => {
                        successful += 1;
                        result.status = status;
                        if request.create_mov && variant.is_webm() {
                            result.mov_created = Some(self.create_mov(&output_path).await);
                        }
                    }
                    Err(message) => {
                        warn!(output = %variant.output_name, "variant failed: {}", message);
                        result.error = Some(message);
                    }
                }

                variants.push(result);
            }
        }

        out.blank();
        out.rule('=', 50);
        out.line("🏁 Processing Complete!");
        out.line(format!("   Processed: {}/{}", processed, total));
        out.line(format!("   Successful: {}/{}", successful, total));

        if successful == total {
            out.line("✅ All videos generated successfully!");
            out.blank();
            out.line("📝 Next steps:");
            out.line("   1. Test the videos in your browser");
            out.line("   2. Deploy the new video files");
            out.line("   3. The JavaScript will automatically use them on iOS");
        } else {
            out.line(format!("⚠️  {} videos failed to generate", total - successful));
            out.line("   Check the error messages above");
        }

        info!(processed, successful, total, "ios-videos run finished");

        Ok(BackgroundReport {
            started_at,
            finished_at: Utc::now(),
            total,
            processed,
            successful,
            variants,
        })
    }

    async fn check_tools(&self) -> Result<(), DomainError> {
        let out = &self.console;

        if !self.tool_port.ffmpeg_available().await {
            out.line("❌ FFmpeg not found. Please install FFmpeg and add it to your PATH.");
            out.line("   Download: https://ffmpeg.org/download.html");
            return Err(DomainError::ToolMissing(
                "FFmpeg not found. Install it from https://ffmpeg.org/download.html".to_string(),
            ));
        }
        out.line("✓ FFmpeg found");

        if !self.tool_port.ffprobe_available().await {
            out.line("❌ FFprobe not found. Please install FFmpeg (includes FFprobe) and add it to your PATH.");
            out.line("   Download: https://ffmpeg.org/download.html");
            return Err(DomainError::ToolMissing(
                "FFprobe not found. Install FFmpeg (includes FFprobe) from https://ffmpeg.org/download.html"
                    .to_string(),
            ));
        }
        out.line("✓ FFprobe found");

        Ok(())
    }

    /// Render one variant, overlay first and colorkey as the fallback
    async fn generate(
        &self,
        input: &Path,
        output: &Path,
        variant: &VariantSpec,
    ) -> Result<VariantStatus, String> {
        let out = &self.console;

        if !self.fs_port.exists(input).await {
            out.line(format!("❌ Input video not found: {}", input.display()));
            return Err(format!("Input video not found: {}", input.display()));
        }

        let props = match self.probe_port.video_properties(input).await {
            Ok(Some(props)) => props,
            Ok(None) => {
                out.line(format!("❌ Could not get video information for {}", input.display()));
                return Err(format!("No video stream in {}", input.display()));
            }
            Err(e) => {
                out.line(format!("❌ Error parsing video info: {}", e));
                out.line(format!("❌ Could not get video information for {}", input.display()));
                return Err(e.to_string());
            }
        };

        let (r, g, b) = variant.background.rgb();
        out.line(format!(
            "🎬 Generating: {} ({})",
            display_name(output),
            variant.description
        ));
        out.line(format!("   Background: {} (RGB: {},{},{})", variant.background, r, g, b));
        out.line(format!(
            "   Properties: {}x{}, {:.1}s, {:.1}fps, Alpha: {}",
            props.width,
            props.height,
            props.effective_duration(),
            props.effective_fps(),
            props.has_alpha
        ));

        let primary = ffmpeg_args::overlay_command(input, output, &variant.background, &props);
        let primary_err = match self.tool_port.ffmpeg(&primary).await {
            Ok(result) if result.success() => {
                out.line(format!("✓ Generated with simple overlay: {}", output.display()));
                return Ok(VariantStatus::Overlay);
            }
            Ok(result) => result.stderr_tail(300),
            Err(e) => e.to_string(),
        };

        out.line("⚠️  Simple overlay failed, trying alternative method...");
        out.line(format!("   Error: {}", primary_err));

        let fallback = ffmpeg_args::colorkey_command(input, output, &variant.background, &props);
        let fallback_err = match self.tool_port.ffmpeg(&fallback).await {
            Ok(result) if result.success() => {
                out.line(format!("✓ Generated with alpha handling: {}", output.display()));
                return Ok(VariantStatus::Colorkey);
            }
            Ok(result) => result.stderr_tail(200),
            Err(e) => e.to_string(),
        };

        let primary_tail = tail_chars(&primary_err, 200);
        out.line(format!("❌ Both methods failed for {}", output.display()));
        out.line(format!("   Simple error: {}", primary_tail));
        out.line(format!("   Alpha error: {}", fallback_err));

        Err(format!(
            "Both methods failed. Simple: {} Alpha: {}",
            primary_tail.trim(),
            fallback_err.trim()
        ))
    }

    /// H.264 sidecar next to a generated WebM
    async fn create_mov(&self, webm: &Path) -> bool {
        let out = &self.console;
        let mov = webm.with_extension("mov");

        out.line(format!("📱 Creating MOV version: {}", display_name(&mov)));

        match self
            .tool_port
            .ffmpeg(&ffmpeg_args::mov_sidecar_command(webm, &mov))
            .await
        {
            Ok(result) if result.success() => {
                out.line(format!("✓ MOV created: {}", mov.display()));
                true
            }
            Ok(result) => {
                debug!(stderr = %result.stderr_tail(300), "sidecar encode failed");
                out.line(format!(
                    "❌ Failed to create MOV version: ffmpeg exited with {}",
                    result.status_label()
                ));
                false
            }
            Err(e) => {
                out.line(format!("❌ Failed to create MOV version: {}", e));
                false
            }
        }
    }
}
