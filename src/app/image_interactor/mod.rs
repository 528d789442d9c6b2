// Image interactor - Optimizes carousel and profile photos and updates HTML

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules;
use crate::ports::*;
use crate::utils::console::Console;
use crate::utils::path::{display_name, extension_lower, site_relative};
use crate::utils::{format_kb, format_mb};

/// Whether a stage runs, and why not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Enabled,
    SkippedByFlag,
    DisabledInConfig,
}

impl Stage {
    /// Combine the config switch with the `--skip-*` flag; the flag wins
    pub fn resolve(enabled_in_config: bool, skip_flag: bool) -> Self {
        if skip_flag {
            Stage::SkippedByFlag
        } else if enabled_in_config {
            Stage::Enabled
        } else {
            Stage::DisabledInConfig
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Stage::Enabled)
    }
}

/// What one optimize-images run should produce
#[derive(Debug, Clone)]
pub struct ImageRequest {
    /// Website root; mappings and HTML files are expressed relative to it
    pub root: PathBuf,
    pub carousel: Stage,
    pub profile: Stage,
    pub carousel_input_dir: PathBuf,
    pub carousel_output_dir: PathBuf,
    pub carousel_settings: ImageSettings,
    pub profile_input: PathBuf,
    /// Output path without extension, e.g. `assets/profile_optimized`
    pub profile_output_base: PathBuf,
    pub profile_settings: ImageSettings,
    pub html_files: Vec<PathBuf>,
}

/// Interactor for the optimize-images use case
pub struct ImageInteractor {
    image_port: Arc<dyn ImagePort>,
    fs_port: Arc<dyn FsPort>,
    console: Console,
}

impl ImageInteractor {
    /// Create new image interactor with injected ports
    pub fn new(image_port: Arc<dyn ImagePort>, fs_port: Arc<dyn FsPort>, console: Console) -> Self {
        Self {
            image_port,
            fs_port,
            console,
        }
    }

    /// Run the enabled stages and rewrite HTML references
    pub async fn execute(&self, request: ImageRequest) -> Result<ImageReport, DomainError> {
        let started_at = Utc::now();
        let out = &self.console;

        out.section("🚀 Image Optimization for Web Performance", 60);
        out.line("✓ Image codecs available");

        let mut carousel = Vec::new();
        let mut carousel_original_bytes = 0;
        let mut carousel_optimized_bytes = 0;

        match request.carousel {
            Stage::Enabled => {
                self.fs_port.create_dir_all(&request.carousel_output_dir).await?;
                out.line(format!(
                    "✓ Output directory ready: {}",
                    site_relative(&request.root, &request.carousel_output_dir)
                ));
                let totals = self.optimize_carousel(&request).await?;
                carousel = totals.0;
                carousel_original_bytes = totals.1;
                carousel_optimized_bytes = totals.2;
            }
            stage => {
                let reason = match stage {
                    Stage::SkippedByFlag => "per --skip-carousel",
                    _ => "per images.carousel_enabled = false",
                };
                out.blank();
                out.line(format!("⏭️  Skipping carousel image optimization ({})", reason));
            }
        }

        let profile = match request.profile {
            Stage::Enabled => self.optimize_profile(&request).await,
            stage => {
                let reason = match stage {
                    Stage::SkippedByFlag => "per --skip-profile",
                    _ => "per images.profile_enabled = false",
                };
                out.blank();
                out.line(format!("⏭️  Skipping profile image optimization ({})", reason));
                None
            }
        };

        let mut html_updates = Vec::new();
        if !carousel.is_empty() || profile.is_some() {
            let mut mappings = carousel.clone();
            mappings.extend(profile.clone());
            html_updates = self
                .update_html_references(&request, &mappings, profile.as_ref())
                .await;
        }

        out.blank();
        out.section("🎉 Optimization Complete!", 60);
        out.line("📁 Optimized images saved to:");
        if !carousel.is_empty() {
            out.line(format!(
                "   • Carousel: {}",
                site_relative(&request.root, &request.carousel_output_dir)
            ));
        }
        if let Some(mapping) = &profile {
            out.line(format!("   • Profile: {}", mapping.jpeg));
        }
        out.blank();
        out.line("📋 Next Steps:");
        out.line("   1. Test your website to ensure images look good");
        out.line("   2. Consider adding WebP support with <picture> elements");
        out.line("   3. Monitor performance improvements");

        info!(
            carousel = carousel.len(),
            profile = profile.is_some(),
            html_files = html_updates.len(),
            "optimize-images run finished"
        );

        Ok(ImageReport {
            started_at,
            finished_at: Utc::now(),
            carousel,
            profile,
            carousel_original_bytes,
            carousel_optimized_bytes,
            html_updates,
        })
    }

    /// Returns the mappings plus total original and JPEG bytes
    async fn optimize_carousel(
        &self,
        request: &ImageRequest,
    ) -> Result<(Vec<ImageMapping>, u64, u64), DomainError> {
        let out = &self.console;
        out.blank();
        out.section("📸 Optimizing Carousel Images", 50);

        let mut files = if self.fs_port.is_dir(&request.carousel_input_dir).await {
            self.fs_port.list_files(&request.carousel_input_dir).await?
        } else {
            warn!(
                "carousel input directory missing: {}",
                request.carousel_input_dir.display()
            );
            Vec::new()
        };
        files.retain(|p| extension_lower(p).is_some_and(|ext| rules::is_source_image_ext(&ext)));
        files.sort();

        if files.is_empty() {
            out.line("❌ No image files found in carousel directory");
            return Ok((Vec::new(), 0, 0));
        }

        let mut mappings = Vec::new();
        let mut total_original = 0;
        let mut total_optimized = 0;

        for path in &files {
            let original_size = match self.fs_port.file_size(path).await {
                Ok(size) => size,
                Err(e) => {
                    out.line(format!("  ❌ Error optimizing {}: {}", display_name(path), e));
                    continue;
                }
            };
            let size_info = format!("({})", format_kb(original_size));
            out.line(format!("🖼️  Optimizing: {} {}", display_name(path), size_info));

            let Some(stem) = path.file_stem() else {
                continue;
            };
            let output_base = request.carousel_output_dir.join(stem);

            if let Some((mapping, jpeg_size)) = self
                .optimize_one(
                    &request.root,
                    path,
                    &output_base,
                    &request.carousel_settings,
                    original_size,
                    &size_info,
                )
                .await
            {
                total_original += original_size;
                total_optimized += jpeg_size;
                mappings.push(mapping);
            }
        }

        out.blank();
        out.line(format!(
            "📊 Carousel Summary: {} → {} ({:.1}% reduction)",
            format_kb(total_original),
            format_kb(total_optimized),
            rules::reduction_percent(total_original, total_optimized)
        ));

        Ok((mappings, total_original, total_optimized))
    }

    async fn optimize_profile(&self, request: &ImageRequest) -> Option<ImageMapping> {
        let out = &self.console;
        out.blank();
        out.section("👤 Optimizing Profile Image", 50);

        let input = &request.profile_input;
        if !self.fs_port.exists(input).await {
            out.line(format!(
                "❌ Profile image not found: {}",
                site_relative(&request.root, input)
            ));
            return None;
        }

        let original_size = match self.fs_port.file_size(input).await {
            Ok(size) => size,
            Err(e) => {
                out.line(format!("  ❌ Error optimizing {}: {}", display_name(input), e));
                return None;
            }
        };
        let size_info = format!("({})", format_mb(original_size));
        out.blank();
        out.line(format!(
            "📷 Optimizing profile image: {} {}",
            display_name(input),
            size_info
        ));

        self.optimize_one(
            &request.root,
            input,
            &request.profile_output_base,
            &request.profile_settings,
            original_size,
            &size_info,
        )
        .await
        .map(|(mapping, _)| mapping)
    }

    /// Encode one image; `None` when the JPEG could not be produced
    async fn optimize_one(
        &self,
        root: &Path,
        input: &Path,
        output_base: &Path,
        settings: &ImageSettings,
        original_size: u64,
        size_info: &str,
    ) -> Option<(ImageMapping, u64)> {
        let out = &self.console;
        let name = display_name(input);

        let outcome = match self.image_port.optimize(input, output_base, settings).await {
            Ok(outcome) => outcome,
            Err(e) => {
                out.line(format!("  ❌ Error optimizing {}: {}", name, e));
                return None;
            }
        };

        out.line(format!(
            "  JPEG: {} {} → {} ({:.1}% reduction)",
            name,
            size_info,
            format_kb(outcome.jpeg_size),
            rules::reduction_percent(original_size, outcome.jpeg_size)
        ));

        match (&outcome.webp_path, outcome.webp_size) {
            (Some(_), Some(webp_size)) => out.line(format!(
                "  WebP: {} {} → {} ({:.1}% reduction)",
                name,
                size_info,
                format_kb(webp_size),
                rules::reduction_percent(original_size, webp_size)
            )),
            _ => out.line(format!(
                "  ⚠️ WebP creation failed for {}: {}",
                name,
                outcome.webp_error.as_deref().unwrap_or("unknown error")
            )),
        }

        let mapping = ImageMapping {
            original: site_relative(root, input),
            jpeg: site_relative(root, &outcome.jpeg_path),
            webp: outcome.webp_path.as_deref().map(|p| site_relative(root, p)),
        };
        Some((mapping, outcome.jpeg_size))
    }

    async fn update_html_references(
        &self,
        request: &ImageRequest,
        mappings: &[ImageMapping],
        profile: Option<&ImageMapping>,
    ) -> Vec<HtmlUpdate> {
        let out = &self.console;
        out.blank();
        out.section("🔄 Updating HTML References", 50);

        let mut updates = Vec::new();

        for html_path in &request.html_files {
            if !self.fs_port.exists(html_path).await {
                continue;
            }
            let file = site_relative(&request.root, html_path);
            out.line(format!("📝 Updating {}", file));

            let content = match self.fs_port.read_to_string(html_path).await {
                Ok(content) => content,
                Err(e) => {
                    out.line(format!("   ❌ Could not read {}: {}", file, e));
                    continue;
                }
            };

            let (rewritten, changes) = rules::rewrite_src_references(&content, mappings);
            for change in &changes {
                let old_name = display_name(Path::new(&change.original));
                let new_name = display_name(Path::new(&change.replacement));
                if profile.is_some_and(|p| p.original == change.original) {
                    out.line(format!("   ✓ Updated profile: {} → {}", old_name, new_name));
                } else {
                    out.line(format!("   ✓ Updated: {} → {}", old_name, new_name));
                }
            }

            let mut saved = false;
            if changes.is_empty() {
                out.line(format!("   ℹ️  No references found in {}", file));
            } else {
                match self.fs_port.write(html_path, &rewritten).await {
                    Ok(()) => {
                        saved = true;
                        out.line(format!("   📁 Saved {} with {} updates", file, changes.len()));
                    }
                    Err(e) => out.line(format!("   ❌ Could not save {}: {}", file, e)),
                }
            }

            updates.push(HtmlUpdate {
                file,
                changes,
                saved,
            });
        }

        updates
    }
}
