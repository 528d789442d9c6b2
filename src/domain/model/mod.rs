// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::utils::tail_chars;

/// Fallback duration when neither the stream nor the container reports one
pub const FALLBACK_DURATION_SECS: f64 = 10.0;

/// Fallback frame rate when the stream does not report a usable one
pub const FALLBACK_FPS: f64 = 25.0;

/// Solid background color in `#RRGGBB` form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    /// Create a color from its components
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional, digits are case-insensitive)
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::BadArgs(format!(
                "Invalid color '{}'. Expected #RRGGBB",
                value
            )));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| DomainError::BadArgs(format!("Invalid color '{}': {}", value, e)))
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// RGB components as a tuple
    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        HexColor::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// One solid-background output rendered from a transparent source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSpec {
    pub output_name: String,
    pub background: HexColor,
    pub description: String,
}

impl VariantSpec {
    pub fn new(output_name: &str, background: &str, description: &str) -> Result<Self, DomainError> {
        Ok(Self {
            output_name: output_name.to_string(),
            background: HexColor::parse(background)?,
            description: description.to_string(),
        })
    }

    /// Whether a `.mov` sidecar should follow this variant
    pub fn is_webm(&self) -> bool {
        self.output_name.to_lowercase().ends_with(".webm")
    }
}

/// A transparent source video and the variants generated from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub source_name: String,
    pub variants: Vec<VariantSpec>,
}

/// Properties of the first video stream, as reported by the prober
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoProperties {
    pub width: u32,
    pub height: u32,
    pub duration: Option<f64>,
    pub fps: Option<f64>,
    pub has_alpha: bool,
}

impl VideoProperties {
    pub fn effective_duration(&self) -> f64 {
        self.duration.unwrap_or(FALLBACK_DURATION_SECS)
    }

    pub fn effective_fps(&self) -> f64 {
        self.fps.unwrap_or(FALLBACK_FPS)
    }
}

/// Alpha-related stream fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlphaProbe {
    pub pix_fmt: Option<String>,
    pub alpha_mode: Option<String>,
    pub has_alpha: bool,
}

impl AlphaProbe {
    /// Result used when the prober fails or returns nothing usable
    pub fn unknown() -> Self {
        Self {
            pix_fmt: None,
            alpha_mode: None,
            has_alpha: false,
        }
    }
}

/// Resize and quality settings for one class of image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSettings {
    pub max_width: u32,
    pub max_height: u32,
    pub jpeg_quality: u8,
    pub webp_quality: u8,
}

impl ImageSettings {
    /// Carousel photos
    pub fn carousel() -> Self {
        Self {
            max_width: 1200,
            max_height: 900,
            jpeg_quality: 90,
            webp_quality: 90,
        }
    }

    /// Main profile photo
    pub fn profile() -> Self {
        Self {
            max_width: 1920,
            max_height: 1920,
            jpeg_quality: 95,
            webp_quality: 95,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(DomainError::ConfigFailed(
                "Image max dimensions must be greater than zero".to_string(),
            ));
        }
        for (name, quality) in [("jpeg_quality", self.jpeg_quality), ("webp_quality", self.webp_quality)] {
            if !(1..=100).contains(&quality) {
                return Err(DomainError::ConfigFailed(format!(
                    "{} must be between 1 and 100 (got {})",
                    name, quality
                )));
            }
        }
        Ok(())
    }
}

/// Pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Original image and its optimized replacements, as site-relative paths
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageMapping {
    pub original: String,
    pub jpeg: String,
    pub webp: Option<String>,
}

/// Files written for one optimized image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOutcome {
    pub jpeg_path: PathBuf,
    pub jpeg_size: u64,
    pub webp_path: Option<PathBuf>,
    pub webp_size: Option<u64>,
    /// Set when WebP encoding failed; the JPEG is still usable
    pub webp_error: Option<String>,
    pub dimensions: Dimensions,
}

/// Captured result of one external tool invocation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolOutput {
    /// Exit code, `None` when killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Last `n` characters of stderr
    pub fn stderr_tail(&self, n: usize) -> String {
        tail_chars(&self.stderr, n)
    }

    /// Exit code rendered for messages
    pub fn status_label(&self) -> String {
        match self.status {
            Some(code) => code.to_string(),
            None => "signal".to_string(),
        }
    }
}

/// One replaced `src` attribute in an HTML file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceChange {
    pub original: String,
    pub replacement: String,
}

/// Outcome of a single variant in the ios-videos run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantStatus {
    /// Rendered with the primary overlay command
    Overlay,
    /// Rendered with the colorkey fallback
    Colorkey,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantResult {
    pub source: String,
    pub output: String,
    pub background: HexColor,
    pub status: VariantStatus,
    /// `None` when no sidecar was attempted
    pub mov_created: Option<bool>,
    pub error: Option<String>,
}

/// Report for the ios-videos command
#[derive(Debug, Clone, Serialize)]
pub struct BackgroundReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub processed: usize,
    pub successful: usize,
    pub variants: Vec<VariantResult>,
}

impl BackgroundReport {
    pub fn all_successful(&self) -> bool {
        self.successful == self.total
    }
}

/// Report for the optimize-images command
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub carousel: Vec<ImageMapping>,
    pub profile: Option<ImageMapping>,
    pub carousel_original_bytes: u64,
    pub carousel_optimized_bytes: u64,
    pub html_updates: Vec<HtmlUpdate>,
}

/// References rewritten in one HTML file
#[derive(Debug, Clone, Serialize)]
pub struct HtmlUpdate {
    pub file: String,
    pub changes: Vec<ReferenceChange>,
    pub saved: bool,
}

/// Per-file outcome of the optimize-videos command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HevcStatus {
    Encoded,
    SkippedExisting,
    Unreadable,
    LostAlpha,
    FfmpegFailed { exit: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct HevcFileResult {
    pub source: PathBuf,
    pub output: PathBuf,
    pub status: HevcStatus,
}

/// Report for the optimize-videos command
#[derive(Debug, Clone, Serialize)]
pub struct HevcReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub renamed: usize,
    pub total: usize,
    pub encoded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub files: Vec<HevcFileResult>,
}
