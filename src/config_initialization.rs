//! Configuration initialization and hierarchy management
//!
//! Precedence, lowest to highest: built-in defaults, config file,
//! environment variables, command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adapters::config_file::ConfigFileAdapter;
use crate::cli::{Cli, Commands};
use crate::domain::errors::DomainError;
use crate::domain::model::{HexColor, ImageSettings, SourceSpec, VariantSpec};
use crate::domain::rules;
use crate::error::MediaPrepResult;
use crate::utils::path::expand_tilde;

/// Environment variables that override config values
pub const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("MEDIAPREP_FFMPEG", "tools.ffmpeg"),
    ("MEDIAPREP_FFPROBE", "tools.ffprobe"),
    ("MEDIAPREP_CWEBP", "tools.cwebp"),
    ("MEDIAPREP_HEVC_BITRATE", "hevc.bitrate"),
];

/// Full application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub tools: ToolsConfig,
    pub ios_videos: IosVideosConfig,
    pub images: ImagesConfig,
    pub hevc: HevcConfig,
}

/// External binaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    /// Looked up on PATH when unset; lossless WebP is used if it is missing
    pub cwebp: Option<PathBuf>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            cwebp: None,
        }
    }
}

/// Solid-background variant generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IosVideosConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub create_mov: bool,
    pub sources: Vec<SourceSpec>,
}

impl Default for IosVideosConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("assets/binaural-externalization"),
            output_dir: PathBuf::from("assets/binaural-externalization"),
            create_mov: true,
            sources: default_sources(),
        }
    }
}

fn variant(output_name: &str, (r, g, b): (u8, u8, u8), description: &str) -> VariantSpec {
    VariantSpec {
        output_name: output_name.to_string(),
        background: HexColor::new(r, g, b),
        description: description.to_string(),
    }
}

const BLUE: (u8, u8, u8) = (0x4A, 0x90, 0xE2);
const WHITE: (u8, u8, u8) = (0xFF, 0xFF, 0xFF);
const GRAY: (u8, u8, u8) = (0xF0, 0xF2, 0xF5);

/// The site's transparent clips and the backgrounds each section needs
pub fn default_sources() -> Vec<SourceSpec> {
    vec![
        SourceSpec {
            source_name: "06 - Circle - Transparent (Sun).webm".to_string(),
            variants: vec![
                variant("06 - Circle - Blue-BG.webm", BLUE, "Introduction section (blue)"),
                variant("06 - Circle - White-BG.webm", WHITE, "Externalized section (white)"),
                variant("06 - Circle - Gray-BG.webm", GRAY, "Main site education card (gray)"),
            ],
        },
        SourceSpec {
            source_name: "07 - Circle Elevation - Transparent (Sun).webm".to_string(),
            variants: vec![variant(
                "07 - Circle Elevation - Gray-BG.webm",
                GRAY,
                "Binaural section (gray)",
            )],
        },
        SourceSpec {
            source_name: "08 - Line - Transparent (Sun).webm".to_string(),
            variants: vec![variant(
                "08 - Line - White-BG.webm",
                WHITE,
                "Stereo section (white)",
            )],
        },
    ]
}

/// Carousel and profile image optimization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub carousel_enabled: bool,
    pub profile_enabled: bool,
    pub carousel_input_dir: PathBuf,
    pub carousel_output_dir: PathBuf,
    pub profile_input: PathBuf,
    pub profile_output_dir: PathBuf,
    pub profile_output_name: String,
    pub carousel: ImageSettings,
    pub profile: ImageSettings,
    /// Site-relative HTML files whose `src` references get rewritten
    pub html_files: Vec<PathBuf>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            carousel_enabled: false,
            profile_enabled: true,
            carousel_input_dir: PathBuf::from("assets/photos/carousel/new"),
            carousel_output_dir: PathBuf::from("assets/photos/carousel_optimized/new"),
            profile_input: PathBuf::from("assets/profile.jpg"),
            profile_output_dir: PathBuf::from("assets"),
            profile_output_name: "profile_optimized".to_string(),
            carousel: ImageSettings::carousel(),
            profile: ImageSettings::profile(),
            html_files: vec![
                PathBuf::from("index.html"),
                PathBuf::from("binaural-externalization/index.html"),
            ],
        }
    }
}

/// HEVC-with-alpha transcoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HevcConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub bitrate: String,
    pub overwrite: bool,
    pub recursive: bool,
    pub sanitize: bool,
}

impl Default for HevcConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("assets/binaural-externalization/test"),
            output_dir: PathBuf::from("assets/binaural-externalization/rendered"),
            bitrate: "8M".to_string(),
            overwrite: false,
            recursive: false,
            sanitize: true,
        }
    }
}

impl AppConfig {
    /// Expand `~` in every configured path
    pub fn expand_paths(&mut self) {
        let expand = |p: &mut PathBuf| *p = expand_tilde(p);

        expand(&mut self.tools.ffmpeg);
        expand(&mut self.tools.ffprobe);
        if let Some(cwebp) = self.tools.cwebp.as_mut() {
            expand(cwebp);
        }
        expand(&mut self.ios_videos.input_dir);
        expand(&mut self.ios_videos.output_dir);
        expand(&mut self.images.carousel_input_dir);
        expand(&mut self.images.carousel_output_dir);
        expand(&mut self.images.profile_input);
        expand(&mut self.images.profile_output_dir);
        expand(&mut self.hevc.input_dir);
        expand(&mut self.hevc.output_dir);
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), DomainError> {
        self.images.carousel.validate()?;
        self.images.profile.validate()?;

        if self.images.profile_output_name.trim().is_empty() {
            return Err(DomainError::ConfigFailed(
                "images.profile_output_name must not be empty".to_string(),
            ));
        }

        if !rules::is_valid_bitrate(&self.hevc.bitrate) {
            return Err(DomainError::ConfigFailed(format!(
                "Invalid bitrate '{}'. Expected digits with an optional k/M/G suffix, e.g. 8M",
                self.hevc.bitrate
            )));
        }

        for source in &self.ios_videos.sources {
            if source.source_name.trim().is_empty() {
                return Err(DomainError::ConfigFailed(
                    "ios_videos.sources entries need a source_name".to_string(),
                ));
            }
            if let Some(bad) = source
                .variants
                .iter()
                .find(|v| v.output_name.trim().is_empty())
            {
                return Err(DomainError::ConfigFailed(format!(
                    "Variant '{}' of {} has no output_name",
                    bad.description, source.source_name
                )));
            }
        }

        Ok(())
    }
}

/// Apply environment overrides using `lookup` to read variables
pub fn apply_environment_overrides<F>(config: &mut AppConfig, lookup: F) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;

    for &(env_var, key) in ENV_MAPPINGS {
        let Some(value) = lookup(env_var).filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        info!("Found environment override: {} = {}", env_var, value);

        match key {
            "tools.ffmpeg" => config.tools.ffmpeg = PathBuf::from(value),
            "tools.ffprobe" => config.tools.ffprobe = PathBuf::from(value),
            "tools.cwebp" => config.tools.cwebp = Some(PathBuf::from(value)),
            "hevc.bitrate" => config.hevc.bitrate = value,
            _ => continue,
        }
        applied += 1;
    }

    if applied > 0 {
        info!("Applied {} environment variable overrides", applied);
    }
    applied
}

/// Apply command-line flags of the selected subcommand
pub fn apply_cli_overrides(config: &mut AppConfig, command: &Commands) -> usize {
    let mut applied = 0;
    let mut set = |description: &str| {
        info!("CLI override: {}", description);
        applied += 1;
    };

    match command {
        Commands::IosVideos(args) => {
            if let Some(dir) = &args.input_dir {
                config.ios_videos.input_dir = dir.clone();
                set("ios_videos.input_dir");
            }
            if let Some(dir) = &args.output_dir {
                config.ios_videos.output_dir = dir.clone();
                set("ios_videos.output_dir");
            }
            if args.no_mov {
                config.ios_videos.create_mov = false;
                set("ios_videos.create_mov = false");
            }
        }
        Commands::OptimizeImages(args) => {
            if args.carousel {
                config.images.carousel_enabled = true;
                set("images.carousel_enabled = true");
            }
            if let Some(quality) = args.jpeg_quality {
                config.images.carousel.jpeg_quality = quality;
                config.images.profile.jpeg_quality = quality;
                set("images.*.jpeg_quality");
            }
            if let Some(quality) = args.webp_quality {
                config.images.carousel.webp_quality = quality;
                config.images.profile.webp_quality = quality;
                set("images.*.webp_quality");
            }
        }
        Commands::OptimizeVideos(args) => {
            if let Some(dir) = &args.input {
                config.hevc.input_dir = dir.clone();
                set("hevc.input_dir");
            }
            if let Some(dir) = &args.output {
                config.hevc.output_dir = dir.clone();
                set("hevc.output_dir");
            }
            if let Some(bitrate) = &args.bitrate {
                config.hevc.bitrate = bitrate.clone();
                set("hevc.bitrate");
            }
            if args.overwrite {
                config.hevc.overwrite = true;
                set("hevc.overwrite = true");
            }
            if args.recursive {
                config.hevc.recursive = true;
                set("hevc.recursive = true");
            }
            if args.no_sanitize {
                config.hevc.sanitize = false;
                set("hevc.sanitize = false");
            }
        }
    }

    applied
}

/// Build the effective configuration for this run
pub fn initialize_configuration_hierarchy(cli: &Cli) -> MediaPrepResult<AppConfig> {
    info!("Initializing configuration hierarchy");

    let loader = ConfigFileAdapter::new(&cli.root);
    let source = loader.discover(cli.config.as_deref())?;
    info!("Configuration source: {}", describe_source(source.as_deref()));

    let mut config = match &source {
        Some(path) => loader.load(path)?,
        None => AppConfig::default(),
    };

    apply_environment_overrides(&mut config, |name| std::env::var(name).ok());
    apply_cli_overrides(&mut config, &cli.command);

    config.expand_paths();
    config.validate()?;

    info!("Configuration hierarchy initialized successfully");
    Ok(config)
}

/// Resolve the config file path shown in diagnostics
pub fn describe_source(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string())
}
