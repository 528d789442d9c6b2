//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;
use clap_num::number_range;

fn quality(s: &str) -> Result<u8, String> {
    number_range(s, 1, 100)
}

/// Arguments for the ios-videos command
#[derive(Args, Debug, Default)]
pub struct IosVideosArgs {
    /// Directory holding the transparent source clips
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory the variants are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Do not create H.264 .mov sidecars
    #[arg(long)]
    pub no_mov: bool,
}

/// Arguments for the optimize-images command
#[derive(Args, Debug, Default)]
pub struct OptimizeImagesArgs {
    /// Skip optimizing the profile image
    #[arg(long)]
    pub skip_profile: bool,

    /// Skip optimizing the carousel images
    #[arg(long, conflicts_with = "carousel")]
    pub skip_carousel: bool,

    /// Enable the carousel stage even if the config disables it
    #[arg(long)]
    pub carousel: bool,

    /// JPEG quality for both stages (1-100)
    #[arg(long, value_parser = quality)]
    pub jpeg_quality: Option<u8>,

    /// WebP quality for both stages (1-100)
    #[arg(long, value_parser = quality)]
    pub webp_quality: Option<u8>,
}

/// Arguments for the optimize-videos command
#[derive(Args, Debug, Default)]
pub struct OptimizeVideosArgs {
    /// Input folder containing source files
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output folder for .mov files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target video bitrate (default: 8M)
    #[arg(long)]
    pub bitrate: Option<String>,

    /// Overwrite existing outputs
    #[arg(long)]
    pub overwrite: bool,

    /// Recurse into subfolders
    #[arg(long)]
    pub recursive: bool,

    /// Skip the filename sanitation step
    #[arg(long)]
    pub no_sanitize: bool,
}
