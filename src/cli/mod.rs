//! CLI module for mediaprep
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};

pub mod args;
pub mod commands;

pub use args::{IosVideosArgs, OptimizeImagesArgs, OptimizeVideosArgs};

/// mediaprep - Media asset preparation for the portfolio website
///
/// Generates iOS-friendly video variants, optimizes photos and rewrites their
/// HTML references, and transcodes clips to HEVC with alpha.
#[derive(Parser, Debug)]
#[command(name = "mediaprep")]
#[command(about = "Prepare the website's video and image assets")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Website root that relative asset paths are resolved against
    #[arg(long, env = "MEDIAPREP_ROOT", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Config file (default: mediaprep.toml/.yaml/.yml in the root)
    #[arg(long, env = "MEDIAPREP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Print the run report as JSON instead of progress output
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level,
            format: self.log_format,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render solid-background variants of transparent WebM clips for iOS
    IosVideos(args::IosVideosArgs),
    /// Resize carousel and profile photos to JPEG + WebP and update HTML
    OptimizeImages(args::OptimizeImagesArgs),
    /// Transcode WebM/MOV clips to HEVC .mov files that keep alpha
    OptimizeVideos(args::OptimizeVideosArgs),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::IosVideos(_) => "ios-videos",
            Commands::OptimizeImages(_) => "optimize-images",
            Commands::OptimizeVideos(_) => "optimize-videos",
        }
    }
}
