//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::app::{
    AppContainer, BackgroundRequest, DefaultAppContainer, HevcRequest, ImageRequest, Stage,
};
use crate::cli::args::OptimizeImagesArgs;
use crate::cli::{Cli, Commands};
use crate::config_initialization::{initialize_configuration_hierarchy, AppConfig};
use crate::utils::console::Console;
use crate::utils::path::{absolutize, resolve_under};

/// Load configuration, wire the container and run the selected command
pub async fn execute(cli: &Cli) -> Result<()> {
    info!("Executing {} command", cli.command.name());

    let config = initialize_configuration_hierarchy(cli).context("Failed to load configuration")?;
    let container = DefaultAppContainer::new(&config, Console::new(cli.json));

    match &cli.command {
        Commands::IosVideos(_) => ios_videos(&container, &config, &cli.root, cli.json).await,
        Commands::OptimizeImages(args) => {
            optimize_images(&container, &config, args, &cli.root, cli.json).await
        }
        Commands::OptimizeVideos(_) => optimize_videos(&container, &config, &cli.root, cli.json).await,
    }
}

/// Execute the ios-videos command
pub async fn ios_videos(
    container: &dyn AppContainer,
    config: &AppConfig,
    root: &Path,
    json: bool,
) -> Result<()> {
    let request = background_request(config, root);
    info!("Input: {}", request.input_dir.display());
    info!("Output: {}", request.output_dir.display());

    let report = container
        .background_interactor()
        .execute(request)
        .await
        .context("ios-videos preflight failed")?;

    if json {
        print_report(&report)?;
    }
    Ok(())
}

/// Execute the optimize-images command
pub async fn optimize_images(
    container: &dyn AppContainer,
    config: &AppConfig,
    args: &OptimizeImagesArgs,
    root: &Path,
    json: bool,
) -> Result<()> {
    let request = image_request(config, args, root);
    info!(carousel = ?request.carousel, profile = ?request.profile, "Image stages");

    let report = container
        .image_interactor()
        .execute(request)
        .await
        .context("optimize-images failed")?;

    if json {
        print_report(&report)?;
    }
    Ok(())
}

/// Execute the optimize-videos command
pub async fn optimize_videos(
    container: &dyn AppContainer,
    config: &AppConfig,
    root: &Path,
    json: bool,
) -> Result<()> {
    let request = hevc_request(config, root);

    let report = container
        .hevc_interactor()
        .execute(request)
        .await
        .context("optimize-videos preflight failed")?;

    if json {
        print_report(&report)?;
    }
    Ok(())
}

pub fn background_request(config: &AppConfig, root: &Path) -> BackgroundRequest {
    let section = &config.ios_videos;
    BackgroundRequest {
        input_dir: resolve_under(root, &section.input_dir),
        output_dir: resolve_under(root, &section.output_dir),
        sources: section.sources.clone(),
        create_mov: section.create_mov,
    }
}

/// Paths stay relative to `root` so HTML references come out site-relative
pub fn image_request(config: &AppConfig, args: &OptimizeImagesArgs, root: &Path) -> ImageRequest {
    let section = &config.images;
    ImageRequest {
        root: root.to_path_buf(),
        carousel: Stage::resolve(section.carousel_enabled, args.skip_carousel),
        profile: Stage::resolve(section.profile_enabled, args.skip_profile),
        carousel_input_dir: resolve_under(root, &section.carousel_input_dir),
        carousel_output_dir: resolve_under(root, &section.carousel_output_dir),
        carousel_settings: section.carousel,
        profile_input: resolve_under(root, &section.profile_input),
        profile_output_base: resolve_under(root, &section.profile_output_dir)
            .join(&section.profile_output_name),
        profile_settings: section.profile,
        html_files: section
            .html_files
            .iter()
            .map(|file| resolve_under(root, file))
            .collect(),
    }
}

pub fn hevc_request(config: &AppConfig, root: &Path) -> HevcRequest {
    let section = &config.hevc;
    HevcRequest {
        input_dir: absolutize(&resolve_under(root, &section.input_dir)),
        output_dir: absolutize(&resolve_under(root, &section.output_dir)),
        bitrate: section.bitrate.clone(),
        overwrite: section.overwrite,
        recursive: section.recursive,
        sanitize: section.sanitize,
    }
}

fn print_report<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize run report")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_image_request_resolves_under_root() {
        let config = AppConfig::default();
        let args = OptimizeImagesArgs {
            skip_profile: true,
            ..Default::default()
        };
        let request = image_request(&config, &args, Path::new("/site"));

        assert_eq!(request.carousel, Stage::DisabledInConfig);
        assert_eq!(request.profile, Stage::SkippedByFlag);
        assert_eq!(request.profile_input, PathBuf::from("/site/assets/profile.jpg"));
        assert_eq!(
            request.profile_output_base,
            PathBuf::from("/site/assets/profile_optimized")
        );
        assert_eq!(
            request.html_files,
            vec![
                PathBuf::from("/site/index.html"),
                PathBuf::from("/site/binaural-externalization/index.html"),
            ]
        );
    }

    #[test]
    fn test_hevc_request_is_absolute() {
        let request = hevc_request(&AppConfig::default(), Path::new("."));
        assert!(request.input_dir.is_absolute());
        assert!(request.input_dir.ends_with("assets/binaural-externalization/test"));
        assert!(request.output_dir.ends_with("assets/binaural-externalization/rendered"));
        assert_eq!(request.bitrate, "8M");
        assert!(request.sanitize);
    }

    #[test]
    fn test_background_request_copies_sources() {
        let mut config = AppConfig::default();
        config.ios_videos.create_mov = false;
        let request = background_request(&config, Path::new("/site"));
        assert_eq!(
            request.input_dir,
            PathBuf::from("/site/assets/binaural-externalization")
        );
        assert_eq!(request.sources.len(), 3);
        assert!(!request.create_mov);
    }
}
