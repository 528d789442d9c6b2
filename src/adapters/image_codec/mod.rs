//! Still-image optimization adapter
//!
//! Decoding, EXIF orientation, resizing and JPEG encoding use the `image`
//! crate. WebP is encoded lossy by `cwebp` when it is installed, otherwise
//! losslessly by the `image` crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, Rgb, RgbImage};
use tracing::{debug, warn};

use crate::adapters::exec_ffmpeg::run_tool;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules;
use crate::ports::*;

fn image_error(path: &Path, e: impl std::fmt::Display) -> DomainError {
    DomainError::ImageFailed(format!("{}: {}", path.display(), e))
}

/// Decode `path` and apply its EXIF orientation
pub fn load_oriented(path: &Path) -> Result<DynamicImage, DomainError> {
    let reader = ImageReader::open(path)
        .map_err(|e| image_error(path, e))?
        .with_guessed_format()
        .map_err(|e| image_error(path, e))?;
    let mut decoder = reader.into_decoder().map_err(|e| image_error(path, e))?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| image_error(path, e))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Shrink to fit the settings' box with Lanczos resampling; never upscales
pub fn fit_within(img: DynamicImage, settings: &ImageSettings) -> DynamicImage {
    let target = rules::optimal_size(img.width(), img.height(), settings.max_width, settings.max_height);
    if target.width == img.width() && target.height == img.height() {
        return img;
    }
    img.resize_exact(target.width, target.height, FilterType::Lanczos3)
}

/// Composite onto white so transparent pixels do not turn black in JPEG
pub fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    out
}

/// RGB or RGBA copy suitable for WebP
fn webp_source(img: &DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    }
}

fn write_jpeg(img: &RgbImage, path: &Path, quality: u8) -> Result<(), DomainError> {
    let file = File::create(path).map_err(|e| image_error(path, e))?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    img.write_with_encoder(encoder).map_err(|e| image_error(path, e))?;
    writer.flush().map_err(|e| image_error(path, e))?;
    Ok(())
}

fn write_lossless_webp(img: &DynamicImage, path: &Path) -> Result<(), DomainError> {
    let file = File::create(path).map_err(|e| image_error(path, e))?;
    let mut writer = BufWriter::new(file);
    img.write_with_encoder(WebPEncoder::new_lossless(&mut writer))
        .map_err(|e| image_error(path, e))?;
    writer.flush().map_err(|e| image_error(path, e))?;
    Ok(())
}

fn file_size(path: &Path) -> Result<u64, DomainError> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| DomainError::FsFail(format!("{}: {}", path.display(), e)))
}

/// Result of the blocking decode/resize/JPEG stage
struct Prepared {
    webp_image: DynamicImage,
    jpeg_size: u64,
    dimensions: Dimensions,
}

/// Image optimization adapter
pub struct ImageCodecAdapter {
    cwebp: Option<PathBuf>,
}

impl ImageCodecAdapter {
    /// `cwebp` enables lossy WebP at the configured quality
    pub fn new(cwebp: Option<PathBuf>) -> Self {
        Self { cwebp }
    }

    async fn encode_webp(
        &self,
        img: DynamicImage,
        webp_path: &Path,
        quality: u8,
    ) -> Result<(), DomainError> {
        let img = Arc::new(img);
        if let Some(cwebp) = &self.cwebp {
            match self.encode_with_cwebp(cwebp, Arc::clone(&img), webp_path, quality).await {
                Ok(()) => return Ok(()),
                Err(e) => warn!("cwebp failed, falling back to lossless WebP: {}", e),
            }
        }

        let path = webp_path.to_path_buf();
        tokio::task::spawn_blocking(move || write_lossless_webp(&img, &path))
            .await
            .map_err(|e| DomainError::InternalError(format!("WebP task failed: {}", e)))?
    }

    async fn encode_with_cwebp(
        &self,
        cwebp: &Path,
        img: Arc<DynamicImage>,
        webp_path: &Path,
        quality: u8,
    ) -> Result<(), DomainError> {
        let temp = tokio::task::spawn_blocking(move || -> Result<_, DomainError> {
            let temp = tempfile::Builder::new()
                .prefix("mediaprep-")
                .suffix(".png")
                .tempfile()?;
            img.save_with_format(temp.path(), ImageFormat::Png)
                .map_err(|e| image_error(temp.path(), e))?;
            Ok(temp)
        })
        .await
        .map_err(|e| DomainError::InternalError(format!("PNG task failed: {}", e)))??;

        let args = vec![
            "-quiet".to_string(),
            "-q".to_string(),
            quality.to_string(),
            "-metadata".to_string(),
            "none".to_string(),
            temp.path().to_string_lossy().to_string(),
            "-o".to_string(),
            webp_path.to_string_lossy().to_string(),
        ];
        let output = run_tool(cwebp, &args).await?;
        if output.success() {
            Ok(())
        } else {
            Err(DomainError::ToolFailed(format!(
                "cwebp exited with {}: {}",
                output.status_label(),
                output.stderr_tail(200).trim()
            )))
        }
    }
}

#[async_trait]
impl ImagePort for ImageCodecAdapter {
    async fn optimize(
        &self,
        input: &Path,
        output_base: &Path,
        settings: &ImageSettings,
    ) -> Result<ImageOutcome, DomainError> {
        let jpeg_path = output_base.with_extension("jpg");
        let webp_path = output_base.with_extension("webp");

        let prepared = {
            let input = input.to_path_buf();
            let jpeg_path = jpeg_path.clone();
            let settings = *settings;
            tokio::task::spawn_blocking(move || -> Result<Prepared, DomainError> {
                let img = fit_within(load_oriented(&input)?, &settings);
                let dimensions = Dimensions::new(img.width(), img.height());
                write_jpeg(&flatten_onto_white(&img), &jpeg_path, settings.jpeg_quality)?;
                Ok(Prepared {
                    webp_image: webp_source(&img),
                    jpeg_size: file_size(&jpeg_path)?,
                    dimensions,
                })
            })
            .await
            .map_err(|e| DomainError::InternalError(format!("Image task failed: {}", e)))??
        };
        debug!(input = %input.display(), size = %prepared.dimensions, "wrote JPEG");

        let (webp_path, webp_size, webp_error) =
            match self.encode_webp(prepared.webp_image, &webp_path, settings.webp_quality).await {
                Ok(()) => match file_size(&webp_path) {
                    Ok(size) => (Some(webp_path), Some(size), None),
                    Err(e) => (None, None, Some(e.to_string())),
                },
                Err(e) => (None, None, Some(e.to_string())),
            };

        Ok(ImageOutcome {
            jpeg_path,
            jpeg_size: prepared.jpeg_size,
            webp_path,
            webp_size,
            webp_error,
            dimensions: prepared.dimensions,
        })
    }
}
