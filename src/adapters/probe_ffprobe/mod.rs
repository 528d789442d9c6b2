//! FFprobe adapter for media file probing
//!
//! Parses ffprobe's JSON output into the domain's video and alpha views.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::adapters::exec_ffmpeg::run_tool;
use crate::domain::errors::*;
use crate::domain::ffmpeg_args;
use crate::domain::model::*;
use crate::domain::rules;
use crate::ports::*;

/// Top-level ffprobe JSON document
#[derive(Debug, Default, Deserialize)]
pub struct ProbeDocument {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
    #[serde(default)]
    pub format: Option<ProbeFormat>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProbeStream {
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub r_frame_rate: Option<String>,
    #[serde(default)]
    pub pix_fmt: Option<String>,
    #[serde(default)]
    pub alpha_mode: Option<serde_json::Value>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProbeFormat {
    #[serde(default)]
    pub duration: Option<String>,
}

impl ProbeStream {
    /// `alpha_mode` as a string, from the stream itself or its container tags
    fn alpha_mode(&self) -> Option<String> {
        let direct = self.alpha_mode.as_ref().map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        direct.or_else(|| {
            self.tags
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case("alpha_mode"))
                .map(|(_, value)| value.clone())
        })
    }
}

fn parse_duration(value: Option<&String>) -> Option<f64> {
    value
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
}

/// Extract the first video stream's properties from a full probe dump
pub fn video_properties_from_json(json: &str) -> Result<Option<VideoProperties>, DomainError> {
    let doc: ProbeDocument = serde_json::from_str(json)
        .map_err(|e| DomainError::ProbeFailed(format!("Invalid ffprobe JSON: {}", e)))?;

    let Some(stream) = doc
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
    else {
        return Ok(None);
    };

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(DomainError::ProbeFailed(
                "Video stream does not report its dimensions".to_string(),
            ))
        }
    };

    let duration = parse_duration(stream.duration.as_ref())
        .or_else(|| parse_duration(doc.format.as_ref().and_then(|f| f.duration.as_ref())));
    let fps = stream.r_frame_rate.as_deref().and_then(rules::parse_frame_rate);
    let alpha_mode = stream.alpha_mode();

    Ok(Some(VideoProperties {
        width,
        height,
        duration,
        fps,
        has_alpha: rules::alpha_from_probe(stream.pix_fmt.as_deref(), alpha_mode.as_deref()),
    }))
}

/// Extract alpha fields from a `-select_streams v:0` probe
pub fn alpha_from_json(json: &str) -> AlphaProbe {
    let doc: ProbeDocument = match serde_json::from_str(json) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("Unparseable alpha probe output: {}", e);
            return AlphaProbe::unknown();
        }
    };

    let Some(stream) = doc.streams.first() else {
        return AlphaProbe::unknown();
    };

    let alpha_mode = stream.alpha_mode();
    AlphaProbe {
        has_alpha: rules::alpha_from_probe(stream.pix_fmt.as_deref(), alpha_mode.as_deref()),
        pix_fmt: stream.pix_fmt.clone(),
        alpha_mode,
    }
}

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    program: PathBuf,
}

impl FfprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn video_properties(&self, path: &Path) -> Result<Option<VideoProperties>, DomainError> {
        let output = run_tool(&self.program, &ffmpeg_args::video_probe_command(path)).await?;
        if !output.success() {
            return Err(DomainError::ProbeFailed(format!(
                "ffprobe exited with {} for {}",
                output.status_label(),
                path.display()
            )));
        }
        video_properties_from_json(&output.stdout)
    }

    async fn alpha(&self, path: &Path) -> AlphaProbe {
        match run_tool(&self.program, &ffmpeg_args::alpha_probe_command(path)).await {
            Ok(output) if output.success() => alpha_from_json(&output.stdout),
            Ok(output) => {
                debug!(
                    "ffprobe exited with {} for {}",
                    output.status_label(),
                    path.display()
                );
                AlphaProbe::unknown()
            }
            Err(e) => {
                warn!("Alpha probe failed for {}: {}", path.display(), e);
                AlphaProbe::unknown()
            }
        }
    }
}
