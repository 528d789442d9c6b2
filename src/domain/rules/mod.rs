// Domain rules - Sizing, probing and naming policies

use unicode_normalization::UnicodeNormalization;
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

use crate::domain::model::*;

/// Pixel-format prefixes that carry an alpha plane
const ALPHA_PIX_FMT_PREFIXES: &[&str] = &[
    "yuva", "rgba", "bgra", "argb", "abgr", "gbrap", "ya8", "ya16", "pal8",
];

/// Fit `width`x`height` inside the max box, preserving aspect ratio.
///
/// Never upscales. Truncates like an integer cast and never returns a
/// zero-sized edge.
pub fn optimal_size(width: u32, height: u32, max_width: u32, max_height: u32) -> Dimensions {
    if width == 0 || height == 0 {
        return Dimensions::new(width, height);
    }

    let ratio = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );

    if ratio >= 1.0 {
        return Dimensions::new(width, height);
    }

    let new_width = ((width as f64 * ratio) as u32).max(1);
    let new_height = ((height as f64 * ratio) as u32).max(1);
    Dimensions::new(new_width, new_height)
}

/// Parse an ffprobe rational such as `30000/1001`.
pub fn parse_frame_rate(value: &str) -> Option<f64> {
    let value = value.trim();
    match value.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 || num == 0.0 {
                None
            } else {
                Some(num / den)
            }
        }
        None => value.parse::<f64>().ok().filter(|fps| *fps > 0.0),
    }
}

/// Whether a pixel format name includes an alpha channel
pub fn pix_fmt_has_alpha(pix_fmt: &str) -> bool {
    let lowered = pix_fmt.trim().to_lowercase();
    ALPHA_PIX_FMT_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

/// Combine the pixel format with the WebM `alpha_mode` side flag.
///
/// VP8/VP9 in WebM decode as `yuv420p` and only advertise transparency
/// through `alpha_mode=1`.
pub fn alpha_from_probe(pix_fmt: Option<&str>, alpha_mode: Option<&str>) -> bool {
    let by_format = pix_fmt.map(pix_fmt_has_alpha).unwrap_or(false);
    let by_mode = alpha_mode
        .and_then(|mode| mode.trim().parse::<i64>().ok())
        .map(|mode| mode == 1)
        .unwrap_or(false);
    by_format || by_mode
}

/// Unicode format characters (general category Cf), e.g. bidi marks and BOM
fn is_format_char(ch: char) -> bool {
    ch.general_category() == GeneralCategory::Format
}

/// Normalize a file name to NFC and drop control and format characters.
pub fn clean_file_name(name: &str) -> String {
    let normalized: String = name.nfc().collect();
    normalized
        .chars()
        .filter(|ch| (*ch as u32) >= 0x20 && !is_format_char(*ch))
        .collect::<String>()
        .trim()
        .to_string()
}

/// `"{base} ({index}){ext}"`, where `ext` includes its dot or is empty
pub fn deduplicated_name(base: &str, ext: &str, index: usize) -> String {
    format!("{} ({}){}", base, index, ext)
}

/// Size reduction in percent; negative when the output grew
pub fn reduction_percent(original: u64, optimized: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - optimized as f64 / original as f64) * 100.0
}

/// Replace `src="<original>"` with `src="<jpeg>"` for every mapping.
///
/// Returns the rewritten document and one change per mapping that matched
/// at least once.
pub fn rewrite_src_references(html: &str, mappings: &[ImageMapping]) -> (String, Vec<ReferenceChange>) {
    let mut content = html.to_string();
    let mut changes = Vec::new();

    for mapping in mappings {
        let old_pattern = format!("src=\"{}\"", mapping.original);
        let new_pattern = format!("src=\"{}\"", mapping.jpeg);

        if old_pattern != new_pattern && content.contains(&old_pattern) {
            content = content.replace(&old_pattern, &new_pattern);
            changes.push(ReferenceChange {
                original: mapping.original.clone(),
                replacement: mapping.jpeg.clone(),
            });
        }
    }

    (content, changes)
}

/// ffmpeg bitrate such as `8M`, `2500k` or `800000`
pub fn is_valid_bitrate(value: &str) -> bool {
    let digits = value.trim_end_matches(|c| matches!(c, 'k' | 'K' | 'm' | 'M' | 'g' | 'G'));
    let suffix_len = value.len() - digits.len();
    !digits.is_empty()
        && suffix_len <= 1
        && digits.chars().all(|c| c.is_ascii_digit())
        && digits.chars().any(|c| c != '0')
}

/// Whether an extension (without dot) is a source image the optimizer accepts
pub fn is_source_image_ext(ext: &str) -> bool {
    matches!(ext.to_lowercase().as_str(), "jpg" | "jpeg" | "png")
}

/// Whether an extension (without dot) is a video the HEVC transcoder accepts
pub fn is_source_video_ext(ext: &str) -> bool {
    matches!(ext.to_lowercase().as_str(), "webm" | "mov")
}
