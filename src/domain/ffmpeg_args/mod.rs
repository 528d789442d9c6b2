//! ffmpeg and ffprobe argument lists
//!
//! Every builder returns the arguments without the program name so the
//! execution adapter can prepend whichever binary it resolved.

use std::path::Path;

use crate::domain::model::{HexColor, VideoProperties};

/// VP9 quality used for the solid-background variants
pub const VP9_CRF: &str = "30";

/// H.264 quality used for the `.mov` sidecars
pub const H264_CRF: &str = "23";

/// Encoder name the HEVC alpha transcode requires
pub const HEVC_ENCODER: &str = "hevc_videotoolbox";

/// Even-dimension padding filled with transparent black
const EVEN_PAD_FILTER: &str = "pad=ceil(iw/2)*2:ceil(ih/2)*2:color=#00000000";

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// lavfi source producing a solid frame matching the probed video
pub fn color_source(color: &HexColor, props: &VideoProperties) -> String {
    format!(
        "color=c={}:size={}x{}:duration={}:rate={}",
        color,
        props.width,
        props.height,
        props.effective_duration(),
        props.effective_fps()
    )
}

fn vp9_output(output: &Path) -> Vec<String> {
    let mut out = args(&[
        "-c:v", "libvpx-vp9", "-crf", VP9_CRF, "-b:v", "0", "-pix_fmt", "yuv420p", "-an",
    ]);
    out.push("-shortest".to_string());
    out.push("-y".to_string());
    out.push(path_arg(output));
    out
}

/// Primary method: overlay the source on a generated solid background
pub fn overlay_command(
    input: &Path,
    output: &Path,
    color: &HexColor,
    props: &VideoProperties,
) -> Vec<String> {
    let mut cmd = args(&["-f", "lavfi", "-i"]);
    cmd.push(color_source(color, props));
    cmd.push("-i".to_string());
    cmd.push(path_arg(input));
    cmd.push("-filter_complex".to_string());
    cmd.push("[0:v][1:v]overlay".to_string());
    cmd.extend(vp9_output(output));
    cmd
}

/// Fallback method: key pure black out of the source before overlaying.
///
/// Used for sources whose alpha plane the decoder does not surface.
pub fn colorkey_command(
    input: &Path,
    output: &Path,
    color: &HexColor,
    props: &VideoProperties,
) -> Vec<String> {
    let mut cmd = args(&["-f", "lavfi", "-i"]);
    cmd.push(color_source(color, props));
    cmd.push("-i".to_string());
    cmd.push(path_arg(input));
    cmd.push("-filter_complex".to_string());
    cmd.push(
        "[1:v]format=rgba,colorkey=0x000000:0.1:0.1,format=yuva420p[fg];[0:v][fg]overlay".to_string(),
    );
    cmd.extend(vp9_output(output));
    cmd
}

/// H.264 `.mov` sidecar for players that cannot decode VP9
pub fn mov_sidecar_command(input: &Path, output: &Path) -> Vec<String> {
    let mut cmd = vec!["-i".to_string(), path_arg(input)];
    cmd.extend(args(&[
        "-c:v", "libx264", "-preset", "medium", "-crf", H264_CRF, "-pix_fmt", "yuv420p", "-an", "-y",
    ]));
    cmd.push(path_arg(output));
    cmd
}

/// HEVC transcode that keeps the alpha plane when the source has one
pub fn hevc_alpha_command(
    input: &Path,
    output: &Path,
    bitrate: &str,
    overwrite: bool,
    has_alpha: bool,
) -> Vec<String> {
    let (pix_fmt, encoder_opts): (&str, &[&str]) = if has_alpha {
        ("yuva420p", &["-alpha_quality", "1", "-allow_sw", "1"])
    } else {
        ("yuv420p", &[])
    };
    let filter_chain = format!("{},format={}", EVEN_PAD_FILTER, pix_fmt);

    let mut cmd = args(&["-hide_banner", "-loglevel", "error"]);
    cmd.push(if overwrite { "-y" } else { "-n" }.to_string());
    cmd.push("-i".to_string());
    cmd.push(path_arg(input));
    cmd.push("-vf".to_string());
    cmd.push(filter_chain);
    cmd.extend(args(&["-pix_fmt", pix_fmt, "-c:v", HEVC_ENCODER]));
    cmd.extend(args(encoder_opts));
    cmd.extend(args(&[
        "-tag:v", "hvc1", "-b:v", bitrate, "-movflags", "+faststart", "-an",
    ]));
    cmd.push(path_arg(output));
    cmd
}

/// Encoder listing used to check for the HEVC alpha encoder
pub fn list_encoders_command() -> Vec<String> {
    args(&["-hide_banner", "-encoders"])
}

/// Full format and stream dump in JSON
pub fn video_probe_command(input: &Path) -> Vec<String> {
    let mut cmd = args(&[
        "-v", "quiet", "-print_format", "json", "-show_format", "-show_streams",
    ]);
    cmd.push(path_arg(input));
    cmd
}

/// Just the alpha-relevant fields of the first video stream
pub fn alpha_probe_command(input: &Path) -> Vec<String> {
    let mut cmd = args(&[
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-show_entries",
        "stream=pix_fmt,alpha_mode:stream_tags=alpha_mode",
        "-of",
        "json",
    ]);
    cmd.push(path_arg(input));
    cmd
}
