// Adapters - External system implementations

pub mod config_file;
pub mod exec_ffmpeg;
pub mod fs_local;
pub mod image_codec;
pub mod probe_ffprobe;

// Re-export adapters
pub use config_file::ConfigFileAdapter;
pub use exec_ffmpeg::{locate, FfmpegAdapter};
pub use fs_local::LocalFsAdapter;
pub use image_codec::ImageCodecAdapter;
pub use probe_ffprobe::FfprobeAdapter;
