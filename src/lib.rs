//! mediaprep library
//!
//! Media asset preparation for a static website: solid-background video
//! variants for iOS, JPEG + WebP image optimization with HTML reference
//! rewriting, and HEVC-with-alpha transcoding.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use config_initialization::AppConfig;
pub use domain::errors::DomainError;
pub use domain::model::{BackgroundReport, HevcReport, ImageReport};
pub use error::{MediaPrepError, MediaPrepResult};
