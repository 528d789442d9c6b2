// Domain layer - Core business logic

pub mod errors;
pub mod ffmpeg_args;
pub mod model;
pub mod rules;
