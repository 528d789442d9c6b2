use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::adapters::{locate, FfmpegAdapter, FfprobeAdapter, ImageCodecAdapter, LocalFsAdapter};
use crate::app::{
    background_interactor::BackgroundInteractor, hevc_interactor::HevcInteractor,
    image_interactor::ImageInteractor,
};
use crate::config_initialization::AppConfig;
use crate::ports::{FsPort, ImagePort, MediaToolPort, ProbePort};
use crate::utils::console::Console;

pub trait AppContainer: Send + Sync {
    fn background_interactor(&self) -> Arc<BackgroundInteractor>;
    fn image_interactor(&self) -> Arc<ImageInteractor>;
    fn hevc_interactor(&self) -> Arc<HevcInteractor>;
}

pub struct DefaultAppContainer {
    background_interactor: Arc<BackgroundInteractor>,
    image_interactor: Arc<ImageInteractor>,
    hevc_interactor: Arc<HevcInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig, console: Console) -> Self {
        let tools = &config.tools;
        debug!(
            ffmpeg = %tools.ffmpeg.display(),
            ffprobe = %tools.ffprobe.display(),
            "wiring media tools"
        );

        let cwebp = tools.cwebp.clone().or_else(|| locate(Path::new("cwebp")));
        match &cwebp {
            Some(path) => info!("Lossy WebP via {}", path.display()),
            None => info!("cwebp not found, WebP output will be lossless"),
        }

        let tool_port = Arc::new(FfmpegAdapter::new(&tools.ffmpeg, &tools.ffprobe));
        let probe_port = Arc::new(FfprobeAdapter::new(&tools.ffprobe));
        let image_port = Arc::new(ImageCodecAdapter::new(cwebp));
        let fs_port = Arc::new(LocalFsAdapter::new());

        Self::with_ports(tool_port, probe_port, image_port, fs_port, console)
    }

    /// Wire interactors over the given ports
    pub fn with_ports(
        tool_port: Arc<dyn MediaToolPort>,
        probe_port: Arc<dyn ProbePort>,
        image_port: Arc<dyn ImagePort>,
        fs_port: Arc<dyn FsPort>,
        console: Console,
    ) -> Self {
        let background_interactor = Arc::new(BackgroundInteractor::new(
            Arc::clone(&tool_port),
            Arc::clone(&probe_port),
            Arc::clone(&fs_port),
            console,
        ));

        let image_interactor = Arc::new(ImageInteractor::new(
            Arc::clone(&image_port),
            Arc::clone(&fs_port),
            console,
        ));

        let hevc_interactor = Arc::new(HevcInteractor::new(
            Arc::clone(&tool_port),
            Arc::clone(&probe_port),
            Arc::clone(&fs_port),
            console,
        ));

        Self {
            background_interactor,
            image_interactor,
            hevc_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn background_interactor(&self) -> Arc<BackgroundInteractor> {
        Arc::clone(&self.background_interactor)
    }

    fn image_interactor(&self) -> Arc<ImageInteractor> {
        Arc::clone(&self.image_interactor)
    }

    fn hevc_interactor(&self) -> Arc<HevcInteractor> {
        Arc::clone(&self.hevc_interactor)
    }
}
