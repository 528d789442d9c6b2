use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use mediaprep::adapters::{ImageCodecAdapter, LocalFsAdapter};
use mediaprep::app::{
    BackgroundInteractor, BackgroundRequest, HevcInteractor, HevcRequest, ImageInteractor,
    ImageRequest, Stage,
};
use mediaprep::domain::errors::DomainError;
use mediaprep::domain::model::*;
use mediaprep::ports::{FsPort, ImagePort, MediaToolPort, ProbePort};
use mediaprep::utils::console::Console;

/// Test doubles for the media tool and probe ports
mod fakes {
    use super::*;

    type Responder = Box<dyn Fn(&[String]) -> ToolOutput + Send + Sync>;

    pub struct FakeTools {
        pub ffmpeg_ok: bool,
        pub ffprobe_ok: bool,
        pub encoders: String,
        respond: Responder,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeTools {
        pub fn new(respond: impl Fn(&[String]) -> ToolOutput + Send + Sync + 'static) -> Self {
            Self {
                ffmpeg_ok: true,
                ffprobe_ok: true,
                encoders: " V....D hevc_videotoolbox    VideoToolbox H.265 Encoder".to_string(),
                respond: Box::new(respond),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn succeeding() -> Self {
            Self::new(|_| exit(0, ""))
        }

        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    pub fn exit(code: i32, stderr: &str) -> ToolOutput {
        ToolOutput {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    #[async_trait]
    impl MediaToolPort for FakeTools {
        async fn ffmpeg(&self, args: &[String]) -> Result<ToolOutput, DomainError> {
            self.calls.lock().unwrap().push(args.to_vec());
            Ok((self.respond)(args))
        }

        async fn ffmpeg_available(&self) -> bool {
            self.ffmpeg_ok
        }

        async fn ffprobe_available(&self) -> bool {
            self.ffprobe_ok
        }

        async fn encoders(&self) -> Result<String, DomainError> {
            Ok(self.encoders.clone())
        }
    }

    /// Probe answers keyed by file name
    #[derive(Default)]
    pub struct FakeProbe {
        pub properties: Option<VideoProperties>,
        pub alpha_by_name: HashMap<String, bool>,
    }

    impl FakeProbe {
        pub fn with_video() -> Self {
            Self {
                properties: Some(VideoProperties {
                    width: 320,
                    height: 240,
                    duration: Some(2.0),
                    fps: Some(30.0),
                    has_alpha: true,
                }),
                alpha_by_name: HashMap::new(),
            }
        }

        pub fn with_alpha(names: &[(&str, bool)]) -> Self {
            Self {
                properties: None,
                alpha_by_name: names.iter().map(|(n, a)| (n.to_string(), *a)).collect(),
            }
        }
    }

    #[async_trait]
    impl ProbePort for FakeProbe {
        async fn video_properties(
            &self,
            _path: &Path,
        ) -> Result<Option<VideoProperties>, DomainError> {
            match &self.properties {
                Some(props) => Ok(Some(props.clone())),
                None => Err(DomainError::ProbeFailed("no data".to_string())),
            }
        }

        async fn alpha(&self, path: &Path) -> AlphaProbe {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            match self.alpha_by_name.get(&name) {
                Some(true) => AlphaProbe {
                    pix_fmt: Some("yuva420p".to_string()),
                    alpha_mode: None,
                    has_alpha: true,
                },
                Some(false) => AlphaProbe {
                    pix_fmt: Some("yuv420p".to_string()),
                    alpha_mode: None,
                    has_alpha: false,
                },
                None => AlphaProbe::unknown(),
            }
        }
    }

    /// Image port that fails for inputs whose name contains "broken"
    pub struct SelectiveImagePort {
        inner: ImageCodecAdapter,
    }

    impl SelectiveImagePort {
        pub fn new() -> Self {
            Self {
                inner: ImageCodecAdapter::new(None),
            }
        }
    }

    #[async_trait]
    impl ImagePort for SelectiveImagePort {
        async fn optimize(
            &self,
            input: &Path,
            output_base: &Path,
            settings: &ImageSettings,
        ) -> Result<ImageOutcome, DomainError> {
            if input.to_string_lossy().contains("broken") {
                return Err(DomainError::ImageFailed("cannot decode".to_string()));
            }
            self.inner.optimize(input, output_base, settings).await
        }
    }

    /// Local filesystem that reports files named "locked*" as unreadable
    pub struct LockedFs {
        inner: LocalFsAdapter,
    }

    impl LockedFs {
        pub fn new() -> Self {
            Self {
                inner: LocalFsAdapter::new(),
            }
        }
    }

    #[async_trait]
    impl FsPort for LockedFs {
        async fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path).await
        }

        async fn is_dir(&self, path: &Path) -> bool {
            self.inner.is_dir(path).await
        }

        async fn is_readable(&self, path: &Path) -> bool {
            let locked = path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with("locked"));
            !locked && self.inner.is_readable(path).await
        }

        async fn create_dir_all(&self, path: &Path) -> Result<(), DomainError> {
            self.inner.create_dir_all(path).await
        }

        async fn file_size(&self, path: &Path) -> Result<u64, DomainError> {
            self.inner.file_size(path).await
        }

        async fn read_to_string(&self, path: &Path) -> Result<String, DomainError> {
            self.inner.read_to_string(path).await
        }

        async fn write(&self, path: &Path, content: &str) -> Result<(), DomainError> {
            self.inner.write(path, content).await
        }

        async fn rename(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
            self.inner.rename(from, to).await
        }

        async fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
            self.inner.list_files(dir).await
        }

        async fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
            self.inner.walk_files(dir).await
        }

        async fn canonicalize(&self, path: &Path) -> Result<PathBuf, DomainError> {
            self.inner.canonicalize(path).await
        }
    }
}

use fakes::*;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"data").unwrap();
}

fn single_variant_request(dir: &Path, create_mov: bool) -> BackgroundRequest {
    BackgroundRequest {
        input_dir: dir.to_path_buf(),
        output_dir: dir.join("out"),
        sources: vec![SourceSpec {
            source_name: "clip.webm".to_string(),
            variants: vec![VariantSpec::new("clip-blue.webm", "#4A90E2", "Blue").unwrap()],
        }],
        create_mov,
    }
}

fn background(tools: Arc<FakeTools>, probe: FakeProbe) -> BackgroundInteractor {
    BackgroundInteractor::new(
        tools,
        Arc::new(probe),
        Arc::new(LocalFsAdapter::new()),
        Console::silent(),
    )
}

#[tokio::test]
async fn test_overlay_success_creates_mov_sidecar() {
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("clip.webm"));
    let tools = Arc::new(FakeTools::succeeding());

    let report = background(Arc::clone(&tools), FakeProbe::with_video())
        .execute(single_variant_request(dir.path(), true))
        .await
        .unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.processed, 1);
    assert_eq!(report.successful, 1);
    assert!(report.all_successful());
    assert_eq!(report.variants[0].status, VariantStatus::Overlay);
    assert_eq!(report.variants[0].mov_created, Some(true));
    assert!(dir.path().join("out").is_dir());

    let calls = tools.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].contains(&"[0:v][1:v]overlay".to_string()));
    assert!(calls[0].contains(&"color=c=#4A90E2:size=320x240:duration=2:rate=30".to_string()));
    assert!(calls[1].contains(&"libx264".to_string()));
    assert!(calls[1]
        .last()
        .unwrap()
        .ends_with("clip-blue.mov"));
}

#[tokio::test]
async fn test_colorkey_fallback_after_overlay_failure() {
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("clip.webm"));
    let tools = Arc::new(FakeTools::new(|args| {
        if args.contains(&"[0:v][1:v]overlay".to_string()) {
            exit(1, "overlay exploded")
        } else {
            exit(0, "")
        }
    }));

    let report = background(Arc::clone(&tools), FakeProbe::with_video())
        .execute(single_variant_request(dir.path(), false))
        .await
        .unwrap();

    assert_eq!(report.successful, 1);
    assert_eq!(report.variants[0].status, VariantStatus::Colorkey);
    assert_eq!(report.variants[0].mov_created, None);
    let calls = tools.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].iter().any(|a| a.contains("colorkey=0x000000:0.1:0.1")));
}

#[tokio::test]
async fn test_both_methods_failing_is_counted_not_fatal() {
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("clip.webm"));
    let tools = Arc::new(FakeTools::new(|_| exit(1, "codec not found")));

    let report = background(Arc::clone(&tools), FakeProbe::with_video())
        .execute(single_variant_request(dir.path(), true))
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.successful, 0);
    assert!(!report.all_successful());
    let variant = &report.variants[0];
    assert_eq!(variant.status, VariantStatus::Failed);
    assert!(variant.error.as_deref().unwrap().contains("codec not found"));
    assert_eq!(variant.mov_created, None);
    assert_eq!(tools.calls().len(), 2);
}

#[tokio::test]
async fn test_missing_source_and_probe_failure_fail_the_variant() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools::succeeding());

    let report = background(Arc::clone(&tools), FakeProbe::with_video())
        .execute(single_variant_request(dir.path(), true))
        .await
        .unwrap();
    assert_eq!(report.successful, 0);
    assert!(report.variants[0].error.as_deref().unwrap().contains("not found"));

    touch(&dir.path().join("clip.webm"));
    let report = background(Arc::clone(&tools), FakeProbe::default())
        .execute(single_variant_request(dir.path(), true))
        .await
        .unwrap();
    assert_eq!(report.successful, 0);
    assert!(tools.calls().is_empty());
}

#[tokio::test]
async fn test_failed_mov_sidecar_keeps_variant_successful() {
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("clip.webm"));
    let tools = Arc::new(FakeTools::new(|args| {
        if args.contains(&"libx264".to_string()) {
            exit(1, "libx264 missing")
        } else {
            exit(0, "")
        }
    }));

    let report = background(Arc::clone(&tools), FakeProbe::with_video())
        .execute(single_variant_request(dir.path(), true))
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.successful, 1);
    assert!(report.all_successful());
    assert_eq!(report.variants[0].status, VariantStatus::Overlay);
    assert_eq!(report.variants[0].mov_created, Some(false));
    assert!(report.variants[0].error.is_none());
    assert_eq!(tools.calls().len(), 2);
}

#[tokio::test]
async fn test_background_preflight_errors() {
    let dir = TempDir::new().unwrap();

    let mut tools = FakeTools::succeeding();
    tools.ffprobe_ok = false;
    let err = background(Arc::new(tools), FakeProbe::with_video())
        .execute(single_variant_request(dir.path(), true))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ToolMissing(_)));

    let err = background(Arc::new(FakeTools::succeeding()), FakeProbe::with_video())
        .execute(single_variant_request(&dir.path().join("missing"), true))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::FileNotFound(_)));
}

fn hevc_request(input: &Path, output: &Path) -> HevcRequest {
    HevcRequest {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        bitrate: "8M".to_string(),
        overwrite: false,
        recursive: false,
        sanitize: true,
    }
}

fn hevc(tools: Arc<FakeTools>, probe: FakeProbe) -> HevcInteractor {
    HevcInteractor::new(
        tools,
        Arc::new(probe),
        Arc::new(LocalFsAdapter::new()),
        Console::silent(),
    )
}

#[tokio::test]
async fn test_hevc_statuses_in_lowercase_name_order() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    for name in ["d.webm", "C.webm", "b.MOV", "a.webm", "notes.txt"] {
        touch(&input.join(name));
    }
    touch(&output.join("b.mov"));

    let tools = Arc::new(FakeTools::new(|args| {
        if args.iter().any(|a| a.ends_with("C.webm")) {
            exit(1, "encoder busy")
        } else {
            exit(0, "")
        }
    }));
    let probe = FakeProbe::with_alpha(&[
        ("a.webm", true),
        ("a.mov", true),
        ("d.webm", true),
        ("d.mov", false),
    ]);

    let report = hevc(Arc::clone(&tools), probe)
        .execute(hevc_request(&input, &output))
        .await
        .unwrap();

    let names: Vec<String> = report
        .files
        .iter()
        .map(|f| f.source.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.webm", "b.MOV", "C.webm", "d.webm"]);

    let statuses: Vec<HevcStatus> = report.files.iter().map(|f| f.status.clone()).collect();
    assert_eq!(
        statuses,
        vec![
            HevcStatus::Encoded,
            HevcStatus::SkippedExisting,
            HevcStatus::FfmpegFailed {
                exit: "1".to_string()
            },
            HevcStatus::LostAlpha,
        ]
    );
    assert_eq!(report.total, 4);
    assert_eq!(report.encoded, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 2);
    assert_eq!(report.files[2].output, output.join("C.mov"));

    let calls = tools.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].contains(&"-n".to_string()));
    assert!(calls[0].contains(&"yuva420p".to_string()));
    assert!(calls[0].contains(&"-alpha_quality".to_string()));
    assert!(calls[0].contains(&"8M".to_string()));
}

#[tokio::test]
async fn test_hevc_overwrite_reencodes_existing_outputs() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    touch(&input.join("opaque.webm"));
    touch(&output.join("opaque.mov"));

    let tools = Arc::new(FakeTools::succeeding());
    let mut request = hevc_request(&input, &output);
    request.overwrite = true;

    let report = hevc(Arc::clone(&tools), FakeProbe::default())
        .execute(request)
        .await
        .unwrap();

    assert_eq!(report.encoded, 1);
    let calls = tools.calls();
    assert!(calls[0].contains(&"-y".to_string()));
    assert!(calls[0].contains(&"yuv420p".to_string()));
    assert!(!calls[0].contains(&"-alpha_quality".to_string()));
}

#[tokio::test]
async fn test_hevc_sanitizes_names_with_deduplication() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    touch(&input.join("intro.webm"));
    touch(&input.join("intro\u{200B}.webm"));
    touch(&input.join("\u{0007}outro.webm"));

    let report = hevc(Arc::new(FakeTools::succeeding()), FakeProbe::default())
        .execute(hevc_request(&input, &dir.path().join("out")))
        .await
        .unwrap();

    assert_eq!(report.renamed, 2);
    assert!(input.join("intro (1).webm").exists());
    assert!(input.join("outro.webm").exists());
    assert!(!input.join("intro\u{200B}.webm").exists());
    assert_eq!(report.total, 3);
}

#[tokio::test]
async fn test_hevc_no_sanitize_and_recursive_collection() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    touch(&input.join("top\u{200B}.webm"));
    touch(&input.join("nested").join("deep.mov"));

    let mut request = hevc_request(&input, &dir.path().join("out"));
    request.sanitize = false;
    let report = hevc(Arc::new(FakeTools::succeeding()), FakeProbe::default())
        .execute(request.clone())
        .await
        .unwrap();
    assert_eq!(report.renamed, 0);
    assert_eq!(report.total, 1);
    assert!(input.join("top\u{200B}.webm").exists());

    request.recursive = true;
    let report = hevc(Arc::new(FakeTools::succeeding()), FakeProbe::default())
        .execute(request)
        .await
        .unwrap();
    assert_eq!(report.total, 2);
    assert_eq!(report.files[0].output, dir.path().join("out").join("deep.mov"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_hevc_recursive_run_survives_dangling_symlink() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    touch(&input.join("good.webm"));
    touch(&input.join("nested").join("deep.mov"));
    std::os::unix::fs::symlink(input.join("gone.webm"), input.join("nested").join("stale.webm"))
        .unwrap();

    let mut request = hevc_request(&input, &dir.path().join("out"));
    request.recursive = true;
    request.sanitize = false;
    let report = hevc(Arc::new(FakeTools::succeeding()), FakeProbe::default())
        .execute(request)
        .await
        .unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.encoded, 2);
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn test_hevc_unreadable_source_counts_as_failed() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    touch(&input.join("locked.webm"));
    touch(&input.join("open.webm"));

    let tools = Arc::new(FakeTools::succeeding());
    let interactor = HevcInteractor::new(
        Arc::clone(&tools) as Arc<dyn MediaToolPort>,
        Arc::new(FakeProbe::default()),
        Arc::new(LockedFs::new()),
        Console::silent(),
    );
    let report = interactor
        .execute(hevc_request(&input, &dir.path().join("out")))
        .await
        .unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.files[0].status, HevcStatus::Unreadable);
    assert_eq!(report.files[1].status, HevcStatus::Encoded);
    assert_eq!(report.failed, 1);
    assert_eq!(report.encoded, 1);
    assert_eq!(tools.calls().len(), 1);
}

#[tokio::test]
async fn test_hevc_empty_directory_is_nothing_to_do() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools::succeeding());

    let report = hevc(Arc::clone(&tools), FakeProbe::default())
        .execute(hevc_request(dir.path(), &dir.path().join("out")))
        .await
        .unwrap();

    assert_eq!(report.total, 0);
    assert!(report.files.is_empty());
    assert!(tools.calls().is_empty());
}

#[tokio::test]
async fn test_hevc_preflight_errors() {
    let dir = TempDir::new().unwrap();

    let err = hevc(Arc::new(FakeTools::succeeding()), FakeProbe::default())
        .execute(hevc_request(&dir.path().join("missing"), dir.path()))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::FileNotFound(_)));

    let mut tools = FakeTools::succeeding();
    tools.encoders = " V..... libx265   H.265 / HEVC".to_string();
    let err = hevc(Arc::new(tools), FakeProbe::default())
        .execute(hevc_request(dir.path(), &dir.path().join("out")))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ToolMissing(ref m) if m.contains("hevc_videotoolbox")));
}

fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    image::RgbImage::from_pixel(width, height, image::Rgb([200, 80, 40]))
        .save(path)
        .unwrap();
}

fn image_request(root: &Path) -> ImageRequest {
    ImageRequest {
        root: root.to_path_buf(),
        carousel: Stage::Enabled,
        profile: Stage::Enabled,
        carousel_input_dir: root.join("assets/photos/carousel/new"),
        carousel_output_dir: root.join("assets/photos/carousel_optimized/new"),
        carousel_settings: ImageSettings {
            max_width: 40,
            max_height: 30,
            jpeg_quality: 80,
            webp_quality: 80,
        },
        profile_input: root.join("assets/profile.png"),
        profile_output_base: root.join("assets/profile_optimized"),
        profile_settings: ImageSettings::profile(),
        html_files: vec![root.join("index.html"), root.join("missing/index.html")],
    }
}

#[tokio::test]
async fn test_images_optimize_and_rewrite_html() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_png(&root.join("assets/photos/carousel/new/b.PNG"), 80, 60);
    write_png(&root.join("assets/photos/carousel/new/a.png"), 20, 10);
    touch(&root.join("assets/photos/carousel/new/readme.txt"));
    write_png(&root.join("assets/profile.png"), 30, 30);
    std::fs::write(
        root.join("index.html"),
        r#"<img src="assets/profile.png"><img src="assets/photos/carousel/new/b.PNG"><img src="other.png">"#,
    )
    .unwrap();

    let interactor = ImageInteractor::new(
        Arc::new(ImageCodecAdapter::new(None)),
        Arc::new(LocalFsAdapter::new()),
        Console::silent(),
    );
    let report = interactor.execute(image_request(root)).await.unwrap();

    let originals: Vec<&str> = report.carousel.iter().map(|m| m.original.as_str()).collect();
    assert_eq!(
        originals,
        vec![
            "assets/photos/carousel/new/a.png",
            "assets/photos/carousel/new/b.PNG"
        ]
    );
    assert_eq!(report.carousel[1].jpeg, "assets/photos/carousel_optimized/new/b.jpg");
    assert_eq!(
        report.carousel[1].webp.as_deref(),
        Some("assets/photos/carousel_optimized/new/b.webp")
    );
    let resized = image::open(root.join("assets/photos/carousel_optimized/new/b.jpg")).unwrap();
    assert_eq!((resized.width(), resized.height()), (40, 30));
    assert!(report.carousel_original_bytes > 0);
    assert!(report.carousel_optimized_bytes > 0);

    let profile = report.profile.as_ref().unwrap();
    assert_eq!(profile.jpeg, "assets/profile_optimized.jpg");
    assert!(root.join("assets/profile_optimized.webp").exists());

    assert_eq!(report.html_updates.len(), 1);
    let update = &report.html_updates[0];
    assert_eq!(update.file, "index.html");
    assert!(update.saved);
    assert_eq!(update.changes.len(), 2);
    let html = std::fs::read_to_string(root.join("index.html")).unwrap();
    assert!(html.contains(r#"src="assets/profile_optimized.jpg""#));
    assert!(html.contains(r#"src="assets/photos/carousel_optimized/new/b.jpg""#));
    assert!(html.contains(r#"src="other.png""#));
}

#[tokio::test]
async fn test_images_skip_stages_and_failures_yield_no_mapping() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_png(&root.join("assets/photos/carousel/new/good.png"), 10, 10);
    touch(&root.join("assets/photos/carousel/new/broken.jpg"));
    let html = r#"<img src="assets/profile.png">"#;
    std::fs::write(root.join("index.html"), html).unwrap();

    let interactor = ImageInteractor::new(
        Arc::new(SelectiveImagePort::new()),
        Arc::new(LocalFsAdapter::new()),
        Console::silent(),
    );

    let mut request = image_request(root);
    request.profile = Stage::SkippedByFlag;
    let report = interactor.execute(request).await.unwrap();

    assert!(report.profile.is_none());
    assert_eq!(report.carousel.len(), 1);
    assert_eq!(report.carousel[0].original, "assets/photos/carousel/new/good.png");

    let update = &report.html_updates[0];
    assert!(update.changes.is_empty());
    assert!(!update.saved);
    assert_eq!(std::fs::read_to_string(root.join("index.html")).unwrap(), html);
}

#[tokio::test]
async fn test_images_nothing_enabled_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    std::fs::write(root.join("index.html"), "<html></html>").unwrap();

    let interactor = ImageInteractor::new(
        Arc::new(ImageCodecAdapter::new(None)),
        Arc::new(LocalFsAdapter::new()),
        Console::silent(),
    );
    let mut request = image_request(root);
    request.carousel = Stage::DisabledInConfig;
    request.profile_input = root.join("assets/missing.jpg");

    let report = interactor.execute(request).await.unwrap();
    assert!(report.carousel.is_empty());
    assert!(report.profile.is_none());
    assert!(report.html_updates.is_empty());
    assert!(!root.join("assets/photos/carousel_optimized/new").exists());
}
