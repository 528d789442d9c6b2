// Application layer - Use case interactors

pub mod background_interactor;
pub mod container;
pub mod hevc_interactor;
pub mod image_interactor;

// Re-export interactors
pub use background_interactor::{BackgroundInteractor, BackgroundRequest};
pub use container::{AppContainer, DefaultAppContainer};
pub use hevc_interactor::{HevcInteractor, HevcRequest};
pub use image_interactor::{ImageInteractor, ImageRequest, Stage};
