pub mod decode;
pub mod loader;

use std::sync::Arc;

pub use decode::{ImageFit, PreparedImage, decode_image, prepare_image};
pub use loader::{AssetLoader, ImageSource, RemoteFetch, RemoteImage};

/// Decoded straight-alpha bitmap plus whether its pixels may be read back.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    pub rgba: Arc<image::RgbaImage>,
    /// `false` for cross-origin images without read permission. Drawing one taints the surface.
    pub readable: bool,
}

impl LoadedImage {
    pub fn from_rgba(rgba: image::RgbaImage) -> Self {
        Self {
            rgba: Arc::new(rgba),
            readable: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}
