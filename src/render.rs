pub mod backend;
pub mod cpu;
pub mod encode;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod painter;
pub mod preview;
pub mod recording;
pub mod session;
pub mod surface;

pub use backend::{BackendKind, BackendPreference, RasterBackend, create_backend};
pub use encode::{EncodedPng, PngStrategy, encode_png};
pub use painter::{Layer, PaintReport, SkippedLayer, paint_poster};
pub use preview::{PreviewHandle, PreviewStore};
pub use recording::{DrawCommand, RecordingSurface};
pub use session::{PosterPlan, PosterRenderer, RenderedPoster};
pub use surface::{RasterSurface, Surface};

/// Pixels read back from a finished surface.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major, tightly packed.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixels.
    pub fn into_straight(mut self) -> Self {
        if self.premultiplied {
            crate::assets::decode::unpremultiply_rgba8_in_place(&mut self.data);
            self.premultiplied = false;
        }
        self
    }
}
