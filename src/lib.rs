#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod content;
pub mod export;
pub mod foundation;
pub mod layout;
pub mod palette;
pub mod render;
pub mod text;
pub mod tracklist;

pub use assets::{AssetLoader, ImageFit, ImageSource, LoadedImage, RemoteFetch, RemoteImage};
pub use config::RendererOpts;
pub use content::model::{ColorField, FontChoice, NumericField, PosterContent};
pub use content::release::{ReleaseInfo, TrackInfo};
pub use export::{ExportDecision, ExportPreset, PendingExport, export_file_name, govern};
pub use foundation::core::{ExportSize, Rgba8};
pub use foundation::error::{PosterError, PosterResult};
pub use layout::{Geometry, TitleFit, compute_geometry, fit_title};
pub use palette::{Palette, sample_palette, sample_palette_bytes};
pub use render::{
    BackendKind, BackendPreference, DrawCommand, PaintReport, PosterPlan, PosterRenderer,
    PreviewHandle, RecordingSurface, RenderedPoster, Surface, paint_poster,
};
pub use text::{FixedAdvanceMeasure, FontSpec, TextLayoutEngine, TextMeasure};
pub use tracklist::{TracklistFlow, flow_tracklist, layout_tracklist, parse_tracklist};
