pub mod fit;
pub mod fonts;
pub mod geometry;

pub use fit::{TitleFit, fit_title};
pub use fonts::{SYSTEM_FONT_STACK, resolve_family};
pub use geometry::{
    FadeBand, FadeGeometry, FrameGeometry, Geometry, InfoGeometry, TextSlot, TracklistRegion,
    compute_geometry,
};
