pub mod engine;

pub use engine::{PositionedGlyph, ShapedLine, ShapedRun, TextLayoutEngine};

/// Width ratio per character used by [`FixedAdvanceMeasure`].
pub const FIXED_ADVANCE_RATIO: f64 = 0.55;

/// Resolved font request for one piece of poster text.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FontSpec {
    /// CSS-like family list, e.g. `"Open Sans"` or `system-ui, Arial`.
    pub family: String,
    pub size_px: f64,
    pub bold: bool,
}

impl FontSpec {
    /// Poster text is always set in bold.
    pub fn bold(family: impl Into<String>, size_px: f64) -> Self {
        Self {
            family: family.into(),
            size_px,
            bold: true,
        }
    }

    pub fn with_size(&self, size_px: f64) -> Self {
        Self {
            size_px,
            ..self.clone()
        }
    }
}

/// Horizontal advance of a single line of text.
///
/// Layout decisions (title fit, tracklist column widths, runtime label offset) go through this
/// trait so they always agree with the metrics of whatever is drawing the text.
pub trait TextMeasure {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f64;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &mut T {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f64 {
        (**self).measure(text, font)
    }
}

/// Deterministic approximation: every character advances by `size * 0.55`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedAdvanceMeasure;

impl TextMeasure for FixedAdvanceMeasure {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f64 {
        text.chars().count() as f64 * font.size_px * FIXED_ADVANCE_RATIO
    }
}

#[cfg(test)]
#[path = "../tests/unit/text.rs"]
mod tests;
