use crate::assets::{ImageFit, LoadedImage};
use crate::foundation::core::{ExportSize, Point, Rect, Rgba8};
use crate::foundation::error::{PosterError, PosterResult};
use crate::layout::geometry::{FadeGeometry, TextSlot};
use crate::render::surface::Surface;
use crate::text::{FontSpec, TextMeasure};

/// One recorded drawing primitive.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Rgba8,
    },
    FillFade {
        area: Rect,
        gradient_len: f64,
        color: Rgba8,
    },
    DrawImage {
        fit: ImageFit,
        dest: Rect,
        source_width: u32,
        source_height: u32,
        readable: bool,
    },
    FillText {
        text: String,
        x: f64,
        baseline: f64,
        font: FontSpec,
        color: Rgba8,
        opacity: f64,
        /// Advance width as measured by the surface.
        width: f64,
    },
    StrokeRect {
        rect: Rect,
        width: f64,
        color: Rgba8,
    },
}

/// Surface that records primitives instead of rasterizing them.
pub struct RecordingSurface<M> {
    size: ExportSize,
    measure: M,
    commands: Vec<DrawCommand>,
    tainted: bool,
}

impl<M: TextMeasure> RecordingSurface<M> {
    pub fn new(size: ExportSize, measure: M) -> Self {
        Self {
            size,
            measure,
            commands: Vec::new(),
            tainted: false,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn is_tainted(&self) -> bool {
        self.tainted
    }

    /// Recorded text draws as `(text, x, baseline)`.
    pub fn texts(&self) -> impl Iterator<Item = (&str, f64, f64)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillText {
                text, x, baseline, ..
            } => Some((text.as_str(), *x, *baseline)),
            _ => None,
        })
    }
}

impl<M: TextMeasure> TextMeasure for RecordingSurface<M> {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f64 {
        self.measure.measure(text, font)
    }
}

impl<M: TextMeasure> Surface for RecordingSurface<M> {
    fn size(&self) -> ExportSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_fade(&mut self, fade: &FadeGeometry, color: Rgba8) {
        self.commands.push(DrawCommand::FillFade {
            area: fade.area,
            gradient_len: fade.gradient_len,
            color,
        });
    }

    fn draw_image(&mut self, image: &LoadedImage, fit: ImageFit, dest: Rect) -> PosterResult<()> {
        self.tainted |= !image.readable;
        self.commands.push(DrawCommand::DrawImage {
            fit,
            dest,
            source_width: image.width(),
            source_height: image.height(),
            readable: image.readable,
        });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, slot: &TextSlot, color: Rgba8, opacity: f64) {
        let width = self.measure.measure(text, &slot.font);
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x: slot.x,
            baseline: slot.baseline,
            font: slot.font.clone(),
            color,
            opacity,
            width,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Rgba8) {
        self.commands
            .push(DrawCommand::StrokeRect { rect, width, color });
    }

    /// Color of the topmost recorded rect fill covering the pixel center.
    fn read_pixel(&mut self, x: u32, y: u32) -> PosterResult<Rgba8> {
        if self.tainted {
            return Err(PosterError::tainted(
                "an image without cross-origin read permission was drawn",
            ));
        }
        let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        let color = self
            .commands
            .iter()
            .rev()
            .find_map(|c| match c {
                DrawCommand::FillRect { rect, color } if rect.contains(p) => Some(*color),
                _ => None,
            })
            .unwrap_or(Rgba8 {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            });
        Ok(color)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recording.rs"]
mod tests;
