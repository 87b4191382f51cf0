use crate::assets::{ImageFit, LoadedImage};
use crate::foundation::core::{ExportSize, Rect, Rgba8};
use crate::foundation::error::PosterResult;
use crate::layout::geometry::{FadeGeometry, TextSlot};
use crate::render::FrameRGBA;
use crate::text::TextMeasure;

/// Drawing target for one poster pass.
///
/// Text measurement is part of the surface so layout decisions use the metrics of whatever will
/// actually draw the glyphs.
pub trait Surface: TextMeasure {
    fn size(&self) -> ExportSize;

    fn fill_rect(&mut self, rect: Rect, color: Rgba8);

    /// Vertical gradient from transparent to `color`, painted over `fade.area`.
    fn fill_fade(&mut self, fade: &FadeGeometry, color: Rgba8);

    fn draw_image(&mut self, image: &LoadedImage, fit: ImageFit, dest: Rect) -> PosterResult<()>;

    /// Single line of text with its alphabetic baseline at `slot.baseline`.
    fn fill_text(&mut self, text: &str, slot: &TextSlot, color: Rgba8, opacity: f64);

    /// Stroke centered on `rect`.
    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Rgba8);

    /// Read one pixel back. Fails with `SurfaceTainted` once an unreadable image was drawn.
    fn read_pixel(&mut self, x: u32, y: u32) -> PosterResult<Rgba8>;
}

/// Surface that produces pixels.
pub trait RasterSurface: Surface {
    fn readback(&mut self) -> PosterResult<FrameRGBA>;
}

/// The four bands covered by a stroke of `width` centered on `rect`, with square corners.
pub fn stroke_bands(rect: Rect, width: f64) -> [Rect; 4] {
    let hw = width / 2.0;
    let outer = rect.inflate(hw, hw);
    let inner = rect.inflate(-hw, -hw);
    [
        Rect::new(outer.x0, outer.y0, outer.x1, inner.y0),
        Rect::new(outer.x0, inner.y1, outer.x1, outer.y1),
        Rect::new(outer.x0, inner.y0, inner.x0, inner.y1),
        Rect::new(inner.x1, inner.y0, outer.x1, inner.y1),
    ]
}

/// Straight-alpha color of a premultiplied pixel.
pub fn unpremultiply_pixel(px: [u8; 4]) -> Rgba8 {
    let a = u16::from(px[3]);
    if a == 0 {
        return Rgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        };
    }
    let un = |c: u8| ((u16::from(c) * 255 + a / 2) / a).min(255) as u8;
    Rgba8 {
        r: un(px[0]),
        g: un(px[1]),
        b: un(px[2]),
        a: px[3],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
