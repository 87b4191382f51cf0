use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::{ImageFit, LoadedImage, PreparedImage, prepare_image};
use crate::foundation::core::{ExportSize, Rect, Rgba8};
use crate::foundation::error::{PosterError, PosterResult};
use crate::layout::geometry::{FadeGeometry, TextSlot};
use crate::render::backend::{BackendKind, RasterBackend};
use crate::render::surface::{RasterSurface, Surface, stroke_bands, unpremultiply_pixel};
use crate::render::FrameRGBA;
use crate::text::engine::ShapedRun;
use crate::text::{FontSpec, TextLayoutEngine, TextMeasure};

type FontCache = HashMap<(u64, u32), vello_cpu::peniko::FontData>;

/// Software rasterizer on `vello_cpu`. Always available.
#[derive(Default)]
pub struct CpuBackend {
    font_cache: FontCache,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RasterBackend for CpuBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cpu
    }

    fn begin_surface<'a>(
        &'a mut self,
        text: &'a mut TextLayoutEngine,
        size: ExportSize,
    ) -> PosterResult<Box<dyn RasterSurface + 'a>> {
        Ok(Box::new(CpuSurface::new(size, text, &mut self.font_cache)?))
    }
}

pub struct CpuSurface<'a> {
    size: ExportSize,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    text: &'a mut TextLayoutEngine,
    fonts: &'a mut FontCache,
    /// Draws recorded since the pixmap was last rendered.
    dirty: bool,
    tainted: bool,
}

impl<'a> CpuSurface<'a> {
    fn new(
        size: ExportSize,
        text: &'a mut TextLayoutEngine,
        fonts: &'a mut FontCache,
    ) -> PosterResult<Self> {
        let width: u16 = size.width.try_into().map_err(|_| {
            PosterError::backend(format!("cpu surface width {} exceeds u16", size.width))
        })?;
        let height: u16 = size.height.try_into().map_err(|_| {
            PosterError::backend(format!("cpu surface height {} exceeds u16", size.height))
        })?;
        Ok(Self {
            size,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            text,
            fonts,
            dirty: false,
            tainted: false,
        })
    }

    fn sync(&mut self) {
        if !self.dirty {
            return;
        }
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.dirty = false;
    }

    fn fill_rect_cpu(&mut self, rect: Rect, color: Rgba8) {
        if rect.is_zero_area() || color.a == 0 {
            return;
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_rect(&rect_to_cpu(rect));
        self.dirty = true;
    }

    fn ensure_readable(&self) -> PosterResult<()> {
        if self.tainted {
            return Err(PosterError::tainted(
                "an image without cross-origin read permission was drawn",
            ));
        }
        Ok(())
    }
}

impl TextMeasure for CpuSurface<'_> {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f64 {
        self.text.shape(text, font).width
    }
}

impl Surface for CpuSurface<'_> {
    fn size(&self) -> ExportSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.fill_rect_cpu(rect, color);
    }

    fn fill_fade(&mut self, fade: &FadeGeometry, color: Rgba8) {
        for band in fade.bands() {
            let a = (u16::from(color.a) * u16::from(band.alpha) + 127) / 255;
            self.fill_rect_cpu(band.rect, color.with_alpha(a as u8));
        }
    }

    fn draw_image(&mut self, image: &LoadedImage, fit: ImageFit, dest: Rect) -> PosterResult<()> {
        let Some(prepared) = prepare_image(&image.rgba, fit, dest) else {
            return Ok(());
        };
        let paint = image_paint(&prepared)?;
        self.ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(prepared.x),
            f64::from(prepared.y),
        )));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(prepared.width),
            f64::from(prepared.height),
        ));
        self.tainted |= !image.readable;
        self.dirty = true;
        Ok(())
    }

    fn fill_text(&mut self, text: &str, slot: &TextSlot, color: Rgba8, opacity: f64) {
        let line = self.text.shape(text, &slot.font);
        if line.runs.is_empty() {
            return;
        }
        let opacity = opacity.clamp(0.0, 1.0) as f32;

        self.ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            slot.x,
            slot.baseline - line.baseline,
        )));
        self.ctx.set_paint(color_to_cpu(color));
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        for run in &line.runs {
            let font = font_for_run(self.fonts, run);
            self.ctx
                .glyph_run(&font)
                .font_size(run.font_size)
                .fill_glyphs(run.glyphs.iter().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
        }
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
        self.dirty = true;
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Rgba8) {
        if width <= 0.0 {
            return;
        }
        for band in stroke_bands(rect, width) {
            self.fill_rect_cpu(band, color);
        }
    }

    fn read_pixel(&mut self, x: u32, y: u32) -> PosterResult<Rgba8> {
        self.ensure_readable()?;
        if x >= self.size.width || y >= self.size.height {
            return Err(PosterError::validation(format!(
                "pixel ({x}, {y}) outside {}",
                self.size
            )));
        }
        self.sync();
        let idx = (y as usize * self.size.width as usize + x as usize) * 4;
        let data = self.pixmap.data_as_u8_slice();
        Ok(unpremultiply_pixel([
            data[idx],
            data[idx + 1],
            data[idx + 2],
            data[idx + 3],
        ]))
    }
}

impl RasterSurface for CpuSurface<'_> {
    fn readback(&mut self) -> PosterResult<FrameRGBA> {
        self.ensure_readable()?;
        self.sync();
        Ok(FrameRGBA {
            width: self.size.width,
            height: self.size.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn font_for_run(cache: &mut FontCache, run: &ShapedRun) -> vello_cpu::peniko::FontData {
    cache
        .entry(run.font_key())
        .or_insert_with(|| {
            vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(run.font.data.data().to_vec()),
                run.font.index,
            )
        })
        .clone()
}

fn image_paint(img: &PreparedImage) -> PosterResult<vello_cpu::Image> {
    let w: u16 = img
        .width
        .try_into()
        .map_err(|_| PosterError::backend("image width exceeds u16"))?;
    let h: u16 = img
        .height
        .try_into()
        .map_err(|_| PosterError::backend("image height exceeds u16"))?;
    if img.rgba8_premul.len() != img.width as usize * img.height as usize * 4 {
        return Err(PosterError::backend("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels: Vec<_> = img
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
