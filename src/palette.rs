//! Dominant-color sampling for cover art.
//!
//! Sampling never fails loudly: undecodable or unreadable images simply yield no palette, and
//! the content keeps its current colors.

use std::collections::HashMap;

use crate::assets::LoadedImage;
use crate::content::model::PosterContent;
use crate::foundation::core::Rgba8;

/// Side of the square grid the image is resampled to before counting.
pub const SAMPLE_GRID: u32 = 100;
/// Channel quantization step.
pub const QUANT_STEP: u32 = 32;
/// Backgrounds brighter than this get black text.
pub const LUMINANCE_THRESHOLD: f64 = 0.179;
/// Background plus three accents.
pub const MAX_CANDIDATES: usize = 4;

/// Colors suggested for a cover, most frequent first.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Palette {
    /// Up to four quantized colors; the first is the suggested background.
    pub candidates: Vec<Rgba8>,
    /// Black or white, whichever reads better on the background.
    pub text: Rgba8,
}

impl Palette {
    pub fn background(&self) -> Option<Rgba8> {
        self.candidates.first().copied()
    }

    pub fn accents(&self) -> &[Rgba8] {
        self.candidates.get(1..).unwrap_or_default()
    }
}

fn quantize(c: u8) -> u8 {
    let q = (f64::from(c) / f64::from(QUANT_STEP)).round() as u32 * QUANT_STEP;
    q.min(255) as u8
}

fn linear_channel(c: u8) -> f64 {
    let v = f64::from(c) / 255.0;
    if v <= 0.03928 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance with BT.709 weights over linearized sRGB channels.
pub fn relative_luminance(c: Rgba8) -> f64 {
    0.2126 * linear_channel(c.r) + 0.7152 * linear_channel(c.g) + 0.0722 * linear_channel(c.b)
}

/// Black text on light backgrounds, white text otherwise.
pub fn readable_text_color(background: Rgba8) -> Rgba8 {
    if relative_luminance(background) > LUMINANCE_THRESHOLD {
        Rgba8::BLACK
    } else {
        Rgba8::WHITE
    }
}

/// Palette of a decoded bitmap. Returns `None` for an empty image.
pub fn sample_palette(image: &image::RgbaImage) -> Option<Palette> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }
    let grid = image::imageops::resize(
        image,
        SAMPLE_GRID,
        SAMPLE_GRID,
        image::imageops::FilterType::Triangle,
    );

    // Counts plus first-seen order, so ties keep scan order.
    let mut counts: HashMap<Rgba8, (usize, usize)> = HashMap::new();
    for px in grid.pixels() {
        let [r, g, b, _] = px.0;
        let color = Rgba8::rgb(quantize(r), quantize(g), quantize(b));
        let next_order = counts.len();
        counts.entry(color).or_insert((0, next_order)).0 += 1;
    }

    let mut ranked: Vec<(Rgba8, usize, usize)> =
        counts.into_iter().map(|(c, (n, order))| (c, n, order)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let candidates: Vec<Rgba8> = ranked
        .into_iter()
        .take(MAX_CANDIDATES)
        .map(|(c, _, _)| c)
        .collect();
    let background = candidates.first().copied().unwrap_or(Rgba8::BLACK);
    Some(Palette {
        text: readable_text_color(background),
        candidates,
    })
}

/// Palette of encoded image bytes; decode failures are absorbed.
pub fn sample_palette_bytes(bytes: &[u8]) -> Option<Palette> {
    match image::load_from_memory(bytes) {
        Ok(img) => sample_palette(&img.to_rgba8()),
        Err(e) => {
            tracing::debug!(error = %e, "palette sampling skipped, image did not decode");
            None
        }
    }
}

/// Palette of a loaded cover. Unreadable (cross-origin) images yield nothing.
pub fn sample_loaded(image: &LoadedImage) -> Option<Palette> {
    if !image.readable {
        tracing::debug!("palette sampling skipped, image pixels are not readable");
        return None;
    }
    sample_palette(&image.rgba)
}

impl PosterContent {
    /// New snapshot with the palette's suggestions. Missing accents leave the prior colors.
    pub fn apply_palette(&self, palette: &Palette) -> Self {
        let mut next = self.clone();
        if let Some(bg) = palette.background() {
            next.background_color = bg.to_hex();
            next.text_color = palette.text.to_hex();
        }
        let slots = [&mut next.color1, &mut next.color2, &mut next.color3];
        for (slot, accent) in slots.into_iter().zip(palette.accents()) {
            *slot = accent.to_hex();
        }
        next.revision = self.revision.wrapping_add(1);
        next
    }
}

#[cfg(test)]
#[path = "../tests/unit/palette.rs"]
mod tests;
