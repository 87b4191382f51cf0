use anyhow::Context;

use crate::foundation::core::Rect;
use crate::foundation::error::{PosterError, PosterResult};

/// How a bitmap is mapped onto its destination rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFit {
    /// Center-crop to the destination aspect ratio, then scale to fill it.
    Cover,
    /// Scale each axis independently to the destination.
    Stretch,
}

/// Bitmap resampled to its exact destination pixels, ready to blit.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Vec<u8>,
}

/// Decode encoded bytes (PNG, JPEG, ...) into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> PosterResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| PosterError::image_load(format!("{e:#}")))?;
    Ok(dyn_img.to_rgba8())
}

/// Integer pixel box covered by `rect`, or `None` when it is empty.
pub fn pixel_box(rect: Rect) -> Option<(i32, i32, u32, u32)> {
    let x0 = rect.x0.round();
    let y0 = rect.y0.round();
    let w = rect.x1.round() - x0;
    let h = rect.y1.round() - y0;
    if !(w >= 1.0 && h >= 1.0) || !x0.is_finite() || !y0.is_finite() {
        return None;
    }
    Some((x0 as i32, y0 as i32, w as u32, h as u32))
}

/// Resample `src` for `dest` according to `fit` and premultiply it.
pub fn prepare_image(src: &image::RgbaImage, fit: ImageFit, dest: Rect) -> Option<PreparedImage> {
    let (x, y, width, height) = pixel_box(dest)?;
    if src.width() == 0 || src.height() == 0 {
        return None;
    }
    let fitted = fit_image(src, fit, width, height);
    let mut rgba8_premul = fitted.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    Some(PreparedImage {
        x,
        y,
        width,
        height,
        rgba8_premul,
    })
}

/// Resample to exactly `width` x `height`.
pub fn fit_image(
    src: &image::RgbaImage,
    fit: ImageFit,
    width: u32,
    height: u32,
) -> image::RgbaImage {
    let filter = image::imageops::FilterType::Triangle;
    match fit {
        ImageFit::Stretch => image::imageops::resize(src, width, height, filter),
        ImageFit::Cover => {
            let (sw, sh) = (f64::from(src.width()), f64::from(src.height()));
            let scale = (f64::from(width) / sw).max(f64::from(height) / sh);
            let crop_w = (f64::from(width) / scale).round().clamp(1.0, sw) as u32;
            let crop_h = (f64::from(height) / scale).round().clamp(1.0, sh) as u32;
            let crop_x = (src.width() - crop_w) / 2;
            let crop_y = (src.height() - crop_h) / 2;
            let cropped =
                image::imageops::crop_imm(src, crop_x, crop_y, crop_w, crop_h).to_image();
            image::imageops::resize(&cropped, width, height, filter)
        }
    }
}

pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Inverse of [`premultiply_rgba8_in_place`], used before encoding.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
