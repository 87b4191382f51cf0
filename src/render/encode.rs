use image::ImageEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use crate::foundation::error::{PosterError, PosterResult};
use crate::render::FrameRGBA;

/// One way of turning a frame into PNG bytes. Tried in [`PngStrategy::CHAIN`] order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PngStrategy {
    /// RGBA8, default compression, adaptive filtering.
    Rgba8,
    /// RGB8 with alpha dropped, fast compression, no filtering.
    Rgb8Fast,
}

impl PngStrategy {
    pub const CHAIN: [Self; 2] = [Self::Rgba8, Self::Rgb8Fast];
}

#[derive(Clone, Debug)]
pub struct EncodedPng {
    pub bytes: Vec<u8>,
    pub strategy: PngStrategy,
}

/// Encode a finished frame, falling back through the strategy chain.
pub fn encode_png(frame: FrameRGBA) -> PosterResult<EncodedPng> {
    encode_with(frame.into_straight(), &PngStrategy::CHAIN, encode_strategy)
}

pub(crate) fn encode_with(
    frame: FrameRGBA,
    chain: &[PngStrategy],
    mut encode: impl FnMut(&FrameRGBA, PngStrategy) -> PosterResult<Vec<u8>>,
) -> PosterResult<EncodedPng> {
    let mut failures = Vec::new();
    for &strategy in chain {
        match encode(&frame, strategy) {
            Ok(bytes) => {
                return Ok(EncodedPng { bytes, strategy });
            }
            Err(err) => {
                tracing::warn!(?strategy, error = %err, "png encoding failed, trying next");
                failures.push(format!("{strategy:?}: {err}"));
            }
        }
    }
    Err(PosterError::encoding(format!(
        "every png strategy failed ({})",
        failures.join("; ")
    )))
}

fn encode_strategy(frame: &FrameRGBA, strategy: PngStrategy) -> PosterResult<Vec<u8>> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(PosterError::encoding(format!(
            "frame holds {} bytes, expected {expected}",
            frame.data.len()
        )));
    }

    let mut out = Vec::new();
    let written = match strategy {
        PngStrategy::Rgba8 => {
            PngEncoder::new_with_quality(&mut out, CompressionType::Default, FilterType::Adaptive)
                .write_image(
                    &frame.data,
                    frame.width,
                    frame.height,
                    image::ExtendedColorType::Rgba8,
                )
        }
        PngStrategy::Rgb8Fast => {
            let rgb: Vec<u8> = frame
                .data
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            PngEncoder::new_with_quality(&mut out, CompressionType::Fast, FilterType::NoFilter)
                .write_image(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
        }
    };
    written.map_err(|e| PosterError::encoding(format!("png {strategy:?}: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
