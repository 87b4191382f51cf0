use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{PosterError, PosterResult};

pub use kurbo::{Point, Rect};

/// Width of the reference layout. Every absolute layout constant is expressed against it.
pub const BASE_WIDTH: u32 = 2480;
/// Height of the reference layout (portrait, close to the A-series ratio).
pub const BASE_HEIGHT: u32 = 3508;

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse `#RRGGBB`. The leading `#` is optional.
    pub fn from_hex(s: &str) -> PosterResult<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PosterError::validation(format!(
                "expected a 6-digit hex color, got '{s}'"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| PosterError::validation(format!("invalid hex color '{s}': {e}")))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Canonical `#rrggbb` form. Alpha is not encoded.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Premultiplied channels, as stored by the raster surfaces.
    pub fn premultiplied(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| ((u16::from(c) * a + 127) / 255) as u8;
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Output resolution of one render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ExportSize {
    pub width: u32,
    pub height: u32,
}

impl ExportSize {
    /// The reference layout size.
    pub const BASE: Self = Self {
        width: BASE_WIDTH,
        height: BASE_HEIGHT,
    };

    /// The on-screen preview canvas (one fifth of the reference layout).
    pub const PREVIEW: Self = Self {
        width: 496,
        height: 702,
    };

    pub fn new(width: u32, height: u32) -> PosterResult<Self> {
        if width == 0 || height == 0 {
            return Err(PosterError::validation(format!(
                "export size must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn pixels(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Linear factor applied to every layout constant: `width / 2480`.
    pub fn scale(self) -> f64 {
        f64::from(self.width) / f64::from(BASE_WIDTH)
    }
}

impl fmt::Display for ExportSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ExportSize {
    type Err = PosterError;

    /// Parse `WxH` (also accepts `×` and uppercase `X`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['×', 'X'], "x");
        let (w, h) = normalized
            .split_once('x')
            .ok_or_else(|| PosterError::validation(format!("expected WxH, got '{s}'")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| PosterError::validation(format!("invalid size '{s}': {e}")))
        };
        Self::new(parse(w)?, parse(h)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
