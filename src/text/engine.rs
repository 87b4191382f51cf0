use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{PosterError, PosterResult};
use crate::text::{FontSpec, TextMeasure};

/// Glyph position relative to the top-left corner of its shaped line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// Glyphs sharing one font face and size.
#[derive(Clone, Debug)]
pub struct ShapedRun {
    pub font: parley::FontData,
    pub font_size: f32,
    pub glyphs: Vec<PositionedGlyph>,
}

impl ShapedRun {
    /// Stable key of the font blob, used by backends to cache converted font handles.
    pub fn font_key(&self) -> (u64, u32) {
        (self.font.data.id(), self.font.index)
    }
}

/// Single unwrapped line of shaped text.
#[derive(Clone, Debug, Default)]
pub struct ShapedLine {
    pub width: f64,
    /// Distance from the top of the line box to the alphabetic baseline.
    pub baseline: f64,
    pub runs: Vec<ShapedRun>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LayoutKey {
    text: String,
    family: String,
    size_bits: u64,
    bold: bool,
}

/// Parley-backed shaping for poster text.
///
/// Owns the font collection (system fonts plus any registered font files) and a per-pass cache
/// of shaped lines, since the painter measures the same strings several times per render.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    cache: HashMap<LayoutKey, Arc<ShapedLine>>,
    registered_files: usize,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            cache: HashMap::new(),
            registered_files: 0,
        }
    }

    /// Engine with every font file found in `dirs` registered on top of the system collection.
    pub fn with_font_dirs(dirs: &[PathBuf]) -> PosterResult<Self> {
        let mut engine = Self::new();
        for dir in dirs {
            engine.register_font_dir(dir)?;
        }
        Ok(engine)
    }

    /// Register `.ttf`, `.otf` and `.ttc` files directly inside `dir`. A missing directory is
    /// skipped with a warning.
    pub fn register_font_dir(&mut self, dir: &Path) -> PosterResult<usize> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    dir = %dir.display(),
                    error = %e,
                    "font directory unreadable, skipping"
                );
                return Ok(0);
            }
        };

        let mut count = 0usize;
        for entry in entries {
            let path = entry
                .map_err(|e| {
                    PosterError::validation(format!("read font dir '{}': {e}", dir.display()))
                })?
                .path();
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
                .unwrap_or(false);
            if !is_font {
                continue;
            }
            let bytes = std::fs::read(&path).map_err(|e| {
                PosterError::validation(format!("read font file '{}': {e}", path.display()))
            })?;
            self.register_font_bytes(bytes)?;
            count += 1;
        }
        tracing::debug!(dir = %dir.display(), count, "registered font files");
        Ok(count)
    }

    /// Register raw font bytes; returns the family names the file provided.
    pub fn register_font_bytes(&mut self, bytes: Vec<u8>) -> PosterResult<Vec<String>> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes), None);
        if families.is_empty() {
            return Err(PosterError::validation(
                "no font families registered from font bytes",
            ));
        }
        self.cache.clear();
        self.registered_files += 1;
        Ok(families
            .iter()
            .filter_map(|(id, _)| self.font_ctx.collection.family_name(*id).map(str::to_string))
            .collect())
    }

    pub fn registered_files(&self) -> usize {
        self.registered_files
    }

    /// Drop cached layouts. Called at the start of every render pass.
    pub fn begin_pass(&mut self) {
        self.cache.clear();
    }

    /// Shape `text` as one line. Results are cached until the next [`Self::begin_pass`].
    pub fn shape(&mut self, text: &str, font: &FontSpec) -> Arc<ShapedLine> {
        let key = LayoutKey {
            text: text.to_string(),
            family: font.family.clone(),
            size_bits: font.size_px.to_bits(),
            bold: font.bold,
        };
        if let Some(line) = self.cache.get(&key) {
            return Arc::clone(line);
        }
        let line = Arc::new(self.shape_uncached(text, font));
        self.cache.insert(key, Arc::clone(&line));
        line
    }

    fn shape_uncached(&mut self, text: &str, font: &FontSpec) -> ShapedLine {
        let size_px = font.size_px as f32;
        if text.is_empty() || !size_px.is_finite() || size_px <= 0.0 {
            return ShapedLine::default();
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        if font.bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut out = ShapedLine {
            width: f64::from(layout.width()),
            ..ShapedLine::default()
        };
        if let Some(first) = layout.lines().next() {
            out.baseline = f64::from(first.metrics().baseline);
        }
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run
                    .positioned_glyphs()
                    .map(|g| PositionedGlyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                    .collect();
                out.runs.push(ShapedRun {
                    font: run.run().font().clone(),
                    font_size: run.run().font_size(),
                    glyphs,
                });
            }
        }
        out
    }
}

impl TextMeasure for TextLayoutEngine {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f64 {
        self.shape(text, font).width
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
