use crate::content::model::{NumericField, PosterContent};
use crate::foundation::core::{ExportSize, Rect};
use crate::layout::fonts::resolve_family;
use crate::text::FontSpec;

/// Opacity of the release date and runtime value line.
pub const VALUE_OPACITY: f64 = 0.7;
/// Line advance of tracklist rows relative to the font size.
pub const TRACK_LINE_FACTOR: f64 = 1.3;
/// Gap between the title and duration fields of one column, relative to the font size.
pub const TRACK_FIELD_GAP_FACTOR: f64 = 2.5;

/// Where one piece of text goes: left edge, alphabetic baseline and font.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextSlot {
    pub x: f64,
    pub baseline: f64,
    pub font: FontSpec,
}

/// Vertical fade from transparent to the background color over the cover.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FadeGeometry {
    /// Region the gradient is painted over.
    pub area: Rect,
    /// Length of the gradient line, starting at y = 0.
    pub gradient_len: f64,
}

/// One horizontal strip of constant fade alpha.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FadeBand {
    pub rect: Rect,
    pub alpha: u8,
}

impl FadeGeometry {
    /// Gradient stop where the fade starts (transparent).
    pub const START: f64 = 0.5;
    /// Gradient stop where the fade is fully opaque.
    pub const END: f64 = 0.8;

    /// Fade alpha in `0.0..=1.0` at vertical position `y`.
    pub fn alpha_at(&self, y: f64) -> f64 {
        if self.gradient_len <= 0.0 {
            return 1.0;
        }
        let t = y / self.gradient_len;
        ((t - Self::START) / (Self::END - Self::START)).clamp(0.0, 1.0)
    }

    /// The gradient quantized into pixel rows of equal 8-bit alpha. Fully transparent rows are
    /// omitted.
    pub fn bands(&self) -> Vec<FadeBand> {
        let top = self.area.y0.max(0.0).floor() as i64;
        let bottom = self.area.y1.ceil() as i64;
        let mut out: Vec<FadeBand> = Vec::new();
        for row in top..bottom {
            let y = row as f64;
            let alpha = (self.alpha_at(y + 0.5) * 255.0).round() as u8;
            if alpha == 0 {
                continue;
            }
            let y1 = (y + 1.0).min(self.area.y1);
            match out.last_mut() {
                Some(band) if band.alpha == alpha && band.rect.y1 == y => band.rect.y1 = y1,
                _ => out.push(FadeBand {
                    rect: Rect::new(self.area.x0, y, self.area.x1, y1),
                    alpha,
                }),
            }
        }
        out
    }
}

/// Release/runtime info row.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct InfoGeometry {
    /// Release label; the runtime label follows it on the same baseline.
    pub release_label: TextSlot,
    /// Release date; the runtime value follows it on the same baseline.
    pub release_value: TextSlot,
    /// Space between the end of the release label and the runtime column.
    pub runtime_offset: f64,
    pub value_opacity: f64,
}

impl InfoGeometry {
    /// Left edge of the runtime column, given the measured release label width.
    pub fn runtime_x(&self, release_label_width: f64) -> f64 {
        self.release_label.x + release_label_width + self.runtime_offset
    }

    pub fn runtime_label(&self, release_label_width: f64) -> TextSlot {
        TextSlot {
            x: self.runtime_x(release_label_width),
            ..self.release_label.clone()
        }
    }

    pub fn runtime_value(&self, release_label_width: f64) -> TextSlot {
        TextSlot {
            x: self.runtime_x(release_label_width),
            ..self.release_value.clone()
        }
    }
}

/// Region the tracklist flows into.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TracklistRegion {
    pub rect: Rect,
    /// A new column starts once the next row would reach this y.
    pub max_text_height: f64,
    /// Left edge of the first column.
    pub start_x: f64,
    pub line_height: f64,
    pub field_gap: f64,
    pub column_gap: f64,
    pub font: FontSpec,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameGeometry {
    /// Stroke centerline, inset by half the stroke width.
    pub rect: Rect,
    pub stroke_width: f64,
}

/// Absolute pixel geometry of every poster element for one output size.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Geometry {
    pub size: ExportSize,
    pub scale: f64,
    pub canvas: Rect,
    pub cover: Option<Rect>,
    pub fade: Option<FadeGeometry>,
    pub lower_panel: Rect,
    pub title: TextSlot,
    pub artists: TextSlot,
    pub info: InfoGeometry,
    pub swatches: [Rect; 3],
    pub tracklist: Option<TracklistRegion>,
    pub frame: Option<FrameGeometry>,
    /// Widest the title may be after auto-fit.
    pub title_fit_limit: f64,
}

impl Geometry {
    /// Use an auto-fitted title size.
    pub fn apply_title_size(&mut self, size_px: f64) {
        self.title.font.size_px = size_px;
    }
}

/// Map content to pixel geometry at `size`. Every constant is relative to the 2480-wide base
/// canvas and multiplied by `size.width / 2480`.
pub fn compute_geometry(content: &PosterContent, size: ExportSize) -> Geometry {
    let s = size.scale();
    let w = f64::from(size.width);
    let h = f64::from(size.height);
    let px = |field: NumericField| f64::from(content.numeric(field)) * s;

    let margin_top = px(NumericField::MarginTop);
    let margin_side = px(NumericField::MarginSide);
    let margin_cover = px(NumericField::MarginCover);
    let margin_background = px(NumericField::MarginBackground);
    let artists_raw = content.numeric(NumericField::ArtistsSize);
    let artists_size = f64::from(artists_raw) * s;

    let title_family = resolve_family(&content.title_font);
    let artist_family = resolve_family(&content.artist_font);
    let tracks_family = resolve_family(&content.tracks_font);

    let cover_side = w - 2.0 * margin_cover;
    let cover = (cover_side > 0.0).then(|| {
        Rect::new(
            margin_cover,
            margin_cover,
            margin_cover + cover_side,
            margin_cover + cover_side,
        )
    });

    let fade = content.use_fade.then(|| FadeGeometry {
        area: Rect::new(0.0, 0.0, w, (2500.0 * s - margin_background).max(0.0)),
        gradient_len: 3000.0 * s - margin_background,
    });

    let panel_top = (2480.0 * s - margin_background).clamp(0.0, h);
    let lower_panel = Rect::new(0.0, panel_top, w, h);

    let tracklist_title_baseline = 2500.0 * s + margin_top;
    let (title_baseline, artists_baseline) = if content.show_tracklist {
        (
            tracklist_title_baseline,
            tracklist_title_baseline + artists_size * TRACK_LINE_FACTOR,
        )
    } else {
        let title = 2790.0 * s + margin_top;
        (title, title + artists_size)
    };

    let title = TextSlot {
        x: margin_side,
        baseline: title_baseline,
        font: FontSpec::bold(title_family, px(NumericField::TitleSize)),
    };
    let artists = TextSlot {
        x: margin_side,
        baseline: artists_baseline,
        font: FontSpec::bold(artist_family.clone(), artists_size),
    };

    let info = InfoGeometry {
        release_label: TextSlot {
            x: margin_side,
            baseline: 3310.0 * s,
            font: FontSpec::bold(artist_family.clone(), 70.0 * s),
        },
        release_value: TextSlot {
            x: margin_side,
            baseline: 3390.0 * s,
            font: FontSpec::bold(artist_family, 60.0 * s),
        },
        runtime_offset: 100.0 * s,
        value_opacity: VALUE_OPACITY,
    };

    let swatch = |x: f64| {
        Rect::new(
            x * s - margin_side,
            3368.0 * s,
            (x + 145.0) * s - margin_side,
            3398.0 * s,
        )
    };
    let swatches = [swatch(2045.0), swatch(2190.0), swatch(2335.0)];

    let tracklist = content.show_tracklist.then(|| {
        // A zero artists size collapses the artist line; keep the gap of the default size.
        let artists_gap = if artists_raw == 0 {
            110.0 * s * 1.2
        } else {
            artists_size * TRACK_LINE_FACTOR
        };
        let rect_y = tracklist_title_baseline + artists_gap + 130.0 * s;
        let rect_height = 500.0 * s;
        let rect_width = w - 2.0 * margin_side;
        let font_size = px(NumericField::TracksSize);
        TracklistRegion {
            rect: Rect::new(
                margin_side,
                rect_y,
                margin_side + rect_width,
                rect_y + rect_height,
            ),
            max_text_height: rect_y + rect_height - 10.0 * s - margin_top,
            start_x: margin_side + 10.0 * s,
            line_height: font_size * TRACK_LINE_FACTOR,
            field_gap: font_size * TRACK_FIELD_GAP_FACTOR,
            column_gap: px(NumericField::ColumnGap),
            font: FontSpec::bold(tracks_family, font_size),
        }
    });

    let frame = content.framed.then(|| {
        let fw = px(NumericField::FrameWidth);
        FrameGeometry {
            rect: Rect::new(fw / 2.0, fw / 2.0, w - fw / 2.0, h - fw / 2.0),
            stroke_width: fw,
        }
    });

    Geometry {
        size,
        scale: s,
        canvas: Rect::new(0.0, 0.0, w, h),
        cover,
        fade,
        lower_panel,
        title,
        artists,
        info,
        swatches,
        tracklist,
        frame,
        title_fit_limit: w - 2.0 * margin_side,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
