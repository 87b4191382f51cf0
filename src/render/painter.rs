use crate::assets::{ImageFit, ImageSource};
use crate::content::model::{ColorField, PosterContent};
use crate::foundation::core::{Rect, Rgba8};
use crate::layout::fit::{TitleFit, fit_title};
use crate::layout::geometry::{Geometry, TextSlot, compute_geometry};
use crate::render::surface::Surface;
use crate::tracklist::{TracklistFlow, layout_tracklist};

/// Poster layers in draw order. Later layers occlude earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Background,
    Template,
    Cover,
    Fade,
    LowerPanel,
    Title,
    Artists,
    Info,
    Swatches,
    Tracklist,
    Frame,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SkippedLayer {
    pub layer: Layer,
    pub reason: String,
}

/// What one paint pass decided and drew.
#[derive(Clone, Debug, serde::Serialize)]
pub struct PaintReport {
    /// Geometry with the auto-fitted title size applied.
    pub geometry: Geometry,
    /// Present when this pass auto-fitted the title; the caller commits it to the content.
    pub title_fit: Option<TitleFit>,
    pub tracklist: Option<TracklistFlow>,
    /// Image layers that failed to load. The poster is still complete without them.
    pub skipped: Vec<SkippedLayer>,
    /// Layers that produced at least one draw, in order.
    pub layers: Vec<Layer>,
}

/// Draw `content` onto `surface`.
///
/// Image failures never abort the pass: the layer is left blank, logged and reported in
/// [`PaintReport::skipped`].
pub fn paint_poster(
    surface: &mut dyn Surface,
    content: &PosterContent,
    images: &mut dyn ImageSource,
) -> PaintReport {
    let mut geometry = compute_geometry(content, surface.size());
    let mut log = PaintLog::default();

    let background = content.color(ColorField::Background);
    let text = content.color(ColorField::Text);

    surface.fill_rect(geometry.canvas, background);
    log.layers.push(Layer::Background);

    if let Some(reference) = content.template() {
        let canvas = geometry.canvas;
        log.image(surface, images, Layer::Template, reference, ImageFit::Stretch, canvas);
    }

    if let (Some(reference), Some(cover)) = (content.active_cover(), geometry.cover) {
        log.image(surface, images, Layer::Cover, reference, ImageFit::Cover, cover);
    }

    if let Some(fade) = &geometry.fade {
        surface.fill_fade(fade, background);
        log.layers.push(Layer::Fade);
    }

    surface.fill_rect(geometry.lower_panel, background);
    log.layers.push(Layer::LowerPanel);

    let mut title_fit = None;
    if content.needs_title_fit() && !content.album_name.is_empty() {
        let fit = fit_title(
            &content.album_name,
            &geometry.title.font,
            geometry.title_fit_limit,
            geometry.scale,
            surface,
        );
        geometry.apply_title_size(fit.size_px);
        title_fit = Some(fit);
    }

    if draw_text(surface, &content.album_name, &geometry.title, text, 1.0) {
        log.layers.push(Layer::Title);
    }
    if draw_text(surface, &content.artists_name, &geometry.artists, text, 1.0) {
        log.layers.push(Layer::Artists);
    }

    let info = &geometry.info;
    let release_label_width = surface.measure(&content.release_label, &info.release_label.font);
    let mut drew_info = false;
    drew_info |= draw_text(surface, &content.release_label, &info.release_label, text, 1.0);
    drew_info |= draw_text(
        surface,
        &content.release_date,
        &info.release_value,
        text,
        info.value_opacity,
    );
    drew_info |= draw_text(
        surface,
        &content.runtime_label,
        &info.runtime_label(release_label_width),
        text,
        1.0,
    );
    drew_info |= draw_text(
        surface,
        &content.runtime,
        &info.runtime_value(release_label_width),
        text,
        info.value_opacity,
    );
    if drew_info {
        log.layers.push(Layer::Info);
    }

    let swatch_colors = [ColorField::Color1, ColorField::Color2, ColorField::Color3];
    for (rect, field) in geometry.swatches.iter().zip(swatch_colors) {
        surface.fill_rect(*rect, content.color(field));
    }
    log.layers.push(Layer::Swatches);

    let mut tracklist = None;
    if let Some(region) = &geometry.tracklist {
        let flow = layout_tracklist(content, region, surface);
        let mut drew = false;
        for line in flow.placed_lines() {
            let mut slot = TextSlot {
                x: line.left_x,
                baseline: line.baseline,
                font: flow.font.clone(),
            };
            drew |= draw_text(surface, &line.left, &slot, text, 1.0);
            if let Some(right_x) = line.right_x {
                slot.x = right_x;
                drew |= draw_text(surface, &line.right, &slot, text, 1.0);
            }
        }
        if drew {
            log.layers.push(Layer::Tracklist);
        }
        tracklist = Some(flow);
    }

    if let Some(frame) = geometry.frame
        && frame.stroke_width > 0.0
    {
        surface.stroke_rect(frame.rect, frame.stroke_width, content.color(ColorField::Frame));
        log.layers.push(Layer::Frame);
    }

    tracing::debug!(
        size = %geometry.size,
        layers = log.layers.len(),
        skipped = log.skipped.len(),
        "poster painted"
    );
    PaintReport {
        geometry,
        title_fit,
        tracklist,
        skipped: log.skipped,
        layers: log.layers,
    }
}

fn draw_text(
    surface: &mut dyn Surface,
    text: &str,
    slot: &TextSlot,
    color: Rgba8,
    opacity: f64,
) -> bool {
    if text.trim().is_empty() || slot.font.size_px <= 0.0 {
        return false;
    }
    surface.fill_text(text, slot, color, opacity);
    true
}

#[derive(Default)]
struct PaintLog {
    layers: Vec<Layer>,
    skipped: Vec<SkippedLayer>,
}

impl PaintLog {
    fn image(
        &mut self,
        surface: &mut dyn Surface,
        images: &mut dyn ImageSource,
        layer: Layer,
        reference: &str,
        fit: ImageFit,
        dest: Rect,
    ) {
        let drawn = images
            .load(reference)
            .and_then(|image| surface.draw_image(&image, fit, dest));
        match drawn {
            Ok(()) => self.layers.push(layer),
            Err(err) => {
                tracing::warn!(?layer, error = %err, "image layer skipped");
                self.skipped.push(SkippedLayer {
                    layer,
                    reason: err.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/painter.rs"]
mod tests;
