use std::sync::Arc;

use super::*;
use crate::assets::LoadedImage;
use crate::foundation::core::ExportSize;
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::recording::{DrawCommand, RecordingSurface};
use crate::text::{FixedAdvanceMeasure, TextMeasure};

struct StubImages {
    fail: bool,
    loads: Vec<String>,
}

impl StubImages {
    fn ok() -> Self {
        Self {
            fail: false,
            loads: Vec::new(),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            loads: Vec::new(),
        }
    }
}

impl ImageSource for StubImages {
    fn load(&mut self, reference: &str) -> PosterResult<Arc<LoadedImage>> {
        self.loads.push(reference.to_string());
        if self.fail {
            return Err(PosterError::image_load(format!("{reference}: 404")));
        }
        Ok(Arc::new(LoadedImage::from_rgba(image::RgbaImage::new(4, 4))))
    }
}

fn recording() -> RecordingSurface<FixedAdvanceMeasure> {
    RecordingSurface::new(ExportSize::BASE, FixedAdvanceMeasure)
}

fn full_content() -> PosterContent {
    PosterContent {
        album_name: "Album".to_string(),
        artists_name: "Artist".to_string(),
        release_date: "2024".to_string(),
        runtime: "41:00".to_string(),
        tracklist: "1. One — 1:00".to_string(),
        show_tracklist: true,
        framed: true,
        album_cover: "cover.png".to_string(),
        template_image: Some("template.png".to_string()),
        ..PosterContent::default()
    }
}

#[test]
fn layers_are_drawn_in_the_fixed_order() {
    let mut surface = recording();
    let mut images = StubImages::ok();
    let report = paint_poster(&mut surface, &full_content(), &mut images);

    assert_eq!(
        report.layers,
        vec![
            Layer::Background,
            Layer::Template,
            Layer::Cover,
            Layer::Fade,
            Layer::LowerPanel,
            Layer::Title,
            Layer::Artists,
            Layer::Info,
            Layer::Swatches,
            Layer::Tracklist,
            Layer::Frame,
        ]
    );
    assert_eq!(images.loads, vec!["template.png", "cover.png"]);

    let cmds = surface.commands();
    assert!(matches!(
        &cmds[0],
        DrawCommand::FillRect { rect, .. } if *rect == report.geometry.canvas
    ));
    assert!(matches!(
        &cmds[1],
        DrawCommand::DrawImage { fit: ImageFit::Stretch, .. }
    ));
    assert!(matches!(
        &cmds[2],
        DrawCommand::DrawImage { fit: ImageFit::Cover, .. }
    ));
    assert!(matches!(&cmds[3], DrawCommand::FillFade { .. }));
    assert!(matches!(cmds.last(), Some(DrawCommand::StrokeRect { .. })));
}

#[test]
fn failed_images_are_skipped_without_aborting() {
    let mut surface = recording();
    let mut images = StubImages::failing();
    let report = paint_poster(&mut surface, &full_content(), &mut images);

    let skipped: Vec<Layer> = report.skipped.iter().map(|s| s.layer).collect();
    assert_eq!(skipped, vec![Layer::Template, Layer::Cover]);
    assert!(report.skipped[1].reason.contains("cover.png"));
    assert!(!report.layers.contains(&Layer::Cover));
    assert!(report.layers.contains(&Layer::Frame));
}

#[test]
fn empty_fields_are_not_drawn() {
    let mut surface = recording();
    let content = PosterContent {
        release_label: String::new(),
        runtime_label: "  ".to_string(),
        ..PosterContent::default()
    };
    let report = paint_poster(&mut surface, &content, &mut StubImages::ok());
    assert_eq!(surface.texts().count(), 0);
    assert!(report.title_fit.is_none());
    assert!(!report.layers.contains(&Layer::Title));
    assert!(!report.layers.contains(&Layer::Info));
    assert!(!report.layers.contains(&Layer::Cover));
}

#[test]
fn title_is_fitted_once_and_reported() {
    let long = PosterContent {
        album_name: "An Exceedingly Long Album Title".to_string(),
        ..PosterContent::default()
    };
    let mut surface = recording();
    let report = paint_poster(&mut surface, &long, &mut StubImages::ok());
    let fit = report.title_fit.expect("fit reported");
    assert!(fit.size_px < 200.0);
    let (_, x, _) = surface.texts().next().unwrap();
    assert_eq!(x, 160.0);
    let width = FixedAdvanceMeasure.measure(&long.album_name, &report.geometry.title.font);
    assert!(width <= report.geometry.title_fit_limit);

    let committed = long.commit_title_fit(&fit);
    let mut surface = recording();
    let report = paint_poster(&mut surface, &committed, &mut StubImages::ok());
    assert!(report.title_fit.is_none());
    assert_eq!(report.geometry.title.font.size_px, f64::from(fit.base_size));
}

#[test]
fn runtime_column_follows_the_release_label() {
    let content = PosterContent {
        release_date: "2024".to_string(),
        runtime: "41:00".to_string(),
        ..PosterContent::default()
    };
    let mut surface = recording();
    let report = paint_poster(&mut surface, &content, &mut StubImages::ok());
    let texts: Vec<_> = surface.texts().collect();
    let find = |t: &str| texts.iter().find(|(s, _, _)| *s == t).copied().unwrap();

    let label_font = &report.geometry.info.release_label.font;
    let label_width = FixedAdvanceMeasure.measure("RELEASE", label_font);
    let expected_x = 160.0 + label_width + 100.0;
    assert!((find("RUNTIME").1 - expected_x).abs() < 1e-9);
    assert!((find("41:00").1 - expected_x).abs() < 1e-9);
    assert_eq!(find("2024").2, 3390.0);
    assert_eq!(find("RELEASE").2, 3310.0);
}

#[test]
fn swatches_use_the_accent_colors() {
    let mut surface = recording();
    let report = paint_poster(&mut surface, &PosterContent::default(), &mut StubImages::ok());
    let swatches: Vec<_> = surface
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::FillRect { rect, color } if report.geometry.swatches.contains(rect) => {
                Some(color.to_hex())
            }
            _ => None,
        })
        .collect();
    assert_eq!(swatches, vec!["#ff0000", "#00ff40", "#2600ff"]);
}
