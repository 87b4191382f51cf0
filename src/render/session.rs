use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::assets::{AssetLoader, ImageSource};
use crate::config::RendererOpts;
use crate::content::model::PosterContent;
use crate::foundation::core::ExportSize;
use crate::foundation::error::{PosterError, PosterResult};
use crate::layout::fit::TitleFit;
use crate::layout::geometry::Geometry;
use crate::render::backend::{BackendKind, BackendPreference, RasterBackend, create_backend};
use crate::render::encode::{PngStrategy, encode_png};
use crate::render::painter::{Layer, PaintReport, SkippedLayer, paint_poster};
use crate::render::preview::{PreviewHandle, PreviewStore};
use crate::render::recording::{DrawCommand, RecordingSurface};
use crate::text::TextLayoutEngine;
use crate::tracklist::TracklistFlow;

/// One finished poster.
#[derive(Clone, Debug)]
pub struct RenderedPoster {
    pub width: u32,
    pub height: u32,
    pub png: Arc<Vec<u8>>,
    /// Live until the next render on the same renderer, or until the renderer is dropped.
    pub preview: PreviewHandle,
    /// Commit with [`PosterContent::commit_title_fit`] so later renders keep the size.
    pub title_fit: Option<TitleFit>,
    pub backend: BackendKind,
    pub encoding: PngStrategy,
    pub report: PaintReport,
}

impl RenderedPoster {
    /// Self-contained `data:image/png;base64,...` payload.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(self.png.as_slice()))
    }
}

/// Layout and draw commands for one poster, without rasterizing.
#[derive(Clone, Debug, serde::Serialize)]
pub struct PosterPlan {
    pub size: ExportSize,
    pub geometry: Geometry,
    pub title_fit: Option<TitleFit>,
    pub tracklist: Option<TracklistFlow>,
    pub layers: Vec<Layer>,
    pub skipped: Vec<SkippedLayer>,
    /// Whether an export at this point would fail with `SurfaceTainted`.
    pub tainted: bool,
    pub commands: Vec<DrawCommand>,
}

/// Rendering session: owns the text engine, the image source, backends and the preview handle.
///
/// `render` takes `&mut self`, so one renderer runs one pass at a time. Debouncing edits is up
/// to the caller.
pub struct PosterRenderer {
    preference: BackendPreference,
    text: TextLayoutEngine,
    images: Box<dyn ImageSource>,
    previews: PreviewStore,
    backends: Vec<Box<dyn RasterBackend>>,
}

impl PosterRenderer {
    pub fn new(opts: &RendererOpts) -> PosterResult<Self> {
        let text = TextLayoutEngine::with_font_dirs(&opts.font_dirs)?;
        tracing::debug!(
            font_files = text.registered_files(),
            assets_root = %opts.assets_root.display(),
            backend = %opts.backend,
            "renderer created"
        );
        Ok(Self {
            preference: opts.backend,
            text,
            images: Box::new(AssetLoader::new(opts.assets_root.clone())),
            previews: PreviewStore::new(),
            backends: Vec::new(),
        })
    }

    /// Replace the default [`AssetLoader`].
    pub fn with_images(mut self, images: Box<dyn ImageSource>) -> Self {
        self.images = images;
        self
    }

    pub fn text_engine_mut(&mut self) -> &mut TextLayoutEngine {
        &mut self.text
    }

    pub fn previews(&self) -> &PreviewStore {
        &self.previews
    }

    /// Draw, verify readability, encode and publish a preview.
    ///
    /// Fails with `SurfaceTainted` when an unreadable image made it onto the surface, and with
    /// `Encoding` when no PNG strategy succeeds. Image load failures only skip their layer.
    #[tracing::instrument(skip_all, fields(width = size.width, height = size.height))]
    pub fn render(
        &mut self,
        content: &PosterContent,
        size: ExportSize,
    ) -> PosterResult<RenderedPoster> {
        let kind = BackendKind::detect(self.preference, size);
        let idx = self.backend_index(kind)?;
        let backend = &mut self.backends[idx];
        let kind = backend.kind();

        self.text.begin_pass();
        let mut surface = backend.begin_surface(&mut self.text, size)?;
        let report = paint_poster(surface.as_mut(), content, self.images.as_mut());

        if let Err(err) = surface.read_pixel(0, 0) {
            if matches!(err, PosterError::SurfaceTainted(_)) {
                tracing::warn!(error = %err, "surface tainted, export refused");
            }
            return Err(err);
        }
        let frame = surface.readback()?;
        drop(surface);

        let encoded = encode_png(frame)?;
        let png = Arc::new(encoded.bytes);
        let preview = self.previews.install(Arc::clone(&png));

        tracing::info!(
            %size,
            backend = %kind,
            bytes = png.len(),
            skipped = report.skipped.len(),
            "poster rendered"
        );
        Ok(RenderedPoster {
            width: size.width,
            height: size.height,
            png,
            preview,
            title_fit: report.title_fit,
            backend: kind,
            encoding: encoded.strategy,
            report,
        })
    }

    /// Run the painter against a recording surface, measuring text with the real font engine.
    pub fn plan(&mut self, content: &PosterContent, size: ExportSize) -> PosterPlan {
        self.text.begin_pass();
        let mut surface = RecordingSurface::new(size, &mut self.text);
        let report = paint_poster(&mut surface, content, self.images.as_mut());
        let tainted = surface.is_tainted();
        PosterPlan {
            size,
            geometry: report.geometry,
            title_fit: report.title_fit,
            tracklist: report.tracklist,
            layers: report.layers,
            skipped: report.skipped,
            tainted,
            commands: surface.into_commands(),
        }
    }

    /// Index of a live backend of `kind`, creating it on first use.
    fn backend_index(&mut self, kind: BackendKind) -> PosterResult<usize> {
        if let Some(idx) = self.backends.iter().position(|b| b.kind() == kind) {
            return Ok(idx);
        }
        let backend = match create_backend(kind) {
            Ok(backend) => backend,
            Err(err) if kind != BackendKind::Cpu => {
                tracing::warn!(error = %err, %kind, "backend unavailable, rendering on cpu");
                return self.backend_index(BackendKind::Cpu);
            }
            Err(err) => return Err(err),
        };
        self.backends.push(backend);
        Ok(self.backends.len() - 1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/session.rs"]
mod tests;
