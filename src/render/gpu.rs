use std::collections::HashMap;
use std::sync::OnceLock;

use crate::assets::{ImageFit, LoadedImage, prepare_image};
use crate::foundation::core::{ExportSize, Rect, Rgba8};
use crate::foundation::error::{PosterError, PosterResult};
use crate::layout::geometry::{FadeGeometry, TextSlot};
use crate::render::FrameRGBA;
use crate::render::backend::{BackendKind, RasterBackend};
use crate::render::surface::{RasterSurface, Surface, stroke_bands, unpremultiply_pixel};
use crate::text::engine::ShapedRun;
use crate::text::{FontSpec, TextLayoutEngine, TextMeasure};

type FontCache = HashMap<(u64, u32), vello::peniko::FontData>;

/// Limits of the default adapter, probed once per process.
#[derive(Clone, Debug)]
pub struct GpuCaps {
    pub adapter: String,
    pub max_texture_dimension_2d: u32,
    pub max_buffer_size: u64,
}

impl GpuCaps {
    /// Whether a render target and its padded readback buffer fit the adapter.
    pub fn fits(&self, size: ExportSize) -> bool {
        if size.width > self.max_texture_dimension_2d || size.height > self.max_texture_dimension_2d
        {
            return false;
        }
        let row = u64::from(align_to(
            size.width.saturating_mul(4),
            vello::wgpu::COPY_BYTES_PER_ROW_ALIGNMENT,
        ));
        row * u64::from(size.height) <= self.max_buffer_size
    }
}

pub fn probe_caps() -> Option<GpuCaps> {
    static CAPS: OnceLock<Option<GpuCaps>> = OnceLock::new();
    CAPS.get_or_init(|| {
        let instance = vello::wgpu::Instance::new(&vello::wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&adapter_options())).ok()?;
        let limits = adapter.limits();
        let caps = GpuCaps {
            adapter: adapter.get_info().name,
            max_texture_dimension_2d: limits.max_texture_dimension_2d,
            max_buffer_size: limits.max_buffer_size,
        };
        tracing::debug!(
            adapter = %caps.adapter,
            max_dim = caps.max_texture_dimension_2d,
            "gpu probed"
        );
        Some(caps)
    })
    .clone()
}

fn adapter_options() -> vello::wgpu::RequestAdapterOptions<'static, 'static> {
    vello::wgpu::RequestAdapterOptions {
        power_preference: vello::wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }
}

/// `vello` scene encoding rendered through `wgpu`.
pub struct GpuBackend {
    device: vello::wgpu::Device,
    queue: vello::wgpu::Queue,
    renderer: vello::Renderer,
    font_cache: FontCache,
}

impl GpuBackend {
    pub fn new() -> PosterResult<Self> {
        let instance = vello::wgpu::Instance::new(&vello::wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&adapter_options())).map_err(
            |e| match e {
                vello::wgpu::RequestAdapterError::NotFound { .. } => {
                    PosterError::backend("no gpu adapter available")
                }
                other => PosterError::backend(format!("wgpu request_adapter failed: {other:?}")),
            },
        )?;

        let (device, queue) =
            pollster::block_on(adapter.request_device(&vello::wgpu::DeviceDescriptor {
                label: Some("plastered"),
                required_features: vello::wgpu::Features::empty(),
                required_limits: adapter.limits(),
                experimental_features: vello::wgpu::ExperimentalFeatures::default(),
                memory_hints: vello::wgpu::MemoryHints::Performance,
                trace: vello::wgpu::Trace::Off,
            }))
            .map_err(|e| PosterError::backend(format!("wgpu request_device failed: {e:?}")))?;

        let renderer = vello::Renderer::new(&device, vello::RendererOptions::default())
            .map_err(|e| PosterError::backend(format!("vello renderer init failed: {e:?}")))?;

        Ok(Self {
            device,
            queue,
            renderer,
            font_cache: HashMap::new(),
        })
    }
}

impl RasterBackend for GpuBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Gpu
    }

    fn begin_surface<'a>(
        &'a mut self,
        text: &'a mut TextLayoutEngine,
        size: ExportSize,
    ) -> PosterResult<Box<dyn RasterSurface + 'a>> {
        Ok(Box::new(GpuSurface {
            size,
            backend: self,
            text,
            scene: vello::Scene::new(),
            rendered: None,
            tainted: false,
        }))
    }
}

pub struct GpuSurface<'a> {
    size: ExportSize,
    backend: &'a mut GpuBackend,
    text: &'a mut TextLayoutEngine,
    scene: vello::Scene,
    /// Premultiplied pixels of the last render. Cleared by every draw.
    rendered: Option<Vec<u8>>,
    tainted: bool,
}

impl GpuSurface<'_> {
    fn ensure_readable(&self) -> PosterResult<()> {
        if self.tainted {
            return Err(PosterError::tainted(
                "an image without cross-origin read permission was drawn",
            ));
        }
        Ok(())
    }

    fn canvas(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            f64::from(self.size.width),
            f64::from(self.size.height),
        )
    }

    fn fill(&mut self, rect: Rect, color: Rgba8) {
        if rect.is_zero_area() || color.a == 0 {
            return;
        }
        self.scene.fill(
            vello::peniko::Fill::NonZero,
            vello::kurbo::Affine::IDENTITY,
            color_to_gpu(color),
            None,
            &rect_to_gpu(rect),
        );
        self.rendered = None;
    }

    fn pixels(&mut self) -> PosterResult<&[u8]> {
        if self.rendered.is_none() {
            self.rendered = Some(self.render()?);
        }
        self.rendered
            .as_deref()
            .ok_or_else(|| PosterError::backend("gpu render produced no pixels"))
    }

    fn render(&mut self) -> PosterResult<Vec<u8>> {
        let (width, height) = (self.size.width, self.size.height);
        let backend = &mut *self.backend;
        let device = &backend.device;

        let texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("plastered_target"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::TEXTURE_BINDING
                | vello::wgpu::TextureUsages::RENDER_ATTACHMENT
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        backend
            .renderer
            .render_to_texture(
                device,
                &backend.queue,
                &self.scene,
                &view,
                &vello::RenderParams {
                    base_color: vello::peniko::Color::from_rgba8(0, 0, 0, 0),
                    width,
                    height,
                    antialiasing_method: vello::AaConfig::Area,
                },
            )
            .map_err(|e| PosterError::backend(format!("vello render failed: {e:?}")))?;

        let row_bytes = width
            .checked_mul(4)
            .ok_or_else(|| PosterError::backend("render target width overflow"))?;
        let padded_row_bytes = align_to(row_bytes, vello::wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        let readback = device.create_buffer(&vello::wgpu::BufferDescriptor {
            label: Some("plastered_readback"),
            size: u64::from(padded_row_bytes) * u64::from(height),
            usage: vello::wgpu::BufferUsages::MAP_READ | vello::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
            label: Some("plastered_readback_encoder"),
        });
        encoder.copy_texture_to_buffer(
            vello::wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: vello::wgpu::Origin3d::ZERO,
                aspect: vello::wgpu::TextureAspect::All,
            },
            vello::wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: vello::wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(height),
                },
            },
            vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        backend.queue.submit(Some(encoder.finish()));

        let buffer_slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(vello::wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        device
            .poll(vello::wgpu::PollType::wait_indefinitely())
            .map_err(|e| PosterError::backend(format!("wgpu poll failed: {e:?}")))?;
        rx.recv()
            .map_err(|_| PosterError::backend("readback channel closed"))?
            .map_err(|e| PosterError::backend(format!("readback map failed: {e:?}")))?;

        let mapped = buffer_slice.get_mapped_range();
        let mut out = Vec::with_capacity(row_bytes as usize * height as usize);
        for row in 0..height as usize {
            let start = row * padded_row_bytes as usize;
            out.extend_from_slice(&mapped[start..start + row_bytes as usize]);
        }
        drop(mapped);
        readback.unmap();
        tracing::debug!(width, height, "gpu frame read back");
        Ok(out)
    }
}

impl TextMeasure for GpuSurface<'_> {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f64 {
        self.text.shape(text, font).width
    }
}

impl Surface for GpuSurface<'_> {
    fn size(&self) -> ExportSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.fill(rect, color);
    }

    fn fill_fade(&mut self, fade: &FadeGeometry, color: Rgba8) {
        for band in fade.bands() {
            let a = (u16::from(color.a) * u16::from(band.alpha) + 127) / 255;
            self.fill(band.rect, color.with_alpha(a as u8));
        }
    }

    fn draw_image(&mut self, image: &LoadedImage, fit: ImageFit, dest: Rect) -> PosterResult<()> {
        let Some(prepared) = prepare_image(&image.rgba, fit, dest) else {
            return Ok(());
        };
        let data = vello::peniko::ImageData {
            data: vello::peniko::Blob::from(prepared.rgba8_premul),
            format: vello::peniko::ImageFormat::Rgba8,
            alpha_type: vello::peniko::ImageAlphaType::AlphaPremultiplied,
            width: prepared.width,
            height: prepared.height,
        };
        self.scene.draw_image(
            &data,
            vello::kurbo::Affine::translate((f64::from(prepared.x), f64::from(prepared.y))),
        );
        self.tainted |= !image.readable;
        self.rendered = None;
        Ok(())
    }

    fn fill_text(&mut self, text: &str, slot: &TextSlot, color: Rgba8, opacity: f64) {
        use vello::peniko::{BlendMode, Fill};

        let line = self.text.shape(text, &slot.font);
        if line.runs.is_empty() {
            return;
        }
        let opacity = opacity.clamp(0.0, 1.0) as f32;
        let transform = vello::kurbo::Affine::translate((slot.x, slot.baseline - line.baseline));

        if opacity < 1.0 {
            self.scene.push_layer(
                Fill::NonZero,
                BlendMode::default(),
                opacity,
                vello::kurbo::Affine::IDENTITY,
                &rect_to_gpu(self.canvas()),
            );
        }
        for run in &line.runs {
            let font = font_for_run(&mut self.backend.font_cache, run);
            self.scene
                .draw_glyphs(&font)
                .transform(transform)
                .font_size(run.font_size)
                .brush(color_to_gpu(color))
                .draw(
                    Fill::NonZero,
                    run.glyphs.iter().map(|g| vello::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    }),
                );
        }
        if opacity < 1.0 {
            self.scene.pop_layer();
        }
        self.rendered = None;
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Rgba8) {
        if width <= 0.0 {
            return;
        }
        for band in stroke_bands(rect, width) {
            self.fill(band, color);
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
        let idx = (y as usize * self.size.width as usize + x as usize) * 4;
        let data = self.pixels()?;
        Ok(unpremultiply_pixel([
            data[idx],
            data[idx + 1],
            data[idx + 2],
            data[idx + 3],
        ]))
    }
}

impl RasterSurface for GpuSurface<'_> {
    fn readback(&mut self) -> PosterResult<FrameRGBA> {
        self.ensure_readable()?;
        let data = self.pixels()?.to_vec();
        Ok(FrameRGBA {
            width: self.size.width,
            height: self.size.height,
            data,
            premultiplied: true,
        })
    }
}

fn align_to(value: u32, alignment: u32) -> u32 {
    let mask = alignment - 1;
    (value + mask) & !mask
}

fn color_to_gpu(c: Rgba8) -> vello::peniko::Color {
    vello::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn rect_to_gpu(r: Rect) -> vello::kurbo::Rect {
    vello::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn font_for_run(cache: &mut FontCache, run: &ShapedRun) -> vello::peniko::FontData {
    cache
        .entry(run.font_key())
        .or_insert_with(|| {
            vello::peniko::FontData::new(
                vello::peniko::Blob::from(run.font.data.data().to_vec()),
                run.font.index,
            )
        })
        .clone()
}

#[cfg(test)]
#[path = "../../tests/unit/render/gpu.rs"]
mod tests;
