use std::fmt;
use std::str::FromStr;

use crate::foundation::core::ExportSize;
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::surface::RasterSurface;
use crate::text::TextLayoutEngine;

/// Rasterizer implementation compiled into this build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Cpu,
    #[cfg(feature = "gpu")]
    Gpu,
}

/// Which backend the caller asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendPreference {
    #[default]
    Auto,
    Cpu,
    Gpu,
}

impl fmt::Display for BackendPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Cpu => "cpu",
            Self::Gpu => "gpu",
        })
    }
}

impl FromStr for BackendPreference {
    type Err = PosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            "gpu" => Ok(Self::Gpu),
            other => Err(PosterError::validation(format!(
                "unknown backend '{other}' (expected auto, cpu or gpu)"
            ))),
        }
    }
}

impl BackendKind {
    /// Pick a backend for one render of `size`.
    ///
    /// The GPU is used only when it is compiled in, an adapter exists and the target fits its
    /// texture and buffer limits. Everything else renders on the CPU.
    pub fn detect(pref: BackendPreference, size: ExportSize) -> Self {
        match pref {
            BackendPreference::Cpu => Self::Cpu,
            BackendPreference::Auto | BackendPreference::Gpu => Self::detect_gpu(pref, size),
        }
    }

    #[cfg(feature = "gpu")]
    fn detect_gpu(pref: BackendPreference, size: ExportSize) -> Self {
        match crate::render::gpu::probe_caps() {
            Some(caps) if caps.fits(size) => Self::Gpu,
            Some(caps) => {
                tracing::warn!(
                    %size,
                    max_dim = caps.max_texture_dimension_2d,
                    "target exceeds gpu limits, rendering on cpu"
                );
                Self::Cpu
            }
            None => {
                if pref == BackendPreference::Gpu {
                    tracing::warn!("no gpu adapter available, rendering on cpu");
                }
                Self::Cpu
            }
        }
    }

    #[cfg(not(feature = "gpu"))]
    fn detect_gpu(pref: BackendPreference, _size: ExportSize) -> Self {
        if pref == BackendPreference::Gpu {
            tracing::warn!("built without the `gpu` feature, rendering on cpu");
        }
        Self::Cpu
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cpu => "cpu",
            #[cfg(feature = "gpu")]
            Self::Gpu => "gpu",
        })
    }
}

/// Factory for per-pass raster surfaces. Backends keep device state and caches between passes.
pub trait RasterBackend {
    fn kind(&self) -> BackendKind;

    /// Fresh transparent surface of `size`. Text is shaped through `text`.
    fn begin_surface<'a>(
        &'a mut self,
        text: &'a mut TextLayoutEngine,
        size: ExportSize,
    ) -> PosterResult<Box<dyn RasterSurface + 'a>>;
}

pub fn create_backend(kind: BackendKind) -> PosterResult<Box<dyn RasterBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new())),
        #[cfg(feature = "gpu")]
        BackendKind::Gpu => Ok(Box::new(crate::render::gpu::GpuBackend::new()?)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
