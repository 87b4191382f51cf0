use crate::foundation::core::ExportSize;

/// Largest pixel count exported without asking first.
pub const PIXEL_CEILING: u64 = 25_000_000;

/// Width an oversize request is scaled to when the user picks the downscale path.
pub const SAFE_WIDTH: u32 = 4100;

/// Outcome of checking an export request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ExportDecision {
    Proceed { size: ExportSize },
    /// The request exceeds [`PIXEL_CEILING`]; the caller must choose before rendering.
    Confirm { pending: PendingExport },
}

/// Oversize request waiting for the user's choice. Consumed by either choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PendingExport {
    requested: ExportSize,
}

impl PendingExport {
    pub fn requested(&self) -> ExportSize {
        self.requested
    }

    /// Size the downscale path would produce, without choosing it.
    pub fn downscaled_size(&self) -> ExportSize {
        let ExportSize { width, height } = self.requested;
        let h = (f64::from(SAFE_WIDTH) * f64::from(height) / f64::from(width)).round();
        ExportSize {
            width: SAFE_WIDTH,
            height: (h as u32).max(1),
        }
    }

    /// Width becomes [`SAFE_WIDTH`], height keeps the requested aspect ratio.
    pub fn downscale(self) -> ExportSize {
        let size = self.downscaled_size();
        tracing::info!(requested = %self.requested, %size, "export downscaled");
        size
    }

    /// Explicit override: render at the requested size.
    pub fn proceed_anyway(self) -> ExportSize {
        tracing::info!(requested = %self.requested, "oversize export confirmed");
        self.requested
    }
}

/// Check a requested export size against [`PIXEL_CEILING`]. Never changes the size on its own.
pub fn govern(size: ExportSize) -> ExportDecision {
    if size.pixels() > PIXEL_CEILING {
        tracing::debug!(%size, pixels = size.pixels(), "export needs confirmation");
        ExportDecision::Confirm {
            pending: PendingExport { requested: size },
        }
    } else {
        ExportDecision::Proceed { size }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/governor.rs"]
mod tests;
