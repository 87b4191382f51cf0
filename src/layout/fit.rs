use crate::text::{FontSpec, TextMeasure};

/// Result of auto-fitting the album title.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TitleFit {
    /// Fitted size at the output scale.
    pub size_px: f64,
    /// The same size expressed against the base canvas; this is what gets committed.
    pub base_size: u32,
}

/// Shrink `font` in 1 px steps until `text` fits within `limit`.
///
/// The result is the largest `start - k` (whole `k`) that fits, found by bisecting over `k`
/// since width grows with size. An empty title (or one that already fits) keeps the starting
/// size. Below 1 px the size is reduced proportionally so even absurdly long titles end up
/// within the limit.
pub fn fit_title(
    text: &str,
    font: &FontSpec,
    limit: f64,
    scale: f64,
    measure: &mut dyn TextMeasure,
) -> TitleFit {
    let start = font.size_px;
    let mut size = start;
    let mut width = measure.measure(text, font);

    if width > limit && start > 1.0 {
        // Steps needed to reach 1 px or less.
        let max_steps = (start - 1.0).ceil() as u64;
        let mut width_at =
            |steps: u64| measure.measure(text, &font.with_size(start - steps as f64));

        let floor_width = width_at(max_steps);
        if floor_width > limit {
            size = start - max_steps as f64;
            width = floor_width;
        } else {
            // Invariant: `lo` steps do not fit, `hi` steps do.
            let (mut lo, mut hi) = (0u64, max_steps);
            let mut hi_width = floor_width;
            while hi - lo > 1 {
                let mid = lo + (hi - lo) / 2;
                let w = width_at(mid);
                if w <= limit {
                    hi = mid;
                    hi_width = w;
                } else {
                    lo = mid;
                }
            }
            size = start - hi as f64;
            width = hi_width;
        }
    }

    if width > limit {
        if limit <= 0.0 {
            size = 0.0;
        } else {
            for _ in 0..32 {
                if width <= limit || size <= 0.0 {
                    break;
                }
                size *= (limit / width) * 0.999;
                width = measure.measure(text, &font.with_size(size));
            }
        }
    }

    let base_size = if scale > 0.0 {
        ((size / scale) + 1e-6).floor().max(1.0) as u32
    } else {
        1
    };
    tracing::debug!(
        start = font.size_px,
        fitted = size,
        base_size,
        limit,
        "title auto-fit"
    );
    TitleFit {
        size_px: size,
        base_size,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
