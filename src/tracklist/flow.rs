use crate::layout::geometry::TracklistRegion;
use crate::text::{FontSpec, TextMeasure};
use crate::tracklist::parse::TrackLine;

/// One tracklist row placed on the canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlacedLine {
    pub left: String,
    pub right: String,
    pub left_x: f64,
    /// Right-aligned x of the duration, `None` when there is no duration.
    pub right_x: Option<f64>,
    pub baseline: f64,
    pub left_width: f64,
    pub right_width: f64,
}

/// One packed column: its rows share an x and a right edge.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FlowColumn {
    pub x: f64,
    pub width: f64,
    pub max_left: f64,
    pub max_right: f64,
    pub lines: Vec<PlacedLine>,
}

/// Packed and placed tracklist.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TracklistFlow {
    pub font: FontSpec,
    pub columns: Vec<FlowColumn>,
    /// Rows that did not fit horizontally and are not drawn.
    pub dropped_lines: usize,
}

impl TracklistFlow {
    pub fn placed_lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.columns.iter().flat_map(|c| c.lines.iter())
    }
}

struct MeasuredLine<'a> {
    line: &'a TrackLine,
    left_width: f64,
    right_width: f64,
}

#[derive(Default)]
struct PackedColumn<'a> {
    lines: Vec<MeasuredLine<'a>>,
    max_left: f64,
    max_right: f64,
}

/// Greedy single-pass column packing followed by left-to-right placement.
///
/// Columns that would start at or beyond the right edge of the region are not emitted; their
/// rows are counted in [`TracklistFlow::dropped_lines`].
pub fn flow_tracklist(
    lines: &[TrackLine],
    region: &TracklistRegion,
    measure: &mut dyn TextMeasure,
) -> TracklistFlow {
    let top = region.rect.y0;
    let lh = region.line_height;

    let mut packed: Vec<PackedColumn<'_>> = Vec::new();
    let mut current = PackedColumn::default();
    let mut y_cursor = top;
    for line in lines {
        let left_width = measure.measure(&line.left, &region.font);
        let right_width = if line.right.is_empty() {
            0.0
        } else {
            measure.measure(&line.right, &region.font)
        };

        if y_cursor + lh >= region.max_text_height {
            if !current.lines.is_empty() {
                packed.push(std::mem::take(&mut current));
            }
            y_cursor = top;
        }
        current.max_left = current.max_left.max(left_width);
        current.max_right = current.max_right.max(right_width);
        current.lines.push(MeasuredLine {
            line,
            left_width,
            right_width,
        });
        y_cursor += lh;
    }
    if !current.lines.is_empty() {
        packed.push(current);
    }

    let right_edge = region.rect.x1;
    let mut columns = Vec::with_capacity(packed.len());
    let mut dropped_lines = 0usize;
    let mut x = region.start_x;
    for col in packed {
        if x >= right_edge {
            dropped_lines += col.lines.len();
            continue;
        }
        let width = col.max_left + col.max_right + region.field_gap;
        let placed = col
            .lines
            .iter()
            .enumerate()
            .map(|(row, m)| PlacedLine {
                left: m.line.left.clone(),
                right: m.line.right.clone(),
                left_x: x,
                right_x: (!m.line.right.is_empty()).then(|| x + width - m.right_width),
                baseline: top + row as f64 * lh,
                left_width: m.left_width,
                right_width: m.right_width,
            })
            .collect();
        columns.push(FlowColumn {
            x,
            width,
            max_left: col.max_left,
            max_right: col.max_right,
            lines: placed,
        });
        x += width + region.column_gap;
    }

    if dropped_lines > 0 {
        tracing::debug!(
            dropped_lines,
            columns = columns.len(),
            "tracklist rows beyond the region were dropped"
        );
    }

    TracklistFlow {
        font: region.font.clone(),
        columns,
        dropped_lines,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracklist/flow.rs"]
mod tests;
