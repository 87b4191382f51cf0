pub mod flow;
pub mod parse;

pub use flow::{FlowColumn, PlacedLine, TracklistFlow, flow_tracklist};
pub use parse::{TrackLine, parse_track_line, parse_tracklist};

use crate::content::model::PosterContent;
use crate::layout::geometry::TracklistRegion;
use crate::text::TextMeasure;

/// Parse the content's tracklist and flow it into `region`.
pub fn layout_tracklist(
    content: &PosterContent,
    region: &TracklistRegion,
    measure: &mut dyn TextMeasure,
) -> TracklistFlow {
    let lines = parse_tracklist(
        &content.tracklist,
        content.show_track_numbers,
        content.show_track_lengths,
    );
    flow_tracklist(&lines, region, measure)
}
