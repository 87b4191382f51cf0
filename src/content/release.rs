//! Normalization of catalog release metadata into poster content.
//!
//! Lookup itself (network, cover probe) belongs to the caller; this module only turns an
//! already-fetched release into the text fields a poster shows.

use crate::content::model::PosterContent;

/// One track as reported by the release catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackInfo {
    /// Catalog position label ("1", "A2", ...). Falls back to the 1-based index when absent.
    pub position: Option<String>,
    pub title: String,
    pub duration_ms: Option<u64>,
}

/// Release metadata returned by the catalog lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReleaseInfo {
    pub title: String,
    pub artists: Vec<String>,
    pub tracks: Vec<TrackInfo>,
    pub date: Option<String>,
}

/// `M:SS` below one hour, `H:MM:SS` above.
pub fn format_duration(ms: u64) -> String {
    let seconds = ms / 1000;
    let hrs = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hrs > 0 {
        format!("{hrs}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}

impl ReleaseInfo {
    pub fn artists_line(&self) -> String {
        self.artists.join(", ")
    }

    /// Tracklist text in the `"<n>. <title> — <duration>"` form the tracklist flow parses.
    pub fn tracklist_text(&self) -> String {
        self.tracks
            .iter()
            .enumerate()
            .map(|(idx, t)| {
                let position = t
                    .position
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| (idx + 1).to_string());
                match t.duration_ms.filter(|&ms| ms > 0) {
                    Some(ms) => format!("{position}. {} — {}", t.title, format_duration(ms)),
                    None => format!("{position}. {}", t.title),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Sum of the known track durations, formatted; empty when nothing is known.
    pub fn total_runtime(&self) -> String {
        let total = self
            .tracks
            .iter()
            .filter_map(|t| t.duration_ms)
            .fold(0u64, |acc, ms| acc.saturating_add(ms));
        if total == 0 {
            String::new()
        } else {
            format_duration(total)
        }
    }

    /// Copy the release into `content`, keeping its styling untouched.
    pub fn apply_to(&self, content: &PosterContent) -> PosterContent {
        let mut next = content.clone();
        next.album_name = self.title.clone();
        next.artists_name = self.artists_line();
        next.release_date = self.date.clone().unwrap_or_default();
        next.tracklist = self.tracklist_text();
        next.runtime = self.total_runtime();
        if !self.tracks.is_empty() {
            next.show_tracklist = true;
        }
        next.revision = content.revision.wrapping_add(1);
        next
    }
}

/// Catalog release ids are canonical UUIDs; anything else (e.g. `autosave`) is a local project.
pub fn is_release_id(id: &str) -> bool {
    let bytes = id.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        8 | 13 | 18 | 23 => *b == b'-',
        _ => b.is_ascii_hexdigit(),
    })
}

/// Front-cover URL convention of the cover archive for a release id.
pub fn cover_art_url(release_id: &str) -> String {
    format!("https://coverartarchive.org/release/{release_id}/front")
}

#[cfg(test)]
#[path = "../../tests/unit/content/release.rs"]
mod tests;
