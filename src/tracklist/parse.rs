/// One tracklist row split into its left (title) and right (duration) fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TrackLine {
    pub left: String,
    /// Duration text, empty when absent or hidden.
    pub right: String,
}

/// Remove a leading `"<digits>."` marker and the whitespace around it.
pub fn strip_track_number(line: &str) -> &str {
    let rest = line.trim_start();
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return line;
    }
    match rest[digits..].strip_prefix('.') {
        Some(after) => after.trim_start(),
        None => line,
    }
}

/// `M:SS`, `MM:SS`, `H:MM:SS` or `HH:MM:SS`.
fn is_duration(s: &str) -> bool {
    let mut parts = s.split(':');
    let lead = parts.next().unwrap_or_default();
    if lead.is_empty() || lead.len() > 2 || !lead.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let rest: Vec<&str> = parts.collect();
    (1..=2).contains(&rest.len())
        && rest
            .iter()
            .all(|p| p.len() == 2 && p.bytes().all(|b| b.is_ascii_digit()))
}

/// Split a trailing `" — <duration>"` off `line`. Exactly one whitespace character is expected on
/// each side of the em-dash.
pub fn split_duration(line: &str) -> Option<(&str, &str)> {
    let dash = line.rfind('—')?;
    let after = &line[dash + '—'.len_utf8()..];
    let mut after_chars = after.chars();
    let ws = after_chars.next().filter(|c| c.is_whitespace())?;
    let duration = &after[ws.len_utf8()..];
    if !is_duration(duration) {
        return None;
    }
    let before = &line[..dash];
    let ws_before = before.chars().next_back().filter(|c| c.is_whitespace())?;
    Some((
        before[..before.len() - ws_before.len_utf8()].trim(),
        duration,
    ))
}

/// Parse one raw line according to the number/length visibility flags.
pub fn parse_track_line(raw: &str, show_numbers: bool, show_lengths: bool) -> TrackLine {
    let mut line = raw.trim();
    if !show_numbers {
        line = strip_track_number(line);
    }
    match split_duration(line) {
        Some((left, duration)) => TrackLine {
            left: left.to_string(),
            right: if show_lengths {
                duration.to_string()
            } else {
                String::new()
            },
        },
        None => TrackLine {
            left: line.to_string(),
            right: String::new(),
        },
    }
}

/// Every line of a newline-delimited tracklist, blank lines included (they keep their row).
pub fn parse_tracklist(raw: &str, show_numbers: bool, show_lengths: bool) -> Vec<TrackLine> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split('\n')
        .map(|l| parse_track_line(l, show_numbers, show_lengths))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/tracklist/parse.rs"]
mod tests;
