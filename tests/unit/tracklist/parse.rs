use super::*;

fn line(left: &str, right: &str) -> TrackLine {
    TrackLine {
        left: left.to_string(),
        right: right.to_string(),
    }
}

#[test]
fn numbered_line_with_duration() {
    assert_eq!(
        parse_track_line("1. Intro — 0:45", true, true),
        line("1. Intro", "0:45")
    );
    assert_eq!(
        parse_track_line("  12. Long One — 1:02:05 ", false, true),
        line("Long One", "1:02:05")
    );
}

#[test]
fn hidden_lengths_drop_the_duration_but_keep_the_split() {
    assert_eq!(
        parse_track_line("2. Main — 3:12", true, false),
        line("2. Main", "")
    );
}

#[test]
fn number_prefix_requires_a_dot() {
    assert_eq!(strip_track_number("1999 Remix"), "1999 Remix");
    assert_eq!(strip_track_number("07.Track"), "Track");
    assert_eq!(strip_track_number("A1. Side A"), "A1. Side A");
}

#[test]
fn duration_needs_em_dash_with_single_spaces() {
    assert_eq!(split_duration("Song - 3:12"), None);
    assert_eq!(split_duration("Song—3:12"), None);
    assert_eq!(split_duration("Song — 3:1"), None);
    assert_eq!(split_duration("Song — 123:45"), None);
    assert_eq!(split_duration("Song — 3:12 live"), None);
    assert_eq!(split_duration("A — B — 4:00"), Some(("A — B", "4:00")));
    assert_eq!(split_duration("Tabbed\t—\t10:00"), Some(("Tabbed", "10:00")));
}

#[test]
fn lines_without_duration_keep_full_text() {
    assert_eq!(
        parse_track_line("3. Hidden Track", true, true),
        line("3. Hidden Track", "")
    );
}

#[test]
fn blank_lines_keep_their_row_but_empty_list_is_empty() {
    let parsed = parse_tracklist("1. A — 1:00\n\n2. B — 2:00\r", true, true);
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[1], line("", ""));
    assert_eq!(parsed[2], line("2. B", "2:00"));
    assert!(parse_tracklist("  \n ", true, true).is_empty());
}
