use super::*;

#[test]
fn lenient_parse_takes_leading_digits() {
    assert_eq!(parse_lenient_u32("160"), Some(160));
    assert_eq!(parse_lenient_u32("  12px"), Some(12));
    assert_eq!(parse_lenient_u32("0"), Some(0));
    assert_eq!(parse_lenient_u32(""), None);
    assert_eq!(parse_lenient_u32("abc"), None);
    assert_eq!(parse_lenient_u32("-5"), None);
    assert_eq!(parse_lenient_u32("99999999999999"), None);
}

#[test]
fn unparseable_numbers_fall_back_per_field() {
    let content = PosterContent {
        title_size: "huge".to_string(),
        margin_side: String::new(),
        frame_width: "x".to_string(),
        column_gap: "?".to_string(),
        ..PosterContent::default()
    };
    assert_eq!(content.numeric(NumericField::TitleSize), 230);
    assert_eq!(content.numeric(NumericField::MarginSide), 0);
    assert_eq!(content.numeric(NumericField::FrameWidth), 24);
    assert_eq!(content.numeric(NumericField::ColumnGap), 40);
    assert_eq!(content.numeric(NumericField::ArtistsSize), 110);
}

#[test]
fn invalid_colors_fall_back_and_missing_hash_is_tolerated() {
    let content = PosterContent {
        background_color: "not a color".to_string(),
        text_color: "00ff00".to_string(),
        ..PosterContent::default()
    };
    assert_eq!(content.color(ColorField::Background), Rgba8::BLACK);
    assert_eq!(content.color(ColorField::Text), Rgba8::rgb(0, 255, 0));
}

#[test]
fn uncompressed_cover_wins_only_when_flagged() {
    let base = PosterContent::default().with_cover("small.jpg", Some("big.png".to_string()));
    assert_eq!(base.active_cover(), Some("small.jpg"));

    let flagged = PosterContent {
        use_uncompressed: true,
        ..base.clone()
    };
    assert_eq!(flagged.active_cover(), Some("big.png"));

    let flagged_without_variant = PosterContent {
        use_uncompressed: true,
        uncompressed_album_cover: None,
        ..base
    };
    assert_eq!(flagged_without_variant.active_cover(), Some("small.jpg"));

    assert_eq!(PosterContent::default().active_cover(), None);
}

#[test]
fn title_fit_commit_is_a_new_revision() {
    let content = PosterContent::default();
    assert!(content.needs_title_fit());

    let fit = TitleFit {
        size_px: 180.0,
        base_size: 180,
    };
    let committed = content.commit_title_fit(&fit);
    assert_eq!(committed.title_size, "180");
    assert!(committed.title_fit_committed);
    assert!(!committed.needs_title_fit());
    assert_eq!(committed.revision, content.revision + 1);
    assert!(!content.title_fit_committed);

    let refit = committed.clear_title_fit();
    assert!(refit.needs_title_fit());
}

#[test]
fn manual_title_size_disables_fitting() {
    let content = PosterContent::default().with_title_size(150);
    assert_eq!(content.numeric(NumericField::TitleSize), 150);
    assert!(!content.needs_title_fit());
}

#[test]
fn legacy_snapshot_keys_are_accepted() {
    let json = r##"{
        "albumName": "Blue",
        "titleRelease": "OUT",
        "titleRuntime": "LENGTH",
        "runtime": "41:12",
        "initialTitleSizeSet": true,
        "titleFont": "Open Sans",
        "artistFont": "System"
    }"##;
    let content: PosterContent = serde_json::from_str(json).unwrap();
    assert_eq!(content.album_name, "Blue");
    assert_eq!(content.release_label, "OUT");
    assert_eq!(content.runtime_label, "LENGTH");
    assert_eq!(content.runtime, "41:12");
    assert!(content.title_fit_committed);
    assert_eq!(content.title_font, FontChoice::Named("Open Sans".to_string()));
    assert_eq!(content.artist_font, FontChoice::System);
    assert_eq!(content.margin_side, "160");
}

#[test]
fn serialization_uses_camel_case_and_font_names() {
    let value = serde_json::to_value(PosterContent::default()).unwrap();
    assert_eq!(value["marginSide"], "160");
    assert_eq!(value["titleFont"], "System");
    assert_eq!(value["showTrackLengths"], true);
}
