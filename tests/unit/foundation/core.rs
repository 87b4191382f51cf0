use super::*;

#[test]
fn hex_parse_accepts_missing_hash_and_emits_canonical_form() {
    let c = Rgba8::from_hex("5900FF").unwrap();
    assert_eq!(c, Rgba8::rgb(0x59, 0x00, 0xff));
    assert_eq!(c.to_hex(), "#5900ff");
    assert_eq!(Rgba8::from_hex(" #ff9100 ").unwrap().to_hex(), "#ff9100");
}

#[test]
fn hex_parse_rejects_short_and_non_hex_input() {
    assert!(Rgba8::from_hex("#fff").is_err());
    assert!(Rgba8::from_hex("#gg0000").is_err());
    assert!(Rgba8::from_hex("").is_err());
}

#[test]
fn premultiplied_scales_color_by_alpha() {
    assert_eq!(Rgba8::WHITE.premultiplied(), [255, 255, 255, 255]);
    assert_eq!(Rgba8::WHITE.with_alpha(0).premultiplied(), [0, 0, 0, 0]);
    assert_eq!(
        Rgba8::rgb(200, 100, 0).with_alpha(128).premultiplied(),
        [100, 50, 0, 128]
    );
}

#[test]
fn export_size_parses_and_scales() {
    let s: ExportSize = "4960x7016".parse().unwrap();
    assert_eq!(s, ExportSize::new(4960, 7016).unwrap());
    assert_eq!(s.scale(), 2.0);
    assert_eq!("2870 × 4100".parse::<ExportSize>().unwrap().height, 4100);
    assert_eq!(ExportSize::BASE.scale(), 1.0);
    assert_eq!(ExportSize::PREVIEW.scale(), 0.2);
}

#[test]
fn export_size_rejects_zero_and_garbage() {
    assert!(ExportSize::new(0, 10).is_err());
    assert!("10".parse::<ExportSize>().is_err());
    assert!("axb".parse::<ExportSize>().is_err());
}

#[test]
fn pixel_count_does_not_overflow() {
    let s = ExportSize::new(65_535, 65_535).unwrap();
    assert_eq!(s.pixels(), 65_535u64 * 65_535u64);
}
