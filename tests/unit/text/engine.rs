use super::*;

fn font() -> FontSpec {
    FontSpec::bold(crate::layout::fonts::SYSTEM_FONT_STACK, 40.0)
}

#[test]
fn empty_text_has_no_width_or_runs() {
    let mut engine = TextLayoutEngine::new();
    let line = engine.shape("", &font());
    assert_eq!(line.width, 0.0);
    assert!(line.runs.is_empty());
}

#[test]
fn non_positive_size_shapes_nothing() {
    let mut engine = TextLayoutEngine::new();
    assert_eq!(engine.measure("abc", &font().with_size(0.0)), 0.0);
}

#[test]
fn shaped_lines_are_cached_within_a_pass() {
    let mut engine = TextLayoutEngine::new();
    let a = engine.shape("Test Album", &font());
    let b = engine.shape("Test Album", &font());
    assert!(Arc::ptr_eq(&a, &b));

    engine.begin_pass();
    let c = engine.shape("Test Album", &font());
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(a.width, c.width);
}

#[test]
fn missing_font_dir_is_skipped() {
    let mut engine = TextLayoutEngine::new();
    let n = engine
        .register_font_dir(Path::new("/definitely/not/a/font/dir"))
        .unwrap();
    assert_eq!(n, 0);
    assert_eq!(engine.registered_files(), 0);
}

#[test]
fn non_font_files_are_ignored() {
    let dir = std::env::temp_dir().join(format!("plastered-fonts-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("readme.txt"), b"not a font").unwrap();

    let engine = TextLayoutEngine::with_font_dirs(std::slice::from_ref(&dir)).unwrap();
    assert_eq!(engine.registered_files(), 0);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let mut engine = TextLayoutEngine::new();
    let err = engine.register_font_bytes(b"nope".to_vec()).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}
