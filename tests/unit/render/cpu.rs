use super::*;

fn size(w: u32, h: u32) -> ExportSize {
    ExportSize::new(w, h).unwrap()
}

fn solid(w: u32, h: u32, rgba: [u8; 4], readable: bool) -> LoadedImage {
    LoadedImage {
        rgba: Arc::new(image::RgbaImage::from_pixel(w, h, image::Rgba(rgba))),
        readable,
    }
}

#[test]
fn fills_are_read_back_exactly() {
    let mut backend = CpuBackend::new();
    let mut text = TextLayoutEngine::new();
    let mut surface = backend.begin_surface(&mut text, size(32, 16)).unwrap();
    surface.fill_rect(Rect::new(0.0, 0.0, 32.0, 16.0), Rgba8::rgb(89, 0, 255));
    surface.fill_rect(Rect::new(16.0, 0.0, 32.0, 16.0), Rgba8::WHITE);

    assert_eq!(surface.read_pixel(0, 0).unwrap(), Rgba8::rgb(89, 0, 255));
    assert_eq!(surface.read_pixel(20, 8).unwrap(), Rgba8::WHITE);

    let frame = surface.readback().unwrap();
    assert_eq!((frame.width, frame.height), (32, 16));
    assert_eq!(frame.data.len(), 32 * 16 * 4);
    assert!(frame.premultiplied);
}

#[test]
fn drawing_after_a_read_is_still_rendered() {
    let mut backend = CpuBackend::new();
    let mut text = TextLayoutEngine::new();
    let mut surface = backend.begin_surface(&mut text, size(8, 8)).unwrap();
    surface.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Rgba8::BLACK);
    assert_eq!(surface.read_pixel(1, 1).unwrap(), Rgba8::BLACK);
    surface.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Rgba8::WHITE);
    assert_eq!(surface.read_pixel(1, 1).unwrap(), Rgba8::WHITE);
}

#[test]
fn stroke_stays_on_canvas() {
    let mut backend = CpuBackend::new();
    let mut text = TextLayoutEngine::new();
    let mut surface = backend.begin_surface(&mut text, size(20, 20)).unwrap();
    surface.fill_rect(Rect::new(0.0, 0.0, 20.0, 20.0), Rgba8::BLACK);
    surface.stroke_rect(Rect::new(2.0, 2.0, 18.0, 18.0), 4.0, Rgba8::WHITE);
    assert_eq!(surface.read_pixel(0, 0).unwrap(), Rgba8::WHITE);
    assert_eq!(surface.read_pixel(19, 19).unwrap(), Rgba8::WHITE);
    assert_eq!(surface.read_pixel(3, 10).unwrap(), Rgba8::WHITE);
    assert_eq!(surface.read_pixel(10, 10).unwrap(), Rgba8::BLACK);
}

#[test]
fn images_fill_their_destination() {
    let mut backend = CpuBackend::new();
    let mut text = TextLayoutEngine::new();
    let mut surface = backend.begin_surface(&mut text, size(16, 16)).unwrap();
    surface.fill_rect(Rect::new(0.0, 0.0, 16.0, 16.0), Rgba8::BLACK);
    surface
        .draw_image(
            &solid(40, 10, [255, 0, 0, 255], true),
            ImageFit::Cover,
            Rect::new(4.0, 4.0, 12.0, 12.0),
        )
        .unwrap();
    assert_eq!(surface.read_pixel(8, 8).unwrap(), Rgba8::rgb(255, 0, 0));
    assert_eq!(surface.read_pixel(1, 1).unwrap(), Rgba8::BLACK);
}

#[test]
fn unreadable_images_taint_reads_and_readback() {
    let mut backend = CpuBackend::new();
    let mut text = TextLayoutEngine::new();
    let mut surface = backend.begin_surface(&mut text, size(8, 8)).unwrap();
    surface
        .draw_image(
            &solid(2, 2, [0, 0, 255, 255], false),
            ImageFit::Stretch,
            Rect::new(0.0, 0.0, 8.0, 8.0),
        )
        .unwrap();
    assert!(matches!(
        surface.read_pixel(0, 0).unwrap_err(),
        PosterError::SurfaceTainted(_)
    ));
    assert!(surface.readback().is_err());
}

#[test]
fn out_of_range_reads_fail() {
    let mut backend = CpuBackend::new();
    let mut text = TextLayoutEngine::new();
    let mut surface = backend.begin_surface(&mut text, size(4, 4)).unwrap();
    assert!(surface.read_pixel(4, 0).is_err());
}

#[test]
fn oversized_targets_are_rejected() {
    let mut backend = CpuBackend::new();
    let mut text = TextLayoutEngine::new();
    let err = backend
        .begin_surface(&mut text, size(70_000, 10))
        .err()
        .unwrap();
    assert!(matches!(err, PosterError::Backend(_)));
}
