use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn assert_rect_scaled(a: Rect, b: Rect, k: f64) {
    assert!(approx(a.x0 * k, b.x0), "{a:?} * {k} != {b:?}");
    assert!(approx(a.y0 * k, b.y0), "{a:?} * {k} != {b:?}");
    assert!(approx(a.x1 * k, b.x1), "{a:?} * {k} != {b:?}");
    assert!(approx(a.y1 * k, b.y1), "{a:?} * {k} != {b:?}");
}

fn assert_slot_scaled(a: &TextSlot, b: &TextSlot, k: f64) {
    assert!(approx(a.x * k, b.x));
    assert!(approx(a.baseline * k, b.baseline));
    assert!(approx(a.font.size_px * k, b.font.size_px));
}

fn styled() -> PosterContent {
    PosterContent {
        album_name: "Test Album".to_string(),
        margin_top: "20".to_string(),
        margin_cover: "40".to_string(),
        margin_background: "30".to_string(),
        show_tracklist: true,
        framed: true,
        ..PosterContent::default()
    }
}

#[test]
fn base_canvas_anchors() {
    let content = PosterContent {
        show_tracklist: true,
        ..PosterContent::default()
    };
    let g = compute_geometry(&content, ExportSize::BASE);
    assert_eq!(g.scale, 1.0);
    assert_eq!(g.cover, Some(Rect::new(0.0, 0.0, 2480.0, 2480.0)));
    assert_eq!(g.lower_panel, Rect::new(0.0, 2480.0, 2480.0, 3508.0));
    assert_eq!(g.title.x, 160.0);
    assert_eq!(g.title.baseline, 2500.0);
    assert_eq!(g.title.font.size_px, 200.0);
    assert!(approx(g.artists.baseline, 2500.0 + 110.0 * 1.3));
    assert_eq!(g.info.release_label.baseline, 3310.0);
    assert_eq!(g.info.release_value.baseline, 3390.0);
    assert_eq!(g.info.release_label.font.size_px, 70.0);
    assert_eq!(g.info.release_value.font.size_px, 60.0);
    assert_eq!(g.info.value_opacity, 0.7);
    assert_eq!(g.info.runtime_x(300.0), 160.0 + 300.0 + 100.0);
    assert_eq!(g.swatches[0], Rect::new(1885.0, 3368.0, 2030.0, 3398.0));
    assert_eq!(g.swatches[1].x0, 2030.0);
    assert_eq!(g.swatches[2].x0, 2175.0);
    assert_eq!(g.title_fit_limit, 2160.0);
    assert!(g.frame.is_none());

    let t = g.tracklist.expect("tracklist region");
    assert!(approx(t.rect.y0, 2500.0 + 143.0 + 130.0));
    assert!(approx(t.rect.height(), 500.0));
    assert!(approx(t.rect.width(), 2160.0));
    assert!(approx(t.max_text_height, t.rect.y0 + 490.0));
    assert_eq!(t.start_x, 170.0);
    assert!(approx(t.line_height, 65.0));
    assert!(approx(t.field_gap, 125.0));
    assert_eq!(t.column_gap, 40.0);
}

#[test]
fn hidden_tracklist_moves_title_down() {
    let g = compute_geometry(&PosterContent::default(), ExportSize::BASE);
    assert_eq!(g.title.baseline, 2790.0);
    assert_eq!(g.artists.baseline, 2790.0 + 110.0);
    assert!(g.tracklist.is_none());
}

#[test]
fn zero_artists_size_keeps_default_tracklist_gap() {
    let content = PosterContent {
        show_tracklist: true,
        artists_size: "0".to_string(),
        ..PosterContent::default()
    };
    let g = compute_geometry(&content, ExportSize::BASE);
    let t = g.tracklist.unwrap();
    assert!(approx(t.rect.y0, 2500.0 + 110.0 * 1.2 + 130.0));
}

#[test]
fn frame_stroke_stays_on_canvas() {
    let g = compute_geometry(&styled(), ExportSize::BASE);
    let frame = g.frame.unwrap();
    assert_eq!(frame.stroke_width, 24.0);
    assert_eq!(frame.rect, Rect::new(12.0, 12.0, 2468.0, 3496.0));
}

#[test]
fn margins_shift_cover_panel_and_fade() {
    let g = compute_geometry(&styled(), ExportSize::BASE);
    assert_eq!(g.cover, Some(Rect::new(40.0, 40.0, 2440.0, 2440.0)));
    assert_eq!(g.lower_panel.y0, 2450.0);
    let fade = g.fade.unwrap();
    assert_eq!(fade.area, Rect::new(0.0, 0.0, 2480.0, 2470.0));
    assert_eq!(fade.gradient_len, 2970.0);
    assert_eq!(g.title.baseline, 2520.0);
}

#[test]
fn oversized_cover_margin_drops_cover() {
    let content = PosterContent {
        margin_cover: "1300".to_string(),
        ..PosterContent::default()
    };
    assert!(compute_geometry(&content, ExportSize::BASE).cover.is_none());
}

#[test]
fn geometry_scales_linearly() {
    let content = styled();
    let base = compute_geometry(&content, ExportSize::BASE);
    for k in [2.0, 0.2, 3.35] {
        let size = ExportSize::new(
            (2480.0 * k) as u32,
            (3508.0_f64 * k).round() as u32,
        )
        .unwrap();
        let kk = f64::from(size.width) / 2480.0;
        let g = compute_geometry(&content, size);
        assert!(approx(g.scale, kk));
        assert_rect_scaled(base.cover.unwrap(), g.cover.unwrap(), kk);
        assert_rect_scaled(base.fade.unwrap().area, g.fade.unwrap().area, kk);
        assert!(approx(base.fade.unwrap().gradient_len * kk, g.fade.unwrap().gradient_len));
        assert!(approx(base.lower_panel.y0 * kk, g.lower_panel.y0));
        assert_slot_scaled(&base.title, &g.title, kk);
        assert_slot_scaled(&base.artists, &g.artists, kk);
        assert_slot_scaled(&base.info.release_label, &g.info.release_label, kk);
        assert_slot_scaled(&base.info.release_value, &g.info.release_value, kk);
        assert!(approx(base.info.runtime_offset * kk, g.info.runtime_offset));
        for (a, b) in base.swatches.iter().zip(g.swatches.iter()) {
            assert_rect_scaled(*a, *b, kk);
        }
        let (bt, gt) = (base.tracklist.as_ref().unwrap(), g.tracklist.as_ref().unwrap());
        assert_rect_scaled(bt.rect, gt.rect, kk);
        assert!(approx(bt.max_text_height * kk, gt.max_text_height));
        assert!(approx(bt.start_x * kk, gt.start_x));
        assert!(approx(bt.line_height * kk, gt.line_height));
        assert!(approx(bt.column_gap * kk, gt.column_gap));
        let (bf, gf) = (base.frame.unwrap(), g.frame.unwrap());
        assert!(approx(bf.stroke_width * kk, gf.stroke_width));
        assert!(approx(base.title_fit_limit * kk, g.title_fit_limit));
    }
}

#[test]
fn fade_ramps_between_half_and_eighty_percent() {
    let fade = FadeGeometry {
        area: Rect::new(0.0, 0.0, 100.0, 2500.0),
        gradient_len: 3000.0,
    };
    assert_eq!(fade.alpha_at(0.0), 0.0);
    assert_eq!(fade.alpha_at(1500.0), 0.0);
    assert!(approx(fade.alpha_at(1950.0), 0.5));
    assert!(approx(fade.alpha_at(2400.0), 1.0));

    let bands = fade.bands();
    assert!(bands.first().unwrap().rect.y0 >= 1500.0);
    assert_eq!(bands.last().unwrap().rect.y1, 2500.0);
    assert_eq!(bands.last().unwrap().alpha, 255);
    assert!(bands.windows(2).all(|w| w[0].alpha < w[1].alpha));
    assert!(bands.windows(2).all(|w| w[0].rect.y1 == w[1].rect.y0));
}
