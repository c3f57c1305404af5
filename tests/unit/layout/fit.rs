use super::*;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

#[test]
fn wider_image_is_letterboxed_vertically() {
    let p = fit_and_center(800, 400, canvas(800, 600)).unwrap();
    assert_eq!(p.draw_width, 800.0);
    assert_eq!(p.draw_height, 400.0);
    assert_eq!(p.offset_x, 0.0);
    assert_eq!(p.offset_y, 100.0);
}

#[test]
fn taller_image_is_pillarboxed() {
    let p = fit_and_center(300, 600, canvas(800, 600)).unwrap();
    assert_eq!(p.draw_height, 600.0);
    assert_eq!(p.draw_width, 300.0);
    assert_eq!(p.offset_x, 250.0);
    assert_eq!(p.offset_y, 0.0);
}

#[test]
fn equal_aspect_fills_canvas() {
    let p = fit_and_center(400, 300, canvas(800, 600)).unwrap();
    assert_eq!(p.rect(), Rect::new(0.0, 0.0, 800.0, 600.0));
}

#[test]
fn fit_never_exceeds_canvas_and_preserves_aspect() {
    let dims = [1u32, 3, 17, 100, 333, 640, 1024, 4000];
    for &iw in &dims {
        for &ih in &dims {
            for &(cw, ch) in &[(800u32, 600u32), (1, 1), (37, 500), (1920, 1080)] {
                let p = fit_and_center(iw, ih, canvas(cw, ch)).unwrap();
                assert!(p.draw_width <= f64::from(cw) + 1e-9);
                assert!(p.draw_height <= f64::from(ch) + 1e-9);
                assert!(p.offset_x >= -1e-9 && p.offset_y >= -1e-9);
                let src = f64::from(iw) / f64::from(ih);
                let drawn = p.draw_width / p.draw_height;
                assert!((src - drawn).abs() / src < 1e-9, "{iw}x{ih} on {cw}x{ch}");
            }
        }
    }
}

#[test]
fn fit_rejects_empty_image() {
    assert!(fit_and_center(0, 10, canvas(10, 10)).is_err());
}

#[test]
fn affine_maps_image_corners_onto_rect() {
    let p = fit_and_center(800, 400, canvas(800, 600)).unwrap();
    let a = p.to_affine(800, 400);
    let tl = a * kurbo::Point::new(0.0, 0.0);
    let br = a * kurbo::Point::new(800.0, 400.0);
    assert_eq!((tl.x, tl.y), (0.0, 100.0));
    assert_eq!((br.x, br.y), (800.0, 500.0));
}

#[test]
fn fit_within_downscales_4000x3000_to_1080p_bounds() {
    let (w, h) = fit_within(4000, 3000, 1920, 1080);
    assert!(w <= 1920 && h <= 1080);
    assert_eq!((w, h), (1440, 1080));
    assert!((f64::from(w) / f64::from(h) - 4.0 / 3.0).abs() < 0.01);
}

#[test]
fn fit_within_leaves_small_images_alone_and_never_upscales() {
    assert_eq!(fit_within(640, 480, 1920, 1080), (640, 480));
    for &(w, h) in &[(5000u32, 10u32), (10, 5000), (1921, 1081), (3000, 3000)] {
        let (ow, oh) = fit_within(w, h, 1920, 1080);
        assert!(ow <= w && oh <= h);
        assert!(ow <= 1920 && oh <= 1080);
        assert!(ow >= 1 && oh >= 1);
    }
}

#[test]
fn thumbnail_longer_side_matches_target() {
    assert_eq!(thumbnail_size(400, 200, 200), (200, 100));
    assert_eq!(thumbnail_size(200, 400, 200), (100, 200));
    assert_eq!(thumbnail_size(300, 300, 200), (200, 200));
    assert_eq!(thumbnail_size(10_000, 1, 200), (200, 1));
}
