use super::*;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> DecodedImage {
    DecodedImage::from_rgba8(image::RgbaImage::from_pixel(w, h, image::Rgba(rgba)))
}

#[test]
fn empty_painter_yields_transparent_surface() {
    let canvas = Canvas::new(8, 6).unwrap();
    let surface = Painter::new(canvas).unwrap().finish().unwrap();
    assert_eq!((surface.width, surface.height), (8, 6));
    assert_eq!(surface.data.len(), canvas.rgba_len());
    assert!(surface.data.iter().all(|&b| b == 0));
}

#[test]
fn scaled_image_covers_its_destination_only() {
    let canvas = Canvas::new(20, 20).unwrap();
    let mut painter = Painter::new(canvas).unwrap();
    let img = solid(2, 2, [255, 0, 0, 255]);
    let xf = Affine::translate(Vec2::new(0.0, 5.0)) * Affine::scale_non_uniform(10.0, 5.0);
    painter.draw_image(&img, xf).unwrap();
    let surface = painter.finish().unwrap();

    assert_eq!(surface.pixel(10, 10), Some([255, 0, 0, 255]));
    assert_eq!(surface.pixel(10, 1), Some([0, 0, 0, 0]));
    assert_eq!(surface.pixel(10, 18), Some([0, 0, 0, 0]));
    assert_eq!(surface.pixel(20, 0), None);
}

#[test]
fn to_rgba_image_unpremultiplies() {
    let surface = Surface {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
    };
    let img = surface.to_rgba_image().unwrap();
    let px = img.get_pixel(0, 0).0;
    assert_eq!(px[3], 128);
    assert!((i16::from(px[0]) - 128).abs() <= 1);
}

#[test]
fn mismatched_surface_bytes_fail_to_encode() {
    let surface = Surface {
        width: 2,
        height: 2,
        data: vec![0; 4],
    };
    assert!(matches!(
        surface.to_rgba_image().unwrap_err(),
        MemeError::Encode(_)
    ));
}

#[test]
fn oversized_canvas_is_a_render_error() {
    let canvas = Canvas::new(70_000, 10).unwrap();
    assert!(matches!(
        Painter::new(canvas).err().unwrap(),
        MemeError::Render(_)
    ));
}

#[test]
fn truncated_background_is_a_render_error() {
    let img = DecodedImage {
        width: 4,
        height: 4,
        rgba8_premul: Arc::new(vec![0; 12]),
    };
    let mut painter = Painter::new(Canvas::new(8, 8).unwrap()).unwrap();
    let err = painter.draw_image(&img, Affine::IDENTITY).unwrap_err();
    assert!(matches!(err, MemeError::Render(_)));
    assert!(err.to_string().contains("background holds 12 bytes, expected 64"));
}
