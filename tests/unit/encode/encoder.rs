use super::*;

fn surface(w: u32, h: u32, px: [u8; 4]) -> Surface {
    Surface {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
    }
}

fn q(v: f32) -> Quality {
    Quality::new(v).unwrap()
}

#[test]
fn png_round_trips_straight_alpha() {
    let s = surface(3, 2, [100, 50, 0, 200]);
    let blob = encode_surface(&s, OutputFormat::Png, q(0.1)).unwrap();
    assert_eq!(blob.mime(), "image/png");
    assert_eq!(&blob.bytes[1..4], b"PNG");

    let back = image::load_from_memory(&blob.bytes).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (3, 2));
    let px = back.get_pixel(0, 0).0;
    assert_eq!(px[3], 200);
    assert!((i16::from(px[0]) - 128).abs() <= 1);
}

#[test]
fn jpeg_flattens_transparency_over_black() {
    let s = surface(8, 8, [0, 0, 0, 0]);
    let blob = encode_surface(&s, OutputFormat::Jpeg, q(0.9)).unwrap();
    assert_eq!(&blob.bytes[0..2], &[0xFF, 0xD8]);
    let back = image::load_from_memory(&blob.bytes).unwrap().to_rgb8();
    assert!(back.pixels().all(|p| p.0.iter().all(|&c| c < 8)));
}

#[test]
fn jpeg_quality_changes_size() {
    let mut s = surface(64, 64, [0, 0, 0, 255]);
    for (i, px) in s.data.chunks_exact_mut(4).enumerate() {
        px[0] = (i * 7 % 256) as u8;
        px[1] = (i * 13 % 256) as u8;
        px[2] = (i * 29 % 256) as u8;
    }
    let low = encode_surface(&s, OutputFormat::Jpeg, q(0.1)).unwrap();
    let high = encode_surface(&s, OutputFormat::Jpeg, q(1.0)).unwrap();
    assert!(low.size() < high.size());
}

#[test]
fn webp_output_has_riff_signature() {
    let blob = encode_surface(&surface(4, 4, [1, 2, 3, 255]), OutputFormat::Webp, q(0.8)).unwrap();
    assert_eq!(&blob.bytes[0..4], b"RIFF");
    assert_eq!(&blob.bytes[8..12], b"WEBP");
}

fn noisy(w: u32, h: u32) -> Surface {
    let mut s = surface(w, h, [0, 0, 0, 255]);
    let mut seed = 0x2545_f491_u32;
    for px in s.data.chunks_exact_mut(4) {
        for c in px.iter_mut().take(3) {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            *c = (seed >> 24) as u8;
        }
    }
    s
}

#[test]
fn webp_quality_changes_size() {
    let s = noisy(64, 64);
    let low = encode_surface(&s, OutputFormat::Webp, q(0.1)).unwrap();
    let high = encode_surface(&s, OutputFormat::Webp, q(1.0)).unwrap();
    assert!(low.size() < high.size(), "low={} high={}", low.size(), high.size());

    let back = image::load_from_memory(&low.bytes).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (64, 64));
}

#[test]
fn webp_quantization_keeps_alpha_and_full_quality_is_exact() {
    let mut rgba = vec![37, 128, 250, 77];
    quantize_rgb(&mut rgba, q(0.1));
    assert_eq!(rgba[3], 77);
    // Five levels per channel at 0.1: 0, 64, 128, 191, 255.
    assert!([0, 64, 128, 191, 255].contains(&rgba[0]));
    assert_eq!(rgba[2], 255);

    let mut exact = vec![37, 128, 250, 77];
    quantize_rgb(&mut exact, q(1.0));
    assert_eq!(exact, vec![37, 128, 250, 77]);
}

#[test]
fn select_format_uses_jpeg_without_a_lossy_webp_encoder() {
    let sample = encode_surface(&surface(1, 1, [0, 0, 0, 255]), OutputFormat::Webp, q(0.5)).unwrap();
    let expected = if is_lossy_webp(&sample.bytes) {
        OutputFormat::Webp
    } else {
        OutputFormat::Jpeg
    };
    assert_eq!(select_format(), expected);
    assert_eq!(select_format(), select_format());
}

#[test]
fn lossy_webp_detection_reads_the_first_chunk() {
    assert!(is_lossy_webp(b"RIFF\0\0\0\0WEBPVP8 ...."));
    assert!(!is_lossy_webp(b"RIFF\0\0\0\0WEBPVP8L...."));
    assert!(!is_lossy_webp(b"RIFF"));
}

#[test]
fn rgba_image_jpeg_matches_surface_path_for_opaque_pixels() {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 10, 10, 255]));
    let blob = encode_rgba_image(&img, OutputFormat::Jpeg, q(0.9)).unwrap();
    let back = image::load_from_memory(&blob.bytes).unwrap().to_rgb8();
    let p = back.get_pixel(1, 1).0;
    assert!(p[0] > 180 && p[1] < 40);
}

#[test]
fn format_parsing() {
    assert_eq!(OutputFormat::from_mime("image/jpg").unwrap(), OutputFormat::Jpeg);
    assert_eq!("webp".parse::<OutputFormat>().unwrap(), OutputFormat::Webp);
    assert_eq!("image/png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
    assert!(OutputFormat::from_mime("image/bmp").is_err());
    assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
}
