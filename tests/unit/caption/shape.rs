use super::*;
use crate::caption::font::FontProvider;

/// Caption face for drawing checks: `MEMEFORGE_FONT` when set, otherwise a system face.
///
/// Hosts with no fonts at all must opt out with `MEMEFORGE_ALLOW_NO_FONT=1`.
fn host_font() -> Option<CaptionFont> {
    match FontProvider::new(None).resolve() {
        Ok(font) => Some(font.clone()),
        Err(e) if std::env::var_os("MEMEFORGE_ALLOW_NO_FONT").is_some() => {
            eprintln!("skipping caption check: {e}");
            None
        }
        Err(e) => panic!("no caption font ({e}); set MEMEFORGE_FONT or MEMEFORGE_ALLOW_NO_FONT=1"),
    }
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let font = CaptionFont::from_bytes(vec![0u8; 64], "garbage");
    assert!(CaptionShaper::new(&font).is_err());
}

#[test]
fn shaped_width_grows_with_text_and_size() {
    let Some(font) = host_font() else { return };
    let mut shaper = CaptionShaper::new(&font).unwrap();
    assert!(!shaper.family_name().trim().is_empty());

    let short = shaper.shape("WHEN YOU", 32.0).unwrap();
    let long = shaper.shape("WHEN YOU FINISH THE PROJECT", 32.0).unwrap();
    let big = shaper.shape("WHEN YOU", 64.0).unwrap();

    assert!(!short.glyphs.is_empty());
    assert!(long.width > short.width);
    assert!(big.width > short.width);
    assert_eq!(short.cpu_glyphs().count(), short.glyphs.len());
}

#[test]
fn non_positive_size_is_rejected() {
    let Some(font) = host_font() else { return };
    let mut shaper = CaptionShaper::new(&font).unwrap();
    assert!(shaper.shape("X", 0.0).is_err());
    assert!(shaper.shape("X", f32::NAN).is_err());
}

#[test]
fn glyphs_advance_along_one_baseline() {
    let Some(font) = host_font() else { return };
    let mut shaper = CaptionShaper::new(&font).unwrap();
    let shaped = shaper.shape("WHEN YOU", 32.0).unwrap();

    assert_eq!(shaped.glyphs.len(), 8);
    assert!(shaped.glyphs[0].x.abs() < 1.0);
    for pair in shaped.glyphs.windows(2) {
        assert!(pair[1].x > pair[0].x, "glyphs overlap: {:?}", shaped.glyphs);
    }
    let last = shaped.glyphs[shaped.glyphs.len() - 1];
    assert!(last.x < shaped.width);
    assert!(shaped.width > 32.0 * 3.0);

    let baseline = shaped.glyphs[0].y;
    assert!(baseline > 16.0 && baseline < shaped.height);
    assert!(shaped.glyphs.iter().all(|g| (g.y - baseline).abs() < f32::EPSILON));
}
