use super::*;

#[test]
fn missing_explicit_font_is_a_font_error() {
    let provider = FontProvider::new(Some(PathBuf::from("/definitely/not/here.ttf")));
    let err = provider.resolve().unwrap_err();
    assert!(matches!(err, MemeError::Font(_)));
    assert!(err.to_string().contains("here.ttf"));
}

#[test]
fn preloaded_font_is_returned_without_io() {
    let provider = FontProvider::preloaded(CaptionFont::from_bytes(vec![1, 2, 3], "inline"));
    let font = provider.resolve().unwrap();
    assert_eq!(font.bytes(), &[1, 2, 3]);
    assert_eq!(font.index(), 0);
    assert_eq!(font.origin(), "inline");
}

#[test]
fn debug_omits_font_bytes() {
    let font = CaptionFont::from_bytes(vec![0; 1024], "inline");
    let dbg = format!("{font:?}");
    assert!(dbg.contains("bytes_len: 1024"));
}

#[test]
fn font_data_shares_the_wrapped_bytes() {
    let font = CaptionFont::from_face(vec![9; 16], 2, "inline");
    let copy = font.clone();
    assert_eq!(font.font_data().data.id(), copy.font_data().data.id());
    assert_eq!(font.font_data().index, 2);
}
