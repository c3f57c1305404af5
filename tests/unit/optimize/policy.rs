use chrono::TimeZone;

use super::*;

fn file(mime: &str, size: usize) -> UploadFile {
    UploadFile::new("photo.PNG", mime, vec![0u8; size])
}

#[test]
fn upload_file_accepts_common_types_under_5mib() {
    for mime in ["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp"] {
        validate_upload_file(&file(mime, 10)).unwrap();
    }
    validate_upload_file(&file("image/png", MAX_UPLOAD_BYTES)).unwrap();

    let err = validate_upload_file(&file("image/png", MAX_UPLOAD_BYTES + 1)).unwrap_err();
    assert!(err.to_string().contains("less than 5MB"));
    let err = validate_upload_file(&file("image/bmp", 10)).unwrap_err();
    assert!(matches!(err, MemeError::Validation(_)));
}

#[test]
fn meme_file_is_stricter_on_type_but_allows_10mib() {
    validate_meme_file(&file("image/png", MAX_UPLOAD_BYTES + 1)).unwrap();
    assert!(validate_meme_file(&file("image/gif", 10)).is_err());
    assert!(validate_meme_file(&file("image/webp", 10)).is_err());
    let err = validate_meme_file(&file("image/jpeg", MAX_MEME_BYTES + 1)).unwrap_err();
    assert!(err.to_string().contains("less than 10MB"));
}

#[test]
fn caption_form_rules() {
    assert!(validate_caption_form("https://x.test/a.png", "top", "").is_empty());
    assert!(validate_caption_form("https://x.test/a.png", "", "bottom").is_empty());

    let e = validate_caption_form("  ", "a", "b");
    assert_eq!(e.image_url.as_deref(), Some("Image URL is required"));

    let e = validate_caption_form("not a url", "a", "b");
    assert_eq!(e.image_url.as_deref(), Some("Please enter a valid image URL"));

    let e = validate_caption_form("https://x.test/a.png", "   ", "");
    assert_eq!(e.top_text.as_deref(), Some("At least one text field is required"));
    assert_eq!(e.bottom_text, None);

    let long = "x".repeat(51);
    let e = validate_caption_form("https://x.test/a.png", &long, &long);
    assert!(e.top_text.unwrap().starts_with("Top text must be 50"));
    assert!(e.bottom_text.unwrap().starts_with("Bottom text must be 50"));

    let fifty = "é".repeat(50);
    assert!(validate_caption_form("https://x.test/a.png", &fifty, "").is_empty());
}

#[test]
fn unique_filename_shape() {
    let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    let a = unique_filename("photo.PNG", now);
    let b = unique_filename("photo.PNG", now);
    assert_ne!(a, b);
    assert!(a.starts_with(&format!("{}-", now.timestamp_millis())));
    assert!(a.ends_with(".png"));
    let random = a.split('-').nth(1).unwrap().split('.').next().unwrap();
    assert_eq!(random.len(), 13);

    assert!(unique_filename("noext", now).ends_with(".bin"));
}

#[test]
fn download_name_replaces_colons_and_dots() {
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
        + chrono::Duration::milliseconds(678);
    assert_eq!(
        default_download_name(now),
        "meme-2024-01-02T03-04-05-678Z.png"
    );
}
