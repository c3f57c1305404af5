use chrono::{DateTime, SecondsFormat, Utc};

use crate::{
    foundation::error::{MemeError, MemeResult},
    optimize::upload::UploadFile,
};

/// Largest file accepted by the generic image upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Largest file accepted as a meme background.
pub const MAX_MEME_BYTES: usize = 10 * 1024 * 1024;
/// Longest caption accepted by the caption form, in characters.
pub const MAX_CAPTION_CHARS: usize = 50;

const UPLOAD_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];
const MEME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// Check declared type and size of a general image upload.
pub fn validate_upload_file(file: &UploadFile) -> MemeResult<()> {
    if !UPLOAD_TYPES.contains(&file.mime.as_str()) {
        return Err(MemeError::validation(
            "Please select a valid image file (JPEG, PNG, GIF, or WebP)",
        ));
    }
    if file.size() > MAX_UPLOAD_BYTES {
        return Err(MemeError::validation("Image file size must be less than 5MB"));
    }
    Ok(())
}

/// Check declared type and size of a meme background file.
pub fn validate_meme_file(file: &UploadFile) -> MemeResult<()> {
    if !MEME_TYPES.contains(&file.mime.as_str()) {
        return Err(MemeError::validation("Please select a JPEG or PNG image file"));
    }
    if file.size() > MAX_MEME_BYTES {
        return Err(MemeError::validation("Image file size must be less than 10MB"));
    }
    Ok(())
}

/// Per-field messages from [`validate_caption_form`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CaptionFormErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_text: Option<String>,
}

impl CaptionFormErrors {
    /// No field has an error.
    pub fn is_empty(&self) -> bool {
        self.image_url.is_none() && self.top_text.is_none() && self.bottom_text.is_none()
    }
}

/// Validate the caption editing form.
///
/// The compositor itself accepts blank captions; requiring one is a form rule.
pub fn validate_caption_form(image_url: &str, top_text: &str, bottom_text: &str) -> CaptionFormErrors {
    let mut errors = CaptionFormErrors::default();

    if image_url.trim().is_empty() {
        errors.image_url = Some("Image URL is required".to_string());
    } else if url::Url::parse(image_url).is_err() {
        errors.image_url = Some("Please enter a valid image URL".to_string());
    }

    if top_text.trim().is_empty() && bottom_text.trim().is_empty() {
        errors.top_text = Some("At least one text field is required".to_string());
    }
    if top_text.chars().count() > MAX_CAPTION_CHARS {
        errors.top_text = Some(format!(
            "Top text must be {MAX_CAPTION_CHARS} characters or less"
        ));
    }
    if bottom_text.chars().count() > MAX_CAPTION_CHARS {
        errors.bottom_text = Some(format!(
            "Bottom text must be {MAX_CAPTION_CHARS} characters or less"
        ));
    }

    errors
}

/// Storage name `<unix-millis>-<random>.<ext>` keeping the original extension.
pub fn unique_filename(original: &str, now: DateTime<Utc>) -> String {
    let ext = original
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && !ext.contains('/'))
        .unwrap_or("bin");
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}.{}", now.timestamp_millis(), &random[..13], ext.to_ascii_lowercase())
}

/// Download name `meme-<ISO 8601 with ':' and '.' replaced by '-'>.png`.
pub fn default_download_name(now: DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("meme-{stamp}.png")
}

#[cfg(test)]
#[path = "../../tests/unit/optimize/policy.rs"]
mod tests;
