use chrono::{DateTime, Utc};

/// A persisted meme.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemeRecord {
    /// Server-assigned identifier.
    pub id: String,
    /// Public URL of the stored image.
    pub image_url: String,
    pub top_text: String,
    pub bottom_text: String,
    /// Creation time, serialized as RFC 3339.
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the client when creating a record.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NewMeme {
    pub image_url: String,
    pub top_text: String,
    pub bottom_text: String,
}

/// Partial update; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MemePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_text: Option<String>,
}

impl MemePatch {
    /// Apply the set fields to `record`.
    pub fn apply_to(&self, record: &mut MemeRecord) {
        if let Some(v) = &self.image_url {
            record.image_url = v.clone();
        }
        if let Some(v) = &self.top_text {
            record.top_text = v.clone();
        }
        if let Some(v) = &self.bottom_text {
            record.bottom_text = v.clone();
        }
    }
}
