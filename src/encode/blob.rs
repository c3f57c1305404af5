use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::encode::format::OutputFormat;

/// Encoded image bytes tagged with their MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct Blob {
    /// Encoding of `bytes`.
    pub format: OutputFormat,
    /// Encoded bytes.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blob")
            .field("mime", &self.mime())
            .field("size", &self.size())
            .finish()
    }
}

impl Blob {
    /// MIME type of the payload.
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// `data:<mime>;base64,<payload>` form of the blob.
    pub fn to_data_url(&self) -> String {
        data_url(self.mime(), &self.bytes)
    }
}

/// Base64 data URL for `bytes`.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
