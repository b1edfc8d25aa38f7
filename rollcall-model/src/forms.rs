//! Multipart form contracts.

/// Form field carrying the person's display name.
pub const FIELD_NAME: &str = "name";
/// Form field carrying the roll number.
pub const FIELD_ROLL_NO: &str = "roll_no";
/// Form field carrying the image file.
pub const FIELD_IMAGE: &str = "image";

/// Default file name attached to captured scan frames.
pub const CAPTURE_FILE_NAME: &str = "capture.jpg";

/// An image file as it travels in a multipart body.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// A JPEG payload, which is what the capture pipeline produces.
    pub fn jpeg(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(file_name, "image/jpeg", bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Guess a MIME type from a file name extension. Falls back to
    /// `application/octet-stream`, which the backend still accepts because it
    /// decodes the bytes itself.
    pub fn mime_for_file_name(file_name: &str) -> &'static str {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Body of a `/register` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub roll_no: String,
    pub image: ImagePayload,
}
