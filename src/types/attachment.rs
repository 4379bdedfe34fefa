//! Message attachments.

use base64::Engine;
use std::path::{Path, PathBuf};

use super::fields::CustomHeader;
use crate::error::{SocketLabsError, SocketLabsResult};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Where an attachment's content came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    /// Content supplied in memory.
    Inline,
    /// Content read from a file.
    File(PathBuf),
}

/// A file attached to a message.
///
/// Content is always held base64-encoded; file-backed attachments are read
/// when constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name presented to the recipient.
    pub name: String,
    /// MIME type of the content.
    pub content_type: String,
    /// Base64-encoded content.
    pub content: String,
    /// Content ID for inline references (`cid:`).
    pub content_id: Option<String>,
    /// Headers added to the attachment part.
    pub custom_headers: Vec<CustomHeader>,
    source: AttachmentSource,
}

impl Attachment {
    /// Create an attachment from raw bytes.
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl AsRef<[u8]>,
    ) -> Self {
        Self::from_base64(
            name,
            content_type,
            base64::engine::general_purpose::STANDARD.encode(data),
        )
    }

    /// Create an attachment from content that is already base64-encoded.
    pub fn from_base64(
        name: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            content: content.into(),
            content_id: None,
            custom_headers: Vec::new(),
            source: AttachmentSource::Inline,
        }
    }

    /// Read an attachment from a file.
    ///
    /// The name is the file name and the content type is guessed from the
    /// extension, falling back to `application/octet-stream`.
    pub fn from_path(path: impl AsRef<Path>) -> SocketLabsResult<Self> {
        let path = path.as_ref();

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SocketLabsError::Attachment {
                message: format!("Invalid file name: {}", path.display()),
                source: None,
            })?
            .to_string();

        let content_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let data = std::fs::read(path).map_err(|e| SocketLabsError::Attachment {
            message: format!("Failed to read {}: {}", path.display(), e),
            source: Some(Box::new(e)),
        })?;

        let mut attachment = Self::new(name, content_type, data);
        attachment.source = AttachmentSource::File(path.to_path_buf());
        Ok(attachment)
    }

    /// Set the content ID for inline references like `<img src="cid:logo">`.
    pub fn content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into()).filter(|id| !id.is_empty());
        self
    }

    /// Override the file name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the content type.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Add a header to the attachment part.
    pub fn add_custom_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.custom_headers.push(CustomHeader::new(name, value));
        self
    }

    /// Where the content came from.
    pub fn source(&self) -> &AttachmentSource {
        &self.source
    }

    /// The file the content was read from, if any.
    pub fn file_path(&self) -> Option<&Path> {
        match &self.source {
            AttachmentSource::File(path) => Some(path),
            AttachmentSource::Inline => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_encodes_content() {
        let attachment = Attachment::new("hello.txt", "text/plain", b"hello");
        assert_eq!(attachment.content, "aGVsbG8=");
        assert_eq!(attachment.source(), &AttachmentSource::Inline);
        assert!(attachment.file_path().is_none());
    }

    #[test]
    fn test_from_path_derives_name_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF").unwrap();

        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.name, "report.pdf");
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(attachment.content, "JVBERg==");
        assert_eq!(attachment.file_path(), Some(path.as_path()));
    }

    #[test]
    fn test_from_path_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.unknownext");
        std::fs::write(&path, [0u8, 1, 2]).unwrap();

        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = Attachment::from_path("/definitely/not/here.txt");
        assert!(matches!(result, Err(SocketLabsError::Attachment { .. })));
    }

    #[test]
    fn test_content_id_and_headers() {
        let mut attachment = Attachment::new("logo.png", "image/png", [0x89, 0x50]).content_id("logo");
        attachment.add_custom_header("Color", "Orange");

        assert_eq!(attachment.content_id.as_deref(), Some("logo"));
        assert_eq!(attachment.custom_headers, vec![CustomHeader::new("Color", "Orange")]);
    }
}
