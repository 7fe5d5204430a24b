//! Document text extraction for uploaded resumes.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Corrupt document: {0}")]
    CorruptDocument(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

impl DocumentFormat {
    /// Maps a declared MIME type to a supported format. Parameters such as
    /// `; charset=utf-8` are ignored.
    pub fn from_content_type(content_type: &str) -> Result<Self, ExtractError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Ok(DocumentFormat::Pdf),
            "text/plain" => Ok(DocumentFormat::PlainText),
            other => Err(ExtractError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Fallback for clients that send `application/octet-stream`.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "txt" => Ok(DocumentFormat::PlainText),
            _ => Err(ExtractError::UnsupportedFormat(filename.to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::PlainText => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::PlainText => "text/plain",
        }
    }
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, bytes: Bytes, format: DocumentFormat) -> Result<String, ExtractError>;
}

/// Extracts PDFs with `pdf-extract` on the blocking pool, and decodes plain text as UTF-8.
pub struct StandardExtractor;

#[async_trait]
impl DocumentExtractor for StandardExtractor {
    async fn extract(&self, bytes: Bytes, format: DocumentFormat) -> Result<String, ExtractError> {
        match format {
            DocumentFormat::Pdf => tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem(&bytes)
                    .map_err(|e| ExtractError::CorruptDocument(e.to_string()))
            })
            .await
            // pdf-extract panics on some malformed inputs
            .map_err(|e| ExtractError::CorruptDocument(format!("PDF extraction aborted: {e}")))?,
            DocumentFormat::PlainText => String::from_utf8(bytes.to_vec())
                .map_err(|e| ExtractError::CorruptDocument(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_content_type() {
        assert_eq!(
            DocumentFormat::from_content_type("application/pdf").unwrap(),
            DocumentFormat::Pdf
        );
    }

    #[test]
    fn test_content_type_parameters_ignored() {
        assert_eq!(
            DocumentFormat::from_content_type("Text/Plain; charset=utf-8").unwrap(),
            DocumentFormat::PlainText
        );
    }

    #[test]
    fn test_docx_is_unsupported() {
        let err = DocumentFormat::from_content_type(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_format_from_filename() {
        assert_eq!(DocumentFormat::from_filename("CV.PDF").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_filename("notes.txt").unwrap(), DocumentFormat::PlainText);
        assert!(DocumentFormat::from_filename("resume.docx").is_err());
        assert!(DocumentFormat::from_filename("resume").is_err());
    }

    #[tokio::test]
    async fn test_plain_text_extraction() {
        let text = StandardExtractor
            .extract(Bytes::from_static(b"5 years experience"), DocumentFormat::PlainText)
            .await
            .unwrap();
        assert_eq!(text, "5 years experience");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_corrupt() {
        let err = StandardExtractor
            .extract(Bytes::from_static(&[0xff, 0xfe, 0x00]), DocumentFormat::PlainText)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::CorruptDocument(_)));
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_corrupt() {
        let err = StandardExtractor
            .extract(Bytes::from_static(b"not a pdf at all"), DocumentFormat::Pdf)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::CorruptDocument(_)));
    }
}
