//! Text extraction from uploaded documents.
//!
//! Failure is an expected outcome here, not an error: `None` tells the
//! scorer to fall back to metadata.

use bytes::Bytes;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
    Unsupported,
}

pub fn detect_kind(bytes: &[u8], file_name: &str) -> DocumentKind {
    let name = file_name.to_lowercase();
    if bytes.starts_with(b"%PDF") || name.ends_with(".pdf") {
        DocumentKind::Pdf
    } else if name.ends_with(".txt") || name.ends_with(".md") {
        DocumentKind::PlainText
    } else {
        DocumentKind::Unsupported
    }
}

/// Returns the document text, or `None` when nothing usable could be read.
pub async fn extract_text(bytes: Bytes, file_name: &str) -> Option<String> {
    let text = match detect_kind(&bytes, file_name) {
        DocumentKind::Pdf => {
            // pdf-extract is CPU-bound and can panic on malformed files.
            let joined =
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                    .await;
            match joined {
                Ok(Ok(text)) => Some(text),
                Ok(Err(e)) => {
                    warn!("PDF extraction failed for '{file_name}': {e}");
                    None
                }
                Err(e) => {
                    warn!("PDF extraction aborted for '{file_name}': {e}");
                    None
                }
            }
        }
        DocumentKind::PlainText => match String::from_utf8(bytes.to_vec()) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Plain-text upload '{file_name}' is not valid UTF-8: {e}");
                None
            }
        },
        DocumentKind::Unsupported => {
            debug!("No extractor for '{file_name}'");
            None
        }
    };

    text.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_kind() {
        assert_eq!(detect_kind(b"%PDF-1.7", "upload"), DocumentKind::Pdf);
        assert_eq!(detect_kind(b"", "Resume.PDF"), DocumentKind::Pdf);
        assert_eq!(detect_kind(b"hello", "notes.txt"), DocumentKind::PlainText);
        assert_eq!(detect_kind(b"PK\x03\x04", "resume.docx"), DocumentKind::Unsupported);
    }

    #[tokio::test]
    async fn test_plain_text_extracted() {
        let text = extract_text(Bytes::from_static(b"Experience\nSkills"), "cv.txt").await;
        assert_eq!(text.as_deref(), Some("Experience\nSkills"));
    }

    #[tokio::test]
    async fn test_blank_text_is_none() {
        assert!(extract_text(Bytes::from_static(b"  \n "), "cv.txt").await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_none() {
        assert!(extract_text(Bytes::from_static(&[0xff, 0xfe, 0xfd]), "cv.txt")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_none() {
        let text = extract_text(Bytes::from_static(b"%PDF-1.4 not really a pdf"), "cv.pdf").await;
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn test_unsupported_is_none() {
        assert!(extract_text(Bytes::from_static(b"PK\x03\x04"), "cv.docx")
            .await
            .is_none());
    }
}
