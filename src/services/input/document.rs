use std::path::Path;

use super::clean_extracted_text;
use crate::error::StudyError;

/// Document formats accepted for note upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
}

impl DocumentKind {
    /// Detect the format from the file name, falling back to the MIME type
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Option<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("txt") | Some("md") | Some("text") => return Some(DocumentKind::PlainText),
            Some("pdf") => return Some(DocumentKind::Pdf),
            _ => {}
        }

        match content_type {
            Some("application/pdf") => Some(DocumentKind::Pdf),
            Some(mime) if mime.starts_with("text/") => Some(DocumentKind::PlainText),
            _ => None,
        }
    }
}

/// Extract plain text from an uploaded document.
///
/// Fails with a read error when the format is unsupported or the document
/// yields no text (e.g. a scanned PDF without a text layer).
pub fn extract_document_text(
    file_name: &str,
    content_type: Option<&str>,
    data: &[u8],
) -> Result<String, StudyError> {
    let kind = DocumentKind::detect(file_name, content_type).ok_or_else(|| {
        StudyError::Read(format!(
            "Unsupported file type for '{}': upload a PDF or TXT file",
            file_name
        ))
    })?;

    log::info!("Extracting text from {} ({:?})", file_name, kind);

    let raw = match kind {
        DocumentKind::PlainText => String::from_utf8_lossy(data).into_owned(),
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(data).map_err(|e| {
            log::warn!("PDF extraction failed for {}: {}", file_name, e);
            StudyError::Read(format!(
                "PDF parsing failed - please paste text instead. Error: {}",
                e
            ))
        })?,
    };

    let text = clean_extracted_text(&raw);
    if text.is_empty() {
        return Err(StudyError::Read(format!(
            "No text could be extracted from '{}'",
            file_name
        )));
    }

    log::info!("Extracted {} characters from {}", text.len(), file_name);
    Ok(text)
}
