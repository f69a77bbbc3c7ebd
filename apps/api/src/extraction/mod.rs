//! Resume file → plain text.
//!
//! Supported inputs are PDF, Word (.docx) and plain text. Legacy binary `.doc`
//! files are recognised but rejected, as are anything else.

pub mod docx;

use thiserror::Error;
use tracing::debug;

use crate::draft::models::{clamp_chars, RESUME_LIMIT};

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read Word document: {0}")]
    Docx(String),

    #[error("no text found in document")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    LegacyDoc,
    PlainText,
}

impl DocumentKind {
    /// Detects the kind from the file name extension first, then the
    /// declared content type.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Result<Self, ExtractionError> {
        if let Some(kind) = file_name.and_then(Self::from_file_name) {
            return Ok(kind);
        }
        if let Some(kind) = content_type.and_then(Self::from_content_type) {
            return Ok(kind);
        }
        Err(ExtractionError::UnsupportedFormat(
            file_name
                .or(content_type)
                .unwrap_or("unknown")
                .to_string(),
        ))
    }

    fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::LegacyDoc),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            "application/pdf" => Some(Self::Pdf),
            DOCX_MIME => Some(Self::Docx),
            "application/msword" => Some(Self::LegacyDoc),
            m if m.starts_with("text/") => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Raw text extraction for a known document kind. Output is not normalized.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
    match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string())),
        DocumentKind::Docx => docx::extract_docx_text(bytes),
        DocumentKind::PlainText => {
            let text = String::from_utf8_lossy(bytes);
            Ok(text.strip_prefix('\u{feff}').unwrap_or(&text).to_string())
        }
        DocumentKind::LegacyDoc => Err(ExtractionError::UnsupportedFormat(
            "legacy Word .doc".to_string(),
        )),
    }
}

/// Normalizes line endings, trims trailing whitespace and collapses long
/// runs of blank lines.
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = 0;

    for line in raw.replace("\r\n", "\n").replace('\r', "\n").lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }

    out.trim().to_string()
}

/// Full upload path: detect, extract, normalize, clamp to the resume limit.
pub fn extract_resume_text(
    bytes: &[u8],
    file_name: Option<&str>,
    content_type: Option<&str>,
) -> Result<String, ExtractionError> {
    let kind = DocumentKind::detect(file_name, content_type)?;
    let raw = extract_text(bytes, kind)?;
    let text = normalize_text(&raw);
    if text.is_empty() {
        return Err(ExtractionError::Empty);
    }
    debug!(
        "Extracted {} chars from {:?} ({kind:?})",
        text.chars().count(),
        file_name
    );
    Ok(clamp_chars(&text, RESUME_LIMIT))
}
