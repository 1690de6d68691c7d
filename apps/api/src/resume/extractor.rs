//! Pulls plain text out of PDF and DOCX uploads.
//!
//! Both backends implement `TextExtractor` (bytes → text). Empty-but-valid
//! documents yield an empty string; unreadable input yields `ExtractError`.

use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read DOCX: {0}")]
    Docx(String),
}

/// Declared format of an uploaded resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Resolves the format from a file name extension.
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractError> {
        let extension = std::path::Path::new(file_name)
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(ExtractError::UnsupportedFormat(file_name.to_string())),
        }
    }

    /// Resolves the format from a MIME type (parameters after `;` are ignored).
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(DocumentFormat::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(DocumentFormat::Docx)
            }
            _ => None,
        }
    }

    /// File name wins; the content type is a fallback for nameless uploads.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Result<Self, ExtractError> {
        match file_name.filter(|n| !n.trim().is_empty()) {
            Some(name) => Self::from_file_name(name),
            None => content_type
                .and_then(Self::from_content_type)
                .ok_or_else(|| {
                    ExtractError::UnsupportedFormat(content_type.unwrap_or("unknown").to_string())
                }),
        }
    }
}

/// Extractor capability: raw document bytes in, plain text out.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, data: &[u8]) -> Result<String, ExtractError>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, data: &[u8]) -> Result<String, ExtractError> {
        let text =
            pdf_extract::extract_text_from_mem(data).map_err(|e| ExtractError::Pdf(e.to_string()))?;
        Ok(clean_text(&text))
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, data: &[u8]) -> Result<String, ExtractError> {
        let text = extract_docx_text(data).map_err(|e| ExtractError::Docx(e.to_string()))?;
        Ok(clean_text(&text))
    }
}

/// Returns the extractor for a declared format.
pub fn extractor_for(format: DocumentFormat) -> &'static dyn TextExtractor {
    match format {
        DocumentFormat::Pdf => &PdfExtractor,
        DocumentFormat::Docx => &DocxExtractor,
    }
}

/// Extracts and cleans text from `data`.
///
/// Runs on a blocking thread: parsing is CPU-bound and the PDF backend may
/// panic on malformed input, which surfaces here as `ExtractError::Pdf`.
pub async fn extract_text(format: DocumentFormat, data: bytes::Bytes) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extractor_for(format).extract(&data))
        .await
        .map_err(|e| match format {
            DocumentFormat::Pdf => ExtractError::Pdf(format!("parser aborted: {e}")),
            DocumentFormat::Docx => ExtractError::Docx(format!("parser aborted: {e}")),
        })?
}

/// Removes control characters, collapses whitespace runs, and trims.
pub fn clean_text(text: &str) -> String {
    let spaced: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();
    WHITESPACE_RE.replace_all(&spaced, " ").trim().to_string()
}

fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut document_file = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    document_file.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" => in_text = in_paragraph,
                _ => {}
            },
            Ok(Event::Empty(e)) if in_paragraph => match e.name().as_ref() {
                b"w:tab" => current.push(' '),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => {
                    if !current.trim().is_empty() {
                        lines.push(current.trim().to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let value = e.xml_content()?.into_owned();
                    current.push_str(&value);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_text {
                    if let Some(ch) = e.resolve_char_ref()? {
                        current.push(ch);
                    } else if let Some(ch) = predefined_entity(&e) {
                        current.push(ch);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {}
        }

        buf.clear();
    }

    Ok(lines.join("\n"))
}

fn predefined_entity(name: &[u8]) -> Option<char> {
    match name {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        _ => None,
    }
}
