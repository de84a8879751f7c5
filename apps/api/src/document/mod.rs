//! Document Extractor — turns a resume or job-posting file into plain text.
//!
//! Dispatch is by lowercase extension only. Each backend returns the document's
//! page texts in reading order; the extractor newline-joins them.
//! Parse failures from the backends are forwarded unchanged.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

pub mod docx;
pub mod handlers;
pub mod pdf;
pub mod txt;
pub mod upload;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Pdf(#[from] pdf_extract::OutputError),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
}

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Maps a dotted, already-lowercased extension (".pdf") to a kind.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            ".pdf" => Some(DocumentKind::Pdf),
            ".docx" => Some(DocumentKind::Docx),
            ".txt" => Some(DocumentKind::Txt),
            _ => None,
        }
    }

    pub fn for_path(path: &Path) -> Result<Self, ExtractError> {
        let extension = extension_of(path);
        Self::from_extension(&extension).ok_or(ExtractError::UnsupportedFileType(extension))
    }
}

/// Lowercased extension including the leading dot, or "" when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Extracts the full text of `path`, page texts joined by `\n` in source order.
pub fn extract_text(path: impl AsRef<Path>) -> Result<String, ExtractError> {
    let path = path.as_ref();
    let kind = DocumentKind::for_path(path)?;
    debug!("Extracting {:?} document: {}", kind, path.display());

    let pages = match kind {
        DocumentKind::Pdf => pdf::extract_pages(path)?,
        DocumentKind::Docx => docx::extract_sections(path)?,
        DocumentKind::Txt => txt::load(path)?,
    };

    debug!("Extracted {} page(s) from {}", pages.len(), path.display());
    Ok(pages.join("\n"))
}
