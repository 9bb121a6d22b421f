//! Plain-text extraction from uploaded legal documents

pub mod docx;
pub mod pdf;
pub mod upload;

use std::fmt;
use std::path::Path;

pub use upload::UploadedFile;

use crate::errors::NyayaError;
use crate::errors::Result;

/// Supported upload formats, recognized by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// # Errors
    /// `UnsupportedFormat` for any extension other than `.pdf` or `.docx`
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("pdf") => Ok(Self::Pdf),
            Some("docx") => Ok(Self::Docx),
            _ => Err(NyayaError::UnsupportedFormat(format!(
                "'{filename}': only PDF and DOCX files are supported"
            ))),
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
        })
    }
}

/// Document-text-extraction capability
pub trait TextExtractor: Send + Sync {
    /// # Errors
    /// `ExtractionError` when the bytes cannot be parsed or hold no text
    fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String>;
}

/// Extractor backed by `pdf-extract` and a DOCX XML reader
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentTextExtractor;

impl TextExtractor for DocumentTextExtractor {
    fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String> {
        let text = match kind {
            DocumentKind::Pdf => pdf::extract_text(bytes)?,
            DocumentKind::Docx => docx::extract_text(bytes)?,
        };
        if text.trim().is_empty() {
            return Err(NyayaError::ExtractionError(format!(
                "no readable text found in {kind} document"
            )));
        }
        Ok(text)
    }
}

/// Read and extract a document from disk, format chosen by extension
///
/// # Errors
/// - `UnsupportedFormat` before the file is read
/// - `Io` when the file cannot be read
/// - `ExtractionError` from the extractor
pub fn extract_file(extractor: &dyn TextExtractor, path: &Path) -> Result<String> {
    let kind = DocumentKind::from_filename(&path.to_string_lossy())?;
    let bytes = std::fs::read(path)?;
    extractor.extract(&bytes, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_filename("lease.pdf").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("Offer Letter.DOCX").unwrap(), DocumentKind::Docx);
    }

    #[test]
    fn test_unsupported_extensions() {
        for name in ["notes.txt", "scan.png", "contract", "contract.doc"] {
            let err = DocumentKind::from_filename(name).unwrap_err();
            assert!(matches!(err, NyayaError::UnsupportedFormat(_)), "{name}");
        }
    }

    #[test]
    fn test_extract_file_rejects_before_reading() {
        // Path does not exist; the format check must fail first.
        let err = extract_file(&DocumentTextExtractor, Path::new("/nonexistent/notes.txt")).unwrap_err();
        assert!(matches!(err, NyayaError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_blank_document_is_extraction_error() {
        let bytes = docx::tests::build_docx(&["   "]);
        let err = DocumentTextExtractor.extract(&bytes, DocumentKind::Docx).unwrap_err();
        assert!(matches!(err, NyayaError::ExtractionError(_)));
    }
}
