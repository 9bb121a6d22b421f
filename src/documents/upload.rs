//! Temporary storage for uploaded documents

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::documents::DocumentKind;
use crate::documents::TextExtractor;
use crate::errors::Result;

/// An upload persisted to a temp file that is deleted when dropped
#[derive(Debug)]
pub struct UploadedFile {
    file: NamedTempFile,
    kind: DocumentKind,
    original_name: String,
}

impl UploadedFile {
    /// Validate the extension, then write `bytes` to a temp file in `dir`
    /// (system temp dir when `None`)
    ///
    /// # Errors
    /// - `UnsupportedFormat` before anything is written
    /// - `Io` when the temp file cannot be created or written
    pub fn store(dir: Option<&Path>, original_name: &str, bytes: &[u8]) -> Result<Self> {
        let kind = DocumentKind::from_filename(original_name)?;

        let mut builder = tempfile::Builder::new();
        builder.prefix("nyaya-upload-");
        let suffix = format!(".{}", kind.extension());
        builder.suffix(&suffix);
        let mut file = match dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                builder.tempfile_in(dir)?
            }
            None => builder.tempfile()?,
        };
        file.write_all(bytes)?;
        file.flush()?;

        debug!(
            "Stored upload '{}' ({} bytes) at {}",
            original_name,
            bytes.len(),
            file.path().display()
        );

        Ok(Self {
            file,
            kind,
            original_name: original_name.to_string(),
        })
    }

    /// Extract the document text from the stored file
    ///
    /// # Errors
    /// `Io` or `ExtractionError`
    pub fn extract_text(&self, extractor: &dyn TextExtractor) -> Result<String> {
        let bytes = std::fs::read(self.file.path())?;
        extractor.extract(&bytes, self.kind)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    #[must_use]
    pub const fn kind(&self) -> DocumentKind {
        self.kind
    }

    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }
}
