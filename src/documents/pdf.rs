//! PDF text layer extraction

use crate::errors::NyayaError;
use crate::errors::Result;

/// Extract the embedded text of a digital PDF
///
/// Scanned PDFs without a text layer come back empty.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let outcome = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));
    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(NyayaError::ExtractionError(format!("failed to parse PDF: {e}"))),
        Err(_) => Err(NyayaError::ExtractionError(
            "failed to parse PDF: malformed document".to_string(),
        )),
    }
}
