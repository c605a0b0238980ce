//! TextExtractor — pulls the plain text out of the source PDF, page by page.

use std::path::Path;

use tracing::{debug, info};

use crate::errors::PipelineError;

const PDF_MAGIC: &[u8] = b"%PDF-";
/// Readers accept the header anywhere in the first KiB.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Plain text of one document: page texts joined by a single newline, in
/// page order, exactly as the parser produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    text: String,
    page_count: usize,
}

impl ExtractedText {
    pub fn from_pages<S: AsRef<str>>(pages: &[S]) -> Self {
        let text = pages
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            text,
            page_count: pages.len(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// True when the `%PDF-` header appears within the first KiB of `bytes`.
pub fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

/// Reads and parses the document at `path`.
///
/// The file handle lives only inside `std::fs::read`, so it is released on
/// every exit path. Missing, unreadable, non-PDF and unparseable files all
/// map to `PipelineError::DocumentAccess`.
pub fn extract_text(path: &Path) -> Result<ExtractedText, PipelineError> {
    let access_error = |message: String| PipelineError::DocumentAccess {
        path: path.to_path_buf(),
        message,
    };

    let bytes = std::fs::read(path).map_err(|e| access_error(e.to_string()))?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    if !has_pdf_header(&bytes) {
        return Err(access_error("file is not a PDF document".to_string()));
    }

    // pdf-extract panics on some malformed inputs instead of returning an error.
    let parsed = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes))
        .map_err(|_| access_error("PDF parser panicked on malformed input".to_string()))?;
    let pages = parsed.map_err(|e| access_error(format!("failed to parse PDF: {e}")))?;

    let extracted = ExtractedText::from_pages(&pages);
    info!(
        "Extracted {} characters from {} page(s) of {}",
        extracted.char_count(),
        extracted.page_count(),
        path.display()
    );
    Ok(extracted)
}
