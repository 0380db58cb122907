// PDF text extraction over the `pdf-extract` crate. Documents are handled
// fully in memory; nothing is persisted.

use thiserror::Error;

/// Failure modes for PDF extraction. `NoText` is distinct from `Parse` so
/// image-based scans get their own marker downstream.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to parse PDF: {0}")]
    Parse(String),
    #[error("no extractable text found; the PDF may be image-based or scanned")]
    NoText,
}

/// Extracts text from a PDF held fully in memory, page by page in document
/// order. Pages with no extractable text contribute nothing by themselves;
/// only a fully empty document is an error.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, PdfError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| PdfError::Parse(e.to_string()))?;
    assemble_pages(pages)
}

// Trim per page, drop empty pages, join the rest with a blank line.
fn assemble_pages(pages: Vec<String>) -> Result<String, PdfError> {
    let text = pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    if text.is_empty() {
        return Err(PdfError::NoText);
    }
    Ok(text)
}

/// Returns true if the upload looks PDF-compatible:
/// - a declared content type containing "pdf" (case-insensitive), or
/// - magic bytes `%PDF-` when no usable type was declared.
pub fn is_pdf(content_type: Option<&str>, head: &[u8]) -> bool {
    match content_type {
        Some(ct) if !ct.trim().is_empty() => ct.to_ascii_lowercase().contains("pdf"),
        _ => head.starts_with(b"%PDF-"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_joined_with_a_blank_line() {
        let pages = vec!["page one".to_string(), "page two".to_string()];
        assert_eq!(assemble_pages(pages).unwrap(), "page one\n\npage two");
    }

    #[test]
    fn empty_pages_contribute_nothing() {
        let pages = vec![
            "first".to_string(),
            "   \n".to_string(),
            "last".to_string(),
        ];
        assert_eq!(assemble_pages(pages).unwrap(), "first\n\nlast");
    }

    #[test]
    fn fully_empty_document_is_the_image_based_error() {
        let pages = vec!["  ".to_string(), "\n\n".to_string()];
        let err = assemble_pages(pages).unwrap_err();
        assert!(matches!(err, PdfError::NoText));
        assert!(err.to_string().contains("image-based"));
    }

    #[test]
    fn corrupt_bytes_fail_as_parse_error() {
        let err = extract_pdf_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn detects_pdf_by_declared_type() {
        assert!(is_pdf(Some("application/pdf"), b""));
        assert!(is_pdf(Some("Application/PDF; charset=binary"), b""));
        assert!(!is_pdf(Some("text/plain"), b"%PDF-1.4"));
    }

    #[test]
    fn detects_pdf_by_magic_when_type_is_missing() {
        assert!(is_pdf(None, b"%PDF-1.7 ..."));
        assert!(is_pdf(Some("  "), b"%PDF-1.7 ..."));
        assert!(!is_pdf(None, b"GIF89a"));
    }
}
