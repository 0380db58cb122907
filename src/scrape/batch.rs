//! Batch aggregation policy: drives fetch + extract per item, applies the
//! per-item truncation limits, substitutes inline markers for failed items
//! and joins everything in input order.

use futures::future::join_all;
use tracing::{info, warn};

use crate::utils::content_guard::{detect_binary, truncate_chars, BinaryDetection};
use crate::utils::decode::decode_to_utf8;
use crate::utils::fetch::fetch_url;
use crate::utils::html_text::html_to_text;
use crate::utils::pdf::{extract_pdf_text, PdfError};

/// Separator between per-URL segments in the combined output. Part of the
/// wire contract. A page whose own text contains this literal token would
/// confuse a split-based re-parser; the token is not escaped (known
/// limitation, matching the upstream contract).
pub const PAGE_BREAK: &str = "\n\n--- PAGE BREAK ---\n\n";

/// Per-item truncation limits, in characters. PDFs get a larger budget;
/// they are expected to be denser, resume-length documents.
pub const HTML_TEXT_LIMIT: usize = 10_000;
pub const PDF_TEXT_LIMIT: usize = 15_000;

/// Outcome of one URL item. Failures stay structured until the
/// serialization boundary so logging sees more than the flattened marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Text(String),
    Failed { url: String, cause: String },
}

impl PageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, PageOutcome::Failed { .. })
    }

    /// Flatten to the wire form: successful text as-is, failures as an
    /// inline human-readable marker holding the URL and the cause.
    pub fn into_text(self) -> String {
        match self {
            PageOutcome::Text(text) => text,
            PageOutcome::Failed { url, cause } => format!("[Error scraping {}: {}]", url, cause),
        }
    }
}

/// Fetch one URL and reduce it to plain text, truncated to
/// [`HTML_TEXT_LIMIT`] characters. Every failure mode collapses into
/// `PageOutcome::Failed`; this function never aborts the batch.
pub async fn scrape_one(url: &str) -> PageOutcome {
    let page = match fetch_url(url).await {
        Ok(page) => page,
        Err(e) => {
            warn!(target: "scrape", url = %url, cause = %e, "fetch failed");
            return PageOutcome::Failed {
                url: url.to_string(),
                cause: e.to_string(),
            };
        }
    };

    let head_len = page.bytes.len().min(512);
    if let BinaryDetection::Binary { content_type } =
        detect_binary(page.content_type.as_deref(), &page.bytes[..head_len])
    {
        let ct = content_type.unwrap_or_else(|| "unknown".to_string());
        warn!(target: "scrape", url = %url, content_type = %ct, "binary content refused");
        return PageOutcome::Failed {
            url: url.to_string(),
            cause: format!("unsupported binary content ({})", ct),
        };
    }

    let decoded = decode_to_utf8(&page.bytes, page.content_type.as_deref());
    let text = html_to_text(&decoded);
    PageOutcome::Text(truncate_chars(text, HTML_TEXT_LIMIT))
}

/// Contract A: run every URL, one outcome per input. Items fan out
/// concurrently; `join_all` keeps the output in input order.
pub async fn scrape_batch(urls: &[String]) -> Vec<PageOutcome> {
    let outcomes = join_all(urls.iter().map(|url| scrape_one(url))).await;
    let failed = outcomes.iter().filter(|o| o.is_failed()).count();
    info!(target: "scrape", total = urls.len(), failed = failed, "scrape batch finished");
    outcomes
}

/// Join outcomes into the combined wire string. N inputs always produce
/// exactly N segments, success or failure.
pub fn combine(outcomes: Vec<PageOutcome>) -> String {
    outcomes
        .into_iter()
        .map(PageOutcome::into_text)
        .collect::<Vec<_>>()
        .join(PAGE_BREAK)
}

/// Extract the uploaded PDF's text, truncated to [`PDF_TEXT_LIMIT`]
/// characters. Extraction is CPU-bound and runs on the blocking pool;
/// failures (including a panicking parser) flatten to an inline marker the
/// same way URL items do.
pub async fn document_text(bytes: Vec<u8>) -> String {
    let extracted = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes)).await;
    match extracted {
        Ok(result) => flatten_document(result),
        Err(e) => {
            warn!(target: "scrape", cause = %e, "PDF extraction task failed");
            format!("[Error extracting PDF: {}]", e)
        }
    }
}

// Truncate-or-marker step for the document half, applied after extraction.
fn flatten_document(result: Result<String, PdfError>) -> String {
    match result {
        Ok(text) => truncate_chars(text, PDF_TEXT_LIMIT),
        Err(e) => {
            warn!(target: "scrape", cause = %e, "PDF extraction failed");
            format!("[Error extracting PDF: {}]", e)
        }
    }
}
