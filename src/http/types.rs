use serde::{Deserialize, Serialize};

/// Body of `POST /scrape`: an ordered list of absolute URLs.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeRequest {
    pub urls: Vec<String>,
}

/// Response of `POST /scrape`: one combined text blob, one segment per
/// input URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub combined_text: String,
}

/// Response of `POST /process`. The two halves are independent and are
/// never joined together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub combined_text: String,
    pub document_text: String,
}

/// Client-error body for transport-level rejections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
