use std::net::SocketAddr;

use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::types::{ErrorResponse, ProcessResponse, ScrapeRequest, ScrapeResponse};
use crate::scrape::batch::{combine, document_text, scrape_batch};
use crate::utils::pdf::is_pdf;

/// Upload cap for the document endpoint.
pub const MAX_PDF_BYTES: usize = 5 * 1024 * 1024;

// Room for multipart framing and the urls field on top of the PDF cap.
const BODY_LIMIT: usize = MAX_PDF_BYTES + 64 * 1024;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/scrape", post(scrape))
        .route("/process", post(process))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router()).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Batch URL scrape. Never fails as a whole: failed items appear as inline
/// markers inside the combined text, so an all-failure batch is still a 200.
async fn scrape(Json(request): Json<ScrapeRequest>) -> Json<ScrapeResponse> {
    info!(urls = request.urls.len(), "scrape request");
    let outcomes = scrape_batch(&request.urls).await;
    Json(ScrapeResponse {
        combined_text: combine(outcomes),
    })
}

/// Document + URL processing. A missing or non-PDF upload is a caller
/// contract violation and rejected up front; everything past that point
/// degrades per item. The `urls` field carries a JSON-encoded array and
/// falls back to an empty list when absent or malformed.
async fn process(mut multipart: Multipart) -> Result<Json<ProcessResponse>, ApiError> {
    let mut pdf: Option<(Option<String>, Vec<u8>)> = None;
    let mut urls_json: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("malformed multipart request: {}", e)))?
    {
        match field.name() {
            Some("pdf") => {
                let content_type = field.content_type().map(|ct| ct.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("failed to read 'pdf' field: {}", e)))?;
                pdf = Some((content_type, bytes.to_vec()));
            }
            Some("urls") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("failed to read 'urls' field: {}", e)))?;
                urls_json = Some(text);
            }
            _ => {}
        }
    }

    let (content_type, pdf_bytes) = pdf.ok_or_else(|| bad_request("missing 'pdf' file field"))?;

    let head_len = pdf_bytes.len().min(512);
    if !is_pdf(content_type.as_deref(), &pdf_bytes[..head_len]) {
        return Err(bad_request("only PDF uploads are supported"));
    }
    if pdf_bytes.len() > MAX_PDF_BYTES {
        return Err(bad_request(format!(
            "PDF exceeds the {} MiB upload limit",
            MAX_PDF_BYTES / (1024 * 1024)
        )));
    }

    let urls: Vec<String> = urls_json
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default();

    info!(urls = urls.len(), pdf_bytes = pdf_bytes.len(), "process request");

    // The two halves have no data dependency; run them concurrently.
    let (outcomes, document) = tokio::join!(scrape_batch(&urls), document_text(pdf_bytes));

    Ok(Json(ProcessResponse {
        combined_text: combine(outcomes),
        document_text: document,
    }))
}
