use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

// Firefox ESR User-Agent string to reduce server-side variance
pub const FIREFOX_UA: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:115.0) Gecko/20100101 Firefox/115.0";

/// Per-request fetch timeout. Part of the service contract: a broken URL can
/// stall its own item for at most this long, never the whole batch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_REDIRECTS: usize = 10;

// Shared HTTP client with a fixed timeout. Redirect chains are capped so a
// redirect loop fails the item instead of hanging it.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(FETCH_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .expect("Failed to create HTTP client")
});

/// Raw result of a successful fetch: body bytes plus the declared
/// Content-Type, if the server sent one.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Every way a fetch can fail, collapsed to a cause description suitable for
/// the inline error marker. No retries.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP error {status}: {reason}")]
    Status { status: u16, reason: String },
}

/// Issue a single GET against an absolute HTTP(S) URL.
/// Malformed URLs and non-HTTP schemes are rejected before any network call;
/// any non-success status is a failure.
pub async fn fetch_url(raw_url: &str) -> Result<FetchedPage, FetchError> {
    let parsed = url::Url::parse(raw_url)?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(FetchError::UnsupportedScheme(other.to_string())),
    }

    info!(target: "fetch", url = %parsed, "Starting HTTP fetch");

    let response = HTTP_CLIENT
        .get(parsed.as_str())
        .header("User-Agent", FIREFOX_UA)
        .send()
        .await
        .map_err(|e| {
            warn!(target: "fetch", url = %parsed, "HTTP transport error: {}", e);
            FetchError::Transport(describe_transport_error(&e))
        })?;

    let status = response.status();
    if !status.is_success() {
        warn!(target: "fetch", url = %parsed, status = status.as_u16(), "HTTP non-success status");
        return Err(FetchError::Status {
            status: status.as_u16(),
            reason: status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        });
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|ct| ct.to_str().ok())
        .map(|s| s.to_string());

    let bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::Transport(format!("failed to read response body: {}", e)))?;

    info!(target: "fetch", url = %parsed, size = bytes.len(), ct = ?content_type, "HTTP fetch completed");

    Ok(FetchedPage {
        bytes: bytes.to_vec(),
        content_type,
    })
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("timed out after {} seconds", FETCH_TIMEOUT.as_secs())
    } else if err.is_redirect() {
        "too many redirects".to_string()
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn rejects_malformed_url_before_any_network_call() {
        let err = fetch_url("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn rejects_non_http_scheme() {
        let err = fetch_url("ftp://example.com/file").await.unwrap_err();
        match err {
            FetchError::UnsupportedScheme(scheme) => assert_eq!(scheme, "ftp"),
            other => panic!("expected UnsupportedScheme, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn returns_body_and_content_type_on_success() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/page");
                then.status(200)
                    .header("content-type", "text/html; charset=utf-8")
                    .body("<html><body>ok</body></html>");
            })
            .await;

        let page = fetch_url(&server.url("/page")).await.unwrap();
        assert_eq!(page.bytes, b"<html><body>ok</body></html>");
        assert_eq!(
            page.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );
    }

    #[tokio::test]
    async fn non_success_status_is_a_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404).body("gone");
            })
            .await;

        let err = fetch_url(&server.url("/missing")).await.unwrap_err();
        match err {
            FetchError::Status { status, .. } => assert_eq!(status, 404),
            other => panic!("expected Status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn connection_failure_collapses_to_transport_error() {
        // Port 9 (discard) is closed in practice; connect is refused fast.
        let err = fetch_url("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
