/// Result of binary detection based on Content-Type and magic bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryDetection {
    /// Content is considered binary; optional MIME is provided when known
    Binary { content_type: Option<String> },
    /// Content is considered textual (safe to decode and parse as HTML)
    Text,
}

/// Detects whether fetched content should be treated as binary, using the
/// MIME type and/or magic signatures in the head bytes. Binary payloads
/// (images, archives, PDFs arriving over the URL path) fail the item instead
/// of being parsed as HTML and turned into mojibake.
///
/// content_type: Optional Content-Type value from response headers
/// head: First bytes of the body (recommended ~512 bytes)
pub fn detect_binary(content_type: Option<&str>, head: &[u8]) -> BinaryDetection {
    // 1) Check MIME if available
    if let Some(ct_raw) = content_type {
        let ct = ct_raw.trim().to_ascii_lowercase();

        // Type/subtype without parameters (`text/html; charset=utf-8` -> `text/html`)
        let mime_main = ct.split(';').next().unwrap_or("").trim();

        let is_textual = mime_main.starts_with("text/")
            || matches!(
                mime_main,
                "application/json"
                    | "application/xml"
                    | "application/javascript"
                    | "application/xhtml+xml"
            );

        if is_textual {
            return BinaryDetection::Text;
        }

        let is_explicit_binary = mime_main.starts_with("image/")
            || mime_main.starts_with("audio/")
            || mime_main.starts_with("video/")
            || mime_main.starts_with("font/")
            || mime_main == "application/pdf"
            || mime_main == "application/zip"
            || mime_main == "application/gzip"
            || mime_main == "application/octet-stream"
            || mime_main.starts_with("application/x-")
            || mime_main.starts_with("application/vnd.");

        if is_explicit_binary {
            return BinaryDetection::Binary {
                content_type: Some(mime_main.to_string()),
            };
        }
        // Unrecognized MIME: fall through to signature-based detection
    }

    // 2) Signature-based detection on the first bytes
    const PDF: &[u8] = b"%PDF-";
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];
    const GIF: &[u8] = b"GIF8";
    const RIFF: &[u8] = b"RIFF"; // WebP, WAV, AVI container
    const ZIP: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
    const GZIP: &[u8] = &[0x1F, 0x8B];

    let starts_with = |pat: &[u8]| head.len() >= pat.len() && &head[..pat.len()] == pat;

    let is_binary_by_magic = starts_with(PDF)
        || starts_with(PNG)
        || starts_with(JPEG)
        || starts_with(GIF)
        || starts_with(RIFF)
        || starts_with(ZIP)
        || starts_with(GZIP);

    if is_binary_by_magic {
        return BinaryDetection::Binary { content_type: None };
    }

    BinaryDetection::Text
}

/// Hard character cut for per-item output limits. Not sentence-aware; the
/// cut always lands on a `char` boundary.
pub fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((byte_idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_idx);
    }
    text
}
