/// Decode fetched bytes into a UTF-8 string using, in order: BOM sniffing,
/// the charset declared in the Content-Type header, and chardetng detection.
/// The last resort accepts replacement characters; real pages are frequently
/// mislabeled and extraction stays best-effort rather than failing the item.
pub fn decode_to_utf8(bytes: &[u8], content_type: Option<&str>) -> String {
    // 1) BOM sniff first (covers UTF-8/UTF-16 BOM)
    if let Some((enc, offset)) = encoding_rs::Encoding::for_bom(bytes) {
        let (cow, _used, _had_errors) = enc.decode(&bytes[offset..]);
        return cow.into_owned();
    }

    // 2) Charset from the Content-Type header, when it decodes cleanly
    if let Some(label) = extract_charset_label(content_type) {
        if let Some(enc) = encoding_rs::Encoding::for_label_no_replacement(label.as_bytes()) {
            let (cow, _used, had_errors) = enc.decode(bytes);
            if !had_errors {
                return cow.into_owned();
            }
        }
    }

    // 3) chardetng guess, replacements accepted
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    let (cow, _used, _had_errors) = enc.decode(bytes);
    cow.into_owned()
}

/// Extracts charset=... value from a Content-Type header (case-insensitive).
fn extract_charset_label(content_type: Option<&str>) -> Option<String> {
    let ct = content_type?;
    for part in ct.split(';').skip(1) {
        let kv = part.trim();
        if kv.to_ascii_lowercase().starts_with("charset=") {
            let v = kv[8..].trim();
            let v = v.trim_matches('"').trim_matches('\'');
            if !v.is_empty() {
                return Some(v.to_string());
            }
        }
    }
    None
}
