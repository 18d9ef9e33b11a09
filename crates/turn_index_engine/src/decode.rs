use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Bytes of the document head searched for a `<meta charset>` declaration.
const META_SCAN_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSnapshot {
    pub html: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode snapshot as {encoding}: malformed byte sequence")]
    Malformed { encoding: String },
}

/// Decode a saved page into UTF-8 using: BOM -> meta charset -> chardetng fallback.
pub fn decode_snapshot(bytes: &[u8]) -> Result<DecodedSnapshot, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(encoding) = meta_charset(bytes).and_then(|label| Encoding::for_label(label.as_bytes())) {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    decode_with(bytes, encoding)
}

/// Charset label from `<meta charset=...>` or an `http-equiv` content type,
/// looked up in the first bytes of the document.
fn meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_SCAN_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    (!label.is_empty()).then_some(label)
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedSnapshot, DecodeError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::Malformed {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(DecodedSnapshot {
        html: text.into_owned(),
        encoding_label: encoding.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bom_wins_over_meta() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(br#"<meta charset="windows-1252"><p>caf"#);
        bytes.extend_from_slice(&[0xC3, 0xA9]);
        bytes.extend_from_slice(b"</p>");
        let decoded = decode_snapshot(&bytes).unwrap();
        assert_eq!(decoded.encoding_label, "UTF-8");
        assert!(decoded.html.contains("<p>café</p>"));
    }

    #[test]
    fn meta_charset_is_honoured() {
        let mut bytes = br#"<html><head><meta charset="windows-1252"></head><body>caf"#.to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"</body></html>");
        let decoded = decode_snapshot(&bytes).unwrap();
        assert_eq!(decoded.encoding_label, "windows-1252");
        assert!(decoded.html.contains("café"));
    }

    #[test]
    fn http_equiv_content_type_is_honoured() {
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">"#;
        assert_eq!(meta_charset(html).as_deref(), Some("iso-8859-1"));
    }

    #[test]
    fn plain_utf8_is_sniffed() {
        let decoded = decode_snapshot("<p>What is 2+2? ✓</p>".as_bytes()).unwrap();
        assert_eq!(decoded.html, "<p>What is 2+2? ✓</p>");
    }
}
