//! Input decoding for HTML read from files or stdin.

use std::borrow::Cow;

use encoding_rs::Encoding;

/// How many leading bytes are searched for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// Decode bytes to a string.
///
/// UTF-8 is tried first (a BOM is honoured). Malformed input is decoded
/// with the hinted encoding when it names one, and with Windows-1252
/// otherwise, which is what office exports of French text usually are.
pub fn decode_text<'a>(bytes: &'a [u8], hint: Option<&str>) -> Cow<'a, str> {
    let (result, _, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    if let Some(encoding) = hint.and_then(|name| Encoding::for_label(name.trim().as_bytes())) {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Decode an HTML document, using its `<meta charset>` as the hint.
pub fn decode_html(bytes: &[u8]) -> Cow<'_, str> {
    decode_text(bytes, html_charset(bytes))
}

/// Extract the charset declared in the head of an HTML document.
///
/// Handles both `<meta charset="...">` and the `content="...; charset=..."`
/// form.
pub fn html_charset(bytes: &[u8]) -> Option<&str> {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    let pos = head
        .windows(8)
        .position(|w| w.eq_ignore_ascii_case(b"charset="))?;
    let rest = &head[pos + 8..];
    let rest = match rest.first() {
        Some(b'"' | b'\'') => &rest[1..],
        _ => rest,
    };
    let end = rest
        .iter()
        .position(|b| matches!(b, b'"' | b'\'' | b';' | b'>' | b'/') || b.is_ascii_whitespace())
        .unwrap_or(rest.len());
    std::str::from_utf8(&rest[..end]).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_with_bom() {
        let bytes = b"\xEF\xBB\xBFcaf\xC3\xA9";
        assert_eq!(decode_text(bytes, None), "café");
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        // "été" in Windows-1252
        assert_eq!(decode_text(b"\xE9t\xE9", None), "été");
    }

    #[test]
    fn test_decode_uses_hint() {
        // U+20AC in ISO-8859-15 is 0xA4
        assert_eq!(decode_text(b"5 \xA4", Some("iso-8859-15")), "5 €");
    }

    #[test]
    fn test_html_charset() {
        assert_eq!(html_charset(br#"<meta charset="ISO-8859-1">"#), Some("ISO-8859-1"));
        assert_eq!(
            html_charset(br#"<meta http-equiv="Content-Type" content="text/html; charset=windows-1252">"#),
            Some("windows-1252")
        );
        assert_eq!(html_charset(b"<p>pas de charset</p>"), None);
    }

    #[test]
    fn test_decode_html_declared_charset() {
        let bytes = b"<meta charset=\"iso-8859-15\"><p>\xA4</p>";
        assert!(decode_html(bytes).contains('€'));
    }
}
