// Byte-level decoding for HTML sources of unknown encoding

use crate::error::MergeError;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    /// WHATWG name of the encoding actually used
    pub encoding: &'static str,
    /// True when malformed sequences were replaced with U+FFFD
    pub had_errors: bool,
}

/// Decode bytes of unknown encoding: a BOM wins, otherwise the charset is
/// sniffed from content. Invalid sequences are replaced, never fatal.
pub fn decode_unknown(bytes: &[u8]) -> DecodedText {
    let encoding = match Encoding::for_bom(bytes) {
        Some((encoding, _)) => encoding,
        None => {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        }
    };
    decode_with(encoding, bytes)
}

/// Decode bytes that are expected to be UTF-8 (a BOM for another encoding
/// still takes precedence).
pub fn decode_utf8(bytes: &[u8]) -> DecodedText {
    decode_with(UTF_8, bytes)
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> DecodedText {
    let (text, used, had_errors) = encoding.decode(bytes);
    DecodedText {
        text: text.into_owned(),
        encoding: used.name(),
        had_errors,
    }
}

/// Read the template file as UTF-8.
pub fn read_template(path: &Path) -> Result<DecodedText, MergeError> {
    let bytes = fs::read(path).map_err(|source| MergeError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_utf8(&bytes))
}

/// Read the second document, detecting its encoding.
pub fn read_source(path: &Path) -> Result<DecodedText, MergeError> {
    let bytes = fs::read(path).map_err(|source| MergeError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_unknown(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::SHIFT_JIS;

    #[test]
    fn test_utf8_passthrough() {
        let decoded = decode_unknown("<p>こんにちは</p>".as_bytes());
        assert_eq!(decoded.text, "<p>こんにちは</p>");
        assert_eq!(decoded.encoding, "UTF-8");
        assert!(!decoded.had_errors);
    }

    #[test]
    fn test_bom_wins() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"<p>x</p>");
        let decoded = decode_unknown(&bytes);
        assert_eq!(decoded.text, "<p>x</p>");
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn test_shift_jis_detected() {
        let html = "<html><head><title>応募フォーム</title></head><body><label>はい、応募します</label><label>いいえ、応募しません</label></body></html>";
        let (bytes, _, _) = SHIFT_JIS.encode(html);
        let decoded = decode_unknown(&bytes);
        assert_eq!(decoded.encoding, "Shift_JIS");
        assert_eq!(decoded.text, html);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let decoded = decode_utf8(b"<p>ok\xFF</p>");
        assert!(decoded.had_errors);
        assert_eq!(decoded.text, "<p>ok\u{FFFD}</p>");
    }

    #[test]
    fn test_missing_file_is_typed_error() {
        let err = read_template(Path::new("definitely/not/here.html")).unwrap_err();
        assert!(matches!(err, MergeError::TemplateRead { .. }));
    }
}
