//! Base64 helpers shared by PDF validation and persistence.
//!
//! The renderer emits PDFs as Base64 text on stdout. That text may be
//! wrapped across lines (MIME style) or carry a trailing newline, so every
//! decode first drops all ASCII whitespace. Encoding always uses the standard
//! alphabet with padding, which is what the renderer and most consumers
//! (browsers, `base64 -d`, Java's `Base64.getDecoder()`) expect.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Remove every ASCII whitespace character from `text`.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

/// Decode whitespace-stripped Base64 text into bytes.
pub fn decode_document(stripped: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let bytes = STANDARD.decode(stripped)?;
    debug!("Decoded {} base64 chars → {} bytes", stripped.len(), bytes.len());
    Ok(bytes)
}

/// Encode bytes as standard padded Base64.
pub fn encode_document(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_removes_newlines_and_spaces() {
        assert_eq!(strip_whitespace(" JVBE\r\nRi0x\tLjQ=\n"), "JVBERi0xLjQ=");
    }

    #[test]
    fn decode_wrapped_base64() {
        let wrapped = "JVBERi0x\nLjQ=\n";
        let bytes = decode_document(&strip_whitespace(wrapped)).expect("valid base64");
        assert_eq!(bytes, b"%PDF-1.4");
        assert_eq!(encode_document(&bytes), "JVBERi0xLjQ=");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_document("not*base64!").is_err());
    }
}
