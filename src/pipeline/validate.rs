//! PDF output validation.
//!
//! The renderer reports success through its exit code alone, so a zero exit
//! does not guarantee the Base64 on stdout is a PDF. Some renderer builds
//! also print log noise in front of the document before encoding it. This
//! stage decodes the output and looks for the `%PDF` header:
//!
//! 1. Header at offset 0 → the stripped Base64 is returned untouched.
//! 2. Header at offset k > 0 → bytes `[k, end)` are re-encoded; the preamble
//!    is dropped.
//! 3. No header anywhere → [`ConvertError::ValidationFailed`].
//!
//! Decoding errors are reported as validation failures too, carrying the
//! decoder's message.

use crate::error::ConvertError;
use crate::pipeline::encode::{decode_document, encode_document, strip_whitespace};
use tracing::{debug, warn};

/// Magic bytes that open every PDF stream.
pub const PDF_MARKER: &[u8; 4] = b"%PDF";

/// A Base64 PDF that starts with [`PDF_MARKER`] once decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPdf {
    /// Whitespace-free Base64 of the PDF stream.
    pub base64: String,
    /// Decoded bytes discarded before the marker.
    pub preamble_bytes: usize,
}

/// Validate the renderer's Base64 PDF output, recovering from a preamble.
pub fn validate_pdf_base64(encoded: &str) -> Result<ValidatedPdf, ConvertError> {
    let stripped = strip_whitespace(encoded);
    let bytes = decode_document(&stripped)
        .map_err(|e| ConvertError::ValidationFailed(format!("output is not valid Base64: {e}")))?;

    if bytes.starts_with(PDF_MARKER) {
        debug!("PDF output valid ({} bytes)", bytes.len());
        return Ok(ValidatedPdf {
            base64: stripped,
            preamble_bytes: 0,
        });
    }

    match find_marker(&bytes) {
        Some(offset) => {
            warn!(
                "Renderer output had {} bytes before the PDF header; stripping them",
                offset
            );
            Ok(ValidatedPdf {
                base64: encode_document(&bytes[offset..]),
                preamble_bytes: offset,
            })
        }
        None => Err(ConvertError::ValidationFailed(format!(
            "content is not a recognizable PDF (no %PDF marker in {} decoded bytes)",
            bytes.len()
        ))),
    }
}

/// Offset of the first [`PDF_MARKER`] in `bytes`.
fn find_marker(bytes: &[u8]) -> Option<usize> {
    bytes.windows(PDF_MARKER.len()).position(|w| w == PDF_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encode::encode_document;

    #[test]
    fn clean_pdf_is_returned_unchanged() {
        let b64 = encode_document(b"%PDF-1.4\n...%%EOF");
        let v = validate_pdf_base64(&b64).unwrap();
        assert_eq!(v.base64, b64);
        assert_eq!(v.preamble_bytes, 0);
    }

    #[test]
    fn whitespace_is_stripped_from_clean_pdf() {
        let b64 = encode_document(b"%PDF-1.7 body");
        let (head, tail) = b64.split_at(8);
        let wrapped = format!("  {head}\n{tail}\r\n");
        let v = validate_pdf_base64(&wrapped).unwrap();
        assert_eq!(v.base64, b64);
    }

    #[test]
    fn preamble_is_dropped() {
        let v = validate_pdf_base64(&encode_document(b"junk%PDF-1.4...%%EOF")).unwrap();
        assert_eq!(v.base64, encode_document(b"%PDF-1.4...%%EOF"));
        assert_eq!(v.preamble_bytes, 4);
    }

    #[test]
    fn first_marker_wins() {
        let v = validate_pdf_base64(&encode_document(b"log: %PDF-1.4 a %PDF-1.5 b")).unwrap();
        assert_eq!(v.base64, encode_document(b"%PDF-1.4 a %PDF-1.5 b"));
    }

    #[test]
    fn missing_marker_fails() {
        let err = validate_pdf_base64(&encode_document(b"<html>not a pdf</html>")).unwrap_err();
        assert!(matches!(err, ConvertError::ValidationFailed(_)));
        assert!(err.to_string().contains("not a recognizable PDF"));
    }

    #[test]
    fn truncated_marker_fails() {
        assert!(validate_pdf_base64(&encode_document(b"%PD")).is_err());
    }

    #[test]
    fn empty_output_fails() {
        assert!(matches!(
            validate_pdf_base64("").unwrap_err(),
            ConvertError::ValidationFailed(_)
        ));
    }

    #[test]
    fn invalid_base64_is_a_validation_failure() {
        let err = validate_pdf_base64("%%% definitely not base64 %%%").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("PDF validation failed:"), "got: {msg}");
        assert!(msg.contains("Base64"), "got: {msg}");
    }
}
