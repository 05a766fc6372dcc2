//! A single conversion request.

use crate::config::OutputMode;

/// One document to convert.
///
/// The payload is handed to the renderer byte-for-byte; the pipeline never
/// inspects or rewrites it. `mode` is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    payload: Vec<u8>,
    payload_encoded: bool,
    mode: OutputMode,
}

impl ConversionRequest {
    /// A request for `mode` with a raw (not Base64-encoded) payload.
    pub fn new(payload: impl Into<Vec<u8>>, mode: OutputMode) -> Self {
        Self {
            payload: payload.into(),
            payload_encoded: false,
            mode,
        }
    }

    pub fn html(payload: impl Into<Vec<u8>>) -> Self {
        Self::new(payload, OutputMode::Html)
    }

    pub fn pdf(payload: impl Into<Vec<u8>>) -> Self {
        Self::new(payload, OutputMode::Pdf)
    }

    /// Mark the payload as already Base64-encoded; the renderer decodes it.
    pub fn payload_encoded(mut self, encoded: bool) -> Self {
        self.payload_encoded = encoded;
        self
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn is_payload_encoded(&self) -> bool {
        self.payload_encoded
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_mode_and_default_flag() {
        let r = ConversionRequest::html("<invoice/>");
        assert_eq!(r.mode(), OutputMode::Html);
        assert!(!r.is_payload_encoded());
        assert_eq!(r.payload(), b"<invoice/>");

        let r = ConversionRequest::pdf(b"PGludm9pY2UvPg==".to_vec()).payload_encoded(true);
        assert_eq!(r.mode(), OutputMode::Pdf);
        assert!(r.is_payload_encoded());
    }
}
