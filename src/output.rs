//! Conversion results.

use crate::config::OutputMode;
use serde::{Deserialize, Serialize};

/// The rendered document plus bookkeeping about the renderer run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Mode the document was rendered in.
    pub mode: OutputMode,
    /// HTML text (HTML mode) or validated Base64 PDF (PDF mode).
    pub content: String,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Consume the output, keeping only the document.
    pub fn into_content(self) -> String {
        self.content
    }
}

/// Numbers describing one renderer run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Bytes written to the renderer's stdin.
    pub payload_bytes: usize,
    /// Bytes the renderer wrote to stdout.
    pub output_bytes: usize,
    /// Bytes the renderer wrote to stderr. Logged, not returned, on success.
    pub diagnostic_bytes: usize,
    /// Decoded bytes dropped in front of the `%PDF` marker. Always 0 for HTML.
    pub pdf_preamble_bytes: usize,
    /// Wall-clock time from spawn to exit.
    pub duration_ms: u64,
}
