//! Conversion entry points.
//!
//! [`InvoiceConverter`] holds a [`ConverterConfig`] and exposes the two
//! everyday calls, [`InvoiceConverter::convert_to_html`] and
//! [`InvoiceConverter::convert_to_pdf_base64`], plus the richer
//! [`InvoiceConverter::convert`] that also reports run statistics.
//!
//! Every call spawns its own renderer process with its own pipes; nothing is
//! shared between calls, so a converter can be cloned or wrapped in an `Arc`
//! and used from many tasks at once.

use crate::config::{ConverterConfig, OutputMode};
use crate::error::ConvertError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::persist;
use crate::pipeline::{launch::LaunchSpec, process, validate};
use crate::request::ConversionRequest;
use futures::stream::{self, StreamExt};
use std::path::Path;
use tracing::{info, warn};

/// Converts XML invoices by driving the external renderer.
#[derive(Debug, Clone, Default)]
pub struct InvoiceConverter {
    config: ConverterConfig,
}

impl InvoiceConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Render `payload` to HTML.
    ///
    /// Returns the renderer's stdout with surrounding whitespace trimmed.
    pub async fn convert_to_html(
        &self,
        payload: impl Into<Vec<u8>>,
        is_payload_encoded: bool,
    ) -> Result<String, ConvertError> {
        let request = ConversionRequest::html(payload).payload_encoded(is_payload_encoded);
        Ok(self.convert(&request).await?.into_content())
    }

    /// Render `payload` to PDF, returned as validated Base64.
    ///
    /// The result always decodes to bytes starting with `%PDF`.
    pub async fn convert_to_pdf_base64(
        &self,
        payload: impl Into<Vec<u8>>,
        is_payload_encoded: bool,
    ) -> Result<String, ConvertError> {
        let request = ConversionRequest::pdf(payload).payload_encoded(is_payload_encoded);
        Ok(self.convert(&request).await?.into_content())
    }

    /// Run one conversion and return the document with its statistics.
    ///
    /// # Errors
    /// - [`ConvertError::LaunchFailed`] — the renderer could not be started
    /// - [`ConvertError::Execution`] — the renderer exited non-zero
    /// - [`ConvertError::Timeout`] — the configured timeout elapsed
    /// - [`ConvertError::ValidationFailed`] — PDF output has no `%PDF` stream
    pub async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionOutput, ConvertError> {
        let mode = request.mode();
        info!(
            "Starting {} conversion ({} payload bytes{})",
            mode,
            request.payload().len(),
            if request.is_payload_encoded() { ", base64" } else { "" }
        );

        let spec = LaunchSpec::new(&self.config, mode, request.is_payload_encoded());
        let run = process::run_renderer(&spec, request.payload(), self.config.timeout).await?;

        let output_bytes = run.stdout.len();
        let diagnostic_bytes = run.stderr.len();
        let duration_ms = run.elapsed.as_millis() as u64;

        let text = run.into_result()?;

        let (content, pdf_preamble_bytes) = match mode {
            OutputMode::Html => (text, 0),
            OutputMode::Pdf => {
                let pdf = validate::validate_pdf_base64(&text)?;
                (pdf.base64, pdf.preamble_bytes)
            }
        };

        let stats = ConversionStats {
            payload_bytes: request.payload().len(),
            output_bytes,
            diagnostic_bytes,
            pdf_preamble_bytes,
            duration_ms,
        };

        info!(
            "Conversion complete: {} → {} chars in {}ms",
            mode,
            content.len(),
            duration_ms
        );

        Ok(ConversionOutput {
            mode,
            content,
            stats,
        })
    }

    /// Run many conversions, at most `config.concurrency` renderers at a time.
    ///
    /// Results come back in request order. One failure does not affect the
    /// others; each slot carries its own `Result`.
    pub async fn convert_many(
        &self,
        requests: &[ConversionRequest],
    ) -> Vec<Result<ConversionOutput, ConvertError>> {
        let total = requests.len();
        let mut results: Vec<(usize, Result<ConversionOutput, ConvertError>)> =
            stream::iter(requests.iter().enumerate().map(|(idx, request)| async move {
                let result = self.convert(request).await;
                if let Err(ref e) = result {
                    warn!("Conversion {}/{} failed: {}", idx + 1, total, e);
                }
                (idx, result)
            }))
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        results.sort_by_key(|(idx, _)| *idx);
        results.into_iter().map(|(_, r)| r).collect()
    }

    /// Convert and write the document to `output_path`.
    ///
    /// HTML is written as UTF-8 text; PDF is Base64-decoded and written as
    /// binary. The write is atomic (temp file + rename).
    pub async fn convert_to_file(
        &self,
        request: &ConversionRequest,
        output_path: impl AsRef<Path>,
    ) -> Result<ConversionStats, ConvertError> {
        let output = self.convert(request).await?;
        let path = output_path.as_ref();

        match output.mode {
            OutputMode::Html => persist::write_text_document(&output.content, path).await?,
            OutputMode::Pdf => persist::write_base64_document(&output.content, path).await?,
        };

        info!("Saved {} document to {}", output.mode, path.display());
        Ok(output.stats)
    }
}

/// Convert a single request with `config`.
///
/// Shorthand for `InvoiceConverter::new(config.clone()).convert(request)`.
pub async fn convert(
    request: &ConversionRequest,
    config: &ConverterConfig,
) -> Result<ConversionOutput, ConvertError> {
    InvoiceConverter::new(config.clone()).convert(request).await
}

/// Convert a request and write the result to `output_path`.
pub async fn convert_to_file(
    request: &ConversionRequest,
    output_path: impl AsRef<Path>,
    config: &ConverterConfig,
) -> Result<ConversionStats, ConvertError> {
    InvoiceConverter::new(config.clone())
        .convert_to_file(request, output_path)
        .await
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally; do not call from inside
/// an async context.
pub fn convert_sync(
    request: &ConversionRequest,
    config: &ConverterConfig,
) -> Result<ConversionOutput, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(request, config))
}
