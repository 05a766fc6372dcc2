//! # invoice-convert
//!
//! Convert XML invoices to HTML or PDF by driving an external Java renderer
//! over its standard streams.
//!
//! ## Why a subprocess?
//!
//! The invoice layout (XSLT, fonts, HTML → PDF via wkhtmltopdf) lives in a
//! separately versioned Java artifact. This crate treats it as an opaque
//! executable with a fixed contract and focuses on invoking it correctly:
//! streaming the payload without pipe deadlocks, reporting failures
//! faithfully, and refusing PDF output that is not actually a PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! payload
//!  │
//!  ├─ 1. Launch    java [jvm_args] -cp <jar>:<lib>/* InvoiceConverter <mode> <encoded>
//!  ├─ 2. Stream    write stdin ║ drain stdout ║ drain stderr   (concurrently)
//!  ├─ 3. Resolve   exit 0 → trimmed stdout; else stderr or exit code
//!  ├─ 4. Validate  PDF only: Base64 → find %PDF → strip preamble
//!  └─ 5. Output    HTML text or Base64 PDF + run stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use invoice_convert::{ConverterConfig, InvoiceConverter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = InvoiceConverter::new(
//!         ConverterConfig::builder()
//!             .jar_path("InvoiceConverter.jar")
//!             .lib_dir("lib")
//!             .build()?,
//!     );
//!     let xml = std::fs::read_to_string("invoice.xml")?;
//!
//!     let html = converter.convert_to_html(xml.clone(), false).await?;
//!     println!("HTML: {} chars", html.len());
//!
//!     let pdf = converter.convert_to_pdf_base64(xml, false).await?;
//!     invoice_convert::persist::write_base64_document(&pdf, "invoice.pdf").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `invoice-convert` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! invoice-convert = { version = "0.1", default-features = false }
//! ```
//!
//! ## Timeouts
//!
//! No timeout is applied unless [`ConverterConfig::timeout`] is set. A hung
//! renderer otherwise blocks its caller indefinitely; production callers
//! should set one.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod persist;
pub mod pipeline;
pub mod request;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConverterConfig, ConverterConfigBuilder, OutputMode};
pub use convert::{convert, convert_sync, convert_to_file, InvoiceConverter};
pub use error::ConvertError;
pub use output::{ConversionOutput, ConversionStats};
pub use request::ConversionRequest;

/// Installation check for the renderer's external binaries.
pub use invoice_toolcheck as toolcheck;
