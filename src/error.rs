//! Error type for the invoice-convert library.
//!
//! Every failure surfaces as a single [`ConvertError`]; nothing is retried
//! internally and no partial result is ever returned alongside an error.
//! The variants keep the three failure families apart so callers can react
//! differently to each:
//!
//! * **Launch** — the renderer could not be started at all
//!   ([`ConvertError::LaunchFailed`]). Usually an installation problem;
//!   run the installation check.
//!
//! * **Execution** — the renderer started and exited non-zero
//!   ([`ConvertError::Execution`]) or was killed after the configured
//!   timeout ([`ConvertError::Timeout`]).
//!
//! * **Validation** — the renderer claimed success but its PDF output does
//!   not contain a PDF stream ([`ConvertError::ValidationFailed`]).

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the invoice-convert library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Process errors ────────────────────────────────────────────────────
    /// The renderer executable could not be spawned (missing, not executable).
    #[error("Failed to launch renderer '{program}': {source}\nRun `invoice-convert --check` to verify the installation.")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer exited non-zero.
    ///
    /// `message` is the renderer's stderr verbatim when it wrote any,
    /// otherwise a generic message naming the exit code.
    #[error("{message}")]
    Execution { code: Option<i32>, message: String },

    /// The renderer did not finish within the configured timeout and was killed.
    #[error("Renderer timed out after {elapsed_ms}ms and was terminated")]
    Timeout { elapsed_ms: u64 },

    /// Writing the payload to the renderer's stdin failed for a reason other
    /// than the renderer closing its end early.
    #[error("Failed to send payload to renderer: {0}")]
    PayloadWrite(#[source] std::io::Error),

    // ── Output errors ─────────────────────────────────────────────────────
    /// PDF output did not contain a `%PDF` stream, or could not be decoded.
    #[error("PDF validation failed: {0}")]
    ValidationFailed(String),

    /// A Base64 document handed to the persistence helpers is not valid Base64.
    #[error("Invalid Base64 document: {0}")]
    InvalidBase64(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Payload file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the payload file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output document.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while talking to the renderer process.
    #[error("Renderer I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// Build an [`ConvertError::Execution`] from the renderer's exit code and
    /// captured stderr.
    pub fn execution(code: Option<i32>, stderr: &str) -> Self {
        let message = if !stderr.is_empty() {
            stderr.to_string()
        } else {
            match code {
                Some(c) => format!("Renderer process exited with code {c}"),
                None => "Renderer process was terminated by a signal".to_string(),
            }
        };
        ConvertError::Execution { code, message }
    }

    /// `true` when the renderer never started.
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, ConvertError::LaunchFailed { .. })
    }

    /// `true` when the renderer was killed for exceeding the timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ConvertError::Timeout { .. })
    }

    /// The renderer's exit code, for execution failures that have one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ConvertError::Execution { code, .. } => *code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_message_is_stderr_verbatim() {
        let e = ConvertError::execution(Some(1), "XML parse error at line 3\n");
        assert_eq!(e.to_string(), "XML parse error at line 3\n");
        assert_eq!(e.exit_code(), Some(1));
    }

    #[test]
    fn execution_message_without_stderr_names_code() {
        let e = ConvertError::execution(Some(42), "");
        let msg = e.to_string();
        assert!(msg.contains("42"), "got: {msg}");
    }

    #[test]
    fn execution_message_for_signal() {
        let e = ConvertError::execution(None, "");
        assert!(e.to_string().contains("signal"));
        assert_eq!(e.exit_code(), None);
    }

    #[test]
    fn launch_failure_display() {
        let e = ConvertError::LaunchFailed {
            program: "java".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        };
        assert!(e.is_launch_failure());
        let msg = e.to_string();
        assert!(msg.starts_with("Failed to launch renderer 'java'"), "got: {msg}");
    }

    #[test]
    fn validation_display() {
        let e = ConvertError::ValidationFailed("no %PDF marker".into());
        assert_eq!(e.to_string(), "PDF validation failed: no %PDF marker");
        assert!(!e.is_launch_failure());
    }

    #[test]
    fn timeout_display() {
        let e = ConvertError::Timeout { elapsed_ms: 1500 };
        assert!(e.is_timeout());
        assert!(e.to_string().contains("1500ms"));
    }
}
