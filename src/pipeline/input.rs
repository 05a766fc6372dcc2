//! Input resolution: load a payload from a file path or from stdin.
//!
//! The library itself takes payload bytes; this stage exists for callers
//! (the CLI among them) that start from a user-supplied path. `-` means
//! standard input. Files are checked up front so a typo produces a clear
//! "not found" rather than an opaque renderer failure.

use crate::error::ConvertError;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Where a payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    /// Read everything from standard input.
    Stdin,
    /// Read a local file.
    File(PathBuf),
}

impl PayloadSource {
    /// Interpret a user-supplied input argument.
    pub fn parse(input: &str) -> Self {
        if is_stdin(input) {
            PayloadSource::Stdin
        } else {
            PayloadSource::File(PathBuf::from(input))
        }
    }
}

/// Check if the input string denotes standard input.
pub fn is_stdin(input: &str) -> bool {
    input == "-"
}

/// Read the whole payload from `source`.
pub async fn read_payload(source: &PayloadSource) -> Result<Vec<u8>, ConvertError> {
    match source {
        PayloadSource::Stdin => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            debug!("Read {} payload bytes from stdin", buf.len());
            Ok(buf)
        }
        PayloadSource::File(path) => read_local(path).await,
    }
}

/// Read a local file, mapping the common failures to dedicated errors.
async fn read_local(path: &Path) -> Result<Vec<u8>, ConvertError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            debug!("Read {} payload bytes from {}", bytes.len(), path.display());
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConvertError::InputNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(ConvertError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(e) => Err(ConvertError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_stdin() {
        assert!(is_stdin("-"));
        assert!(!is_stdin("invoice.xml"));
        assert!(!is_stdin("--"));
        assert!(!is_stdin(""));
    }

    #[test]
    fn parse_source() {
        assert_eq!(PayloadSource::parse("-"), PayloadSource::Stdin);
        assert_eq!(
            PayloadSource::parse("in/invoice.xml"),
            PayloadSource::File(PathBuf::from("in/invoice.xml"))
        );
    }

    #[tokio::test]
    async fn reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.xml");
        std::fs::write(&path, "<Invoice/>").unwrap();
        let bytes = read_payload(&PayloadSource::File(path)).await.unwrap();
        assert_eq!(bytes, b"<Invoice/>");
    }

    #[tokio::test]
    async fn missing_file_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.xml");
        let err = read_payload(&PayloadSource::File(path.clone()))
            .await
            .unwrap_err();
        match err {
            ConvertError::InputNotFound { path: p } => assert_eq!(p, path),
            other => panic!("expected InputNotFound, got {other:?}"),
        }
    }
}
