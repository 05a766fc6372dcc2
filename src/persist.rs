//! Saving rendered documents to disk.
//!
//! These helpers do no validation: a Base64 document is decoded and written
//! as-is. Every write goes to a sibling temp file first and is then renamed
//! into place, so a reader never observes a half-written invoice.

use crate::error::ConvertError;
use crate::pipeline::encode::{decode_document, strip_whitespace};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Decode a Base64 document (typically a PDF) and write its bytes to `path`.
pub async fn write_base64_document(
    base64: &str,
    path: impl AsRef<Path>,
) -> Result<usize, ConvertError> {
    let bytes = decode_document(&strip_whitespace(base64))
        .map_err(|e| ConvertError::InvalidBase64(e.to_string()))?;
    write_atomic(path.as_ref(), &bytes).await?;
    Ok(bytes.len())
}

/// Write a text document (typically HTML) to `path` as UTF-8.
pub async fn write_text_document(
    text: &str,
    path: impl AsRef<Path>,
) -> Result<usize, ConvertError> {
    write_atomic(path.as_ref(), text.as_bytes()).await?;
    Ok(text.len())
}

/// Atomic write: write to temp, then rename.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    let fail = |source| ConvertError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(fail)?;
    }

    let tmp_path = tmp_sibling(path);
    tokio::fs::write(&tmp_path, bytes).await.map_err(fail)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(fail(e));
    }

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// `invoice.pdf` → `invoice.pdf.tmp`, in the same directory so the rename
/// never crosses filesystems.
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encode::encode_document;

    #[test]
    fn tmp_sibling_keeps_directory() {
        assert_eq!(
            tmp_sibling(Path::new("/out/invoice.pdf")),
            PathBuf::from("/out/invoice.pdf.tmp")
        );
    }

    #[tokio::test]
    async fn base64_document_is_decoded_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("invoice.pdf");
        let b64 = encode_document(b"%PDF-1.4 fake");

        let written = write_base64_document(&format!("{b64}\n"), &path).await.unwrap();

        assert_eq!(written, 13);
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 fake");
        assert!(!tmp_sibling(&path).exists());
    }

    #[tokio::test]
    async fn base64_document_is_not_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.bin");
        write_base64_document(&encode_document(b"plain"), &path)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"plain");
    }

    #[tokio::test]
    async fn invalid_base64_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        let err = write_base64_document("@@@", &path).await.unwrap_err();
        assert!(matches!(err, ConvertError::InvalidBase64(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn text_document_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.html");
        write_text_document("<html>ç</html>", &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html>ç</html>");
    }
}
