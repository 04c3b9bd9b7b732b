//! Input resolution: load a user-supplied file into a [`SelectedFile`].
//!
//! The MIME type is sniffed from magic bytes rather than trusted from the
//! extension, mirroring what a browser reports in `file.type`. Sniffing and
//! extension checks stay independent so the validator can apply its
//! either-suffices rule.

use crate::error::ConvertError;
use bytes::Bytes;
use std::path::Path;
use tracing::debug;

/// A file selected for conversion.
///
/// Ephemeral: created when the user picks a file, consumed by
/// [`crate::session::ConversionSession::convert`].
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// Base filename, without directories.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type sniffed from content, if recognised.
    pub mime: Option<&'static str>,
    /// The raw file contents.
    pub bytes: Bytes,
}

impl SelectedFile {
    /// Read a local file into memory.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConvertError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| ConvertError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let file = Self::from_bytes(name, data);
        debug!(
            "Loaded '{}': {} bytes, sniffed MIME {:?}",
            file.name, file.size, file.mime
        );
        Ok(file)
    }

    /// Wrap in-memory bytes, sniffing the MIME type from the content.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let bytes: Bytes = data.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime: sniff_mime(&bytes),
            bytes,
        }
    }

    /// Lowercase filename extension, without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }
}

/// Identify PNG or PDF content from the leading magic bytes.
///
/// Anything else returns `None`; the validator may still accept the file on
/// its extension.
pub fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if data.starts_with(b"%PDF") {
        Some("application/pdf")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_png_signature() {
        assert_eq!(
            sniff_mime(b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR"),
            Some("image/png")
        );
    }

    #[test]
    fn sniffs_pdf_header() {
        assert_eq!(sniff_mime(b"%PDF-1.7\n%\xe2\xe3"), Some("application/pdf"));
    }

    #[test]
    fn unknown_content_sniffs_to_none() {
        assert_eq!(sniff_mime(b"hello world"), None);
        assert_eq!(sniff_mime(b""), None);
        // Truncated signatures must not match.
        assert_eq!(sniff_mime(b"\x89PN"), None);
    }

    #[test]
    fn from_bytes_records_name_size_and_mime() {
        let f = SelectedFile::from_bytes("photo.png", &b"\x89PNG\r\n\x1a\nrest"[..]);
        assert_eq!(f.name, "photo.png");
        assert_eq!(f.size, 12);
        assert_eq!(f.mime, Some("image/png"));
    }

    #[test]
    fn extension_is_lowercased() {
        let f = SelectedFile::from_bytes("SCAN.PDF", &b"%PDF-1.4"[..]);
        assert_eq!(f.extension().as_deref(), Some("pdf"));

        let f = SelectedFile::from_bytes("noext", &b""[..]);
        assert_eq!(f.extension(), None);
    }

    #[tokio::test]
    async fn open_missing_file_is_file_not_found() {
        let err = SelectedFile::open("/definitely/not/a/real/file.png")
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn open_reads_name_and_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.4 test").unwrap();

        let f = SelectedFile::open(&path).await.unwrap();
        assert_eq!(f.name, "doc.pdf");
        assert_eq!(f.size, 13);
        assert_eq!(f.mime, Some("application/pdf"));
    }
}
