//! Disk persistence for retrieved artifacts.
//!
//! Writes are atomic (temp file + rename in the destination directory) so a
//! crash mid-write never leaves a truncated artifact behind.

use crate::error::ConvertError;
use crate::output::ConvertedArtifact;
use std::path::Path;
use tracing::debug;

/// Write the artifact bytes to `path`, creating parent directories as needed.
pub async fn write_artifact(
    artifact: &ConvertedArtifact,
    path: impl AsRef<Path>,
) -> Result<(), ConvertError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConvertError::WriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("part");
    tokio::fs::write(&tmp_path, &artifact.bytes)
        .await
        .map_err(|e| ConvertError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ConvertError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!("Wrote {} bytes to {}", artifact.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn artifact(bytes: &'static [u8]) -> ConvertedArtifact {
        ConvertedArtifact {
            filename: "out.pdf".into(),
            mime_type: "application/pdf",
            bytes: Bytes::from_static(bytes),
        }
    }

    #[tokio::test]
    async fn writes_bytes_and_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.pdf");

        write_artifact(&artifact(b"%PDF-1.4 converted"), &dest)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.4 converted");
        assert!(!dir.path().join("out.part").exists());
    }

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested/deep/out.pdf");

        write_artifact(&artifact(b"%PDF"), &dest).await.unwrap();
        assert!(dest.exists());
    }

    #[tokio::test]
    async fn overwrites_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.pdf");
        std::fs::write(&dest, b"old contents").unwrap();

        write_artifact(&artifact(b"new contents"), &dest)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"new contents");
    }
}
