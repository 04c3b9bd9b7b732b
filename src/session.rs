//! The conversion session: state machine and workflow orchestration.
//!
//! A [`ConversionSession`] owns the UI-visible state
//! (`Idle → Uploading → Ready | Failed`) and drives the pipeline stages in
//! order: validate, submit, retrieve. `Uploading` is the only transient
//! state; it is entered and exited by exactly one in-flight transfer, and a
//! second [`ConversionSession::convert`] call while one is running fails
//! fast with [`ConvertError::Busy`] before any network traffic.
//!
//! The session keeps the last converted artifact in memory so callers can
//! save it again ([`ConversionSession::save_as`]) without re-contacting the
//! server. Starting a new conversion drops the previous artifact; at most
//! one artifact is live per session.

use crate::config::{ClientConfig, ConversionMode};
use crate::error::{ConvertError, ErrorCategory};
use crate::output::{ConversionOutcome, ConvertedArtifact, TransferStats};
use crate::pipeline::input::SelectedFile;
use crate::pipeline::transfer::TransferClient;
use crate::pipeline::{store, validate};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;
use tracing::{info, warn};

/// Observable session state.
///
/// `Idle`, `Ready`, and `Failed` are at rest; a new conversion can start
/// from any of them. `Ready` owns the live artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No conversion attempted yet.
    Idle,
    /// A conversion is in flight.
    Uploading,
    /// The last conversion succeeded; the artifact is available.
    Ready(ConvertedArtifact),
    /// The last conversion failed.
    Failed(ErrorCategory),
}

/// Orchestrates validation, transfer, and artifact retention for one
/// logical conversion session.
///
/// All methods take `&self`; the session can be shared behind an `Arc` and
/// still enforces the single-conversion-at-a-time rule.
pub struct ConversionSession {
    client: TransferClient,
    state: Mutex<SessionState>,
    in_flight: AtomicBool,
}

impl ConversionSession {
    /// Create a session from a configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ConvertError> {
        Ok(Self::with_client(TransferClient::new(config)?))
    }

    /// Create a session around an existing transfer client.
    pub fn with_client(client: TransferClient) -> Self {
        Self {
            client,
            state: Mutex::new(SessionState::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.lock_state().clone()
    }

    /// The artifact of the last successful conversion, if still live.
    pub fn artifact(&self) -> Option<ConvertedArtifact> {
        match &*self.lock_state() {
            SessionState::Ready(artifact) => Some(artifact.clone()),
            _ => None,
        }
    }

    /// Run the full conversion workflow for `file` under `mode`.
    ///
    /// Validation runs first and leaves the session untouched on rejection:
    /// neither the state nor a previously converted artifact changes. Once
    /// validation passes the previous artifact is dropped, the state moves
    /// to `Uploading`, and the two transfer calls run sequentially.
    pub async fn convert(
        &self,
        file: SelectedFile,
        mode: ConversionMode,
    ) -> Result<ConversionOutcome, ConvertError> {
        let config = self.client.config();

        if let Err(e) = validate::validate(&file, mode, config.max_upload_bytes) {
            // Rejected input leaves the session exactly as it was; only the
            // error event fires so presentation code can surface the message.
            if let Some(ref cb) = config.progress_callback {
                cb.on_error(e.category().user_message().to_string());
            }
            return Err(e);
        }

        // Only one conversion may hold the slot. The guard clears the flag
        // on drop, including when this future is dropped mid-flight.
        if self.in_flight.swap(true, Ordering::SeqCst) {
            warn!("Rejecting '{}': a conversion is already in progress", file.name);
            return Err(ConvertError::Busy);
        }
        let _slot = InFlightGuard(&self.in_flight);

        *self.lock_state() = SessionState::Uploading;

        let callback = config.progress_callback.clone();
        if let Some(ref cb) = callback {
            cb.on_upload_start(&file.name, file.size);
        }

        info!("Conversion started: '{}' ({})", file.name, mode);

        match self.run_transfer(&file, mode, callback.as_deref()).await {
            Ok(outcome) => {
                *self.lock_state() = SessionState::Ready(outcome.artifact.clone());
                if let Some(ref cb) = callback {
                    cb.on_complete(&outcome.artifact.filename, outcome.artifact.len() as u64);
                }
                Ok(outcome)
            }
            Err(e) => {
                warn!("Conversion failed: {e}");
                *self.lock_state() = SessionState::Failed(e.category());
                if let Some(ref cb) = callback {
                    cb.on_error(e.category().user_message().to_string());
                }
                Err(e)
            }
        }
    }

    /// Write the retained artifact to `path` without contacting the server.
    ///
    /// Fails with [`ConvertError::NoArtifact`] unless the session is
    /// `Ready`. Can be called any number of times until the next conversion
    /// starts.
    pub async fn save_as(&self, path: impl AsRef<Path>) -> Result<(), ConvertError> {
        let artifact = self.artifact().ok_or(ConvertError::NoArtifact)?;
        store::write_artifact(&artifact, path).await
    }

    /// The two sequential network calls, with per-step timing.
    async fn run_transfer(
        &self,
        file: &SelectedFile,
        mode: ConversionMode,
        callback: Option<&dyn crate::progress::ConversionProgressCallback>,
    ) -> Result<ConversionOutcome, ConvertError> {
        let total_start = Instant::now();

        let upload_start = Instant::now();
        let handle = self.client.submit(file, mode).await?;
        let upload_duration_ms = upload_start.elapsed().as_millis() as u64;

        if let Some(cb) = callback {
            cb.on_converted(&handle.filename);
            cb.on_download_start(&handle.file_id);
        }

        let download_start = Instant::now();
        let artifact = self.client.retrieve(&handle, mode).await?;
        let download_duration_ms = download_start.elapsed().as_millis() as u64;

        let stats = TransferStats {
            bytes_uploaded: file.size,
            bytes_downloaded: artifact.len() as u64,
            upload_duration_ms,
            download_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        };

        Ok(ConversionOutcome { artifact, stats })
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        // A poisoned lock only means a panic elsewhere; the state itself
        // stays coherent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Clears the in-flight flag when the conversion future completes or is
/// dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ── One-shot entry points ────────────────────────────────────────────────

/// Convert a local file in one call.
///
/// This is the primary library entry point: open the file, run the
/// workflow, return the artifact and stats. The artifact is only held in
/// memory; use [`convert_file_to`] to also write it to disk.
///
/// # Example
/// ```rust,no_run
/// use pngpdf_client::{convert_file, ClientConfig, ConversionMode};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::default();
///     let outcome = convert_file("photo.png", ConversionMode::PngToPdf, config).await?;
///     println!("{} ({} bytes)", outcome.artifact.filename, outcome.artifact.len());
///     Ok(())
/// }
/// ```
pub async fn convert_file(
    input: impl AsRef<Path>,
    mode: ConversionMode,
    config: ClientConfig,
) -> Result<ConversionOutcome, ConvertError> {
    let file = SelectedFile::open(input).await?;
    let session = ConversionSession::new(config)?;
    session.convert(file, mode).await
}

/// Convert a local file and save the artifact to disk.
///
/// The destination defaults to the server-assigned filename in the current
/// directory when `output` is `None`, matching the automatic-download
/// behaviour of the workflow. Returns the path written and the outcome.
pub async fn convert_file_to(
    input: impl AsRef<Path>,
    mode: ConversionMode,
    config: ClientConfig,
    output: Option<&Path>,
) -> Result<(PathBuf, ConversionOutcome), ConvertError> {
    let file = SelectedFile::open(input).await?;
    let session = ConversionSession::new(config)?;
    let outcome = session.convert(file, mode).await?;

    let dest = match output {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(&outcome.artifact.filename),
    };
    session.save_as(&dest).await?;

    Ok((dest, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn session() -> ConversionSession {
        ConversionSession::new(ClientConfig::default()).unwrap()
    }

    #[test]
    fn starts_idle_with_no_artifact() {
        let s = session();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.artifact().is_none());
    }

    #[tokio::test]
    async fn save_as_without_artifact_fails() {
        let s = session();
        let err = s.save_as("out.pdf").await.unwrap_err();
        assert!(matches!(err, ConvertError::NoArtifact));
    }

    #[tokio::test]
    async fn validation_rejection_leaves_state_untouched() {
        let s = session();
        let wrong = SelectedFile::from_bytes("notes.txt", &b"plain text"[..]);
        let err = s
            .convert(wrong, ConversionMode::PngToPdf)
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::WrongType { .. }));
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn oversize_rejection_never_enters_uploading() {
        let config = ClientConfig::builder().max_upload_bytes(8).build().unwrap();
        let s = ConversionSession::new(config).unwrap();
        let big = SelectedFile::from_bytes(
            "big.png",
            Bytes::from(b"\x89PNG\r\n\x1a\nmore-than-eight".to_vec()),
        );
        let err = s.convert(big, ConversionMode::PngToPdf).await.unwrap_err();
        assert!(matches!(err, ConvertError::TooLarge { .. }));
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn in_flight_guard_clears_on_drop() {
        let flag = AtomicBool::new(true);
        {
            let _g = InFlightGuard(&flag);
        }
        assert!(!flag.load(Ordering::SeqCst));
    }
}
