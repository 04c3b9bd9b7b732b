//! Error types for the pngpdf-client library.
//!
//! Two layers reflect two audiences:
//!
//! * [`ConvertError`] — the structured error returned by every fallible
//!   operation. Each variant is a distinct failure kind, classified from the
//!   HTTP status code (never from substrings of a display string), so callers
//!   can match on what actually happened.
//!
//! * [`ErrorCategory`] — the terminal user-facing taxonomy. Every
//!   `ConvertError` maps onto exactly one category via
//!   [`ConvertError::category`]; the category carries the single short
//!   message an end user sees, while the variant keeps the detail for logs.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConversionMode;

/// All errors returned by the pngpdf-client library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Local input errors ────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The input file exists but could not be read.
    #[error("failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Validation errors ─────────────────────────────────────────────────
    /// Neither the MIME type nor the extension matches the active mode.
    #[error("'{name}' is not a {expected} file (expected {mode} input)")]
    WrongType {
        name: String,
        expected: &'static str,
        mode: ConversionMode,
    },

    /// The file exceeds the upload size cap.
    #[error("file is {size} bytes, exceeding the {limit}-byte upload limit")]
    TooLarge { size: u64, limit: u64 },

    // ── Server-reported errors ────────────────────────────────────────────
    /// The server inspected the uploaded content and rejected its type.
    #[error("server rejected the upload: {detail}")]
    InvalidPayload { detail: String },

    /// The server found the source document empty or unreadable.
    #[error("server could not convert the source: {detail}")]
    EmptySource { detail: String },

    /// The artifact id is unknown to the server (expired or never existed).
    #[error("artifact '{file_id}' not found or expired")]
    Expired { file_id: String },

    /// The artifact was already fetched once; server-side ids are single-use.
    #[error("artifact '{file_id}' was already downloaded")]
    AlreadyDownloaded { file_id: String },

    /// Any other non-2xx response.
    #[error("server error (HTTP {status}): {detail}")]
    ServerError { status: u16, detail: String },

    // ── Transfer errors ───────────────────────────────────────────────────
    /// The download succeeded at the HTTP level but carried zero bytes.
    ///
    /// Kept distinct from [`ConvertError::Network`]: the connection worked,
    /// the server just produced nothing usable.
    #[error("downloaded artifact '{file_id}' is empty")]
    EmptyArtifact { file_id: String },

    /// Connection-level failure (DNS, refused, reset, TLS).
    #[error("request to '{url}' failed: {reason}")]
    Network { url: String, reason: String },

    /// A request exceeded its configured timeout.
    #[error("request to '{url}' timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// The submit response was 2xx but not the expected JSON shape.
    #[error("unexpected response from server: {detail}")]
    InvalidResponse { detail: String },

    // ── Session errors ────────────────────────────────────────────────────
    /// A conversion is already in flight; the session admits one at a time.
    #[error("a conversion is already in progress")]
    Busy,

    /// `save_as` was called with no converted artifact in the session.
    #[error("no converted artifact available to save")]
    NoArtifact,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write the artifact to disk.
    #[error("failed to write output file '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConvertError {
    /// Map this error onto the user-facing [`ErrorCategory`].
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConvertError::WrongType { .. } | ConvertError::InvalidPayload { .. } => {
                ErrorCategory::InvalidFormat
            }
            ConvertError::TooLarge { .. } => ErrorCategory::FileTooLarge,
            ConvertError::EmptySource { .. } => ErrorCategory::CorruptSource,
            ConvertError::AlreadyDownloaded { .. } => ErrorCategory::AlreadyDownloaded,
            ConvertError::Expired { .. } => ErrorCategory::Expired,
            _ => ErrorCategory::Failed,
        }
    }
}

/// The terminal user-facing error taxonomy.
///
/// Five specific categories plus the generic fallback. The session stores
/// one of these in [`crate::session::SessionState::Failed`]; presentation
/// code shows [`ErrorCategory::user_message`] and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorCategory {
    /// Wrong file type, detected client-side or server-side.
    InvalidFormat,
    /// Over the upload size cap.
    FileTooLarge,
    /// The source document was empty or corrupt.
    CorruptSource,
    /// The single-use artifact id was already consumed.
    AlreadyDownloaded,
    /// The artifact expired on the server.
    Expired,
    /// Everything else: network, timeout, empty body, unknown server error.
    Failed,
}

impl ErrorCategory {
    /// The single short message shown to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidFormat => {
                "Invalid file format. Please choose the correct file type."
            }
            ErrorCategory::FileTooLarge => "File is too large. Maximum size: 50MB.",
            ErrorCategory::CorruptSource => "The PDF file is empty or corrupted.",
            ErrorCategory::AlreadyDownloaded => {
                "The file was already downloaded. Please run the conversion again."
            }
            ErrorCategory::Expired => "The file has expired. Please run the conversion again.",
            ErrorCategory::Failed => "Conversion failed. Please try again.",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.user_message())
    }
}
