//! Output types: the artifact handle returned by the submit step, the
//! retrieved artifact itself, and per-conversion transfer statistics.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Server-side handle to a converted artifact that has not been fetched yet.
///
/// Returned by the submit endpoint as JSON. The id is single-use: the server
/// invalidates it after one successful download and expires it after a few
/// minutes regardless. Unknown response fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactHandle {
    /// Opaque identifier used for the download call.
    pub file_id: String,
    /// Output filename chosen by the server (source stem + new extension).
    pub filename: String,
}

/// A fully retrieved conversion result, held in memory.
///
/// The bytes live for as long as the session keeps this artifact; starting a
/// new conversion drops the previous one. Cloning is cheap ([`Bytes`] is
/// reference-counted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedArtifact {
    /// Filename to save under, from the submit response.
    pub filename: String,
    /// MIME type, fixed by the conversion mode.
    pub mime_type: &'static str,
    /// The artifact payload. Never empty for a successful conversion.
    pub bytes: Bytes,
}

impl ConvertedArtifact {
    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Timing and volume report for one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStats {
    /// Bytes sent in the multipart upload (payload only, not form overhead).
    pub bytes_uploaded: u64,
    /// Bytes received in the artifact download.
    pub bytes_downloaded: u64,
    /// Wall-clock duration of the submit call, in milliseconds.
    pub upload_duration_ms: u64,
    /// Wall-clock duration of the download call, in milliseconds.
    pub download_duration_ms: u64,
    /// End-to-end duration of the whole workflow, in milliseconds.
    pub total_duration_ms: u64,
}

/// A successful conversion: the artifact plus its transfer statistics.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub artifact: ConvertedArtifact,
    pub stats: TransferStats,
}
