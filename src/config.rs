//! Configuration types for the conversion client.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share a configuration between the CLI and library callers and to log
//! the effective settings of a run.

use crate::error::ConvertError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default API endpoint for local development.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Maximum accepted upload size in bytes (50 MB), enforced client-side
/// before any network call.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Configuration for a [`crate::session::ConversionSession`] or a bare
/// [`crate::pipeline::transfer::TransferClient`].
///
/// Built via [`ClientConfig::builder()`] or [`ClientConfig::default()`].
///
/// # Example
/// ```rust
/// use pngpdf_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .api_base_url("https://convert.example.com")
///     .upload_timeout_secs(30)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the conversion service, without a trailing slash.
    /// Default: `http://localhost:8000`.
    pub api_base_url: String,

    /// Timeout for the multipart submit call, in seconds. Default: 60.
    pub upload_timeout_secs: u64,

    /// Timeout for the artifact download call, in seconds. Default: 60.
    pub download_timeout_secs: u64,

    /// Upload size cap in bytes. Default: [`MAX_UPLOAD_BYTES`] (50 MB).
    ///
    /// The cap is checked before any bytes leave the machine; the server
    /// enforces its own limit independently.
    pub max_upload_bytes: u64,

    /// Progress callback fired by the session as the workflow advances.
    /// Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            upload_timeout_secs: 60,
            download_timeout_secs: 60,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Base URL of the conversion service. A trailing slash is stripped so
    /// endpoint paths can be appended uniformly.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.config.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn upload_timeout_secs(mut self, secs: u64) -> Self {
        self.config.upload_timeout_secs = secs.max(1);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    pub fn max_upload_bytes(mut self, bytes: u64) -> Self {
        self.config.max_upload_bytes = bytes.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ConvertError> {
        let c = &self.config;
        let url = reqwest::Url::parse(&c.api_base_url)
            .map_err(|e| ConvertError::InvalidConfig(format!("bad API base URL: {e}")))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConvertError::InvalidConfig(format!(
                    "API base URL must be http or https, got '{other}'"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Direction of the conversion.
///
/// Fixes the accepted input type, the API endpoint, and the MIME type of
/// the produced artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConversionMode {
    /// PNG image in, single-page PDF out. (default)
    #[default]
    PngToPdf,
    /// PDF in, PNG render of its first page out.
    PdfToPng,
}

impl ConversionMode {
    /// Endpoint path segment on the conversion service.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ConversionMode::PngToPdf => "png2pdf",
            ConversionMode::PdfToPng => "pdf2png",
        }
    }

    /// MIME type an input file must declare (or sniff to).
    pub fn input_mime(&self) -> &'static str {
        match self {
            ConversionMode::PngToPdf => "image/png",
            ConversionMode::PdfToPng => "application/pdf",
        }
    }

    /// Accepted input filename extension, lowercase, without the dot.
    pub fn input_extension(&self) -> &'static str {
        match self {
            ConversionMode::PngToPdf => "png",
            ConversionMode::PdfToPng => "pdf",
        }
    }

    /// Short label of the expected input format, for messages.
    pub fn input_label(&self) -> &'static str {
        match self {
            ConversionMode::PngToPdf => "PNG",
            ConversionMode::PdfToPng => "PDF",
        }
    }

    /// MIME type of the converted artifact.
    pub fn output_mime(&self) -> &'static str {
        match self {
            ConversionMode::PngToPdf => "application/pdf",
            ConversionMode::PdfToPng => "image/png",
        }
    }

    /// Short label of the produced format, for messages.
    pub fn output_label(&self) -> &'static str {
        match self {
            ConversionMode::PngToPdf => "PDF",
            ConversionMode::PdfToPng => "PNG",
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionMode::PngToPdf => write!(f, "PNG → PDF"),
            ConversionMode::PdfToPng => write!(f, "PDF → PNG"),
        }
    }
}
