//! Network transfer: submit the file, retrieve the converted artifact.
//!
//! The workflow is two strictly sequential HTTP calls against the conversion
//! service; the second depends on the handle returned by the first. There is
//! no retry logic: a failure at either step aborts the whole operation and
//! surfaces to the session. Each call carries its own bounded timeout.
//!
//! Non-2xx responses are classified into structured [`ConvertError`] kinds
//! from the HTTP status code; the response body's `detail` field is carried
//! along for logs but never drives control flow, except for the one status
//! the server leaves ambiguous (see [`classify_rejection`]).

use crate::config::{ClientConfig, ConversionMode};
use crate::error::ConvertError;
use crate::output::{ArtifactHandle, ConversionOutcome, ConvertedArtifact, TransferStats};
use crate::pipeline::input::SelectedFile;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// HTTP client for the conversion service.
pub struct TransferClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl TransferClient {
    /// Build a client from the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ConvertError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ConvertError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn submit_url(&self, mode: ConversionMode) -> String {
        format!("{}/{}/", self.config.api_base_url, mode.endpoint())
    }

    fn download_url(&self, file_id: &str) -> String {
        format!("{}/download/{}", self.config.api_base_url, file_id)
    }

    /// Upload `file` as a multipart form and return the artifact handle.
    ///
    /// The form carries a single field named `file` with the original
    /// filename and the file's MIME type (falling back to the mode's
    /// expected type when sniffing recognised nothing).
    pub async fn submit(
        &self,
        file: &SelectedFile,
        mode: ConversionMode,
    ) -> Result<ArtifactHandle, ConvertError> {
        let url = self.submit_url(mode);
        let mime = file.mime.unwrap_or_else(|| mode.input_mime());

        let part = Part::stream(reqwest::Body::from(file.bytes.clone()))
            .file_name(file.name.clone())
            .mime_str(mime)
            .map_err(|e| ConvertError::InvalidConfig(format!("bad MIME '{mime}': {e}")))?;
        let form = Form::new().part("file", part);

        info!("Submitting '{}' ({} bytes) to {}", file.name, file.size, url);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .timeout(Duration::from_secs(self.config.upload_timeout_secs))
            .send()
            .await
            .map_err(|e| request_error(e, &url, self.config.upload_timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Submit rejected with HTTP {}: {}", status, body.trim());
            return Err(classify_rejection(status, &body, None));
        }

        let handle: ArtifactHandle = response
            .json()
            .await
            .map_err(|e| ConvertError::InvalidResponse {
                detail: format!("submit response was not the expected JSON: {e}"),
            })?;

        debug!(
            "Server accepted upload: file_id={}, filename='{}'",
            handle.file_id, handle.filename
        );
        Ok(handle)
    }

    /// Fetch the converted artifact for `handle`.
    ///
    /// A 2xx response with a zero-length body is a failure
    /// ([`ConvertError::EmptyArtifact`]), distinct from any network error.
    pub async fn retrieve(
        &self,
        handle: &ArtifactHandle,
        mode: ConversionMode,
    ) -> Result<ConvertedArtifact, ConvertError> {
        let url = self.download_url(&handle.file_id);

        info!("Downloading artifact from {}", url);

        let response = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(self.config.download_timeout_secs))
            .send()
            .await
            .map_err(|e| request_error(e, &url, self.config.download_timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Download rejected with HTTP {}: {}", status, body.trim());
            return Err(classify_rejection(status, &body, Some(&handle.file_id)));
        }

        let bytes = response.bytes().await.map_err(|e| ConvertError::Network {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        if bytes.is_empty() {
            return Err(ConvertError::EmptyArtifact {
                file_id: handle.file_id.clone(),
            });
        }

        debug!("Retrieved {} bytes for '{}'", bytes.len(), handle.filename);
        Ok(ConvertedArtifact {
            filename: handle.filename.clone(),
            mime_type: mode.output_mime(),
            bytes,
        })
    }

    /// Run the full submit → retrieve sequence.
    pub async fn submit_and_retrieve(
        &self,
        file: &SelectedFile,
        mode: ConversionMode,
    ) -> Result<ConversionOutcome, ConvertError> {
        let total_start = Instant::now();

        let upload_start = Instant::now();
        let handle = self.submit(file, mode).await?;
        let upload_duration_ms = upload_start.elapsed().as_millis() as u64;

        let download_start = Instant::now();
        let artifact = self.retrieve(&handle, mode).await?;
        let download_duration_ms = download_start.elapsed().as_millis() as u64;

        let stats = TransferStats {
            bytes_uploaded: file.size,
            bytes_downloaded: artifact.len() as u64,
            upload_duration_ms,
            download_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        };

        info!(
            "Conversion complete: '{}' → '{}' ({} bytes in {}ms)",
            file.name, artifact.filename, stats.bytes_downloaded, stats.total_duration_ms
        );

        Ok(ConversionOutcome { artifact, stats })
    }

    /// Ping the service's health route.
    pub async fn health(&self) -> Result<(), ConvertError> {
        let url = format!("{}/health", self.config.api_base_url);
        let response = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(self.config.download_timeout_secs))
            .send()
            .await
            .map_err(|e| request_error(e, &url, self.config.download_timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConvertError::ServerError {
                status: status.as_u16(),
                detail: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

/// Map a reqwest transport error to [`ConvertError`].
fn request_error(e: reqwest::Error, url: &str, timeout_secs: u64) -> ConvertError {
    if e.is_timeout() {
        ConvertError::Timeout {
            url: url.to_string(),
            secs: timeout_secs,
        }
    } else {
        ConvertError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

/// Classify a non-2xx response into a structured error.
///
/// Status codes carry the meaning: 404 is an unknown/expired artifact id and
/// 410 a consumed one (both only meaningful when a `file_id` is in play).
/// HTTP 400 is the one status the server uses for two distinct conditions,
/// wrong payload type and an empty/corrupt source document, so the parsed
/// `detail` field disambiguates that single case here and nowhere else.
fn classify_rejection(status: StatusCode, body: &str, file_id: Option<&str>) -> ConvertError {
    let detail = extract_detail(body);

    match (status, file_id) {
        (StatusCode::NOT_FOUND, Some(id)) => ConvertError::Expired {
            file_id: id.to_string(),
        },
        (StatusCode::GONE, Some(id)) => ConvertError::AlreadyDownloaded {
            file_id: id.to_string(),
        },
        (StatusCode::BAD_REQUEST, _) => {
            if detail.to_lowercase().contains("empty") {
                ConvertError::EmptySource { detail }
            } else {
                ConvertError::InvalidPayload { detail }
            }
        }
        _ => ConvertError::ServerError {
            status: status.as_u16(),
            detail,
        },
    }
}

/// Pull the `detail` string out of a JSON error body, falling back to the
/// raw (trimmed) text for non-JSON bodies.
fn extract_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_detail_reads_json_and_falls_back() {
        assert_eq!(extract_detail(r#"{"detail": "File must be PNG"}"#), "File must be PNG");
        assert_eq!(extract_detail("plain text error\n"), "plain text error");
        assert_eq!(extract_detail(r#"{"other": 1}"#), r#"{"other": 1}"#);
    }

    #[test]
    fn bad_request_splits_on_empty_source() {
        let e = classify_rejection(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "PDF is empty"}"#,
            None,
        );
        assert!(matches!(e, ConvertError::EmptySource { .. }));

        let e = classify_rejection(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "File must be PDF"}"#,
            None,
        );
        assert!(matches!(e, ConvertError::InvalidPayload { .. }));
    }

    #[test]
    fn download_statuses_map_to_artifact_errors() {
        let e = classify_rejection(
            StatusCode::NOT_FOUND,
            r#"{"detail": "File not found or expired"}"#,
            Some("abc"),
        );
        assert!(matches!(e, ConvertError::Expired { ref file_id } if file_id == "abc"));

        let e = classify_rejection(
            StatusCode::GONE,
            r#"{"detail": "File already downloaded"}"#,
            Some("abc"),
        );
        assert!(matches!(e, ConvertError::AlreadyDownloaded { ref file_id } if file_id == "abc"));
    }

    #[test]
    fn submit_stage_404_is_a_server_error() {
        // Without an artifact id in play, 404 means a bad endpoint, not an
        // expired artifact.
        let e = classify_rejection(StatusCode::NOT_FOUND, r#"{"detail": "Not Found"}"#, None);
        assert!(matches!(e, ConvertError::ServerError { status: 404, .. }));
    }

    #[test]
    fn unknown_statuses_fall_through_to_server_error() {
        let e = classify_rejection(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail": "Conversion error: boom"}"#,
            Some("abc"),
        );
        assert!(matches!(e, ConvertError::ServerError { status: 500, .. }));
    }

    #[test]
    fn urls_join_without_double_slashes() {
        let client = TransferClient::new(ClientConfig::default()).unwrap();
        assert_eq!(
            client.submit_url(ConversionMode::PngToPdf),
            "http://localhost:8000/png2pdf/"
        );
        assert_eq!(
            client.submit_url(ConversionMode::PdfToPng),
            "http://localhost:8000/pdf2png/"
        );
        assert_eq!(
            client.download_url("abc-123"),
            "http://localhost:8000/download/abc-123"
        );
    }
}
