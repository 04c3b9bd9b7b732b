//! # pngpdf-client
//!
//! Client for a remote PNG⇄PDF conversion service: validate a local file,
//! upload it, and save the converted artifact, as a library or through the
//! bundled `pngpdf` CLI.
//!
//! The conversion itself happens server-side. This crate owns the client
//! half of the workflow: type and size validation before any bytes leave the
//! machine, the two-step transfer protocol (multipart submit, then a
//! download keyed by the returned artifact id), structured error
//! classification, and a session state machine that retains the artifact
//! for repeated saves.
//!
//! ## Workflow Overview
//!
//! ```text
//! file
//!  │
//!  ├─ 1. Input     load bytes, sniff PNG/PDF magic
//!  ├─ 2. Validate  MIME-or-extension rule, 50 MB cap (client-side)
//!  ├─ 3. Submit    multipart POST /png2pdf/ or /pdf2png/ → {file_id, filename}
//!  ├─ 4. Retrieve  GET /download/{file_id} → artifact bytes
//!  └─ 5. Store     atomic write to disk; artifact retained for re-saving
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pngpdf_client::{convert_file_to, ClientConfig, ConversionMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .api_base_url("http://localhost:8000")
//!         .build()?;
//!     let (path, outcome) =
//!         convert_file_to("photo.png", ConversionMode::PngToPdf, config, None).await?;
//!     println!("saved {} ({} bytes)", path.display(), outcome.artifact.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Sessions
//!
//! [`ConversionSession`] is the stateful surface: it admits one conversion
//! at a time, exposes `Idle → Uploading → Ready | Failed` snapshots, and
//! keeps the last artifact in memory so [`ConversionSession::save_as`] can
//! write it again without another round-trip. Artifact ids are single-use
//! server-side; the retained bytes are the only way to save twice.
//!
//! ## Errors
//!
//! Every failure is a structured [`ConvertError`] variant; user-facing code
//! collapses them through [`ConvertError::category`] into the six-message
//! [`ErrorCategory`] taxonomy.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pngpdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pngpdf-client = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ClientConfig, ClientConfigBuilder, ConversionMode, DEFAULT_API_BASE_URL, MAX_UPLOAD_BYTES,
};
pub use error::{ConvertError, ErrorCategory};
pub use output::{ArtifactHandle, ConversionOutcome, ConvertedArtifact, TransferStats};
pub use pipeline::input::SelectedFile;
pub use pipeline::transfer::TransferClient;
pub use pipeline::validate::validate;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use session::{convert_file, convert_file_to, ConversionSession, SessionState};
