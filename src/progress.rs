//! Progress-callback trait for conversion workflow events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ClientConfigBuilder::progress_callback`] to receive
//! events as the session moves through the workflow. Implementations must be
//! `Send + Sync`; sessions may be shared across tasks behind an `Arc`. All
//! methods have default no-op implementations so callers only override what
//! they care about.

use std::sync::Arc;

/// Called by the session as the upload → retrieve → save workflow advances.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once the input passed validation, before the upload starts.
    ///
    /// # Arguments
    /// * `filename` — name of the selected input file
    /// * `size`     — input size in bytes
    fn on_upload_start(&self, filename: &str, size: u64) {
        let _ = (filename, size);
    }

    /// Called when the server accepted the upload and finished converting.
    ///
    /// # Arguments
    /// * `output_filename` — the artifact name the server assigned
    fn on_converted(&self, output_filename: &str) {
        let _ = output_filename;
    }

    /// Called just before the artifact download starts.
    fn on_download_start(&self, file_id: &str) {
        let _ = file_id;
    }

    /// Called when the artifact has been fully retrieved.
    ///
    /// # Arguments
    /// * `filename` — artifact filename
    /// * `size`     — artifact size in bytes
    fn on_complete(&self, filename: &str, size: u64) {
        let _ = (filename, size);
    }

    /// Called when the workflow fails at any step.
    ///
    /// Receives an owned `String` so the callback can be moved into spawned
    /// tasks without borrowing from the error.
    fn on_error(&self, message: String) {
        let _ = message;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    struct TrackingCallback {
        uploads: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        last_size: AtomicU64,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_upload_start(&self, _filename: &str, size: u64) {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            self.last_size.store(size, Ordering::SeqCst);
        }

        fn on_complete(&self, _filename: &str, size: u64) {
            self.completes.fetch_add(1, Ordering::SeqCst);
            self.last_size.store(size, Ordering::SeqCst);
        }

        fn on_error(&self, _message: String) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_upload_start("a.png", 10);
        cb.on_converted("a.pdf");
        cb.on_download_start("id-1");
        cb.on_complete("a.pdf", 20);
        cb.on_error("boom".to_string());
    }

    #[test]
    fn tracking_callback_receives_events() {
        let cb = TrackingCallback {
            uploads: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            last_size: AtomicU64::new(0),
        };

        cb.on_upload_start("photo.png", 2048);
        assert_eq!(cb.uploads.load(Ordering::SeqCst), 1);
        assert_eq!(cb.last_size.load(Ordering::SeqCst), 2048);

        cb.on_complete("photo.pdf", 4096);
        assert_eq!(cb.completes.load(Ordering::SeqCst), 1);
        assert_eq!(cb.last_size.load(Ordering::SeqCst), 4096);

        cb.on_error("timeout".to_string());
        assert_eq!(cb.errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn arc_dyn_callback_moves_into_spawn() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        tokio::spawn(async move {
            cb.on_error("from a task".to_string());
        })
        .await
        .expect("spawn must succeed");
    }
}
