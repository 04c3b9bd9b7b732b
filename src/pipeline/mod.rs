//! Pipeline stages for the conversion workflow.
//!
//! Each submodule implements exactly one step. Keeping stages separate makes
//! each independently testable and lets the session orchestrate them without
//! owning any of their mechanics.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ validate ──▶ transfer ──▶ store
//! (path)    (type/size)  (submit+get)  (disk)
//! ```
//!
//! 1. [`input`]    — load a local file into a [`input::SelectedFile`],
//!    sniffing the MIME type from magic bytes
//! 2. [`validate`] — pure type/size checks against the active mode
//! 3. [`transfer`] — the two sequential network calls; the only stage with
//!    network I/O
//! 4. [`store`]    — atomic write of the artifact bytes to disk

pub mod input;
pub mod store;
pub mod transfer;
pub mod validate;
