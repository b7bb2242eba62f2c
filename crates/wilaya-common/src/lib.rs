//! Wilaya Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling, logging and checksum utilities for the wilaya
//! reference-data workspace.
//!
//! # Example
//!
//! ```no_run
//! use wilaya_common::checksum::compute_file_checksum;
//! use wilaya_common::Result;
//!
//! fn artifact_unchanged(path: &str, recorded: &str) -> Result<bool> {
//!     let checksum = compute_file_checksum(path)?;
//!     tracing::info!(%checksum, "Artifact digest");
//!     Ok(checksum == recorded)
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{Result, WilayaError};
