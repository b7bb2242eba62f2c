//! Wilaya Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Builds one lookup file keyed by wilaya name from four independently
//! maintained reference tables.
//!
//! # Sources
//!
//! - **stopdesk_stations.csv**: delivery network pickup stations and their codes
//! - **code_wilayas.csv**: wilaya codes and names
//! - **communes.csv**: communes and the wilaya code they belong to
//! - **deliveryPrices.json**: home and stop-desk tariffs per wilaya
//! - **legacyData.json**: previous wilaya identity of redistricted communes
//!
//! # Example
//!
//! ```no_run
//! use wilaya_ingest::{pipeline, IngestConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::default().with_data_dir("./data");
//!     let summary = pipeline::run(&config)?;
//!     println!("{} wilayas written", summary.stats.regions);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod emitter;
pub mod loader;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod reconcile;

pub use config::IngestConfig;
pub use models::{SourceTables, Wilaya, WilayaData};
pub use pipeline::RunSummary;
pub use reconcile::transform;
