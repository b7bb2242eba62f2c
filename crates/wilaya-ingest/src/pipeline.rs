//! The load -> reconcile -> emit pipeline
//!
//! Nothing is written unless every source loaded and parsed.

use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument};
use wilaya_common::Result;

use crate::config::IngestConfig;
use crate::emitter;
use crate::loader;
use crate::reconcile::{self, ReconcileStats};

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    #[serde(flatten)]
    pub stats: ReconcileStats,
    pub output_path: PathBuf,
    pub bytes: usize,
    pub checksum: String,
}

/// Run the whole pipeline once
#[instrument(skip_all, fields(output = %config.output_path.display()))]
pub fn run(config: &IngestConfig) -> Result<RunSummary> {
    config.validate()?;

    let tables = loader::load_sources(config)?;
    let reconciliation = reconcile::transform(&tables);
    let report = emitter::emit(&reconciliation.data, config.output_path())?;

    let summary = RunSummary {
        stats: reconciliation.stats,
        output_path: report.path,
        bytes: report.bytes,
        checksum: report.checksum,
    };

    info!(
        regions = summary.stats.regions,
        defaulted_prices = summary.stats.defaulted_prices,
        legacy_attached = summary.stats.legacy_attached,
        checksum = %summary.checksum,
        "Data transformation complete. Output saved to {}",
        summary.output_path.display()
    );

    Ok(summary)
}
