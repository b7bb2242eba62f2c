//! Source loading
//!
//! Reads the five source files in their fixed order and hands the content to
//! the parsers. Any file that cannot be read aborts the load.

use std::path::Path;
use tracing::{info, instrument};
use wilaya_common::{Result, WilayaError};

use crate::config::IngestConfig;
use crate::models::SourceTables;
use crate::parser;

/// Read a whole source file as UTF-8 text
pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| WilayaError::source_unavailable(path, e))
}

/// Load every source table named by `config`
///
/// Order: stations, wilaya codes, communes, delivery prices, legacy data.
#[instrument(skip_all, fields(data_dir = %config.data_dir.display()))]
pub fn load_sources(config: &IngestConfig) -> Result<SourceTables> {
    let path = config.stations_path();
    let stations = parser::parse_stations(&read_source(&path)?, &path)?;

    let path = config.wilayas_path();
    let wilayas = parser::parse_wilayas(&read_source(&path)?, &path)?;

    let path = config.communes_path();
    let communes = parser::parse_communes(&read_source(&path)?, &path)?;

    let path = config.prices_path();
    let prices = parser::parse_prices(&read_source(&path)?, &path)?;

    let path = config.legacy_path();
    let legacy = parser::parse_legacy(&read_source(&path)?, &path)?;

    info!(
        stations = stations.len(),
        wilayas = wilayas.len(),
        commune_groups = communes.len(),
        tariffs = prices.len(),
        legacy_entries = legacy.len(),
        "Loaded sources"
    );

    Ok(SourceTables {
        stations,
        wilayas,
        communes,
        prices,
        legacy,
    })
}
