//! Ingestion configuration
//!
//! Where the five source tables are read from and where the lookup file is
//! written. The defaults reproduce the plain invocation: sources under
//! `./data`, output `wilayaData.json` in the working directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wilaya_common::{Result, WilayaError};

/// Default directory holding the source tables
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default output file
pub const DEFAULT_OUTPUT_FILE: &str = "wilayaData.json";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "WILAYA_DATA_DIR";

/// Environment variable overriding the output file
pub const OUTPUT_ENV: &str = "WILAYA_OUTPUT";

/// File names of the source tables inside the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFiles {
    pub stations: String,
    pub wilayas: String,
    pub communes: String,
    pub prices: String,
    pub legacy: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            stations: "stopdesk_stations.csv".to_string(),
            wilayas: "code_wilayas.csv".to_string(),
            communes: "communes.csv".to_string(),
            prices: "deliveryPrices.json".to_string(),
            legacy: "legacyData.json".to_string(),
        }
    }
}

/// Main ingestion configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory the source file names are resolved against
    pub data_dir: PathBuf,
    /// Output file, relative to the working directory unless absolute
    pub output_path: PathBuf,
    #[serde(default)]
    pub files: SourceFiles,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            files: SourceFiles::default(),
        }
    }
}

impl IngestConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(output) = std::env::var(OUTPUT_ENV) {
            config.output_path = PathBuf::from(output);
        }

        config
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn stations_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.stations)
    }

    pub fn wilayas_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.wilayas)
    }

    pub fn communes_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.communes)
    }

    pub fn prices_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.prices)
    }

    pub fn legacy_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.legacy)
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Check the configuration before any file is touched
    pub fn validate(&self) -> Result<()> {
        if self.output_path.file_name().is_none() {
            return Err(WilayaError::Config(format!(
                "output path '{}' does not name a file",
                self.output_path.display()
            )));
        }

        let files = [
            &self.files.stations,
            &self.files.wilayas,
            &self.files.communes,
            &self.files.prices,
            &self.files.legacy,
        ];
        if files.iter().any(|name| name.trim().is_empty()) {
            return Err(WilayaError::Config("source file names must not be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_paths() {
        let config = IngestConfig::default();
        assert_eq!(config.stations_path(), Path::new("./data/stopdesk_stations.csv"));
        assert_eq!(config.wilayas_path(), Path::new("./data/code_wilayas.csv"));
        assert_eq!(config.communes_path(), Path::new("./data/communes.csv"));
        assert_eq!(config.prices_path(), Path::new("./data/deliveryPrices.json"));
        assert_eq!(config.legacy_path(), Path::new("./data/legacyData.json"));
        assert_eq!(config.output_path(), Path::new("wilayaData.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var(DATA_DIR_ENV, "/srv/reference");
        std::env::set_var(OUTPUT_ENV, "/tmp/out/wilayas.json");

        let config = IngestConfig::from_env();
        assert_eq!(config.data_dir, PathBuf::from("/srv/reference"));
        assert_eq!(config.output_path, PathBuf::from("/tmp/out/wilayas.json"));

        std::env::remove_var(DATA_DIR_ENV);
        std::env::remove_var(OUTPUT_ENV);
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        std::env::remove_var(DATA_DIR_ENV);
        std::env::remove_var(OUTPUT_ENV);
        assert_eq!(IngestConfig::from_env(), IngestConfig::default());
    }

    #[test]
    fn test_validate_rejects_directory_output() {
        let config = IngestConfig::default().with_output_path("/");
        assert!(matches!(config.validate(), Err(WilayaError::Config(_))));

        let mut config = IngestConfig::default();
        config.files.prices = " ".to_string();
        assert!(config.validate().is_err());
    }
}
