//! Output emission
//!
//! Serializes the lookup structure as pretty-printed JSON (2-space indent, no
//! trailing newline) and replaces the output file in one rename.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use wilaya_common::checksum::{compute_checksum, compute_file_checksum};
use wilaya_common::{Result, WilayaError};

use crate::models::WilayaData;

/// What was written by [`emit`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmitReport {
    pub path: PathBuf,
    pub bytes: usize,
    /// SHA-256 of the written bytes
    pub checksum: String,
}

/// Render the lookup structure exactly as it is written to disk
pub fn render(data: &WilayaData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Write `contents` to a sibling temporary file, then rename it over `path`
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let file_name = path.file_name().ok_or_else(|| {
        WilayaError::Config(format!("output path '{}' does not name a file", path.display()))
    })?;

    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, contents)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(())
}

/// Serialize `data` and write it to `path`
///
/// The renamed file is read back and must hash to the rendered bytes.
pub fn emit(data: &WilayaData, path: &Path) -> Result<EmitReport> {
    let json = render(data)?;
    let checksum = compute_checksum(json.as_bytes());

    write_atomic(path, json.as_bytes())?;
    verify_written(path, &checksum)?;
    debug!(path = %path.display(), bytes = json.len(), %checksum, "Wrote lookup file");

    Ok(EmitReport {
        path: path.to_path_buf(),
        bytes: json.len(),
        checksum,
    })
}

/// Check that the file at `path` hashes to `expected`
pub fn verify_written(path: &Path, expected: &str) -> Result<()> {
    let actual = compute_file_checksum(path)?;
    if actual != expected {
        return Err(WilayaError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::{LegacyIdentity, NoestInfo, PricePair, Wilaya};

    fn sample() -> WilayaData {
        let mut data = WilayaData::new();
        data.insert(
            "Tipaza".to_string(),
            Wilaya {
                id: "42".to_string(),
                communes: vec!["Cherchell".to_string()],
                noest: NoestInfo {
                    stations: vec![],
                    prices: PricePair::new(600, 400),
                },
                legacy_data: Some(LegacyIdentity {
                    previous_wilaya: "Blida".to_string(),
                    previous_id: "9".to_string(),
                }),
            },
        );
        data
    }

    #[test]
    fn test_render_layout() {
        let expected = r#"{
  "Tipaza": {
    "id": "42",
    "communes": [
      "Cherchell"
    ],
    "noest": {
      "stations": [],
      "prices": {
        "home": 600,
        "stopDesk": 400
      }
    },
    "legacyData": {
      "previousWilaya": "Blida",
      "previousId": "9"
    }
  }
}"#;
        assert_eq!(render(&sample()).unwrap(), expected);
    }

    #[test]
    fn test_render_keeps_non_ascii() {
        let mut data = WilayaData::new();
        data.insert(
            "Béjaïa".to_string(),
            Wilaya {
                id: "6".to_string(),
                communes: vec!["Akbou".to_string()],
                noest: NoestInfo {
                    stations: vec![],
                    prices: PricePair::default(),
                },
                legacy_data: None,
            },
        );
        assert!(render(&data).unwrap().contains("\"Béjaïa\""));
    }

    #[test]
    fn test_emit_replaces_file_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wilayaData.json");
        std::fs::write(&path, "stale").unwrap();

        let report = emit(&sample(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.len(), report.bytes);
        assert_eq!(report.checksum, compute_checksum(written.as_bytes()));
        assert!(!dir.path().join("wilayaData.json.tmp").exists());
    }

    #[test]
    fn test_verify_written_detects_changed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wilayaData.json");
        let report = emit(&sample(), &path).unwrap();
        verify_written(&path, &report.checksum).unwrap();

        std::fs::write(&path, "{}").unwrap();
        let err = verify_written(&path, &report.checksum).unwrap_err();

        assert!(matches!(err, WilayaError::ChecksumMismatch { ref expected, .. } if *expected == report.checksum));
    }

    #[test]
    fn test_empty_structure() {
        assert_eq!(render(&WilayaData::new()).unwrap(), "{}");
    }
}
