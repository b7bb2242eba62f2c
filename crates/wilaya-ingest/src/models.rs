//! Wilaya reference data models
//!
//! Source indexes are insertion-ordered maps: iteration follows the order in
//! which keys first appeared in the source, and a repeated key replaces the
//! value in place.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Station display name -> station code
pub type StationIndex = IndexMap<String, String>;

/// Wilaya code -> wilaya name
pub type WilayaIndex = IndexMap<String, String>;

/// Wilaya code -> commune names, in source row order
pub type CommuneIndex = IndexMap<String, Vec<String>>;

/// Wilaya code -> tariffs
pub type PriceIndex = IndexMap<String, PricePair>;

/// Commune name -> identity its wilaya had before the redistricting
pub type LegacyTable = IndexMap<String, LegacyIdentity>;

/// Final lookup structure, keyed by wilaya name
pub type WilayaData = IndexMap<String, Wilaya>;

/// Home-delivery and stop-desk tariffs for one wilaya
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePair {
    pub home: i64,
    pub stop_desk: i64,
}

impl PricePair {
    pub fn new(home: i64, stop_desk: i64) -> Self {
        Self { home, stop_desk }
    }
}

/// Previous wilaya name and code attached to a commune
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyIdentity {
    #[serde(deserialize_with = "scalar_string")]
    pub previous_wilaya: String,
    #[serde(deserialize_with = "scalar_string")]
    pub previous_id: String,
}

/// A stop-desk pickup point attached to a wilaya
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoestStation {
    /// Station display name
    pub commune: String,
    pub station_code: String,
}

/// Delivery network data for one wilaya
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoestInfo {
    pub stations: Vec<NoestStation>,
    pub prices: PricePair,
}

/// One merged wilaya entry of the output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wilaya {
    pub id: String,
    pub communes: Vec<String>,
    pub noest: NoestInfo,
    #[serde(rename = "legacyData", skip_serializing_if = "Option::is_none")]
    pub legacy_data: Option<LegacyIdentity>,
}

/// The five loaded sources, ready for reconciliation
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub stations: StationIndex,
    pub wilayas: WilayaIndex,
    pub communes: CommuneIndex,
    pub prices: PriceIndex,
    pub legacy: LegacyTable,
}

/// Render a JSON scalar the way it reads as text: strings verbatim, integral
/// numbers without a fractional part.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                let f = n.as_f64()?;
                if f.fract() == 0.0 && f.abs() < 1e21 {
                    Some(format!("{f:.0}"))
                } else {
                    Some(f.to_string())
                }
            }
        },
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a string or number, got {value}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(scalar_to_string(&json!("16")), Some("16".to_string()));
        assert_eq!(scalar_to_string(&json!(16)), Some("16".to_string()));
        assert_eq!(scalar_to_string(&json!(16.0)), Some("16".to_string()));
        assert_eq!(scalar_to_string(&json!(16.5)), Some("16.5".to_string()));
        assert_eq!(scalar_to_string(&json!(null)), None);
        assert_eq!(scalar_to_string(&json!({"id": 1})), None);
    }

    #[test]
    fn test_legacy_identity_accepts_numeric_id() {
        let legacy: LegacyIdentity =
            serde_json::from_value(json!({"previousWilaya": "Alger", "previousId": 9})).unwrap();
        assert_eq!(legacy.previous_wilaya, "Alger");
        assert_eq!(legacy.previous_id, "9");
    }

    #[test]
    fn test_wilaya_omits_absent_legacy_data() {
        let wilaya = Wilaya {
            id: "16".to_string(),
            communes: vec!["Kouba".to_string()],
            noest: NoestInfo {
                stations: vec![NoestStation {
                    commune: "Kouba".to_string(),
                    station_code: "1601".to_string(),
                }],
                prices: PricePair::new(400, 250),
            },
            legacy_data: None,
        };

        let value = serde_json::to_value(&wilaya).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "16",
                "communes": ["Kouba"],
                "noest": {
                    "stations": [{"commune": "Kouba", "stationCode": "1601"}],
                    "prices": {"home": 400, "stopDesk": 250}
                }
            })
        );
        assert!(value.get("legacyData").is_none());
    }
}
