//! Source table parsers
//!
//! Each parser turns the raw text of one source into its index. The three
//! CSV sources share one dialect: comma separated, first record is a header,
//! blank lines ignored, every field trimmed. Rows missing a required field
//! are skipped; only whole-file failures are errors.
//!
//! # CSV formats
//! ```text
//! stopdesk_stations.csv   station name, station code, ...
//! code_wilayas.csv        wilaya code, wilaya name, ...
//! communes.csv            commune name, wilaya code, ...
//! ```

use csv::{ReaderBuilder, StringRecord, Trim};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;
use wilaya_common::{Result, WilayaError};

use crate::models::{
    scalar_to_string, CommuneIndex, LegacyIdentity, LegacyTable, PriceIndex, PricePair, StationIndex, WilayaIndex,
};

/// Parse `stopdesk_stations.csv`; a repeated station name keeps the last code
pub fn parse_stations(content: &str, origin: &Path) -> Result<StationIndex> {
    let mut stations = StationIndex::new();
    let skipped = for_each_row(content, origin, |record| match parse_station_row(record) {
        Some((name, code)) => {
            stations.insert(name, code);
            true
        },
        None => false,
    })?;

    debug!(source = %origin.display(), stations = stations.len(), skipped, "Parsed stations");
    Ok(stations)
}

/// Parse `code_wilayas.csv`; rows with a non-numeric code are skipped
pub fn parse_wilayas(content: &str, origin: &Path) -> Result<WilayaIndex> {
    let mut wilayas = WilayaIndex::new();
    let skipped = for_each_row(content, origin, |record| match parse_wilaya_row(record) {
        Some((code, name)) => {
            wilayas.insert(code, name);
            true
        },
        None => false,
    })?;

    debug!(source = %origin.display(), wilayas = wilayas.len(), skipped, "Parsed wilaya codes");
    Ok(wilayas)
}

/// Parse `communes.csv`, grouping commune names under their wilaya code
pub fn parse_communes(content: &str, origin: &Path) -> Result<CommuneIndex> {
    let mut communes = CommuneIndex::new();
    let skipped = for_each_row(content, origin, |record| match parse_commune_row(record) {
        Some((name, code)) => {
            communes.entry(code).or_default().push(name);
            true
        },
        None => false,
    })?;

    debug!(source = %origin.display(), wilayas = communes.len(), skipped, "Parsed communes");
    Ok(communes)
}

/// Read a station row: (name, code)
pub fn parse_station_row(record: &StringRecord) -> Option<(String, String)> {
    required_pair(record)
}

/// Read a wilaya row: (code, name)
pub fn parse_wilaya_row(record: &StringRecord) -> Option<(String, String)> {
    required_pair(record).filter(|(code, _)| is_numeric_code(code))
}

/// Read a commune row: (commune name, wilaya code)
pub fn parse_commune_row(record: &StringRecord) -> Option<(String, String)> {
    required_pair(record)
}

/// A code is numeric when it reads as a number, e.g. `16`, `016`, `1e1`,
/// `0x10` or `Infinity`. Rust-only spellings such as `inf` or `nan` are not.
pub fn is_numeric_code(code: &str) -> bool {
    let unsigned = code.strip_prefix(['+', '-']).unwrap_or(code);
    if unsigned == "Infinity" {
        return true;
    }

    let lower = code.to_ascii_lowercase();
    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = lower.strip_prefix(prefix) {
            return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
        }
    }

    code.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

fn required_pair(record: &StringRecord) -> Option<(String, String)> {
    let first = record.get(0).map(str::trim).filter(|s| !s.is_empty())?;
    let second = record.get(1).map(str::trim).filter(|s| !s.is_empty())?;
    Some((first.to_string(), second.to_string()))
}

/// Feed every data row to `accept`, returning how many rows it rejected
fn for_each_row<F>(content: &str, origin: &Path, mut accept: F) -> Result<usize>
where
    F: FnMut(&StringRecord) -> bool,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut skipped = 0;
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            WilayaError::malformed_source(origin, format!("row {}: {}", row + 2, e))
        })?;
        if !accept(&record) {
            skipped += 1;
        }
    }

    Ok(skipped)
}

#[derive(Debug, Deserialize)]
struct DeliveryDocument {
    #[serde(default)]
    delivery: Option<IndexMap<String, DeliveryEntry>>,
}

#[derive(Debug, Deserialize)]
struct DeliveryEntry {
    #[serde(default)]
    wilaya_id: Value,
    #[serde(default)]
    tarif: Value,
    #[serde(default)]
    tarif_stopdesk: Value,
}

/// Parse `deliveryPrices.json` into tariffs keyed by stringified `wilaya_id`
///
/// # Format
/// ```text
/// { "delivery": { "<any key>": { "wilaya_id": 16, "tarif": "400", "tarif_stopdesk": "250" } } }
/// ```
///
/// A tariff that does not start with an integer fails the whole parse.
pub fn parse_prices(content: &str, origin: &Path) -> Result<PriceIndex> {
    let document: DeliveryDocument = serde_json::from_str(content)
        .map_err(|e| WilayaError::malformed_source(origin, e.to_string()))?;

    let mut prices = PriceIndex::new();
    for (key, entry) in document.delivery.unwrap_or_default() {
        let code = scalar_to_string(&entry.wilaya_id).ok_or_else(|| {
            WilayaError::malformed_tariff(&key, "wilaya_id", entry.wilaya_id.to_string())
        })?;
        let home = tariff_value(&key, "tarif", &entry.tarif)?;
        let stop_desk = tariff_value(&key, "tarif_stopdesk", &entry.tarif_stopdesk)?;
        prices.insert(code, PricePair::new(home, stop_desk));
    }

    debug!(source = %origin.display(), tariffs = prices.len(), "Parsed delivery prices");
    Ok(prices)
}

fn tariff_value(key: &str, field: &str, value: &Value) -> Result<i64> {
    let parsed = match value {
        Value::String(text) => parse_int_prefix(text),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        _ => None,
    };
    parsed.ok_or_else(|| WilayaError::malformed_tariff(key, field, value.to_string()))
}

/// Read the integer at the start of `text`: leading whitespace and one sign
/// are allowed, and reading stops at the first non-digit. Values beyond the
/// `i64` range saturate.
///
/// ```
/// use wilaya_ingest::parser::parse_int_prefix;
///
/// assert_eq!(parse_int_prefix(" 400 DA"), Some(400));
/// assert_eq!(parse_int_prefix("12.9"), Some(12));
/// assert_eq!(parse_int_prefix("DA 400"), None);
/// ```
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    let signed = if negative {
        format!("-{digits}").parse::<i64>().unwrap_or(i64::MIN)
    } else {
        digits.parse::<i64>().unwrap_or(i64::MAX)
    };
    Some(signed)
}

/// Parse `legacyData.json`, keeping the document's key order
///
/// # Format
/// ```text
/// { "<commune name>": { "previousWilaya": "Alger", "previousId": "9" } }
/// ```
///
/// Entries lacking either field, or whose fields are not scalars, are
/// skipped. Only a document that is not a JSON object fails.
pub fn parse_legacy(content: &str, origin: &Path) -> Result<LegacyTable> {
    let document: IndexMap<String, Value> = serde_json::from_str(content)
        .map_err(|e| WilayaError::malformed_source(origin, e.to_string()))?;

    let mut legacy = LegacyTable::new();
    let mut skipped = 0;
    for (commune, entry) in document {
        match serde_json::from_value::<LegacyIdentity>(entry) {
            Ok(identity) => {
                legacy.insert(commune, identity);
            },
            Err(_) => skipped += 1,
        }
    }

    debug!(source = %origin.display(), entries = legacy.len(), skipped, "Parsed legacy data");
    Ok(legacy)
}
