//! Reconciliation of the loaded sources into the wilaya lookup structure
//!
//! Stations are tied to a wilaya through the leading digits of their station
//! code (`16A` belongs to wilaya `16`, `1601` to wilaya `1601`). The directory
//! groups stations by that derived code once, so attaching them to a wilaya
//! is a single lookup. Within a group stations keep the station index order
//! and each station name appears at most once.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::models::{
    LegacyIdentity, LegacyTable, NoestInfo, NoestStation, PricePair, SourceTables, StationIndex,
    Wilaya, WilayaData,
};

/// The leading run of ASCII digits of a station code, if any
///
/// ```
/// use wilaya_ingest::reconcile::leading_code;
///
/// assert_eq!(leading_code("1601"), Some("1601"));
/// assert_eq!(leading_code("16A01"), Some("16"));
/// assert_eq!(leading_code("A16"), None);
/// ```
pub fn leading_code(station_code: &str) -> Option<&str> {
    let len = station_code
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    (len > 0).then(|| &station_code[..len])
}

/// Stations grouped by the wilaya code derived from their station code
#[derive(Debug, Default)]
pub struct StationDirectory {
    by_code: HashMap<String, Vec<NoestStation>>,
}

impl StationDirectory {
    /// Group every station of the index under its derived wilaya code
    pub fn build(stations: &StationIndex) -> Self {
        let mut by_code: HashMap<String, Vec<NoestStation>> = HashMap::new();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();

        for (name, code) in stations {
            let Some(wilaya_code) = leading_code(code) else {
                continue;
            };
            if !seen.insert((wilaya_code, name.as_str())) {
                continue;
            }
            by_code
                .entry(wilaya_code.to_string())
                .or_default()
                .push(NoestStation {
                    commune: name.clone(),
                    station_code: code.clone(),
                });
        }

        Self { by_code }
    }

    /// Stations whose code starts with exactly `wilaya_code`
    pub fn stations_for(&self, wilaya_code: &str) -> &[NoestStation] {
        self.by_code
            .get(wilaya_code)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// First legacy entry, in table order, whose commune belongs to `communes`
pub fn find_legacy<'a>(legacy: &'a LegacyTable, communes: &[String]) -> Option<&'a LegacyIdentity> {
    if legacy.is_empty() {
        return None;
    }
    let members: HashSet<&str> = communes.iter().map(String::as_str).collect();
    legacy
        .iter()
        .find(|(commune, _)| members.contains(commune.as_str()))
        .map(|(_, identity)| identity)
}

/// Counters describing one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Entries in the output structure
    pub regions: usize,
    /// Wilaya codes without any commune
    pub dropped_regions: usize,
    pub stations_attached: usize,
    /// Wilayas that had no tariff entry and got (0, 0)
    pub defaulted_prices: usize,
    pub legacy_attached: usize,
}

/// Output of [`transform`]
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub data: WilayaData,
    pub stats: ReconcileStats,
}

/// Merge the loaded sources into the lookup structure keyed by wilaya name
///
/// Wilayas are visited in wilaya-code index order. A wilaya without communes
/// is left out. A wilaya name seen twice keeps its first position and the
/// later entry's content.
pub fn transform(tables: &SourceTables) -> Reconciliation {
    let directory = StationDirectory::build(&tables.stations);
    let mut data = WilayaData::new();
    let mut stats = ReconcileStats::default();

    for (code, name) in &tables.wilayas {
        let Some(communes) = tables.communes.get(code) else {
            debug!(code = %code, wilaya = %name, "No communes, dropping wilaya");
            stats.dropped_regions += 1;
            continue;
        };

        let stations = directory.stations_for(code).to_vec();

        let prices = match tables.prices.get(code) {
            Some(prices) => *prices,
            None => {
                debug!(code = %code, wilaya = %name, "No tariff entry, defaulting to zero");
                stats.defaulted_prices += 1;
                PricePair::default()
            },
        };

        let legacy_data = find_legacy(&tables.legacy, communes).cloned();

        stats.stations_attached += stations.len();
        if legacy_data.is_some() {
            stats.legacy_attached += 1;
        }

        data.insert(
            name.clone(),
            Wilaya {
                id: code.clone(),
                communes: communes.clone(),
                noest: NoestInfo { stations, prices },
                legacy_data,
            },
        );
    }

    stats.regions = data.len();
    info!(
        regions = stats.regions,
        dropped = stats.dropped_regions,
        stations = stats.stations_attached,
        "Reconciliation finished"
    );

    Reconciliation { data, stats }
}
