//! Built-in station table.
//!
//! Frequently used stations resolve from this table without touching the
//! network. Each entry is reachable both by its everyday name and by the
//! canonical name the service uses.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::domain::{Station, StationCode};

/// (everyday name, canonical service name, code)
const KNOWN_STATIONS: &[(&str, &str, u64)] = &[
    ("Москва", "МОСКВА", 2000000),
    ("Петрозаводск", "ПЕТРОЗАВОДСК-ПАСС", 2004300),
    ("Тверь", "ТВЕРЬ", 2004600),
    ("Нижний Новгород", "НИЖНИЙ НОВГОРОД МОСКОВ", 2060001),
    ("Вологда", "ВОЛОГДА 1", 2010030),
    ("Казань", "КАЗАНЬ ПАС", 2060500),
    ("Санкт-Петербург", "САНКТ-ПЕТЕРБУРГ", 2004000),
    ("Ярославль", "ЯРОСЛАВЛЬ-ГОРОД", 2010000),
    ("Минск", "МИНСК", 2100000),
    ("Киев", "КИЕВ", 2200000),
];

static OVERRIDES: LazyLock<HashMap<String, Station>> = LazyLock::new(|| {
    let mut map = HashMap::with_capacity(KNOWN_STATIONS.len() * 2);
    for &(everyday, canonical, code) in KNOWN_STATIONS {
        let station = Station::new(StationCode::from_u64(code), canonical);
        map.insert(normalize(everyday), station.clone());
        map.insert(normalize(canonical), station);
    }
    map
});

/// Normalize a user-entered name the way the service compares names.
pub fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Look up an already-normalized name in the built-in table.
pub fn lookup(normalized: &str) -> Option<&'static Station> {
    OVERRIDES.get(normalized)
}
