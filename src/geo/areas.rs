//! Built-in postal-area dataset for Ireland.
//!
//! Declaration order is significant: the city-name scan walks the table top to
//! bottom and the first hit wins.

use super::types::Coordinate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaKind {
    City,
    Postal,
    Default,
}

/// One row of the lookup table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PostalArea {
    pub key: &'static str,
    pub kind: AreaKind,
    pub lat: f64,
    pub lon: f64,
}

impl PostalArea {
    pub fn coord(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

const fn city(key: &'static str, lat: f64, lon: f64) -> PostalArea {
    PostalArea { key, kind: AreaKind::City, lat, lon }
}

const fn postal(key: &'static str, lat: f64, lon: f64) -> PostalArea {
    PostalArea { key, kind: AreaKind::Postal, lat, lon }
}

/// Key of the Ireland-centre row returned for empty input.
pub const DEFAULT_KEY: &str = "default";

/// Key of the row used as the no-match fallback unless configured otherwise.
pub const FALLBACK_KEY: &str = "dublin";

pub const POSTAL_AREAS: &[PostalArea] = &[
    // Dublin (routing keys D01..D24)
    city("dublin", 53.3498, -6.2603),
    postal("d01", 53.3498, -6.2603),
    postal("d02", 53.3396, -6.2603),
    postal("d03", 53.3574, -6.2603),
    postal("d04", 53.3300, -6.2603),
    postal("d05", 53.3800, -6.2603),
    postal("d06", 53.3300, -6.2800),
    postal("d07", 53.3600, -6.2800),
    postal("d08", 53.3400, -6.3000),
    postal("d09", 53.3800, -6.3000),
    postal("d10", 53.4000, -6.2603),
    postal("d11", 53.3800, -6.2400),
    postal("d12", 53.3400, -6.2400),
    postal("d13", 53.4000, -6.2400),
    postal("d14", 53.3200, -6.2400),
    postal("d15", 53.3800, -6.2200),
    postal("d16", 53.3200, -6.2200),
    postal("d17", 53.3600, -6.2000),
    postal("d18", 53.3000, -6.2000),
    postal("d20", 53.4000, -6.2000),
    postal("d22", 53.3400, -6.1800),
    postal("d24", 53.3600, -6.1600),
    // Cork
    city("cork", 51.8985, -8.4756),
    postal("t12", 51.8985, -8.4756),
    postal("t23", 51.8985, -8.4756),
    // Limerick
    city("limerick", 52.6638, -8.6267),
    postal("v94", 52.6638, -8.6267),
    postal("v85", 52.6638, -8.6267),
    // Galway
    city("galway", 53.2707, -9.0568),
    postal("h91", 53.2707, -9.0568),
    // Waterford
    city("waterford", 52.2593, -7.1100),
    postal("x91", 52.2593, -7.1100),
    PostalArea { key: DEFAULT_KEY, kind: AreaKind::Default, lat: 53.4129, lon: -8.2439 },
];

/// Exact key lookup (keys are lowercase).
pub fn lookup(key: &str) -> Option<&'static PostalArea> {
    POSTAL_AREAS.iter().find(|a| a.key == key)
}

/// Iterate the city rows in declaration order.
pub fn cities() -> impl Iterator<Item = &'static PostalArea> {
    POSTAL_AREAS.iter().filter(|a| a.kind == AreaKind::City)
}

/// The Ireland-centre default coordinate.
pub fn default_coord() -> Coordinate {
    lookup(DEFAULT_KEY)
        .map(PostalArea::coord)
        .unwrap_or(Coordinate::new(53.4129, -8.2439))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique_and_lowercase() {
        let mut seen = HashSet::new();
        for area in POSTAL_AREAS {
            assert!(seen.insert(area.key), "duplicate key {}", area.key);
            assert_eq!(area.key, area.key.to_lowercase());
        }
    }

    #[test]
    fn test_postal_keys_have_routing_shape() {
        for area in POSTAL_AREAS.iter().filter(|a| a.kind == AreaKind::Postal) {
            let mut chars = area.key.chars();
            assert!(chars.next().unwrap().is_ascii_lowercase());
            assert!(chars.all(|c| c.is_ascii_digit()));
            assert_eq!(area.key.len(), 3);
        }
    }

    #[test]
    fn test_city_order() {
        let names: Vec<_> = cities().map(|a| a.key).collect();
        assert_eq!(names, ["dublin", "cork", "limerick", "galway", "waterford"]);
    }

    #[test]
    fn test_lookup() {
        let d02 = lookup("d02").unwrap();
        assert_eq!(d02.kind, AreaKind::Postal);
        assert!((d02.lat - 53.3396).abs() < 1e-9);
        assert!(lookup("D02").is_none());
        assert!(lookup("z99").is_none());
    }

    #[test]
    fn test_default_coord() {
        assert_eq!(default_coord(), Coordinate::new(53.4129, -8.2439));
        assert_eq!(lookup(FALLBACK_KEY).unwrap().kind, AreaKind::City);
    }
}
