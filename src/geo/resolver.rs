//! Address resolver: the lookup chain from free text to a coordinate.
//!
//! Flow: empty → postal key → city name → fallback region.
//! Every step but the first adds uniform jitter so repeated addresses in the
//! same area don't collapse onto one point.

use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

use super::areas::{self, PostalArea};
use super::types::{Coordinate, MatchKind, Resolution};

const POSTAL_JITTER: f64 = 0.01;
const CITY_JITTER: f64 = 0.02;
const FALLBACK_JITTER: f64 = 0.05;

fn eircode_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Z]\d{2})\s*([A-Z0-9]{4})").expect("valid eircode regex"))
}

fn routing_key_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Z]\d{1,2})").expect("valid routing key regex"))
}

/// Pull a normalized routing key (`d02`) out of an address.
///
/// A full Eircode (`D02 AF30`) is preferred; otherwise the first letter+digits
/// run is taken and single digits are zero-padded (`D2` → `d02`).
pub fn extract_routing_key(address: &str) -> Option<String> {
    if address.is_empty() {
        return None;
    }
    let upper = address.to_uppercase();

    if let Some(caps) = eircode_pattern().captures(&upper) {
        return Some(caps[1].to_lowercase());
    }

    let caps = routing_key_pattern().captures(&upper)?;
    let code = caps[1].to_lowercase();
    if code.len() == 2 {
        let (letter, digit) = code.split_at(1);
        return Some(format!("{}0{}", letter, digit));
    }
    Some(code)
}

/// Maps addresses to approximate coordinates. Never fails.
#[derive(Debug, Clone)]
pub struct GeoResolver {
    fallback: Coordinate,
}

impl Default for GeoResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoResolver {
    pub fn new() -> Self {
        let fallback = areas::lookup(areas::FALLBACK_KEY)
            .map(PostalArea::coord)
            .unwrap_or_else(areas::default_coord);
        Self { fallback }
    }

    /// Use a different fallback region centre for unmatched addresses.
    pub fn with_fallback(fallback: Coordinate) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> Coordinate {
        self.fallback
    }

    /// Resolve with the thread-local generator.
    pub fn resolve(&self, address: &str) -> Coordinate {
        self.resolve_with(address, &mut rand::thread_rng())
    }

    /// Resolve with a caller-supplied generator (seed it for reproducible output).
    pub fn resolve_with<R: Rng>(&self, address: &str, rng: &mut R) -> Coordinate {
        self.resolve_detailed(address, rng).coord
    }

    /// Resolve and report which step matched.
    pub fn resolve_detailed<R: Rng>(&self, address: &str, rng: &mut R) -> Resolution {
        // 1. Empty input
        if address.is_empty() {
            return Resolution {
                coord: areas::default_coord(),
                matched: MatchKind::Empty,
            };
        }

        // 2-3. Postal routing key
        if let Some(key) = extract_routing_key(address) {
            if let Some(area) = areas::lookup(&key) {
                tracing::debug!(address, key = %key, "resolved by postal key");
                return Resolution {
                    coord: jitter(area.coord(), POSTAL_JITTER, rng),
                    matched: MatchKind::PostalKey(key),
                };
            }
        }

        // 4. City name substring
        let lower = address.to_lowercase();
        if let Some(area) = areas::cities().find(|a| lower.contains(a.key)) {
            tracing::debug!(address, city = area.key, "resolved by city name");
            return Resolution {
                coord: jitter(area.coord(), CITY_JITTER, rng),
                matched: MatchKind::City(area.key.to_string()),
            };
        }

        // 5. Fallback region
        tracing::debug!(address, "no area match, using fallback region");
        Resolution {
            coord: jitter(self.fallback, FALLBACK_JITTER, rng),
            matched: MatchKind::Fallback,
        }
    }
}

fn jitter<R: Rng>(base: Coordinate, radius: f64, rng: &mut R) -> Coordinate {
    Coordinate::new(
        base.lat + rng.gen_range(-radius..=radius),
        base.lon + rng.gen_range(-radius..=radius),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn within(c: Coordinate, center: Coordinate, radius: f64) -> bool {
        let r = radius + 1e-9;
        (c.lat - center.lat).abs() <= r && (c.lon - center.lon).abs() <= r
    }

    #[test]
    fn test_extract_full_eircode() {
        assert_eq!(extract_routing_key("12 Main St, Dublin D02 AF30"), Some("d02".into()));
        assert_eq!(extract_routing_key("t12x8y4"), Some("t12".into()));
    }

    #[test]
    fn test_extract_routing_key_only() {
        assert_eq!(extract_routing_key("D15"), Some("d15".into()));
        assert_eq!(extract_routing_key("apartment in d2"), Some("d02".into()));
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_routing_key(""), None);
        assert_eq!(extract_routing_key("Main Street, Galway"), None);
    }

    #[test]
    fn test_empty_returns_default_exactly() {
        let resolver = GeoResolver::new();
        let res = resolver.resolve_detailed("", &mut seeded());
        assert_eq!(res.matched, MatchKind::Empty);
        assert_eq!(res.coord, areas::default_coord());
    }

    #[test]
    fn test_postal_key_within_jitter() {
        let resolver = GeoResolver::new();
        let mut rng = seeded();
        let center = areas::lookup("d02").unwrap().coord();
        for _ in 0..50 {
            let res = resolver.resolve_detailed("Grand Canal Dock, D02 AF30", &mut rng);
            assert_eq!(res.matched, MatchKind::PostalKey("d02".into()));
            assert!(within(res.coord, center, POSTAL_JITTER));
        }
    }

    #[test]
    fn test_unknown_postal_key_falls_through_to_city() {
        // Y35 is a real Wexford key that isn't in the table
        let resolver = GeoResolver::new();
        let res = resolver.resolve_detailed("Y35 AB12, near Cork road", &mut seeded());
        assert_eq!(res.matched, MatchKind::City("cork".into()));
        assert!(within(res.coord, areas::lookup("cork").unwrap().coord(), CITY_JITTER));
    }

    #[test]
    fn test_city_scan_uses_declaration_order() {
        let resolver = GeoResolver::new();
        let res = resolver.resolve_detailed("Galway Road, Dublin", &mut seeded());
        assert_eq!(res.matched, MatchKind::City("dublin".into()));
    }

    #[test]
    fn test_city_case_insensitive() {
        let resolver = GeoResolver::new();
        let res = resolver.resolve_detailed("Shop Street, GALWAY", &mut seeded());
        assert_eq!(res.matched, MatchKind::City("galway".into()));
    }

    #[test]
    fn test_fallback_within_jitter() {
        let resolver = GeoResolver::new();
        let mut rng = seeded();
        let dublin = areas::lookup("dublin").unwrap().coord();
        for _ in 0..50 {
            let res = resolver.resolve_detailed("Somewhere unknown", &mut rng);
            assert_eq!(res.matched, MatchKind::Fallback);
            assert!(within(res.coord, dublin, FALLBACK_JITTER));
        }
    }

    #[test]
    fn test_custom_fallback() {
        let centre = Coordinate::new(52.0, -7.0);
        let resolver = GeoResolver::with_fallback(centre);
        let c = resolver.resolve_with("nowhere in particular", &mut seeded());
        assert!(within(c, centre, FALLBACK_JITTER));
    }

    #[test]
    fn test_seeded_resolution_is_reproducible() {
        let resolver = GeoResolver::new();
        let a = resolver.resolve_with("Cork city", &mut StdRng::seed_from_u64(99));
        let b = resolver.resolve_with("Cork city", &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_thread_rng_resolve_stays_in_area() {
        let resolver = GeoResolver::new();
        let c = resolver.resolve("H91 E2K3");
        assert!(within(c, areas::lookup("h91").unwrap().coord(), POSTAL_JITTER));
    }
}
