//! Great-circle distance via the haversine formula.
//!
//! Accuracy: spherical Earth (R = 6371 km), so up to ~0.5% off the ellipsoid.

use crate::geo::{Coordinate, Location};

const DEG: f64 = std::f64::consts::PI / 180.0;
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Distance in kilometres between two coordinates, rounded to 2 decimals.
pub fn distance_between(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.lat * DEG, a.lon * DEG);
    let (lat2, lon2) = (b.lat * DEG, b.lon * DEG);
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodes.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    round2(EARTH_RADIUS_KM * c)
}

/// Distance in kilometres between two locations.
pub fn distance(a: &Location, b: &Location) -> f64 {
    distance_between(a.coord(), b.coord())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const DUBLIN: Coordinate = Coordinate::new(53.3498, -6.2603);
    const CORK: Coordinate = Coordinate::new(51.8985, -8.4756);

    #[test]
    fn test_identical_points() {
        assert_eq!(distance_between(DUBLIN, DUBLIN), 0.0);
        assert_eq!(distance_between(Coordinate::new(-33.9, 151.2), Coordinate::new(-33.9, 151.2)), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let a = Location::new(DUBLIN, Some("Dublin".into()));
        let b = Location::new(CORK, None);
        assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn test_dublin_cork() {
        let d = distance_between(DUBLIN, CORK);
        println!("Dublin-Cork: {:.2} km", d);
        assert_abs_diff_eq!(d, 219.0, epsilon = 1.0);
    }

    #[test]
    fn test_antipodal() {
        let d = distance_between(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert_abs_diff_eq!(d, 20015.09, epsilon = 0.1);
        let poles = distance_between(Coordinate::new(90.0, 0.0), Coordinate::new(-90.0, 0.0));
        assert_abs_diff_eq!(poles, 20015.09, epsilon = 0.1);
    }

    #[test]
    fn test_result_is_rounded() {
        let d = distance_between(DUBLIN, Coordinate::new(53.2707, -9.0568));
        assert_abs_diff_eq!(d * 100.0, (d * 100.0).round(), epsilon = 1e-6);
    }

    #[test]
    fn test_out_of_range_input_is_not_rejected() {
        let d = distance_between(Coordinate::new(120.0, 400.0), DUBLIN);
        assert!(d.is_finite());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(-0.004), -0.0);
    }
}
