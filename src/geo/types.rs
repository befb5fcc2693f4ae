//! Core types for the geo subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in degrees. Ranges are not checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", self.lat.abs(), ns, self.lon.abs(), ew)
    }
}

/// A coordinate with the address it was resolved from, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    coord: Coordinate,
    address: Option<String>,
}

impl Location {
    pub fn new(coord: Coordinate, address: Option<String>) -> Self {
        Self { coord, address }
    }

    pub fn from_coords(lat: f64, lon: f64) -> Self {
        Self::new(Coordinate::new(lat, lon), None)
    }

    pub fn coord(&self) -> Coordinate {
        self.coord
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

/// Which resolution step produced a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum MatchKind {
    /// Empty input; the table's default entry, unjittered.
    Empty,
    /// A postal-area key such as `d02`.
    PostalKey(String),
    /// A city name found as a substring of the address.
    City(String),
    /// Nothing matched; the fallback region centre was used.
    Fallback,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "default (empty address)"),
            Self::PostalKey(key) => write!(f, "postal area {}", key.to_uppercase()),
            Self::City(name) => write!(f, "city '{}'", name),
            Self::Fallback => write!(f, "fallback region"),
        }
    }
}

/// A resolved coordinate together with how it was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub coord: Coordinate,
    pub matched: MatchKind,
}
