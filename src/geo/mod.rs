//! Geocoding subsystem.
//!
//! Resolves Irish addresses and Eircodes to approximate coordinates using a
//! built-in postal-area table with randomized jitter. No network lookups.

pub mod areas;
pub mod resolver;
pub mod types;

pub use areas::{AreaKind, PostalArea, POSTAL_AREAS};
pub use resolver::{extract_routing_key, GeoResolver};
pub use types::{Coordinate, Location, MatchKind, Resolution};
