//! eirpost: a courier quote engine for Irish addresses.
//!
//! Addresses and Eircodes are resolved against a built-in postal-area table,
//! the haversine distance between pickup and delivery is priced linearly, and
//! booked packages are tracked through their delivery lifecycle.

pub mod config;
pub mod distance;
pub mod error;
pub mod geo;
pub mod logging;
pub mod notify;
pub mod package;
pub mod pricing;
pub mod server;

pub use config::Config;
pub use error::{CourierError, Result};
pub use package::{PackageService, PriceQuote, QuoteRequest};
pub use pricing::PricingEngine;
