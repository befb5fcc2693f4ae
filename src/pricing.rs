//! Linear delivery pricing.
//!
//! `price = base + distance_km * per_km + weight_kg * per_kg`, rounded to cents.
//! Negative inputs are priced as given.

use serde::{Deserialize, Serialize};

use crate::distance::round2;

pub const DEFAULT_BASE_PRICE: f64 = 5.0;
pub const DEFAULT_PER_KM: f64 = 2.0;
pub const DEFAULT_PER_KG: f64 = 0.5;
pub const DEFAULT_WEIGHT_KG: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingEngine {
    #[serde(default = "default_base_price")]
    pub base_price: f64,
    #[serde(default = "default_per_km")]
    pub per_km: f64,
    #[serde(default = "default_per_kg")]
    pub per_kg: f64,
}

fn default_base_price() -> f64 {
    DEFAULT_BASE_PRICE
}

fn default_per_km() -> f64 {
    DEFAULT_PER_KM
}

fn default_per_kg() -> f64 {
    DEFAULT_PER_KG
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PRICE, DEFAULT_PER_KM)
    }
}

impl PricingEngine {
    pub fn new(base_price: f64, per_km: f64) -> Self {
        Self { base_price, per_km, per_kg: DEFAULT_PER_KG }
    }

    pub fn with_per_kg(self, per_kg: f64) -> Self {
        Self { per_kg, ..self }
    }

    pub fn price(&self, distance_km: f64, weight_kg: f64) -> f64 {
        round2(self.base_price + distance_km * self.per_km + weight_kg * self.per_kg)
    }

    /// Price a parcel of the default weight (1 kg).
    pub fn price_default_weight(&self, distance_km: f64) -> f64 {
        self.price(distance_km, DEFAULT_WEIGHT_KG)
    }
}
