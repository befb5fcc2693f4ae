//! Package records and quote request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CourierError;
use crate::geo::Coordinate;

/// Lifecycle state of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    Pending,
    Assigned,
    InTransit,
    Delivered,
    Cancelled,
}

impl PackageStatus {
    pub const ALL: [PackageStatus; 5] = [
        Self::Pending,
        Self::Assigned,
        Self::InTransit,
        Self::Delivered,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageStatus {
    type Err = CourierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == normalized)
            .ok_or_else(|| CourierError::InvalidStatus(s.to_string()))
    }
}

/// Input for a distance/price quote.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub pickup_address: String,
    #[serde(default)]
    pub delivery_address: String,
    /// Pre-validated pickup coordinates; skips address resolution.
    #[serde(default)]
    pub pickup_coords: Option<Coordinate>,
    #[serde(default)]
    pub delivery_coords: Option<Coordinate>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

impl QuoteRequest {
    pub fn new(pickup: impl Into<String>, delivery: impl Into<String>) -> Self {
        Self {
            pickup_address: pickup.into(),
            delivery_address: delivery.into(),
            ..Default::default()
        }
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }

    pub fn with_pickup_coords(mut self, coord: Coordinate) -> Self {
        self.pickup_coords = Some(coord);
        self
    }

    pub fn with_delivery_coords(mut self, coord: Coordinate) -> Self {
        self.delivery_coords = Some(coord);
        self
    }
}

/// Distance and price for one delivery, both rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub distance_km: f64,
    pub price: f64,
}

/// Fields supplied when booking a package.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPackage {
    #[serde(default)]
    pub sender_id: Option<String>,
    pub recipient_name: String,
    #[serde(default)]
    pub recipient_email: Option<String>,
    pub recipient_address: String,
    pub pickup_address: String,
    #[serde(default)]
    pub pickup_coords: Option<Coordinate>,
    #[serde(default)]
    pub delivery_coords: Option<Coordinate>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

impl NewPackage {
    pub fn quote_request(&self) -> QuoteRequest {
        QuoteRequest {
            pickup_address: self.pickup_address.clone(),
            delivery_address: self.recipient_address.clone(),
            pickup_coords: self.pickup_coords,
            delivery_coords: self.delivery_coords,
            weight_kg: self.weight_kg,
        }
    }
}

/// Partial update of a booked package. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageUpdate {
    pub recipient_name: Option<String>,
    pub recipient_email: Option<String>,
    pub recipient_address: Option<String>,
    pub pickup_address: Option<String>,
    pub weight_kg: Option<f64>,
}

/// A booked package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: Uuid,
    pub tracking_id: String,
    pub sender_id: String,
    pub recipient_name: String,
    pub recipient_email: Option<String>,
    pub recipient_address: String,
    pub pickup_address: String,
    pub weight_kg: f64,
    pub status: PackageStatus,
    pub distance_km: f64,
    pub price: f64,
    pub driver_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `TRK` followed by 8 uppercase hex characters.
pub fn new_tracking_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("TRK{}", hex[..8].to_uppercase())
}

/// Aggregate figures over all booked packages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_packages: usize,
    pub pending: usize,
    pub assigned: usize,
    pub in_transit: usize,
    pub delivered: usize,
    pub cancelled: usize,
    pub total_revenue: f64,
    pub average_distance: f64,
}
