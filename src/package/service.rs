//! Package service: quote orchestration and the package lifecycle.
//!
//! Quote flow: address → GeoResolver (unless coordinates are supplied) →
//! haversine distance → linear price.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::book::PackageBook;
use super::types::{
    new_tracking_id, DashboardStats, NewPackage, Package, PackageStatus, PackageUpdate, PriceQuote,
    QuoteRequest,
};
use crate::distance::{distance, round2};
use crate::error::{CourierError, Result};
use crate::geo::{Coordinate, GeoResolver, Location, Resolution};
use crate::notify::{best_effort, LogNotifier, Notifier};
use crate::pricing::{PricingEngine, DEFAULT_WEIGHT_KG};

/// Detail fields computed by a partial update.
struct DetailChanges {
    recipient_name: String,
    recipient_email: Option<String>,
    recipient_address: String,
    pickup_address: String,
    weight_kg: f64,
    distance_km: f64,
    price: f64,
}

pub struct PackageService {
    geo: GeoResolver,
    pricing: PricingEngine,
    rng: Mutex<StdRng>,
    book: Mutex<PackageBook>,
    notifier: Box<dyn Notifier>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for PackageService {
    fn default() -> Self {
        Self::new(GeoResolver::new(), PricingEngine::default(), None)
    }
}

impl PackageService {
    /// A `seed` makes address jitter reproducible; `None` seeds from the OS.
    pub fn new(geo: GeoResolver, pricing: PricingEngine, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            geo,
            pricing,
            rng: Mutex::new(rng),
            book: Mutex::new(PackageBook::new()),
            notifier: Box::new(LogNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn geo(&self) -> &GeoResolver {
        &self.geo
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    /// Resolve an address with the service's generator, reporting the matched step.
    /// Surrounding whitespace is ignored, as it is when quoting.
    pub fn resolve(&self, address: &str) -> Resolution {
        let mut rng = lock(&self.rng);
        self.geo.resolve_detailed(address.trim(), &mut *rng)
    }

    /// Resolve one side of a delivery. Explicit coordinates bypass the resolver.
    fn locate(&self, address: &str, explicit: Option<Coordinate>) -> Location {
        let address = address.trim();
        let coord = match explicit {
            Some(c) => c,
            None => {
                let mut rng = lock(&self.rng);
                self.geo.resolve_with(address, &mut *rng)
            }
        };
        let label = (!address.is_empty()).then(|| address.to_string());
        Location::new(coord, label)
    }

    /// Distance and price for a pickup/delivery pair. Never fails.
    pub fn quote(&self, req: &QuoteRequest) -> PriceQuote {
        let pickup = self.locate(&req.pickup_address, req.pickup_coords);
        let delivery = self.locate(&req.delivery_address, req.delivery_coords);
        let weight = req.weight_kg.unwrap_or(DEFAULT_WEIGHT_KG);

        let distance_km = distance(&pickup, &delivery);
        let price = self.pricing.price(distance_km, weight);

        tracing::debug!(
            pickup = %pickup.coord(),
            delivery = %delivery.coord(),
            distance_km,
            weight_kg = weight,
            price,
            "quoted"
        );
        PriceQuote { distance_km, price }
    }

    /// Quote and book a package in the `pending` state.
    pub fn create_package(&self, new: NewPackage) -> Package {
        let quote = self.quote(&new.quote_request());
        let package = Package {
            id: Uuid::new_v4(),
            tracking_id: new_tracking_id(),
            sender_id: new.sender_id.unwrap_or_else(|| "guest".to_string()),
            recipient_name: new.recipient_name,
            recipient_email: new.recipient_email.filter(|e| !e.is_empty()),
            recipient_address: new.recipient_address,
            pickup_address: new.pickup_address,
            weight_kg: new.weight_kg.unwrap_or(DEFAULT_WEIGHT_KG),
            status: PackageStatus::Pending,
            distance_km: quote.distance_km,
            price: quote.price,
            driver_id: None,
            created_at: Utc::now(),
        };

        lock(&self.book).insert(package.clone());
        tracing::info!(tracking_id = %package.tracking_id, price = package.price, "package booked");
        best_effort("created", self.notifier.package_created(&package));
        package
    }

    pub fn get(&self, id: &Uuid) -> Option<Package> {
        lock(&self.book).get(id).cloned()
    }

    pub fn track(&self, tracking_id: &str) -> Option<Package> {
        lock(&self.book).by_tracking_id(tracking_id).cloned()
    }

    pub fn list(&self, status: Option<PackageStatus>) -> Vec<Package> {
        lock(&self.book).list(status)
    }

    pub fn update_status(&self, id: &Uuid, status: PackageStatus) -> Result<Package> {
        let (updated, previous) = {
            let mut book = lock(&self.book);
            let package = book
                .get_mut(id)
                .ok_or_else(|| CourierError::PackageNotFound(id.to_string()))?;
            let previous = package.status;
            package.status = status;
            (package.clone(), previous)
        };
        best_effort("status", self.notifier.status_changed(&updated, previous));
        Ok(updated)
    }

    /// Attach a driver and move the package to `assigned`.
    pub fn assign_driver(&self, id: &Uuid, driver_id: &str, driver_name: &str) -> Result<Package> {
        let updated = {
            let mut book = lock(&self.book);
            let package = book
                .get_mut(id)
                .ok_or_else(|| CourierError::PackageNotFound(id.to_string()))?;
            package.driver_id = Some(driver_id.to_string());
            package.status = PackageStatus::Assigned;
            package.clone()
        };
        best_effort("driver", self.notifier.driver_assigned(&updated, driver_name));
        Ok(updated)
    }

    /// Apply a partial update. Distance and price are re-quoted only when an
    /// address changes; status and driver are never touched.
    pub fn update_details(&self, id: &Uuid, update: PackageUpdate) -> Result<Package> {
        let changes = self.prepare_details(id, update)?;
        self.commit_details(id, changes)
    }

    /// Compute the new detail fields from a snapshot, re-quoting outside the lock.
    fn prepare_details(&self, id: &Uuid, update: PackageUpdate) -> Result<DetailChanges> {
        let current = self
            .get(id)
            .ok_or_else(|| CourierError::PackageNotFound(id.to_string()))?;

        let readdressed = update.pickup_address.is_some() || update.recipient_address.is_some();
        let mut changes = DetailChanges {
            recipient_name: update.recipient_name.unwrap_or(current.recipient_name),
            recipient_email: match update.recipient_email {
                Some(email) => Some(email).filter(|e| !e.is_empty()),
                None => current.recipient_email,
            },
            recipient_address: update.recipient_address.unwrap_or(current.recipient_address),
            pickup_address: update.pickup_address.unwrap_or(current.pickup_address),
            weight_kg: update.weight_kg.unwrap_or(current.weight_kg),
            distance_km: current.distance_km,
            price: current.price,
        };

        if readdressed {
            let quote = self.quote(
                &QuoteRequest::new(changes.pickup_address.clone(), changes.recipient_address.clone())
                    .with_weight(changes.weight_kg),
            );
            changes.distance_km = quote.distance_km;
            changes.price = quote.price;
        }
        Ok(changes)
    }

    /// Write detail fields into the live record, keeping its status and driver.
    fn commit_details(&self, id: &Uuid, changes: DetailChanges) -> Result<Package> {
        let mut book = lock(&self.book);
        // Deleted while we were quoting.
        let package = book
            .get_mut(id)
            .ok_or_else(|| CourierError::PackageNotFound(id.to_string()))?;
        package.recipient_name = changes.recipient_name;
        package.recipient_email = changes.recipient_email;
        package.recipient_address = changes.recipient_address;
        package.pickup_address = changes.pickup_address;
        package.weight_kg = changes.weight_kg;
        package.distance_km = changes.distance_km;
        package.price = changes.price;
        Ok(package.clone())
    }

    pub fn delete(&self, id: &Uuid) -> Result<Package> {
        let removed = lock(&self.book)
            .remove(id)
            .ok_or_else(|| CourierError::PackageNotFound(id.to_string()))?;
        best_effort("deleted", self.notifier.package_deleted(&removed));
        Ok(removed)
    }

    pub fn stats(&self) -> DashboardStats {
        let book = lock(&self.book);
        let count = |s: PackageStatus| book.iter().filter(|p| p.status == s).count();
        let total = book.len();
        let revenue: f64 = book.iter().map(|p| p.price).sum();
        let distance_sum: f64 = book.iter().map(|p| p.distance_km).sum();

        DashboardStats {
            total_packages: total,
            pending: count(PackageStatus::Pending),
            assigned: count(PackageStatus::Assigned),
            in_transit: count(PackageStatus::InTransit),
            delivered: count(PackageStatus::Delivered),
            cancelled: count(PackageStatus::Cancelled),
            total_revenue: round2(revenue),
            average_distance: if total == 0 { 0.0 } else { round2(distance_sum / total as f64) },
        }
    }
}
