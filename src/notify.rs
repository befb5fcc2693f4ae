//! Package notifications.
//!
//! Delivery is best-effort: callers log failures and carry on.

use crate::error::Result;
use crate::package::{Package, PackageStatus};

pub trait Notifier: Send + Sync {
    fn package_created(&self, package: &Package) -> Result<()>;
    fn status_changed(&self, package: &Package, previous: PackageStatus) -> Result<()>;
    fn driver_assigned(&self, package: &Package, driver_name: &str) -> Result<()>;
    fn package_deleted(&self, package: &Package) -> Result<()>;
}

/// Writes notifications to the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn package_created(&self, package: &Package) -> Result<()> {
        tracing::info!(
            tracking_id = %package.tracking_id,
            recipient = %package.recipient_name,
            email = package.recipient_email.as_deref().unwrap_or("-"),
            distance_km = package.distance_km,
            price = package.price,
            "package created"
        );
        Ok(())
    }

    fn status_changed(&self, package: &Package, previous: PackageStatus) -> Result<()> {
        tracing::info!(
            tracking_id = %package.tracking_id,
            from = %previous,
            to = %package.status,
            "package status changed"
        );
        Ok(())
    }

    fn driver_assigned(&self, package: &Package, driver_name: &str) -> Result<()> {
        tracing::info!(
            tracking_id = %package.tracking_id,
            driver = driver_name,
            "driver assigned"
        );
        Ok(())
    }

    fn package_deleted(&self, package: &Package) -> Result<()> {
        tracing::info!(
            tracking_id = %package.tracking_id,
            email = package.recipient_email.as_deref().unwrap_or("-"),
            "package deleted"
        );
        Ok(())
    }
}

/// Run a notification and swallow its failure after logging it.
pub(crate) fn best_effort(what: &str, result: Result<()>) {
    if let Err(e) = result {
        tracing::warn!("{} notification error: {}", what, e);
    }
}
