//! In-memory package book, keyed by package id.

use std::collections::HashMap;
use uuid::Uuid;

use super::types::{Package, PackageStatus};

#[derive(Debug, Default)]
pub struct PackageBook {
    packages: HashMap<Uuid, Package>,
}

impl PackageBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, package: Package) {
        self.packages.insert(package.id, package);
    }

    pub fn get(&self, id: &Uuid) -> Option<&Package> {
        self.packages.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Package> {
        self.packages.get_mut(id)
    }

    /// Tracking ids are matched case-insensitively.
    pub fn by_tracking_id(&self, tracking_id: &str) -> Option<&Package> {
        self.packages
            .values()
            .find(|p| p.tracking_id.eq_ignore_ascii_case(tracking_id))
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<Package> {
        self.packages.remove(id)
    }

    /// Packages newest first, optionally filtered by status.
    pub fn list(&self, status: Option<PackageStatus>) -> Vec<Package> {
        let mut out: Vec<Package> = self
            .packages
            .values()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
