//! Packages: quoting, booking, and status tracking.

pub mod book;
pub mod service;
pub mod types;

pub use book::PackageBook;
pub use service::PackageService;
pub use types::{
    DashboardStats, NewPackage, Package, PackageStatus, PackageUpdate, PriceQuote, QuoteRequest,
};
