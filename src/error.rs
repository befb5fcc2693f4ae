//! Error type for the layers around the quote core.
//!
//! Geocoding, distance and pricing are total and never produce these; only
//! configuration loading, the package book and notifications do.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourierError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Package not found: '{0}'")]
    PackageNotFound(String),

    #[error("Invalid package status: '{0}'")]
    InvalidStatus(String),

    #[error("Notification failed: {message}")]
    Notification { message: String },
}

impl CourierError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, CourierError>;
