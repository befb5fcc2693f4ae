//! TOML configuration at ~/.eirpost/config.toml.
//!
//! Every section is optional; a missing file means defaults. `${VAR}` is
//! replaced from the environment before parsing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CourierError, Result};
use crate::geo::{areas, AreaKind, GeoResolver};
use crate::package::PackageService;
use crate::pricing::PricingEngine;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pricing: PricingEngine,
    #[serde(default)]
    pub geo: GeoConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// City key whose centre is used when nothing matches.
    #[serde(default = "default_fallback_area")]
    pub fallback_area: String,
    /// Fixed jitter seed for reproducible resolution.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self { fallback_area: default_fallback_area(), seed: None }
    }
}

fn default_fallback_area() -> String {
    areas::FALLBACK_KEY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".eirpost")
            .join("config.toml")
    }

    /// Load from `path`, or the default path. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        tracing::debug!("loading config from {}", path.display());
        Self::from_file(&path)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        let config: Config = toml::from_str(&processed)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.pricing;
        for (field, value) in [("pricing.base_price", p.base_price), ("pricing.per_km", p.per_km), ("pricing.per_kg", p.per_kg)] {
            if !value.is_finite() {
                return Err(CourierError::config(format!("{} must be a finite number", field)));
            }
        }

        let fallback = self.geo.fallback_area.to_lowercase();
        match areas::lookup(&fallback) {
            Some(area) if area.kind != AreaKind::Default => Ok(()),
            _ => Err(CourierError::config(format!(
                "geo.fallback_area '{}' is not a known area",
                self.geo.fallback_area
            ))),
        }
    }

    pub fn geo_resolver(&self) -> GeoResolver {
        areas::lookup(&self.geo.fallback_area.to_lowercase())
            .map(|a| GeoResolver::with_fallback(a.coord()))
            .unwrap_or_default()
    }

    pub fn package_service(&self) -> PackageService {
        PackageService::new(self.geo_resolver(), self.pricing, self.geo.seed)
    }
}

/// Replace `${VAR}` with the variable's value; unknown variables are left as is.
fn substitute_env_vars(content: &str) -> String {
    let re = Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex");
    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}
