//! Shared types and configuration for NutriScan.
//!
//! Holds the barcode rule, the display-ready product and analysis shapes
//! exchanged between the fetcher, the analyzer and the HTTP layer, and the
//! environment-driven [`AppConfig`].

pub mod app_config;
pub mod barcode;
pub mod config;
pub mod report;

pub use app_config::AppConfig;
pub use barcode::{validate_barcode, Barcode};
pub use config::{load_app_config, load_app_config_from_env};
pub use report::{Analysis, FormattedProduct, ProductIdentity, Report};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid barcode {0:?}: expected 12 or 13 digits")]
    InvalidBarcode(String),
}
