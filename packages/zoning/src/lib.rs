#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Zoning district registry and rule resolution.
//!
//! District rule records are TOML files embedded at compile time. A raw
//! record only holds the fields a district actually regulates; the
//! [`resolve`] module merges records and caller overrides into a complete
//! [`ZoningRules`] with one documented precedence order, falling back to
//! the fixed default table for anything left unspecified.

pub mod registry;
pub mod resolve;

pub use resolve::{district_minimums, resolve_district, resolve_rules};
pub use site_massing_zoning_models::{DistrictMinimums, ZoningRecord, ZoningRules};

use thiserror::Error;

/// Errors that can occur while resolving zoning rules.
#[derive(Debug, Error)]
pub enum ZoningError {
    /// No zoning record exists for the requested district and nothing
    /// else was supplied to resolve from.
    #[error("Insufficient zoning data: {message}")]
    InsufficientData {
        /// Description of what was missing.
        message: String,
    },

    /// A caller-supplied TOML record failed to parse.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Parses a caller-supplied override record from TOML.
///
/// # Errors
///
/// Returns [`ZoningError::Toml`] if the document is not a valid record.
pub fn parse_overrides(toml_str: &str) -> Result<ZoningRecord, ZoningError> {
    Ok(toml::de::from_str(toml_str)?)
}
