#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Planar geometry for the site-massing engine.
//!
//! Every geometric operation the engine performs goes through the
//! [`PlanarGeometryProvider`] trait, so the massing and floodplain
//! algorithms never depend on a particular computational-geometry
//! library. [`GeoProvider`] backs the trait with the `geo` crate.
//!
//! This crate also parses parcel boundaries from `GeoJSON` and Esri ring
//! JSON, projects geographic boundaries into a local metric plane, and
//! derives [`SiteMeasurements`](site_massing_site_models::SiteMeasurements)
//! from a boundary.

pub mod fallback;
pub mod measure;
pub mod parse;
pub mod projection;
pub mod provider;
pub mod shape;

pub use fallback::first_usable;
pub use measure::SiteMeasurementCalculator;
pub use projection::{LocalProjection, PlanarBoundary};
pub use provider::{GeoProvider, PlanarGeometryProvider};

use thiserror::Error;

/// Errors produced by geometry parsing and geometric operations.
///
/// [`InvalidGeometry`](Self::InvalidGeometry) and [`Parse`](Self::Parse)
/// are structural: the input cannot be interpreted at all. The remaining
/// variants describe degenerate results of an intermediate operation,
/// which the engine answers by falling back to an earlier geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The input boundary cannot be interpreted as a polygon.
    #[error("Invalid geometry: {message}")]
    InvalidGeometry {
        /// Description of what is wrong with the input.
        message: String,
    },

    /// The input could not be parsed as `GeoJSON` or Esri JSON.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },

    /// An operation produced no polygons, or only zero-area slivers.
    #[error("{operation} produced an empty geometry")]
    EmptyResult {
        /// Name of the operation.
        operation: &'static str,
    },

    /// An operation produced NaN or infinite coordinates.
    #[error("{operation} produced non-finite coordinates")]
    NonFiniteResult {
        /// Name of the operation.
        operation: &'static str,
    },

    /// The geometry has no centroid.
    #[error("Geometry has no centroid")]
    MissingCentroid,

    /// The geometry has no bounding box.
    #[error("Geometry has no bounding box")]
    MissingBounds,
}

impl GeometryError {
    /// Whether this error describes uninterpretable input rather than a
    /// degenerate intermediate result.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::InvalidGeometry { .. } | Self::Parse { .. })
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }
}
