#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Parametric massing for a single parcel.
//!
//! The pipeline runs in a fixed order: setback footprint resolution,
//! dimensional capping, courtyard cutout, and extrusion. Each geometric
//! stage degrades to the last good geometry instead of failing, so the
//! only errors a caller sees are structural ones (an uninterpretable
//! parcel or a missing zoning record).

pub mod constraint;
pub mod courtyard;
pub mod descriptor;
pub mod extrude;
pub mod pipeline;
pub mod setback;

pub use constraint::{ConstrainedFootprint, DimensionalConstraintApplier};
pub use courtyard::{CourtyardCutoutPlanner, CourtyardDecision, CourtyardResult};
pub use descriptor::MassingDescriptor;
pub use extrude::{MassingExtruder, MassingMetadata, MassingOutput, PatioVoid, StairElement};
pub use pipeline::MassingPipeline;
pub use setback::{FootprintStage, ResolvedFootprint, SetbackFootprintResolver};

use site_massing_geometry::GeometryError;
use site_massing_zoning::ZoningError;
use thiserror::Error;

/// Errors that stop a massing run.
#[derive(Debug, Error)]
pub enum MassingError {
    /// The parcel boundary cannot be interpreted.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The zoning rules could not be resolved.
    #[error(transparent)]
    Zoning(#[from] ZoningError),
}
