#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Zoning rule types shared across the site-massing engine.
//!
//! Two shapes live here. [`ZoningRecord`] is the raw, all-optional form
//! that district TOML files and caller overrides deserialize into; it
//! tolerates the alternate field spellings found in municipal datasets.
//! [`ZoningRules`] is the fully resolved rule set every engine component
//! consumes. Resolution between the two happens in `site_massing_zoning`.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Documented fallback values applied when no layer supplies a field.
pub mod defaults {
    use super::CourtyardPosition;

    /// Front setback in metres.
    pub const FRONT_SETBACK: f64 = 6.0;
    /// Side setback in metres.
    pub const SIDE_SETBACK: f64 = 1.5;
    /// Rear setback in metres.
    pub const REAR_SETBACK: f64 = 7.5;
    /// Exterior side (flanking street) setback for corner lots, in metres.
    pub const CORNER_SETBACK: f64 = 3.0;
    /// Maximum building height in metres.
    pub const MAX_HEIGHT: f64 = 10.5;
    /// Floor-to-floor height in metres.
    pub const FLOOR_HEIGHT: f64 = 3.0;
    /// Floor-area ratio.
    pub const FLOOR_AREA_RATIO: f64 = 0.7;
    /// Maximum site coverage as a fraction of lot area.
    pub const MAX_COVERAGE: f64 = 0.5;
    /// Courtyards are opt-in per district.
    pub const COURTYARD_ENABLED: bool = false;
    /// Minimum footprint depth before a courtyard is considered.
    pub const COURTYARD_MIN_DEPTH: f64 = 33.5;
    /// Courtyard side length in metres.
    pub const COURTYARD_WIDTH: f64 = 6.1;
    /// Where the courtyard void is placed.
    pub const COURTYARD_POSITION: CourtyardPosition = CourtyardPosition::Center;
    /// Largest courtyard area allowed, as a fraction of the footprint.
    pub const COURTYARD_MAX_AREA_RATIO: f64 = 0.25;
    /// Sunken patio projection cap in metres.
    pub const SUNKEN_PATIO_MAX_PROJECTION: f64 = 1.8;
    /// Sunken patio width cap in metres.
    pub const SUNKEN_PATIO_MAX_WIDTH: f64 = 3.7;
    /// External stair projection cap in metres.
    pub const MAX_STAIRS_PROJECTION: f64 = 1.8;
    /// Generic minimum lot frontage in metres.
    pub const MIN_FRONTAGE: f64 = 10.0;
    /// Generic minimum lot area in square metres.
    pub const MIN_AREA: f64 = 306.0;
    /// Generic minimum lot depth in metres.
    pub const MIN_DEPTH: f64 = 30.4;
}

/// Where a courtyard void is centred within the footprint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CourtyardPosition {
    /// A quarter of the footprint depth back from the front edge.
    Front,
    /// Three quarters of the footprint depth back from the front edge.
    Rear,
    /// The footprint centroid.
    #[default]
    Center,
}

/// Directional setbacks, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setbacks {
    /// Distance from the front property line.
    pub front: f64,
    /// Distance from each interior side property line.
    pub side: f64,
    /// Distance from the rear property line.
    pub rear: f64,
    /// Distance from the flanking street on corner lots.
    pub corner: f64,
}

impl Setbacks {
    /// Creates setbacks with the corner value defaulted.
    #[must_use]
    pub const fn new(front: f64, side: f64, rear: f64) -> Self {
        Self {
            front,
            side,
            rear,
            corner: defaults::CORNER_SETBACK,
        }
    }

    /// The largest of the front, side, and rear setbacks.
    #[must_use]
    pub fn max_directional(&self) -> f64 {
        self.front.max(self.side).max(self.rear)
    }

    /// Whether front, side, and rear are all the same distance.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_uniform(&self) -> bool {
        self.front == self.side && self.side == self.rear
    }

    /// Setbacks for a corner lot: the side yard grows to at least the
    /// flanking-street setback.
    #[must_use]
    pub fn for_corner_lot(self) -> Self {
        Self {
            side: self.side.max(self.corner),
            ..self
        }
    }
}

impl Default for Setbacks {
    fn default() -> Self {
        Self::new(
            defaults::FRONT_SETBACK,
            defaults::SIDE_SETBACK,
            defaults::REAR_SETBACK,
        )
    }
}

/// Resolved courtyard parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtyardRules {
    /// Whether a courtyard may be cut at all.
    pub enabled: bool,
    /// Minimum footprint depth (metres) before a courtyard is cut.
    pub min_depth: f64,
    /// Requested courtyard side length (metres).
    pub width: f64,
    /// Placement within the footprint.
    pub position: CourtyardPosition,
    /// Largest allowed courtyard area as a fraction of the footprint area.
    pub max_area_ratio: f64,
}

impl Default for CourtyardRules {
    fn default() -> Self {
        Self {
            enabled: defaults::COURTYARD_ENABLED,
            min_depth: defaults::COURTYARD_MIN_DEPTH,
            width: defaults::COURTYARD_WIDTH,
            position: defaults::COURTYARD_POSITION,
            max_area_ratio: defaults::COURTYARD_MAX_AREA_RATIO,
        }
    }
}

/// A fully resolved per-district rule set.
///
/// Every field is concrete; optional building caps use `None` for
/// "no cap".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoningRules {
    /// District code these rules were resolved for, if any.
    pub district: Option<String>,
    /// Directional setbacks.
    pub setbacks: Setbacks,
    /// Maximum building height in metres.
    pub max_height: f64,
    /// Floor-to-floor height in metres.
    pub floor_height: f64,
    /// Floor-area ratio.
    pub floor_area_ratio: f64,
    /// Maximum site coverage fraction.
    pub max_coverage: f64,
    /// Maximum footprint width (x extent) in metres.
    pub max_building_width: Option<f64>,
    /// Maximum footprint depth (y extent) in metres.
    pub max_building_depth: Option<f64>,
    /// Courtyard parameters.
    pub courtyard: CourtyardRules,
    /// Sunken patio projection cap in metres.
    pub sunken_patio_max_projection: f64,
    /// Sunken patio width cap in metres.
    pub sunken_patio_max_width: f64,
    /// External stair projection cap in metres.
    pub max_stairs_projection: f64,
}

impl Default for ZoningRules {
    fn default() -> Self {
        Self {
            district: None,
            setbacks: Setbacks::default(),
            max_height: defaults::MAX_HEIGHT,
            floor_height: defaults::FLOOR_HEIGHT,
            floor_area_ratio: defaults::FLOOR_AREA_RATIO,
            max_coverage: defaults::MAX_COVERAGE,
            max_building_width: None,
            max_building_depth: None,
            courtyard: CourtyardRules::default(),
            sunken_patio_max_projection: defaults::SUNKEN_PATIO_MAX_PROJECTION,
            sunken_patio_max_width: defaults::SUNKEN_PATIO_MAX_WIDTH,
            max_stairs_projection: defaults::MAX_STAIRS_PROJECTION,
        }
    }
}

/// Minimum lot dimensions a district requires for development.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictMinimums {
    /// Minimum frontage in metres.
    pub min_frontage: f64,
    /// Minimum lot area in square metres.
    pub min_area: f64,
    /// Minimum lot depth in metres.
    pub min_depth: f64,
}

impl Default for DistrictMinimums {
    fn default() -> Self {
        Self {
            min_frontage: defaults::MIN_FRONTAGE,
            min_area: defaults::MIN_AREA,
            min_depth: defaults::MIN_DEPTH,
        }
    }
}

/// Raw, partially specified zoning record.
///
/// Deserialized from district TOML files and from caller overrides.
/// Alternate spellings seen in municipal data are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoningRecord {
    /// District code (e.g. `"R1-1"`).
    #[serde(default, alias = "id", alias = "ZONING_DISTRICT", alias = "zoning_district")]
    pub district: Option<String>,
    /// Human-readable district name.
    #[serde(default)]
    pub name: Option<String>,
    /// Setback fields.
    #[serde(default)]
    pub setbacks: SetbackRecord,
    /// Maximum height in metres.
    #[serde(default, alias = "max_height_m", alias = "height_max_allowed")]
    pub max_height: Option<f64>,
    /// Floor-to-floor height in metres.
    #[serde(default, alias = "floor_to_floor_height")]
    pub floor_height: Option<f64>,
    /// Floor-area ratio.
    #[serde(default, alias = "far", alias = "FAR", alias = "far_max_allowed")]
    pub floor_area_ratio: Option<f64>,
    /// Maximum coverage fraction.
    #[serde(default, alias = "coverage", alias = "site_coverage")]
    pub max_coverage: Option<f64>,
    /// Maximum building width in metres.
    #[serde(default)]
    pub max_building_width: Option<f64>,
    /// Maximum building depth in metres.
    #[serde(default)]
    pub max_building_depth: Option<f64>,
    /// Courtyard fields.
    #[serde(default)]
    pub courtyard: CourtyardRecord,
    /// Sunken patio projection cap.
    #[serde(default)]
    pub sunken_patio_max_projection: Option<f64>,
    /// Sunken patio width cap.
    #[serde(default)]
    pub sunken_patio_max_width: Option<f64>,
    /// External stair projection cap.
    #[serde(default, alias = "max_stair_projection")]
    pub max_stairs_projection: Option<f64>,
    /// Eligibility minimums.
    #[serde(default)]
    pub eligibility: EligibilityRecord,
}

/// Raw setback fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SetbackRecord {
    /// Front setback in metres.
    #[serde(default, alias = "front_yard")]
    pub front: Option<f64>,
    /// Side setback in metres.
    #[serde(default, alias = "side_yard")]
    pub side: Option<f64>,
    /// Rear setback in metres.
    #[serde(default, alias = "rear_yard")]
    pub rear: Option<f64>,
    /// Corner (flanking street) setback in metres.
    #[serde(default, alias = "exterior_side")]
    pub corner: Option<f64>,
}

/// Raw courtyard fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CourtyardRecord {
    /// Whether courtyards are allowed.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Minimum footprint depth in metres.
    #[serde(default)]
    pub min_depth: Option<f64>,
    /// Courtyard side length in metres.
    #[serde(default)]
    pub width: Option<f64>,
    /// Placement.
    #[serde(default)]
    pub position: Option<CourtyardPosition>,
    /// Largest allowed courtyard-to-footprint area ratio.
    #[serde(default)]
    pub max_area_ratio: Option<f64>,
}

/// Raw eligibility minimums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRecord {
    /// Minimum frontage in metres.
    #[serde(default)]
    pub min_frontage: Option<f64>,
    /// Minimum lot area in square metres.
    #[serde(default, alias = "min_site_area")]
    pub min_area: Option<f64>,
    /// Minimum lot depth in metres.
    #[serde(default)]
    pub min_depth: Option<f64>,
}
