#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Parcel and site types for the site-massing engine.
//!
//! A [`Parcel`] is immutable input: a polygonal boundary plus an open
//! attribute map. [`SiteConfig`] carries optional caller overrides and
//! the decorative elements (sunken patios, external stairs, accessory
//! buildings) that ride along with a massing. [`SiteMeasurements`] is
//! derived fresh from a boundary on every call.

use std::collections::BTreeMap;

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The coordinate system a parcel boundary is expressed in.
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
pub enum CoordinateFrame {
    /// Longitude/latitude pairs in degrees (WGS84).
    Geographic,
    /// Planar coordinates already in metres.
    #[default]
    Projected,
}

/// A city parcel: a polygon or multi-polygon boundary plus attributes
/// such as address or folio id.
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    /// Boundary rings. Single polygons are stored as a one-element
    /// multi-polygon.
    pub boundary: MultiPolygon<f64>,
    /// Coordinate system of `boundary`.
    pub frame: CoordinateFrame,
    /// Open attribute map (address, folio id, ...).
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Parcel {
    /// Creates a parcel with no attributes.
    #[must_use]
    pub const fn new(boundary: MultiPolygon<f64>, frame: CoordinateFrame) -> Self {
        Self {
            boundary,
            frame,
            attributes: BTreeMap::new(),
        }
    }

    /// Creates a parcel whose boundary is already in planar metres.
    #[must_use]
    pub const fn projected(boundary: MultiPolygon<f64>) -> Self {
        Self::new(boundary, CoordinateFrame::Projected)
    }

    /// Adds an attribute, returning the parcel.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Returns a string attribute, if present.
    #[must_use]
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(serde_json::Value::as_str)
    }
}

/// Axis-aligned bounding box in planar metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Minimum x.
    pub min_x: f64,
    /// Minimum y.
    pub min_y: f64,
    /// Maximum x.
    pub max_x: f64,
    /// Maximum y.
    pub max_y: f64,
}

impl BoundingBox {
    /// Extent along x.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Extent along y.
    #[must_use]
    pub fn depth(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Centre point as `(x, y)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::midpoint(self.min_x, self.max_x),
            f64::midpoint(self.min_y, self.max_y),
        )
    }
}

/// Measurements derived from a parcel boundary.
///
/// `depth` is twice the largest centroid-to-vertex distance and
/// `frontage` is the longest outer-ring edge. Both are approximations the
/// eligibility thresholds are calibrated against; a square of side `s`
/// measures frontage `s` and depth `s * sqrt(2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMeasurements {
    /// Planar area in square metres.
    pub area: f64,
    /// Longest outer-ring edge in metres.
    pub frontage: f64,
    /// Twice the maximum centroid-to-vertex distance, in metres.
    pub depth: f64,
    /// Total ring length in metres.
    pub perimeter: f64,
    /// `area / perimeter^2`.
    pub compactness: f64,
    /// Bounding box of the boundary.
    pub bounding_box: BoundingBox,
}

impl SiteMeasurements {
    /// Replaces frontage and depth with explicit lot dimensions from the
    /// site configuration, when those are positive and finite.
    #[must_use]
    pub fn with_overrides(mut self, site: &SiteConfig) -> Self {
        if let Some(width) = site.lot_width.filter(|w| w.is_finite() && *w > 0.0) {
            self.frontage = width;
        }
        if let Some(depth) = site.lot_depth.filter(|d| d.is_finite() && *d > 0.0) {
            self.depth = depth;
        }
        self
    }
}

/// Whether a lot sits at a street intersection.
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
pub enum LotType {
    /// Mid-block lot with a single street frontage.
    #[default]
    Standard,
    /// Lot with two street frontages.
    Corner,
}

/// Which side of the building an auxiliary element attaches to.
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
pub enum ElementPosition {
    /// Street-facing side.
    #[default]
    Front,
    /// Rear yard side.
    Rear,
    /// Left side yard.
    Left,
    /// Right side yard.
    Right,
}

/// A sunken patio requested alongside the massing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunkenPatio {
    /// Distance the patio projects from the building face, in metres.
    pub projection: f64,
    /// Patio width along the building face, in metres.
    pub width: f64,
    /// Building side the patio attaches to.
    #[serde(default)]
    pub position: ElementPosition,
}

/// An external stair requested alongside the massing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExternalStair {
    /// Stair width in metres.
    pub width: f64,
    /// Rise in metres.
    pub height: f64,
    /// Distance the stair projects from the building face, in metres.
    pub projection: f64,
    /// Building side the stair attaches to.
    #[serde(default)]
    pub position: ElementPosition,
}

/// Kind of secondary building on the lot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccessoryKind {
    /// A laneway dwelling.
    CoachHouse,
    /// A garage or other non-dwelling accessory building.
    Garage,
}

/// Where an accessory building sits relative to the main building.
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
pub enum AccessoryPosition {
    /// Behind the main building, across a courtyard separation.
    #[default]
    Rear,
    /// Beside the main building.
    Side,
}

/// A requested accessory building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryBuilding {
    /// Coach house or garage.
    pub kind: AccessoryKind,
    /// Placement on the lot.
    #[serde(default)]
    pub position: AccessoryPosition,
}

/// Optional site overrides and decorative elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Explicit lot width, replacing the measured frontage.
    #[serde(default)]
    pub lot_width: Option<f64>,
    /// Explicit lot depth, replacing the measured depth.
    #[serde(default)]
    pub lot_depth: Option<f64>,
    /// Explicit lot type, replacing corner-lot detection.
    #[serde(default)]
    pub lot_type: Option<LotType>,
    /// Sunken patios to attach.
    #[serde(default)]
    pub sunken_patios: Vec<SunkenPatio>,
    /// External stairs to attach.
    #[serde(default)]
    pub external_stairs: Vec<ExternalStair>,
    /// Number of dwelling units proposed.
    #[serde(default)]
    pub dwelling_units: Option<u32>,
    /// Accessory building proposed.
    #[serde(default)]
    pub accessory_building: Option<AccessoryBuilding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurements() -> SiteMeasurements {
        SiteMeasurements {
            area: 400.0,
            frontage: 20.0,
            depth: 28.28,
            perimeter: 80.0,
            compactness: 400.0 / 6400.0,
            bounding_box: BoundingBox {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 20.0,
                max_y: 20.0,
            },
        }
    }

    #[test]
    fn overrides_replace_frontage_and_depth() {
        let site = SiteConfig {
            lot_width: Some(10.0),
            lot_depth: Some(37.2),
            ..SiteConfig::default()
        };
        let m = measurements().with_overrides(&site);
        assert!((m.frontage - 10.0).abs() < f64::EPSILON);
        assert!((m.depth - 37.2).abs() < f64::EPSILON);
        assert!((m.area - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unusable_overrides_are_ignored() {
        let site = SiteConfig {
            lot_width: Some(-1.0),
            lot_depth: Some(f64::NAN),
            ..SiteConfig::default()
        };
        assert_eq!(measurements().with_overrides(&site), measurements());
    }

    #[test]
    fn bounding_box_extents() {
        let bbox = BoundingBox {
            min_x: 2.0,
            min_y: -1.0,
            max_x: 12.0,
            max_y: 29.0,
        };
        assert!((bbox.width() - 10.0).abs() < f64::EPSILON);
        assert!((bbox.depth() - 30.0).abs() < f64::EPSILON);
        assert_eq!(bbox.center(), (7.0, 14.0));
    }

    #[test]
    fn site_config_parses_from_toml() {
        let site: SiteConfig = toml::from_str(
            r#"
            lot_width = 10.0
            lot_type = "corner"
            dwelling_units = 4

            [[sunken_patios]]
            projection = 2.5
            width = 4.0
            position = "rear"

            [[external_stairs]]
            width = 1.2
            height = 1.5
            projection = 2.0

            [accessory_building]
            kind = "coach_house"
            "#,
        )
        .expect("site config should parse");

        assert_eq!(site.lot_type, Some(LotType::Corner));
        assert_eq!(site.dwelling_units, Some(4));
        assert_eq!(site.sunken_patios[0].position, ElementPosition::Rear);
        assert_eq!(site.external_stairs[0].position, ElementPosition::Front);
        assert_eq!(
            site.accessory_building,
            Some(AccessoryBuilding {
                kind: AccessoryKind::CoachHouse,
                position: AccessoryPosition::Rear,
            })
        );
    }

    #[test]
    fn parcel_attributes() {
        let parcel = Parcel::projected(MultiPolygon(vec![]))
            .with_attribute("address", serde_json::json!("987 E 25th Ave"));
        assert_eq!(parcel.attribute_str("address"), Some("987 E 25th Ave"));
        assert_eq!(parcel.attribute_str("folio"), None);
        assert_eq!(parcel.frame, CoordinateFrame::Projected);
    }
}
