#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Floodplain overlap analysis.
//!
//! Zones are held in an R-tree keyed by bounding box so a parcel is only
//! intersected with the zones whose envelopes it touches. Each
//! overlapping zone is classified into a risk tier from its name, and the
//! parcel's risk is the highest tier among them.

use geo::{BoundingRect, MultiPolygon};
use rstar::{AABB, RTree, RTreeObject};
use site_massing_floodplain_models::{
    AffectedArea, FloodplainAssessment, FloodplainZone, RiskLevel,
};
use site_massing_geometry::{
    GeoProvider, GeometryError, PlanarBoundary, PlanarGeometryProvider, parse::parse_all_boundaries,
    projection::validate_boundary,
};
use site_massing_site_models::Parcel;
use thiserror::Error;

/// Zone-name substrings that mark a high-risk zone.
const HIGH_RISK_MARKERS: &[&str] = &["Wave Effect", "Storm"];
/// Zone-name substrings that mark a medium-risk zone.
const MEDIUM_RISK_MARKERS: &[&str] = &["Fraser Risk", "Still Creek"];

/// Property keys read as a zone's name, in order.
const NAME_KEYS: &[&str] = &["name", "NAME", "zone_name", "ZONE_NAME", "floodplain"];
/// Property keys read as a zone's description, in order.
const DESCRIPTION_KEYS: &[&str] = &["description", "DESCRIPTION", "desc"];

/// Errors that stop a floodplain analysis.
#[derive(Debug, Error)]
pub enum FloodplainError {
    /// The parcel, or the zone dataset, cannot be interpreted.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Classifies a zone label into a risk tier.
#[must_use]
pub fn classify_zone(label: &str) -> RiskLevel {
    if HIGH_RISK_MARKERS.iter().any(|m| label.contains(m)) {
        RiskLevel::High
    } else if MEDIUM_RISK_MARKERS.iter().any(|m| label.contains(m)) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// A zone stored in the R-tree with its precomputed envelope.
struct ZoneEntry {
    order: usize,
    zone: FloodplainZone,
    boundary: MultiPolygon<f64>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for ZoneEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Spatial index over the usable zones of a floodplain dataset.
///
/// Zones must be in the same coordinate frame as the parcels they are
/// checked against.
pub struct FloodplainIndex {
    zones: RTree<ZoneEntry>,
}

impl FloodplainIndex {
    /// Indexes every zone with a usable boundary; the rest are logged and
    /// dropped.
    #[must_use]
    pub fn new(zones: impl IntoIterator<Item = FloodplainZone>) -> Self {
        let mut entries = Vec::new();
        let mut skipped = 0_usize;

        for (order, zone) in zones.into_iter().enumerate() {
            let Some(boundary) = zone.boundary.clone() else {
                log::debug!("Skipping floodplain zone '{}' with no geometry", zone.label());
                skipped += 1;
                continue;
            };
            if let Err(e) = validate_boundary(&boundary) {
                log::warn!("Skipping floodplain zone '{}': {e}", zone.label());
                skipped += 1;
                continue;
            }
            entries.push(ZoneEntry {
                order,
                envelope: compute_envelope(&boundary),
                zone,
                boundary,
            });
        }

        log::info!(
            "Indexed {} floodplain zones ({skipped} skipped)",
            entries.len()
        );

        Self {
            zones: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.size() == 0
    }

    fn candidates(&self, boundary: &MultiPolygon<f64>) -> Vec<&ZoneEntry> {
        let mut found: Vec<&ZoneEntry> = self
            .zones
            .locate_in_envelope_intersecting(&compute_envelope(boundary))
            .collect();
        found.sort_by_key(|entry| entry.order);
        found
    }
}

/// Intersects parcels with an indexed floodplain dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloodplainRiskAnalyzer<P = GeoProvider> {
    provider: P,
}

impl<P: PlanarGeometryProvider> FloodplainRiskAnalyzer<P> {
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Assesses a parcel against a list of zones.
    ///
    /// # Errors
    ///
    /// See [`Self::analyze_indexed`].
    pub fn analyze(
        &self,
        parcel: &Parcel,
        zones: &[FloodplainZone],
    ) -> Result<FloodplainAssessment, FloodplainError> {
        self.analyze_indexed(parcel, &FloodplainIndex::new(zones.iter().cloned()))
    }

    /// Assesses a parcel against an indexed dataset.
    ///
    /// Overlap areas and percentages are computed in planar metres. A
    /// zone whose intersection fails is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`FloodplainError::Geometry`] if the parcel boundary is not
    /// a usable polygon.
    pub fn analyze_indexed(
        &self,
        parcel: &Parcel,
        index: &FloodplainIndex,
    ) -> Result<FloodplainAssessment, FloodplainError> {
        let planar = PlanarBoundary::from_parcel(parcel)?;
        let parcel_area = self.provider.area(&planar.boundary);
        if parcel_area <= 0.0 {
            return Err(GeometryError::InvalidGeometry {
                message: "parcel has zero area".to_string(),
            }
            .into());
        }

        let mut affected_areas = Vec::new();

        for entry in index.candidates(&parcel.boundary) {
            let zone_boundary = planar.to_planar(&entry.boundary);
            let overlap = match self.provider.intersection(&planar.boundary, &zone_boundary) {
                Ok(overlap) => overlap,
                Err(GeometryError::EmptyResult { .. }) => continue,
                Err(e) => {
                    log::warn!(
                        "Floodplain zone '{}' could not be intersected: {e}",
                        entry.zone.label()
                    );
                    continue;
                }
            };

            let overlap_area = self.provider.area(&overlap);
            let overlap_percentage = (overlap_area / parcel_area * 100.0).clamp(0.0, 100.0);
            let risk_level = classify_zone(entry.zone.label());

            log::debug!(
                "Parcel overlaps '{}' by {overlap_percentage:.1}% ({risk_level})",
                entry.zone.label()
            );

            affected_areas.push(AffectedArea {
                name: entry.zone.name.clone(),
                description: entry.zone.description.clone(),
                risk_level,
                overlap_area,
                overlap_percentage,
            });
        }

        if affected_areas.is_empty() {
            return Ok(FloodplainAssessment::clear());
        }

        let risk_level = affected_areas
            .iter()
            .map(|area| area.risk_level)
            .max()
            .unwrap_or_default();
        let message = format!(
            "Parcel overlaps {} floodplain zone{}; highest risk is {risk_level}",
            affected_areas.len(),
            if affected_areas.len() == 1 { "" } else { "s" },
        );

        Ok(FloodplainAssessment {
            in_floodplain: true,
            risk_level,
            affected_areas,
            message,
        })
    }
}

/// Parses floodplain zones from a `GeoJSON` document. Zone names and
/// descriptions are read from common property keys; features without
/// polygonal geometry are dropped.
///
/// # Errors
///
/// Returns [`FloodplainError::Geometry`] if the document is not valid
/// `GeoJSON`.
pub fn parse_zones(text: &str) -> Result<Vec<FloodplainZone>, FloodplainError> {
    Ok(parse_all_boundaries(text)?
        .into_iter()
        .map(|parsed| FloodplainZone {
            name: first_string(&parsed.properties, NAME_KEYS).unwrap_or_default(),
            description: first_string(&parsed.properties, DESCRIPTION_KEYS),
            boundary: Some(parsed.boundary),
        })
        .collect())
}

fn first_string(
    properties: &std::collections::BTreeMap<String, serde_json::Value>,
    keys: &[&str],
) -> Option<String> {
    keys.iter()
        .find_map(|key| properties.get(*key)?.as_str())
        .map(ToString::to_string)
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}
