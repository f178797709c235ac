//! Extrudes a final footprint into a massing envelope.

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use site_massing_geometry::{GeoProvider, PlanarGeometryProvider};
use site_massing_site_models::{ElementPosition, LotType, SiteConfig, SiteMeasurements};
use site_massing_zoning_models::{CourtyardRules, Setbacks, ZoningRules};

use crate::{CourtyardDecision, FootprintStage};

/// Slack for `height / floor_height` landing just under a whole number.
const STORY_EPSILON: f64 = 1e-9;

/// A sunken patio void with clamped dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatioVoid {
    pub position: ElementPosition,
    pub projection: f64,
    pub width: f64,
}

/// An external stair with a clamped projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StairElement {
    pub position: ElementPosition,
    pub width: f64,
    pub height: f64,
    pub projection: f64,
}

/// Parameters and intermediate results behind a massing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MassingMetadata {
    pub district: Option<String>,
    pub max_height: f64,
    pub floor_height: f64,
    pub floor_area_ratio: f64,
    pub max_coverage: f64,
    /// Setbacks actually applied (after any corner-lot adjustment).
    pub setbacks: Setbacks,
    pub courtyard: CourtyardRules,
    pub lot_type: LotType,
    /// Planar area of the parcel boundary, in square metres.
    pub total_area: f64,
    /// Planar area of the final footprint, in square metres.
    pub buildable_area: f64,
    pub height: f64,
    pub stories: u32,
    pub setback_stage: Option<FootprintStage>,
    pub width_scale: Option<f64>,
    pub depth_scale: Option<f64>,
    pub courtyard_decision: Option<CourtyardDecision>,
    pub measurements: Option<SiteMeasurements>,
}

/// The massing of one parcel.
#[derive(Debug, Clone, PartialEq)]
pub struct MassingOutput {
    pub footprint: MultiPolygon<f64>,
    pub metadata: MassingMetadata,
    pub patio_voids: Vec<PatioVoid>,
    pub stairs: Vec<StairElement>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MassingExtruder<P = GeoProvider> {
    provider: P,
}

impl<P: PlanarGeometryProvider> MassingExtruder<P> {
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Builds the massing envelope for a final footprint.
    ///
    /// `original` is the parcel boundary the footprint was derived from;
    /// both are planar. Patios and stairs are clamped to the zoning caps
    /// and listed alongside the footprint without altering it.
    #[must_use]
    pub fn extrude(
        &self,
        original: &MultiPolygon<f64>,
        footprint: MultiPolygon<f64>,
        rules: &ZoningRules,
        site: &SiteConfig,
    ) -> MassingOutput {
        let stories = story_count(rules.max_height, rules.floor_height);
        let total_area = self.provider.area(original);
        let buildable_area = self.provider.area(&footprint);

        let patio_voids = site
            .sunken_patios
            .iter()
            .map(|patio| PatioVoid {
                position: patio.position,
                projection: clamp_dimension(patio.projection, rules.sunken_patio_max_projection),
                width: clamp_dimension(patio.width, rules.sunken_patio_max_width),
            })
            .collect();

        let stairs = site
            .external_stairs
            .iter()
            .map(|stair| StairElement {
                position: stair.position,
                width: stair.width,
                height: stair.height,
                projection: clamp_dimension(stair.projection, rules.max_stairs_projection),
            })
            .collect();

        log::debug!(
            "Extruded footprint of {buildable_area:.1} m² to {} m in {stories} stories",
            rules.max_height
        );

        MassingOutput {
            footprint,
            metadata: MassingMetadata {
                district: rules.district.clone(),
                max_height: rules.max_height,
                floor_height: rules.floor_height,
                floor_area_ratio: rules.floor_area_ratio,
                max_coverage: rules.max_coverage,
                setbacks: rules.setbacks,
                courtyard: rules.courtyard,
                lot_type: site.lot_type.unwrap_or_default(),
                total_area,
                buildable_area,
                height: rules.max_height,
                stories,
                setback_stage: None,
                width_scale: None,
                depth_scale: None,
                courtyard_decision: None,
                measurements: None,
            },
            patio_voids,
            stairs,
        }
    }
}

/// Whole stories that fit under the height limit; partial stories are
/// not counted.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn story_count(max_height: f64, floor_height: f64) -> u32 {
    if !(max_height.is_finite() && floor_height.is_finite())
        || max_height <= 0.0
        || floor_height <= 0.0
    {
        log::warn!("Cannot count stories for height {max_height} at floor height {floor_height}");
        return 0;
    }
    (max_height / floor_height + STORY_EPSILON)
        .floor()
        .min(f64::from(u32::MAX)) as u32
}

fn clamp_dimension(value: f64, cap: f64) -> f64 {
    if value.is_finite() { value.clamp(0.0, cap.max(0.0)) } else { 0.0 }
}
