#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Floodplain zone and assessment types.

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Coarse floodplain severity, ordered from no risk to high risk.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
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
pub enum RiskLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

/// A mapped floodplain zone.
///
/// Zones with no boundary are kept so datasets can be passed through
/// as-is; the analyzer skips them.
#[derive(Debug, Clone, PartialEq)]
pub struct FloodplainZone {
    /// Classification name, e.g. "Fraser River Floodplain - Wave Effect".
    pub name: String,
    pub description: Option<String>,
    pub boundary: Option<MultiPolygon<f64>>,
}

impl FloodplainZone {
    #[must_use]
    pub fn new(name: impl Into<String>, boundary: MultiPolygon<f64>) -> Self {
        Self {
            name: name.into(),
            description: None,
            boundary: Some(boundary),
        }
    }

    /// The label used for risk classification: the name, or the
    /// description when the name is blank.
    #[must_use]
    pub fn label(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            self.description.as_deref().map_or("", str::trim)
        } else {
            name
        }
    }
}

/// One zone the parcel overlaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedArea {
    pub name: String,
    pub description: Option<String>,
    pub risk_level: RiskLevel,
    /// Overlap area in square metres.
    pub overlap_area: f64,
    /// Share of the parcel covered by the zone, in `0..=100`.
    pub overlap_percentage: f64,
}

/// Result of intersecting a parcel with a floodplain dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloodplainAssessment {
    pub in_floodplain: bool,
    pub risk_level: RiskLevel,
    pub affected_areas: Vec<AffectedArea>,
    pub message: String,
}

impl FloodplainAssessment {
    /// An assessment with no overlapping zones.
    #[must_use]
    pub fn clear() -> Self {
        Self {
            in_floodplain: false,
            risk_level: RiskLevel::None,
            affected_areas: vec![],
            message: "Parcel is not within a mapped floodplain".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_levels_are_ordered() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);
        assert!(RiskLevel::Low > RiskLevel::None);
        assert_eq!(
            [RiskLevel::Low, RiskLevel::High, RiskLevel::Medium]
                .into_iter()
                .max(),
            Some(RiskLevel::High)
        );
    }

    #[test]
    fn risk_level_strings() {
        assert_eq!(RiskLevel::Medium.to_string(), "medium");
        assert_eq!("high".parse::<RiskLevel>(), Ok(RiskLevel::High));
    }

    #[test]
    fn label_falls_back_to_description() {
        let zone = FloodplainZone {
            name: "  ".to_string(),
            description: Some("Still Creek Floodplain".to_string()),
            boundary: None,
        };
        assert_eq!(zone.label(), "Still Creek Floodplain");
    }

    #[test]
    fn clear_assessment_serializes_camel_case() {
        let json = serde_json::to_value(FloodplainAssessment::clear()).expect("serializable");
        assert_eq!(json["inFloodplain"], false);
        assert_eq!(json["riskLevel"], "none");
        assert!(json["affectedAreas"].as_array().is_some_and(Vec::is_empty));
    }
}
