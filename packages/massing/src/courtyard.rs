//! Optional courtyard void cut from the footprint.

use geo::{Coord, MultiPolygon, Rect};
use serde::{Deserialize, Serialize};
use site_massing_geometry::{GeoProvider, PlanarGeometryProvider, provider::MIN_USABLE_AREA};
use site_massing_zoning_models::{CourtyardPosition, CourtyardRules};

/// Largest courtyard width as a fraction of the footprint width.
const MAX_WIDTH_FRACTION: f64 = 0.8;

/// What happened when a courtyard cutout was considered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CourtyardDecision {
    /// Courtyards are disabled for the district.
    Disabled,
    /// The footprint is shallower than the courtyard minimum depth.
    TooShallow { depth: f64, min_depth: f64 },
    /// The courtyard was cut.
    Applied {
        center_x: f64,
        center_y: f64,
        width: f64,
        area: f64,
    },
    /// The void would exceed the allowed share of the footprint.
    Oversized { area_ratio: f64, max_area_ratio: f64 },
    /// The cut would split the footprint into disconnected parts.
    Fragmented { parts: usize },
    /// A geometric operation failed.
    Failed { reason: String },
}

/// A footprint after the courtyard step.
#[derive(Debug, Clone, PartialEq)]
pub struct CourtyardResult {
    pub footprint: MultiPolygon<f64>,
    pub decision: CourtyardDecision,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CourtyardCutoutPlanner<P = GeoProvider> {
    provider: P,
}

impl<P: PlanarGeometryProvider> CourtyardCutoutPlanner<P> {
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Subtracts a square courtyard from the footprint when the rules
    /// allow it.
    ///
    /// The front of the footprint is its minimum-y edge. `front` and
    /// `rear` courtyards sit a quarter and three quarters of the depth
    /// back from it, centred across the width; `center` courtyards sit on
    /// the centroid. Whenever the cut is not applied, the footprint is
    /// returned as given.
    #[must_use]
    pub fn plan(&self, footprint: &MultiPolygon<f64>, rules: &CourtyardRules) -> CourtyardResult {
        let decision = self.decide(footprint, rules);

        match decision {
            Ok((cut, decision)) => {
                log::debug!("Courtyard cut applied: {decision:?}");
                CourtyardResult {
                    footprint: cut,
                    decision,
                }
            }
            Err(decision) => {
                if !matches!(decision, CourtyardDecision::Disabled) {
                    log::debug!("Courtyard not applied: {decision:?}");
                }
                CourtyardResult {
                    footprint: footprint.clone(),
                    decision,
                }
            }
        }
    }

    fn decide(
        &self,
        footprint: &MultiPolygon<f64>,
        rules: &CourtyardRules,
    ) -> Result<(MultiPolygon<f64>, CourtyardDecision), CourtyardDecision> {
        if !rules.enabled {
            return Err(CourtyardDecision::Disabled);
        }

        let bbox = self
            .provider
            .bounding_box(footprint)
            .ok_or_else(|| failed("footprint has no bounding box"))?;

        let depth = bbox.depth();
        if depth < rules.min_depth {
            return Err(CourtyardDecision::TooShallow {
                depth,
                min_depth: rules.min_depth,
            });
        }

        let width = rules.width.min(MAX_WIDTH_FRACTION * bbox.width());
        if !(width.is_finite() && width > 0.0) {
            return Err(failed("courtyard width is not positive"));
        }

        let (center_x, _) = bbox.center();
        let center = match rules.position {
            CourtyardPosition::Front => Coord {
                x: center_x,
                y: 0.25f64.mul_add(depth, bbox.min_y),
            },
            CourtyardPosition::Rear => Coord {
                x: center_x,
                y: 0.75f64.mul_add(depth, bbox.min_y),
            },
            CourtyardPosition::Center => self
                .provider
                .centroid(footprint)
                .ok_or_else(|| failed("footprint has no centroid"))?,
        };

        let half = width / 2.0;
        let void = MultiPolygon(vec![
            Rect::new(
                Coord {
                    x: center.x - half,
                    y: center.y - half,
                },
                Coord {
                    x: center.x + half,
                    y: center.y + half,
                },
            )
            .to_polygon(),
        ]);

        let cut = self
            .provider
            .difference(footprint, &void)
            .map_err(|e| failed(e.to_string()))?;

        let before = self.provider.area(footprint);
        let area = before - self.provider.area(&cut);
        if area <= MIN_USABLE_AREA {
            return Err(failed("void misses footprint"));
        }
        let area_ratio = if before > 0.0 { area / before } else { 1.0 };
        if area_ratio > rules.max_area_ratio {
            return Err(CourtyardDecision::Oversized {
                area_ratio,
                max_area_ratio: rules.max_area_ratio,
            });
        }

        if cut.0.len() > footprint.0.len() {
            return Err(CourtyardDecision::Fragmented {
                parts: cut.0.len(),
            });
        }

        Ok((
            cut,
            CourtyardDecision::Applied {
                center_x: center.x,
                center_y: center.y,
                width,
                area,
            },
        ))
    }
}

fn failed(reason: impl Into<String>) -> CourtyardDecision {
    CourtyardDecision::Failed {
        reason: reason.into(),
    }
}
