//! Buildable footprint after directional setbacks.

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use site_massing_geometry::{GeoProvider, GeometryError, PlanarGeometryProvider, first_usable};
use site_massing_zoning_models::Setbacks;
use strum_macros::{AsRefStr, Display, EnumString};

/// Which candidate of the setback chain produced the footprint, best
/// first.
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
pub enum FootprintStage {
    /// Front, side, and rear erosions intersected.
    Directional,
    /// Front and side erosions intersected; the rear step failed.
    PartialIntersection,
    /// Erosion by the largest setback.
    Uniform,
    /// Every erosion failed; the parcel itself.
    Original,
}

/// A resolved footprint and the stage it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFootprint {
    pub footprint: MultiPolygon<f64>,
    pub stage: FootprintStage,
}

/// Erodes a parcel by its setbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetbackFootprintResolver<P = GeoProvider> {
    provider: P,
}

impl<P: PlanarGeometryProvider> SetbackFootprintResolver<P> {
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Resolves the buildable footprint of a planar boundary.
    ///
    /// The candidates are tried in order: the direction-aware
    /// intersection of the front, side, and rear erosions (only when the
    /// setbacks differ), the partial front and side intersection, the
    /// erosion by the largest setback, and finally the boundary itself.
    /// Degenerate intermediate results never surface as errors.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidGeometry`] if the boundary has no
    /// ring or zero area.
    pub fn resolve(
        &self,
        boundary: &MultiPolygon<f64>,
        setbacks: &Setbacks,
    ) -> Result<ResolvedFootprint, GeometryError> {
        if boundary.0.is_empty() {
            return Err(GeometryError::InvalidGeometry {
                message: "parcel has no polygon rings".to_string(),
            });
        }
        if self.provider.area(boundary) <= 0.0 {
            return Err(GeometryError::InvalidGeometry {
                message: "parcel has zero area".to_string(),
            });
        }

        let setbacks = Setbacks {
            front: sanitize("front", setbacks.front),
            side: sanitize("side", setbacks.side),
            rear: sanitize("rear", setbacks.rear),
            ..*setbacks
        };
        let Setbacks { front, side, rear, .. } = setbacks;

        let uniform = self.erode(boundary, setbacks.max_directional());

        let candidates = if setbacks.is_uniform() {
            vec![(FootprintStage::Uniform, uniform)]
        } else {
            let partial = self.erode(boundary, front).and_then(|f| {
                let s = self.erode(boundary, side)?;
                self.provider.intersection(&f, &s)
            });
            let directional = self.erode(boundary, rear).and_then(|r| {
                let p = partial.as_ref().map_err(Clone::clone)?;
                self.provider.intersection(p, &r)
            });
            vec![
                (FootprintStage::Directional, directional),
                (FootprintStage::PartialIntersection, partial),
                (FootprintStage::Uniform, uniform),
            ]
        };

        let (stage, footprint) =
            first_usable(candidates, (FootprintStage::Original, boundary.clone()));

        log::debug!(
            "Resolved setback footprint at stage {stage} (front={front}, side={side}, rear={rear})"
        );

        Ok(ResolvedFootprint { footprint, stage })
    }

    fn erode(
        &self,
        boundary: &MultiPolygon<f64>,
        distance: f64,
    ) -> Result<MultiPolygon<f64>, GeometryError> {
        self.provider.buffer(boundary, -distance)
    }
}

fn sanitize(direction: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("Ignoring unusable {direction} setback {value}; using 0");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use geo::{Area, BooleanOps};

    use super::*;
    use crate::test_shapes::{approx_eq, rect_mp};

    /// Fails the selected operations; everything else delegates to `geo`.
    #[derive(Default)]
    struct Failing {
        buffer: bool,
        intersection: bool,
    }

    impl PlanarGeometryProvider for Failing {
        fn area(&self, geometry: &MultiPolygon<f64>) -> f64 {
            GeoProvider.area(geometry)
        }
        fn buffer(
            &self,
            geometry: &MultiPolygon<f64>,
            distance: f64,
        ) -> Result<MultiPolygon<f64>, GeometryError> {
            if self.buffer {
                return Err(GeometryError::EmptyResult { operation: "buffer" });
            }
            GeoProvider.buffer(geometry, distance)
        }
        fn intersection(
            &self,
            a: &MultiPolygon<f64>,
            b: &MultiPolygon<f64>,
        ) -> Result<MultiPolygon<f64>, GeometryError> {
            if self.intersection {
                return Err(GeometryError::EmptyResult {
                    operation: "intersection",
                });
            }
            GeoProvider.intersection(a, b)
        }
        fn difference(
            &self,
            a: &MultiPolygon<f64>,
            b: &MultiPolygon<f64>,
        ) -> Result<MultiPolygon<f64>, GeometryError> {
            GeoProvider.difference(a, b)
        }
        fn bounding_box(
            &self,
            geometry: &MultiPolygon<f64>,
        ) -> Option<site_massing_site_models::BoundingBox> {
            GeoProvider.bounding_box(geometry)
        }
        fn ring_length(&self, ring: &geo::LineString<f64>) -> f64 {
            GeoProvider.ring_length(ring)
        }
        fn centroid(&self, geometry: &MultiPolygon<f64>) -> Option<geo::Coord<f64>> {
            GeoProvider.centroid(geometry)
        }
        fn scale(
            &self,
            geometry: &MultiPolygon<f64>,
            factor: f64,
            origin: geo::Coord<f64>,
        ) -> Result<MultiPolygon<f64>, GeometryError> {
            GeoProvider.scale(geometry, factor, origin)
        }
    }

    #[test]
    fn zero_setbacks_return_the_parcel() {
        let parcel = rect_mp(0.0, 0.0, 15.0, 40.0);
        let resolved = <SetbackFootprintResolver>::default()
            .resolve(&parcel, &Setbacks::new(0.0, 0.0, 0.0))
            .expect("valid parcel");
        assert_eq!(resolved.stage, FootprintStage::Uniform);
        assert_eq!(resolved.footprint, parcel);
    }

    #[test]
    fn uniform_setback_shrinks_area() {
        let parcel = rect_mp(0.0, 0.0, 20.0, 40.0);
        let resolved = <SetbackFootprintResolver>::default()
            .resolve(&parcel, &Setbacks::new(2.0, 2.0, 2.0))
            .expect("valid parcel");
        assert_eq!(resolved.stage, FootprintStage::Uniform);
        let area = resolved.footprint.unsigned_area();
        assert!(area < 800.0);
        assert!(approx_eq(area, 16.0 * 36.0, 1.0), "area {area}");
    }

    #[test]
    fn twenty_metre_square_with_default_setbacks() {
        let parcel = rect_mp(0.0, 0.0, 20.0, 20.0);
        let resolved = <SetbackFootprintResolver>::default()
            .resolve(&parcel, &Setbacks::new(6.0, 1.5, 7.5))
            .expect("valid parcel");
        let area = resolved.footprint.unsigned_area();
        assert_eq!(resolved.stage, FootprintStage::Directional);
        assert!(area > 0.0 && area < 400.0, "area {area}");
        // Nested erosions intersect to the deepest one: a 5 m core.
        assert!(approx_eq(area, 25.0, 0.5), "area {area}");
    }

    #[test]
    fn footprint_stays_inside_parcel() {
        let parcel = rect_mp(0.0, 0.0, 12.0, 35.0);
        let resolved = <SetbackFootprintResolver>::default()
            .resolve(&parcel, &Setbacks::new(4.9, 1.2, 10.7))
            .expect("valid parcel");
        let outside = resolved.footprint.difference(&parcel);
        assert!(outside.unsigned_area() < 1e-6);
    }

    #[test]
    fn setbacks_larger_than_lot_fall_back_to_parcel() {
        let parcel = rect_mp(0.0, 0.0, 10.0, 10.0);
        let resolved = <SetbackFootprintResolver>::default()
            .resolve(&parcel, &Setbacks::new(6.0, 6.0, 8.0))
            .expect("valid parcel");
        assert_eq!(resolved.stage, FootprintStage::Original);
        assert_eq!(resolved.footprint, parcel);
    }

    #[test]
    fn failing_provider_degrades_to_parcel() {
        let parcel = rect_mp(0.0, 0.0, 20.0, 20.0);
        let resolved = SetbackFootprintResolver::new(Failing {
            buffer: true,
            ..Failing::default()
        })
        .resolve(&parcel, &Setbacks::new(6.0, 1.5, 7.5))
        .expect("degradation is not an error");
        assert_eq!(resolved.stage, FootprintStage::Original);
    }

    #[test]
    fn deep_rear_setback_keeps_front_and_side() {
        // Eroding 10 x 10 by 6 m leaves nothing; front and side still meet.
        let parcel = rect_mp(0.0, 0.0, 10.0, 10.0);
        let resolved = <SetbackFootprintResolver>::default()
            .resolve(&parcel, &Setbacks::new(1.0, 1.0, 6.0))
            .expect("valid parcel");
        assert_eq!(resolved.stage, FootprintStage::PartialIntersection);
        let area = resolved.footprint.unsigned_area();
        assert!(approx_eq(area, 64.0, 0.5), "area {area}");
    }

    #[test]
    fn failed_intersections_fall_back_to_largest_setback() {
        let parcel = rect_mp(0.0, 0.0, 20.0, 40.0);
        let resolved = SetbackFootprintResolver::new(Failing {
            intersection: true,
            ..Failing::default()
        })
        .resolve(&parcel, &Setbacks::new(2.0, 1.0, 3.0))
        .expect("valid parcel");
        assert_eq!(resolved.stage, FootprintStage::Uniform);
        let area = resolved.footprint.unsigned_area();
        assert!(approx_eq(area, 14.0 * 34.0, 1.0), "area {area}");
    }

    #[test]
    fn negative_setbacks_are_treated_as_zero() {
        let parcel = rect_mp(0.0, 0.0, 20.0, 20.0);
        let resolved = <SetbackFootprintResolver>::default()
            .resolve(&parcel, &Setbacks::new(-3.0, f64::NAN, 0.0))
            .expect("valid parcel");
        assert_eq!(resolved.footprint, parcel);
    }

    #[test]
    fn zero_area_parcel_is_invalid() {
        let err = <SetbackFootprintResolver>::default()
            .resolve(&rect_mp(0.0, 0.0, 10.0, 0.0), &Setbacks::default())
            .expect_err("flat parcel");
        assert!(err.is_structural());
    }

    #[test]
    fn empty_parcel_is_invalid() {
        let err = <SetbackFootprintResolver>::default()
            .resolve(&MultiPolygon(vec![]), &Setbacks::default())
            .expect_err("no rings");
        assert!(matches!(err, GeometryError::InvalidGeometry { .. }));
    }

    #[test]
    fn resolution_is_deterministic() {
        let parcel = rect_mp(3.0, 7.0, 18.0, 41.0);
        let setbacks = Setbacks::new(4.9, 1.2, 10.7);
        let resolver = <SetbackFootprintResolver>::default();
        let first = resolver.resolve(&parcel, &setbacks).expect("valid");
        let second = resolver.resolve(&parcel, &setbacks).expect("valid");
        assert_eq!(first, second);
    }
}
