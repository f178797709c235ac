//! Caps footprint width and depth by centroid-preserving uniform scaling.

use geo::MultiPolygon;
use site_massing_geometry::{GeoProvider, GeometryError, PlanarGeometryProvider};

/// A footprint after dimensional caps, with the scale factors applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedFootprint {
    pub footprint: MultiPolygon<f64>,
    /// Factor applied for the width cap, if it was exceeded.
    pub width_scale: Option<f64>,
    /// Factor applied for the depth cap, if it was exceeded.
    pub depth_scale: Option<f64>,
}

impl ConstrainedFootprint {
    const fn unchanged(footprint: MultiPolygon<f64>) -> Self {
        Self {
            footprint,
            width_scale: None,
            depth_scale: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionalConstraintApplier<P = GeoProvider> {
    provider: P,
}

impl<P: PlanarGeometryProvider> DimensionalConstraintApplier<P> {
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Scales the footprint about its centroid so its bounding-box width
    /// (x extent) and depth (y extent) fit the caps.
    ///
    /// Width and depth are checked one after the other, each with its own
    /// uniform scale. A missing, non-positive, or non-finite cap is
    /// ignored. If either scale fails, the input footprint is returned
    /// unchanged.
    #[must_use]
    pub fn apply(
        &self,
        footprint: &MultiPolygon<f64>,
        max_width: Option<f64>,
        max_depth: Option<f64>,
    ) -> ConstrainedFootprint {
        match self.try_apply(footprint, max_width, max_depth) {
            Ok(constrained) => constrained,
            Err(e) => {
                log::warn!("Dimensional cap failed, keeping unscaled footprint: {e}");
                ConstrainedFootprint::unchanged(footprint.clone())
            }
        }
    }

    fn try_apply(
        &self,
        footprint: &MultiPolygon<f64>,
        max_width: Option<f64>,
        max_depth: Option<f64>,
    ) -> Result<ConstrainedFootprint, GeometryError> {
        let mut result = ConstrainedFootprint::unchanged(footprint.clone());

        if let Some(cap) = usable_cap(max_width) {
            let width = self
                .provider
                .bounding_box(&result.footprint)
                .ok_or(GeometryError::MissingBounds)?
                .width();
            if width > cap {
                let factor = cap / width;
                result.footprint = self.scale_about_centroid(&result.footprint, factor)?;
                result.width_scale = Some(factor);
                log::debug!("Scaled footprint by {factor:.4} to meet width cap {cap} m");
            }
        }

        if let Some(cap) = usable_cap(max_depth) {
            let depth = self
                .provider
                .bounding_box(&result.footprint)
                .ok_or(GeometryError::MissingBounds)?
                .depth();
            if depth > cap {
                let factor = cap / depth;
                result.footprint = self.scale_about_centroid(&result.footprint, factor)?;
                result.depth_scale = Some(factor);
                log::debug!("Scaled footprint by {factor:.4} to meet depth cap {cap} m");
            }
        }

        Ok(result)
    }

    fn scale_about_centroid(
        &self,
        footprint: &MultiPolygon<f64>,
        factor: f64,
    ) -> Result<MultiPolygon<f64>, GeometryError> {
        let centroid = self
            .provider
            .centroid(footprint)
            .ok_or(GeometryError::MissingCentroid)?;
        self.provider.scale(footprint, factor, centroid)
    }
}

fn usable_cap(cap: Option<f64>) -> Option<f64> {
    cap.filter(|c| c.is_finite() && *c > 0.0)
}

#[cfg(test)]
mod tests {
    use geo::{Centroid, Coord, LineString};
    use site_massing_site_models::BoundingBox;

    use super::*;
    use crate::test_shapes::{approx_eq, rect_mp};

    /// Fails every scale; everything else delegates to `geo`.
    struct NoScale;

    impl PlanarGeometryProvider for NoScale {
        fn area(&self, geometry: &MultiPolygon<f64>) -> f64 {
            GeoProvider.area(geometry)
        }
        fn buffer(&self, g: &MultiPolygon<f64>, d: f64) -> Result<MultiPolygon<f64>, GeometryError> {
            GeoProvider.buffer(g, d)
        }
        fn intersection(
            &self,
            a: &MultiPolygon<f64>,
            b: &MultiPolygon<f64>,
        ) -> Result<MultiPolygon<f64>, GeometryError> {
            GeoProvider.intersection(a, b)
        }
        fn difference(
            &self,
            a: &MultiPolygon<f64>,
            b: &MultiPolygon<f64>,
        ) -> Result<MultiPolygon<f64>, GeometryError> {
            GeoProvider.difference(a, b)
        }
        fn bounding_box(&self, geometry: &MultiPolygon<f64>) -> Option<BoundingBox> {
            GeoProvider.bounding_box(geometry)
        }
        fn ring_length(&self, ring: &LineString<f64>) -> f64 {
            GeoProvider.ring_length(ring)
        }
        fn centroid(&self, geometry: &MultiPolygon<f64>) -> Option<Coord<f64>> {
            GeoProvider.centroid(geometry)
        }
        fn scale(
            &self,
            _: &MultiPolygon<f64>,
            _: f64,
            _: Coord<f64>,
        ) -> Result<MultiPolygon<f64>, GeometryError> {
            Err(GeometryError::EmptyResult { operation: "scale" })
        }
    }

    fn bbox(footprint: &MultiPolygon<f64>) -> BoundingBox {
        GeoProvider.bounding_box(footprint).expect("bbox")
    }

    #[test]
    fn within_caps_is_a_no_op() {
        let footprint = rect_mp(0.0, 0.0, 10.0, 20.0);
        let result =
            <DimensionalConstraintApplier>::default().apply(&footprint, Some(12.0), Some(24.0));
        assert_eq!(result, ConstrainedFootprint::unchanged(footprint));
    }

    #[test]
    fn width_cap_scales_to_cap_and_keeps_centroid() {
        let footprint = rect_mp(0.0, 0.0, 20.0, 10.0);
        let before = footprint.centroid().expect("centroid");
        let result = <DimensionalConstraintApplier>::default().apply(&footprint, Some(16.0), None);

        assert!(approx_eq(bbox(&result.footprint).width(), 16.0, 1e-9));
        assert_eq!(result.width_scale, Some(0.8));
        let after = result.footprint.centroid().expect("centroid");
        assert!(approx_eq(before.x(), after.x(), 1e-9));
        assert!(approx_eq(before.y(), after.y(), 1e-9));
    }

    #[test]
    fn width_then_depth_are_sequential() {
        // 20 x 40: width cap 16 scales by 0.8 to 16 x 32, then the depth
        // cap 24 scales by 0.75 to 12 x 24.
        let footprint = rect_mp(0.0, 0.0, 20.0, 40.0);
        let result =
            <DimensionalConstraintApplier>::default().apply(&footprint, Some(16.0), Some(24.0));
        let b = bbox(&result.footprint);
        assert!(approx_eq(b.width(), 12.0, 1e-9));
        assert!(approx_eq(b.depth(), 24.0, 1e-9));
        assert!(result.width_scale.is_some());
        assert!(result.depth_scale.is_some());
    }

    #[test]
    fn depth_check_sees_width_scaled_footprint() {
        // 20 x 25 scaled by 0.8 for width is 16 x 20, already within 24.
        let footprint = rect_mp(0.0, 0.0, 20.0, 25.0);
        let result =
            <DimensionalConstraintApplier>::default().apply(&footprint, Some(16.0), Some(24.0));
        assert_eq!(result.depth_scale, None);
    }

    #[test]
    fn unusable_caps_are_ignored() {
        let footprint = rect_mp(0.0, 0.0, 20.0, 20.0);
        let result = <DimensionalConstraintApplier>::default().apply(
            &footprint,
            Some(0.0),
            Some(f64::NAN),
        );
        assert_eq!(result.footprint, footprint);
    }

    #[test]
    fn failed_scale_returns_input() {
        let footprint = rect_mp(0.0, 0.0, 20.0, 20.0);
        let result = DimensionalConstraintApplier::new(NoScale).apply(&footprint, Some(10.0), None);
        assert_eq!(result, ConstrainedFootprint::unchanged(footprint));
    }
}
