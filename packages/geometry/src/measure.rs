//! Site measurements derived from a parcel boundary.

use geo::{Coord, MultiPolygon, Polygon};
use site_massing_site_models::{Parcel, SiteMeasurements};

use crate::{
    GeoProvider, GeometryError, PlanarBoundary, PlanarGeometryProvider,
    projection::validate_boundary, shape::edge_lengths,
};

/// Computes [`SiteMeasurements`] through a [`PlanarGeometryProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteMeasurementCalculator<P = GeoProvider> {
    provider: P,
}

impl<P: PlanarGeometryProvider> SiteMeasurementCalculator<P> {
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Measures a parcel, projecting geographic boundaries into metres
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidGeometry`] if the boundary is not a
    /// usable polygon.
    pub fn measure_parcel(&self, parcel: &Parcel) -> Result<SiteMeasurements, GeometryError> {
        let planar = PlanarBoundary::from_parcel(parcel)?;
        self.measure(&planar.boundary)
    }

    /// Measures a planar boundary in metres.
    ///
    /// Frontage is the longest edge of the outer ring of the largest
    /// polygon. Depth is twice the largest distance from the centroid to
    /// an outer-ring vertex, so a square of side `s` has depth
    /// `s * sqrt(2)`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidGeometry`] if the boundary has
    /// fewer than 3 distinct vertices in a ring, no area, no centroid, or
    /// no bounding box.
    pub fn measure(&self, boundary: &MultiPolygon<f64>) -> Result<SiteMeasurements, GeometryError> {
        validate_boundary(boundary)?;

        let area = self.provider.area(boundary);
        if area <= 0.0 {
            return Err(GeometryError::invalid("boundary has zero area"));
        }

        let largest = self
            .largest_polygon(boundary)
            .ok_or_else(|| GeometryError::invalid("boundary has no polygon rings"))?;
        let frontage = edge_lengths(largest.exterior())
            .into_iter()
            .fold(0.0, f64::max);

        let centroid = self
            .provider
            .centroid(boundary)
            .ok_or_else(|| GeometryError::invalid("boundary has no centroid"))?;
        let depth = 2.0 * max_vertex_distance(boundary, centroid);

        let bounding_box = self
            .provider
            .bounding_box(boundary)
            .ok_or_else(|| GeometryError::invalid("boundary has no bounding box"))?;

        let perimeter = self.provider.perimeter(boundary);
        let compactness = if perimeter > 0.0 {
            area / perimeter.powi(2)
        } else {
            0.0
        };

        log::debug!(
            "Measured site: area={area:.2} frontage={frontage:.2} depth={depth:.2} perimeter={perimeter:.2}"
        );

        Ok(SiteMeasurements {
            area,
            frontage,
            depth,
            perimeter,
            compactness,
            bounding_box,
        })
    }

    fn largest_polygon<'a>(&self, boundary: &'a MultiPolygon<f64>) -> Option<&'a Polygon<f64>> {
        boundary.0.iter().max_by(|a, b| {
            let area_a = self.provider.area(&MultiPolygon(vec![(*a).clone()]));
            let area_b = self.provider.area(&MultiPolygon(vec![(*b).clone()]));
            area_a.total_cmp(&area_b)
        })
    }
}

fn max_vertex_distance(boundary: &MultiPolygon<f64>, from: Coord<f64>) -> f64 {
    boundary
        .0
        .iter()
        .flat_map(|polygon| polygon.exterior().0.iter())
        .map(|c| (c.x - from.x).hypot(c.y - from.y))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use geo::polygon;
    use site_massing_site_models::CoordinateFrame;

    use super::*;
    use crate::test_shapes::{approx_eq, rect, rect_mp};

    #[test]
    fn square_frontage_is_side_and_depth_is_diagonal() {
        let m = <SiteMeasurementCalculator>::default()
            .measure(&rect_mp(0.0, 0.0, 20.0, 20.0))
            .expect("square");
        assert!(approx_eq(m.area, 400.0, 1e-9));
        assert!(approx_eq(m.frontage, 20.0, 1e-9));
        assert!(
            approx_eq(m.depth, 20.0 * std::f64::consts::SQRT_2, 1e-9),
            "depth was {}",
            m.depth
        );
        assert!(approx_eq(m.perimeter, 80.0, 1e-9));
        assert!(approx_eq(m.compactness, 400.0 / 6400.0, 1e-12));
        assert!(approx_eq(m.bounding_box.width(), 20.0, 1e-9));
    }

    #[test]
    fn rectangular_lot_frontage_is_longest_edge() {
        let m = <SiteMeasurementCalculator>::default()
            .measure(&rect_mp(0.0, 0.0, 10.0, 37.0))
            .expect("lot");
        assert!(approx_eq(m.frontage, 37.0, 1e-9));
        assert!(approx_eq(m.depth, 10.0_f64.hypot(37.0), 1e-9));
    }

    #[test]
    fn frontage_comes_from_largest_polygon() {
        let boundary = MultiPolygon(vec![
            rect(100.0, 100.0, 2.0, 50.0),
            rect(0.0, 0.0, 30.0, 30.0),
        ]);
        let m = <SiteMeasurementCalculator>::default()
            .measure(&boundary)
            .expect("two parts");
        assert!(approx_eq(m.frontage, 30.0, 1e-9));
    }

    #[test]
    fn collinear_ring_has_zero_area() {
        let line = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0)];
        let err = <SiteMeasurementCalculator>::default()
            .measure(&MultiPolygon(vec![line]))
            .expect_err("collinear ring");
        assert!(matches!(err, GeometryError::InvalidGeometry { .. }));
    }

    #[test]
    fn empty_boundary_is_invalid() {
        let err = <SiteMeasurementCalculator>::default()
            .measure(&MultiPolygon(vec![]))
            .expect_err("no rings");
        assert!(err.is_structural());
    }

    #[test]
    fn geographic_parcel_is_measured_in_metres() {
        let lot = rect_mp(-123.08, 49.25, 0.000_137_6, 0.000_333);
        let parcel = Parcel::new(lot, CoordinateFrame::Geographic);
        let m = <SiteMeasurementCalculator>::default()
            .measure_parcel(&parcel)
            .expect("geographic lot");
        assert!(approx_eq(m.frontage, 37.0, 0.5), "frontage {}", m.frontage);
        assert!(approx_eq(m.area, 370.0, 10.0), "area {}", m.area);
    }
}
