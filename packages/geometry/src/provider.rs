//! The planar geometry capability the engine is written against.

use geo::{
    Area, BooleanOps, BoundingRect, Buffer, Centroid, Coord, CoordsIter, LineString, MultiPolygon,
    Scale,
};
use site_massing_site_models::BoundingBox;

use crate::GeometryError;

/// Polygons at or below this area (m²) are treated as numerical slivers.
pub const MIN_USABLE_AREA: f64 = 1e-6;

/// Planar operations over polygons defined as ordered rings of 2-D
/// coordinates in metres.
///
/// Fallible operations reject empty, zero-area, or non-finite output, so
/// a returned `Ok` geometry is always usable by the next stage.
pub trait PlanarGeometryProvider {
    /// Planar area in square metres.
    fn area(&self, geometry: &MultiPolygon<f64>) -> f64;

    /// Offsets the boundary by `distance`; negative distances erode.
    ///
    /// # Errors
    ///
    /// Returns a degenerate-result error if nothing usable remains.
    fn buffer(
        &self,
        geometry: &MultiPolygon<f64>,
        distance: f64,
    ) -> Result<MultiPolygon<f64>, GeometryError>;

    /// Region covered by both geometries.
    ///
    /// # Errors
    ///
    /// Returns a degenerate-result error if the geometries do not overlap.
    fn intersection(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryError>;

    /// Region of `a` not covered by `b`.
    ///
    /// # Errors
    ///
    /// Returns a degenerate-result error if `b` covers all of `a`.
    fn difference(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryError>;

    /// Axis-aligned bounding box, if the geometry has any coordinates.
    fn bounding_box(&self, geometry: &MultiPolygon<f64>) -> Option<BoundingBox>;

    /// Length of a ring or line in metres.
    fn ring_length(&self, ring: &LineString<f64>) -> f64;

    /// Area-weighted centroid.
    fn centroid(&self, geometry: &MultiPolygon<f64>) -> Option<Coord<f64>>;

    /// Uniform scale about `origin`.
    ///
    /// # Errors
    ///
    /// Returns a degenerate-result error if the scaled geometry collapses
    /// or becomes non-finite.
    fn scale(
        &self,
        geometry: &MultiPolygon<f64>,
        factor: f64,
        origin: Coord<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryError>;

    /// Total length of every exterior and interior ring.
    fn perimeter(&self, geometry: &MultiPolygon<f64>) -> f64 {
        geometry
            .0
            .iter()
            .map(|polygon| {
                self.ring_length(polygon.exterior())
                    + polygon
                        .interiors()
                        .iter()
                        .map(|ring| self.ring_length(ring))
                        .sum::<f64>()
            })
            .sum()
    }
}

/// [`PlanarGeometryProvider`] backed by the `geo` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoProvider;

impl PlanarGeometryProvider for GeoProvider {
    fn area(&self, geometry: &MultiPolygon<f64>) -> f64 {
        geometry.unsigned_area()
    }

    fn buffer(
        &self,
        geometry: &MultiPolygon<f64>,
        distance: f64,
    ) -> Result<MultiPolygon<f64>, GeometryError> {
        if !distance.is_finite() {
            return Err(GeometryError::NonFiniteResult {
                operation: "buffer",
            });
        }
        if distance == 0.0 {
            return ensure_usable("buffer", geometry.clone());
        }
        ensure_usable("buffer", Buffer::buffer(geometry, distance))
    }

    fn intersection(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryError> {
        ensure_usable("intersection", BooleanOps::intersection(a, b))
    }

    fn difference(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryError> {
        ensure_usable("difference", BooleanOps::difference(a, b))
    }

    fn bounding_box(&self, geometry: &MultiPolygon<f64>) -> Option<BoundingBox> {
        geometry.bounding_rect().map(|rect| BoundingBox {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        })
    }

    fn ring_length(&self, ring: &LineString<f64>) -> f64 {
        ring.lines().map(|line| line.dx().hypot(line.dy())).sum()
    }

    fn centroid(&self, geometry: &MultiPolygon<f64>) -> Option<Coord<f64>> {
        geometry.centroid().map(|point| point.0)
    }

    fn scale(
        &self,
        geometry: &MultiPolygon<f64>,
        factor: f64,
        origin: Coord<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryError> {
        ensure_usable(
            "scale",
            geometry.scale_around_point(factor, factor, origin),
        )
    }
}

/// Drops zero-area slivers and rejects empty or non-finite geometry.
///
/// # Errors
///
/// Returns [`GeometryError::NonFiniteResult`] if any coordinate is NaN or
/// infinite, or [`GeometryError::EmptyResult`] if no polygon with a
/// usable area remains.
pub fn ensure_usable(
    operation: &'static str,
    geometry: MultiPolygon<f64>,
) -> Result<MultiPolygon<f64>, GeometryError> {
    if geometry
        .coords_iter()
        .any(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        return Err(GeometryError::NonFiniteResult { operation });
    }

    let polygons: Vec<_> = geometry
        .0
        .into_iter()
        .filter(|polygon| polygon.unsigned_area() > MIN_USABLE_AREA)
        .collect();

    if polygons.is_empty() {
        return Err(GeometryError::EmptyResult { operation });
    }

    Ok(MultiPolygon(polygons))
}
