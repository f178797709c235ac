//! Local metric projection for geographic parcel boundaries.
//!
//! Parcels arrive as longitude/latitude degrees. Areas, setbacks, and
//! caps are all in metres, so geographic boundaries are projected into
//! an equirectangular tangent plane centred on the parcel before any
//! computation, and results are projected back on the way out. At parcel
//! scale the distortion of this projection is negligible.

use geo::{Centroid, Coord, CoordsIter, MapCoords, MultiPolygon};
use site_massing_site_models::{CoordinateFrame, Parcel};

use crate::GeometryError;

/// Mean Earth radius in metres (IUGG).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Equirectangular projection about a fixed origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjection {
    origin: Coord<f64>,
    metres_per_degree_x: f64,
    metres_per_degree_y: f64,
}

impl LocalProjection {
    /// Creates a projection centred on `origin` (longitude, latitude).
    #[must_use]
    pub fn new(origin: Coord<f64>) -> Self {
        let metres_per_degree_y = EARTH_RADIUS_M.to_radians();
        Self {
            origin,
            metres_per_degree_x: metres_per_degree_y * origin.y.to_radians().cos(),
            metres_per_degree_y,
        }
    }

    /// Creates a projection centred on the centroid of `geometry`.
    #[must_use]
    pub fn centered_on(geometry: &MultiPolygon<f64>) -> Option<Self> {
        geometry.centroid().map(|point| Self::new(point.0))
    }

    /// Projects degrees to metres.
    #[must_use]
    pub fn forward(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        geometry.map_coords(|c| Coord {
            x: (c.x - self.origin.x) * self.metres_per_degree_x,
            y: (c.y - self.origin.y) * self.metres_per_degree_y,
        })
    }

    /// Projects metres back to degrees.
    #[must_use]
    pub fn inverse(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        geometry.map_coords(|c| Coord {
            x: c.x / self.metres_per_degree_x + self.origin.x,
            y: c.y / self.metres_per_degree_y + self.origin.y,
        })
    }
}

/// A validated parcel boundary in planar metres, with the projection
/// needed to return results to the parcel's own frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarBoundary {
    /// Boundary in metres.
    pub boundary: MultiPolygon<f64>,
    /// Projection used, or `None` if the parcel was already planar.
    pub projection: Option<LocalProjection>,
}

impl PlanarBoundary {
    /// Validates a parcel and brings its boundary into planar metres.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidGeometry`] if the boundary is empty,
    /// has a ring with fewer than 3 distinct vertices, has non-finite
    /// coordinates, or (for geographic parcels) lies outside valid
    /// longitude/latitude ranges.
    pub fn from_parcel(parcel: &Parcel) -> Result<Self, GeometryError> {
        validate_boundary(&parcel.boundary)?;

        match parcel.frame {
            CoordinateFrame::Projected => Ok(Self {
                boundary: parcel.boundary.clone(),
                projection: None,
            }),
            CoordinateFrame::Geographic => {
                if parcel
                    .boundary
                    .coords_iter()
                    .any(|c| c.x.abs() > 180.0 || c.y.abs() > 90.0)
                {
                    return Err(GeometryError::invalid(
                        "geographic boundary has coordinates outside longitude/latitude range",
                    ));
                }
                let projection = LocalProjection::centered_on(&parcel.boundary)
                    .ok_or_else(|| GeometryError::invalid("boundary has no centroid"))?;
                Ok(Self {
                    boundary: projection.forward(&parcel.boundary),
                    projection: Some(projection),
                })
            }
        }
    }

    /// Projects another geometry given in the parcel's frame into this
    /// boundary's planar frame.
    #[must_use]
    pub fn to_planar(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        self.projection
            .as_ref()
            .map_or_else(|| geometry.clone(), |p| p.forward(geometry))
    }

    /// Returns a planar geometry to the parcel's frame.
    #[must_use]
    pub fn to_parcel_frame(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        self.projection
            .as_ref()
            .map_or_else(|| geometry.clone(), |p| p.inverse(geometry))
    }
}

/// Checks that a boundary is a usable polygonal input.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidGeometry`] if the boundary has no
/// polygons, any exterior ring has fewer than 3 distinct vertices, or any
/// coordinate is non-finite.
pub fn validate_boundary(boundary: &MultiPolygon<f64>) -> Result<(), GeometryError> {
    if boundary.0.is_empty() {
        return Err(GeometryError::invalid("boundary has no polygon rings"));
    }

    if boundary
        .coords_iter()
        .any(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        return Err(GeometryError::invalid(
            "boundary has non-finite coordinates",
        ));
    }

    for (index, polygon) in boundary.0.iter().enumerate() {
        let mut vertices: Vec<(u64, u64)> = polygon
            .exterior()
            .0
            .iter()
            .map(|c| (c.x.to_bits(), c.y.to_bits()))
            .collect();
        vertices.sort_unstable();
        vertices.dedup();

        if vertices.len() < 3 {
            return Err(GeometryError::invalid(format!(
                "ring {index} has {} distinct vertices; at least 3 are required",
                vertices.len()
            )));
        }
    }

    Ok(())
}
