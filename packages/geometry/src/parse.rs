//! Parses parcel and zone boundaries from `GeoJSON` and Esri ring JSON.
//!
//! `GeoJSON` input may be a bare geometry, a `Feature`, or a
//! `FeatureCollection`; the first polygonal feature wins. Esri geometry
//! (`{ "rings": [...] }`) is converted directly: clockwise rings start a
//! new polygon and counter-clockwise rings become holes of the polygon
//! before them.

use std::collections::BTreeMap;

use geo::{LineString, MultiPolygon, Polygon, Winding};
use geojson::GeoJson;
use site_massing_site_models::{CoordinateFrame, Parcel};

use crate::GeometryError;

/// A polygonal boundary together with its feature properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBoundary {
    /// Boundary polygons.
    pub boundary: MultiPolygon<f64>,
    /// Feature properties (empty for bare geometries).
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// Parses a parcel from `GeoJSON` or Esri JSON text.
///
/// # Errors
///
/// Returns [`GeometryError::Parse`] if the text is not JSON or not a
/// recognizable geometry document, and [`GeometryError::InvalidGeometry`]
/// if it holds no polygonal geometry.
pub fn parse_parcel(text: &str, frame: CoordinateFrame) -> Result<Parcel, GeometryError> {
    let parsed = parse_boundary(text)?;
    Ok(Parcel {
        boundary: parsed.boundary,
        frame,
        attributes: parsed.properties,
    })
}

/// Parses the first polygonal boundary in a document.
///
/// # Errors
///
/// See [`parse_parcel`].
pub fn parse_boundary(text: &str) -> Result<ParsedBoundary, GeometryError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| GeometryError::Parse {
            message: e.to_string(),
        })?;

    if let Some(boundary) = esri_rings_to_multipolygon(&value) {
        let properties = value
            .get("attributes")
            .and_then(serde_json::Value::as_object)
            .map(|attrs| attrs.clone().into_iter().collect())
            .unwrap_or_default();
        return Ok(ParsedBoundary {
            boundary,
            properties,
        });
    }

    let geojson = GeoJson::from_json_value(value).map_err(|e| GeometryError::Parse {
        message: e.to_string(),
    })?;

    parse_features(geojson)
        .into_iter()
        .next()
        .ok_or_else(|| GeometryError::invalid("document contains no polygon or multi-polygon"))
}

/// Parses every polygonal feature in a `GeoJSON` document, skipping
/// features without usable geometry.
///
/// # Errors
///
/// Returns [`GeometryError::Parse`] if the text is not valid `GeoJSON`.
pub fn parse_all_boundaries(text: &str) -> Result<Vec<ParsedBoundary>, GeometryError> {
    let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| GeometryError::Parse {
        message: e.to_string(),
    })?;
    Ok(parse_features(geojson))
}

fn parse_features(geojson: GeoJson) -> Vec<ParsedBoundary> {
    match geojson {
        GeoJson::Geometry(geometry) => geojson_to_multipolygon(geometry)
            .map(|boundary| ParsedBoundary {
                boundary,
                properties: BTreeMap::new(),
            })
            .into_iter()
            .collect(),
        GeoJson::Feature(feature) => feature_to_boundary(feature).into_iter().collect(),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .filter_map(feature_to_boundary)
            .collect(),
    }
}

fn feature_to_boundary(feature: geojson::Feature) -> Option<ParsedBoundary> {
    let boundary = geojson_to_multipolygon(feature.geometry?)?;
    let properties = feature
        .properties
        .map(|props| props.into_iter().collect())
        .unwrap_or_default();
    Some(ParsedBoundary {
        boundary,
        properties,
    })
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
#[must_use]
pub fn geojson_to_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Converts a [`MultiPolygon`] into a `GeoJSON` geometry.
#[must_use]
pub fn multipolygon_to_geojson(geometry: &MultiPolygon<f64>) -> geojson::Geometry {
    geojson::Geometry::new(geojson::Value::from(geometry))
}

/// Converts Esri JSON geometry (`{ "rings": [...] }`, optionally nested
/// under `"geometry"`) into a [`MultiPolygon`].
fn esri_rings_to_multipolygon(value: &serde_json::Value) -> Option<MultiPolygon<f64>> {
    let rings = value
        .get("rings")
        .or_else(|| value.get("geometry").and_then(|g| g.get("rings")))?
        .as_array()?;

    let mut polygons: Vec<Polygon<f64>> = Vec::new();

    for ring in rings {
        let coords: Vec<(f64, f64)> = ring
            .as_array()?
            .iter()
            .filter_map(|pt| {
                let pt = pt.as_array()?;
                Some((pt.first()?.as_f64()?, pt.get(1)?.as_f64()?))
            })
            .collect();
        if coords.len() < 3 {
            continue;
        }

        let mut line = LineString::from(coords);
        line.close();

        match polygons.last_mut() {
            Some(outer) if line.is_ccw() => outer.interiors_push(line),
            _ => polygons.push(Polygon::new(line, vec![])),
        }
    }

    if polygons.is_empty() {
        None
    } else {
        Some(MultiPolygon(polygons))
    }
}

#[cfg(test)]
mod tests {
    use geo::Area;

    use super::*;
    use crate::test_shapes::approx_eq;

    const SQUARE_GEOMETRY: &str = r#"{
        "type": "Polygon",
        "coordinates": [[[0, 0], [20, 0], [20, 20], [0, 20], [0, 0]]]
    }"#;

    #[test]
    fn parses_bare_geometry() {
        let parsed = parse_boundary(SQUARE_GEOMETRY).expect("polygon");
        assert!(approx_eq(parsed.boundary.unsigned_area(), 400.0, 1e-9));
        assert!(parsed.properties.is_empty());
    }

    #[test]
    fn parses_feature_properties_into_parcel_attributes() {
        let text = format!(
            r#"{{
                "type": "Feature",
                "properties": {{ "address": "987 E 25th Ave", "folio": "123" }},
                "geometry": {SQUARE_GEOMETRY}
            }}"#
        );
        let parcel = parse_parcel(&text, CoordinateFrame::Projected).expect("feature");
        assert_eq!(parcel.attribute_str("address"), Some("987 E 25th Ave"));
        assert_eq!(parcel.frame, CoordinateFrame::Projected);
    }

    #[test]
    fn takes_first_polygonal_feature_of_collection() {
        let text = format!(
            r#"{{
                "type": "FeatureCollection",
                "features": [
                    {{ "type": "Feature", "properties": {{}},
                       "geometry": {{ "type": "Point", "coordinates": [1, 2] }} }},
                    {{ "type": "Feature", "properties": {{ "name": "lot" }},
                       "geometry": {SQUARE_GEOMETRY} }}
                ]
            }}"#
        );
        let parsed = parse_boundary(&text).expect("second feature is polygonal");
        assert_eq!(
            parsed.properties.get("name"),
            Some(&serde_json::json!("lot"))
        );
    }

    #[test]
    fn non_polygonal_document_is_invalid_geometry() {
        let err = parse_boundary(r#"{ "type": "Point", "coordinates": [1, 2] }"#)
            .expect_err("points are not parcels");
        assert!(matches!(err, GeometryError::InvalidGeometry { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            parse_boundary("{ not json"),
            Err(GeometryError::Parse { .. })
        ));
    }

    #[test]
    fn esri_rings_with_hole() {
        // Clockwise outer ring, counter-clockwise hole.
        let text = r#"{
            "rings": [
                [[0, 0], [0, 10], [10, 10], [10, 0], [0, 0]],
                [[4, 4], [6, 4], [6, 6], [4, 6], [4, 4]]
            ],
            "attributes": { "FOLIO": "A1" }
        }"#;
        let parsed = parse_boundary(text).expect("esri rings");
        assert_eq!(parsed.boundary.0.len(), 1);
        assert_eq!(parsed.boundary.0[0].interiors().len(), 1);
        assert!(approx_eq(parsed.boundary.unsigned_area(), 96.0, 1e-9));
        assert_eq!(parsed.properties.get("FOLIO"), Some(&serde_json::json!("A1")));
    }

    #[test]
    fn esri_rings_with_two_outers() {
        let text = r#"{ "geometry": { "rings": [
            [[0, 0], [0, 1], [1, 1], [1, 0], [0, 0]],
            [[5, 5], [5, 6], [6, 6], [6, 5], [5, 5]]
        ] } }"#;
        let parsed = parse_boundary(text).expect("esri rings");
        assert_eq!(parsed.boundary.0.len(), 2);
    }

    #[test]
    fn round_trips_through_geojson_geometry() {
        let parsed = parse_boundary(SQUARE_GEOMETRY).expect("polygon");
        let geometry = multipolygon_to_geojson(&parsed.boundary);
        assert_eq!(geojson_to_multipolygon(geometry), Some(parsed.boundary));
    }
}
