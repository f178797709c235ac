//! Edge and shape analysis of a planar parcel ring, including
//! conservative corner-lot detection.

use geo::{Line, LineString, MultiPolygon};
use site_massing_site_models::LotType;

/// Minimum length (m) of each of the two street frontages of a corner lot.
const CORNER_MIN_FRONTAGE: f64 = 25.0;
/// Shorter frontage must be at least this fraction of the longer one.
const CORNER_MIN_EDGE_RATIO: f64 = 0.85;
/// Corner angles inside this range (degrees) count as right angles.
const RIGHT_ANGLE_RANGE: std::ops::RangeInclusive<f64> = 85.0..=95.0;
const CORNER_MIN_RIGHT_ANGLES: usize = 2;
const CORNER_MIN_REGULARITY: f64 = 0.9;
const CORNER_MAX_ASPECT_RATIO: f64 = 1.5;

fn edges(ring: &LineString<f64>) -> impl Iterator<Item = Line<f64>> + '_ {
    ring.lines().filter(|line| line.dx() != 0.0 || line.dy() != 0.0)
}

fn length(line: &Line<f64>) -> f64 {
    line.dx().hypot(line.dy())
}

/// Lengths of the non-degenerate edges of a ring, in ring order.
#[must_use]
pub fn edge_lengths(ring: &LineString<f64>) -> Vec<f64> {
    edges(ring).map(|line| length(&line)).collect()
}

/// Angle in degrees between each edge and the next (wrapping around),
/// folded into `0..=90` so that parallel edges read 0 and perpendicular
/// edges read 90.
#[must_use]
pub fn corner_angles(ring: &LineString<f64>) -> Vec<f64> {
    let edges: Vec<Line<f64>> = edges(ring).collect();
    let count = edges.len();

    (0..count)
        .map(|i| {
            let a = edges[i];
            let b = edges[(i + 1) % count];
            let dot = a.dx().mul_add(b.dx(), a.dy() * b.dy());
            let cos = (dot / (length(&a) * length(&b))).clamp(-1.0, 1.0);
            let degrees = cos.acos().to_degrees();
            degrees.min(180.0 - degrees)
        })
        .collect()
}

/// How rectangular a ring is, from 0 to 1.
///
/// Quadrilaterals score the mean similarity of their two pairs of
/// sorted edge lengths; any other shape scores 0.5.
#[must_use]
pub fn shape_regularity(lengths: &[f64]) -> f64 {
    let [a, b, c, d] = lengths else {
        return 0.5;
    };

    let mut sorted = [*a, *b, *c, *d];
    sorted.sort_by(f64::total_cmp);

    let similarity = |x: f64, y: f64| {
        let larger = x.max(y);
        if larger > 0.0 {
            1.0 - (x - y).abs() / larger
        } else {
            0.0
        }
    };

    let regularity = f64::midpoint(
        similarity(sorted[0], sorted[1]),
        similarity(sorted[2], sorted[3]),
    );
    regularity.clamp(0.0, 1.0)
}

/// Detects corner lots from the outer ring of the largest polygon.
///
/// Detection is strict: a lot is only reported as
/// [`LotType::Corner`] when it is a near-square quadrilateral with two
/// long, similar frontages meeting at right angles. Callers that know
/// better pass an explicit lot type instead.
#[must_use]
pub fn detect_lot_type(boundary: &MultiPolygon<f64>) -> LotType {
    let Some(ring) = boundary
        .0
        .iter()
        .map(geo::Polygon::exterior)
        .max_by(|a, b| ring_extent(a).total_cmp(&ring_extent(b)))
    else {
        return LotType::Standard;
    };

    let lengths = edge_lengths(ring);
    let &[e0, e1, e2, e3] = lengths.as_slice() else {
        return LotType::Standard;
    };

    // Opposite edges of a quadrilateral give its width and depth, which
    // are the two frontages that meet at a corner.
    let width = e0.max(e2);
    let depth = e1.max(e3);
    let (longest, second) = (width.max(depth), width.min(depth));

    if longest < CORNER_MIN_FRONTAGE || second < CORNER_MIN_FRONTAGE {
        return LotType::Standard;
    }
    if second / longest < CORNER_MIN_EDGE_RATIO {
        return LotType::Standard;
    }

    let right_angles = corner_angles(ring)
        .into_iter()
        .filter(|angle| RIGHT_ANGLE_RANGE.contains(angle))
        .count();
    if right_angles < CORNER_MIN_RIGHT_ANGLES {
        return LotType::Standard;
    }

    if shape_regularity(&lengths) < CORNER_MIN_REGULARITY {
        return LotType::Standard;
    }
    if longest / second > CORNER_MAX_ASPECT_RATIO {
        return LotType::Standard;
    }

    log::debug!("Detected corner lot: frontages {longest:.1} m and {second:.1} m");
    LotType::Corner
}

fn ring_extent(ring: &LineString<f64>) -> f64 {
    edge_lengths(ring).iter().sum()
}
