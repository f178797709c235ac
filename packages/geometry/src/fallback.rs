//! Ordered candidate evaluation for geometric fallback chains.
//!
//! A chain is a list of `(stage, result)` candidates, best first, plus a
//! last-resort geometry that always succeeds. The first candidate whose
//! result is usable wins; failures are logged and skipped.

use std::fmt::Display;

use geo::MultiPolygon;

use crate::GeometryError;

/// Returns the first usable candidate, or `last_resort` when every
/// candidate failed.
pub fn first_usable<S, I>(candidates: I, last_resort: (S, MultiPolygon<f64>)) -> (S, MultiPolygon<f64>)
where
    S: Display,
    I: IntoIterator<Item = (S, Result<MultiPolygon<f64>, GeometryError>)>,
{
    for (stage, result) in candidates {
        match result {
            Ok(geometry) => return (stage, geometry),
            Err(e) => log::debug!("Skipping {stage} candidate: {e}"),
        }
    }

    let (stage, geometry) = last_resort;
    log::warn!("All candidates failed, falling back to {stage}");
    (stage, geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_shapes::rect_mp;

    #[test]
    fn first_success_wins() {
        let (stage, geometry) = first_usable(
            [
                ("a", Err(GeometryError::EmptyResult { operation: "x" })),
                ("b", Ok(rect_mp(0.0, 0.0, 1.0, 1.0))),
                ("c", Ok(rect_mp(0.0, 0.0, 2.0, 2.0))),
            ],
            ("last", rect_mp(0.0, 0.0, 3.0, 3.0)),
        );
        assert_eq!(stage, "b");
        assert_eq!(geometry, rect_mp(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn last_resort_when_all_fail() {
        let (stage, geometry) = first_usable(
            [("a", Err(GeometryError::MissingCentroid))],
            ("last", rect_mp(0.0, 0.0, 3.0, 3.0)),
        );
        assert_eq!(stage, "last");
        assert_eq!(geometry, rect_mp(0.0, 0.0, 3.0, 3.0));
    }
}
