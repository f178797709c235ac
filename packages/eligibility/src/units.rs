//! Dwelling-unit density checks.

use crate::{Findings, ValidationInput, metres};

/// Most dwelling units allowed on one lot.
pub const MAX_UNITS: u32 = 8;
/// Smallest allowed unit floor area in square metres.
pub const MIN_UNIT_AREA: f64 = 35.0;

/// Minimum lot area (m²) for a unit count, or `None` above [`MAX_UNITS`].
#[must_use]
pub const fn min_lot_area_for_units(units: u32) -> Option<f64> {
    match units {
        0..=2 => Some(0.0),
        3..=4 => Some(306.0),
        5 => Some(464.0),
        6..=MAX_UNITS => Some(557.0),
        _ => None,
    }
}

pub fn check_unit_density(input: &ValidationInput<'_>, units: u32, findings: &mut Findings) {
    let area = input.measurements.area;

    match min_lot_area_for_units(units) {
        Some(min_area) if area < min_area => findings.issue(format!(
            "Lot area of {} m² is below the {} m² minimum for {units} units",
            metres(area),
            metres(min_area),
        )),
        Some(_) => {}
        None => findings.issue(format!(
            "{units} units exceeds the maximum of {MAX_UNITS} units per lot"
        )),
    }

    let required = f64::from(units) * MIN_UNIT_AREA;
    let available = input.zoning.max_coverage * area;
    if required > available {
        findings.issue(format!(
            "{units} units need {} m² of floor area at {} m² each; coverage allows {} m²",
            metres(required),
            metres(MIN_UNIT_AREA),
            metres(available),
        ));
    }
}
