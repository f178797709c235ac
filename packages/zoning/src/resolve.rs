//! Ordered configuration merge from raw zoning records to resolved rules.
//!
//! Layers are consulted in the order given; for each field the first
//! layer holding a usable value wins, and the documented default applies
//! when none does. Callers conventionally pass, highest precedence first:
//!
//! 1. caller-supplied overrides,
//! 2. the district's registry record.
//!
//! The default table in [`site_massing_zoning_models::defaults`] is the
//! implicit last layer.

use site_massing_zoning_models::{
    CourtyardRules, DistrictMinimums, Setbacks, ZoningRecord, ZoningRules, defaults,
};

use crate::{ZoningError, registry};

/// Resolves a complete rule set from layered records.
///
/// Non-finite or negative values are skipped so the next layer applies;
/// `floor_height` and the building caps must also be strictly positive.
#[must_use]
pub fn resolve_rules(layers: &[&ZoningRecord]) -> ZoningRules {
    let district = layers.iter().find_map(|l| l.district.clone());

    let setbacks = Setbacks {
        front: pick(layers, "setbacks.front", |l| l.setbacks.front, non_negative)
            .unwrap_or(defaults::FRONT_SETBACK),
        side: pick(layers, "setbacks.side", |l| l.setbacks.side, non_negative)
            .unwrap_or(defaults::SIDE_SETBACK),
        rear: pick(layers, "setbacks.rear", |l| l.setbacks.rear, non_negative)
            .unwrap_or(defaults::REAR_SETBACK),
        corner: pick(layers, "setbacks.corner", |l| l.setbacks.corner, non_negative)
            .unwrap_or(defaults::CORNER_SETBACK),
    };

    let courtyard = CourtyardRules {
        enabled: layers
            .iter()
            .find_map(|l| l.courtyard.enabled)
            .unwrap_or(defaults::COURTYARD_ENABLED),
        min_depth: pick(
            layers,
            "courtyard.min_depth",
            |l| l.courtyard.min_depth,
            non_negative,
        )
        .unwrap_or(defaults::COURTYARD_MIN_DEPTH),
        width: pick(layers, "courtyard.width", |l| l.courtyard.width, positive)
            .unwrap_or(defaults::COURTYARD_WIDTH),
        position: layers
            .iter()
            .find_map(|l| l.courtyard.position)
            .unwrap_or(defaults::COURTYARD_POSITION),
        max_area_ratio: pick(
            layers,
            "courtyard.max_area_ratio",
            |l| l.courtyard.max_area_ratio,
            non_negative,
        )
        .unwrap_or(defaults::COURTYARD_MAX_AREA_RATIO),
    };

    ZoningRules {
        district,
        setbacks,
        max_height: pick(layers, "max_height", |l| l.max_height, non_negative)
            .unwrap_or(defaults::MAX_HEIGHT),
        floor_height: pick(layers, "floor_height", |l| l.floor_height, positive)
            .unwrap_or(defaults::FLOOR_HEIGHT),
        floor_area_ratio: pick(
            layers,
            "floor_area_ratio",
            |l| l.floor_area_ratio,
            non_negative,
        )
        .unwrap_or(defaults::FLOOR_AREA_RATIO),
        max_coverage: pick(layers, "max_coverage", |l| l.max_coverage, non_negative)
            .unwrap_or(defaults::MAX_COVERAGE),
        max_building_width: pick(
            layers,
            "max_building_width",
            |l| l.max_building_width,
            positive,
        ),
        max_building_depth: pick(
            layers,
            "max_building_depth",
            |l| l.max_building_depth,
            positive,
        ),
        courtyard,
        sunken_patio_max_projection: pick(
            layers,
            "sunken_patio_max_projection",
            |l| l.sunken_patio_max_projection,
            non_negative,
        )
        .unwrap_or(defaults::SUNKEN_PATIO_MAX_PROJECTION),
        sunken_patio_max_width: pick(
            layers,
            "sunken_patio_max_width",
            |l| l.sunken_patio_max_width,
            non_negative,
        )
        .unwrap_or(defaults::SUNKEN_PATIO_MAX_WIDTH),
        max_stairs_projection: pick(
            layers,
            "max_stairs_projection",
            |l| l.max_stairs_projection,
            non_negative,
        )
        .unwrap_or(defaults::MAX_STAIRS_PROJECTION),
    }
}

/// Resolves the rules for a registered district, with optional caller
/// overrides taking precedence over the district record.
///
/// # Errors
///
/// Returns [`ZoningError::InsufficientData`] if the district is not
/// registered and no overrides were supplied.
pub fn resolve_district(
    code: &str,
    overrides: Option<&ZoningRecord>,
) -> Result<ZoningRules, ZoningError> {
    let record = registry::find_district(code);

    let mut rules = match (overrides, record.as_ref()) {
        (None, None) => {
            return Err(ZoningError::InsufficientData {
                message: format!("no zoning record for district '{}'", code.trim()),
            });
        }
        (Some(overrides), None) => {
            log::warn!(
                "District '{}' is not registered; resolving from overrides and defaults",
                code.trim()
            );
            resolve_rules(&[overrides])
        }
        (None, Some(record)) => resolve_rules(&[record]),
        (Some(overrides), Some(record)) => resolve_rules(&[overrides, record]),
    };

    if rules.district.is_none() {
        rules.district = Some(code.trim().to_string());
    }

    Ok(rules)
}

/// Looks up the eligibility minimums for a district.
///
/// Unknown districts, and districts missing a value, fall back to the
/// generic defaults (frontage 10 m, area 306 m², depth 30.4 m).
#[must_use]
pub fn district_minimums(code: &str) -> DistrictMinimums {
    let generic = DistrictMinimums::default();

    let Some(record) = registry::find_district(code) else {
        log::debug!(
            "No eligibility minimums registered for district '{}', using generic defaults",
            code.trim()
        );
        return generic;
    };

    let eligibility = record.eligibility;
    DistrictMinimums {
        min_frontage: eligibility
            .min_frontage
            .filter(|v| non_negative(*v))
            .unwrap_or(generic.min_frontage),
        min_area: eligibility
            .min_area
            .filter(|v| non_negative(*v))
            .unwrap_or(generic.min_area),
        min_depth: eligibility
            .min_depth
            .filter(|v| non_negative(*v))
            .unwrap_or(generic.min_depth),
    }
}

/// Returns the first layer's value for a field that passes `accept`.
fn pick(
    layers: &[&ZoningRecord],
    field: &str,
    get: impl Fn(&ZoningRecord) -> Option<f64>,
    accept: fn(f64) -> bool,
) -> Option<f64> {
    for layer in layers {
        match get(layer) {
            Some(value) if accept(value) => return Some(value),
            Some(value) => {
                log::warn!("Ignoring unusable zoning value {field}={value}; trying next layer");
            }
            None => {}
        }
    }
    None
}

const fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

const fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use site_massing_zoning_models::{CourtyardPosition, SetbackRecord};

    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_layers_resolve_to_default_table() {
        let rules = resolve_rules(&[]);
        assert_eq!(rules, ZoningRules::default());
        assert!(approx_eq(rules.max_height, 10.5));
        assert!(approx_eq(rules.setbacks.front, 6.0));
        assert!(approx_eq(rules.setbacks.side, 1.5));
        assert!(approx_eq(rules.setbacks.rear, 7.5));
        assert!(approx_eq(rules.floor_height, 3.0));
    }

    #[test]
    fn earlier_layers_take_precedence() {
        let overrides = ZoningRecord {
            max_height: Some(9.0),
            setbacks: SetbackRecord {
                front: Some(3.0),
                ..SetbackRecord::default()
            },
            ..ZoningRecord::default()
        };
        let district = ZoningRecord {
            district: Some("RT-7".to_string()),
            max_height: Some(10.7),
            floor_area_ratio: Some(0.75),
            setbacks: SetbackRecord {
                front: Some(6.1),
                rear: Some(10.7),
                ..SetbackRecord::default()
            },
            ..ZoningRecord::default()
        };

        let rules = resolve_rules(&[&overrides, &district]);

        assert_eq!(rules.district.as_deref(), Some("RT-7"));
        assert!(approx_eq(rules.max_height, 9.0));
        assert!(approx_eq(rules.floor_area_ratio, 0.75));
        assert!(approx_eq(rules.setbacks.front, 3.0));
        assert!(approx_eq(rules.setbacks.rear, 10.7));
        assert!(approx_eq(rules.setbacks.side, defaults::SIDE_SETBACK));
    }

    #[test]
    fn unusable_values_fall_through_to_next_layer() {
        let overrides = ZoningRecord {
            floor_height: Some(0.0),
            max_height: Some(f64::NAN),
            setbacks: SetbackRecord {
                side: Some(-2.0),
                ..SetbackRecord::default()
            },
            ..ZoningRecord::default()
        };
        let district = ZoningRecord {
            max_height: Some(11.5),
            ..ZoningRecord::default()
        };

        let rules = resolve_rules(&[&overrides, &district]);

        assert!(approx_eq(rules.floor_height, defaults::FLOOR_HEIGHT));
        assert!(approx_eq(rules.max_height, 11.5));
        assert!(approx_eq(rules.setbacks.side, defaults::SIDE_SETBACK));
    }

    #[test]
    fn building_caps_default_to_uncapped() {
        let rules = resolve_rules(&[]);
        assert_eq!(rules.max_building_width, None);
        assert_eq!(rules.max_building_depth, None);
    }

    #[test]
    fn resolves_registered_district() {
        let rules = resolve_district("R1-1", None).expect("R1-1 is registered");
        assert_eq!(rules.district.as_deref(), Some("R1-1"));
        assert!(approx_eq(rules.max_height, 11.5));
        assert!(approx_eq(rules.setbacks.front, 4.9));
        assert!(approx_eq(rules.setbacks.rear, 10.7));
        assert!(rules.courtyard.enabled);
        assert_eq!(rules.courtyard.position, CourtyardPosition::Center);
    }

    #[test]
    fn unknown_district_without_overrides_is_insufficient_data() {
        let err = resolve_district("CD-1", None).expect_err("CD-1 is not registered");
        assert!(matches!(err, ZoningError::InsufficientData { .. }));
    }

    #[test]
    fn unknown_district_with_overrides_uses_defaults_beneath() {
        let overrides = ZoningRecord {
            max_height: Some(12.0),
            ..ZoningRecord::default()
        };
        let rules = resolve_district("CD-1", Some(&overrides)).expect("overrides suffice");
        assert_eq!(rules.district.as_deref(), Some("CD-1"));
        assert!(approx_eq(rules.max_height, 12.0));
        assert!(approx_eq(rules.setbacks.front, defaults::FRONT_SETBACK));
    }

    #[test]
    fn district_minimums_use_table_then_generic_defaults() {
        let r1 = district_minimums("R1-1");
        assert!(approx_eq(r1.min_area, 334.0));
        assert!(approx_eq(r1.min_frontage, 10.0));

        let unknown = district_minimums("ZZ-9");
        assert!(approx_eq(unknown.min_frontage, 10.0));
        assert!(approx_eq(unknown.min_area, 306.0));
        assert!(approx_eq(unknown.min_depth, 30.4));
    }
}
