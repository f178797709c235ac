//! Compile-time registry of zoning district rule records.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a new district requires creating a TOML file in `districts/` and
//! adding a corresponding entry here.

use site_massing_zoning_models::ZoningRecord;

/// Number of registered districts. Updated when new districts are added.
/// Enforced by a test.
#[cfg(test)]
const EXPECTED_DISTRICT_COUNT: usize = 4;

/// Embedded TOML district definitions.
const DISTRICT_TOMLS: &[(&str, &str)] = &[
    ("r1_1", include_str!("../districts/r1_1.toml")),
    ("rt_7", include_str!("../districts/rt_7.toml")),
    ("rt_9", include_str!("../districts/rt_9.toml")),
    ("rt_11", include_str!("../districts/rt_11.toml")),
];

/// Returns all registered district records.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught during CI.
#[must_use]
pub fn all_districts() -> Vec<ZoningRecord> {
    DISTRICT_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse zoning district '{name}': {e}"))
        })
        .collect()
}

/// Looks up a district record by code, ignoring ASCII case and
/// surrounding whitespace.
#[must_use]
pub fn find_district(code: &str) -> Option<ZoningRecord> {
    let code = code.trim();
    all_districts().into_iter().find(|record| {
        record
            .district
            .as_deref()
            .is_some_and(|id| id.eq_ignore_ascii_case(code))
    })
}

/// Returns the codes of all registered districts, in registry order.
#[must_use]
pub fn district_codes() -> Vec<String> {
    all_districts()
        .into_iter()
        .filter_map(|record| record.district)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_districts() {
        let districts = all_districts();
        assert_eq!(
            districts.len(),
            EXPECTED_DISTRICT_COUNT,
            "Expected {EXPECTED_DISTRICT_COUNT} zoning districts, found {}. \
             Update EXPECTED_DISTRICT_COUNT after adding/removing districts.",
            districts.len()
        );
    }

    #[test]
    fn district_codes_are_unique() {
        let mut seen = BTreeSet::new();
        for code in district_codes() {
            assert!(seen.insert(code.clone()), "Duplicate district code: {code}");
        }
        assert_eq!(seen.len(), EXPECTED_DISTRICT_COUNT);
    }

    #[test]
    fn all_districts_have_required_fields() {
        for record in &all_districts() {
            let code = record.district.as_deref().unwrap_or_default();
            assert!(!code.is_empty(), "District has empty id");
            assert!(
                record.name.as_deref().is_some_and(|n| !n.is_empty()),
                "District {code} has empty name"
            );
            assert!(
                record.max_height.is_some_and(|h| h > 0.0),
                "District {code} has no positive max_height"
            );
            assert!(
                record.setbacks.front.is_some()
                    && record.setbacks.side.is_some()
                    && record.setbacks.rear.is_some(),
                "District {code} is missing a directional setback"
            );
            assert!(
                record.eligibility.min_area.is_some(),
                "District {code} has no minimum lot area"
            );
        }
    }

    #[test]
    fn finds_district_case_insensitively() {
        let record = find_district(" r1-1 ").expect("R1-1 should be registered");
        assert_eq!(record.district.as_deref(), Some("R1-1"));
        assert!(find_district("CD-1").is_none());
    }
}
