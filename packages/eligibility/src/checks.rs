//! General eligibility checks.

use site_massing_eligibility_models::AccessType;
use site_massing_floodplain_models::RiskLevel;

use crate::{Findings, ValidationInput, metres};

/// Frontage below which a lot is flagged as narrow.
pub const NARROW_LOT_FRONTAGE: f64 = 15.0;
/// Buildable-to-lot area ratio below which a warning is raised.
pub const MIN_BUILDABLE_RATIO: f64 = 0.5;
/// Width of one parking stall in metres.
pub const STALL_WIDTH: f64 = 2.7;
/// Depth of one parking stall in metres.
pub const STALL_DEPTH: f64 = 5.5;

/// Frontage, area, and depth against the district minimums.
pub fn check_minimums(input: &ValidationInput<'_>, findings: &mut Findings) {
    let m = input.measurements;
    let min = &input.requirements.minimums;
    let district = input.district();

    if m.frontage < min.min_frontage {
        findings.issue(format!(
            "Lot frontage of {} m is below the {} m minimum for {district}",
            metres(m.frontage),
            metres(min.min_frontage),
        ));
    }
    if m.area < min.min_area {
        findings.issue(format!(
            "Lot area of {} m² is below the {} m² minimum for {district}",
            metres(m.area),
            metres(min.min_area),
        ));
    }
    if m.depth < min.min_depth {
        findings.issue(format!(
            "Lot depth of {} m is below the {} m minimum for {district}",
            metres(m.depth),
            metres(min.min_depth),
        ));
    }
}

pub fn check_heritage(input: &ValidationInput<'_>, findings: &mut Findings) {
    if input.requirements.heritage_designated {
        findings.issue("Site is heritage designated; redevelopment requires heritage review");
    }
}

/// Floodplain tier from an assessment, or a note that the tier is
/// unknown when the site is flagged but no assessment was run.
pub fn check_floodplain(input: &ValidationInput<'_>, findings: &mut Findings) {
    match input.floodplain {
        Some(assessment) => match assessment.risk_level {
            RiskLevel::High => findings.issue(format!(
                "Site is in a high-risk floodplain: {}",
                assessment.message
            )),
            RiskLevel::Medium | RiskLevel::Low => findings.warn(format!(
                "Site is in a {}-risk floodplain; flood construction levels may apply",
                assessment.risk_level
            )),
            RiskLevel::None => {}
        },
        None if input.requirements.in_floodplain => {
            findings.warn("Site is flagged as floodplain but its risk tier is unknown");
        }
        None => {}
    }
}

pub fn check_access(input: &ValidationInput<'_>, findings: &mut Findings) {
    let access = input.requirements.access_type;
    if access != AccessType::Public {
        findings.issue(format!(
            "Site access is '{access}'; public street access is required"
        ));
    }
}

/// FAR, height, and coverage must all allow some building.
pub fn check_zoning_capacity(input: &ValidationInput<'_>, findings: &mut Findings) {
    let zoning = input.zoning;
    let district = input.district();

    if zoning.floor_area_ratio <= 0.0 {
        findings.issue(format!("{district} permits no floor area (FAR {})", zoning.floor_area_ratio));
    }
    if zoning.max_height <= 0.0 {
        findings.issue(format!("{district} permits no building height"));
    }
    if zoning.max_coverage <= 0.0 {
        findings.issue(format!("{district} permits no site coverage"));
    }
}

pub fn check_buildable_ratio(input: &ValidationInput<'_>, findings: &mut Findings) {
    let Some(buildable) = input.buildable_area else {
        return;
    };
    let lot = input.measurements.area;
    if lot <= 0.0 {
        return;
    }

    let ratio = buildable / lot;
    if ratio < MIN_BUILDABLE_RATIO {
        findings.warn(format!(
            "Buildable area of {} m² is only {:.0}% of the lot area",
            metres(buildable),
            ratio * 100.0
        ));
    }
}

/// Parking sits in the rear yard: the frontage has to fit the stalls side
/// by side and the rear setback has to fit a stall's depth.
pub fn check_parking(input: &ValidationInput<'_>, findings: &mut Findings) {
    let spaces = input.requirements.parking.required_spaces;
    if spaces == 0 {
        return;
    }

    let needed_width = f64::from(spaces) * STALL_WIDTH;
    if input.measurements.frontage < needed_width {
        findings.warn(format!(
            "{spaces} parking space{} need {} m of frontage; the lot has {} m",
            if spaces == 1 { "" } else { "s" },
            metres(needed_width),
            metres(input.measurements.frontage),
        ));
    }

    let rear = input.zoning.setbacks.rear;
    if rear < STALL_DEPTH {
        findings.warn(format!(
            "Rear setback of {} m is shallower than a {} m parking stall",
            metres(rear),
            metres(STALL_DEPTH),
        ));
    }
}

pub fn check_narrow_lot(input: &ValidationInput<'_>, findings: &mut Findings) {
    if input.measurements.frontage < NARROW_LOT_FRONTAGE {
        findings.warn(format!(
            "Lot is narrow ({} m frontage); building width will be limited",
            metres(input.measurements.frontage)
        ));
    }
}
