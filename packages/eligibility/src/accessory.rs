//! Coach house and garage eligibility.

use site_massing_site_models::{AccessoryBuilding, AccessoryKind, AccessoryPosition};

use crate::{Findings, ValidationInput, metres};

/// Floor area attributed to the principal building when estimating FAR.
const PRINCIPAL_FAR: f64 = 0.5;

/// Fixed siting parameters for an accessory building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessoryProfile {
    pub min_lot_area: f64,
    pub min_lot_depth: f64,
    /// Separation from the principal building when placed at the rear.
    pub rear_separation: f64,
    /// Separation when placed beside the principal building.
    pub side_separation: f64,
    pub depth: f64,
    /// Estimated floor area in square metres.
    pub floor_area: f64,
}

impl AccessoryProfile {
    #[must_use]
    pub const fn for_kind(kind: AccessoryKind) -> Self {
        match kind {
            AccessoryKind::CoachHouse => Self {
                min_lot_area: 400.0,
                min_lot_depth: 35.0,
                rear_separation: 6.1,
                side_separation: 2.4,
                depth: 8.5,
                floor_area: 80.0,
            },
            AccessoryKind::Garage => Self {
                min_lot_area: 300.0,
                min_lot_depth: 25.0,
                rear_separation: 3.0,
                side_separation: 1.2,
                depth: 6.0,
                floor_area: 40.0,
            },
        }
    }

    #[must_use]
    pub const fn separation(&self, position: AccessoryPosition) -> f64 {
        match position {
            AccessoryPosition::Rear => self.rear_separation,
            AccessoryPosition::Side => self.side_separation,
        }
    }
}

pub fn check_accessory_building(
    input: &ValidationInput<'_>,
    building: &AccessoryBuilding,
    findings: &mut Findings,
) {
    let profile = AccessoryProfile::for_kind(building.kind);
    let kind = building.kind.as_ref().replace('_', " ");
    let m = input.measurements;

    if m.area < profile.min_lot_area {
        findings.issue(format!(
            "Lot area of {} m² is below the {} m² minimum for a {kind}",
            metres(m.area),
            metres(profile.min_lot_area),
        ));
    }

    if m.depth < profile.min_lot_depth {
        findings.issue(format!(
            "Lot depth of {} m is below the {} m minimum for a {kind}",
            metres(m.depth),
            metres(profile.min_lot_depth),
        ));
    }

    let setbacks = &input.zoning.setbacks;
    let buildable_depth = m.depth - setbacks.front - setbacks.rear;
    let needed = profile.separation(building.position) + profile.depth;
    if buildable_depth < needed {
        findings.issue(format!(
            "A {} {kind} needs {} m of depth between setbacks; {} m is available",
            building.position,
            metres(needed),
            metres(buildable_depth),
        ));
    }

    if m.area > 0.0 {
        let far = PRINCIPAL_FAR + profile.floor_area / m.area;
        if far > input.zoning.floor_area_ratio {
            findings.warn(format!(
                "Estimated FAR with a {kind} is {far:.2}, above the {} limit",
                input.zoning.floor_area_ratio
            ));
        }
    }
}
