#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Site eligibility validation.
//!
//! Every check runs on every call. Failures are collected as blocking
//! issues or non-blocking warnings rather than returned as errors, since
//! a caller needs the complete list to act on.

pub mod accessory;
pub mod checks;
pub mod units;

pub use site_massing_eligibility_models::{
    AccessType, EligibilityRequirements, EligibilityStatus, ParkingRequirement, ValidationResult,
};

use site_massing_floodplain_models::FloodplainAssessment;
use site_massing_site_models::{SiteConfig, SiteMeasurements};
use site_massing_zoning::district_minimums;
use site_massing_zoning_models::ZoningRules;

/// Issues and warnings gathered by the checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

impl Findings {
    pub fn issue(&mut self, message: impl Into<String>) {
        self.issues.push(message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Everything a validation looks at.
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    pub measurements: &'a SiteMeasurements,
    pub requirements: &'a EligibilityRequirements,
    pub zoning: &'a ZoningRules,
    pub floodplain: Option<&'a FloodplainAssessment>,
    /// Final footprint area from a massing run, in square metres.
    pub buildable_area: Option<f64>,
    pub site: Option<&'a SiteConfig>,
}

impl<'a> ValidationInput<'a> {
    #[must_use]
    pub const fn new(
        measurements: &'a SiteMeasurements,
        requirements: &'a EligibilityRequirements,
        zoning: &'a ZoningRules,
    ) -> Self {
        Self {
            measurements,
            requirements,
            zoning,
            floodplain: None,
            buildable_area: None,
            site: None,
        }
    }

    #[must_use]
    pub const fn with_floodplain(mut self, floodplain: &'a FloodplainAssessment) -> Self {
        self.floodplain = Some(floodplain);
        self
    }

    #[must_use]
    pub const fn with_buildable_area(mut self, area: f64) -> Self {
        self.buildable_area = Some(area);
        self
    }

    #[must_use]
    pub const fn with_site(mut self, site: &'a SiteConfig) -> Self {
        self.site = Some(site);
        self
    }

    /// District name for messages.
    fn district(&self) -> &str {
        self.zoning.district.as_deref().unwrap_or("this district")
    }
}

/// Default requirements for a district: its minimums from the registry,
/// not heritage-designated, no floodplain flag, public access, and no
/// parking.
#[must_use]
pub fn requirements_for_district(code: &str) -> EligibilityRequirements {
    EligibilityRequirements {
        minimums: district_minimums(code),
        ..EligibilityRequirements::default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityValidator;

impl EligibilityValidator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Runs every check and builds the report.
    #[must_use]
    pub fn validate(&self, input: &ValidationInput<'_>) -> ValidationResult {
        let mut findings = Findings::default();

        checks::check_minimums(input, &mut findings);
        checks::check_heritage(input, &mut findings);
        checks::check_floodplain(input, &mut findings);
        checks::check_access(input, &mut findings);
        checks::check_zoning_capacity(input, &mut findings);
        checks::check_buildable_ratio(input, &mut findings);
        checks::check_parking(input, &mut findings);
        checks::check_narrow_lot(input, &mut findings);

        if let Some(site) = input.site {
            if let Some(units) = site.dwelling_units {
                units::check_unit_density(input, units, &mut findings);
            }
            if let Some(building) = &site.accessory_building {
                accessory::check_accessory_building(input, building, &mut findings);
            }
        }

        let result = ValidationResult::from_findings(findings.issues, findings.warnings);
        log::info!("Validated site in {}: {}", input.district(), result.summary);
        result
    }
}

/// Formats a measurement without trailing zeros (334.0 as "334", 30.4 as
/// "30.4").
pub(crate) fn metres(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    format!("{rounded}")
}
