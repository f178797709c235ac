#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Eligibility requirements and validation report types.

use serde::{Deserialize, Serialize};
use site_massing_zoning_models::DistrictMinimums;
use strum_macros::{AsRefStr, Display, EnumString};

/// How the site is reached from the street network.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccessType {
    /// Frontage on a public street.
    #[default]
    Public,
    /// Access from a rear lane only.
    Lane,
    /// Access over a private road or easement.
    Private,
    /// No legal access.
    None,
}

/// Off-street parking the development has to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingRequirement {
    pub required_spaces: u32,
}

/// What a site must satisfy to be eligible.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EligibilityRequirements {
    pub minimums: DistrictMinimums,
    pub heritage_designated: bool,
    /// Whether an external source flags the site as floodplain.
    pub in_floodplain: bool,
    pub access_type: AccessType,
    pub parking: ParkingRequirement,
}

/// Overall classification of a validation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EligibilityStatus {
    Eligible,
    EligibleWithWarnings,
    Ineligible,
}

/// Outcome of validating a site.
///
/// `issues` block development; `warnings` do not. Every check runs, so
/// both lists are complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub summary: String,
    pub status: EligibilityStatus,
}

impl ValidationResult {
    /// Builds a report from collected findings.
    #[must_use]
    pub fn from_findings(issues: Vec<String>, warnings: Vec<String>) -> Self {
        let (status, summary) = if !issues.is_empty() {
            (
                EligibilityStatus::Ineligible,
                format!(
                    "Site is not eligible: {} blocking issue{}",
                    issues.len(),
                    plural(issues.len())
                ),
            )
        } else if !warnings.is_empty() {
            (
                EligibilityStatus::EligibleWithWarnings,
                format!(
                    "Site is eligible with {} warning{}",
                    warnings.len(),
                    plural(warnings.len())
                ),
            )
        } else {
            (
                EligibilityStatus::Eligible,
                "Site is fully eligible for development".to_string(),
            )
        };

        Self {
            is_valid: issues.is_empty(),
            issues,
            warnings,
            summary,
            status,
        }
    }
}

const fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_findings_is_eligible() {
        let result = ValidationResult::from_findings(vec![], vec![]);
        assert!(result.is_valid);
        assert_eq!(result.status, EligibilityStatus::Eligible);
    }

    #[test]
    fn warnings_only_is_still_valid() {
        let result = ValidationResult::from_findings(vec![], vec!["narrow".to_string()]);
        assert!(result.is_valid);
        assert_eq!(result.status, EligibilityStatus::EligibleWithWarnings);
        assert_eq!(result.summary, "Site is eligible with 1 warning");
    }

    #[test]
    fn any_issue_is_invalid() {
        let result = ValidationResult::from_findings(
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string()],
        );
        assert!(!result.is_valid);
        assert_eq!(result.status, EligibilityStatus::Ineligible);
        assert_eq!(result.summary, "Site is not eligible: 2 blocking issues");
    }

    #[test]
    fn report_serializes_camel_case() {
        let json = serde_json::to_value(ValidationResult::from_findings(vec![], vec![]))
            .expect("serializable");
        assert_eq!(json["isValid"], true);
        assert_eq!(json["status"], "eligible");
        assert!(json["issues"].is_array());
    }

    #[test]
    fn access_type_parses_from_snake_case() {
        assert_eq!("lane".parse::<AccessType>(), Ok(AccessType::Lane));
        assert_eq!(AccessType::default(), AccessType::Public);
    }
}
