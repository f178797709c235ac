#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Command-line host for the site massing engine.
//!
//! Reads a parcel boundary (`GeoJSON` or Esri JSON), resolves zoning for a
//! district, and prints either the massing descriptor or an eligibility
//! report as JSON.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use site_massing_eligibility::{
    AccessType, EligibilityValidator, ParkingRequirement, ValidationInput,
    requirements_for_district,
};
use site_massing_floodplain::{FloodplainRiskAnalyzer, parse_zones};
use site_massing_geometry::{SiteMeasurementCalculator, parse::parse_parcel};
use site_massing_massing::MassingPipeline;
use site_massing_site_models::{CoordinateFrame, Parcel, SiteConfig};
use site_massing_zoning::{ZoningRecord, ZoningRules, parse_overrides, registry, resolve_district};

#[derive(Parser)]
#[command(name = "site_massing", about = "Parametric site massing and eligibility")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by every parcel command.
#[derive(clap::Args)]
struct ParcelArgs {
    /// Parcel boundary file (`GeoJSON` or Esri JSON)
    #[arg(long)]
    parcel: PathBuf,

    /// Coordinate frame of the boundary: `geographic` or `projected`
    #[arg(long, default_value = "geographic")]
    frame: CoordinateFrame,

    /// Zoning district code
    #[arg(long, default_value = "R1-1")]
    district: String,

    /// TOML file of zoning overrides applied over the district record
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// TOML file with site overrides and decorative elements
    #[arg(long)]
    site: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the massing envelope for a parcel
    Envelope {
        #[command(flatten)]
        parcel: ParcelArgs,
    },
    /// Check whether a parcel is eligible for development
    Validate {
        #[command(flatten)]
        parcel: ParcelArgs,

        /// Floodplain zones to assess the parcel against (`GeoJSON`)
        #[arg(long)]
        floodplain: Option<PathBuf>,

        /// The site is heritage designated
        #[arg(long)]
        heritage: bool,

        /// The site is flagged as floodplain by an external source
        #[arg(long)]
        in_floodplain: bool,

        /// Street access: `public`, `lane`, `private`, or `none`
        #[arg(long, default_value = "public")]
        access: AccessType,

        /// Off-street parking spaces the development must provide
        #[arg(long, default_value_t = 0)]
        parking: u32,
    },
    /// List the registered zoning districts
    Districts,
}

/// Parcel, rules, and site configuration loaded from the command line.
struct Inputs {
    parcel: Parcel,
    rules: ZoningRules,
    site: SiteConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Envelope { parcel } => {
            let inputs = load(&parcel)?;
            let output =
                <MassingPipeline>::default().run(&inputs.parcel, &inputs.rules, &inputs.site)?;
            println!("{}", output.to_descriptor().to_json()?);
        }
        Commands::Validate {
            parcel,
            floodplain,
            heritage,
            in_floodplain,
            access,
            parking,
        } => {
            let inputs = load(&parcel)?;

            let measurements = <SiteMeasurementCalculator>::default()
                .measure_parcel(&inputs.parcel)?
                .with_overrides(&inputs.site);

            let assessment = match floodplain {
                Some(path) => {
                    let zones = parse_zones(&std::fs::read_to_string(&path)?)?;
                    log::info!("Loaded {} floodplain zones from {}", zones.len(), path.display());
                    Some(<FloodplainRiskAnalyzer>::default().analyze(&inputs.parcel, &zones)?)
                }
                None => None,
            };

            let massing =
                <MassingPipeline>::default().run(&inputs.parcel, &inputs.rules, &inputs.site)?;

            let mut requirements = requirements_for_district(&parcel.district);
            requirements.heritage_designated = heritage;
            requirements.in_floodplain =
                in_floodplain || assessment.as_ref().is_some_and(|a| a.in_floodplain);
            requirements.access_type = access;
            requirements.parking = ParkingRequirement {
                required_spaces: parking,
            };

            let mut input = ValidationInput::new(&measurements, &requirements, &inputs.rules)
                .with_buildable_area(massing.metadata.buildable_area)
                .with_site(&inputs.site);
            if let Some(assessment) = &assessment {
                input = input.with_floodplain(assessment);
            }
            let result = EligibilityValidator::new().validate(&input);

            let report = serde_json::json!({
                "measurements": measurements,
                "floodplain": assessment,
                "validation": result,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Districts => {
            for code in registry::district_codes() {
                println!("{code}");
            }
        }
    }

    Ok(())
}

fn load(args: &ParcelArgs) -> Result<Inputs, Box<dyn std::error::Error>> {
    let parcel = parse_parcel(&std::fs::read_to_string(&args.parcel)?, args.frame)?;

    let overrides: Option<ZoningRecord> = match &args.overrides {
        Some(path) => Some(parse_overrides(&std::fs::read_to_string(path)?)?),
        None => None,
    };
    let rules = resolve_district(&args.district, overrides.as_ref())?;

    let site: SiteConfig = match &args.site {
        Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
        None => SiteConfig::default(),
    };

    log::info!(
        "Loaded parcel from {} for district {}",
        args.parcel.display(),
        args.district
    );

    Ok(Inputs {
        parcel,
        rules,
        site,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_parses_frame_and_access() {
        let cli = Cli::try_parse_from([
            "site_massing",
            "validate",
            "--parcel",
            "lot.geojson",
            "--frame",
            "projected",
            "--access",
            "lane",
        ])
        .expect("valid arguments");

        let Commands::Validate { parcel, access, .. } = cli.command else {
            panic!("expected the validate command");
        };
        assert_eq!(parcel.frame, CoordinateFrame::Projected);
        assert_eq!(parcel.district, "R1-1");
        assert_eq!(access, AccessType::Lane);
    }

    #[test]
    fn unknown_access_type_is_rejected() {
        let result = Cli::try_parse_from([
            "site_massing",
            "validate",
            "--parcel",
            "lot.geojson",
            "--access",
            "boat",
        ]);
        assert!(result.is_err());
    }
}
