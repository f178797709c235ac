//! End-to-end massing of a parcel.

use site_massing_geometry::{
    GeoProvider, PlanarBoundary, PlanarGeometryProvider, SiteMeasurementCalculator,
    shape::detect_lot_type,
};
use site_massing_site_models::{LotType, Parcel, SiteConfig};
use site_massing_zoning::resolve_district;
use site_massing_zoning_models::{ZoningRecord, ZoningRules};

use crate::{
    CourtyardCutoutPlanner, DimensionalConstraintApplier, MassingError, MassingExtruder,
    MassingOutput, SetbackFootprintResolver,
};

/// Runs measurement, setback resolution, dimensional caps, courtyard
/// cutout, and extrusion in order.
///
/// Geographic parcels are projected into a local metric plane for the
/// whole run; the returned footprint is in the parcel's own frame.
#[derive(Debug, Clone, Default)]
pub struct MassingPipeline<P = GeoProvider> {
    calculator: SiteMeasurementCalculator<P>,
    resolver: SetbackFootprintResolver<P>,
    constraint: DimensionalConstraintApplier<P>,
    courtyard: CourtyardCutoutPlanner<P>,
    extruder: MassingExtruder<P>,
}

impl<P: PlanarGeometryProvider + Clone> MassingPipeline<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            calculator: SiteMeasurementCalculator::new(provider.clone()),
            resolver: SetbackFootprintResolver::new(provider.clone()),
            constraint: DimensionalConstraintApplier::new(provider.clone()),
            courtyard: CourtyardCutoutPlanner::new(provider.clone()),
            extruder: MassingExtruder::new(provider),
        }
    }
}

impl<P: PlanarGeometryProvider> MassingPipeline<P> {
    /// Masses a parcel under fully resolved zoning rules.
    ///
    /// The lot type comes from `site.lot_type` when given, otherwise from
    /// corner-lot detection; corner lots widen the side setback to the
    /// corner setback.
    ///
    /// # Errors
    ///
    /// Returns [`MassingError::Geometry`] if the parcel boundary is not a
    /// usable polygon.
    pub fn run(
        &self,
        parcel: &Parcel,
        rules: &ZoningRules,
        site: &SiteConfig,
    ) -> Result<MassingOutput, MassingError> {
        let planar = PlanarBoundary::from_parcel(parcel)?;
        let measurements = self.calculator.measure(&planar.boundary)?;

        let lot_type = site
            .lot_type
            .unwrap_or_else(|| detect_lot_type(&planar.boundary));
        let setbacks = match lot_type {
            LotType::Corner => rules.setbacks.for_corner_lot(),
            LotType::Standard => rules.setbacks,
        };

        let resolved = self.resolver.resolve(&planar.boundary, &setbacks)?;
        let constrained = self.constraint.apply(
            &resolved.footprint,
            rules.max_building_width,
            rules.max_building_depth,
        );
        let courtyard = self.courtyard.plan(&constrained.footprint, &rules.courtyard);

        let mut output =
            self.extruder
                .extrude(&planar.boundary, courtyard.footprint, rules, site);

        output.footprint = planar.to_parcel_frame(&output.footprint);
        let metadata = &mut output.metadata;
        metadata.setbacks = setbacks;
        metadata.lot_type = lot_type;
        metadata.setback_stage = Some(resolved.stage);
        metadata.width_scale = constrained.width_scale;
        metadata.depth_scale = constrained.depth_scale;
        metadata.courtyard_decision = Some(courtyard.decision);
        metadata.measurements = Some(measurements);

        log::info!(
            "Massed {} parcel: {:.1} of {:.1} m² buildable, {} stories, setback stage {}",
            lot_type,
            metadata.buildable_area,
            metadata.total_area,
            metadata.stories,
            resolved.stage,
        );

        Ok(output)
    }

    /// Resolves a district's rules (with optional overrides) and masses
    /// the parcel under them.
    ///
    /// # Errors
    ///
    /// Returns [`MassingError::Zoning`] if the district is unknown and no
    /// overrides are given, or [`MassingError::Geometry`] if the parcel is
    /// not a usable polygon.
    pub fn run_district(
        &self,
        parcel: &Parcel,
        district: &str,
        overrides: Option<&ZoningRecord>,
        site: &SiteConfig,
    ) -> Result<MassingOutput, MassingError> {
        let rules = resolve_district(district, overrides)?;
        self.run(parcel, &rules, site)
    }
}
