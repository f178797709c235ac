//! Serializable massing descriptor for external renderers.

use serde::{Deserialize, Serialize};
use site_massing_geometry::parse::multipolygon_to_geojson;

use crate::{MassingMetadata, MassingOutput, PatioVoid, StairElement};

/// Everything a renderer needs to draw a massing: the footprint as a
/// `GeoJSON` geometry in the parcel's own coordinate frame, the envelope
/// height, the auxiliary elements, and the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MassingDescriptor {
    pub footprint: geojson::Geometry,
    pub height: f64,
    pub stories: u32,
    pub patio_voids: Vec<PatioVoid>,
    pub stairs: Vec<StairElement>,
    pub metadata: MassingMetadata,
}

impl MassingOutput {
    #[must_use]
    pub fn to_descriptor(&self) -> MassingDescriptor {
        MassingDescriptor {
            footprint: multipolygon_to_geojson(&self.footprint),
            height: self.metadata.height,
            stories: self.metadata.stories,
            patio_voids: self.patio_voids.clone(),
            stairs: self.stairs.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

impl MassingDescriptor {
    /// Renders the descriptor as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be represented in JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
