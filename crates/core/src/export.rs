//! Persistence document wrapping one generated sector.
//!
//! The document shape is `{ version, timestamp, gridSize, generatorSettings,
//! systems }`. Serializing, parsing, and serializing again yields identical
//! bytes. The core never reads the clock; callers supply the timestamp.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{GeneratedSector, SectorMap};
use crate::request::{GenerationRequest, GridSize};

pub const DOCUMENT_VERSION: &str = "1.0";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorDocument {
    pub version: String,
    pub timestamp: String,
    pub grid_size: GridSize,
    pub generator_settings: GenerationRequest,
    pub systems: SectorMap,
}

impl SectorDocument {
    pub fn from_sector(
        sector: &GeneratedSector,
        request: &GenerationRequest,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_owned(),
            timestamp: timestamp.into(),
            grid_size: sector.grid_size,
            generator_settings: request.clone().with_sector(sector.sector.q, sector.sector.r),
            systems: sector.systems.clone(),
        }
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(DocumentError::Serialize)
    }

    /// Parses a document and checks its version. Cell keys must be `"q,r"`
    /// and unique.
    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        let document: Self = serde_json::from_str(json).map_err(DocumentError::Parse)?;
        if document.version != DOCUMENT_VERSION {
            return Err(DocumentError::UnsupportedVersion(document.version));
        }
        Ok(document)
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to serialize sector document: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to parse sector document: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("unsupported sector document version `{0}` (expected {expected})", expected = DOCUMENT_VERSION)]
    UnsupportedVersion(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generate_sector;
    use crate::request::DistributionMode;
    use crate::tables::ReferenceTables;

    fn document() -> SectorDocument {
        let tables = ReferenceTables::builtin();
        let request = GenerationRequest::range("EXPORT", GridSize::new(9, 7), 10, 20)
            .with_distribution(DistributionMode::Clustered)
            .with_sector(3, -2);
        let sector = generate_sector(&request, &tables);
        SectorDocument::from_sector(&sector, &request, "2026-01-01T00:00:00Z")
    }

    #[test]
    fn document_round_trips_byte_for_byte() {
        let json = document().to_json_string().expect("serialize");
        let reparsed = SectorDocument::from_json_str(&json).expect("parse");
        assert_eq!(reparsed.to_json_string().expect("serialize again"), json);
    }

    #[test]
    fn document_uses_camel_case_top_level_keys() {
        let json = document().to_json_string().expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        for key in ["version", "timestamp", "gridSize", "generatorSettings", "systems"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["generatorSettings"]["sectorQ"], 3);
        assert_eq!(value["generatorSettings"]["distributionMode"], "clustered");
    }

    #[test]
    fn unknown_versions_are_rejected() {
        let mut document = document();
        document.version = "0.3".to_owned();
        let json = document.to_json_string().expect("serialize");
        assert!(matches!(
            SectorDocument::from_json_str(&json),
            Err(DocumentError::UnsupportedVersion(version)) if version == "0.3"
        ));
    }

    #[test]
    fn malformed_cell_keys_are_rejected() {
        let json = document().to_json_string().expect("serialize");
        let mut value: serde_json::Value = serde_json::from_str(&json).expect("json");
        let systems = value["systems"].as_object_mut().expect("systems object");
        let (key, occupant) = systems
            .iter()
            .next()
            .map(|(key, occupant)| (key.clone(), occupant.clone()))
            .expect("at least one cell");
        systems.remove(&key);
        systems.insert("nowhere".to_owned(), occupant);

        assert!(matches!(
            SectorDocument::from_json_str(&value.to_string()),
            Err(DocumentError::Parse(_))
        ));
    }
}
