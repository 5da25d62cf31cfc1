//! Generation request shape and caller-side validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::SectorCoord;
use crate::tables::ReferenceTables;

/// Largest grid side accepted by [`GenerationRequest::validate`].
pub const MAX_GRID_SIDE: u32 = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityMode {
    #[default]
    Preset,
    Manual,
    Range,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMode {
    #[default]
    Uniform,
    Clustered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLimits {
    pub min: u32,
    pub max: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub seed: String,
    pub grid_size: GridSize,
    #[serde(default)]
    pub density_mode: DensityMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_limits: Option<RangeLimits>,
    #[serde(default)]
    pub distribution_mode: DistributionMode,
    #[serde(default)]
    pub sector_q: i32,
    #[serde(default)]
    pub sector_r: i32,
}

impl GenerationRequest {
    pub fn preset(seed: impl Into<String>, grid_size: GridSize, preset: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            grid_size,
            density_mode: DensityMode::Preset,
            density_preset: Some(preset.into()),
            manual_count: None,
            range_limits: None,
            distribution_mode: DistributionMode::Uniform,
            sector_q: 0,
            sector_r: 0,
        }
    }

    pub fn manual(seed: impl Into<String>, grid_size: GridSize, count: u32) -> Self {
        Self {
            density_mode: DensityMode::Manual,
            density_preset: None,
            manual_count: Some(count),
            ..Self::preset(seed, grid_size, "")
        }
    }

    pub fn range(seed: impl Into<String>, grid_size: GridSize, min: u32, max: u32) -> Self {
        Self {
            density_mode: DensityMode::Range,
            density_preset: None,
            range_limits: Some(RangeLimits { min, max }),
            ..Self::preset(seed, grid_size, "")
        }
    }

    pub fn with_sector(mut self, sector_q: i32, sector_r: i32) -> Self {
        self.sector_q = sector_q;
        self.sector_r = sector_r;
        self
    }

    pub fn sector(&self) -> SectorCoord {
        SectorCoord::new(self.sector_q, self.sector_r)
    }

    pub fn with_distribution(mut self, distribution_mode: DistributionMode) -> Self {
        self.distribution_mode = distribution_mode;
        self
    }

    /// Rejects requests the generator would otherwise silently coerce.
    ///
    /// Generation itself never fails; callers that load requests from users
    /// run this first.
    pub fn validate(&self, tables: &ReferenceTables) -> Result<(), RequestError> {
        let GridSize { width, height } = self.grid_size;
        if width == 0 || height == 0 {
            return Err(RequestError::EmptyGrid { width, height });
        }
        if width > MAX_GRID_SIDE || height > MAX_GRID_SIDE {
            return Err(RequestError::GridTooLarge { width, height, max: MAX_GRID_SIDE });
        }
        match self.density_mode {
            DensityMode::Preset => {
                let preset = self.density_preset.as_deref().ok_or(RequestError::MissingPreset)?;
                if !tables.rules.density_presets.iter().any(|candidate| candidate.value == preset) {
                    return Err(RequestError::UnknownPreset(preset.to_owned()));
                }
            }
            DensityMode::Manual => {
                self.manual_count.ok_or(RequestError::MissingManualCount)?;
            }
            DensityMode::Range => {
                let limits = self.range_limits.ok_or(RequestError::MissingRangeLimits)?;
                if limits.min > limits.max {
                    return Err(RequestError::InvertedRange { min: limits.min, max: limits.max });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("grid {width}x{height} has no cells")]
    EmptyGrid { width: u32, height: u32 },
    #[error("grid {width}x{height} exceeds the {max} cell side limit")]
    GridTooLarge { width: u32, height: u32, max: u32 },
    #[error("densityMode \"preset\" requires densityPreset")]
    MissingPreset,
    #[error("unknown density preset {0:?}")]
    UnknownPreset(String),
    #[error("densityMode \"manual\" requires manualCount")]
    MissingManualCount,
    #[error("densityMode \"range\" requires rangeLimits")]
    MissingRangeLimits,
    #[error("range limits are inverted: min {min} > max {max}")]
    InvertedRange { min: u32, max: u32 },
}
