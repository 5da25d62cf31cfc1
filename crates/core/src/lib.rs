pub mod export;
pub mod generation;
pub mod invariants;
pub mod model;
pub mod request;
pub mod rng;
pub mod sampler;
pub mod tables;

pub use export::{DOCUMENT_VERSION, DocumentError, SectorDocument};
pub use generation::{
    GateLink, JumpGateNetwork, SectorGenerator, biome_for_sector, generate_sector, generate_sector_block,
    ideal_core_hex, region_for_sector, region_metadata,
};
pub use invariants::{InvariantViolation, check_sector_invariants};
pub use model::*;
pub use request::{DensityMode, DistributionMode, GenerationRequest, GridSize, RangeLimits, RequestError};
pub use tables::{ReferenceTables, TablesError};
