//! Aerosol Bridge Core - Rust boundary layer
//!
//! Safe ownership, marshalling and validation for driving an externally
//! owned aerosol model library from a dynamically typed host.
//!
//! # Architecture
//!
//! - **core**: Handle lifecycle, array marshalling, kind enumerations
//! - **descriptor**: Descriptor validation and the leftover-key audit
//! - **native**: Native layer contract and the in-process reference layer
//! - **models**: Entities (AeroMode, AeroDist, AeroData, AeroParticle, BinGrid)
//!
//! # Critical Invariants
//!
//! 1. Every native resource is destroyed exactly once, on every exit path
//! 2. Array lengths are always queried from the native side, never assumed
//! 3. Descriptors are validated in full before any native constructor runs
//! 4. Raw kind ordinals never leave the entity layer

// Module declarations
pub mod core;
pub mod descriptor;
pub mod models;
pub mod native;

// Re-exports for convenience
pub use crate::core::handle::{NativeResource, ResourceHandle};
pub use crate::core::kind::{GridKind, KindError, ModeKind, OrdinalKind};
pub use crate::core::marshal::MarshalError;
pub use descriptor::{
    validate_dist, validate_mode, validate_species, ModeDescriptor, ValidationError,
};
pub use models::{AeroData, AeroDist, AeroMode, AeroParticle, BinGrid, EntityError};
pub use native::{
    AeroDataNative, AeroModeNative, AeroParticleNative, BinGridNative, NativeError, SpeciesSpec,
};
