//! Entities backed by native resources

pub mod aero_data;
pub mod aero_dist;
pub mod aero_mode;
pub mod aero_particle;
pub mod bin_grid;
pub mod error;

// Re-exports
pub use aero_data::AeroData;
pub use aero_dist::AeroDist;
pub use aero_mode::AeroMode;
pub use aero_particle::AeroParticle;
pub use bin_grid::BinGrid;
pub use error::EntityError;
