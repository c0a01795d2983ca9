//! Descriptor documents
//!
//! A descriptor is a JSON document consumed once while an entity is being
//! constructed. Handling is split in two passes:
//!
//! 1. [`validation`]: pure schema check, always run before construction
//! 2. [`reader`]: tracks which parameters the native side read, then audits
//!    the document for anything left over

pub mod reader;
pub mod schema;
pub mod validation;

pub use reader::DescriptorReader;
pub use validation::{
    validate_dist, validate_mode, validate_species, ModeDescriptor, ValidationError,
};
