//! Boundary primitives shared by every entity family
//!
//! - **handle**: exclusive ownership of one native resource
//! - **marshal**: query-then-fill array transfer with length checks
//! - **kind**: closed enumerations stored as 1-based ordinals

pub mod handle;
pub mod kind;
pub mod marshal;
