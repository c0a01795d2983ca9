//! In-process native layer
//!
//! Emulates the numerical library's handle contract with heap-allocated
//! state: the constructor boxes a default state, the destructor drops it.
//! Used when the library itself is not linked (tests, the CLI).
//!
//! Each family counts constructor and destructor calls so callers can verify
//! that every handle is released exactly once.

mod aero_data;
mod aero_mode;
mod aero_particle;
mod bin_grid;

use std::cell::Cell;

pub use aero_data::{AeroDataState, ReferenceAeroData};
pub use aero_mode::{ModeState, ReferenceAeroMode};
pub use aero_particle::{ParticleState, ReferenceAeroParticle};
pub use bin_grid::{BinGridState, ReferenceBinGrid};

/// Constructor/destructor call counters for one resource family
#[derive(Debug, Default)]
pub struct CallCounts {
    constructed: Cell<usize>,
    destroyed: Cell<usize>,
}

impl CallCounts {
    pub fn constructed(&self) -> usize {
        self.constructed.get()
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.get()
    }

    /// Resources constructed and not yet destroyed
    pub fn live(&self) -> usize {
        self.constructed() - self.destroyed()
    }

    pub(crate) fn record_construct(&self) {
        self.constructed.set(self.constructed.get() + 1);
    }

    pub(crate) fn record_destroy(&self) {
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

/// All reference families together
///
/// # Example
/// ```
/// use aero_bridge_core_rs::native::reference::ReferenceLibrary;
/// use aero_bridge_core_rs::AeroData;
/// use serde_json::json;
///
/// let lib = ReferenceLibrary::default();
/// {
///     let species = json!([{"SO4": [1800, 0, 0.096, 0.65]}]);
///     let aero_data = AeroData::from_descriptor(&lib.aero_data, &species).unwrap();
///     assert_eq!(aero_data.len(), 1);
/// }
/// assert_eq!(lib.aero_data.calls().live(), 0);
/// ```
#[derive(Debug, Default)]
pub struct ReferenceLibrary {
    pub aero_data: ReferenceAeroData,
    pub aero_mode: ReferenceAeroMode,
    pub aero_particle: ReferenceAeroParticle,
    pub bin_grid: ReferenceBinGrid,
}

impl ReferenceLibrary {
    /// Resources of any family still alive
    pub fn live(&self) -> usize {
        self.aero_data.calls().live()
            + self.aero_mode.calls().live()
            + self.aero_particle.calls().live()
            + self.bin_grid.calls().live()
    }
}
