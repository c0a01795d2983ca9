//! Single aerosol particle
//!
//! A particle stores one volume per species of the table it was built
//! against, so `volumes` always has `aero_data.len()` elements. The particle
//! keeps a borrow of that table for every species-dependent query.

use std::fmt;

use tracing::debug;

use super::aero_data::AeroData;
use super::error::EntityError;
use crate::core::handle::ResourceHandle;
use crate::core::marshal::{check_len, read_array};
use crate::native::AeroParticleNative;

/// One particle backed by a native resource
///
/// # Example
/// ```
/// use aero_bridge_core_rs::native::reference::ReferenceLibrary;
/// use aero_bridge_core_rs::{AeroData, AeroParticle};
/// use serde_json::json;
///
/// let lib = ReferenceLibrary::default();
/// let aero_data = AeroData::from_descriptor(&lib.aero_data, &json!([
///     {"H2O": [1000, 0, 18e-3, 0]},
///     {"Cl": [2200, 1, 35.5e-3, 0]},
/// ])).unwrap();
///
/// let particle = AeroParticle::new(&lib.aero_particle, &aero_data, &[1.0, 2.0]).unwrap();
/// assert_eq!(particle.volume(), 3.0);
/// assert_eq!(particle.dry_volume(), 2.0);
/// assert_eq!(particle.species_volume_by_name("Cl").unwrap(), 2.0);
/// ```
pub struct AeroParticle<'n, 'd, P: AeroParticleNative> {
    handle: ResourceHandle<'n, P>,
    aero_data: &'d AeroData<'n, P::AeroData>,
}

impl<P: AeroParticleNative> fmt::Debug for AeroParticle<'_, '_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AeroParticle")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl<'n, 'd, P: AeroParticleNative> AeroParticle<'n, 'd, P> {
    /// Build a particle from per-species volumes (m^3)
    ///
    /// # Errors
    ///
    /// - `Marshal` when `volumes` does not have one entry per species;
    ///   nothing is constructed
    pub fn new(
        native: &'n P,
        aero_data: &'d AeroData<'n, P::AeroData>,
        volumes: &[f64],
    ) -> Result<Self, EntityError> {
        check_len("volumes", aero_data.len(), volumes.len())?;

        let mut handle = ResourceHandle::construct(native);
        native.set_vols(handle.mutable_access(), volumes);
        debug!(n_spec = volumes.len(), "particle constructed");

        Ok(Self { handle, aero_data })
    }

    fn native(&self) -> &'n P {
        self.handle.native()
    }

    fn raw(&self) -> &P::Raw {
        self.handle.const_access()
    }

    /// Species table the particle was built against
    pub fn aero_data(&self) -> &'d AeroData<'n, P::AeroData> {
        self.aero_data
    }

    // ========================================================================
    // Volumes
    // ========================================================================

    /// Constituent species volumes (m^3)
    pub fn volumes(&self) -> Vec<f64> {
        read_array(
            || self.native().n_spec(self.raw()),
            |out| self.native().volumes(self.raw(), out),
        )
    }

    /// Total volume (m^3)
    pub fn volume(&self) -> f64 {
        self.native().volume(self.raw())
    }

    /// Volume of species `index` (m^3)
    pub fn species_volume(&self, index: usize) -> Result<f64, EntityError> {
        let n_spec = self.native().n_spec(self.raw());
        if index >= n_spec {
            return Err(EntityError::InvalidArgument(format!(
                "species index {} out of range (n_spec = {})",
                index, n_spec
            )));
        }
        Ok(self.native().species_volume(self.raw(), index))
    }

    pub fn species_volume_by_name(&self, name: &str) -> Result<f64, EntityError> {
        let index = self.aero_data.spec_by_name(name)?;
        self.species_volume(index)
    }

    /// Total volume excluding water (m^3)
    pub fn dry_volume(&self) -> f64 {
        self.native().dry_volume(self.raw(), self.aero_data.raw())
    }

    // ========================================================================
    // Sizes
    // ========================================================================

    /// Geometric radius (m)
    pub fn radius(&self) -> f64 {
        self.aero_data.vol2rad(self.volume())
    }

    pub fn dry_radius(&self) -> f64 {
        self.aero_data.vol2rad(self.dry_volume())
    }

    pub fn diameter(&self) -> f64 {
        2.0 * self.radius()
    }

    pub fn dry_diameter(&self) -> f64 {
        2.0 * self.dry_radius()
    }

    // ========================================================================
    // Masses
    // ========================================================================

    /// Mass of each species (kg)
    pub fn species_masses(&self) -> Vec<f64> {
        read_array(
            || self.native().n_spec(self.raw()),
            |out| {
                self.native()
                    .species_masses(self.raw(), self.aero_data.raw(), out)
            },
        )
    }

    /// Total mass (kg)
    pub fn mass(&self) -> f64 {
        self.species_masses().iter().sum()
    }

    /// Average density (kg/m^3)
    pub fn density(&self) -> f64 {
        self.mass() / self.volume()
    }
}
