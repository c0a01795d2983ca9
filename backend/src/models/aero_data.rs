//! Species table
//!
//! The species table is a long-lived, read-only resource shared by every
//! mode built against it. Modes borrow it during construction only.
//!
//! Each species is identified by its index `0..len()`; the order is the
//! order of the descriptor list.

use serde_json::Value;
use tracing::debug;

use super::error::{decode_utf8, EntityError};
use crate::core::handle::ResourceHandle;
use crate::core::marshal::read_array;
use crate::descriptor::validate_species;
use crate::native::AeroDataNative;

/// Aerosol material properties
///
/// # Example
/// ```
/// use aero_bridge_core_rs::native::reference::ReferenceAeroData;
/// use aero_bridge_core_rs::AeroData;
/// use serde_json::json;
///
/// let native = ReferenceAeroData::default();
/// let aero_data = AeroData::from_descriptor(&native, &json!([
///     {"H2O": [1000, 0, 18e-3, 0]},
///     {"Cl": [2200, 1, 35.5e-3, 0]},
/// ])).unwrap();
///
/// assert_eq!(aero_data.len(), 2);
/// assert_eq!(aero_data.spec_by_name("Cl").unwrap(), 1);
/// assert_eq!(aero_data.densities(), vec![1000.0, 2200.0]);
/// ```
#[derive(Debug)]
pub struct AeroData<'n, D: AeroDataNative> {
    handle: ResourceHandle<'n, D>,
}

impl<'n, D: AeroDataNative> AeroData<'n, D> {
    /// Build a species table from `[{"<species>": [density, ions, weight, kappa]}, ...]`
    pub fn from_descriptor(native: &'n D, descriptor: &Value) -> Result<Self, EntityError> {
        let species = validate_species(descriptor)?;

        let mut handle = ResourceHandle::construct(native);
        native.load_species(handle.mutable_access(), &species);
        debug!(n_spec = species.len(), "species table loaded");

        Ok(Self { handle })
    }

    pub(crate) fn raw(&self) -> &D::Raw {
        self.handle.const_access()
    }

    fn native(&self) -> &'n D {
        self.handle.native()
    }

    /// Number of species
    pub fn len(&self) -> usize {
        self.native().n_spec(self.raw())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Species names in index order
    pub fn species(&self) -> Result<Vec<String>, EntityError> {
        (0..self.len())
            .map(|i| decode_utf8(self.native().species_name(self.raw(), i)))
            .collect()
    }

    /// Index of the species called `name`
    pub fn spec_by_name(&self, name: &str) -> Result<usize, EntityError> {
        (0..self.len())
            .find(|&i| &*self.native().species_name(self.raw(), i) == name.as_bytes())
            .ok_or_else(|| EntityError::InvalidArgument(format!("Element not found: '{}'", name)))
    }

    /// Density of each species (kg/m^3)
    pub fn densities(&self) -> Vec<f64> {
        read_array(|| self.len(), |out| self.native().densities(self.raw(), out))
    }

    /// Hygroscopicity parameter of each species (1)
    pub fn kappa(&self) -> Vec<f64> {
        read_array(|| self.len(), |out| self.native().kappa(self.raw(), out))
    }

    /// Molecular weight of each species (kg/mol)
    pub fn molecular_weights(&self) -> Vec<f64> {
        read_array(|| self.len(), |out| self.native().molecular_weights(self.raw(), out))
    }

    /// Density of one species (kg/m^3)
    pub fn density(&self, name: &str) -> Result<f64, EntityError> {
        let index = self.spec_by_name(name)?;
        Ok(self.densities()[index])
    }

    /// Volume fractal dimension (1)
    pub fn frac_dim(&self) -> f64 {
        self.native().frac_dim(self.raw())
    }

    pub fn set_frac_dim(&mut self, value: f64) {
        let native = self.native();
        native.set_frac_dim(self.handle.mutable_access(), value);
    }

    /// Volume filling factor (1)
    pub fn vol_fill_factor(&self) -> f64 {
        self.native().vol_fill_factor(self.raw())
    }

    pub fn set_vol_fill_factor(&mut self, value: f64) {
        let native = self.native();
        native.set_vol_fill_factor(self.handle.mutable_access(), value);
    }

    /// Radius of primary particles (m)
    pub fn prime_radius(&self) -> f64 {
        self.native().prime_radius(self.raw())
    }

    pub fn set_prime_radius(&mut self, value: f64) {
        let native = self.native();
        native.set_prime_radius(self.handle.mutable_access(), value);
    }

    // ========================================================================
    // Size conversions (fractal aware)
    // ========================================================================

    /// Mass-equivalent volume (m^3) to geometric radius (m)
    pub fn vol2rad(&self, vol: f64) -> f64 {
        self.native().vol2rad(self.raw(), vol)
    }

    /// Geometric radius (m) to mass-equivalent volume (m^3)
    pub fn rad2vol(&self, radius: f64) -> f64 {
        self.native().rad2vol(self.raw(), radius)
    }

    pub fn vol2diam(&self, vol: f64) -> f64 {
        2.0 * self.vol2rad(vol)
    }

    pub fn diam2vol(&self, diam: f64) -> f64 {
        self.rad2vol(diam / 2.0)
    }
}

