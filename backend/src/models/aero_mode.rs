//! Aerosol mode
//!
//! An aerosol mode is one component of a size distribution: a total number
//! concentration, a composition (volume fraction per species of the table it
//! was built against) and a shape (log-normal, exponential, monodisperse, or
//! sampled). All state lives on the native side; every accessor crosses the
//! boundary.
//!
//! # Lifecycle
//!
//! - `new` / `from_descriptor` → constructed; no other way to get an `AeroMode`
//! - accessors only exist on a constructed value
//! - dropping the value releases the native resource exactly once
//!
//! Construction from a descriptor is all-or-nothing: if validation fails no
//! native call is made; if the native read or the leftover-key audit fails the
//! freshly constructed resource is released before the error is returned.

use serde_json::Value;
use tracing::{debug, warn};

use super::aero_data::AeroData;
use super::bin_grid::BinGrid;
use super::error::{decode_utf8, EntityError};
use crate::core::handle::ResourceHandle;
use crate::core::kind::{ModeKind, OrdinalKind};
use crate::core::marshal::{read_array, write_array, write_paired};
use crate::descriptor::{validate_mode, DescriptorReader, ModeDescriptor};
use crate::native::AeroModeNative;

/// One aerosol mode backed by a native resource
///
/// # Example
/// ```
/// use aero_bridge_core_rs::native::reference::ReferenceLibrary;
/// use aero_bridge_core_rs::{AeroData, AeroMode};
/// use serde_json::json;
///
/// let lib = ReferenceLibrary::default();
/// let aero_data = AeroData::from_descriptor(&lib.aero_data, &json!([
///     {"SO4": [1800, 0, 96e-3, 0.65]},
/// ])).unwrap();
///
/// let mut mode = AeroMode::from_descriptor(&lib.aero_mode, &aero_data, &json!({"test_mode": {
///     "mass_frac": [{"SO4": [1]}],
///     "mode_type": "mono",
///     "num_conc": 1e6,
///     "diam": 2e-7
/// }})).unwrap();
///
/// assert_eq!(mode.name().unwrap(), "test_mode");
/// assert_eq!(mode.kind().unwrap(), "mono");
/// assert_eq!(mode.vol_frac(), vec![1.0]);
///
/// mode.set_kind("exp").unwrap();
/// assert_eq!(mode.kind().unwrap(), "exp");
/// ```
#[derive(Debug)]
pub struct AeroMode<'n, N: AeroModeNative> {
    handle: ResourceHandle<'n, N>,
}

impl<'n, N: AeroModeNative> AeroMode<'n, N> {
    /// Construct an empty mode (no species, kind unset)
    pub fn new(native: &'n N) -> Self {
        Self {
            handle: ResourceHandle::construct(native),
        }
    }

    /// Construct a mode from `{"<name>": {<params>}}`
    ///
    /// # Errors
    ///
    /// - `Validation`: the descriptor failed the schema (nothing constructed)
    ///   or left parameters unread after construction
    /// - `Native`: the native side rejected a parameter value
    pub fn from_descriptor(
        native: &'n N,
        aero_data: &AeroData<'_, N::AeroData>,
        descriptor: &Value,
    ) -> Result<Self, EntityError> {
        let validated = validate_mode(descriptor).inspect_err(|e| {
            warn!(error = %e, "mode descriptor rejected");
        })?;
        Self::from_validated(native, aero_data, validated)
    }

    /// Construct from a descriptor that already passed validation
    pub(crate) fn from_validated(
        native: &'n N,
        aero_data: &AeroData<'_, N::AeroData>,
        validated: ModeDescriptor<'_>,
    ) -> Result<Self, EntityError> {
        let mut handle = ResourceHandle::construct(native);
        let reader = DescriptorReader::new(validated);
        native.from_descriptor(handle.mutable_access(), aero_data.raw(), &reader)?;
        reader.audit().inspect_err(|e| {
            warn!(mode = validated.name, error = %e, "mode descriptor has leftover parameters");
        })?;

        debug!(
            mode = validated.name,
            mode_type = validated.mode_type().unwrap_or_default(),
            "mode constructed from descriptor"
        );
        Ok(Self { handle })
    }

    fn native(&self) -> &'n N {
        self.handle.native()
    }

    fn raw(&self) -> &N::Raw {
        self.handle.const_access()
    }

    // ========================================================================
    // Scalars
    // ========================================================================

    /// Total number concentration (#/m^3)
    pub fn num_conc(&self) -> f64 {
        self.native().num_conc(self.raw())
    }

    pub fn set_num_conc(&mut self, value: f64) {
        let native = self.native();
        native.set_num_conc(self.handle.mutable_access(), value);
    }

    /// Characteristic radius, with meaning dependent on mode type (m)
    pub fn char_radius(&self) -> f64 {
        self.native().char_radius(self.raw())
    }

    pub fn set_char_radius(&mut self, value: f64) {
        let native = self.native();
        native.set_char_radius(self.handle.mutable_access(), value);
    }

    /// Geometric standard deviation (1)
    pub fn gsd(&self) -> f64 {
        self.native().gsd(self.raw())
    }

    pub fn set_gsd(&mut self, value: f64) {
        let native = self.native();
        native.set_gsd(self.handle.mutable_access(), value);
    }

    /// Mode name, used to track particle sources
    pub fn name(&self) -> Result<String, EntityError> {
        decode_utf8(self.native().name(self.raw()))
    }

    pub fn set_name(&mut self, name: &str) {
        let native = self.native();
        native.set_name(self.handle.mutable_access(), name.as_bytes());
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// Species fractions by volume
    pub fn vol_frac(&self) -> Vec<f64> {
        read_array(
            || self.native().n_spec(self.raw()),
            |out| self.native().vol_frac(self.raw(), out),
        )
    }

    /// Replace the volume fractions; length must equal the species count
    pub fn set_vol_frac(&mut self, data: &[f64]) -> Result<(), EntityError> {
        let native = self.native();
        let expected = native.n_spec(self.raw());
        let raw = self.handle.mutable_access();
        write_array("vol_frac", expected, data, |data| native.set_vol_frac(raw, data))?;
        Ok(())
    }

    /// Species fraction standard deviation
    pub fn vol_frac_std(&self) -> Vec<f64> {
        read_array(
            || self.native().n_spec(self.raw()),
            |out| self.native().vol_frac_std(self.raw(), out),
        )
    }

    pub fn set_vol_frac_std(&mut self, data: &[f64]) -> Result<(), EntityError> {
        let native = self.native();
        let expected = native.n_spec(self.raw());
        let raw = self.handle.mutable_access();
        write_array("vol_frac_std", expected, data, |data| {
            native.set_vol_frac_std(raw, data)
        })?;
        Ok(())
    }

    // ========================================================================
    // Sampled size distribution
    // ========================================================================

    /// Set the sample table from bin-edge diameters (m) and per-bin number
    /// concentrations (m^-3); `num_concs` has one element fewer than `diams`
    pub fn set_sample(&mut self, diams: &[f64], num_concs: &[f64]) -> Result<(), EntityError> {
        let native = self.native();
        let raw = self.handle.mutable_access();
        write_paired("sample_num_conc", diams, num_concs, |diams, num_concs| {
            native.set_sampled(raw, diams, num_concs)
        })?;
        Ok(())
    }

    /// Sample bin edge radii (m), one more than the bin count
    pub fn sample_radius(&self) -> Vec<f64> {
        read_array(
            || self.native().sample_bins(self.raw()) + 1,
            |out| self.native().sample_radius(self.raw(), out),
        )
    }

    /// Sample bin number concentrations (m^-3)
    pub fn sample_num_conc(&self) -> Vec<f64> {
        read_array(
            || self.native().sample_bins(self.raw()),
            |out| self.native().sample_num_conc(self.raw(), out),
        )
    }

    // ========================================================================
    // Mode type
    // ========================================================================

    /// Mode type name
    pub fn kind(&self) -> Result<&'static str, EntityError> {
        Ok(self.mode_kind()?.name())
    }

    /// Set the mode type by name; unknown names leave the mode unchanged
    pub fn set_kind(&mut self, name: &str) -> Result<(), EntityError> {
        let kind = ModeKind::from_name(name)?;
        self.set_mode_kind(kind);
        Ok(())
    }

    pub fn mode_kind(&self) -> Result<ModeKind, EntityError> {
        let ordinal = self.native().kind_ordinal(self.raw());
        ModeKind::decode(ordinal).map_err(|e| {
            warn!(ordinal, "mode holds an out-of-range type ordinal");
            EntityError::from(e)
        })
    }

    pub fn set_mode_kind(&mut self, kind: ModeKind) {
        let native = self.native();
        native.set_kind_ordinal(self.handle.mutable_access(), kind.encode());
    }

    // ========================================================================
    // Binned distribution
    // ========================================================================

    /// Number concentration of the mode in each bin of `bin_grid`
    /// (#/m^3/log_width)
    pub fn num_dist(
        &self,
        bin_grid: &BinGrid<'_, N::BinGrid>,
        aero_data: &AeroData<'_, N::AeroData>,
    ) -> Vec<f64> {
        read_array(
            || bin_grid.len(),
            |out| {
                self.native()
                    .num_dist(self.raw(), bin_grid.raw(), aero_data.raw(), out)
            },
        )
    }
}
