//! Aerosol size distribution
//!
//! A distribution is an ordered set of modes built against one species
//! table. It owns its modes: dropping the distribution releases every mode
//! handle once.
//!
//! Construction is all-or-nothing. Every mode document is validated before
//! the first mode is constructed; if mode `k` is then rejected by the native
//! side or the leftover-key audit, modes `0..k` are released before the
//! error is returned.

use serde_json::Value;
use tracing::{debug, warn};

use super::aero_data::AeroData;
use super::aero_mode::AeroMode;
use super::bin_grid::BinGrid;
use super::error::EntityError;
use crate::descriptor::validate_dist;
use crate::native::AeroModeNative;

/// Modes of one aerosol distribution
///
/// # Example
/// ```
/// use aero_bridge_core_rs::native::reference::ReferenceLibrary;
/// use aero_bridge_core_rs::{AeroData, AeroDist};
/// use serde_json::json;
///
/// let lib = ReferenceLibrary::default();
/// let aero_data = AeroData::from_descriptor(&lib.aero_data, &json!([
///     {"SO4": [1800, 0, 96e-3, 0.65]},
/// ])).unwrap();
///
/// let mono = |num_conc: f64, diam: f64| json!({
///     "mass_frac": [{"SO4": 1}],
///     "mode_type": "mono",
///     "num_conc": num_conc,
///     "diam": diam
/// });
/// let dist = AeroDist::from_descriptor(&lib.aero_mode, &aero_data, &json!([
///     {"small": mono(100.0, 1e-8)},
///     {"large": mono(20.0, 1e-6)},
/// ])).unwrap();
///
/// assert_eq!(dist.n_mode(), 2);
/// assert_eq!(dist.num_conc(), 120.0);
/// assert_eq!(dist.mode(1).unwrap().name().unwrap(), "large");
/// ```
#[derive(Debug)]
pub struct AeroDist<'n, N: AeroModeNative> {
    modes: Vec<AeroMode<'n, N>>,
}

impl<'n, N: AeroModeNative> AeroDist<'n, N> {
    /// Build every mode of `[{"<mode>": {<params>}}, ...]`
    pub fn from_descriptor(
        native: &'n N,
        aero_data: &AeroData<'_, N::AeroData>,
        descriptor: &Value,
    ) -> Result<Self, EntityError> {
        let validated = validate_dist(descriptor).inspect_err(|e| {
            warn!(error = %e, "distribution descriptor rejected");
        })?;

        let mut modes = Vec::with_capacity(validated.len());
        for (index, mode) in validated.into_iter().enumerate() {
            let built = AeroMode::from_validated(native, aero_data, mode).inspect_err(|e| {
                warn!(index, mode = mode.name, error = %e, "distribution mode rejected");
            })?;
            modes.push(built);
        }

        debug!(n_mode = modes.len(), "distribution constructed");
        Ok(Self { modes })
    }

    /// Number of modes
    pub fn n_mode(&self) -> usize {
        self.modes.len()
    }

    /// Total number concentration over all modes (#/m^3)
    pub fn num_conc(&self) -> f64 {
        self.modes.iter().map(AeroMode::num_conc).sum()
    }

    /// Mode at `index`
    pub fn mode(&self, index: usize) -> Result<&AeroMode<'n, N>, EntityError> {
        self.modes.get(index).ok_or_else(|| {
            EntityError::InvalidArgument(format!(
                "mode index {} out of range (n_mode = {})",
                index,
                self.modes.len()
            ))
        })
    }

    pub fn modes(&self) -> impl Iterator<Item = &AeroMode<'n, N>> {
        self.modes.iter()
    }

    /// Binned number concentration summed over all modes
    pub fn num_dist(
        &self,
        bin_grid: &BinGrid<'_, N::BinGrid>,
        aero_data: &AeroData<'_, N::AeroData>,
    ) -> Vec<f64> {
        let mut total = vec![0.0; bin_grid.len()];
        for mode in &self.modes {
            for (sum, value) in total.iter_mut().zip(mode.num_dist(bin_grid, aero_data)) {
                *sum += value;
            }
        }
        total
    }
}
