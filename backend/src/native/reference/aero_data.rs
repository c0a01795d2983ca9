use std::f64::consts::PI;

use crate::core::handle::NativeResource;
use crate::native::{AeroDataNative, SpeciesSpec};

use super::CallCounts;

const WATER: &str = "H2O";

/// Species-table state behind one handle
#[derive(Debug)]
pub struct AeroDataState {
    pub(super) species: Vec<SpeciesSpec>,
    frac_dim: f64,
    vol_fill_factor: f64,
    prime_radius: f64,
}

impl Default for AeroDataState {
    fn default() -> Self {
        Self {
            species: Vec::new(),
            frac_dim: 3.0,
            vol_fill_factor: 1.0,
            prime_radius: 1e-8,
        }
    }
}

impl AeroDataState {
    #[cfg(test)]
    pub(super) fn with_species(species: Vec<SpeciesSpec>) -> Self {
        Self {
            species,
            ..Self::default()
        }
    }

    /// Index of water, excluded from dry quantities
    pub(super) fn water_index(&self) -> Option<usize> {
        self.species.iter().position(|spec| spec.name == WATER)
    }

    /// Volume of one primary particle (m^3)
    fn prime_volume(&self) -> f64 {
        4.0 / 3.0 * PI * self.prime_radius.powi(3)
    }

    pub(super) fn density_of(&self, name: &str) -> Option<(usize, f64)> {
        self.species
            .iter()
            .position(|spec| spec.name == name)
            .map(|i| (i, self.species[i].density))
    }
}

#[derive(Debug, Default)]
pub struct ReferenceAeroData {
    calls: CallCounts,
}

impl ReferenceAeroData {
    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }
}

impl NativeResource for ReferenceAeroData {
    type Raw = Box<AeroDataState>;
    const FAMILY: &'static str = "aero_data";

    fn construct(&self) -> Self::Raw {
        self.calls.record_construct();
        Box::default()
    }

    fn destroy(&self, raw: Self::Raw) {
        self.calls.record_destroy();
        drop(raw);
    }
}

fn fill_column(raw: &AeroDataState, out: &mut [f64], column: fn(&SpeciesSpec) -> f64) {
    for (slot, spec) in out.iter_mut().zip(&raw.species) {
        *slot = column(spec);
    }
}

impl AeroDataNative for ReferenceAeroData {
    fn load_species(&self, raw: &mut Self::Raw, species: &[SpeciesSpec]) {
        raw.species = species.to_vec();
    }

    fn n_spec(&self, raw: &Self::Raw) -> usize {
        raw.species.len()
    }

    fn species_name(&self, raw: &Self::Raw, index: usize) -> Box<[u8]> {
        raw.species
            .get(index)
            .map(|spec| spec.name.as_bytes().into())
            .unwrap_or_default()
    }

    fn densities(&self, raw: &Self::Raw, out: &mut [f64]) {
        fill_column(raw, out, |spec| spec.density);
    }

    fn kappa(&self, raw: &Self::Raw, out: &mut [f64]) {
        fill_column(raw, out, |spec| spec.kappa);
    }

    fn molecular_weights(&self, raw: &Self::Raw, out: &mut [f64]) {
        fill_column(raw, out, |spec| spec.molecular_weight);
    }

    fn frac_dim(&self, raw: &Self::Raw) -> f64 {
        raw.frac_dim
    }

    fn set_frac_dim(&self, raw: &mut Self::Raw, value: f64) {
        raw.frac_dim = value;
    }

    fn vol_fill_factor(&self, raw: &Self::Raw) -> f64 {
        raw.vol_fill_factor
    }

    fn set_vol_fill_factor(&self, raw: &mut Self::Raw, value: f64) {
        raw.vol_fill_factor = value;
    }

    fn prime_radius(&self, raw: &Self::Raw) -> f64 {
        raw.prime_radius
    }

    fn set_prime_radius(&self, raw: &mut Self::Raw, value: f64) {
        raw.prime_radius = value;
    }

    // Fractal aggregate of N primaries: r = r_prime * (N * fill)^(1 / frac_dim)
    fn vol2rad(&self, raw: &Self::Raw, vol: f64) -> f64 {
        let n_prime = vol / raw.prime_volume();
        raw.prime_radius * (n_prime * raw.vol_fill_factor).powf(raw.frac_dim.recip())
    }

    fn rad2vol(&self, raw: &Self::Raw, radius: f64) -> f64 {
        let n_prime = (radius / raw.prime_radius).powf(raw.frac_dim) / raw.vol_fill_factor;
        n_prime * raw.prime_volume()
    }
}
