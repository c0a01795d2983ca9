use crate::core::handle::NativeResource;
use crate::native::AeroParticleNative;

use super::{AeroDataState, CallCounts, ReferenceAeroData};

/// Particle state behind one handle: one volume per species (m^3)
#[derive(Debug, Default)]
pub struct ParticleState {
    vol: Vec<f64>,
}

#[derive(Debug, Default)]
pub struct ReferenceAeroParticle {
    calls: CallCounts,
}

impl ReferenceAeroParticle {
    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }
}

impl NativeResource for ReferenceAeroParticle {
    type Raw = Box<ParticleState>;
    const FAMILY: &'static str = "aero_particle";

    fn construct(&self) -> Self::Raw {
        self.calls.record_construct();
        Box::default()
    }

    fn destroy(&self, raw: Self::Raw) {
        self.calls.record_destroy();
        drop(raw);
    }
}

impl AeroParticleNative for ReferenceAeroParticle {
    type AeroData = ReferenceAeroData;

    fn set_vols(&self, raw: &mut Self::Raw, volumes: &[f64]) {
        raw.vol = volumes.to_vec();
    }

    fn n_spec(&self, raw: &Self::Raw) -> usize {
        raw.vol.len()
    }

    fn volumes(&self, raw: &Self::Raw, out: &mut [f64]) {
        out.copy_from_slice(&raw.vol);
    }

    fn volume(&self, raw: &Self::Raw) -> f64 {
        raw.vol.iter().sum()
    }

    fn species_volume(&self, raw: &Self::Raw, index: usize) -> f64 {
        raw.vol.get(index).copied().unwrap_or_default()
    }

    fn dry_volume(&self, raw: &Self::Raw, aero_data: &Box<AeroDataState>) -> f64 {
        let water = aero_data.water_index();
        raw.vol
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != water)
            .map(|(_, vol)| vol)
            .sum()
    }

    fn species_masses(&self, raw: &Self::Raw, aero_data: &Box<AeroDataState>, out: &mut [f64]) {
        for ((slot, vol), spec) in out.iter_mut().zip(&raw.vol).zip(&aero_data.species) {
            *slot = vol * spec.density;
        }
    }
}
