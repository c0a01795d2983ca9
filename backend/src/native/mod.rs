//! Native layer contract
//!
//! Every entity family talks to the numerical library through one trait that
//! extends [`NativeResource`]. The call convention is the same for every
//! property:
//!
//! - scalar read takes `&Raw`, scalar write takes `&mut Raw`
//! - array read is a length query followed by a fill of an exactly sized slice
//! - array write passes a slice whose length the host already checked
//! - strings come back as an owned byte buffer the caller releases
//! - kind tags cross as 1-based `i32` ordinals
//!
//! Implementations may assume the host upholds the length contracts: a fill
//! slice always has the length the matching query returned.
//!
//! The [`reference`] module provides an in-process implementation.

pub mod reference;

use thiserror::Error;

use crate::core::handle::NativeResource;
use crate::descriptor::reader::DescriptorReader;

/// Failures reported by the native layer
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NativeError {
    #[error("Missing required parameter '{key}'")]
    MissingParameter { key: String },

    #[error("Invalid value for parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error("Unknown species '{0}'")]
    UnknownSpecies(String),

    #[error("Unsupported {key} '{value}'")]
    Unsupported { key: String, value: String },

    #[error("Native string is not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

/// One row of the species table as handed to the native side
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesSpec {
    /// Species name (e.g. "SO4")
    pub name: String,
    /// Density (kg/m^3)
    pub density: f64,
    /// Number of ions in solution
    pub num_ions: i32,
    /// Molecular weight (kg/mol)
    pub molecular_weight: f64,
    /// Hygroscopicity parameter (1)
    pub kappa: f64,
}

/// Species-table resource
pub trait AeroDataNative: NativeResource {
    fn load_species(&self, raw: &mut Self::Raw, species: &[SpeciesSpec]);

    fn n_spec(&self, raw: &Self::Raw) -> usize;
    fn species_name(&self, raw: &Self::Raw, index: usize) -> Box<[u8]>;

    fn densities(&self, raw: &Self::Raw, out: &mut [f64]);
    fn kappa(&self, raw: &Self::Raw, out: &mut [f64]);
    fn molecular_weights(&self, raw: &Self::Raw, out: &mut [f64]);

    fn frac_dim(&self, raw: &Self::Raw) -> f64;
    fn set_frac_dim(&self, raw: &mut Self::Raw, value: f64);
    fn vol_fill_factor(&self, raw: &Self::Raw) -> f64;
    fn set_vol_fill_factor(&self, raw: &mut Self::Raw, value: f64);
    fn prime_radius(&self, raw: &Self::Raw) -> f64;
    fn set_prime_radius(&self, raw: &mut Self::Raw, value: f64);

    /// Mass-equivalent volume (m^3) to geometric radius (m)
    fn vol2rad(&self, raw: &Self::Raw, vol: f64) -> f64;
    /// Geometric radius (m) to mass-equivalent volume (m^3)
    fn rad2vol(&self, raw: &Self::Raw, radius: f64) -> f64;
}

/// Single particle resource
///
/// Species-dependent quantities take the species table the particle was
/// built against.
pub trait AeroParticleNative: NativeResource {
    type AeroData: AeroDataNative;

    /// Replace the per-species volumes; the host checked the length
    fn set_vols(&self, raw: &mut Self::Raw, volumes: &[f64]);

    fn n_spec(&self, raw: &Self::Raw) -> usize;
    fn volumes(&self, raw: &Self::Raw, out: &mut [f64]);
    fn volume(&self, raw: &Self::Raw) -> f64;
    fn species_volume(&self, raw: &Self::Raw, index: usize) -> f64;

    /// Total volume excluding water
    fn dry_volume(
        &self,
        raw: &Self::Raw,
        aero_data: &<Self::AeroData as NativeResource>::Raw,
    ) -> f64;
    fn species_masses(
        &self,
        raw: &Self::Raw,
        aero_data: &<Self::AeroData as NativeResource>::Raw,
        out: &mut [f64],
    );
}

/// Size bin grid resource
pub trait BinGridNative: NativeResource {
    /// Lay out `n_bin` bins between `min` and `max` (bin edges, m)
    fn init(&self, raw: &mut Self::Raw, n_bin: usize, kind_ordinal: i32, min: f64, max: f64);

    fn size(&self, raw: &Self::Raw) -> usize;
    fn kind_ordinal(&self, raw: &Self::Raw) -> i32;

    /// `size + 1` elements
    fn edges(&self, raw: &Self::Raw, out: &mut [f64]);
    fn centers(&self, raw: &Self::Raw, out: &mut [f64]);
    fn widths(&self, raw: &Self::Raw, out: &mut [f64]);
}

/// Aerosol mode resource
pub trait AeroModeNative: NativeResource {
    type AeroData: AeroDataNative;
    type BinGrid: BinGridNative;

    /// Populate a freshly constructed mode from a validated descriptor
    ///
    /// Every parameter must be read through `reader`; anything it does not
    /// read is reported back to the caller as unrecognised.
    fn from_descriptor(
        &self,
        raw: &mut Self::Raw,
        aero_data: &<Self::AeroData as NativeResource>::Raw,
        reader: &DescriptorReader<'_>,
    ) -> Result<(), NativeError>;

    fn num_conc(&self, raw: &Self::Raw) -> f64;
    fn set_num_conc(&self, raw: &mut Self::Raw, value: f64);
    fn char_radius(&self, raw: &Self::Raw) -> f64;
    fn set_char_radius(&self, raw: &mut Self::Raw, value: f64);
    fn gsd(&self, raw: &Self::Raw) -> f64;
    fn set_gsd(&self, raw: &mut Self::Raw, value: f64);

    fn n_spec(&self, raw: &Self::Raw) -> usize;
    fn vol_frac(&self, raw: &Self::Raw, out: &mut [f64]);
    fn set_vol_frac(&self, raw: &mut Self::Raw, data: &[f64]);
    fn vol_frac_std(&self, raw: &Self::Raw, out: &mut [f64]);
    fn set_vol_frac_std(&self, raw: &mut Self::Raw, data: &[f64]);

    fn kind_ordinal(&self, raw: &Self::Raw) -> i32;
    fn set_kind_ordinal(&self, raw: &mut Self::Raw, ordinal: i32);

    fn name(&self, raw: &Self::Raw) -> Box<[u8]>;
    fn set_name(&self, raw: &mut Self::Raw, bytes: &[u8]);

    /// Number of sample bins; radii have one more element
    fn sample_bins(&self, raw: &Self::Raw) -> usize;
    fn sample_radius(&self, raw: &Self::Raw, out: &mut [f64]);
    fn sample_num_conc(&self, raw: &Self::Raw, out: &mut [f64]);
    fn set_sampled(&self, raw: &mut Self::Raw, diams: &[f64], num_concs: &[f64]);

    /// Binned number concentration, one element per bin of `bin_grid`
    fn num_dist(
        &self,
        raw: &Self::Raw,
        bin_grid: &<Self::BinGrid as NativeResource>::Raw,
        aero_data: &<Self::AeroData as NativeResource>::Raw,
        out: &mut [f64],
    );
}
