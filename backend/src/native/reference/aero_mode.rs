use std::f64::consts::PI;

use crate::core::handle::NativeResource;
use crate::core::kind::{ModeKind, OrdinalKind};
use crate::descriptor::reader::DescriptorReader;
use crate::descriptor::schema::{DIAMETER_KEYS, NUM_CONC_KEY};
use crate::native::{AeroModeNative, NativeError};

use super::{AeroDataState, BinGridState, CallCounts, ReferenceAeroData, ReferenceBinGrid};

/// Aerosol mode state behind one handle
///
/// A fresh mode has no species, no samples and kind ordinal 0 (unset).
#[derive(Debug)]
pub struct ModeState {
    name: Vec<u8>,
    kind_ordinal: i32,
    num_conc: f64,
    char_radius: f64,
    gsd: f64,
    vol_frac: Vec<f64>,
    vol_frac_std: Vec<f64>,
    sample_radius: Vec<f64>,
    sample_num_conc: Vec<f64>,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            name: Vec::new(),
            kind_ordinal: 0,
            num_conc: 0.0,
            char_radius: 0.0,
            gsd: 1.0,
            vol_frac: Vec::new(),
            vol_frac_std: Vec::new(),
            sample_radius: Vec::new(),
            sample_num_conc: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ReferenceAeroMode {
    calls: CallCounts,
}

impl ReferenceAeroMode {
    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }
}

impl NativeResource for ReferenceAeroMode {
    type Raw = Box<ModeState>;
    const FAMILY: &'static str = "aero_mode";

    fn construct(&self) -> Self::Raw {
        self.calls.record_construct();
        Box::default()
    }

    fn destroy(&self, raw: Self::Raw) {
        self.calls.record_destroy();
        drop(raw);
    }
}

/// Convert per-species mass fractions (and optional std devs) to volume
/// fractions over the whole species table
fn mass_to_vol_frac(
    aero_data: &AeroDataState,
    rows: &[(&str, Vec<f64>)],
) -> Result<(Vec<f64>, Vec<f64>), NativeError> {
    let n_spec = aero_data.species.len();
    let mut vol = vec![0.0; n_spec];
    let mut vol_std = vec![0.0; n_spec];

    for (name, values) in rows {
        let (index, density) = aero_data
            .density_of(name)
            .ok_or_else(|| NativeError::UnknownSpecies(name.to_string()))?;
        let (frac, std) = match values.as_slice() {
            [frac] => (*frac, 0.0),
            [frac, std] => (*frac, *std),
            _ => {
                return Err(NativeError::InvalidParameter {
                    key: format!("mass_frac.{}", name),
                    reason: "expected a fraction or [fraction, std]".to_string(),
                })
            }
        };
        if frac < 0.0 || std < 0.0 {
            return Err(NativeError::InvalidParameter {
                key: format!("mass_frac.{}", name),
                reason: "fractions must be non-negative".to_string(),
            });
        }
        vol[index] = frac / density;
        vol_std[index] = std / density;
    }

    let total: f64 = vol.iter().sum();
    if !(total > 0.0) {
        return Err(NativeError::InvalidParameter {
            key: "mass_frac".to_string(),
            reason: "fractions must not all be zero".to_string(),
        });
    }
    vol.iter_mut().chain(vol_std.iter_mut()).for_each(|v| *v /= total);
    Ok((vol, vol_std))
}

fn read_diam_type(reader: &DescriptorReader<'_>) -> Result<(), NativeError> {
    if !reader.contains("diam_type") {
        return Ok(());
    }
    match reader.read_string("diam_type")? {
        "geometric" => Ok(()),
        other => Err(NativeError::Unsupported {
            key: "diam_type".to_string(),
            value: other.to_string(),
        }),
    }
}

impl AeroModeNative for ReferenceAeroMode {
    type AeroData = ReferenceAeroData;
    type BinGrid = ReferenceBinGrid;

    fn from_descriptor(
        &self,
        raw: &mut Self::Raw,
        aero_data: &Box<AeroDataState>,
        reader: &DescriptorReader<'_>,
    ) -> Result<(), NativeError> {
        let mode_type = reader.read_string("mode_type")?;
        let kind = ModeKind::from_name(mode_type).map_err(|_| NativeError::Unsupported {
            key: "mode_type".to_string(),
            value: mode_type.to_string(),
        })?;

        let rows = reader.read_named_values("mass_frac")?;
        let (vol_frac, vol_frac_std) = mass_to_vol_frac(aero_data, &rows)?;

        let mut state = ModeState {
            name: reader.entity_name().as_bytes().to_vec(),
            kind_ordinal: kind.encode(),
            vol_frac,
            vol_frac_std,
            ..ModeState::default()
        };

        match kind {
            ModeKind::LogNormal => {
                read_diam_type(reader)?;
                state.num_conc = reader.read_real("num_conc")?;
                state.char_radius = reader.read_real("geom_mean_diam")? / 2.0;
                state.gsd = 10f64.powf(reader.read_real("log10_geom_std_dev")?);
            }
            ModeKind::Exp => {
                read_diam_type(reader)?;
                state.num_conc = reader.read_real("num_conc")?;
                state.char_radius = reader.read_real("diam_at_mean_vol")? / 2.0;
            }
            ModeKind::Mono => {
                read_diam_type(reader)?;
                state.num_conc = reader.read_real("num_conc")?;
                state.char_radius = reader.read_real("diam")? / 2.0;
            }
            ModeKind::Sampled => {
                let diams = reader.read_table_column("size_dist", 0, DIAMETER_KEYS)?;
                let num_concs = reader.read_table_column("size_dist", 1, &[NUM_CONC_KEY])?;
                if diams.len() != num_concs.len() + 1 {
                    return Err(NativeError::InvalidParameter {
                        key: "size_dist".to_string(),
                        reason: "num_conc must have one element fewer than diam".to_string(),
                    });
                }
                state.num_conc = num_concs.iter().sum();
                state.sample_radius = diams.iter().map(|d| d / 2.0).collect();
                state.sample_num_conc = num_concs;
            }
        }

        **raw = state;
        Ok(())
    }

    fn num_conc(&self, raw: &Self::Raw) -> f64 {
        raw.num_conc
    }

    fn set_num_conc(&self, raw: &mut Self::Raw, value: f64) {
        raw.num_conc = value;
    }

    fn char_radius(&self, raw: &Self::Raw) -> f64 {
        raw.char_radius
    }

    fn set_char_radius(&self, raw: &mut Self::Raw, value: f64) {
        raw.char_radius = value;
    }

    fn gsd(&self, raw: &Self::Raw) -> f64 {
        raw.gsd
    }

    fn set_gsd(&self, raw: &mut Self::Raw, value: f64) {
        raw.gsd = value;
    }

    fn n_spec(&self, raw: &Self::Raw) -> usize {
        raw.vol_frac.len()
    }

    fn vol_frac(&self, raw: &Self::Raw, out: &mut [f64]) {
        out.copy_from_slice(&raw.vol_frac);
    }

    fn set_vol_frac(&self, raw: &mut Self::Raw, data: &[f64]) {
        raw.vol_frac.copy_from_slice(data);
    }

    fn vol_frac_std(&self, raw: &Self::Raw, out: &mut [f64]) {
        out.copy_from_slice(&raw.vol_frac_std);
    }

    fn set_vol_frac_std(&self, raw: &mut Self::Raw, data: &[f64]) {
        raw.vol_frac_std.copy_from_slice(data);
    }

    fn kind_ordinal(&self, raw: &Self::Raw) -> i32 {
        raw.kind_ordinal
    }

    fn set_kind_ordinal(&self, raw: &mut Self::Raw, ordinal: i32) {
        raw.kind_ordinal = ordinal;
    }

    fn name(&self, raw: &Self::Raw) -> Box<[u8]> {
        raw.name.clone().into_boxed_slice()
    }

    fn set_name(&self, raw: &mut Self::Raw, bytes: &[u8]) {
        raw.name = bytes.to_vec();
    }

    fn sample_bins(&self, raw: &Self::Raw) -> usize {
        raw.sample_num_conc.len()
    }

    fn sample_radius(&self, raw: &Self::Raw, out: &mut [f64]) {
        // A mode without samples has no edges either, but reports one slot
        for (slot, radius) in out.iter_mut().zip(&raw.sample_radius) {
            *slot = *radius;
        }
    }

    fn sample_num_conc(&self, raw: &Self::Raw, out: &mut [f64]) {
        out.copy_from_slice(&raw.sample_num_conc);
    }

    fn set_sampled(&self, raw: &mut Self::Raw, diams: &[f64], num_concs: &[f64]) {
        raw.sample_radius = diams.iter().map(|d| d / 2.0).collect();
        raw.sample_num_conc = num_concs.to_vec();
    }

    fn num_dist(
        &self,
        raw: &Self::Raw,
        bin_grid: &Box<BinGridState>,
        _aero_data: &Box<AeroDataState>,
        out: &mut [f64],
    ) {
        out.fill(0.0);
        let Ok(kind) = ModeKind::decode(raw.kind_ordinal) else {
            return;
        };

        match kind {
            ModeKind::LogNormal => {
                let log10_sigma = raw.gsd.log10();
                if !(log10_sigma > 0.0) || !(raw.char_radius > 0.0) {
                    return;
                }
                let log10_rc = raw.char_radius.log10();
                for (slot, center) in out.iter_mut().zip(&bin_grid.centers) {
                    let z = (center.log10() - log10_rc) / log10_sigma;
                    *slot = raw.num_conc / ((2.0 * PI).sqrt() * log10_sigma)
                        * (-z * z / 2.0).exp()
                        / 10f64.ln();
                }
            }
            ModeKind::Exp => {
                let mean_vol = 4.0 / 3.0 * PI * raw.char_radius.powi(3);
                if !(mean_vol > 0.0) {
                    return;
                }
                for (slot, center) in out.iter_mut().zip(&bin_grid.centers) {
                    let vol = 4.0 / 3.0 * PI * center.powi(3);
                    *slot = raw.num_conc * 3.0 * vol / mean_vol * (-vol / mean_vol).exp();
                }
            }
            ModeKind::Mono => {
                if let Some(k) = bin_grid.find(raw.char_radius) {
                    out[k] = raw.num_conc / bin_grid.widths[k];
                }
            }
            ModeKind::Sampled => {
                for (edges, num_conc) in raw.sample_radius.windows(2).zip(&raw.sample_num_conc) {
                    let mid = (edges[0] * edges[1]).sqrt();
                    if let Some(k) = bin_grid.find(mid) {
                        out[k] += num_conc / bin_grid.widths[k];
                    }
                }
            }
        }
    }
}
