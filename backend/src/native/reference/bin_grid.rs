use crate::core::handle::NativeResource;
use crate::core::kind::{GridKind, OrdinalKind};
use crate::native::BinGridNative;

use super::CallCounts;

/// Bin grid state behind one handle
#[derive(Debug, Default)]
pub struct BinGridState {
    kind_ordinal: i32,
    pub(super) edges: Vec<f64>,
    pub(super) centers: Vec<f64>,
    pub(super) widths: Vec<f64>,
}

impl BinGridState {
    /// Index of the bin holding `radius`, if any
    pub(super) fn find(&self, radius: f64) -> Option<usize> {
        let last = self.edges.len().checked_sub(1)?;
        if radius < self.edges[0] || radius > self.edges[last] {
            return None;
        }
        let upper = self.edges.partition_point(|edge| *edge <= radius);
        Some(upper.saturating_sub(1).min(last.saturating_sub(1)))
    }
}

#[derive(Debug, Default)]
pub struct ReferenceBinGrid {
    calls: CallCounts,
}

impl ReferenceBinGrid {
    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }
}

impl NativeResource for ReferenceBinGrid {
    type Raw = Box<BinGridState>;
    const FAMILY: &'static str = "bin_grid";

    fn construct(&self) -> Self::Raw {
        self.calls.record_construct();
        Box::default()
    }

    fn destroy(&self, raw: Self::Raw) {
        self.calls.record_destroy();
        drop(raw);
    }
}

impl BinGridNative for ReferenceBinGrid {
    fn init(&self, raw: &mut Self::Raw, n_bin: usize, kind_ordinal: i32, min: f64, max: f64) {
        let log = GridKind::decode(kind_ordinal) == Ok(GridKind::Log);
        let step = |i: usize| i as f64 / n_bin as f64;

        raw.kind_ordinal = kind_ordinal;
        raw.edges = (0..=n_bin)
            .map(|i| {
                if log {
                    (min.ln() + (max.ln() - min.ln()) * step(i)).exp()
                } else {
                    min + (max - min) * step(i)
                }
            })
            .collect();
        raw.centers = raw
            .edges
            .windows(2)
            .map(|w| if log { (w[0] * w[1]).sqrt() } else { (w[0] + w[1]) / 2.0 })
            .collect();
        raw.widths = raw
            .edges
            .windows(2)
            .map(|w| if log { (w[1] / w[0]).ln() } else { w[1] - w[0] })
            .collect();
    }

    fn size(&self, raw: &Self::Raw) -> usize {
        raw.centers.len()
    }

    fn kind_ordinal(&self, raw: &Self::Raw) -> i32 {
        raw.kind_ordinal
    }

    fn edges(&self, raw: &Self::Raw, out: &mut [f64]) {
        out.copy_from_slice(&raw.edges);
    }

    fn centers(&self, raw: &Self::Raw, out: &mut [f64]) {
        out.copy_from_slice(&raw.centers);
    }

    fn widths(&self, raw: &Self::Raw, out: &mut [f64]) {
        out.copy_from_slice(&raw.widths);
    }
}
