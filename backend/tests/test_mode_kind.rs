//! Tests for mode type name/ordinal mapping
//!
//! Out-of-range ordinals can only come from a broken native layer, so they
//! are injected through a stub that reports whatever ordinal it is told to.

use std::cell::Cell;

use aero_bridge_core_rs::descriptor::DescriptorReader;
use aero_bridge_core_rs::native::reference::{ReferenceAeroData, ReferenceBinGrid};
use aero_bridge_core_rs::{
    AeroMode, AeroModeNative, EntityError, KindError, ModeKind, NativeError, NativeResource,
    OrdinalKind,
};
use proptest::prelude::*;

/// Native mode layer that stores only a kind ordinal
#[derive(Default)]
struct StubModeNative {
    injected: Cell<Option<i32>>,
    destroyed: Cell<usize>,
}

impl StubModeNative {
    fn inject_ordinal(&self, ordinal: i32) {
        self.injected.set(Some(ordinal));
    }
}

impl NativeResource for StubModeNative {
    type Raw = Box<i32>;
    const FAMILY: &'static str = "stub_mode";

    fn construct(&self) -> Box<i32> {
        Box::new(0)
    }

    fn destroy(&self, _raw: Box<i32>) {
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

impl AeroModeNative for StubModeNative {
    type AeroData = ReferenceAeroData;
    type BinGrid = ReferenceBinGrid;

    fn from_descriptor(
        &self,
        _raw: &mut Box<i32>,
        _aero_data: &<ReferenceAeroData as NativeResource>::Raw,
        _reader: &DescriptorReader<'_>,
    ) -> Result<(), NativeError> {
        Ok(())
    }

    fn num_conc(&self, _raw: &Box<i32>) -> f64 {
        0.0
    }
    fn set_num_conc(&self, _raw: &mut Box<i32>, _value: f64) {}
    fn char_radius(&self, _raw: &Box<i32>) -> f64 {
        0.0
    }
    fn set_char_radius(&self, _raw: &mut Box<i32>, _value: f64) {}
    fn gsd(&self, _raw: &Box<i32>) -> f64 {
        1.0
    }
    fn set_gsd(&self, _raw: &mut Box<i32>, _value: f64) {}

    fn n_spec(&self, _raw: &Box<i32>) -> usize {
        0
    }
    fn vol_frac(&self, _raw: &Box<i32>, _out: &mut [f64]) {}
    fn set_vol_frac(&self, _raw: &mut Box<i32>, _data: &[f64]) {}
    fn vol_frac_std(&self, _raw: &Box<i32>, _out: &mut [f64]) {}
    fn set_vol_frac_std(&self, _raw: &mut Box<i32>, _data: &[f64]) {}

    fn kind_ordinal(&self, raw: &Box<i32>) -> i32 {
        self.injected.get().unwrap_or(**raw)
    }
    fn set_kind_ordinal(&self, raw: &mut Box<i32>, ordinal: i32) {
        **raw = ordinal;
    }

    fn name(&self, _raw: &Box<i32>) -> Box<[u8]> {
        Box::new([0xff, 0xfe])
    }
    fn set_name(&self, _raw: &mut Box<i32>, _bytes: &[u8]) {}

    fn sample_bins(&self, _raw: &Box<i32>) -> usize {
        0
    }
    fn sample_radius(&self, _raw: &Box<i32>, _out: &mut [f64]) {}
    fn sample_num_conc(&self, _raw: &Box<i32>, _out: &mut [f64]) {}
    fn set_sampled(&self, _raw: &mut Box<i32>, _diams: &[f64], _num_concs: &[f64]) {}

    fn num_dist(
        &self,
        _raw: &Box<i32>,
        _bin_grid: &<ReferenceBinGrid as NativeResource>::Raw,
        _aero_data: &<ReferenceAeroData as NativeResource>::Raw,
        _out: &mut [f64],
    ) {
    }
}

#[test]
fn test_every_name_round_trips() {
    let native = StubModeNative::default();
    let mut mode = AeroMode::new(&native);

    for name in ModeKind::NAMES {
        mode.set_kind(name).unwrap();
        assert_eq!(mode.kind().unwrap(), *name);
    }
}

#[test]
fn test_unknown_name_leaves_kind_unchanged() {
    let native = StubModeNative::default();
    let mut mode = AeroMode::new(&native);
    mode.set_kind("exp").unwrap();

    let err = mode.set_kind("lognormal").unwrap_err();

    assert!(matches!(
        err,
        EntityError::Kind(KindError::InvalidArgument { ref name, .. }) if name == "lognormal"
    ));
    assert!(!err.is_fatal());
    assert_eq!(mode.kind().unwrap(), "exp");
}

#[test]
fn test_ordinal_zero_is_internal_consistency_error() {
    let native = StubModeNative::default();
    let mode = AeroMode::new(&native);
    native.inject_ordinal(0);

    let err = mode.kind().unwrap_err();
    assert_eq!(
        err,
        EntityError::Kind(KindError::InternalConsistency {
            family: "mode type",
            ordinal: 0,
            max: 4,
        })
    );
    assert!(err.is_fatal());
}

#[test]
fn test_ordinal_past_end_is_internal_consistency_error() {
    let native = StubModeNative::default();
    let mode = AeroMode::new(&native);
    native.inject_ordinal(ModeKind::ALL.len() as i32 + 1);

    assert!(mode.kind().unwrap_err().is_fatal());
}

#[test]
fn test_invalid_utf8_name() {
    let native = StubModeNative::default();
    let mode = AeroMode::new(&native);

    assert!(matches!(
        mode.name(),
        Err(EntityError::Native(NativeError::InvalidUtf8(_)))
    ));
}

#[test]
fn test_stub_handle_destroyed_once() {
    let native = StubModeNative::default();
    {
        let mut mode = AeroMode::new(&native);
        let _ = mode.set_kind("nope");
    }
    assert_eq!(native.destroyed.get(), 1);
}

proptest! {
    #[test]
    fn prop_valid_ordinals_decode(ordinal in 1i32..=4) {
        let native = StubModeNative::default();
        let mode = AeroMode::new(&native);
        native.inject_ordinal(ordinal);

        let kind = mode.mode_kind().unwrap();
        prop_assert_eq!(kind.encode(), ordinal);
        prop_assert_eq!(ModeKind::from_name(kind.name()).unwrap(), kind);
    }

    #[test]
    fn prop_invalid_ordinals_rejected(ordinal in prop_oneof![i32::MIN..1, 5i32..i32::MAX]) {
        let native = StubModeNative::default();
        let mode = AeroMode::new(&native);
        native.inject_ordinal(ordinal);

        prop_assert!(mode.kind().unwrap_err().is_fatal());
    }

    #[test]
    fn prop_unknown_names_rejected(name in "[a-z_]{1,12}") {
        prop_assume!(!ModeKind::NAMES.contains(&name.as_str()));
        let native = StubModeNative::default();
        let mut mode = AeroMode::new(&native);
        mode.set_kind("mono").unwrap();

        let is_invalid = matches!(
            mode.set_kind(&name),
            Err(EntityError::Kind(KindError::InvalidArgument { .. }))
        );
        prop_assert!(is_invalid);
        prop_assert_eq!(mode.kind().unwrap(), "mono");
    }
}
