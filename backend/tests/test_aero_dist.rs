//! Tests for AeroDist construction
//!
//! A distribution either owns every mode it was given or none of them.

use aero_bridge_core_rs::native::reference::ReferenceLibrary;
use aero_bridge_core_rs::{AeroData, AeroDist, BinGrid, EntityError, NativeError, ValidationError};
use serde_json::{json, Value};

fn species_table() -> Value {
    json!([
        {"SO4": [1800, 0, 96e-3, 0.65]},
        {"NH4": [1800, 0, 18e-3, 0.65]}
    ])
}

fn mono(species: &str, num_conc: f64, diam: f64) -> Value {
    json!({
        "mass_frac": [{species: 1}],
        "mode_type": "mono",
        "num_conc": num_conc,
        "diam": diam
    })
}

#[test]
fn test_dist_modes() {
    let lib = ReferenceLibrary::default();
    let aero_data = AeroData::from_descriptor(&lib.aero_data, &species_table()).unwrap();

    let dist = AeroDist::from_descriptor(
        &lib.aero_mode,
        &aero_data,
        &json!([
            {"aitken": mono("SO4", 1000.0, 2e-8)},
            {"accumulation": mono("NH4", 50.0, 2e-7)}
        ]),
    )
    .unwrap();

    assert_eq!(dist.n_mode(), 2);
    assert_eq!(dist.num_conc(), 1050.0);
    assert_eq!(dist.mode(0).unwrap().name().unwrap(), "aitken");
    assert_eq!(dist.mode(1).unwrap().vol_frac(), vec![0.0, 1.0]);
    assert_eq!(dist.modes().count(), 2);
    assert!(matches!(dist.mode(2), Err(EntityError::InvalidArgument(_))));
}

#[test]
fn test_empty_dist() {
    let lib = ReferenceLibrary::default();
    let aero_data = AeroData::from_descriptor(&lib.aero_data, &species_table()).unwrap();

    let dist = AeroDist::from_descriptor(&lib.aero_mode, &aero_data, &json!([])).unwrap();

    assert_eq!(dist.n_mode(), 0);
    assert_eq!(dist.num_conc(), 0.0);
    assert_eq!(lib.aero_mode.calls().constructed(), 0);
}

#[test]
fn test_invalid_mode_constructs_nothing() {
    let lib = ReferenceLibrary::default();
    let aero_data = AeroData::from_descriptor(&lib.aero_data, &species_table()).unwrap();

    let result = AeroDist::from_descriptor(
        &lib.aero_mode,
        &aero_data,
        &json!([
            {"a": mono("SO4", 1.0, 1e-7)},
            {"b": {"mode_type": "mono"}}
        ]),
    );

    assert_eq!(
        result.unwrap_err().to_string(),
        "Invalid descriptor: mode parameters dict must include key 'mass_frac'"
    );
    assert_eq!(lib.aero_mode.calls().constructed(), 0);
}

#[test]
fn test_native_failure_releases_earlier_modes() {
    let lib = ReferenceLibrary::default();
    let aero_data = AeroData::from_descriptor(&lib.aero_data, &species_table()).unwrap();

    let result = AeroDist::from_descriptor(
        &lib.aero_mode,
        &aero_data,
        &json!([
            {"a": mono("SO4", 1.0, 1e-7)},
            {"b": mono("NH4", 1.0, 1e-7)},
            {"c": mono("NO3", 1.0, 1e-7)}
        ]),
    );

    assert_eq!(
        result.unwrap_err(),
        EntityError::Native(NativeError::UnknownSpecies("NO3".to_string()))
    );
    assert_eq!(lib.aero_mode.calls().constructed(), 3);
    assert_eq!(lib.aero_mode.calls().destroyed(), 3);
}

#[test]
fn test_leftover_key_releases_earlier_modes() {
    let lib = ReferenceLibrary::default();
    let aero_data = AeroData::from_descriptor(&lib.aero_data, &species_table()).unwrap();
    let mut with_typo = mono("NH4", 1.0, 1e-7);
    with_typo["nm_conc"] = json!(3.0);

    let result = AeroDist::from_descriptor(
        &lib.aero_mode,
        &aero_data,
        &json!([
            {"a": mono("SO4", 1.0, 1e-7)},
            {"b": with_typo}
        ]),
    );

    assert_eq!(
        result.unwrap_err(),
        EntityError::Validation(ValidationError::UnrecognizedKeys(vec!["nm_conc".to_string()]))
    );
    assert_eq!(lib.aero_mode.calls().constructed(), 2);
    assert_eq!(lib.aero_mode.calls().live(), 0);
}

#[test]
fn test_dropping_dist_releases_every_mode() {
    let lib = ReferenceLibrary::default();
    let aero_data = AeroData::from_descriptor(&lib.aero_data, &species_table()).unwrap();
    {
        let dist = AeroDist::from_descriptor(
            &lib.aero_mode,
            &aero_data,
            &json!([
                {"a": mono("SO4", 1.0, 1e-7)},
                {"b": mono("NH4", 2.0, 1e-7)}
            ]),
        )
        .unwrap();
        assert_eq!(dist.n_mode(), 2);
        assert_eq!(lib.aero_mode.calls().live(), 2);
    }
    assert_eq!(lib.aero_mode.calls().destroyed(), 2);
}

#[test]
fn test_num_dist_sums_modes() {
    let lib = ReferenceLibrary::default();
    let aero_data = AeroData::from_descriptor(&lib.aero_data, &species_table()).unwrap();
    let grid = BinGrid::new(&lib.bin_grid, 10, "log", 1e-9, 1e-5).unwrap();

    let dist = AeroDist::from_descriptor(
        &lib.aero_mode,
        &aero_data,
        &json!([
            {"a": mono("SO4", 100.0, 2e-8)},
            {"b": mono("NH4", 10.0, 2e-6)}
        ]),
    )
    .unwrap();

    let expected: Vec<f64> = dist
        .mode(0)
        .unwrap()
        .num_dist(&grid, &aero_data)
        .iter()
        .zip(dist.mode(1).unwrap().num_dist(&grid, &aero_data))
        .map(|(a, b)| a + b)
        .collect();
    assert_eq!(dist.num_dist(&grid, &aero_data), expected);
    assert_eq!(expected.iter().filter(|v| **v > 0.0).count(), 2);
}
