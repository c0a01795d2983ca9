//! Tests for the species table

use aero_bridge_core_rs::native::reference::ReferenceAeroData;
use aero_bridge_core_rs::{AeroData, EntityError, ValidationError};
use serde_json::json;

fn three_species(native: &ReferenceAeroData) -> AeroData<'_, ReferenceAeroData> {
    AeroData::from_descriptor(
        native,
        &json!([
            {"H2O": [1000, 0, 18e-3, 0]},
            {"Cl": [2200, 1, 35.5e-3, 0]},
            {"Na": [2160, 1, 23e-3, 0.5]}
        ]),
    )
    .unwrap()
}

#[test]
fn test_species_properties() {
    let native = ReferenceAeroData::default();
    let aero_data = three_species(&native);

    assert_eq!(aero_data.len(), 3);
    assert!(!aero_data.is_empty());
    assert_eq!(aero_data.species().unwrap(), vec!["H2O", "Cl", "Na"]);
    assert_eq!(aero_data.densities(), vec![1000.0, 2200.0, 2160.0]);
    assert_eq!(aero_data.molecular_weights(), vec![18e-3, 35.5e-3, 23e-3]);
    assert_eq!(aero_data.kappa(), vec![0.0, 0.0, 0.5]);
}

#[test]
fn test_spec_by_name() {
    let native = ReferenceAeroData::default();
    let aero_data = three_species(&native);

    assert_eq!(aero_data.spec_by_name("H2O").unwrap(), 0);
    assert_eq!(aero_data.spec_by_name("Na").unwrap(), 2);
    assert_eq!(aero_data.density("Cl").unwrap(), 2200.0);
    assert!(matches!(
        aero_data.spec_by_name("XX"),
        Err(EntityError::InvalidArgument(_))
    ));
}

#[test]
fn test_scalar_properties() {
    let native = ReferenceAeroData::default();
    let mut aero_data = three_species(&native);

    assert_eq!(aero_data.frac_dim(), 3.0);
    assert_eq!(aero_data.vol_fill_factor(), 1.0);
    assert_eq!(aero_data.prime_radius(), 1e-8);

    aero_data.set_frac_dim(2.5);
    aero_data.set_vol_fill_factor(1.43);
    aero_data.set_prime_radius(3e-8);

    assert_eq!(aero_data.frac_dim(), 2.5);
    assert_eq!(aero_data.vol_fill_factor(), 1.43);
    assert_eq!(aero_data.prime_radius(), 3e-8);
}

#[test]
fn test_empty_table() {
    let native = ReferenceAeroData::default();
    let aero_data = AeroData::from_descriptor(&native, &json!([])).unwrap();

    assert!(aero_data.is_empty());
    assert!(aero_data.densities().is_empty());
}

#[test]
fn test_invalid_table_constructs_nothing() {
    let native = ReferenceAeroData::default();
    let result = AeroData::from_descriptor(&native, &json!([{"H2O": [1000, 0]}]));

    assert!(matches!(
        result,
        Err(EntityError::Validation(ValidationError::LengthRelation { .. }))
    ));
    assert_eq!(native.calls().constructed(), 0);
}
