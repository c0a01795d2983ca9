// Descriptor validation
//
// Runs in full before any native constructor is called:
// - Document shape (single-key dict of name -> params)
// - Required keys
// - Per-key value shapes
// - Key uniqueness inside composition lists
// - Conditional rules keyed by the mode type tag
//
// The post-construction audit lives in `reader.rs`; it shares the error type.

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;

use super::schema::{KeyRule, Schema, Shape, MODE_SCHEMA};
use crate::native::SpeciesSpec;

/// Validation errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0}")]
    Shape(String),

    #[error("{subject} must include key '{key}'")]
    MissingKey { subject: String, key: String },

    #[error("{field} must have {expected} elements, got {actual}")]
    LengthRelation {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("{field} keys must be unique, '{key}' appears more than once")]
    DuplicateKey { field: String, key: String },

    #[error("Unrecognized parameters: {}", .0.join(", "))]
    UnrecognizedKeys(Vec<String>),
}

impl ValidationError {
    /// Key named by a missing-key error
    pub fn missing_key(&self) -> Option<&str> {
        match self {
            ValidationError::MissingKey { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// A mode descriptor that passed validation
///
/// Borrows the document it was validated from; nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct ModeDescriptor<'a> {
    pub name: &'a str,
    pub params: &'a Map<String, Value>,
}

impl<'a> ModeDescriptor<'a> {
    pub fn mode_type(&self) -> Option<&'a str> {
        self.params.get("mode_type").and_then(Value::as_str)
    }
}

/// Validate a mode descriptor `{"<name>": {<params>}}`
///
/// # Example
///
/// ```rust
/// use aero_bridge_core_rs::descriptor::validate_mode;
/// use serde_json::json;
///
/// let doc = json!({"modeA": {
///     "mode_type": "sampled",
///     "mass_frac": [{"SO4": 1.0}],
///     "size_dist": [{"diameter": [1, 2, 3]}, {"num_conc": [10, 20]}]
/// }});
///
/// let mode = validate_mode(&doc).unwrap();
/// assert_eq!(mode.name, "modeA");
/// assert_eq!(mode.mode_type(), Some("sampled"));
/// ```
pub fn validate_mode(document: &Value) -> Result<ModeDescriptor<'_>, ValidationError> {
    let (name, params) = single_entry(document)?;
    validate_params(params, &MODE_SCHEMA)?;
    Ok(ModeDescriptor { name, params })
}

/// Validate a distribution `[{"<mode>": {<params>}}, ...]`
///
/// Every mode is validated before any is returned; mode names must be
/// pairwise unique.
pub fn validate_dist(document: &Value) -> Result<Vec<ModeDescriptor<'_>>, ValidationError> {
    if !Shape::SingleKeyMapList.matches(document) {
        return Err(ValidationError::Shape(format!(
            "distribution must be {}",
            Shape::SingleKeyMapList.describe()
        )));
    }
    check_unique_keys("modes", document)?;

    document
        .as_array()
        .into_iter()
        .flatten()
        .map(|entry| {
            let (name, params) = single_entry(entry)?;
            validate_params(params, &MODE_SCHEMA)?;
            Ok(ModeDescriptor { name, params })
        })
        .collect()
}

fn single_entry(document: &Value) -> Result<(&str, &Map<String, Value>), ValidationError> {
    let shape_error = || {
        ValidationError::Shape(
            "Single-element dict expected with mode name as key and mode params dict as value"
                .to_string(),
        )
    };

    let map = document.as_object().ok_or_else(shape_error)?;
    if map.len() != 1 {
        return Err(shape_error());
    }
    let (name, params) = map.iter().next().ok_or_else(shape_error)?;
    let params = params.as_object().ok_or_else(shape_error)?;
    Ok((name.as_str(), params))
}

/// Run every rule of `schema` against `params`, in order
///
/// 1. presence of every required key
/// 2. shape of every required key
/// 3. uniqueness of entry keys in the listed fields
/// 4. each active conditional rule: presence, shape, cross-field check
pub fn validate_params(
    params: &Map<String, Value>,
    schema: &Schema,
) -> Result<(), ValidationError> {
    check_required(params, schema.subject, schema.required)?;

    for key in schema.unique_keys {
        if let Some(entries) = params.get(*key) {
            check_unique_keys(key, entries)?;
        }
    }

    for rule in schema.conditionals.iter().filter(|rule| rule.is_active(params)) {
        let subject = format!("{} with {}={}", schema.subject, rule.tag, rule.value);
        check_required(params, &subject, rule.required)?;
        (rule.check)(params)?;
    }

    Ok(())
}

fn check_required(
    params: &Map<String, Value>,
    subject: &str,
    rules: &[KeyRule],
) -> Result<(), ValidationError> {
    if let Some(rule) = rules.iter().find(|rule| !params.contains_key(rule.key)) {
        return Err(ValidationError::MissingKey {
            subject: subject.to_string(),
            key: rule.key.to_string(),
        });
    }

    for rule in rules {
        if !params.get(rule.key).is_some_and(|value| rule.shape.matches(value)) {
            return Err(ValidationError::Shape(format!(
                "{} value must be {}",
                rule.key,
                rule.shape.describe()
            )));
        }
    }
    Ok(())
}

/// Entry keys of a list of single-key dicts must be pairwise unique
fn check_unique_keys(field: &str, entries: &Value) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    let keys = entries
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .flat_map(|map| map.keys());

    for key in keys {
        if !seen.insert(key.as_str()) {
            return Err(ValidationError::DuplicateKey {
                field: field.to_string(),
                key: key.clone(),
            });
        }
    }
    Ok(())
}

/// Number of values per species: density, ions, molecular weight, kappa
const SPECIES_FIELDS: usize = 4;

/// Validate a species table `[{"<species>": [density, ions, weight, kappa]}, ...]`
///
/// # Example
///
/// ```rust
/// use aero_bridge_core_rs::descriptor::validate_species;
/// use serde_json::json;
///
/// let species = validate_species(&json!([{"H2O": [1000, 0, 18e-3, 0]}])).unwrap();
/// assert_eq!(species[0].name, "H2O");
/// assert_eq!(species[0].density, 1000.0);
/// ```
pub fn validate_species(document: &Value) -> Result<Vec<SpeciesSpec>, ValidationError> {
    if !Shape::SingleKeyMapList.matches(document) {
        return Err(ValidationError::Shape(format!(
            "species table must be {}",
            Shape::SingleKeyMapList.describe()
        )));
    }
    check_unique_keys("species", document)?;

    let entries = document
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .flat_map(|map| map.iter());

    let mut species = Vec::new();
    for (name, values) in entries {
        if !Shape::NumberList.matches(values) {
            return Err(ValidationError::Shape(format!(
                "species '{}' value must be {}",
                name,
                Shape::NumberList.describe()
            )));
        }
        let numbers: Vec<f64> = values
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(Value::as_f64)
            .collect();
        if numbers.len() != SPECIES_FIELDS {
            return Err(ValidationError::LengthRelation {
                field: format!("species '{}'", name),
                expected: SPECIES_FIELDS,
                actual: numbers.len(),
            });
        }
        if numbers[1].fract() != 0.0 {
            return Err(ValidationError::Shape(format!(
                "species '{}' number of ions must be an integer",
                name
            )));
        }

        species.push(SpeciesSpec {
            name: name.clone(),
            density: numbers[0],
            num_ions: numbers[1] as i32,
            molecular_weight: numbers[2],
            kappa: numbers[3],
        });
    }
    Ok(species)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_keys_reported_in_declared_order() {
        let err = validate_mode(&json!({"m": {}})).unwrap_err();
        assert_eq!(err.missing_key(), Some("mass_frac"));
    }

    #[test]
    fn test_presence_checked_before_shape() {
        // mass_frac is malformed but the missing tag is reported first
        let err = validate_mode(&json!({"m": {"mass_frac": 5}})).unwrap_err();
        assert_eq!(err.missing_key(), Some("mode_type"));
    }

    #[test]
    fn test_mode_type_must_be_string() {
        let err = validate_mode(&json!({"m": {"mass_frac": [], "mode_type": 3}})).unwrap_err();
        assert!(matches!(err, ValidationError::Shape(_)));
    }

    #[test]
    fn test_dist_rejects_duplicate_mode_names() {
        let mode = json!({"mass_frac": [{"SO4": 1}], "mode_type": "mono"});
        let err = validate_dist(&json!([{"a": mode}, {"a": mode}])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateKey {
                field: "modes".to_string(),
                key: "a".to_string()
            }
        );
    }

    #[test]
    fn test_dist_validates_every_mode() {
        let good = json!({"mass_frac": [{"SO4": 1}], "mode_type": "mono"});
        let err = validate_dist(&json!([{"a": good}, {"b": {"mode_type": "mono"}}])).unwrap_err();
        assert_eq!(err.missing_key(), Some("mass_frac"));
    }

    #[test]
    fn test_species_integer_ions() {
        let err = validate_species(&json!([{"Na": [2200, 1.5, 0.023, 0]}])).unwrap_err();
        assert!(matches!(err, ValidationError::Shape(_)));
    }
}
