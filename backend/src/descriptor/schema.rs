//! Declarative descriptor schemas
//!
//! A schema is a list of required keys with a shape each, a list of keys
//! whose single-key entries must be pairwise unique, and conditional rules
//! switched on by the value of a tag key. Rules run in a fixed order, see
//! [`crate::descriptor::validation::validate_params`].

use std::fmt;

use serde_json::{Map, Value};

use super::validation::ValidationError;

/// Expected shape of one descriptor value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    String,
    Number,
    NumberList,
    /// List whose every element is a mapping with exactly one key
    SingleKeyMapList,
}

impl Shape {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Shape::String => value.is_string(),
            Shape::Number => value.is_number(),
            Shape::NumberList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_number)),
            Shape::SingleKeyMapList => value.as_array().is_some_and(|items| {
                items
                    .iter()
                    .all(|item| item.as_object().is_some_and(|map| map.len() == 1))
            }),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Shape::String => "a string",
            Shape::Number => "a number",
            Shape::NumberList => "a list of numbers",
            Shape::SingleKeyMapList => "a list of single-element dicts",
        }
    }
}

/// A key that must be present, with the shape its value must have
#[derive(Debug, Clone, Copy)]
pub struct KeyRule {
    pub key: &'static str,
    pub shape: Shape,
}

/// Rules that apply only when `tag` has the value `value`
#[derive(Clone, Copy)]
pub struct ConditionalRule {
    pub tag: &'static str,
    pub value: &'static str,
    pub required: &'static [KeyRule],
    /// Cross-field check run after the extra keys passed their shape checks
    pub check: fn(&Map<String, Value>) -> Result<(), ValidationError>,
}

impl fmt::Debug for ConditionalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalRule")
            .field("tag", &self.tag)
            .field("value", &self.value)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

impl ConditionalRule {
    pub fn is_active(&self, params: &Map<String, Value>) -> bool {
        params.get(self.tag).and_then(Value::as_str) == Some(self.value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Human-readable owner of the parameters, used in messages
    pub subject: &'static str,
    pub required: &'static [KeyRule],
    pub unique_keys: &'static [&'static str],
    pub conditionals: &'static [ConditionalRule],
}

/// Accepted keys for the first `size_dist` entry
pub const DIAMETER_KEYS: &[&str] = &["diam", "diameter"];

/// Key of the second `size_dist` entry
pub const NUM_CONC_KEY: &str = "num_conc";

/// Aerosol mode parameters
pub const MODE_SCHEMA: Schema = Schema {
    subject: "mode parameters dict",
    required: &[
        KeyRule {
            key: "mass_frac",
            shape: Shape::SingleKeyMapList,
        },
        KeyRule {
            key: "mode_type",
            shape: Shape::String,
        },
    ],
    unique_keys: &["mass_frac"],
    conditionals: &[ConditionalRule {
        tag: "mode_type",
        value: "sampled",
        required: &[KeyRule {
            key: "size_dist",
            shape: Shape::SingleKeyMapList,
        }],
        check: check_size_dist,
    }],
};

/// `size_dist` is `[{"diam": [...]}, {"num_conc": [...]}]` with one fewer
/// concentration than diameters
fn check_size_dist(params: &Map<String, Value>) -> Result<(), ValidationError> {
    let shape_error = || {
        ValidationError::Shape(format!(
            "size_dist value must be an iterable of two single-element dicts \
             (first with '{}', second with '{}' as keys)",
            DIAMETER_KEYS[0], NUM_CONC_KEY
        ))
    };

    let entries = params
        .get("size_dist")
        .and_then(Value::as_array)
        .ok_or_else(shape_error)?;
    if entries.len() != 2 {
        return Err(shape_error());
    }

    let diams = entries[0]
        .as_object()
        .and_then(|map| DIAMETER_KEYS.iter().find_map(|key| map.get(*key)))
        .ok_or_else(shape_error)?;
    let num_concs = entries[1]
        .as_object()
        .and_then(|map| map.get(NUM_CONC_KEY))
        .ok_or_else(shape_error)?;

    for (key, value) in [(DIAMETER_KEYS[0], diams), (NUM_CONC_KEY, num_concs)] {
        if !Shape::NumberList.matches(value) {
            return Err(ValidationError::Shape(format!(
                "size_dist['{}'] must be {}",
                key,
                Shape::NumberList.describe()
            )));
        }
    }

    let n_diam = diams.as_array().map_or(0, Vec::len);
    let n_conc = num_concs.as_array().map_or(0, Vec::len);
    if n_diam == 0 {
        return Err(ValidationError::Shape(format!(
            "size_dist['{}'] must hold at least one diameter",
            DIAMETER_KEYS[0]
        )));
    }
    if n_conc + 1 != n_diam {
        return Err(ValidationError::LengthRelation {
            field: format!("size_dist['{}']", NUM_CONC_KEY),
            expected: n_diam - 1,
            actual: n_conc,
        });
    }
    Ok(())
}
