//! Consumption-tracking descriptor reader
//!
//! The native side reads parameters through a [`DescriptorReader`], which
//! records every key path it hands out. Once construction has finished,
//! [`DescriptorReader::audit`] walks the parameters and reports
//! every key nobody read. The set of readable keys depends on which
//! construction path the native side took (a `mono` mode never reads
//! `geom_mean_diam`), so there is no up-front list of allowed keys.
//!
//! Paths are kept as [`PathSegment`] lists and only rendered (`num_conc`,
//! `size_dist[0].diam`) for error messages, so a top-level key spelled like
//! a nested path never matches one. A value read as a whole
//! consumes its entire subtree; a value read piecewise (a table row by row)
//! is descended into by the audit, so nested keys are held to the same
//! standard as top-level ones.

use std::cell::RefCell;
use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::validation::{ModeDescriptor, ValidationError};
use crate::native::NativeError;

/// One step of a key path: a mapping key or a list index
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Render a path as `key[0].column`
fn render(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for (i, segment) in path.iter().enumerate() {
        match segment {
            PathSegment::Key(key) if i == 0 => out.push_str(key),
            PathSegment::Key(key) => {
                out.push('.');
                out.push_str(key);
            }
            PathSegment::Index(index) => out.push_str(&format!("[{}]", index)),
        }
    }
    out
}

fn key(key: &str) -> PathSegment {
    PathSegment::Key(key.to_string())
}

#[derive(Debug)]
pub struct DescriptorReader<'a> {
    name: &'a str,
    params: &'a Map<String, Value>,
    consumed: RefCell<BTreeSet<Vec<PathSegment>>>,
    descended: RefCell<BTreeSet<Vec<PathSegment>>>,
}

impl<'a> DescriptorReader<'a> {
    pub fn new(descriptor: ModeDescriptor<'a>) -> Self {
        Self::from_params(descriptor.name, descriptor.params)
    }

    pub fn from_params(name: &'a str, params: &'a Map<String, Value>) -> Self {
        Self {
            name,
            params,
            consumed: RefCell::new(BTreeSet::new()),
            descended: RefCell::new(BTreeSet::new()),
        }
    }

    /// Name the entity was declared under (the descriptor's outer key)
    pub fn entity_name(&self) -> &'a str {
        self.name
    }

    /// Presence test; does not consume the key
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn read_string(&self, key: &str) -> Result<&'a str, NativeError> {
        self.take(key)?
            .as_str()
            .ok_or_else(|| invalid(key, "expected a string"))
    }

    pub fn read_real(&self, key: &str) -> Result<f64, NativeError> {
        self.take(key)?
            .as_f64()
            .ok_or_else(|| invalid(key, "expected a number"))
    }

    /// Read a list of single-key dicts as `(name, values)` rows
    ///
    /// A bare number is read as a one-element row. The whole list is
    /// consumed, including the entry names.
    pub fn read_named_values(&self, key: &str) -> Result<Vec<(&'a str, Vec<f64>)>, NativeError> {
        let entries = self
            .take(key)?
            .as_array()
            .ok_or_else(|| invalid(key, "expected a list of single-element dicts"))?;

        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let map = entry
                .as_object()
                .filter(|map| map.len() == 1)
                .ok_or_else(|| invalid(key, "expected a list of single-element dicts"))?;
            for (name, value) in map {
                rows.push((name.as_str(), numbers(key, value)?));
            }
        }
        Ok(rows)
    }

    /// Read one column of a table stored as a list of single-key dicts
    ///
    /// `columns` lists accepted spellings of the column key; the first one
    /// present in row `row` is read. Only that cell is consumed.
    pub fn read_table_column(
        &self,
        key: &str,
        row: usize,
        columns: &[&str],
    ) -> Result<Vec<f64>, NativeError> {
        let rows = self
            .params
            .get(key)
            .ok_or_else(|| NativeError::MissingParameter {
                key: key.to_string(),
            })?
            .as_array()
            .ok_or_else(|| invalid(key, "expected a list of single-element dicts"))?;

        let row_path = format!("{}[{}]", key, row);
        let cells = rows
            .get(row)
            .and_then(Value::as_object)
            .ok_or_else(|| NativeError::MissingParameter {
                key: row_path.clone(),
            })?;
        let (column, value) = columns
            .iter()
            .find_map(|column| cells.get(*column).map(|value| (*column, value)))
            .ok_or_else(|| {
                let column = columns.first().copied().unwrap_or_default();
                NativeError::MissingParameter {
                    key: format!("{}.{}", row_path, column),
                }
            })?;

        let table_path = vec![PathSegment::Key(key.to_string())];
        let mut row_segments = table_path.clone();
        row_segments.push(PathSegment::Index(row));
        let mut cell_path = row_segments.clone();
        cell_path.push(PathSegment::Key(column.to_string()));

        let values = numbers(&render(&cell_path), value)?;

        let mut descended = self.descended.borrow_mut();
        descended.insert(table_path);
        descended.insert(row_segments);
        self.consumed.borrow_mut().insert(cell_path);
        Ok(values)
    }

    /// Paths consumed so far, sorted
    pub fn consumed_keys(&self) -> Vec<String> {
        self.consumed.borrow().iter().map(|path| render(path)).collect()
    }

    /// Report every parameter that was never read
    pub fn audit(&self) -> Result<(), ValidationError> {
        let mut leftovers = Vec::new();
        for (name, value) in self.params {
            self.audit_value(vec![key(name)], value, &mut leftovers);
        }

        if leftovers.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::UnrecognizedKeys(leftovers))
        }
    }

    fn audit_value(&self, path: Vec<PathSegment>, value: &Value, leftovers: &mut Vec<String>) {
        if self.consumed.borrow().contains(&path) {
            return;
        }
        if !self.descended.borrow().contains(&path) {
            leftovers.push(render(&path));
            return;
        }

        match value {
            Value::Object(map) => {
                for (name, child) in map {
                    let mut child_path = path.clone();
                    child_path.push(key(name));
                    self.audit_value(child_path, child, leftovers);
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    let mut child_path = path.clone();
                    child_path.push(PathSegment::Index(i));
                    self.audit_value(child_path, child, leftovers);
                }
            }
            // Descended but holds nothing that could have been read
            _ => leftovers.push(render(&path)),
        }
    }

    fn take(&self, name: &str) -> Result<&'a Value, NativeError> {
        let value = self
            .params
            .get(name)
            .ok_or_else(|| NativeError::MissingParameter {
                key: name.to_string(),
            })?;
        self.consumed.borrow_mut().insert(vec![key(name)]);
        Ok(value)
    }
}

fn invalid(key: &str, reason: &str) -> NativeError {
    NativeError::InvalidParameter {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// A number, or a list of numbers
fn numbers(key: &str, value: &Value) -> Result<Vec<f64>, NativeError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(|x| vec![x])
            .ok_or_else(|| invalid(key, "expected a number")),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_f64().ok_or_else(|| invalid(key, "expected a list of numbers")))
            .collect(),
        _ => Err(invalid(key, "expected a number or a list of numbers")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test params must be an object"),
        }
    }

    #[test]
    fn test_audit_reports_unread_keys() {
        let params = params(json!({"num_conc": 1.0, "typo": 2.0, "other": "x"}));
        let reader = DescriptorReader::from_params("m", &params);
        assert_eq!(reader.read_real("num_conc"), Ok(1.0));

        assert_eq!(
            reader.audit(),
            Err(ValidationError::UnrecognizedKeys(vec![
                "other".to_string(),
                "typo".to_string()
            ]))
        );
    }

    #[test]
    fn test_whole_read_consumes_subtree() {
        let params = params(json!({"mass_frac": [{"SO4": 1.0}, {"NH4": [0.5, 0.1]}]}));
        let reader = DescriptorReader::from_params("m", &params);
        let rows = reader.read_named_values("mass_frac").unwrap();

        assert_eq!(rows, vec![("SO4", vec![1.0]), ("NH4", vec![0.5, 0.1])]);
        assert_eq!(reader.audit(), Ok(()));
    }

    #[test]
    fn test_nested_audit_is_strict() {
        let params = params(json!({
            "size_dist": [{"diam": [1, 2], "extra": 0}, {"num_conc": [5]}, {"junk": 1}]
        }));
        let reader = DescriptorReader::from_params("m", &params);
        assert_eq!(reader.read_table_column("size_dist", 0, &["diam"]), Ok(vec![1.0, 2.0]));
        assert_eq!(reader.read_table_column("size_dist", 1, &["num_conc"]), Ok(vec![5.0]));

        assert_eq!(
            reader.audit(),
            Err(ValidationError::UnrecognizedKeys(vec![
                "size_dist[0].extra".to_string(),
                "size_dist[2]".to_string()
            ]))
        );
    }

    #[test]
    fn test_path_shaped_top_level_keys_are_leftovers() {
        let params = params(json!({
            "size_dist": [{"diam": [1, 2]}, {"num_conc": [5]}],
            "size_dist[0]": 7,
            "size_dist[1].num_conc": "typo"
        }));
        let reader = DescriptorReader::from_params("m", &params);
        reader.read_table_column("size_dist", 0, &["diam"]).unwrap();
        reader.read_table_column("size_dist", 1, &["num_conc"]).unwrap();

        assert_eq!(
            reader.audit(),
            Err(ValidationError::UnrecognizedKeys(vec![
                "size_dist[0]".to_string(),
                "size_dist[1].num_conc".to_string()
            ]))
        );
    }

    #[test]
    fn test_render_path() {
        let path = vec![key("size_dist"), PathSegment::Index(1), key("num_conc")];
        assert_eq!(render(&path), "size_dist[1].num_conc");
    }

    #[test]
    fn test_table_column_alias() {
        let params = params(json!({"size_dist": [{"diameter": [1, 2]}]}));
        let reader = DescriptorReader::from_params("m", &params);
        assert_eq!(
            reader.read_table_column("size_dist", 0, &["diam", "diameter"]),
            Ok(vec![1.0, 2.0])
        );
        assert_eq!(reader.consumed_keys(), vec!["size_dist[0].diameter".to_string()]);
    }

    #[test]
    fn test_missing_parameter() {
        let params = params(json!({}));
        let reader = DescriptorReader::from_params("m", &params);
        assert_eq!(
            reader.read_real("num_conc"),
            Err(NativeError::MissingParameter {
                key: "num_conc".to_string()
            })
        );
    }
}
