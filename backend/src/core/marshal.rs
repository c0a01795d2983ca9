//! Array marshalling across the native boundary
//!
//! Array lengths are owned by the native side: the length of a mode's volume
//! fractions is the species count of the table it was built against, the
//! length of a sample table is its bin count (plus one for the edges). The
//! host therefore never assumes a length. Every read runs two steps:
//!
//! 1. [`query_len`]: ask the native side how many elements it will write
//! 2. [`fill`]: allocate exactly that many and let the native side fill them
//!
//! Every write checks the host buffer against the length the native side
//! expects *before* crossing the boundary. Buffers are never truncated or
//! padded.

use thiserror::Error;

/// Errors raised while moving arrays across the boundary
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MarshalError {
    #[error("{property}: size mismatch, native side expects {expected} elements, got {actual}")]
    SizeMismatch {
        property: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Step 1: ask the native side for the required length
#[inline]
pub fn query_len<Q>(query: Q) -> usize
where
    Q: FnOnce() -> usize,
{
    query()
}

/// Step 2: allocate a zeroed buffer of `len` elements and have it filled
pub fn fill<F>(len: usize, fill_buffer: F) -> Vec<f64>
where
    F: FnOnce(&mut [f64]),
{
    let mut buffer = vec![0.0; len];
    fill_buffer(&mut buffer);
    buffer
}

/// Query-then-fill read of one array property
///
/// # Example
/// ```
/// use aero_bridge_core_rs::core::marshal::read_array;
///
/// let native = [0.25, 0.75];
/// let values = read_array(|| native.len(), |out| out.copy_from_slice(&native));
/// assert_eq!(values, vec![0.25, 0.75]);
/// ```
pub fn read_array<Q, F>(query: Q, fill_buffer: F) -> Vec<f64>
where
    Q: FnOnce() -> usize,
    F: FnOnce(&mut [f64]),
{
    let len = query_len(query);
    fill(len, fill_buffer)
}

/// Check a host buffer length against the native expectation
pub fn check_len(
    property: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), MarshalError> {
    if expected != actual {
        return Err(MarshalError::SizeMismatch {
            property,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Length-checked write of one array property
///
/// `store` only runs when `data` has exactly `expected` elements.
///
/// # Example
/// ```
/// use aero_bridge_core_rs::core::marshal::{write_array, MarshalError};
///
/// let mut native = vec![0.0; 2];
/// let err = write_array("vol_frac", 2, &[1.0], |data| native.copy_from_slice(data));
/// assert_eq!(
///     err,
///     Err(MarshalError::SizeMismatch { property: "vol_frac", expected: 2, actual: 1 })
/// );
/// assert_eq!(native, vec![0.0, 0.0]);
/// ```
pub fn write_array<S>(
    property: &'static str,
    expected: usize,
    data: &[f64],
    store: S,
) -> Result<(), MarshalError>
where
    S: FnOnce(&[f64]),
{
    check_len(property, expected, data.len())?;
    store(data);
    Ok(())
}

/// Length-checked write of an (edges, values) pair
///
/// `values` must have exactly one element fewer than `edges`.
pub fn write_paired<S>(
    property: &'static str,
    edges: &[f64],
    values: &[f64],
    store: S,
) -> Result<(), MarshalError>
where
    S: FnOnce(&[f64], &[f64]),
{
    check_len(property, edges.len().saturating_sub(1), values.len())?;
    if edges.is_empty() {
        // An empty edge list has no valid value count
        return Err(MarshalError::SizeMismatch {
            property,
            expected: 1,
            actual: 0,
        });
    }
    store(edges, values);
    Ok(())
}
