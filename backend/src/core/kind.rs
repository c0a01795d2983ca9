//! Closed kind enumerations stored natively as 1-based ordinals
//!
//! The native layer keeps a kind tag as a plain integer. Above the entity
//! layer only the typed variant or its name is visible: [`OrdinalKind::encode`]
//! and [`OrdinalKind::decode`] are the only places the integer exists.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by kind name/ordinal mapping
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KindError {
    /// Caller supplied a name outside the closed set
    #[error("Invalid {family} '{name}', expected one of: {expected}")]
    InvalidArgument {
        family: &'static str,
        name: String,
        expected: String,
    },

    /// Native side holds an ordinal outside `1..=max`
    #[error("Unknown {family} ordinal {ordinal} (valid range 1..={max})")]
    InternalConsistency {
        family: &'static str,
        ordinal: i32,
        max: usize,
    },
}

/// A closed, ordered set of named kinds
///
/// Implementors list their variants once in `ALL` and their names once in
/// `NAMES`, in the same order. The ordinal of `ALL[i]` is `i + 1`.
pub trait OrdinalKind: Copy + PartialEq + Sized + 'static {
    /// Family name used in error messages
    const FAMILY: &'static str;

    /// Every variant, in ordinal order
    const ALL: &'static [Self];

    /// Human-readable names, parallel to `ALL`
    const NAMES: &'static [&'static str];

    fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// Linear membership search over `NAMES`
    fn from_name(name: &str) -> Result<Self, KindError> {
        Self::NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|i| Self::ALL[i])
            .ok_or_else(|| KindError::InvalidArgument {
                family: Self::FAMILY,
                name: name.to_string(),
                expected: Self::NAMES.join(", "),
            })
    }

    /// 1-based ordinal for the native side
    fn encode(self) -> i32 {
        self.index() as i32 + 1
    }

    /// Inverse of [`OrdinalKind::encode`]
    fn decode(ordinal: i32) -> Result<Self, KindError> {
        let max = Self::ALL.len();
        if ordinal < 1 || ordinal as usize > max {
            return Err(KindError::InternalConsistency {
                family: Self::FAMILY,
                ordinal,
                max,
            });
        }
        Ok(Self::ALL[ordinal as usize - 1])
    }

    #[doc(hidden)]
    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or_default()
    }
}

/// Aerosol mode type
///
/// # Example
/// ```
/// use aero_bridge_core_rs::core::kind::{ModeKind, OrdinalKind};
///
/// assert_eq!(ModeKind::from_name("sampled").unwrap(), ModeKind::Sampled);
/// assert_eq!(ModeKind::Sampled.encode(), 4);
/// assert_eq!(ModeKind::decode(1).unwrap().name(), "log_normal");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    LogNormal,
    Exp,
    Mono,
    Sampled,
}

impl OrdinalKind for ModeKind {
    const FAMILY: &'static str = "mode type";
    const ALL: &'static [Self] = &[
        ModeKind::LogNormal,
        ModeKind::Exp,
        ModeKind::Mono,
        ModeKind::Sampled,
    ];
    const NAMES: &'static [&'static str] = &["log_normal", "exp", "mono", "sampled"];
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bin grid spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridKind {
    Log,
    Linear,
}

impl OrdinalKind for GridKind {
    const FAMILY: &'static str = "grid type";
    const ALL: &'static [Self] = &[GridKind::Log, GridKind::Linear];
    const NAMES: &'static [&'static str] = &["log", "linear"];
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
