use thiserror::Error;

use crate::core::kind::KindError;
use crate::core::marshal::MarshalError;
use crate::descriptor::ValidationError;
use crate::native::NativeError;

/// Errors surfaced by entity operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EntityError {
    #[error("Invalid descriptor: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Marshal(#[from] MarshalError),

    #[error(transparent)]
    Kind(#[from] KindError),

    #[error("Native layer rejected the request: {0}")]
    Native(#[from] NativeError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl EntityError {
    /// The entity's native state is corrupt; further use is unsafe
    pub fn is_fatal(&self) -> bool {
        matches!(self, EntityError::Kind(KindError::InternalConsistency { .. }))
    }
}

pub(crate) fn decode_utf8(bytes: Box<[u8]>) -> Result<String, EntityError> {
    String::from_utf8(bytes.into_vec())
        .map_err(|e| EntityError::Native(NativeError::InvalidUtf8(e.to_string())))
}
