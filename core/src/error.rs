use crate::diagram::CircleId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the region engine and the diagram session.
///
/// The codec's "no more letters" and "not found" results are data values and
/// never show up here.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineError {
    #[error("Invalid geometry for circle {id}: {reason}")]
    InvalidGeometry { id: CircleId, reason: String },

    #[error("Duplicate circle id: {0}")]
    DuplicateCircle(CircleId),

    #[error("Unknown circle: {0}")]
    UnknownCircle(CircleId),

    #[error("Unknown region label: {0:?}")]
    UnknownLabel(String),

    #[error("Not a region: {0:?} names fewer than two circles")]
    NotARegion(String),

    #[error("Circle id space exhausted")]
    IdSpaceExhausted,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl EngineError {
    /// Stable machine-readable code, used by front ends to pick a message.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            EngineError::DuplicateCircle(_) => "DUPLICATE_CIRCLE",
            EngineError::UnknownCircle(_) => "UNKNOWN_CIRCLE",
            EngineError::UnknownLabel(_) => "UNKNOWN_LABEL",
            EngineError::NotARegion(_) => "NOT_A_REGION",
            EngineError::IdSpaceExhausted => "ID_SPACE_EXHAUSTED",
            EngineError::Config(_) => "CONFIG",
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
