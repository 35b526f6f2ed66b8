use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EMPTY_PLAN_MESSAGE: &str = "Business plan cannot be empty.";
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate brand identity from the business plan.";
pub const IMAGE_GENERATION_FAILED_MESSAGE: &str = "Failed to generate logo image.";
/// Top-level notification shown when any single logo render fails.
pub const LOGO_NOTICE_MESSAGE: &str = "Failed to generate logo. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    Generation,
    ImageGeneration,
}

/// Message surfaced to whoever renders the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFacingError {
    pub code: ErrorCode,
    pub message: String,
}

impl UserFacingError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", EMPTY_PLAN_MESSAGE)]
pub struct ValidationError;

/// The identity request failed upstream or produced unusable output.
///
/// `Display` always yields the fixed user-facing message; `detail` keeps the
/// underlying cause for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", GENERATION_FAILED_MESSAGE)]
pub struct GenerationError {
    pub detail: String,
}

impl GenerationError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", IMAGE_GENERATION_FAILED_MESSAGE)]
pub struct ImageGenerationError {
    pub detail: String,
}

impl ImageGenerationError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Structural problems found in a decoded brand identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("field `{field}` must hold exactly {expected} entries, got {actual}")]
    Cardinality {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("field `{field}` is not a hex color: {value:?}")]
    InvalidHex { field: &'static str, value: String },
}

impl From<SchemaViolation> for GenerationError {
    fn from(value: SchemaViolation) -> Self {
        Self::new(value.to_string())
    }
}

impl From<ValidationError> for UserFacingError {
    fn from(value: ValidationError) -> Self {
        Self::new(ErrorCode::Validation, value.to_string())
    }
}

impl From<&GenerationError> for UserFacingError {
    fn from(value: &GenerationError) -> Self {
        Self::new(ErrorCode::Generation, value.to_string())
    }
}
