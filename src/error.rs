use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating rule configuration or preparing an evaluation.
///
/// Evaluation itself has no failure mode for well-formed input; everything here
/// surfaces before the verification logic runs (pattern validation, definition
/// parsing, sanitization).
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ProtectionError {
    #[error("invalid pattern: {0}")]
    Pattern(String),

    #[error("no behavior registered for rule kind: {0}")]
    UnknownKind(String),

    #[error("failed to parse rule definition: {0}")]
    Definition(String),

    #[error("invalid rule definition: {0}")]
    Validation(String),

    #[error("invalid identifier: {0}")]
    Identifier(String),
}
