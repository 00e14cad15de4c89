//! Validation for externally supplied identifiers (e.g. status check UIDs).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ProtectionError;

const MIN_IDENTIFIER_LENGTH: usize = 2;
const MAX_IDENTIFIER_LENGTH: usize = 64;

static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9\-_]*$").unwrap());

/// Check that `id` is a well-formed identifier.
///
/// Identifiers have to start with a lowercase letter, may only contain
/// `[a-z0-9-_]`, and must be between 2 and 64 characters long.
pub(crate) fn validate_identifier(id: &str) -> Result<(), ProtectionError> {
    if id.len() < MIN_IDENTIFIER_LENGTH || id.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ProtectionError::Identifier(format!(
            "{id:?} has to be between {MIN_IDENTIFIER_LENGTH} and {MAX_IDENTIFIER_LENGTH} in length"
        )));
    }

    if !IDENTIFIER_PATTERN.is_match(id) {
        return Err(ProtectionError::Identifier(format!(
            "{id:?} has to start with a letter and only contain [a-z0-9-_]"
        )));
    }

    Ok(())
}
