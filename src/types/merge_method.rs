//! Merge strategies for integrating a pull request.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// A strategy for integrating the source branch of a pull request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MergeMethod {
    /// Merge commit joining both histories.
    Merge,
    /// Squash all source commits into one.
    Squash,
    /// Rebase source commits onto the target branch.
    Rebase,
}

impl MergeMethod {
    /// The full system enumeration, in canonical order.
    ///
    /// Evaluation never reads this implicitly; callers pass it in through
    /// `MergeVerifyInput::available_methods` so tests can use fixture sets.
    pub fn all() -> Vec<MergeMethod> {
        MergeMethod::iter().collect()
    }
}
