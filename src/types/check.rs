//! Pre-fetched status check results for a pull request.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// The reported conclusion of a single status check.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CheckStatus {
    Pending,
    Running,
    Success,
    Failure,
    Error,
}

impl CheckStatus {
    /// Only a successful conclusion satisfies a required check.
    pub fn passed(self) -> bool {
        matches!(self, CheckStatus::Success)
    }
}

/// One reported status check, identified by its UID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusCheck {
    pub uid: String,
    pub status: CheckStatus,
}

impl StatusCheck {
    pub fn new(uid: impl Into<String>, status: CheckStatus) -> Self {
        StatusCheck {
            uid: uid.into(),
            status,
        }
    }
}
