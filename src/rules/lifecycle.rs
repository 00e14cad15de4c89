//! Constraints on branch creation, update, and deletion.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RefAction;

pub const CODE_LIFECYCLE_CREATE: &str = "lifecycle-create";
pub const CODE_LIFECYCLE_UPDATE: &str = "lifecycle-update";
pub const CODE_LIFECYCLE_DELETE: &str = "lifecycle-delete";

/// Lifecycle restrictions for refs in a rule's scope.
/// Absent flags leave the corresponding action unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DefLifecycle {
    pub create_forbidden: bool,
    pub update_forbidden: bool,
    pub delete_forbidden: bool,
}

impl DefLifecycle {
    pub(crate) fn forbids(&self, action: RefAction) -> bool {
        match action {
            RefAction::Create => self.create_forbidden,
            RefAction::Update => self.update_forbidden,
            RefAction::Delete => self.delete_forbidden,
        }
    }
}

pub(crate) fn violation_code(action: RefAction) -> &'static str {
    match action {
        RefAction::Create => CODE_LIFECYCLE_CREATE,
        RefAction::Update => CODE_LIFECYCLE_UPDATE,
        RefAction::Delete => CODE_LIFECYCLE_DELETE,
    }
}

pub(crate) fn violation_message(action: RefAction) -> &'static str {
    match action {
        RefAction::Create => "branch creation is forbidden",
        RefAction::Update => "branch update is forbidden",
        RefAction::Delete => "branch deletion is forbidden",
    }
}
