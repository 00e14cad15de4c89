//! Pull-request sub-policies: status checks, comments, and merge behavior.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ProtectionError;
use crate::types::MergeMethod;
use crate::types::identifier::validate_identifier;

pub const CODE_PULLREQ_COMMENTS_REQUIRE_RESOLVE_ALL: &str = "pullreq-comments-require-resolve-all";
pub const CODE_PULLREQ_STATUS_CHECKS_REQUIRED_UIDS: &str = "pullreq-status-checks-required-uids";

/// Status checks that must report success before a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DefStatusChecks {
    /// UIDs of the required checks. Empty means no checks are required.
    pub require_uids: Vec<String>,
}

impl DefStatusChecks {
    pub(crate) fn sanitize(&mut self) -> Result<(), ProtectionError> {
        for uid in &self.require_uids {
            validate_identifier(uid)?;
        }

        let normalized: Vec<String> = self.require_uids.iter().cloned().sorted().collect();
        if normalized.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(ProtectionError::Validation(
                "required status check UIDs contain duplicates".to_string(),
            ));
        }

        self.require_uids = normalized;
        Ok(())
    }
}

/// Comment-resolution requirements for a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DefComments {
    pub require_resolve_all: bool,
}

/// Merge-strategy restrictions and post-merge behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DefMerge {
    /// Strategies the rule permits. Empty means no restriction.
    pub strategies_allowed: Vec<MergeMethod>,
    /// Delete the source branch once the pull request merges.
    pub delete_branch: bool,
}

impl DefMerge {
    pub(crate) fn sanitize(&mut self) -> Result<(), ProtectionError> {
        if self
            .strategies_allowed
            .iter()
            .duplicates()
            .next()
            .is_some()
        {
            return Err(ProtectionError::Validation(
                "allowed merge strategies contain duplicates".to_string(),
            ));
        }
        Ok(())
    }
}

/// The pull-request rules of a branch protection definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DefPullReq {
    pub status_checks: DefStatusChecks,
    pub comments: DefComments,
    pub merge: DefMerge,
}

impl DefPullReq {
    pub(crate) fn sanitize(&mut self) -> Result<(), ProtectionError> {
        self.status_checks.sanitize()?;
        self.merge.sanitize()?;
        Ok(())
    }
}
