//! The branch-protection rule definition.
//!
//! `Branch` combines independent sub-policies; every field defaults to
//! unrestricted, so an empty definition is a valid no-op rule.

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::error::ProtectionError;
use crate::types::RuleViolations;

use super::bypass::DefBypass;
use super::lifecycle::{self, DefLifecycle};
use super::pullreq::{
    CODE_PULLREQ_COMMENTS_REQUIRE_RESOLVE_ALL, CODE_PULLREQ_STATUS_CHECKS_REQUIRED_UIDS,
    DefPullReq,
};
use super::{MergeVerifyInput, MergeVerifyOutput, Protection, RefChangeVerifyInput, RefType};

/// Typed configuration of a branch-protection rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Branch {
    pub bypass: DefBypass,
    pub lifecycle: DefLifecycle,
    pub pull_req: DefPullReq,
}

impl Protection for Branch {
    fn merge_verify(&self, input: &MergeVerifyInput) -> (MergeVerifyOutput, Vec<RuleViolations>) {
        let allowed_methods = if self.pull_req.merge.strategies_allowed.is_empty() {
            input.available_methods.clone()
        } else {
            self.pull_req.merge.strategies_allowed.clone()
        };
        let output = MergeVerifyOutput {
            delete_source_branch: self.pull_req.merge.delete_branch,
            allowed_methods,
        };

        let mut violations = RuleViolations::default();

        // Fixed order: comment resolution first, then status checks.
        if self.pull_req.comments.require_resolve_all && input.unresolved_count > 0 {
            violations.add(
                CODE_PULLREQ_COMMENTS_REQUIRE_RESOLVE_ALL,
                format!(
                    "all comments must be resolved, {} unresolved",
                    input.unresolved_count
                ),
                vec![json!(input.unresolved_count)],
            );
        }

        for uid in &self.pull_req.status_checks.require_uids {
            let passed = input
                .checks
                .iter()
                .any(|check| check.uid == *uid && check.status.passed());
            if !passed {
                violations.add(
                    CODE_PULLREQ_STATUS_CHECKS_REQUIRED_UIDS,
                    format!("status check {uid:?} must report success"),
                    vec![json!(uid)],
                );
            }
        }

        let annotated = self.bypass.annotate(
            &input.actor,
            input.allow_bypass,
            input.is_repo_owner,
            violations,
        );

        (output, annotated)
    }

    fn ref_change_verify(&self, input: &RefChangeVerifyInput) -> Vec<RuleViolations> {
        let mut violations = RuleViolations::default();

        // Only branch lifecycle rules are evaluated here; other ref types are
        // the business of other rule kinds.
        if input.ref_type == RefType::Branch
            && !input.ref_names.is_empty()
            && self.lifecycle.forbids(input.ref_action)
        {
            // One combined violation per batch, not one per ref name.
            violations.add(
                lifecycle::violation_code(input.ref_action),
                format!(
                    "{}: {}",
                    lifecycle::violation_message(input.ref_action),
                    input.ref_names.join(", ")
                ),
                input.ref_names.iter().map(|name| json!(name)).collect(),
            );
        }

        self.bypass.annotate(
            &input.actor,
            input.allow_bypass,
            input.is_repo_owner,
            violations,
        )
    }

    fn sanitize(&mut self) -> Result<(), ProtectionError> {
        self.bypass.sanitize()?;
        self.pull_req.sanitize()?;
        Ok(())
    }

    fn user_ids(&self) -> Vec<i64> {
        self.bypass.user_ids.clone()
    }
}
