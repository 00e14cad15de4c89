//! Who may override a violated rule.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ProtectionError;
use crate::types::{Principal, RuleViolations};

/// Bypass grants configured on a rule. Every criterion is an explicit grant;
/// an actor's administrator flag alone never makes a violation bypassable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DefBypass {
    /// Principals allowed to bypass, by ID.
    pub user_ids: Vec<i64>,
    /// Grant bypass to owners of the target repository.
    pub repo_owners: bool,
    /// Grant bypass to instance administrators.
    pub admins: bool,
}

impl DefBypass {
    /// Whether `actor` satisfies at least one bypass criterion.
    pub fn matches(&self, actor: &Principal, is_repo_owner: bool) -> bool {
        self.user_ids.contains(&actor.id)
            || self.repo_owners && is_repo_owner
            || self.admins && actor.admin
    }

    /// Annotate a violation set with bypass eligibility and outcome.
    ///
    /// A set without violations is dropped: there is nothing to bypass, and
    /// zero-violation rules never appear in the output.
    pub(crate) fn annotate(
        &self,
        actor: &Principal,
        allow_bypass: bool,
        is_repo_owner: bool,
        mut violations: RuleViolations,
    ) -> Vec<RuleViolations> {
        if violations.violations.is_empty() {
            return Vec::new();
        }

        violations.bypassable = self.matches(actor, is_repo_owner);
        violations.bypassed = violations.bypassable && allow_bypass;
        vec![violations]
    }

    pub(crate) fn sanitize(&mut self) -> Result<(), ProtectionError> {
        self.user_ids = self.user_ids.iter().copied().sorted().dedup().collect();
        Ok(())
    }
}
