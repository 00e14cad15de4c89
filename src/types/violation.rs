//! Constraint violations and their per-rule aggregation.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::rule::{RuleInfo, RuleState};

/// A single failed constraint, identified by a stable code.
///
/// Codes are part of the caller-facing contract; `params` carry the
/// machine-readable details (check UIDs, ref names, counts) that the
/// human-readable `message` names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Violation {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// The result of evaluating one matched rule against one action.
///
/// `bypassable` reports eligibility alone; `bypassed` additionally requires
/// that the caller asked for a bypass. A bypassed violation stays in the list,
/// annotated; callers wanting the net effect filter on [`Self::is_critical`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RuleViolations {
    pub rule: RuleInfo,
    pub bypassable: bool,
    pub bypassed: bool,
    pub violations: Vec<Violation>,
}

impl RuleViolations {
    /// Append a violation with its parameters.
    pub fn add(&mut self, code: &str, message: impl Into<String>, params: Vec<Value>) {
        self.violations.push(Violation {
            code: code.to_string(),
            message: message.into(),
            params,
        });
    }

    /// Whether this set should block the operation: the rule is enforced
    /// (`active`), something is violated, and no bypass took effect.
    pub fn is_critical(&self) -> bool {
        self.rule.state == RuleState::Active && !self.bypassed && !self.violations.is_empty()
    }
}
