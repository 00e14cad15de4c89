//! Protection rule container and its discriminants.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display as StrumDisplay, EnumString};
use utoipa::ToSchema;

use crate::pattern::Pattern;

/// Lifecycle state of a stored rule.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    StrumDisplay,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuleState {
    /// Evaluated and enforced.
    #[default]
    Active,
    /// Evaluated and reported, never enforced.
    Monitor,
    /// Skipped entirely.
    Disabled,
}

/// Discriminant for the kind-specific definition payload of a rule.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    StrumDisplay,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuleKind {
    #[default]
    Branch,
    Tag,
}

/// A stored protection rule, as loaded by the caller.
///
/// The definition stays an opaque JSON payload here; the registry parses it
/// into the kind-specific configuration during evaluation. Rules are read-only
/// inputs to a single verification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Rule {
    pub id: i64,
    pub identifier: String,
    #[serde(default)]
    pub state: RuleState,
    #[serde(default)]
    pub kind: RuleKind,
    #[serde(default)]
    pub pattern: Pattern,
    pub definition: Value,
}

impl Rule {
    /// Summary of the rule, stamped onto every violation set it produces.
    pub fn info(&self) -> RuleInfo {
        RuleInfo {
            id: self.id,
            identifier: self.identifier.clone(),
            kind: self.kind,
            state: self.state,
        }
    }
}

/// Identifying summary of the rule a violation set originated from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RuleInfo {
    pub id: i64,
    pub identifier: String,
    pub kind: RuleKind,
    pub state: RuleState,
}

impl Display for RuleInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, r#"Rule::"{}" ({})"#, self.identifier, self.kind)
    }
}
