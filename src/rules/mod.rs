//! Rule definitions and the verification seam.
//!
//! Each rule kind contributes a definition type implementing [`Protection`];
//! the registry dispatches to it by kind. Definitions are pure: a verify call
//! reads its input, returns its result, and touches nothing else.

mod branch;
mod bypass;
mod lifecycle;
mod pullreq;

pub use branch::Branch;
pub use bypass::DefBypass;
pub use lifecycle::{
    CODE_LIFECYCLE_CREATE, CODE_LIFECYCLE_DELETE, CODE_LIFECYCLE_UPDATE, DefLifecycle,
};
pub use pullreq::{
    CODE_PULLREQ_COMMENTS_REQUIRE_RESOLVE_ALL, CODE_PULLREQ_STATUS_CHECKS_REQUIRED_UIDS,
    DefComments, DefMerge, DefPullReq, DefStatusChecks,
};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::error::ProtectionError;
use crate::types::{MergeMethod, Principal, RuleViolations, StatusCheck};

/// A proposed ref mutation.
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
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RefAction {
    #[default]
    Create,
    Update,
    Delete,
}

/// The kind of ref a mutation targets.
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
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RefType {
    #[default]
    Branch,
    Tag,
}

/// Everything `merge_verify` needs, pre-fetched by the caller.
///
/// The engine performs no I/O: unresolved-comment counts and status check
/// results are resolved before the call, and `is_repo_owner` is computed by
/// the caller against the target repository.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MergeVerifyInput {
    pub actor: Principal,
    /// Whether the actor asked for eligible violations to be overridden.
    #[serde(default)]
    pub allow_bypass: bool,
    #[serde(default)]
    pub is_repo_owner: bool,
    /// Target branch of the pull request; rules are scoped against it.
    #[serde(default)]
    pub target_branch: String,
    /// Number of unresolved comment threads on the pull request.
    #[serde(default)]
    pub unresolved_count: usize,
    /// Status checks that have reported, with their conclusions.
    #[serde(default)]
    pub checks: Vec<StatusCheck>,
    /// The system's merge-method enumeration; the result when nothing
    /// restricts, and the base set every restriction intersects against.
    #[serde(default = "MergeMethod::all")]
    pub available_methods: Vec<MergeMethod>,
}

impl Default for MergeVerifyInput {
    fn default() -> Self {
        MergeVerifyInput {
            actor: Principal::default(),
            allow_bypass: false,
            is_repo_owner: false,
            target_branch: String::new(),
            unresolved_count: 0,
            checks: Vec::new(),
            available_methods: MergeMethod::all(),
        }
    }
}

/// The combined merge configuration across all matching rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MergeVerifyOutput {
    /// OR-reduced across matching rules.
    pub delete_source_branch: bool,
    /// Intersection-reduced across matching rules that restrict.
    pub allowed_methods: Vec<MergeMethod>,
}

/// Everything `ref_change_verify` needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RefChangeVerifyInput {
    pub actor: Principal,
    #[serde(default)]
    pub allow_bypass: bool,
    #[serde(default)]
    pub is_repo_owner: bool,
    #[serde(default)]
    pub ref_action: RefAction,
    #[serde(default)]
    pub ref_type: RefType,
    /// Short names of the refs affected by this mutation, as one batch.
    #[serde(default)]
    pub ref_names: Vec<String>,
}

/// Kind-specific rule behavior: verification plus save-time validation.
///
/// Verification is infallible for well-typed input; the fallible steps
/// (definition parsing, sanitization) happen before a definition reaches
/// these methods.
pub trait Protection: Send + Sync {
    /// Evaluate a proposed pull request merge against this definition.
    ///
    /// Returns the merge configuration plus at most one violation set; a
    /// definition without violations contributes configuration only.
    fn merge_verify(&self, input: &MergeVerifyInput) -> (MergeVerifyOutput, Vec<RuleViolations>);

    /// Evaluate a proposed ref mutation against this definition.
    fn ref_change_verify(&self, input: &RefChangeVerifyInput) -> Vec<RuleViolations>;

    /// Normalize the definition and reject malformed configuration.
    /// Runs at rule-save time; evaluation assumes sanitized input.
    fn sanitize(&mut self) -> Result<(), ProtectionError>;

    /// Principal IDs referenced by the definition, for callers that hydrate
    /// user details when displaying a rule.
    fn user_ids(&self) -> Vec<i64> {
        Vec::new()
    }
}
