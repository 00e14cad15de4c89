// src/lib.rs
pub use engine::RuleSet;
pub use error::ProtectionError;
pub use pattern::Pattern;
pub use registry::{Registry, default_registry};
pub use rules::{
    Branch, CODE_LIFECYCLE_CREATE, CODE_LIFECYCLE_DELETE, CODE_LIFECYCLE_UPDATE,
    CODE_PULLREQ_COMMENTS_REQUIRE_RESOLVE_ALL, CODE_PULLREQ_STATUS_CHECKS_REQUIRED_UIDS, DefBypass,
    DefComments, DefLifecycle, DefMerge, DefPullReq, DefStatusChecks, MergeVerifyInput,
    MergeVerifyOutput, Protection, RefAction, RefChangeVerifyInput, RefType,
};
pub use types::{
    CheckStatus, MergeMethod, Principal, Rule, RuleInfo, RuleKind, RuleState, RuleViolations,
    StatusCheck, Violation,
};

mod engine;
mod error;
mod pattern;
mod registry;
mod rules;
mod types;
