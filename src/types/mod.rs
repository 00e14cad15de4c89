//! Data model types for rules, principals, and verification results.
//!
//! All types here are read-only inputs to (or outputs of) a single
//! verification call; nothing persists state across calls.

mod check;
pub(crate) mod identifier;
mod merge_method;
mod principal;
mod rule;
mod violation;

pub use check::{CheckStatus, StatusCheck};
pub use merge_method::MergeMethod;
pub use principal::Principal;
pub use rule::{Rule, RuleInfo, RuleKind, RuleState};
pub use violation::{RuleViolations, Violation};
