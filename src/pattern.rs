//! Ref-name scoping for protection rules.
//!
//! A rule's pattern decides which refs it applies to. Matching runs against
//! the short ref name (branch name without the `refs/heads/` prefix) with
//! shell-style glob syntax: `*` matches any sequence (crossing `/`), `?` any
//! single character, and character classes (`[abc]`, `[0-9]`) are supported.

use glob::Pattern as Glob;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ProtectionError;

/// Scope of a protection rule: explicit names plus include/exclude globs.
///
/// A ref matches iff it matches an explicit name or an include glob, and no
/// exclude glob matches it. The empty pattern matches every ref; a pattern
/// holding only excludes matches everything except the excluded refs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Pattern {
    /// Exact ref names, matched verbatim.
    pub names: Vec<String>,
    /// Glob rules that bring refs into scope.
    pub include: Vec<String>,
    /// Glob rules that take refs out of scope, regardless of the above.
    pub exclude: Vec<String>,
}

impl Pattern {
    /// Reject malformed patterns at rule-save time.
    ///
    /// By the time the engine evaluates, patterns are assumed well-formed;
    /// this is the one place glob syntax errors surface.
    pub fn validate(&self) -> Result<(), ProtectionError> {
        for name in &self.names {
            if name.is_empty() {
                return Err(ProtectionError::Pattern(
                    "explicit ref name must not be empty".to_string(),
                ));
            }
        }

        for glob in self.include.iter().chain(self.exclude.iter()) {
            if glob.is_empty() {
                return Err(ProtectionError::Pattern(
                    "glob rule must not be empty".to_string(),
                ));
            }
            Glob::new(glob)
                .map_err(|err| ProtectionError::Pattern(format!("invalid glob {glob:?}: {err}")))?;
        }

        Ok(())
    }

    /// Whether `ref_name` falls into this pattern's scope.
    ///
    /// Deterministic and side-effect free; malformed globs (which
    /// [`Self::validate`] would have rejected) never match.
    pub fn matches(&self, ref_name: &str) -> bool {
        if self.exclude.iter().any(|glob| glob_matches(glob, ref_name)) {
            return false;
        }

        if self.names.is_empty() && self.include.is_empty() {
            return true;
        }

        self.names.iter().any(|name| name == ref_name)
            || self.include.iter().any(|glob| glob_matches(glob, ref_name))
    }
}

fn glob_matches(glob: &str, ref_name: &str) -> bool {
    Glob::new(glob).map(|g| g.matches(ref_name)).unwrap_or(false)
}
