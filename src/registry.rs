//! Kind-specific behavior registry.
//!
//! Rule definitions are stored as opaque JSON next to a `RuleKind`
//! discriminant. The registry maps each kind to its parse and sanitize
//! behavior so stores and controllers never need to know the concrete
//! definition types.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::ProtectionError;
use crate::rules::{Branch, Protection};
use crate::types::RuleKind;

type ParseFn = fn(&Value) -> Result<Box<dyn Protection>, ProtectionError>;
type SanitizeFn = fn(&Value) -> Result<Value, ProtectionError>;

#[derive(Clone, Copy)]
struct Entry {
    parse: ParseFn,
    sanitize: SanitizeFn,
}

/// Maps rule kinds to their definition behavior.
#[derive(Clone)]
pub struct Registry {
    entries: HashMap<RuleKind, Entry>,
}

impl Registry {
    /// An empty registry with no kinds registered.
    pub fn empty() -> Self {
        Registry {
            entries: HashMap::new(),
        }
    }

    fn register(&mut self, kind: RuleKind, parse: ParseFn, sanitize: SanitizeFn) {
        self.entries.insert(kind, Entry { parse, sanitize });
    }

    /// Parse a stored definition into its typed, evaluable form.
    ///
    /// The definition is assumed sanitized; this is the per-evaluation path.
    pub fn parse(
        &self,
        kind: RuleKind,
        definition: &Value,
    ) -> Result<Box<dyn Protection>, ProtectionError> {
        let entry = self
            .entries
            .get(&kind)
            .ok_or_else(|| ProtectionError::UnknownKind(kind.to_string()))?;
        (entry.parse)(definition)
    }

    /// Parse, sanitize, and re-encode a definition at rule-save time.
    ///
    /// Returns the normalized payload the store should persist; malformed
    /// configuration is rejected here, never during evaluation.
    pub fn sanitize(&self, kind: RuleKind, definition: &Value) -> Result<Value, ProtectionError> {
        let entry = self
            .entries
            .get(&kind)
            .ok_or_else(|| ProtectionError::UnknownKind(kind.to_string()))?;
        (entry.sanitize)(definition)
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Registry::empty();
        registry.register(RuleKind::Branch, parse_branch, sanitize_branch);
        registry
    }
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::default);

/// The process-wide registry with all built-in rule kinds registered.
pub fn default_registry() -> &'static Registry {
    &REGISTRY
}

fn parse_branch(definition: &Value) -> Result<Box<dyn Protection>, ProtectionError> {
    let branch: Branch = serde_json::from_value(definition.clone())
        .map_err(|err| ProtectionError::Definition(err.to_string()))?;
    Ok(Box::new(branch))
}

fn sanitize_branch(definition: &Value) -> Result<Value, ProtectionError> {
    let mut branch: Branch = serde_json::from_value(definition.clone())
        .map_err(|err| ProtectionError::Definition(err.to_string()))?;
    branch.sanitize()?;
    serde_json::to_value(branch).map_err(|err| ProtectionError::Definition(err.to_string()))
}
