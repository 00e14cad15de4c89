//! Rule-set aggregation and the two verification entry points.
//!
//! A `RuleSet` wraps the resolved, ordered list of rules the caller loaded
//! for a repository. Each call is a pure, single-pass evaluation: rules are
//! filtered by state and pattern, their definitions parsed through the
//! registry, and the per-rule results reduced into one decision. Nothing is
//! mutated and no I/O happens, so a set can be shared across concurrent
//! callers.

use itertools::Itertools;
use tracing::debug;

use crate::error::ProtectionError;
use crate::registry::{Registry, default_registry};
use crate::rules::{MergeVerifyInput, MergeVerifyOutput, RefChangeVerifyInput};
use crate::types::{Rule, RuleState, RuleViolations};

/// The ordered protection rules applicable to one repository.
#[derive(Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    registry: Registry,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleSet {
            rules,
            registry: default_registry().clone(),
        }
    }

    pub fn with_registry(rules: Vec<Rule>, registry: Registry) -> Self {
        RuleSet { rules, registry }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluate a proposed pull request merge against every matching rule.
    ///
    /// Rules are matched against the pull request's target branch. The merge
    /// configuration is reduced across matching rules: `delete_source_branch`
    /// by OR, `allowed_methods` by intersection (a rule without strategy
    /// restrictions leaves the set untouched). Violation sets come back in
    /// rule input order, each stamped with its originating rule.
    pub fn merge_verify(
        &self,
        input: &MergeVerifyInput,
    ) -> Result<(MergeVerifyOutput, Vec<RuleViolations>), ProtectionError> {
        let mut output = MergeVerifyOutput {
            delete_source_branch: false,
            allowed_methods: input.available_methods.clone(),
        };
        let mut all_violations = Vec::new();

        for rule in &self.rules {
            if rule.state == RuleState::Disabled {
                continue;
            }
            if !rule.pattern.matches(&input.target_branch) {
                debug!(
                    event = "MergeVerify",
                    phase = "Filter",
                    rule = %rule.identifier,
                    target = %input.target_branch,
                    matched = false
                );
                continue;
            }

            let definition = self.registry.parse(rule.kind, &rule.definition)?;
            let (rule_output, violations) = definition.merge_verify(input);

            debug!(
                event = "MergeVerify",
                phase = "Evaluated",
                rule = %rule.identifier,
                violations = violations.len(),
                delete_source_branch = rule_output.delete_source_branch
            );

            output.delete_source_branch |= rule_output.delete_source_branch;
            // An unrestricted definition echoes the available set verbatim;
            // only actual restrictions join the intersection. The most
            // recently applied restriction decides the order, so a single
            // restricting rule yields its own order.
            if rule_output.allowed_methods != input.available_methods {
                output.allowed_methods = rule_output
                    .allowed_methods
                    .into_iter()
                    .filter(|method| output.allowed_methods.contains(method))
                    .collect();
            }

            for mut rule_violations in violations {
                rule_violations.rule = rule.info();
                all_violations.push(rule_violations);
            }
        }

        Ok((output, all_violations))
    }

    /// Evaluate a proposed ref mutation against every matching rule.
    ///
    /// A rule participates iff its pattern matches at least one name in the
    /// batch; only the matching names are forwarded into its evaluation, so
    /// violations name exactly the refs the rule covers.
    pub fn ref_change_verify(
        &self,
        input: &RefChangeVerifyInput,
    ) -> Result<Vec<RuleViolations>, ProtectionError> {
        let mut all_violations = Vec::new();

        for rule in &self.rules {
            if rule.state == RuleState::Disabled {
                continue;
            }

            let matched_names: Vec<String> = input
                .ref_names
                .iter()
                .filter(|name| rule.pattern.matches(name))
                .cloned()
                .collect();
            if matched_names.is_empty() {
                debug!(
                    event = "RefChangeVerify",
                    phase = "Filter",
                    rule = %rule.identifier,
                    matched = false
                );
                continue;
            }

            let definition = self.registry.parse(rule.kind, &rule.definition)?;
            let scoped = RefChangeVerifyInput {
                ref_names: matched_names,
                ..input.clone()
            };
            let violations = definition.ref_change_verify(&scoped);

            debug!(
                event = "RefChangeVerify",
                phase = "Evaluated",
                rule = %rule.identifier,
                action = %input.ref_action,
                violations = violations.len()
            );

            for mut rule_violations in violations {
                rule_violations.rule = rule.info();
                all_violations.push(rule_violations);
            }
        }

        Ok(all_violations)
    }

    /// All principal IDs referenced by the bypass grants of non-disabled
    /// rules, sorted and deduplicated.
    pub fn user_ids(&self) -> Result<Vec<i64>, ProtectionError> {
        let mut ids = Vec::new();
        for rule in &self.rules {
            if rule.state == RuleState::Disabled {
                continue;
            }
            let definition = self.registry.parse(rule.kind, &rule.definition)?;
            ids.extend(definition.user_ids());
        }
        Ok(ids.into_iter().sorted().dedup().collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::pattern::Pattern;
    use crate::rules::RefAction;
    use crate::types::{MergeMethod, Principal, RuleKind};

    fn rule(id: i64, identifier: &str, definition: serde_json::Value) -> Rule {
        Rule {
            id,
            identifier: identifier.to_string(),
            state: RuleState::Active,
            kind: RuleKind::Branch,
            pattern: Pattern::default(),
            definition,
        }
    }

    fn scoped_rule(
        id: i64,
        identifier: &str,
        include: &[&str],
        definition: serde_json::Value,
    ) -> Rule {
        Rule {
            pattern: Pattern {
                include: include.iter().map(|s| s.to_string()).collect(),
                ..Pattern::default()
            },
            ..rule(id, identifier, definition)
        }
    }

    fn merge_input(target_branch: &str) -> MergeVerifyInput {
        MergeVerifyInput {
            actor: Principal::new(42, "user"),
            target_branch: target_branch.to_string(),
            ..MergeVerifyInput::default()
        }
    }

    fn delete_input(ref_names: &[&str]) -> RefChangeVerifyInput {
        RefChangeVerifyInput {
            actor: Principal::new(42, "user"),
            ref_action: RefAction::Delete,
            ref_names: ref_names.iter().map(|s| s.to_string()).collect(),
            ..RefChangeVerifyInput::default()
        }
    }

    #[test]
    fn merge_verify_no_rules_allows_everything() {
        let set = RuleSet::new(vec![]);
        let (out, violations) = set.merge_verify(&merge_input("main")).unwrap();

        assert_eq!(out.allowed_methods, MergeMethod::all());
        assert!(!out.delete_source_branch);
        assert_eq!(violations, vec![]);
    }

    #[test]
    fn merge_verify_intersects_methods_across_rules() {
        let set = RuleSet::new(vec![
            rule(
                1,
                "squash-or-rebase",
                json!({"pull_req": {"merge": {"strategies_allowed": ["rebase", "squash"]}}}),
            ),
            rule(
                2,
                "no-plain-merge",
                json!({"pull_req": {"merge": {"strategies_allowed": ["squash", "merge"]}}}),
            ),
        ]);

        let (out, violations) = set.merge_verify(&merge_input("main")).unwrap();
        assert_eq!(out.allowed_methods, vec![MergeMethod::Squash]);
        assert_eq!(violations, vec![]);
    }

    #[test]
    fn merge_verify_single_restriction_keeps_rule_order() {
        let set = RuleSet::new(vec![rule(
            1,
            "squash-or-rebase",
            json!({"pull_req": {"merge": {"strategies_allowed": ["rebase", "squash"]}}}),
        )]);

        let (out, _) = set.merge_verify(&merge_input("main")).unwrap();
        assert_eq!(
            out.allowed_methods,
            vec![MergeMethod::Rebase, MergeMethod::Squash]
        );
    }

    #[test]
    fn merge_verify_restriction_order_survives_noop_rule() {
        let set = RuleSet::new(vec![
            rule(
                1,
                "squash-or-rebase",
                json!({"pull_req": {"merge": {"strategies_allowed": ["rebase", "squash"]}}}),
            ),
            rule(2, "unrestricted", json!({})),
        ]);

        let (out, _) = set.merge_verify(&merge_input("main")).unwrap();
        assert_eq!(
            out.allowed_methods,
            vec![MergeMethod::Rebase, MergeMethod::Squash]
        );
    }

    #[test]
    fn merge_verify_noop_rule_before_restriction_keeps_order() {
        let set = RuleSet::new(vec![
            rule(1, "unrestricted", json!({})),
            rule(
                2,
                "squash-or-rebase",
                json!({"pull_req": {"merge": {"strategies_allowed": ["rebase", "squash"]}}}),
            ),
        ]);

        let (out, _) = set.merge_verify(&merge_input("main")).unwrap();
        assert_eq!(
            out.allowed_methods,
            vec![MergeMethod::Rebase, MergeMethod::Squash]
        );
    }

    #[test]
    fn merge_verify_ors_delete_source_branch() {
        let set = RuleSet::new(vec![
            rule(1, "keep-branch", json!({})),
            rule(
                2,
                "tidy-up",
                json!({"pull_req": {"merge": {"delete_branch": true}}}),
            ),
        ]);

        let (out, _) = set.merge_verify(&merge_input("main")).unwrap();
        assert!(out.delete_source_branch);
    }

    #[test]
    fn merge_verify_skips_rules_not_matching_target() {
        let set = RuleSet::new(vec![scoped_rule(
            1,
            "release-only",
            &["release/*"],
            json!({"pull_req": {"merge": {"strategies_allowed": ["squash"]}}}),
        )]);

        let (out, _) = set.merge_verify(&merge_input("main")).unwrap();
        assert_eq!(out.allowed_methods, MergeMethod::all());

        let (out, _) = set.merge_verify(&merge_input("release/v1")).unwrap();
        assert_eq!(out.allowed_methods, vec![MergeMethod::Squash]);
    }

    #[test]
    fn merge_verify_skips_disabled_rules() {
        let mut restricting = rule(
            1,
            "disabled-restriction",
            json!({"pull_req": {"merge": {"strategies_allowed": ["squash"], "delete_branch": true}}}),
        );
        restricting.state = RuleState::Disabled;
        let set = RuleSet::new(vec![restricting]);

        let (out, violations) = set.merge_verify(&merge_input("main")).unwrap();
        assert_eq!(out.allowed_methods, MergeMethod::all());
        assert!(!out.delete_source_branch);
        assert_eq!(violations, vec![]);
    }

    #[test]
    fn merge_verify_stamps_rule_info_in_input_order() {
        let definition = json!({"pull_req": {"comments": {"require_resolve_all": true}}});
        let set = RuleSet::new(vec![
            rule(1, "first", definition.clone()),
            rule(2, "second", definition),
        ]);

        let input = MergeVerifyInput {
            unresolved_count: 3,
            ..merge_input("main")
        };
        let (_, violations) = set.merge_verify(&input).unwrap();

        let identifiers: Vec<&str> = violations
            .iter()
            .map(|rv| rv.rule.identifier.as_str())
            .collect();
        assert_eq!(identifiers, vec!["first", "second"]);
        assert!(violations.iter().all(|rv| rv.is_critical()));
    }

    #[test]
    fn merge_verify_monitor_rule_reports_but_is_not_critical() {
        let mut monitored = rule(
            1,
            "monitored",
            json!({"pull_req": {"comments": {"require_resolve_all": true}}}),
        );
        monitored.state = RuleState::Monitor;
        let set = RuleSet::new(vec![monitored]);

        let input = MergeVerifyInput {
            unresolved_count: 1,
            ..merge_input("main")
        };
        let (_, violations) = set.merge_verify(&input).unwrap();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violations.len(), 1);
        assert!(!violations[0].is_critical());
    }

    #[test]
    fn merge_verify_fails_on_malformed_definition() {
        let set = RuleSet::new(vec![rule(1, "broken", json!({"lifecycle": 5}))]);
        let result = set.merge_verify(&merge_input("main"));
        assert!(matches!(result, Err(ProtectionError::Definition(_))));
    }

    #[test]
    fn ref_change_verify_scopes_names_per_rule() {
        let set = RuleSet::new(vec![scoped_rule(
            1,
            "protect-releases",
            &["release/*"],
            json!({"lifecycle": {"delete_forbidden": true}}),
        )]);

        let violations = set
            .ref_change_verify(&delete_input(&["release/v1", "scratch", "release/v2"]))
            .unwrap();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule.identifier, "protect-releases");
        assert_eq!(
            violations[0].violations[0].params,
            vec![json!("release/v1"), json!("release/v2")]
        );
    }

    #[test]
    fn ref_change_verify_skips_rules_without_matching_names() {
        let set = RuleSet::new(vec![scoped_rule(
            1,
            "protect-releases",
            &["release/*"],
            json!({"lifecycle": {"delete_forbidden": true}}),
        )]);

        let violations = set.ref_change_verify(&delete_input(&["scratch"])).unwrap();
        assert_eq!(violations, vec![]);
    }

    #[test]
    fn ref_change_verify_each_matching_rule_reports() {
        let set = RuleSet::new(vec![
            rule(1, "first", json!({"lifecycle": {"delete_forbidden": true}})),
            rule(2, "second", json!({"lifecycle": {"delete_forbidden": true}})),
        ]);

        let violations = set.ref_change_verify(&delete_input(&["main"])).unwrap();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].rule.id, 1);
        assert_eq!(violations[1].rule.id, 2);
    }

    #[test]
    fn custom_registry_without_kinds_rejects_evaluation() {
        let set = RuleSet::with_registry(
            vec![rule(1, "any", json!({}))],
            crate::registry::Registry::empty(),
        );
        let result = set.merge_verify(&merge_input("main"));
        assert!(matches!(result, Err(ProtectionError::UnknownKind(_))));
    }

    #[test]
    fn user_ids_aggregates_sorted_and_deduped() {
        let set = RuleSet::new(vec![
            rule(1, "first", json!({"bypass": {"user_ids": [9, 3]}})),
            rule(2, "second", json!({"bypass": {"user_ids": [3, 1]}})),
        ]);

        assert_eq!(set.user_ids().unwrap(), vec![1, 3, 9]);
    }

    #[test]
    fn user_ids_skips_disabled_rules() {
        let mut disabled = rule(1, "disabled", json!({"bypass": {"user_ids": [7]}}));
        disabled.state = RuleState::Disabled;
        let set = RuleSet::new(vec![disabled]);

        assert_eq!(set.user_ids().unwrap(), Vec::<i64>::new());
    }
}
