//! Namespace-to-namespace rule resolution with visible-type filtering.

use std::sync::Arc;

use crate::config::AnalyzerConfig;
use crate::dependency::{DependencyStatus, TypeDependency};
use crate::rule::TypeNameSet;

use super::{any_rule_matches, most_relevant_rule, Verdict};

/// Decides type dependencies against one immutable config.
#[derive(Debug, Clone)]
pub(crate) struct TypeDependencyValidator {
    config: Arc<AnalyzerConfig>,
}

impl TypeDependencyValidator {
    pub(crate) fn new(config: Arc<AnalyzerConfig>) -> Self {
        Self { config }
    }

    /// Resolution order: same namespace, disallow veto, implicit
    /// parent/child, most relevant allow rule, visible types.
    pub(crate) fn validate(&self, dependency: &TypeDependency) -> Verdict {
        let from = &dependency.from_namespace;
        let to = &dependency.to_namespace;

        if from == to {
            return Verdict::allowed();
        }

        if any_rule_matches(&self.config.disallow_rules, from, to) {
            return Verdict::disallowed();
        }

        if self.config.child_can_depend_on_parent_implicitly && from.is_subdomain_of(to) {
            return Verdict::allowed();
        }
        if self.config.parent_can_depend_on_child_implicitly && to.is_subdomain_of(from) {
            return Verdict::allowed();
        }

        let rules = self.config.allow_rules.iter().map(|r| &r.rule);
        let Some(index) = most_relevant_rule(rules, from, to) else {
            return Verdict::disallowed();
        };

        let status = match self.visible_types(index, dependency) {
            Some(visible) if !visible.contains(&dependency.to_type) => {
                DependencyStatus::DisallowedByVisibility {
                    visible_types: Arc::clone(visible),
                }
            }
            _ => DependencyStatus::Allowed,
        };

        Verdict {
            status,
            allow_rule: Some(index),
        }
    }

    /// The rule's own type set wins; otherwise the target namespace's entry.
    fn visible_types(&self, rule_index: usize, dependency: &TypeDependency) -> Option<&Arc<TypeNameSet>> {
        let own = &self.config.allow_rules[rule_index].visible_types;
        if !own.is_empty() {
            return Some(own);
        }
        self.config
            .visible_types_by_namespace
            .get(&dependency.to_namespace)
            .filter(|types| !types.is_empty())
    }
}
