//! Partial configuration accumulator with set-if-present and union merges.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::Domain;
use crate::rule::{DependencyRule, TypeNameSet};
use crate::types::Severity;

use super::{AllowRule, AnalyzerConfig, GlobPattern};

/// Mutable, partial configuration gathered from one or more config files.
///
/// Scalars are optional: a `None` means "not specified here" and never
/// overwrites a value. Rule collections are unions, and the type-name sets
/// of a repeated allow rule or visible-members namespace are merged.
///
/// # Example
///
/// ```
/// use nsdepcop_core::config::ConfigBuilder;
///
/// let root = ConfigBuilder::new().max_issue_count(Some(10));
/// let leaf = ConfigBuilder::new().max_issue_count(None);
/// assert_eq!(root.combine(leaf).build().max_issue_count(), 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    is_enabled: Option<bool>,
    child_can_depend_on_parent_implicitly: Option<bool>,
    parent_can_depend_on_child_implicitly: Option<bool>,
    max_issue_count: Option<usize>,
    dependency_issue_severity: Option<Severity>,
    max_issue_count_severity: Option<Severity>,
    check_assembly_dependencies: Option<bool>,
    excluded_files: Vec<GlobPattern>,
    allow_rules: Vec<(DependencyRule, TypeNameSet)>,
    allow_rule_index: HashMap<DependencyRule, usize>,
    disallow_rules: Vec<DependencyRule>,
    visible_types_by_namespace: HashMap<Domain, TypeNameSet>,
    allowed_assembly_rules: Vec<DependencyRule>,
    disallowed_assembly_rules: Vec<DependencyRule>,
}

impl ConfigBuilder {
    /// Creates an empty builder that specifies nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the enabled flag if `value` is present.
    #[must_use]
    pub fn is_enabled(mut self, value: Option<bool>) -> Self {
        set_if_present(&mut self.is_enabled, value);
        self
    }

    /// Sets the implicit child-to-parent flag if `value` is present.
    #[must_use]
    pub fn child_can_depend_on_parent_implicitly(mut self, value: Option<bool>) -> Self {
        set_if_present(&mut self.child_can_depend_on_parent_implicitly, value);
        self
    }

    /// Sets the implicit parent-to-child flag if `value` is present.
    #[must_use]
    pub fn parent_can_depend_on_child_implicitly(mut self, value: Option<bool>) -> Self {
        set_if_present(&mut self.parent_can_depend_on_child_implicitly, value);
        self
    }

    /// Sets the issue limit if `value` is present.
    #[must_use]
    pub fn max_issue_count(mut self, value: Option<usize>) -> Self {
        set_if_present(&mut self.max_issue_count, value);
        self
    }

    /// Sets the illegal-dependency severity if `value` is present.
    #[must_use]
    pub fn dependency_issue_severity(mut self, value: Option<Severity>) -> Self {
        set_if_present(&mut self.dependency_issue_severity, value);
        self
    }

    /// Sets the too-many-issues severity if `value` is present.
    #[must_use]
    pub fn max_issue_count_severity(mut self, value: Option<Severity>) -> Self {
        set_if_present(&mut self.max_issue_count_severity, value);
        self
    }

    /// Sets the assembly-check flag if `value` is present.
    #[must_use]
    pub fn check_assembly_dependencies(mut self, value: Option<bool>) -> Self {
        set_if_present(&mut self.check_assembly_dependencies, value);
        self
    }

    /// Adds source path exclusion patterns.
    #[must_use]
    pub fn excluded_files<I>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = GlobPattern>,
    {
        for pattern in patterns {
            push_unique(&mut self.excluded_files, pattern);
        }
        self
    }

    /// Adds an allow rule. An empty `visible_types` means all types.
    ///
    /// A rule added twice keeps its first position and the union of both
    /// type sets.
    #[must_use]
    pub fn allow(mut self, rule: DependencyRule, visible_types: TypeNameSet) -> Self {
        if let Some(&index) = self.allow_rule_index.get(&rule) {
            self.allow_rules[index].1.union_with(&visible_types);
        } else {
            self.allow_rule_index
                .insert(rule.clone(), self.allow_rules.len());
            self.allow_rules.push((rule, visible_types));
        }
        self
    }

    /// Adds a disallow rule.
    #[must_use]
    pub fn disallow(mut self, rule: DependencyRule) -> Self {
        push_unique(&mut self.disallow_rules, rule);
        self
    }

    /// Adds visible types for a namespace, merging with any existing entry.
    #[must_use]
    pub fn visible_types(mut self, namespace: Domain, types: TypeNameSet) -> Self {
        self.visible_types_by_namespace
            .entry(namespace)
            .or_default()
            .union_with(&types);
        self
    }

    /// Adds an allowed assembly rule.
    #[must_use]
    pub fn allow_assembly(mut self, rule: DependencyRule) -> Self {
        push_unique(&mut self.allowed_assembly_rules, rule);
        self
    }

    /// Adds a disallowed assembly rule.
    #[must_use]
    pub fn disallow_assembly(mut self, rule: DependencyRule) -> Self {
        push_unique(&mut self.disallowed_assembly_rules, rule);
        self
    }

    /// Merges `other` into `self`.
    ///
    /// `other`'s present scalars win; rule collections are unioned with
    /// `self`'s rules first.
    #[must_use]
    pub fn combine(self, other: ConfigBuilder) -> Self {
        let mut merged = self
            .is_enabled(other.is_enabled)
            .child_can_depend_on_parent_implicitly(other.child_can_depend_on_parent_implicitly)
            .parent_can_depend_on_child_implicitly(other.parent_can_depend_on_child_implicitly)
            .max_issue_count(other.max_issue_count)
            .dependency_issue_severity(other.dependency_issue_severity)
            .max_issue_count_severity(other.max_issue_count_severity)
            .check_assembly_dependencies(other.check_assembly_dependencies)
            .excluded_files(other.excluded_files);

        for (rule, types) in other.allow_rules {
            merged = merged.allow(rule, types);
        }
        for rule in other.disallow_rules {
            merged = merged.disallow(rule);
        }
        for (namespace, types) in other.visible_types_by_namespace {
            merged = merged.visible_types(namespace, types);
        }
        for rule in other.allowed_assembly_rules {
            merged = merged.allow_assembly(rule);
        }
        for rule in other.disallowed_assembly_rules {
            merged = merged.disallow_assembly(rule);
        }
        merged
    }

    /// Returns the enabled flag as specified so far.
    #[must_use]
    pub fn enabled_setting(&self) -> Option<bool> {
        self.is_enabled
    }

    /// Finalizes into an immutable config, filling unspecified scalars with
    /// their defaults.
    #[must_use]
    pub fn build(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            is_enabled: self.is_enabled.unwrap_or(super::DEFAULT_IS_ENABLED),
            child_can_depend_on_parent_implicitly: self
                .child_can_depend_on_parent_implicitly
                .unwrap_or(super::DEFAULT_CHILD_CAN_DEPEND_ON_PARENT_IMPLICITLY),
            parent_can_depend_on_child_implicitly: self
                .parent_can_depend_on_child_implicitly
                .unwrap_or(super::DEFAULT_PARENT_CAN_DEPEND_ON_CHILD_IMPLICITLY),
            max_issue_count: self
                .max_issue_count
                .unwrap_or(super::DEFAULT_MAX_ISSUE_COUNT),
            dependency_issue_severity: self
                .dependency_issue_severity
                .unwrap_or(super::DEFAULT_DEPENDENCY_ISSUE_SEVERITY),
            max_issue_count_severity: self
                .max_issue_count_severity
                .unwrap_or(super::DEFAULT_MAX_ISSUE_COUNT_SEVERITY),
            check_assembly_dependencies: self
                .check_assembly_dependencies
                .unwrap_or(super::DEFAULT_CHECK_ASSEMBLY_DEPENDENCIES),
            excluded_files: self.excluded_files.clone(),
            allow_rules: self
                .allow_rules
                .iter()
                .map(|(rule, types)| AllowRule {
                    rule: rule.clone(),
                    visible_types: Arc::new(types.clone()),
                })
                .collect(),
            disallow_rules: self.disallow_rules.clone(),
            visible_types_by_namespace: self
                .visible_types_by_namespace
                .iter()
                .map(|(namespace, types)| (namespace.clone(), Arc::new(types.clone())))
                .collect(),
            allowed_assembly_rules: self.allowed_assembly_rules.clone(),
            disallowed_assembly_rules: self.disallowed_assembly_rules.clone(),
        }
    }
}

fn set_if_present<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}
