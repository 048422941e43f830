//! Allow-rule usage tracking across an analysis pass.

use dashmap::DashSet;

use crate::rule::DependencyRule;

/// The set of allow rules that permitted at least one dependency.
///
/// Safe to mark from many threads; cleared explicitly between passes.
#[derive(Debug, Default)]
pub(crate) struct RuleUsage {
    used: DashSet<DependencyRule>,
}

impl RuleUsage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn mark_used(&self, rule: &DependencyRule) {
        if !self.used.contains(rule) {
            self.used.insert(rule.clone());
        }
    }

    pub(crate) fn is_used(&self, rule: &DependencyRule) -> bool {
        self.used.contains(rule)
    }

    /// Returns the rules from `rules` that were never marked, in input order.
    pub(crate) fn unused<'a, I>(&self, rules: I) -> Vec<DependencyRule>
    where
        I: IntoIterator<Item = &'a DependencyRule>,
    {
        rules
            .into_iter()
            .filter(|rule| !self.is_used(rule))
            .cloned()
            .collect()
    }

    pub(crate) fn reset(&self) {
        self.used.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(from: &str, to: &str) -> DependencyRule {
        DependencyRule::parse(from, to).unwrap()
    }

    #[test]
    fn unmarked_rules_are_unused() {
        let usage = RuleUsage::new();
        let rules = [rule("A", "B"), rule("C", "D")];
        usage.mark_used(&rules[1]);
        assert_eq!(usage.unused(&rules), vec![rule("A", "B")]);
    }

    #[test]
    fn reset_forgets_usage() {
        let usage = RuleUsage::new();
        let r = rule("A", "B");
        usage.mark_used(&r);
        assert!(usage.is_used(&r));
        usage.reset();
        assert!(!usage.is_used(&r));
    }
}
