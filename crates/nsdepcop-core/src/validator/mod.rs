//! Dependency validation against one config generation.
//!
//! [`DependencyValidator`] is built from an immutable [`AnalyzerConfig`] and
//! is never updated in place: when the config changes, the validator and
//! its caches are dropped and a new one is built.
//!
//! # Resolution order (type dependencies)
//!
//! ```text
//! same namespace           → allowed (before the cache)
//! any disallow rule        → disallowed
//! implicit child → parent  → allowed (if enabled)
//! implicit parent → child  → allowed (if enabled)
//! most relevant allow rule → allowed, subject to visible types
//! otherwise                → disallowed
//! ```

use std::sync::Arc;

use crate::config::AnalyzerConfig;
use crate::dependency::{AssemblyDependency, DependencyStatus, TypeDependency};
use crate::domain::Domain;
use crate::rule::DependencyRule;

mod assembly;
mod cache;
mod type_rules;
mod usage;

pub use cache::CacheStatistics;

use assembly::AssemblyDependencyValidator;
use cache::DependencyCache;
use type_rules::TypeDependencyValidator;
use usage::RuleUsage;

/// A cached validation outcome plus the allow rule that decided it.
///
/// The rule index lets cache hits mark rule usage too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Verdict {
    pub(crate) status: DependencyStatus,
    pub(crate) allow_rule: Option<usize>,
}

impl Verdict {
    pub(crate) fn allowed() -> Self {
        Self {
            status: DependencyStatus::Allowed,
            allow_rule: None,
        }
    }

    pub(crate) fn disallowed() -> Self {
        Self {
            status: DependencyStatus::Disallowed,
            allow_rule: None,
        }
    }
}

/// Tests whether any rule matches. Disallow rules veto without ranking.
pub(crate) fn any_rule_matches(rules: &[DependencyRule], from: &Domain, to: &Domain) -> bool {
    rules.iter().any(|rule| rule.matches(from, to))
}

/// Returns the index of the most relevant matching rule.
///
/// Ranked by From relevance, then To relevance; on a full tie the earliest
/// rule wins.
pub(crate) fn most_relevant_rule<'a, I>(rules: I, from: &Domain, to: &Domain) -> Option<usize>
where
    I: IntoIterator<Item = &'a DependencyRule>,
{
    let mut best: Option<(usize, (u32, u32))> = None;
    for (index, rule) in rules.into_iter().enumerate() {
        let Some(relevance) = rule.relevance(from, to) else {
            continue;
        };
        if best.map_or(true, |(_, top)| relevance > top) {
            best = Some((index, relevance));
        }
    }
    best.map(|(index, _)| index)
}

/// Cached type and assembly validation for one config generation.
///
/// All methods take `&self` and may be called from many threads.
#[derive(Debug)]
pub struct DependencyValidator {
    config: Arc<AnalyzerConfig>,
    types: TypeDependencyValidator,
    assemblies: AssemblyDependencyValidator,
    type_cache: DependencyCache<TypeDependency, Verdict>,
    assembly_cache: DependencyCache<AssemblyDependency, Verdict>,
    type_usage: RuleUsage,
    assembly_usage: RuleUsage,
}

impl DependencyValidator {
    /// Creates a validator with cold caches.
    #[must_use]
    pub fn new(config: Arc<AnalyzerConfig>) -> Self {
        Self {
            types: TypeDependencyValidator::new(Arc::clone(&config)),
            assemblies: AssemblyDependencyValidator::new(Arc::clone(&config)),
            type_cache: DependencyCache::new("type dependency"),
            assembly_cache: DependencyCache::new("assembly dependency"),
            type_usage: RuleUsage::new(),
            assembly_usage: RuleUsage::new(),
            config,
        }
    }

    /// Returns the config this validator was built from.
    #[must_use]
    pub fn config(&self) -> &Arc<AnalyzerConfig> {
        &self.config
    }

    /// Validates a type dependency.
    #[must_use]
    pub fn check_type_dependency(&self, dependency: &TypeDependency) -> DependencyStatus {
        if dependency.is_same_domain() {
            return DependencyStatus::Allowed;
        }
        let verdict = self
            .type_cache
            .get_or_compute(dependency, || self.types.validate(dependency));
        if let Some(index) = verdict.allow_rule {
            self.type_usage.mark_used(&self.config.allow_rules[index].rule);
        }
        verdict.status
    }

    /// Returns true if the type dependency is allowed.
    #[must_use]
    pub fn is_allowed_dependency(
        &self,
        from_namespace: &str,
        from_type: &str,
        to_namespace: &str,
        to_type: &str,
    ) -> bool {
        self.check_type_dependency(&TypeDependency::new(
            from_namespace,
            from_type,
            to_namespace,
            to_type,
        ))
        .is_allowed()
    }

    /// Validates an assembly dependency.
    #[must_use]
    pub fn check_assembly_dependency(&self, dependency: &AssemblyDependency) -> DependencyStatus {
        if dependency.is_same_domain() {
            return DependencyStatus::Allowed;
        }
        let verdict = self
            .assembly_cache
            .get_or_compute(dependency, || self.assemblies.validate(dependency));
        if let Some(index) = verdict.allow_rule {
            self.assembly_usage
                .mark_used(&self.config.allowed_assembly_rules[index]);
        }
        verdict.status
    }

    /// Validates an assembly dependency given by names.
    #[must_use]
    pub fn is_allowed_assembly_dependency(&self, from: &str, to: &str) -> DependencyStatus {
        self.check_assembly_dependency(&AssemblyDependency::new(from, to))
    }

    /// Returns hit/miss counters, one entry per cache.
    #[must_use]
    pub fn cache_statistics(&self) -> Vec<CacheStatistics> {
        vec![self.type_cache.statistics(), self.assembly_cache.statistics()]
    }

    /// Returns the type allow rules not used since the last reset.
    #[must_use]
    pub fn unused_allow_rules(&self) -> Vec<DependencyRule> {
        self.type_usage
            .unused(self.config.allow_rules.iter().map(|r| &r.rule))
    }

    /// Returns the assembly allow rules not used since the last reset.
    #[must_use]
    pub fn unused_assembly_allow_rules(&self) -> Vec<DependencyRule> {
        self.assembly_usage.unused(&self.config.allowed_assembly_rules)
    }

    /// Starts a new usage-tracking pass.
    pub fn reset_rule_usage_tracking(&self) {
        self.type_usage.reset();
        self.assembly_usage.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::rule::TypeNameSet;

    fn rule(from: &str, to: &str) -> DependencyRule {
        DependencyRule::parse(from, to).unwrap()
    }

    fn validator(builder: ConfigBuilder) -> DependencyValidator {
        DependencyValidator::new(Arc::new(builder.build()))
    }

    fn type_stats(v: &DependencyValidator) -> CacheStatistics {
        v.cache_statistics().remove(0)
    }

    // -- Ranking helper --

    #[test]
    fn most_relevant_rule_prefers_specific_from() {
        let rules = [rule("A.*", "B"), rule("A.B.*", "B")];
        let from = Domain::new("A.B.C").unwrap();
        let to = Domain::new("B").unwrap();
        assert_eq!(most_relevant_rule(&rules, &from, &to), Some(1));
    }

    #[test]
    fn most_relevant_rule_none_when_nothing_matches() {
        let rules = [rule("X", "Y")];
        let d = Domain::new("A").unwrap();
        assert_eq!(most_relevant_rule(&rules, &d, &d), None);
    }

    // -- Cache --

    #[test]
    fn repeated_lookup_hits_cache() {
        let v = validator(ConfigBuilder::new().allow(rule("A", "B"), TypeNameSet::new()));
        assert!(v.is_allowed_dependency("A", "X", "B", "Y"));
        assert!(v.is_allowed_dependency("A", "X", "B", "Y"));
        assert!(v.is_allowed_dependency("A", "X", "B", "Y"));
        let stats = type_stats(&v);
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_count, 2);
    }

    #[test]
    fn type_names_are_part_of_cache_key() {
        let v = validator(ConfigBuilder::new().allow(rule("A", "B"), ["T1"].into_iter().collect()));
        assert!(v.is_allowed_dependency("A", "X", "B", "T1"));
        assert!(!v.is_allowed_dependency("A", "X", "B", "T2"));
        assert_eq!(type_stats(&v).miss_count, 2);
    }

    #[test]
    fn same_namespace_bypasses_cache() {
        let v = validator(ConfigBuilder::new());
        assert!(v.is_allowed_dependency("A", "X", "A", "Y"));
        let stats = type_stats(&v);
        assert_eq!(stats.hit_count + stats.miss_count, 0);
    }

    #[test]
    fn assembly_cache_counts_separately() {
        let v = validator(ConfigBuilder::new().allow_assembly(rule("App", "Lib")));
        assert!(v.is_allowed_assembly_dependency("App", "Lib").is_allowed());
        assert!(v.is_allowed_assembly_dependency("App", "Lib").is_allowed());
        let stats = v.cache_statistics();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[1].miss_count, 1);
        assert_eq!(stats[1].hit_count, 1);
        assert_eq!(stats[0].miss_count, 0);
    }

    // -- Rule usage --

    #[test]
    fn unused_rules_reported_until_used() {
        let v = validator(
            ConfigBuilder::new()
                .allow(rule("A", "B"), TypeNameSet::new())
                .allow(rule("C", "D"), TypeNameSet::new()),
        );
        assert_eq!(v.unused_allow_rules().len(), 2);
        assert!(v.is_allowed_dependency("A", "X", "B", "Y"));
        assert_eq!(v.unused_allow_rules(), vec![rule("C", "D")]);
    }

    #[test]
    fn cache_hits_mark_usage_after_reset() {
        let v = validator(ConfigBuilder::new().allow(rule("A", "B"), TypeNameSet::new()));
        assert!(v.is_allowed_dependency("A", "X", "B", "Y"));
        v.reset_rule_usage_tracking();
        assert_eq!(v.unused_allow_rules().len(), 1);

        assert!(v.is_allowed_dependency("A", "X", "B", "Y"));
        assert!(v.unused_allow_rules().is_empty());
        assert_eq!(type_stats(&v).hit_count, 1);
    }

    #[test]
    fn visibility_rejection_still_uses_the_rule() {
        let v = validator(ConfigBuilder::new().allow(rule("A", "B"), ["T1"].into_iter().collect()));
        assert!(!v.is_allowed_dependency("A", "X", "B", "T2"));
        assert!(v.unused_allow_rules().is_empty());
    }

    #[test]
    fn assembly_usage_is_tracked() {
        let v = validator(
            ConfigBuilder::new()
                .allow_assembly(rule("App", "Lib"))
                .allow_assembly(rule("App", "Other")),
        );
        let _ = v.is_allowed_assembly_dependency("App", "Lib");
        assert_eq!(v.unused_assembly_allow_rules(), vec![rule("App", "Other")]);
    }

    #[test]
    fn concurrent_validation_is_consistent() {
        let v = Arc::new(validator(
            ConfigBuilder::new().allow(rule("App.*", "Lib"), TypeNameSet::new()),
        ));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let v = Arc::clone(&v);
                std::thread::spawn(move || {
                    for i in 0..20 {
                        let from = format!("App.M{i}");
                        assert!(v.is_allowed_dependency(&from, "X", "Lib", "Y"));
                        assert!(!v.is_allowed_dependency(&from, "X", "Other", "Y"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let stats = type_stats(&v);
        assert_eq!(stats.miss_count, 40);
        assert_eq!(stats.hit_count, 4 * 40 - 40);
    }
}
