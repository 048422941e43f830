//! Assembly-to-assembly rule resolution.

use std::sync::Arc;

use crate::config::AnalyzerConfig;
use crate::dependency::AssemblyDependency;

use super::{any_rule_matches, most_relevant_rule, Verdict};

/// Decides assembly dependencies. Same resolution as for types, without
/// implicit hierarchy or visible types.
#[derive(Debug, Clone)]
pub(crate) struct AssemblyDependencyValidator {
    config: Arc<AnalyzerConfig>,
}

impl AssemblyDependencyValidator {
    pub(crate) fn new(config: Arc<AnalyzerConfig>) -> Self {
        Self { config }
    }

    pub(crate) fn validate(&self, dependency: &AssemblyDependency) -> Verdict {
        if dependency.is_same_domain() {
            return Verdict::allowed();
        }
        if any_rule_matches(
            &self.config.disallowed_assembly_rules,
            &dependency.from,
            &dependency.to,
        ) {
            return Verdict::disallowed();
        }
        match most_relevant_rule(
            &self.config.allowed_assembly_rules,
            &dependency.from,
            &dependency.to,
        ) {
            Some(index) => Verdict {
                allow_rule: Some(index),
                ..Verdict::allowed()
            },
            None => Verdict::disallowed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::dependency::DependencyStatus;
    use crate::rule::DependencyRule;

    fn rule(from: &str, to: &str) -> DependencyRule {
        DependencyRule::parse(from, to).unwrap()
    }

    fn validate(builder: ConfigBuilder, from: &str, to: &str) -> Verdict {
        AssemblyDependencyValidator::new(Arc::new(builder.build()))
            .validate(&AssemblyDependency::new(from, to))
    }

    #[test]
    fn same_assembly_is_allowed() {
        assert!(validate(ConfigBuilder::new(), "App", "App").status.is_allowed());
    }

    #[test]
    fn unlisted_assembly_is_disallowed() {
        let verdict = validate(ConfigBuilder::new(), "App", "Lib");
        assert_eq!(verdict.status, DependencyStatus::Disallowed);
        assert_eq!(verdict.allow_rule, None);
    }

    #[test]
    fn allowed_assembly_rule_permits() {
        let verdict = validate(
            ConfigBuilder::new().allow_assembly(rule("App.*", "System.*")),
            "App.Ui",
            "System.Text.Json",
        );
        assert!(verdict.status.is_allowed());
        assert_eq!(verdict.allow_rule, Some(0));
    }

    #[test]
    fn disallowed_assembly_rule_vetoes() {
        let builder = ConfigBuilder::new()
            .allow_assembly(rule("App", "*"))
            .disallow_assembly(rule("App", "Legacy"));
        assert!(!validate(builder.clone(), "App", "Legacy").status.is_allowed());
        assert!(validate(builder, "App", "Lib").status.is_allowed());
    }

    #[test]
    fn assemblies_have_no_implicit_hierarchy() {
        let builder = ConfigBuilder::new()
            .child_can_depend_on_parent_implicitly(Some(true))
            .parent_can_depend_on_child_implicitly(Some(true));
        assert!(!validate(builder.clone(), "App.Ui", "App").status.is_allowed());
        assert!(!validate(builder, "App", "App.Ui").status.is_allowed());
    }

    #[test]
    fn type_rules_do_not_apply_to_assemblies() {
        let builder = ConfigBuilder::new().allow(rule("App", "Lib"), Default::default());
        assert!(!validate(builder, "App", "Lib").status.is_allowed());
    }
}
