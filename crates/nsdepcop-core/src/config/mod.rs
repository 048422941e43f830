//! Rule configuration: TOML files, partial builders and the merged snapshot.
//!
//! # Pipeline
//!
//! ```text
//! nsdepcop.toml (one per folder level)
//!   ↓ serde (DTO layer)
//! dto::ConfigDto
//!   ↓ loader::load (domain parsing, value validation)
//! ConfigBuilder (optional fields, union-able rule sets)
//!   ↓ combine, most general level first
//! ConfigBuilder (merged)
//!   ↓ build
//! AnalyzerConfig (immutable, consumed by validators)
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::domain::Domain;
use crate::rule::{DependencyRule, TypeNameSet};
use crate::types::Severity;

mod builder;
pub mod dto;
mod error;
mod exclusion;
pub mod loader;
mod provider;

pub use builder::ConfigBuilder;
pub use error::ConfigError;
pub use exclusion::GlobPattern;
pub use provider::{ConfigState, MultiLevelConfigProvider, CONFIG_FILE_NAME, MAX_INHERITANCE_DEPTH};

/// Default for [`AnalyzerConfig::is_enabled`].
pub const DEFAULT_IS_ENABLED: bool = true;
/// Default for [`AnalyzerConfig::child_can_depend_on_parent_implicitly`].
pub const DEFAULT_CHILD_CAN_DEPEND_ON_PARENT_IMPLICITLY: bool = false;
/// Default for [`AnalyzerConfig::parent_can_depend_on_child_implicitly`].
pub const DEFAULT_PARENT_CAN_DEPEND_ON_CHILD_IMPLICITLY: bool = false;
/// Default for [`AnalyzerConfig::max_issue_count`].
pub const DEFAULT_MAX_ISSUE_COUNT: usize = 100;
/// Default for [`AnalyzerConfig::dependency_issue_severity`].
pub const DEFAULT_DEPENDENCY_ISSUE_SEVERITY: Severity = Severity::Warning;
/// Default for [`AnalyzerConfig::max_issue_count_severity`].
pub const DEFAULT_MAX_ISSUE_COUNT_SEVERITY: Severity = Severity::Warning;
/// Default for [`AnalyzerConfig::check_assembly_dependencies`].
pub const DEFAULT_CHECK_ASSEMBLY_DEPENDENCIES: bool = false;

/// An allow rule with its optional visible-type restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowRule {
    /// The (From, To) pair.
    pub rule: DependencyRule,
    /// Types visible through this rule. Empty means all types.
    pub visible_types: Arc<TypeNameSet>,
}

/// The merged, immutable configuration used at validation time.
///
/// Only [`ConfigBuilder::build`] creates one.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub(crate) is_enabled: bool,
    pub(crate) child_can_depend_on_parent_implicitly: bool,
    pub(crate) parent_can_depend_on_child_implicitly: bool,
    pub(crate) max_issue_count: usize,
    pub(crate) dependency_issue_severity: Severity,
    pub(crate) max_issue_count_severity: Severity,
    pub(crate) check_assembly_dependencies: bool,
    pub(crate) excluded_files: Vec<GlobPattern>,
    pub(crate) allow_rules: Vec<AllowRule>,
    pub(crate) disallow_rules: Vec<DependencyRule>,
    pub(crate) visible_types_by_namespace: HashMap<Domain, Arc<TypeNameSet>>,
    pub(crate) allowed_assembly_rules: Vec<DependencyRule>,
    pub(crate) disallowed_assembly_rules: Vec<DependencyRule>,
}

impl AnalyzerConfig {
    /// Returns true if analysis is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Returns true if a namespace may depend on its ancestors without a rule.
    #[must_use]
    pub fn child_can_depend_on_parent_implicitly(&self) -> bool {
        self.child_can_depend_on_parent_implicitly
    }

    /// Returns true if a namespace may depend on its descendants without a rule.
    #[must_use]
    pub fn parent_can_depend_on_child_implicitly(&self) -> bool {
        self.parent_can_depend_on_child_implicitly
    }

    /// Returns the number of dependency issues after which analysis stops.
    #[must_use]
    pub fn max_issue_count(&self) -> usize {
        self.max_issue_count
    }

    /// Returns the severity of illegal-dependency issues.
    #[must_use]
    pub fn dependency_issue_severity(&self) -> Severity {
        self.dependency_issue_severity
    }

    /// Returns the severity of the too-many-issues issue.
    #[must_use]
    pub fn max_issue_count_severity(&self) -> Severity {
        self.max_issue_count_severity
    }

    /// Returns true if assembly dependencies are validated.
    #[must_use]
    pub fn check_assembly_dependencies(&self) -> bool {
        self.check_assembly_dependencies
    }

    /// Returns the source path exclusion patterns.
    #[must_use]
    pub fn excluded_files(&self) -> &[GlobPattern] {
        &self.excluded_files
    }

    /// Returns the allow rules in merged input order.
    #[must_use]
    pub fn allow_rules(&self) -> &[AllowRule] {
        &self.allow_rules
    }

    /// Returns the disallow rules.
    #[must_use]
    pub fn disallow_rules(&self) -> &[DependencyRule] {
        &self.disallow_rules
    }

    /// Returns the per-namespace visible-type overrides.
    #[must_use]
    pub fn visible_types_by_namespace(&self) -> &HashMap<Domain, Arc<TypeNameSet>> {
        &self.visible_types_by_namespace
    }

    /// Returns the allowed assembly rules.
    #[must_use]
    pub fn allowed_assembly_rules(&self) -> &[DependencyRule] {
        &self.allowed_assembly_rules
    }

    /// Returns the disallowed assembly rules.
    #[must_use]
    pub fn disallowed_assembly_rules(&self) -> &[DependencyRule] {
        &self.disallowed_assembly_rules
    }

    /// Tests whether a source path is excluded from analysis.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.excluded_files.iter().any(|p| p.matches(path))
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        ConfigBuilder::new().build()
    }
}

/// Parses one config document into a partial builder.
///
/// `origin` names the document in error reports.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or any value is invalid.
pub fn parse_config(content: &str, origin: &Path) -> Result<ConfigBuilder, ConfigError> {
    let dto: dto::ConfigDto =
        toml::from_str(content).map_err(|e| ConfigError::syntax(origin, content, &e))?;
    loader::load(dto).map_err(|e| ConfigError::invalid(origin, content, e))
}

/// Reads and parses one config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not UTF-8, or its content
/// is invalid.
pub fn read_config_file(path: &Path) -> Result<ConfigBuilder, ConfigError> {
    let bytes = std::fs::read(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let content = String::from_utf8(bytes).map_err(|e| {
        let offset = e.utf8_error().valid_up_to();
        ConfigError::encoding(path, &String::from_utf8_lossy(e.as_bytes()), offset)
    })?;
    parse_config(&content, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_documented_defaults() {
        let config = AnalyzerConfig::default();
        assert!(config.is_enabled());
        assert!(!config.child_can_depend_on_parent_implicitly());
        assert!(!config.parent_can_depend_on_child_implicitly());
        assert_eq!(config.max_issue_count(), 100);
        assert_eq!(config.dependency_issue_severity(), Severity::Warning);
        assert_eq!(config.max_issue_count_severity(), Severity::Warning);
        assert!(!config.check_assembly_dependencies());
        assert!(config.allow_rules().is_empty());
    }

    #[test]
    fn parse_config_reports_origin_in_errors() {
        let err = parse_config("max_issue_count = \"many\"", Path::new("root/nsdepcop.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("root/nsdepcop.toml"));
        assert_eq!(err.line_column().map(|(line, _)| line), Some(1));
    }

    #[test]
    fn invalid_utf8_is_located() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nsdepcop.toml");
        std::fs::write(&path, b"is_enabled = true\nmax_issue_count = \xff\n").unwrap();

        let err = read_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { .. }), "{err:?}");
        assert_eq!(err.line_column(), Some((2, 19)));
        assert!(err.to_string().contains("invalid UTF-8"));
    }

    #[test]
    fn excluded_files_match_relative_paths() {
        let config = parse_config(
            r#"excluded_files = ["Generated/**"]"#,
            Path::new("nsdepcop.toml"),
        )
        .unwrap()
        .build();
        assert!(config.is_excluded(Path::new("Generated/A.cs")));
        assert!(!config.is_excluded(Path::new("Src/A.cs")));
    }
}
