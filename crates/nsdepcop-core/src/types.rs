//! Issue types reported by an analysis pass.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for reported issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail a build.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Source file path.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// Kinds of issues, each with a stable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// A type dependency that no rule permits.
    IllegalDependency,
    /// Analysis stopped after reaching the configured issue limit.
    TooManyIssues,
    /// No config file was found for the project.
    NoConfigFile,
    /// The effective config disables analysis.
    ConfigDisabled,
    /// A config file could not be loaded.
    ConfigError,
    /// An assembly dependency that no rule permits.
    IllegalAssemblyDependency,
    /// An allow rule that matched nothing during the pass.
    UnusedAllowRule,
}

impl IssueKind {
    /// Returns the issue code (e.g. "NSDEPCOP01").
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::IllegalDependency => "NSDEPCOP01",
            Self::TooManyIssues => "NSDEPCOP02",
            Self::NoConfigFile => "NSDEPCOP03",
            Self::ConfigDisabled => "NSDEPCOP04",
            Self::ConfigError => "NSDEPCOP05",
            Self::IllegalAssemblyDependency => "NSDEPCOP06",
            Self::UnusedAllowRule => "NSDEPCOP07",
        }
    }
}

/// An issue found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// What kind of issue this is.
    pub kind: IssueKind,
    /// Severity of this issue.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Where the issue occurs, if it is tied to source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Issue {
    /// Creates a new issue without a location.
    #[must_use]
    pub fn new(kind: IssueKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            location: None,
        }
    }

    /// Attaches a location to this issue.
    #[must_use]
    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    /// Returns the issue code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(location) = &self.location {
            write!(
                f,
                "{}:{}:{}: ",
                location.file.display(),
                location.line,
                location.column
            )?;
        }
        write!(f, "{} [{}] {}", self.severity, self.code(), self.message)
    }
}

/// Result of an analysis pass.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// All issues found.
    pub issues: Vec<Issue>,
    /// Number of dependencies validated.
    pub dependencies_checked: usize,
}

impl AnalysisResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_issues_at(Severity::Error)
    }

    /// Checks if any issues meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_issues_at(&self, severity: Severity) -> bool {
        self.issues.iter().any(|i| i.severity >= severity)
    }

    /// Returns issues of the given kind.
    #[must_use]
    pub fn by_kind(&self, kind: IssueKind) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.kind == kind).collect()
    }

    /// Counts issues by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| self.issues.iter().filter(|i| i.severity == severity).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Adds issues from another result.
    pub fn extend(&mut self, other: Self) {
        self.issues.extend(other.issues);
        self.dependencies_checked += other.dependencies_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_issue(severity: Severity) -> Issue {
        Issue::new(IssueKind::IllegalDependency, severity, "App -> Lib")
    }

    #[test]
    fn severity_orders_info_warning_error() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(IssueKind::IllegalDependency.code(), "NSDEPCOP01");
        assert_eq!(IssueKind::ConfigError.code(), "NSDEPCOP05");
    }

    #[test]
    fn display_includes_location_when_present() {
        let issue = make_issue(Severity::Warning)
            .with_location(Some(Location::new("src/App.cs", 3, 7)));
        assert_eq!(
            issue.to_string(),
            "src/App.cs:3:7: warning [NSDEPCOP01] App -> Lib"
        );
        assert_eq!(
            make_issue(Severity::Error).to_string(),
            "error [NSDEPCOP01] App -> Lib"
        );
    }

    #[test]
    fn has_issues_at_threshold() {
        let mut result = AnalysisResult::new();
        result.issues.push(make_issue(Severity::Warning));
        assert!(!result.has_errors());
        assert!(result.has_issues_at(Severity::Warning));
        assert!(result.has_issues_at(Severity::Info));
    }

    #[test]
    fn count_and_extend() {
        let mut a = AnalysisResult::new();
        a.issues.push(make_issue(Severity::Error));
        a.dependencies_checked = 2;

        let mut b = AnalysisResult::new();
        b.issues.push(make_issue(Severity::Info));
        b.dependencies_checked = 3;

        a.extend(b);
        assert_eq!(a.count_by_severity(), (1, 0, 1));
        assert_eq!(a.dependencies_checked, 5);
    }
}
