//! Analysis passes over the current config generation.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::config::{AnalyzerConfig, ConfigState, MultiLevelConfigProvider};
use crate::dependency::{AssemblyDependency, DependencyOccurrence, DependencyStatus};
use crate::types::{AnalysisResult, Issue, IssueKind, Location, Severity};
use crate::validator::DependencyValidator;

/// One merged config state plus the validator built from it.
///
/// Replaced as a whole on reload; readers keep whichever generation was
/// current when they started.
#[derive(Debug)]
pub struct ConfigGeneration {
    number: u64,
    state: ConfigState,
    validator: Option<DependencyValidator>,
}

impl ConfigGeneration {
    fn new(number: u64, state: ConfigState) -> Self {
        let validator = state
            .config()
            .map(|config| DependencyValidator::new(Arc::clone(config)));
        Self {
            number,
            state,
            validator,
        }
    }

    /// Returns the generation counter, starting at 0 before the first load.
    #[must_use]
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Returns the config state of this generation.
    #[must_use]
    pub fn state(&self) -> &ConfigState {
        &self.state
    }

    /// Returns the merged config when enabled.
    #[must_use]
    pub fn config(&self) -> Option<&Arc<AnalyzerConfig>> {
        self.state.config()
    }

    /// Returns the validator when enabled.
    #[must_use]
    pub fn validator(&self) -> Option<&DependencyValidator> {
        self.validator.as_ref()
    }
}

/// Runs dependency checks for one project folder.
///
/// # Example
///
/// ```no_run
/// use nsdepcop_core::{DependencyAnalyzer, DependencyOccurrence, TypeDependency};
///
/// let analyzer = DependencyAnalyzer::new("path/to/project");
/// let result = analyzer.analyze(&[DependencyOccurrence::new(TypeDependency::new(
///     "App.Ui", "MainView", "App.Data", "Repository",
/// ))]);
/// for issue in &result.issues {
///     println!("{issue}");
/// }
/// ```
#[derive(Debug)]
pub struct DependencyAnalyzer {
    project_dir: PathBuf,
    provider: Mutex<MultiLevelConfigProvider>,
    current: RwLock<Arc<ConfigGeneration>>,
}

impl DependencyAnalyzer {
    /// Creates an analyzer for `project_dir` and loads its config.
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self::with_provider(MultiLevelConfigProvider::new(project_dir))
    }

    /// Creates an analyzer around a configured provider and loads its config.
    #[must_use]
    pub fn with_provider(provider: MultiLevelConfigProvider) -> Self {
        let project_dir = fs::canonicalize(provider.project_dir())
            .unwrap_or_else(|_| normalize_lexically(provider.project_dir()));
        let analyzer = Self {
            project_dir,
            provider: Mutex::new(provider),
            current: RwLock::new(Arc::new(ConfigGeneration::new(0, ConfigState::NoConfig))),
        };
        analyzer.refresh_config();
        analyzer
    }

    /// Returns the project folder, resolved to an absolute path when it exists.
    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Returns the contributing config files, most general first.
    #[must_use]
    pub fn config_files(&self) -> Vec<PathBuf> {
        self.provider
            .lock()
            .config_files()
            .into_iter()
            .map(Path::to_path_buf)
            .collect()
    }

    /// Re-checks the config files and swaps in a new generation if anything
    /// changed. Returns true on a swap.
    pub fn refresh_config(&self) -> bool {
        let mut provider = self.provider.lock();
        if !provider.refresh() {
            return false;
        }
        let number = self.current.read().number + 1;
        let generation = Arc::new(ConfigGeneration::new(number, provider.state().clone()));
        debug!("config generation {number}: {}", generation.state());
        *self.current.write() = generation;
        true
    }

    /// Returns the current generation.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ConfigGeneration> {
        self.current.read().clone()
    }

    /// Returns the current config state.
    #[must_use]
    pub fn state(&self) -> ConfigState {
        self.snapshot().state().clone()
    }

    /// Validates type dependencies found in source.
    ///
    /// Without an enabled config the result holds a single state issue.
    #[must_use]
    pub fn analyze(&self, occurrences: &[DependencyOccurrence]) -> AnalysisResult {
        let generation = self.snapshot();
        let (Some(config), Some(validator)) = (generation.config(), generation.validator()) else {
            return state_result(generation.state());
        };

        let mut result = AnalysisResult::new();
        let mut reported = 0usize;
        for occurrence in occurrences {
            if self.is_excluded(config, occurrence.location.as_ref()) {
                continue;
            }
            result.dependencies_checked += 1;

            let dependency = &occurrence.dependency;
            let message = match validator.check_type_dependency(dependency) {
                DependencyStatus::Allowed => continue,
                DependencyStatus::Disallowed => {
                    format!("Illegal namespace reference: {dependency}")
                }
                DependencyStatus::DisallowedByVisibility { visible_types } => format!(
                    "Illegal namespace reference: {dependency}. Visible types in {}: {visible_types}",
                    dependency.to_namespace
                ),
            };

            if reported == config.max_issue_count() {
                result.issues.push(Issue::new(
                    IssueKind::TooManyIssues,
                    config.max_issue_count_severity(),
                    format!(
                        "Too many issues, analysis stopped after {} reported issues",
                        config.max_issue_count()
                    ),
                ));
                info!("issue limit reached for {}", self.project_dir.display());
                break;
            }
            reported += 1;
            result.issues.push(
                Issue::new(
                    IssueKind::IllegalDependency,
                    config.dependency_issue_severity(),
                    message,
                )
                .with_location(occurrence.location.clone()),
            );
        }
        result
    }

    /// Validates assembly references.
    ///
    /// Returns an empty result unless the config is enabled and checks
    /// assembly dependencies.
    #[must_use]
    pub fn analyze_assemblies(&self, dependencies: &[AssemblyDependency]) -> AnalysisResult {
        let generation = self.snapshot();
        let mut result = AnalysisResult::new();
        let (Some(config), Some(validator)) = (generation.config(), generation.validator()) else {
            return result;
        };
        if !config.check_assembly_dependencies() {
            return result;
        }

        for dependency in dependencies {
            result.dependencies_checked += 1;
            if !validator.check_assembly_dependency(dependency).is_allowed() {
                result.issues.push(Issue::new(
                    IssueKind::IllegalAssemblyDependency,
                    config.dependency_issue_severity(),
                    format!("Illegal assembly reference: {dependency}"),
                ));
            }
        }
        result
    }

    /// Reports allow rules that permitted nothing since the last reset.
    #[must_use]
    pub fn unused_allow_rule_issues(&self) -> Vec<Issue> {
        let generation = self.snapshot();
        let (Some(config), Some(validator)) = (generation.config(), generation.validator()) else {
            return Vec::new();
        };

        let mut unused = validator.unused_allow_rules();
        if config.check_assembly_dependencies() {
            unused.extend(validator.unused_assembly_allow_rules());
        }
        unused
            .into_iter()
            .map(|rule| {
                Issue::new(
                    IssueKind::UnusedAllowRule,
                    Severity::Info,
                    format!("Allow rule `{rule}` was not used"),
                )
            })
            .collect()
    }

    /// Starts a new rule-usage pass on the current generation.
    pub fn reset_rule_usage(&self) {
        if let Some(validator) = self.snapshot().validator() {
            validator.reset_rule_usage_tracking();
        }
    }

    fn is_excluded(&self, config: &AnalyzerConfig, location: Option<&Location>) -> bool {
        let Some(location) = location else {
            return false;
        };
        if config.excluded_files().is_empty() {
            return false;
        }
        if !location.file.is_absolute() {
            return config.is_excluded(&normalize_lexically(&location.file));
        }
        let file = resolve_absolute(&location.file);
        match file.strip_prefix(&self.project_dir) {
            Ok(relative) => config.is_excluded(relative),
            Err(_) => config.is_excluded(&file),
        }
    }
}

/// Resolves symlinks and `..` in an absolute source path.
///
/// The file itself may not exist (extractors can report generated sources),
/// so the parent folder is tried before falling back to a lexical cleanup.
fn resolve_absolute(file: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(file) {
        return resolved;
    }
    let file = normalize_lexically(file);
    match (file.parent().map(fs::canonicalize), file.file_name()) {
        (Some(Ok(parent)), Some(name)) => parent.join(name),
        _ => file,
    }
}

/// Drops `.` components and folds `..` into the preceding name.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if normalized.file_name().is_some() => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// The single issue reported when analysis cannot run.
fn state_result(state: &ConfigState) -> AnalysisResult {
    let issue = match state {
        ConfigState::Enabled(_) => return AnalysisResult::new(),
        ConfigState::NoConfig => Issue::new(
            IssueKind::NoConfigFile,
            Severity::Info,
            "No config file found, analysis skipped",
        ),
        ConfigState::Disabled => Issue::new(
            IssueKind::ConfigDisabled,
            Severity::Info,
            "Analysis is disabled in the config file",
        ),
        ConfigState::Error(error) => {
            let location = error
                .line_column()
                .map(|(line, column)| Location::new(error.path(), line, column));
            Issue::new(
                IssueKind::ConfigError,
                Severity::Error,
                format!("Error loading config: {error}"),
            )
            .with_location(location)
        }
    };
    AnalysisResult {
        issues: vec![issue],
        dependencies_checked: 0,
    }
}
