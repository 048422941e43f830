//! Folder-hierarchy config discovery and the refresh state machine.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::{read_config_file, AnalyzerConfig, ConfigBuilder, ConfigError};

/// File name looked up at every folder level.
pub const CONFIG_FILE_NAME: &str = "nsdepcop.toml";

/// Hard cap on the number of folder levels searched, the project folder included.
pub const MAX_INHERITANCE_DEPTH: usize = 10;

/// The effective configuration state of one project.
#[derive(Debug, Clone)]
pub enum ConfigState {
    /// Analysis runs with this merged config.
    Enabled(Arc<AnalyzerConfig>),
    /// A config was found but analysis is switched off.
    Disabled,
    /// No config file exists at any searched level.
    NoConfig,
    /// A contributing file failed to load.
    Error(Arc<ConfigError>),
}

impl ConfigState {
    /// Returns true for [`ConfigState::Enabled`].
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// Returns the merged config when enabled.
    #[must_use]
    pub fn config(&self) -> Option<&Arc<AnalyzerConfig>> {
        match self {
            Self::Enabled(config) => Some(config),
            _ => None,
        }
    }

    /// Returns the load error in the error state.
    #[must_use]
    pub fn error(&self) -> Option<&ConfigError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Returns a short lowercase name of the state.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Enabled(_) => "enabled",
            Self::Disabled => "disabled",
            Self::NoConfig => "no-config",
            Self::Error(_) => "config-error",
        }
    }
}

impl fmt::Display for ConfigState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Change detection key of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

#[derive(Debug)]
struct ConfigLevel {
    path: PathBuf,
    fingerprint: Fingerprint,
    parsed: Result<ConfigBuilder, Arc<ConfigError>>,
}

impl ConfigLevel {
    /// A level is reusable only if it loaded and its file is untouched.
    fn is_current(&self, path: &Path, fingerprint: Fingerprint) -> bool {
        self.parsed.is_ok() && self.path == path && self.fingerprint == fingerprint
    }
}

/// Resolves the effective config of a project folder from the config files
/// in that folder and its ancestors.
///
/// Levels are merged from the most general (outermost) to the most specific
/// (the project folder), so inner files override the scalars they set while
/// rule sets accumulate. Files are re-parsed only when their modification
/// time or size changes.
#[derive(Debug)]
pub struct MultiLevelConfigProvider {
    project_dir: PathBuf,
    max_depth: usize,
    /// Most general first.
    levels: Vec<ConfigLevel>,
    state: ConfigState,
    loaded: bool,
}

impl MultiLevelConfigProvider {
    /// Creates a provider for `project_dir`. Nothing is read until
    /// [`refresh`](Self::refresh) is called.
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            max_depth: MAX_INHERITANCE_DEPTH,
            levels: Vec::new(),
            state: ConfigState::NoConfig,
            loaded: false,
        }
    }

    /// Limits the number of searched folder levels, clamped to
    /// `1..=MAX_INHERITANCE_DEPTH`.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.clamp(1, MAX_INHERITANCE_DEPTH);
        self
    }

    /// Returns the project folder.
    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Returns the state computed by the last refresh.
    #[must_use]
    pub fn state(&self) -> &ConfigState {
        &self.state
    }

    /// Returns the contributing files, most general first.
    #[must_use]
    pub fn config_files(&self) -> Vec<&Path> {
        self.levels.iter().map(|l| l.path.as_path()).collect()
    }

    /// Re-checks every level and recomputes the state if anything changed.
    ///
    /// Returns true if the state was recomputed. A previous valid config is
    /// never kept when a file fails to load, and a failed file is read again
    /// on every call whatever its fingerprint.
    pub fn refresh(&mut self) -> bool {
        let discovered = self.discover();

        let unchanged = self.loaded
            && discovered.len() == self.levels.len()
            && discovered
                .iter()
                .zip(&self.levels)
                .all(|((path, fp), level)| level.is_current(path, *fp));
        if unchanged {
            return false;
        }

        let mut previous = std::mem::take(&mut self.levels);
        self.levels = discovered
            .into_iter()
            .map(|(path, fingerprint)| {
                let reused = previous
                    .iter()
                    .position(|l| l.is_current(&path, fingerprint))
                    .map(|i| previous.swap_remove(i));
                match reused {
                    Some(level) => level,
                    None => {
                        tracing::debug!("loading config file {}", path.display());
                        let parsed = read_config_file(&path).map_err(Arc::new);
                        if let Err(e) = &parsed {
                            tracing::warn!("{e}");
                        }
                        ConfigLevel {
                            path,
                            fingerprint,
                            parsed,
                        }
                    }
                }
            })
            .collect();

        let state = self.merge_levels();
        if !self.loaded || state.name() != self.state.name() {
            tracing::info!(
                "config state for {}: {state}",
                self.project_dir.display()
            );
        }
        self.state = state;
        self.loaded = true;
        true
    }

    fn merge_levels(&self) -> ConfigState {
        if self.levels.is_empty() {
            return ConfigState::NoConfig;
        }

        let mut merged = ConfigBuilder::new();
        for level in &self.levels {
            match &level.parsed {
                Ok(builder) => merged = merged.combine(builder.clone()),
                Err(error) => return ConfigState::Error(Arc::clone(error)),
            }
        }

        let config = merged.build();
        if config.is_enabled() {
            ConfigState::Enabled(Arc::new(config))
        } else {
            ConfigState::Disabled
        }
    }

    /// Returns existing config files with their fingerprints, most general first.
    fn discover(&self) -> Vec<(PathBuf, Fingerprint)> {
        let start = fs::canonicalize(&self.project_dir).unwrap_or_else(|_| self.project_dir.clone());

        let mut found: Vec<(PathBuf, Fingerprint)> = start
            .ancestors()
            .take(self.max_depth)
            .filter_map(|dir| {
                let path = dir.join(CONFIG_FILE_NAME);
                let metadata = fs::metadata(&path).ok().filter(fs::Metadata::is_file)?;
                tracing::debug!("found config level {}", path.display());
                let fingerprint = Fingerprint {
                    modified: metadata.modified().ok(),
                    len: metadata.len(),
                };
                Some((path, fingerprint))
            })
            .collect();
        found.reverse();
        found
    }
}
