//! # nsdepcop-core
//!
//! Rule engine for namespace and assembly dependency checks.
//!
//! Given candidate dependency edges extracted by a host (a compiler plugin,
//! a build task, the `nsdepcop` CLI), this crate decides which ones the
//! project's `nsdepcop.toml` files permit. It includes:
//!
//! - [`DomainSpecification`] patterns (exact, `?`/`*` wildcard, `/regex/`,
//!   legacy tree) with relevance scoring
//! - [`ConfigBuilder`] and [`MultiLevelConfigProvider`] for merging config
//!   files along the folder hierarchy
//! - [`DependencyValidator`] with a concurrent result cache and unused-rule
//!   tracking
//! - [`DependencyAnalyzer`] for analysis passes that turn verdicts into
//!   [`Issue`]s
//!
//! ## Example
//!
//! ```
//! use std::path::Path;
//! use std::sync::Arc;
//! use nsdepcop_core::{config, DependencyValidator};
//!
//! let toml = r#"
//! [[allowed]]
//! from = "App.*"
//! to = "Lib"
//!
//! [[disallowed]]
//! from = "App.Internal"
//! to = "Lib"
//! "#;
//! let config = config::parse_config(toml, Path::new("nsdepcop.toml"))?.build();
//! let validator = DependencyValidator::new(Arc::new(config));
//!
//! assert!(validator.is_allowed_dependency("App.Feature", "View", "Lib", "Api"));
//! assert!(!validator.is_allowed_dependency("App.Internal", "Job", "Lib", "Api"));
//! # Ok::<(), nsdepcop_core::ConfigError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod dependency;
mod rule;
mod types;

pub mod config;
pub mod domain;
pub mod validator;

pub use analyzer::{ConfigGeneration, DependencyAnalyzer};
pub use config::{
    AllowRule, AnalyzerConfig, ConfigBuilder, ConfigError, ConfigState, MultiLevelConfigProvider,
};
pub use dependency::{AssemblyDependency, DependencyOccurrence, DependencyStatus, TypeDependency};
pub use domain::{Domain, DomainError, DomainSpecification, PatternSyntax};
pub use rule::{DependencyRule, TypeNameSet};
pub use types::{AnalysisResult, Issue, IssueKind, Location, Severity};
pub use validator::{CacheStatistics, DependencyValidator};
