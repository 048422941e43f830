//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to a [`ConfigBuilder`](super::ConfigBuilder) via the loader.
//! String values that still need parsing keep their source span.

use serde::Deserialize;
use toml::Spanned;

/// Raw TOML representation of one `nsdepcop.toml` file.
///
/// Every scalar is optional so that "not specified" stays distinguishable
/// from "specified as the default".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDto {
    /// Whether analysis runs.
    #[serde(default)]
    pub is_enabled: Option<bool>,

    /// Allow dependencies on ancestor namespaces without a rule.
    #[serde(default)]
    pub child_can_depend_on_parent_implicitly: Option<bool>,

    /// Allow dependencies on descendant namespaces without a rule.
    #[serde(default)]
    pub parent_can_depend_on_child_implicitly: Option<bool>,

    /// Stop after this many dependency issues.
    #[serde(default)]
    pub max_issue_count: Option<usize>,

    /// Severity of illegal-dependency issues ("info", "warning", "error").
    #[serde(default)]
    pub dependency_issue_severity: Option<Spanned<String>>,

    /// Severity of the too-many-issues issue.
    #[serde(default)]
    pub max_issue_count_severity: Option<Spanned<String>>,

    /// Whether assembly dependencies are validated.
    #[serde(default)]
    pub check_assembly_dependencies: Option<bool>,

    /// Glob patterns of source files to skip.
    #[serde(default)]
    pub excluded_files: Vec<Spanned<String>>,

    /// Pattern syntax for this file ("wildcard" or "tree").
    #[serde(default)]
    pub pattern_syntax: Option<Spanned<String>>,

    /// Allowed namespace dependencies.
    #[serde(default)]
    pub allowed: Vec<AllowedDto>,

    /// Disallowed namespace dependencies.
    #[serde(default)]
    pub disallowed: Vec<RuleDto>,

    /// Per-namespace visible type lists.
    #[serde(rename = "visible-members", default)]
    pub visible_members: Vec<VisibleMembersDto>,

    /// Allowed assembly dependencies.
    #[serde(rename = "allowed-assembly", default)]
    pub allowed_assembly: Vec<RuleDto>,

    /// Disallowed assembly dependencies.
    #[serde(rename = "disallowed-assembly", default)]
    pub disallowed_assembly: Vec<RuleDto>,
}

/// TOML representation of an allow rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllowedDto {
    /// Source domain pattern.
    pub from: Spanned<String>,
    /// Target domain pattern.
    pub to: Spanned<String>,
    /// Types visible through this rule (default: all).
    #[serde(default)]
    pub visible_types: Vec<String>,
}

/// TOML representation of a plain (From, To) rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDto {
    /// Source pattern.
    pub from: Spanned<String>,
    /// Target pattern.
    pub to: Spanned<String>,
}

/// TOML representation of a visible-members entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VisibleMembersDto {
    /// The namespace whose visible types are listed.
    pub of_namespace: Spanned<String>,
    /// Visible type names.
    pub types: Vec<String>,
}
