//! DTO → builder conversion with validation.

use std::ops::Range;

use toml::Spanned;

use crate::domain::{Domain, DomainError, DomainSpecification, PatternSyntax};
use crate::rule::{DependencyRule, TypeNameSet};
use crate::types::Severity;

use super::dto::{AllowedDto, ConfigDto, RuleDto, VisibleMembersDto};
use super::{ConfigBuilder, GlobPattern};

/// Errors during DTO → builder conversion.
///
/// Each variant keeps the byte span of the offending value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    /// A domain or domain pattern failed to parse.
    #[error("{context}: {source}")]
    Domain {
        /// Where the error occurred (e.g., "allowed[2].from").
        context: String,
        /// Byte span of the value.
        span: Range<usize>,
        /// The underlying domain error.
        source: DomainError,
    },

    /// A string setting has a value outside its accepted set.
    #[error("{context}: unknown value `{value}`, expected: {expected}")]
    UnknownValue {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
        /// Accepted values.
        expected: &'static str,
        /// Byte span of the value.
        span: Range<usize>,
    },

    /// An exclusion glob is invalid.
    #[error("{context}: invalid glob `{pattern}`: {reason}")]
    Glob {
        /// Where the error occurred.
        context: String,
        /// The glob text.
        pattern: String,
        /// Why it was rejected.
        reason: String,
        /// Byte span of the value.
        span: Range<usize>,
    },
}

impl LoadError {
    /// Returns the byte span of the offending value.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Domain { span, .. } | Self::UnknownValue { span, .. } | Self::Glob { span, .. } => {
                span.clone()
            }
        }
    }
}

/// Converts a `ConfigDto` to a partial [`ConfigBuilder`].
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: ConfigDto) -> Result<ConfigBuilder, LoadError> {
    let syntax = dto
        .pattern_syntax
        .as_ref()
        .map(parse_pattern_syntax)
        .transpose()?
        .unwrap_or_default();

    let dependency_issue_severity = dto
        .dependency_issue_severity
        .as_ref()
        .map(|v| parse_severity(v, "dependency_issue_severity"))
        .transpose()?;
    let max_issue_count_severity = dto
        .max_issue_count_severity
        .as_ref()
        .map(|v| parse_severity(v, "max_issue_count_severity"))
        .transpose()?;

    let excluded_files = dto
        .excluded_files
        .iter()
        .enumerate()
        .map(|(i, p)| convert_glob(p, i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = ConfigBuilder::new()
        .is_enabled(dto.is_enabled)
        .child_can_depend_on_parent_implicitly(dto.child_can_depend_on_parent_implicitly)
        .parent_can_depend_on_child_implicitly(dto.parent_can_depend_on_child_implicitly)
        .max_issue_count(dto.max_issue_count)
        .dependency_issue_severity(dependency_issue_severity)
        .max_issue_count_severity(max_issue_count_severity)
        .check_assembly_dependencies(dto.check_assembly_dependencies)
        .excluded_files(excluded_files);

    for (i, allowed) in dto.allowed.iter().enumerate() {
        let (rule, types) = convert_allowed(allowed, i, syntax)?;
        builder = builder.allow(rule, types);
    }
    for (i, rule) in dto.disallowed.iter().enumerate() {
        builder = builder.disallow(convert_rule(rule, &format!("disallowed[{i}]"), syntax)?);
    }
    for (i, members) in dto.visible_members.iter().enumerate() {
        let (namespace, types) = convert_visible_members(members, i)?;
        builder = builder.visible_types(namespace, types);
    }
    for (i, rule) in dto.allowed_assembly.iter().enumerate() {
        builder =
            builder.allow_assembly(convert_rule(rule, &format!("allowed-assembly[{i}]"), syntax)?);
    }
    for (i, rule) in dto.disallowed_assembly.iter().enumerate() {
        builder = builder
            .disallow_assembly(convert_rule(rule, &format!("disallowed-assembly[{i}]"), syntax)?);
    }

    Ok(builder)
}

fn convert_allowed(
    dto: &AllowedDto,
    index: usize,
    syntax: PatternSyntax,
) -> Result<(DependencyRule, TypeNameSet), LoadError> {
    let ctx = format!("allowed[{index}]");
    let from = parse_spec(&dto.from, &format!("{ctx}.from"), syntax)?;
    let to = parse_spec(&dto.to, &format!("{ctx}.to"), syntax)?;
    let types = dto.visible_types.iter().map(|t| t.trim()).collect();
    Ok((DependencyRule::new(from, to), types))
}

fn convert_rule(
    dto: &RuleDto,
    ctx: &str,
    syntax: PatternSyntax,
) -> Result<DependencyRule, LoadError> {
    let from = parse_spec(&dto.from, &format!("{ctx}.from"), syntax)?;
    let to = parse_spec(&dto.to, &format!("{ctx}.to"), syntax)?;
    Ok(DependencyRule::new(from, to))
}

fn convert_visible_members(
    dto: &VisibleMembersDto,
    index: usize,
) -> Result<(Domain, TypeNameSet), LoadError> {
    let namespace = Domain::new(dto.of_namespace.get_ref()).map_err(|e| LoadError::Domain {
        context: format!("visible-members[{index}].of_namespace"),
        span: dto.of_namespace.span(),
        source: e,
    })?;
    let types = dto.types.iter().map(|t| t.trim()).collect();
    Ok((namespace, types))
}

fn convert_glob(value: &Spanned<String>, index: usize) -> Result<GlobPattern, LoadError> {
    GlobPattern::new(value.get_ref()).map_err(|reason| LoadError::Glob {
        context: format!("excluded_files[{index}]"),
        pattern: value.get_ref().clone(),
        reason,
        span: value.span(),
    })
}

fn parse_spec(
    value: &Spanned<String>,
    context: &str,
    syntax: PatternSyntax,
) -> Result<DomainSpecification, LoadError> {
    DomainSpecification::parse_with(value.get_ref(), syntax).map_err(|e| LoadError::Domain {
        context: context.to_string(),
        span: value.span(),
        source: e,
    })
}

fn parse_pattern_syntax(value: &Spanned<String>) -> Result<PatternSyntax, LoadError> {
    match value.get_ref().as_str() {
        "wildcard" => Ok(PatternSyntax::Wildcard),
        "tree" => Ok(PatternSyntax::Tree),
        other => Err(LoadError::UnknownValue {
            context: "pattern_syntax".to_string(),
            value: other.to_string(),
            expected: "wildcard, tree",
            span: value.span(),
        }),
    }
}

fn parse_severity(value: &Spanned<String>, context: &str) -> Result<Severity, LoadError> {
    match value.get_ref().as_str() {
        "error" => Ok(Severity::Error),
        "warning" => Ok(Severity::Warning),
        "info" => Ok(Severity::Info),
        other => Err(LoadError::UnknownValue {
            context: context.to_string(),
            value: other.to_string(),
            expected: "error, warning, info",
            span: value.span(),
        }),
    }
}
