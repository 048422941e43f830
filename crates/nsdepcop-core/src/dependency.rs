//! Candidate dependency edges and their validation status.

use std::fmt;
use std::sync::Arc;

use crate::domain::Domain;
use crate::rule::TypeNameSet;
use crate::types::Location;

/// A type-to-type dependency: (from-namespace, from-type, to-namespace, to-type).
///
/// Value-equal and hashable; used as the validation cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDependency {
    /// Namespace of the referencing type.
    pub from_namespace: Domain,
    /// Name of the referencing type.
    pub from_type: String,
    /// Namespace of the referenced type.
    pub to_namespace: Domain,
    /// Name of the referenced type.
    pub to_type: String,
}

impl TypeDependency {
    /// Creates a dependency from compiler-provided names.
    #[must_use]
    pub fn new(
        from_namespace: &str,
        from_type: impl Into<String>,
        to_namespace: &str,
        to_type: impl Into<String>,
    ) -> Self {
        Self {
            from_namespace: Domain::from_symbol_name(from_namespace),
            from_type: from_type.into(),
            to_namespace: Domain::from_symbol_name(to_namespace),
            to_type: to_type.into(),
        }
    }

    /// Returns true if both types live in the same namespace.
    #[must_use]
    pub fn is_same_domain(&self) -> bool {
        self.from_namespace == self.to_namespace
    }
}

impl fmt::Display for TypeDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (type: {}) -> {} (type: {})",
            self.from_namespace, self.from_type, self.to_namespace, self.to_type
        )
    }
}

/// An assembly-to-assembly dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyDependency {
    /// Referencing assembly.
    pub from: Domain,
    /// Referenced assembly.
    pub to: Domain,
}

impl AssemblyDependency {
    /// Creates a dependency from assembly names.
    #[must_use]
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: Domain::from_symbol_name(from),
            to: Domain::from_symbol_name(to),
        }
    }

    /// Returns true if both sides name the same assembly.
    #[must_use]
    pub fn is_same_domain(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for AssemblyDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A type dependency found at a source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyOccurrence {
    /// The dependency edge.
    pub dependency: TypeDependency,
    /// Where it occurs, if known.
    pub location: Option<Location>,
}

impl DependencyOccurrence {
    /// Creates an occurrence without a location.
    #[must_use]
    pub fn new(dependency: TypeDependency) -> Self {
        Self {
            dependency,
            location: None,
        }
    }

    /// Attaches a source location.
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// Outcome of validating one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyStatus {
    /// The dependency is permitted.
    Allowed,
    /// No rule permits the dependency, or a disallow rule vetoes it.
    Disallowed,
    /// A rule permits the target namespace, but not the referenced type.
    DisallowedByVisibility {
        /// Types that are visible in the target namespace.
        visible_types: Arc<TypeNameSet>,
    },
}

impl DependencyStatus {
    /// Returns true only for [`DependencyStatus::Allowed`].
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_namespace_spellings_are_one_key() {
        let a = TypeDependency::new("", "A", "Lib", "B");
        let b = TypeDependency::new("<global namespace>", "A", "Lib", "B");
        assert_eq!(a, b);
        assert!(a.from_namespace.is_global());
    }

    #[test]
    fn type_names_are_part_of_identity() {
        let a = TypeDependency::new("App", "A", "Lib", "B");
        let b = TypeDependency::new("App", "A", "Lib", "C");
        assert_ne!(a, b);
    }

    #[test]
    fn same_domain_detection() {
        assert!(TypeDependency::new("App", "A", "App", "B").is_same_domain());
        assert!(!TypeDependency::new("App", "A", "App.Ui", "B").is_same_domain());
        assert!(AssemblyDependency::new("App", "App").is_same_domain());
    }

    #[test]
    fn only_allowed_is_allowed() {
        assert!(DependencyStatus::Allowed.is_allowed());
        assert!(!DependencyStatus::Disallowed.is_allowed());
        assert!(!DependencyStatus::DisallowedByVisibility {
            visible_types: Arc::new(TypeNameSet::new()),
        }
        .is_allowed());
    }
}
