//! Dependency rules and visible-type sets.

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::{Domain, DomainError, DomainSpecification, NO_MATCH};

/// An ordered (From, To) pair of domain specifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyRule {
    from: DomainSpecification,
    to: DomainSpecification,
}

impl DependencyRule {
    /// Creates a new rule.
    #[must_use]
    pub fn new(from: DomainSpecification, to: DomainSpecification) -> Self {
        Self { from, to }
    }

    /// Parses both sides with the default pattern syntax.
    ///
    /// # Errors
    ///
    /// Returns an error if either side is not a valid pattern.
    pub fn parse(from: &str, to: &str) -> Result<Self, DomainError> {
        Ok(Self::new(
            DomainSpecification::parse(from)?,
            DomainSpecification::parse(to)?,
        ))
    }

    /// Returns the source-side specification.
    #[must_use]
    pub fn from(&self) -> &DomainSpecification {
        &self.from
    }

    /// Returns the target-side specification.
    #[must_use]
    pub fn to(&self) -> &DomainSpecification {
        &self.to
    }

    /// Tests whether both sides match.
    #[must_use]
    pub fn matches(&self, from: &Domain, to: &Domain) -> bool {
        self.from.matches(from) && self.to.matches(to)
    }

    /// Returns `(from relevance, to relevance)` when both sides match.
    #[must_use]
    pub fn relevance(&self, from: &Domain, to: &Domain) -> Option<(u32, u32)> {
        let from_relevance = self.from.match_relevance(from);
        if from_relevance == NO_MATCH {
            return None;
        }
        let to_relevance = self.to.match_relevance(to);
        if to_relevance == NO_MATCH {
            return None;
        }
        Some((from_relevance, to_relevance))
    }
}

impl fmt::Display for DependencyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A set of type names visible in a target domain.
///
/// Empty means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeNameSet(BTreeSet<String>);

impl TypeNameSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no type names are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of type names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Tests whether `type_name` is in the set.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.0.contains(type_name)
    }

    /// Adds all names from `other`.
    pub fn union_with(&mut self, other: &TypeNameSet) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Iterates the names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TypeNameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for TypeNameSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        f.write_str(&names.join(", "))
    }
}
