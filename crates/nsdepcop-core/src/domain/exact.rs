//! Exact domains and the global-namespace sentinel.

use std::fmt;

use super::{has_wildcard, DomainError, MAX_RELEVANCE, NO_MATCH};

/// Normalized text of the global (root) domain.
pub const GLOBAL_DOMAIN: &str = ".";

/// Spellings of the global domain produced by different front-ends.
const GLOBAL_ALIASES: &[&str] = &["", GLOBAL_DOMAIN, "<global namespace>"];

/// A literal dot-separated domain name, or the global domain.
///
/// Invariant: no wildcard characters, and every component of a non-global
/// domain is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(String);

impl Domain {
    /// Creates a validated domain from configuration text.
    ///
    /// # Errors
    ///
    /// Returns an error if the name contains wildcards or empty components.
    pub fn new(name: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        if GLOBAL_ALIASES.contains(&name) {
            return Ok(Self::global());
        }
        if has_wildcard(name) {
            return Err(DomainError::WildcardInDomain {
                pattern: name.to_string(),
            });
        }
        if name.split('.').any(str::is_empty) {
            return Err(DomainError::EmptyComponent {
                pattern: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Creates a domain from a compiler-provided symbol name.
    ///
    /// Only the global-namespace spellings are normalized; the name is
    /// otherwise trusted and not re-validated.
    #[must_use]
    pub fn from_symbol_name(name: &str) -> Self {
        if GLOBAL_ALIASES.contains(&name) {
            Self::global()
        } else {
            Self(name.to_string())
        }
    }

    /// Returns the global domain.
    #[must_use]
    pub fn global() -> Self {
        Self(GLOBAL_DOMAIN.to_string())
    }

    /// Returns true for the global domain.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.0 == GLOBAL_DOMAIN
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the dot-separated components. The global domain has none.
    #[must_use]
    pub fn components(&self) -> Vec<&str> {
        if self.is_global() {
            Vec::new()
        } else {
            self.0.split('.').collect()
        }
    }

    /// Tests whether this domain is a strict descendant of `parent`.
    ///
    /// Compares whole components: `System.IO` is not below `System.I`.
    #[must_use]
    pub fn is_subdomain_of(&self, parent: &Domain) -> bool {
        if self.is_global() {
            return false;
        }
        if parent.is_global() {
            return true;
        }
        self.0.len() > parent.0.len()
            && self.0.starts_with(parent.as_str())
            && self.0.as_bytes()[parent.0.len()] == b'.'
    }

    /// Exact match scores [`MAX_RELEVANCE`]; anything else is no match.
    #[must_use]
    pub fn match_relevance(&self, candidate: &Domain) -> u32 {
        if self == candidate {
            MAX_RELEVANCE
        } else {
            NO_MATCH
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_aliases_normalize() {
        for alias in ["", ".", "<global namespace>"] {
            assert!(Domain::new(alias).unwrap().is_global());
            assert!(Domain::from_symbol_name(alias).is_global());
        }
        assert_eq!(Domain::global().as_str(), ".");
    }

    #[test]
    fn rejects_wildcards_and_empty_components() {
        assert!(matches!(
            Domain::new("A.*"),
            Err(DomainError::WildcardInDomain { .. })
        ));
        assert!(matches!(
            Domain::new("A..B"),
            Err(DomainError::EmptyComponent { .. })
        ));
        assert!(matches!(
            Domain::new("A."),
            Err(DomainError::EmptyComponent { .. })
        ));
    }

    #[test]
    fn exact_relevance_is_all_or_nothing() {
        let a = Domain::new("A.B").unwrap();
        assert_eq!(a.match_relevance(&Domain::new("A.B").unwrap()), MAX_RELEVANCE);
        assert_eq!(a.match_relevance(&Domain::new("A.B.C").unwrap()), NO_MATCH);
        assert_eq!(a.match_relevance(&Domain::new("A").unwrap()), NO_MATCH);
    }

    #[test]
    fn subdomain_compares_whole_components() {
        let system = Domain::new("System").unwrap();
        let io = Domain::new("System.IO").unwrap();
        let i = Domain::new("System.I").unwrap();

        assert!(io.is_subdomain_of(&system));
        assert!(!io.is_subdomain_of(&i));
        assert!(!system.is_subdomain_of(&system));
        assert!(!system.is_subdomain_of(&io));
    }

    #[test]
    fn everything_but_global_is_below_global() {
        let global = Domain::global();
        assert!(Domain::new("A").unwrap().is_subdomain_of(&global));
        assert!(!global.is_subdomain_of(&global));
    }

    #[test]
    fn components_of_global_are_empty() {
        assert!(Domain::global().components().is_empty());
        assert_eq!(Domain::new("A.B").unwrap().components(), vec!["A", "B"]);
    }
}
