//! Legacy namespace trees (`A.B.*`).

use std::fmt;

use super::{Domain, DomainError, ANY_COMPONENTS_WILDCARD, NO_MATCH};

const TREE_SUFFIX: &str = ".*";

/// A root domain plus all of its descendants.
///
/// Relevance grows with the length of the root, so `A.B.*` outranks `A.*`
/// and the global tree `*` matches everything at the lowest relevance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeDomain {
    pattern: String,
    root: Domain,
}

impl TreeDomain {
    /// Creates a tree from `Root.*` or a bare `*`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern has any other wildcard usage or the
    /// root is not a valid domain.
    pub fn new(pattern: &str) -> Result<Self, DomainError> {
        let pattern = pattern.trim();
        if pattern == ANY_COMPONENTS_WILDCARD {
            return Ok(Self::with_root(Domain::global()));
        }

        let root = pattern
            .strip_suffix(TREE_SUFFIX)
            .filter(|root| !super::has_wildcard(root))
            .ok_or_else(|| DomainError::InvalidTree {
                pattern: pattern.to_string(),
            })?;

        Domain::new(root).map(Self::with_root)
    }

    /// Creates a tree rooted at `root`.
    #[must_use]
    pub fn with_root(root: Domain) -> Self {
        let pattern = if root.is_global() {
            ANY_COMPONENTS_WILDCARD.to_string()
        } else {
            format!("{root}{TREE_SUFFIX}")
        };
        Self { pattern, root }
    }

    /// Returns the root domain.
    #[must_use]
    pub fn root(&self) -> &Domain {
        &self.root
    }

    /// Returns the pattern as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Scores the root or any descendant by root length; anything else is
    /// [`NO_MATCH`].
    #[must_use]
    pub fn match_relevance(&self, candidate: &Domain) -> u32 {
        if candidate != &self.root && !candidate.is_subdomain_of(&self.root) {
            return NO_MATCH;
        }
        if self.root.is_global() {
            1
        } else {
            u32::try_from(self.root.as_str().len() + 1).unwrap_or(u32::MAX - 1)
        }
    }
}

impl fmt::Display for TreeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
