//! Domain specifications: patterns over dot-separated names.
//!
//! A *domain* is a namespace or assembly name such as `System.Collections`.
//! A [`DomainSpecification`] matches zero or more domains and scores each
//! match with a *relevance* so that competing rules can be ranked.
//!
//! # Pattern syntax
//!
//! ```text
//! /regex/          → RegexDomain      (whole-name match, relevance 1)
//! A.?.C, A.*, *    → WildcardDomain   (relevance MAX - edit distance)
//! A.B, .           → Domain           (exact, relevance MAX)
//! A.B.* (tree)     → TreeDomain       (legacy syntax, relevance by root length)
//! ```
//!
//! All variants are immutable after construction and compare by their
//! normalized string form.

use std::fmt;

mod exact;
mod regex_domain;
mod tree;
mod wildcard;

pub use exact::{Domain, GLOBAL_DOMAIN};
pub use regex_domain::RegexDomain;
pub use tree::TreeDomain;
pub use wildcard::WildcardDomain;

/// Relevance of an exact match. Every other kind of match scores lower.
pub const MAX_RELEVANCE: u32 = u32::MAX;

/// Relevance meaning "does not match".
pub const NO_MATCH: u32 = 0;

/// Matches any single domain component in a wildcard pattern.
pub const SINGLE_COMPONENT_WILDCARD: &str = "?";

/// Matches zero or more domain components in a wildcard pattern.
pub const ANY_COMPONENTS_WILDCARD: &str = "*";

/// Surrounds a regular expression pattern.
pub const REGEX_DELIMITER: char = '/';

/// Which syntax is used to read wildcard-looking patterns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatternSyntax {
    /// `?` and `*` components with edit-distance ranking.
    #[default]
    Wildcard,
    /// Legacy namespace trees: only a trailing `.*` (or a bare `*`) is allowed.
    Tree,
}

/// A pattern over dot-separated domain names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainSpecification {
    /// A single literal domain.
    Exact(Domain),
    /// A component-wise pattern with `?` / `*` wildcards.
    Wildcard(WildcardDomain),
    /// A delimited regular expression over the full domain string.
    Regex(RegexDomain),
    /// A legacy namespace tree: the root and all of its descendants.
    Tree(TreeDomain),
}

impl DomainSpecification {
    /// Parses a pattern using the default (wildcard) syntax.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is malformed for the kind it selects.
    pub fn parse(pattern: &str) -> Result<Self, DomainError> {
        Self::parse_with(pattern, PatternSyntax::Wildcard)
    }

    /// Parses a pattern with the given syntax.
    ///
    /// Dispatch order: delimiter-wrapped → regex, contains `?`/`*` →
    /// wildcard (or tree), otherwise → exact domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is malformed for the kind it selects.
    pub fn parse_with(pattern: &str, syntax: PatternSyntax) -> Result<Self, DomainError> {
        let pattern = pattern.trim();

        if pattern.starts_with(REGEX_DELIMITER) {
            return RegexDomain::new(pattern).map(Self::Regex);
        }

        if !has_wildcard(pattern) {
            return Domain::new(pattern).map(Self::Exact);
        }

        match syntax {
            PatternSyntax::Wildcard => WildcardDomain::new(pattern).map(Self::Wildcard),
            PatternSyntax::Tree => TreeDomain::new(pattern).map(Self::Tree),
        }
    }

    /// Returns how specifically this pattern matches `candidate`.
    ///
    /// [`NO_MATCH`] means no match; higher values are more specific.
    #[must_use]
    pub fn match_relevance(&self, candidate: &Domain) -> u32 {
        match self {
            Self::Exact(domain) => domain.match_relevance(candidate),
            Self::Wildcard(wildcard) => wildcard.match_relevance(candidate),
            Self::Regex(regex) => regex.match_relevance(candidate),
            Self::Tree(tree) => tree.match_relevance(candidate),
        }
    }

    /// Tests whether this pattern matches `candidate` at all.
    #[must_use]
    pub fn matches(&self, candidate: &Domain) -> bool {
        self.match_relevance(candidate) > NO_MATCH
    }

    /// Returns the normalized pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact(domain) => domain.as_str(),
            Self::Wildcard(wildcard) => wildcard.as_str(),
            Self::Regex(regex) => regex.as_str(),
            Self::Tree(tree) => tree.as_str(),
        }
    }
}

impl fmt::Display for DomainSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Domain> for DomainSpecification {
    fn from(domain: Domain) -> Self {
        Self::Exact(domain)
    }
}

fn has_wildcard(text: &str) -> bool {
    text.contains(['?', '*'])
}

/// Errors raised while constructing a domain specification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A component between dots is empty (e.g. `A..B` or `A.`).
    #[error("`{pattern}` contains an empty name component")]
    EmptyComponent {
        /// The offending pattern.
        pattern: String,
    },

    /// An exact domain contains `?` or `*`.
    #[error("domain `{pattern}` must not contain wildcard characters")]
    WildcardInDomain {
        /// The offending pattern.
        pattern: String,
    },

    /// A wildcard pattern has no wildcard component.
    #[error("wildcard pattern `{pattern}` contains no `?` or `*` component")]
    MissingWildcard {
        /// The offending pattern.
        pattern: String,
    },

    /// A component mixes wildcard characters with literal text (e.g. `Sys*`).
    #[error("component `{component}` in `{pattern}` mixes wildcards with literal text")]
    MixedComponent {
        /// The offending pattern.
        pattern: String,
        /// The offending component.
        component: String,
    },

    /// Two `*` components follow each other.
    #[error("`{pattern}` contains adjacent `*` components")]
    AdjacentAnyWildcards {
        /// The offending pattern.
        pattern: String,
    },

    /// A regex pattern lacks its closing delimiter or has no body.
    #[error("regex pattern `{pattern}` must be non-empty and enclosed in `/` delimiters")]
    MalformedRegex {
        /// The offending pattern.
        pattern: String,
    },

    /// The regex engine rejected the expression.
    #[error("invalid regex `{pattern}`: {reason}")]
    InvalidRegex {
        /// The offending pattern.
        pattern: String,
        /// Engine error text.
        reason: String,
    },

    /// A legacy tree pattern uses a wildcard other than a trailing `.*`.
    #[error("namespace tree `{pattern}` may only end in `.*` (or be a bare `*`)")]
    InvalidTree {
        /// The offending pattern.
        pattern: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(pattern: &str) -> DomainSpecification {
        DomainSpecification::parse(pattern).unwrap()
    }

    fn domain(name: &str) -> Domain {
        Domain::new(name).unwrap()
    }

    // -- Parser dispatch --

    #[test]
    fn parse_dispatches_on_pattern_shape() {
        assert!(matches!(spec("A.B"), DomainSpecification::Exact(_)));
        assert!(matches!(spec("."), DomainSpecification::Exact(_)));
        assert!(matches!(spec("A.*"), DomainSpecification::Wildcard(_)));
        assert!(matches!(spec("?.B"), DomainSpecification::Wildcard(_)));
        assert!(matches!(spec("/A\\..*/"), DomainSpecification::Regex(_)));
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(spec("  A.B ").as_str(), "A.B");
    }

    #[test]
    fn tree_syntax_reads_trailing_star_as_tree() {
        let parsed = DomainSpecification::parse_with("A.B.*", PatternSyntax::Tree).unwrap();
        assert!(matches!(parsed, DomainSpecification::Tree(_)));

        let exact = DomainSpecification::parse_with("A.B", PatternSyntax::Tree).unwrap();
        assert!(matches!(exact, DomainSpecification::Exact(_)));
    }

    #[test]
    fn tree_syntax_rejects_inner_wildcards() {
        assert!(matches!(
            DomainSpecification::parse_with("A.?.C", PatternSyntax::Tree),
            Err(DomainError::InvalidTree { .. })
        ));
    }

    // -- Relevance ordering across kinds --

    #[test]
    fn exact_outranks_wildcard_outranks_regex() {
        let target = domain("A.B");
        let exact = spec("A.B").match_relevance(&target);
        let wildcard = spec("A.*").match_relevance(&target);
        let regex = spec("/A\\..*/").match_relevance(&target);

        assert_eq!(exact, MAX_RELEVANCE);
        assert!(exact > wildcard);
        assert!(wildcard > regex);
        assert_eq!(regex, 1);
    }

    #[test]
    fn matches_is_relevance_above_zero() {
        assert!(spec("A.*").matches(&domain("A.B")));
        assert!(!spec("A.*").matches(&domain("B")));
    }

    #[test]
    fn equality_is_by_pattern_text() {
        assert_eq!(spec("A.*"), spec(" A.* "));
        assert_ne!(spec("A.*"), spec("A.?"));
        assert_eq!(spec("/A.*/"), spec("/A.*/"));
    }
}
