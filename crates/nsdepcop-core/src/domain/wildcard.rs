//! Wildcard domains: `?` for one component, `*` for zero or more.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::{
    Domain, DomainError, ANY_COMPONENTS_WILDCARD, MAX_RELEVANCE, NO_MATCH,
    SINGLE_COMPONENT_WILDCARD,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Component {
    Literal(String),
    AnyOne,
    AnyMany,
}

/// A component-wise pattern such as `MyApp.?.Data` or `MyApp.*`.
///
/// Relevance is `MAX_RELEVANCE - cost` where the cost of the cheapest
/// alignment is: 1 per `?`, and 1 plus 1 per absorbed component for each
/// `*`. Fewer and narrower substitutions therefore rank higher.
#[derive(Debug, Clone)]
pub struct WildcardDomain {
    pattern: String,
    components: Vec<Component>,
}

impl WildcardDomain {
    /// Creates a wildcard domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern has no wildcard component, mixes
    /// wildcards with literal text in one component, has empty components,
    /// or has two adjacent `*` components.
    pub fn new(pattern: &str) -> Result<Self, DomainError> {
        let pattern = pattern.trim();
        let mut components = Vec::new();

        for part in pattern.split('.') {
            let component = match part {
                "" => {
                    return Err(DomainError::EmptyComponent {
                        pattern: pattern.to_string(),
                    })
                }
                SINGLE_COMPONENT_WILDCARD => Component::AnyOne,
                ANY_COMPONENTS_WILDCARD => {
                    if components.last() == Some(&Component::AnyMany) {
                        return Err(DomainError::AdjacentAnyWildcards {
                            pattern: pattern.to_string(),
                        });
                    }
                    Component::AnyMany
                }
                literal if super::has_wildcard(literal) => {
                    return Err(DomainError::MixedComponent {
                        pattern: pattern.to_string(),
                        component: literal.to_string(),
                    })
                }
                literal => Component::Literal(literal.to_string()),
            };
            components.push(component);
        }

        if components.iter().all(|c| matches!(c, Component::Literal(_))) {
            return Err(DomainError::MissingWildcard {
                pattern: pattern.to_string(),
            });
        }

        Ok(Self {
            pattern: pattern.to_string(),
            components,
        })
    }

    /// Returns the pattern as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns `MAX_RELEVANCE - cost` of the cheapest alignment, or
    /// [`NO_MATCH`].
    #[must_use]
    pub fn match_relevance(&self, candidate: &Domain) -> u32 {
        self.match_cost(&candidate.components())
            .map_or(NO_MATCH, |cost| MAX_RELEVANCE - cost)
    }

    /// Bottom-up edit distance over (candidate suffix, pattern suffix).
    ///
    /// `cost[i][j]` is the cheapest way to match `candidate[i..]` with
    /// `components[j..]`, or `None` when no alignment exists.
    fn match_cost(&self, candidate: &[&str]) -> Option<u32> {
        let n = candidate.len();
        let m = self.components.len();
        let width = m + 1;
        let mut cost: Vec<Option<u32>> = vec![None; (n + 1) * width];
        cost[n * width + m] = Some(0);

        for i in (0..=n).rev() {
            for j in (0..m).rev() {
                let here = match &self.components[j] {
                    Component::Literal(literal) => {
                        if i < n && candidate[i] == literal.as_str() {
                            cost[(i + 1) * width + j + 1]
                        } else {
                            None
                        }
                    }
                    Component::AnyOne => {
                        if i < n {
                            cost[(i + 1) * width + j + 1].map(|c| c + 1)
                        } else {
                            None
                        }
                    }
                    Component::AnyMany => {
                        let consume = cost[i * width + j + 1].map(|c| c + 1);
                        let extend = if i < n {
                            cost[(i + 1) * width + j].map(|c| c + 1)
                        } else {
                            None
                        };
                        match (consume, extend) {
                            (Some(a), Some(b)) => Some(a.min(b)),
                            (a, b) => a.or(b),
                        }
                    }
                };
                cost[i * width + j] = here;
            }
        }

        cost[0]
    }
}

impl PartialEq for WildcardDomain {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for WildcardDomain {}

impl Hash for WildcardDomain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
    }
}

impl fmt::Display for WildcardDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wildcard(pattern: &str) -> WildcardDomain {
        WildcardDomain::new(pattern).unwrap()
    }

    fn relevance(pattern: &str, candidate: &str) -> u32 {
        wildcard(pattern).match_relevance(&Domain::new(candidate).unwrap())
    }

    // -- Construction --

    #[test]
    fn accepts_well_formed_patterns() {
        for pattern in ["*", "?", "A.*", "A.?.C", "*.B", "?.*", "A.*.C.*"] {
            assert!(WildcardDomain::new(pattern).is_ok(), "{pattern}");
        }
    }

    #[test]
    fn rejects_missing_wildcard() {
        assert!(matches!(
            WildcardDomain::new("A.B"),
            Err(DomainError::MissingWildcard { .. })
        ));
    }

    #[test]
    fn rejects_mixed_components() {
        assert!(matches!(
            WildcardDomain::new("System.I*"),
            Err(DomainError::MixedComponent { .. })
        ));
        assert!(matches!(
            WildcardDomain::new("A.B?"),
            Err(DomainError::MixedComponent { .. })
        ));
    }

    #[test]
    fn rejects_adjacent_any_wildcards() {
        assert!(matches!(
            WildcardDomain::new("A.*.*"),
            Err(DomainError::AdjacentAnyWildcards { .. })
        ));
    }

    #[test]
    fn rejects_empty_components() {
        assert!(matches!(
            WildcardDomain::new("A..*"),
            Err(DomainError::EmptyComponent { .. })
        ));
    }

    // -- Matching --

    #[test]
    fn single_wildcard_matches_exactly_one_component() {
        assert!(relevance("A.?", "A.B") > NO_MATCH);
        assert_eq!(relevance("A.?", "A"), NO_MATCH);
        assert_eq!(relevance("A.?", "A.B.C"), NO_MATCH);
    }

    #[test]
    fn any_wildcard_matches_zero_or_more_components() {
        assert_eq!(relevance("A.*", "A"), MAX_RELEVANCE - 1);
        assert_eq!(relevance("A.*", "A.B"), MAX_RELEVANCE - 2);
        assert_eq!(relevance("A.*", "A.B.C"), MAX_RELEVANCE - 3);
        assert_eq!(relevance("A.*", "B.A"), NO_MATCH);
    }

    #[test]
    fn literal_components_must_match_exactly() {
        assert_eq!(relevance("System.*", "SystemX.IO"), NO_MATCH);
        assert_eq!(relevance("*.Data", "App.Data.Sql"), NO_MATCH);
        assert!(relevance("*.Data", "App.Core.Data") > NO_MATCH);
    }

    #[test]
    fn bare_star_matches_global() {
        assert_eq!(
            wildcard("*").match_relevance(&Domain::global()),
            MAX_RELEVANCE - 1
        );
        assert!(relevance("*", "A.B.C") > NO_MATCH);
        assert_eq!(wildcard("?").match_relevance(&Domain::global()), NO_MATCH);
    }

    #[test]
    fn more_specific_pattern_scores_higher() {
        assert!(relevance("A.B.*", "A.B.C") > relevance("A.*", "A.B.C"));
        assert!(relevance("A.?.C", "A.B.C") > relevance("A.*", "A.B.C"));
        assert!(relevance("A.?", "A.B") > relevance("*", "A.B"));
    }

    #[test]
    fn any_wildcard_between_literals_explores_both_branches() {
        // `*` must absorb `B.C` here, not stop at the first `C`.
        assert_eq!(relevance("A.*.C", "A.C.B.C"), MAX_RELEVANCE - 3);
        assert_eq!(relevance("A.*.C", "A.C"), MAX_RELEVANCE - 1);
        assert_eq!(relevance("A.*.C", "A.C.B"), NO_MATCH);
    }

    #[test]
    fn long_candidates_stay_tractable() {
        let candidate = vec!["X"; 40].join(".");
        let pattern = "*.?.*.?.*.?.*.Y";
        assert_eq!(relevance(pattern, &candidate), NO_MATCH);
    }
}
