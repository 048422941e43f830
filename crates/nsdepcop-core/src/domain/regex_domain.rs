//! Regex domains: `/expression/` matched against the whole domain name.

use std::fmt;
use std::hash::{Hash, Hasher};

use regex::{Regex, RegexBuilder};

use super::{Domain, DomainError, NO_MATCH, REGEX_DELIMITER};

/// Compiled program size limit. Expressions above it are rejected when the
/// config is parsed, so matching time stays bounded by the input length.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Lazy DFA cache limit per expression.
const REGEX_DFA_SIZE_LIMIT: usize = 1 << 21;

/// Relevance of every regex match. Regexes carry no specificity ranking.
const REGEX_RELEVANCE: u32 = 1;

/// A delimited regular expression such as `/^MyApp\.(Core|Data)$/`.
///
/// The expression is anchored on both ends, so it must match the full
/// domain name.
#[derive(Debug, Clone)]
pub struct RegexDomain {
    pattern: String,
    regex: Regex,
}

impl RegexDomain {
    /// Creates a regex domain from its delimited form.
    ///
    /// # Errors
    ///
    /// Returns an error if the delimiters are missing, the body is empty, or
    /// the expression does not compile within the size limits.
    pub fn new(pattern: &str) -> Result<Self, DomainError> {
        let pattern = pattern.trim();
        let body = pattern
            .strip_prefix(REGEX_DELIMITER)
            .and_then(|rest| rest.strip_suffix(REGEX_DELIMITER))
            .filter(|body| !body.is_empty())
            .ok_or_else(|| DomainError::MalformedRegex {
                pattern: pattern.to_string(),
            })?;

        let regex = RegexBuilder::new(&format!("^(?:{body})$"))
            .size_limit(REGEX_SIZE_LIMIT)
            .dfa_size_limit(REGEX_DFA_SIZE_LIMIT)
            .build()
            .map_err(|e| {
                if matches!(e, regex::Error::CompiledTooBig(_)) {
                    tracing::warn!("regex `{pattern}` exceeds the compiled size limit");
                }
                DomainError::InvalidRegex {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                }
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Returns the delimited pattern as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns 1 when the whole domain name matches, else [`NO_MATCH`].
    #[must_use]
    pub fn match_relevance(&self, candidate: &Domain) -> u32 {
        if self.regex.is_match(candidate.as_str()) {
            REGEX_RELEVANCE
        } else {
            NO_MATCH
        }
    }
}

impl PartialEq for RegexDomain {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for RegexDomain {}

impl Hash for RegexDomain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
    }
}

impl fmt::Display for RegexDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relevance(pattern: &str, candidate: &str) -> u32 {
        RegexDomain::new(pattern)
            .unwrap()
            .match_relevance(&Domain::new(candidate).unwrap())
    }

    #[test]
    fn match_is_anchored_to_the_whole_name() {
        assert_eq!(relevance("/Core/", "App.Core"), NO_MATCH);
        assert_eq!(relevance("/App\\.Core/", "App.Core"), 1);
        assert_eq!(relevance("/App\\.Core/", "App.Core.Data"), NO_MATCH);
    }

    #[test]
    fn alternation_is_grouped_before_anchoring() {
        assert_eq!(relevance("/A|B/", "A"), 1);
        assert_eq!(relevance("/A|B/", "B"), 1);
        assert_eq!(relevance("/A|B/", "AB"), NO_MATCH);
    }

    #[test]
    fn rejects_missing_delimiter_or_body() {
        assert!(matches!(
            RegexDomain::new("/App.*"),
            Err(DomainError::MalformedRegex { .. })
        ));
        assert!(matches!(
            RegexDomain::new("//"),
            Err(DomainError::MalformedRegex { .. })
        ));
        assert!(matches!(
            RegexDomain::new("/"),
            Err(DomainError::MalformedRegex { .. })
        ));
    }

    #[test]
    fn rejects_invalid_expression() {
        assert!(matches!(
            RegexDomain::new("/App(/"),
            Err(DomainError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn pathological_pattern_matches_in_bounded_time() {
        let candidate = format!("{}B", "A".repeat(64));
        assert_eq!(relevance("/(A+)+C/", &candidate), NO_MATCH);
    }
}
