//! Source path exclusion patterns.

use std::path::Path;

/// A validated glob pattern for excluding source files from analysis.
///
/// The glob is compiled once at construction and reused for all match calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobPattern {
    raw: String,
    compiled: glob::Pattern,
}

impl GlobPattern {
    /// Creates a new glob pattern.
    ///
    /// # Errors
    ///
    /// Returns the reason if the pattern is empty or has invalid glob syntax.
    pub fn new(pattern: &str) -> Result<Self, String> {
        if pattern.is_empty() {
            return Err("glob pattern must not be empty".to_string());
        }
        let compiled = glob::Pattern::new(pattern).map_err(|e| e.to_string())?;
        Ok(Self {
            raw: pattern.to_string(),
            compiled,
        })
    }

    /// Tests whether a relative source path matches this pattern.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        // Normalize Windows separators so one pattern serves both platforms.
        let path_str = path.to_string_lossy().replace('\\', "/");
        if self.compiled.matches(&path_str) {
            return true;
        }
        if let Some(prefix) = self.raw.strip_suffix("/**") {
            let normalized = prefix.trim_end_matches('/');
            if path_str.starts_with(normalized)
                && path_str
                    .as_bytes()
                    .get(normalized.len())
                    .is_some_and(|&b| b == b'/')
            {
                return true;
            }
        }
        false
    }

    /// Returns the pattern as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_rejected() {
        assert!(GlobPattern::new("").is_err());
    }

    #[test]
    fn invalid_pattern_rejected() {
        assert!(GlobPattern::new("src/[").is_err());
    }

    #[test]
    fn matches_nested_files() {
        let pat = GlobPattern::new("Generated/**").unwrap();
        assert!(pat.matches(Path::new("Generated/Model.cs")));
        assert!(pat.matches(Path::new("Generated/Sub/Deep.cs")));
        assert!(!pat.matches(Path::new("Src/Model.cs")));
    }

    #[test]
    fn matches_by_extension_anywhere() {
        let pat = GlobPattern::new("**/*.Designer.cs").unwrap();
        assert!(pat.matches(Path::new("Forms/Main.Designer.cs")));
        assert!(!pat.matches(Path::new("Forms/Main.cs")));
    }

    #[test]
    fn backslash_paths_are_normalized() {
        let pat = GlobPattern::new("Generated/**").unwrap();
        assert!(pat.matches(Path::new("Generated\\Model.cs")));
    }
}
