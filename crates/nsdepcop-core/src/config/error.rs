//! Config file errors with source positions.

use std::ops::Range;
use std::path::{Path, PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};

use super::loader::LoadError;

/// Errors from reading or parsing a config file.
///
/// Content errors carry the file text, a labelled span and the 1-based
/// line/column so hosts can point the user at the offending value.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    #[diagnostic(code(nsdepcop::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not valid TOML, or a value has the wrong type.
    #[error("{}:{line}:{column}: {message}", .path.display())]
    #[diagnostic(code(nsdepcop::config::syntax))]
    Syntax {
        /// Config file path.
        path: PathBuf,
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed).
        column: usize,
        /// Parser message.
        message: String,
        /// File content for rendering.
        #[source_code]
        src: NamedSource<String>,
        /// Offending region.
        #[label("here")]
        span: SourceSpan,
    },

    /// A value is well-typed but invalid (bad domain pattern, unknown severity...).
    #[error("{}:{line}:{column}: {source}", .path.display())]
    #[diagnostic(code(nsdepcop::config::invalid))]
    Invalid {
        /// Config file path.
        path: PathBuf,
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed).
        column: usize,
        /// The validation failure.
        source: LoadError,
        /// File content for rendering.
        #[source_code]
        src: NamedSource<String>,
        /// Offending value.
        #[label("invalid value")]
        span: SourceSpan,
    },
}

impl ConfigError {
    pub(crate) fn syntax(path: &Path, content: &str, error: &toml::de::Error) -> Self {
        let range = error.span().unwrap_or(0..0);
        let (line, column) = line_column(content, range.start);
        Self::Syntax {
            path: path.to_path_buf(),
            line,
            column,
            message: error.message().to_string(),
            src: named_source(path, content),
            span: to_source_span(&range),
        }
    }

    pub(crate) fn encoding(path: &Path, content: &str, offset: usize) -> Self {
        let (line, column) = line_column(content, offset);
        Self::Syntax {
            path: path.to_path_buf(),
            line,
            column,
            message: "invalid UTF-8 sequence".to_string(),
            src: named_source(path, content),
            span: to_source_span(&(offset..offset + 1)),
        }
    }

    pub(crate) fn invalid(path: &Path, content: &str, error: LoadError) -> Self {
        let range = error.span();
        let (line, column) = line_column(content, range.start);
        Self::Invalid {
            path: path.to_path_buf(),
            line,
            column,
            source: error,
            src: named_source(path, content),
            span: to_source_span(&range),
        }
    }

    /// Returns the config file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Syntax { path, .. } | Self::Invalid { path, .. } => path,
        }
    }

    /// Returns the 1-based `(line, column)` for content errors.
    #[must_use]
    pub fn line_column(&self) -> Option<(usize, usize)> {
        match self {
            Self::Io { .. } => None,
            Self::Syntax { line, column, .. } | Self::Invalid { line, column, .. } => {
                Some((*line, *column))
            }
        }
    }
}

fn named_source(path: &Path, content: &str) -> NamedSource<String> {
    NamedSource::new(path.display().to_string(), content.to_string())
}

fn to_source_span(range: &Range<usize>) -> SourceSpan {
    SourceSpan::from((range.start, range.end.saturating_sub(range.start)))
}

/// Converts a byte offset into a 1-based `(line, column)`.
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(content.len());
    let before = content.get(..offset).unwrap_or(content);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_column_counts_from_one() {
        let text = "a = 1\nbb = 2\n";
        assert_eq!(line_column(text, 0), (1, 1));
        assert_eq!(line_column(text, 4), (1, 5));
        assert_eq!(line_column(text, 6), (2, 1));
        assert_eq!(line_column(text, 11), (2, 6));
    }

    #[test]
    fn line_column_clamps_past_end() {
        assert_eq!(line_column("ab", 99), (1, 3));
    }

    #[test]
    fn syntax_error_locates_the_problem() {
        let text = "is_enabled = true\n[[allowed]\n";
        let err = toml::from_str::<toml::Value>(text).unwrap_err();
        let config_error = ConfigError::syntax(Path::new("nsdepcop.toml"), text, &err);

        let (line, _) = config_error.line_column().unwrap();
        assert_eq!(line, 2);
        assert!(config_error.to_string().starts_with("nsdepcop.toml:2:"));
    }

    #[test]
    fn io_error_has_no_position() {
        let err = ConfigError::Io {
            path: PathBuf::from("missing.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.line_column().is_none());
        assert_eq!(err.path(), Path::new("missing.toml"));
    }
}
