//! Expected-failure matching.
//!
//! A run may declare a glob pattern of file names whose failures are
//! pre-approved: those files still report their failures, but they do
//! not count toward the run verdict.

use std::path::Path;

/// Compiled expected-failure pattern.
///
/// An empty or absent pattern matches nothing. An invalid pattern is
/// logged and also matches nothing rather than failing the run.
#[derive(Debug, Default, Clone)]
pub struct ExpectedFailures {
    pattern: Option<glob::Pattern>,
}

impl ExpectedFailures {
    /// Compile the pattern, if any.
    #[must_use]
    pub fn new(pattern: Option<&str>) -> Self {
        let pattern = match pattern {
            None | Some("") => None,
            Some(raw) => match glob::Pattern::new(raw) {
                Ok(compiled) => Some(compiled),
                Err(err) => {
                    tracing::warn!("Invalid expected-failure pattern {raw:?}: {err}");
                    None
                }
            },
        };
        Self { pattern }
    }

    /// Whether a failure for this file is expected.
    ///
    /// Matches the pattern against the file's base name only.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let Some(ref pattern) = self.pattern else {
            return false;
        };
        path.file_name()
            .map(|name| pattern.matches(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_no_pattern_matches_nothing() {
        let expected = ExpectedFailures::new(None);
        assert!(!expected.matches(Path::new("broken.mp4")));
    }

    #[test]
    fn test_empty_pattern_matches_nothing() {
        let expected = ExpectedFailures::new(Some(""));
        assert!(!expected.matches(Path::new("broken.mp4")));
    }

    #[test]
    fn test_glob_matches_base_name() {
        let expected = ExpectedFailures::new(Some("broken.*"));
        assert!(expected.matches(Path::new("fixtures/broken.mp4")));
        assert!(expected.matches(Path::new("broken.png")));
        assert!(!expected.matches(Path::new("fixtures/ok.mp4")));
    }

    #[test]
    fn test_glob_does_not_match_parent_components() {
        let expected = ExpectedFailures::new(Some("fixtures*"));
        assert!(!expected.matches(Path::new("fixtures/ok.mp4")));
    }

    #[test]
    fn test_invalid_pattern_is_no_match() {
        let expected = ExpectedFailures::new(Some("broken[.mp4"));
        assert!(!expected.matches(Path::new("broken.mp4")));
    }

    #[test]
    fn test_question_mark_wildcard() {
        let expected = ExpectedFailures::new(Some("clip?.webm"));
        assert!(expected.matches(Path::new("clip1.webm")));
        assert!(!expected.matches(Path::new("clip12.webm")));
    }
}
