//! Substring matching over decoded file contents.

/// Target string searched for when none are configured.
pub const DEFAULT_SEARCH_STRING: &str = "actions/upload-artifact";

/// File extensions whose contents are fetched and searched.
const CONFIG_EXTENSIONS: [&str; 2] = [".yml", ".yaml"];

/// Returns true if any of `targets` occurs in `content`.
///
/// Matching is case-sensitive with no normalization, and stops at the
/// first hit. An empty target list never matches.
pub fn matches<S: AsRef<str>>(content: &str, targets: &[S]) -> bool {
    targets
        .iter()
        .any(|target| content.contains(target.as_ref()))
}

/// Returns true if `name` has a configuration file extension (`.yml` or `.yaml`).
pub fn is_config_file(name: &str) -> bool {
    CONFIG_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Ordered set of target strings a file is searched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStrings(Vec<String>);

impl SearchStrings {
    /// Creates a set from the given strings, falling back to the default
    /// target when the list is empty.
    pub fn new(strings: Vec<String>) -> Self {
        if strings.is_empty() {
            Self::default()
        } else {
            Self(strings)
        }
    }

    /// Returns true if any target string occurs in `content`.
    #[must_use]
    pub fn matches(&self, content: &str) -> bool {
        matches(content, &self.0)
    }

    /// Returns the configured strings in order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for SearchStrings {
    fn default() -> Self {
        Self(vec![DEFAULT_SEARCH_STRING.to_string()])
    }
}
