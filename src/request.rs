//! Accumulated install, collection and exclusion requests.

/// Ordered request lists consumed by a single processing call.
///
/// Nothing is deduplicated: asking for the same package twice puts it on the
/// command line twice.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestQueue {
    packages: Vec<String>,
    collections: Vec<String>,
    excludes: Vec<String>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_package(&mut self, name: &str) {
        self.packages.push(name.to_string());
    }

    /// Collections are stored double-quoted so names with spaces stay a
    /// single token for yum.
    pub fn push_collection(&mut self, name: &str) {
        self.collections.push(format!("\"{}\"", name));
    }

    pub fn push_exclude(&mut self, name: &str) {
        self.excludes.push(name.to_string());
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    /// Collection names as yum expects them on an argv, quotes removed.
    pub fn collection_names(&self) -> Vec<String> {
        self.collections
            .iter()
            .map(|token| unquote(token).to_string())
            .collect()
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.collections.is_empty() && self.excludes.is_empty()
    }

    pub fn clear(&mut self) {
        self.packages.clear();
        self.collections.clear();
        self.excludes.clear();
    }
}

/// Strip one pair of surrounding double quotes, if present.
pub fn unquote(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token)
}
