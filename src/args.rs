//! Custom package manager arguments carried across processing calls.

/// Makes yum ignore weak dependencies (Recommends).
pub const STRONG_REQUIRES: &str = "--setopt=requires_policy=strong";

/// Free-form arguments appended after the base yum arguments.
///
/// Owned by one package manager instance for its whole lifetime. Policy
/// toggles and translated exclusions accumulate here and are never reset.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CustomArgs(Vec<String>);

impl CustomArgs {
    pub fn new(args: Vec<String>) -> Self {
        Self(args)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, arg: &str) -> bool {
        self.0.iter().any(|a| a == arg)
    }

    /// Appends `--exclude=<name>`.
    pub fn exclude(&mut self, name: &str) {
        self.0.push(format!("--exclude={}", name));
    }

    /// Adds the strong requires policy unless already present.
    pub fn enable_strong_requires(&mut self) {
        if !self.contains(STRONG_REQUIRES) {
            self.0.push(STRONG_REQUIRES.to_string());
        }
    }

    /// Drops the strong requires policy if present.
    pub fn enable_weak_requires(&mut self) {
        if let Some(pos) = self.0.iter().position(|a| a == STRONG_REQUIRES) {
            self.0.remove(pos);
        }
    }
}
