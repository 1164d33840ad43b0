//! Package manager executable selection.
//!
//! Some targets ship yum as `yum-deprecated` next to a dnf-backed `yum`
//! wrapper. When the deprecated name exists we must call it, otherwise the
//! arguments are interpreted by dnf.

use std::path::{Path, PathBuf};

pub const YUM: &str = "yum";
pub const YUM_DEPRECATED: &str = "yum-deprecated";

/// Finds executables by name.
pub trait ExecutableLocator {
    /// Look `name` up in `search_path` only, or in the ambient `PATH` when
    /// `search_path` is `None`. Only files with execute permission count.
    fn find(&self, name: &str, search_path: Option<&Path>) -> Option<PathBuf>;
}

/// Locator backed by the `which` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhichLocator;

impl ExecutableLocator for WhichLocator {
    fn find(&self, name: &str, search_path: Option<&Path>) -> Option<PathBuf> {
        match search_path {
            Some(dir) => which::which_in(name, Some(dir.as_os_str()), dir).ok(),
            None => which::which(name).ok(),
        }
    }
}

/// Name of the yum binary to invoke for `root`.
///
/// With a root only `<root>/usr/bin` is searched, never the host `PATH`.
/// The returned value is a bare name; lookup failures fall back to `yum`.
pub fn resolve_binary(locator: &dyn ExecutableLocator, root: Option<&Path>) -> String {
    let search_path = root.map(|r| r.join("usr/bin"));
    match locator.find(YUM_DEPRECATED, search_path.as_deref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using {}", YUM_DEPRECATED);
            YUM_DEPRECATED.to_string()
        }
        None => YUM.to_string(),
    }
}
