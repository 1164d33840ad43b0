//! Rewriting of host-side paths into chroot-relative ones.

use std::path::PathBuf;

/// Maps arguments that reference the staging root on the host to the same
/// locations as seen from inside the chroot.
pub trait RootBinding {
    fn move_to_root(&self, elements: &[String]) -> Vec<String>;
}

/// Plain prefix rewrite: `<root>/etc/yum.conf` becomes `/etc/yum.conf`.
#[derive(Debug, Clone)]
pub struct RootBind {
    root_dir: PathBuf,
}

impl RootBind {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }
}

impl RootBinding for RootBind {
    fn move_to_root(&self, elements: &[String]) -> Vec<String> {
        let root = self.root_dir.to_string_lossy();
        let root = root.trim_end_matches('/');
        elements
            .iter()
            .map(|element| {
                if root.is_empty() {
                    return element.clone();
                }
                let mut moved = element.replace(root, "/");
                while moved.contains("//") {
                    moved = moved.replace("//", "/");
                }
                moved
            })
            .collect()
    }
}
