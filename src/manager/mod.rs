//! Package manager backends.
//!
//! The image build pipeline only talks to [`PackageManager`]. Each package
//! manager family gets one implementation; hooks that mean nothing for a
//! family (products on rpm distributions, database migrations) are accepted
//! and do nothing there.
//!
//! ## Lifecycle
//!
//! 1. Queue requests (`request_package`, `request_collection`, ...)
//! 2. Call exactly one processing method
//! 3. The queue is empty again; custom arguments persist

pub mod yum;

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::config::RuntimeConfig;
use crate::process::CommandResult;
use crate::request::RequestQueue;

pub use yum::PackageManagerYum;

/// Request, process and maintenance operations shared by all backends.
pub trait PackageManager {
    fn kind(&self) -> PackageManagerKind;

    fn request_package(&mut self, name: &str);

    fn request_collection(&mut self, name: &str);

    fn request_product(&mut self, name: &str);

    /// Keep `name` out of the solver for install requests.
    fn request_package_exclusion(&mut self, name: &str);

    /// Install into the root from the host, without chroot.
    fn process_install_requests_bootstrap(&mut self) -> Result<CommandResult>;

    /// Install from inside a chroot of the root.
    fn process_install_requests(&mut self) -> Result<CommandResult>;

    /// Remove requested packages that are actually installed.
    fn process_delete_requests(&mut self, force: bool) -> Result<CommandResult>;

    /// Upgrade everything installed in the root.
    fn update(&mut self) -> Result<CommandResult>;

    /// Only hard requirements are pulled in.
    fn process_only_required(&mut self);

    /// Weak dependencies are pulled in as well.
    fn process_plus_recommended(&mut self);

    fn match_package_installed(&self, package_name: &str, line: &str) -> bool;

    fn match_package_deleted(&self, package_name: &str, line: &str) -> bool;

    /// Whether the package database in the root is usable.
    fn database_consistent(&self) -> bool;

    fn dump_reload_package_database(&mut self, version: u32) -> Result<()>;

    fn requests(&self) -> &RequestQueue;

    fn cleanup_requests(&mut self);
}

/// Package manager families known to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManagerKind {
    Yum,
}

impl PackageManagerKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Yum => "yum",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "yum" => Some(Self::Yum),
            _ => None,
        }
    }
}

/// Create the backend for `name` operating on `root_dir`.
pub fn create_package_manager(
    name: &str,
    root_dir: impl Into<PathBuf>,
    config: RuntimeConfig,
    custom_args: Vec<String>,
) -> Result<Box<dyn PackageManager>> {
    match PackageManagerKind::from_name(name) {
        Some(PackageManagerKind::Yum) => Ok(Box::new(PackageManagerYum::new(
            root_dir,
            config,
            custom_args,
        ))),
        None => bail!("Unsupported package manager '{}'", name),
    }
}
