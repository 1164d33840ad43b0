//! yum/rpm backend.
//!
//! Bootstrap installs run yum on the host with `--installroot`. Image phase
//! installs, updates and deletes run inside `chroot <root>`, with any host
//! path in the base yum arguments rewritten through the root binding.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{PackageManager, PackageManagerKind};
use crate::args::CustomArgs;
use crate::binary::{self, ExecutableLocator, WhichLocator};
use crate::config::RuntimeConfig;
use crate::error::RequestError;
use crate::matcher;
use crate::process::{CommandEnv, CommandResult, CommandRunner, Invocation, SystemRunner};
use crate::request::RequestQueue;
use crate::root_bind::{RootBind, RootBinding};

/// rpm flags for removals during image assembly: forward dependencies and
/// package scripts must not block or run.
pub const DELETE_OPTIONS: &[&str] = &["--nodeps", "--allmatches", "--noscripts"];

pub struct PackageManagerYum {
    root_dir: PathBuf,
    requests: RequestQueue,
    custom_args: CustomArgs,
    yum_args: Vec<String>,
    command_env: CommandEnv,
    runner: Box<dyn CommandRunner>,
    locator: Box<dyn ExecutableLocator>,
    root_bind: Box<dyn RootBinding>,
}

impl PackageManagerYum {
    /// Backend running real processes against `root_dir`.
    pub fn new(root_dir: impl Into<PathBuf>, config: RuntimeConfig, custom_args: Vec<String>) -> Self {
        let root_dir = root_dir.into();
        Self {
            root_bind: Box::new(RootBind::new(root_dir.clone())),
            root_dir,
            requests: RequestQueue::new(),
            custom_args: CustomArgs::new(custom_args),
            yum_args: config.yum_args,
            command_env: config.command_env,
            runner: Box::new(SystemRunner),
            locator: Box::new(WhichLocator),
        }
    }

    pub fn with_runner(mut self, runner: Box<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_locator(mut self, locator: Box<dyn ExecutableLocator>) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_root_binding(mut self, root_bind: Box<dyn RootBinding>) -> Self {
        self.root_bind = root_bind;
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn custom_args(&self) -> &CustomArgs {
        &self.custom_args
    }

    pub fn yum_args(&self) -> &[String] {
        &self.yum_args
    }

    fn yum_binary(&self, root: Option<&Path>) -> String {
        binary::resolve_binary(self.locator.as_ref(), root)
    }

    fn chroot(&self) -> Invocation {
        Invocation::new("chroot").arg_path(&self.root_dir)
    }

    /// `<yum> <base> --installroot <root> <custom> <verb> <items>`
    fn bootstrap_invocation(&self, yum: &str, verb: &str, items: &[String]) -> Invocation {
        Invocation::new(yum)
            .args(self.yum_args.iter().cloned())
            .arg("--installroot")
            .arg_path(&self.root_dir)
            .args(self.custom_args.as_slice().iter().cloned())
            .arg(verb)
            .args(items.iter().cloned())
    }

    /// `chroot <root> <yum> <moved base> <custom> <verb> <items>`
    fn chroot_invocation(
        &self,
        yum: &str,
        chroot_yum_args: &[String],
        verb: &str,
        items: &[String],
    ) -> Invocation {
        self.chroot()
            .arg(yum)
            .args(chroot_yum_args.iter().cloned())
            .args(self.custom_args.as_slice().iter().cloned())
            .arg(verb)
            .args(items.iter().cloned())
    }

    /// Calls each step in order and stops at the first unsuccessful one,
    /// returning its result.
    fn call_chain(&self, steps: &[Invocation]) -> Result<CommandResult> {
        let mut last = None;
        for step in steps {
            debug!(command = %step, "yum step");
            let result = self.runner.call(step, Some(&self.command_env))?;
            if !result.success() {
                warn!(command = %step, code = result.code(), "step failed, skipping the rest");
                return Ok(result);
            }
            last = Some(result);
        }
        last.context("No package manager steps to run")
    }
}

impl PackageManager for PackageManagerYum {
    fn kind(&self) -> PackageManagerKind {
        PackageManagerKind::Yum
    }

    fn request_package(&mut self, name: &str) {
        self.requests.push_package(name);
    }

    fn request_collection(&mut self, name: &str) {
        self.requests.push_collection(name);
    }

    /// rpm repository metadata has no product definitions.
    fn request_product(&mut self, _name: &str) {}

    fn request_package_exclusion(&mut self, name: &str) {
        self.requests.push_exclude(name);
    }

    fn process_install_requests_bootstrap(&mut self) -> Result<CommandResult> {
        let requests = std::mem::take(&mut self.requests);
        let yum = self.yum_binary(None);
        info!(root = %self.root_dir.display(), "bootstrap install with {}", yum);

        let makecache = Invocation::new(&yum)
            .args(self.yum_args.iter().cloned())
            .arg("makecache");
        self.runner
            .run(&makecache, None)
            .context("Failed to refresh the yum metadata cache")?;

        let mut steps = vec![self.bootstrap_invocation(&yum, "install", requests.packages())];
        if !requests.collections().is_empty() {
            // Stored tokens are quoted; without a shell the quotes would
            // reach yum as part of the group name.
            let groups = requests.collection_names();
            steps.push(self.bootstrap_invocation(&yum, "groupinstall", &groups));
        }
        self.call_chain(&steps)
    }

    fn process_install_requests(&mut self) -> Result<CommandResult> {
        let requests = std::mem::take(&mut self.requests);
        let yum = self.yum_binary(Some(self.root_dir.as_path()));
        info!(root = %self.root_dir.display(), "image install with {}", yum);

        // Excluded packages are removed from the solve. A package that is
        // hard required by another one breaks the transaction.
        for package in requests.excludes() {
            self.custom_args.exclude(package);
        }

        let rebuilddb = self.chroot().args(["rpm", "--rebuilddb"]);
        self.runner
            .run(&rebuilddb, None)
            .context("Failed to rebuild the rpm database")?;

        let chroot_yum_args = self.root_bind.move_to_root(&self.yum_args);
        let mut steps = vec![self.chroot_invocation(
            &yum,
            &chroot_yum_args,
            "install",
            requests.packages(),
        )];
        if !requests.collections().is_empty() {
            let groups = requests.collection_names();
            steps.push(self.chroot_invocation(&yum, &chroot_yum_args, "groupinstall", &groups));
        }
        self.call_chain(&steps)
    }

    fn process_delete_requests(&mut self, _force: bool) -> Result<CommandResult> {
        let requests = std::mem::take(&mut self.requests);

        let mut delete_items = Vec::new();
        for item in requests.packages() {
            let query = self.chroot().args(["rpm", "-q"]).arg(item.as_str());
            match self.runner.run(&query, None) {
                Ok(_) => delete_items.push(item.clone()),
                Err(e) => warn!(package = %item, error = %e, "not installed, skipping"),
            }
        }
        if delete_items.is_empty() {
            return Err(RequestError::new(
                "None of the requested packages to delete are installed",
            )
            .into());
        }

        info!(packages = %delete_items.join(" "), "removing packages");
        let erase = self
            .chroot()
            .args(["rpm", "-e"])
            .args(DELETE_OPTIONS.iter().copied())
            .args(delete_items);
        self.runner.call(&erase, Some(&self.command_env))
    }

    fn update(&mut self) -> Result<CommandResult> {
        let yum = self.yum_binary(Some(self.root_dir.as_path()));
        let chroot_yum_args = self.root_bind.move_to_root(&self.yum_args);
        let upgrade = self.chroot_invocation(&yum, &chroot_yum_args, "upgrade", &[]);
        debug!(command = %upgrade, "yum update");
        self.runner.call(&upgrade, Some(&self.command_env))
    }

    fn process_only_required(&mut self) {
        self.custom_args.enable_strong_requires();
    }

    fn process_plus_recommended(&mut self) {
        self.custom_args.enable_weak_requires();
    }

    fn match_package_installed(&self, package_name: &str, line: &str) -> bool {
        matcher::match_package_installed(package_name, line)
    }

    fn match_package_deleted(&self, package_name: &str, line: &str) -> bool {
        matcher::match_package_deleted(package_name, line)
    }

    fn database_consistent(&self) -> bool {
        let initdb = self.chroot().args(["rpmdb", "--initdb"]);
        self.runner.run(&initdb, None).is_ok()
    }

    /// The supported rpm versions need no dump/reload cycle.
    fn dump_reload_package_database(&mut self, _version: u32) -> Result<()> {
        Ok(())
    }

    fn requests(&self) -> &RequestQueue {
        &self.requests
    }

    fn cleanup_requests(&mut self) {
        self.requests.clear();
    }
}
