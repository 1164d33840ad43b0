//! Shared test utilities for rootpm tests.

#![allow(dead_code)]

use anyhow::Result;
use std::cell::RefCell;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;
use tempfile::TempDir;

use rootpm::binary::ExecutableLocator;
use rootpm::process::{CommandEnv, CommandError, CommandResult, CommandRunner, Invocation};
use rootpm::{PackageManagerYum, RuntimeConfig};

/// Test environment with a temporary image root.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Image root the package manager operates on
    pub root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join("image-root");
        fs::create_dir_all(root.join("usr/bin")).expect("Failed to create root dir");

        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn root_str(&self) -> String {
        self.root.to_string_lossy().into_owned()
    }

    /// Runtime config whose yum args reference the staging root.
    pub fn config(&self) -> RuntimeConfig {
        let mut command_env = CommandEnv::new();
        command_env.insert("LANG".to_string(), "C".to_string());
        RuntimeConfig {
            yum_args: vec![
                "-c".to_string(),
                format!("{}/etc/yum.conf", self.root_str()),
                "-y".to_string(),
            ],
            command_env,
        }
    }

    /// Yum backend wired to a recording runner and the given locator.
    pub fn package_manager(
        &self,
        runner: &RecordingRunner,
        locator: FakeLocator,
        custom_args: &[&str],
    ) -> PackageManagerYum {
        PackageManagerYum::new(
            self.root.clone(),
            self.config(),
            custom_args.iter().map(|s| s.to_string()).collect(),
        )
        .with_runner(Box::new(runner.clone()))
        .with_locator(Box::new(locator))
    }
}

/// Create a mock executable file.
pub fn create_mock_binary(path: &Path) {
    create_mock_script(path, "echo mock\n");
}

/// Create an executable `/bin/sh` script with the given body.
pub fn create_mock_script(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir for script");
    }
    fs::write(path, format!("#!/bin/sh\n{}", body)).expect("Failed to create mock script");

    let mut perms = fs::metadata(path).expect("Failed to get metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("Failed to set permissions");
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Recording runner
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Run,
    Call,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub mode: Mode,
    pub invocation: Invocation,
    pub env: Option<CommandEnv>,
}

impl Recorded {
    pub fn line(&self) -> String {
        self.invocation.to_string()
    }
}

#[derive(Default)]
struct State {
    recorded: Vec<Recorded>,
    failing: Vec<String>,
    stdout: String,
}

/// Records every invocation instead of executing it.
///
/// Invocations whose command line contains a pattern registered with
/// [`RecordingRunner::fail_when`] exit with status 1.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    state: Rc<RefCell<State>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_when(&self, pattern: &str) {
        self.state.borrow_mut().failing.push(pattern.to_string());
    }

    /// Stdout returned by successful invocations.
    pub fn set_stdout(&self, stdout: &str) {
        self.state.borrow_mut().stdout = stdout.to_string();
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.state.borrow().recorded.clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.recorded().iter().map(Recorded::line).collect()
    }

    fn execute(&self, mode: Mode, invocation: &Invocation, env: Option<&CommandEnv>) -> CommandResult {
        let mut state = self.state.borrow_mut();
        state.recorded.push(Recorded {
            mode,
            invocation: invocation.clone(),
            env: env.cloned(),
        });
        let line = invocation.to_string();
        let fails = state.failing.iter().any(|p| line.contains(p.as_str()));
        CommandResult {
            status: ExitStatus::from_raw(if fails { 1 << 8 } else { 0 }),
            stdout: if fails { String::new() } else { state.stdout.clone() },
            stderr: if fails { format!("{}: failed", invocation.program) } else { String::new() },
        }
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation, env: Option<&CommandEnv>) -> Result<CommandResult> {
        let result = self.execute(Mode::Run, invocation, env);
        if !result.success() {
            return Err(CommandError {
                prefix: format!("'{}' failed", invocation.program),
                code: result.code(),
                stderr: result.stderr_trimmed().to_string(),
            }
            .into());
        }
        Ok(result)
    }

    fn call(&self, invocation: &Invocation, env: Option<&CommandEnv>) -> Result<CommandResult> {
        Ok(self.execute(Mode::Call, invocation, env))
    }
}

// =============================================================================
// Executable locator
// =============================================================================

/// Reports `yum-deprecated` as present only where configured.
#[derive(Debug, Clone, Default)]
pub struct FakeLocator {
    on_path: bool,
    dirs: Vec<PathBuf>,
}

impl FakeLocator {
    /// `yum-deprecated` exists nowhere.
    pub fn none() -> Self {
        Self::default()
    }

    /// `yum-deprecated` exists on the host PATH.
    pub fn on_path() -> Self {
        Self {
            on_path: true,
            dirs: Vec::new(),
        }
    }

    /// `yum-deprecated` exists in `dir`.
    pub fn in_dir(dir: PathBuf) -> Self {
        Self {
            on_path: false,
            dirs: vec![dir],
        }
    }
}

impl ExecutableLocator for FakeLocator {
    fn find(&self, name: &str, search_path: Option<&Path>) -> Option<PathBuf> {
        if name != "yum-deprecated" {
            return None;
        }
        match search_path {
            None if self.on_path => Some(PathBuf::from("/usr/bin").join(name)),
            None => None,
            Some(dir) => self
                .dirs
                .iter()
                .any(|d| d == dir)
                .then(|| dir.join(name)),
        }
    }
}
