//! Centralized command execution with consistent error handling.
//!
//! Everything the package manager backends execute goes through a
//! [`CommandRunner`]. The production runner, [`SystemRunner`], is built on the
//! [`Cmd`] builder which always captures stdout and stderr so failures carry a
//! useful message.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Environment passed to package manager invocations.
pub type CommandEnv = BTreeMap<String, String>;

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit status of the command.
    pub status: ExitStatus,
    /// Captured stdout as a string.
    pub stdout: String,
    /// Captured stderr as a string.
    pub stderr: String,
}

impl CommandResult {
    /// Returns true if the command exited successfully.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Get the exit code, or -1 if terminated by signal.
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }

    /// Get stderr, trimmed of whitespace.
    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }
}

/// A checked command exited non-zero.
#[derive(Debug, thiserror::Error)]
#[error("{prefix} (exit code {code}){}", format_stderr(.stderr))]
pub struct CommandError {
    pub prefix: String,
    pub code: i32,
    pub stderr: String,
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(":\n{}", stderr)
    }
}

/// A program and its argument vector, executed without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn arg_path(mut self, path: &Path) -> Self {
        self.args.push(path.to_string_lossy().into_owned());
        self
    }

    /// Program followed by all arguments.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// Executes invocations on behalf of a package manager backend.
///
/// `run` fails when the command exits non-zero. `call` hands back the status
/// and captured output and leaves the decision to the caller. Both fail when
/// the program cannot be spawned at all.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation, env: Option<&CommandEnv>) -> Result<CommandResult>;

    fn call(&self, invocation: &Invocation, env: Option<&CommandEnv>) -> Result<CommandResult>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn build(invocation: &Invocation, env: Option<&CommandEnv>) -> Cmd {
        let mut cmd = Cmd::new(&invocation.program).args(&invocation.args);
        if let Some(env) = env {
            cmd = cmd.env_map(env);
        }
        cmd
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation, env: Option<&CommandEnv>) -> Result<CommandResult> {
        tracing::debug!(command = %invocation, "run");
        Self::build(invocation, env).run()
    }

    fn call(&self, invocation: &Invocation, env: Option<&CommandEnv>) -> Result<CommandResult> {
        tracing::debug!(command = %invocation, "call");
        Self::build(invocation, env).allow_fail().run()
    }
}

/// Builder for configuring command execution.
pub struct Cmd {
    program: String,
    args: Vec<String>,
    /// Replaces the inherited environment when set.
    env: Option<CommandEnv>,
    /// If true, don't fail on non-zero exit.
    allow_fail: bool,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new(program: impl AsRef<str>) -> Self {
        Self {
            program: program.as_ref().to_string(),
            args: Vec::new(),
            env: None,
            allow_fail: false,
        }
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    /// Run with exactly this environment instead of the inherited one.
    pub fn env_map(mut self, env: &CommandEnv) -> Self {
        self.env = Some(env.clone());
        self
    }

    /// Allow non-zero exit codes without failing.
    pub fn allow_fail(mut self) -> Self {
        self.allow_fail = true;
        self
    }

    /// Run the command and capture output.
    pub fn run(self) -> Result<CommandResult> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref env) = self.env {
            cmd.env_clear();
            cmd.envs(env);
        }

        let output = cmd.output().with_context(|| {
            format!("Failed to execute '{}'. Is it installed?", self.program)
        })?;

        let result = CommandResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !self.allow_fail && !result.success() {
            return Err(CommandError {
                prefix: format!("'{}' failed", self.program),
                code: result.code(),
                stderr: result.stderr_trimmed().to_string(),
            }
            .into());
        }

        Ok(result)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_success() {
        let result = Cmd::new("echo").args(["hello"]).run().unwrap();
        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn test_run_failure_is_command_error() {
        let err = Cmd::new("ls")
            .args(["/nonexistent_path_12345"])
            .run()
            .unwrap_err();
        let cmd_err = err.downcast_ref::<CommandError>().expect("CommandError");

        assert_ne!(cmd_err.code, 0);
        assert!(!cmd_err.stderr.is_empty());
        assert!(err.to_string().starts_with("'ls' failed"));
    }

    #[test]
    fn test_allow_fail() {
        let result = Cmd::new("false").allow_fail().run().unwrap();

        assert!(!result.success());
        assert_eq!(result.code(), 1);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = Cmd::new("nonexistent_program_12345").allow_fail().run().unwrap_err();
        assert!(err.to_string().contains("Is it installed?"));
        assert!(err.downcast_ref::<CommandError>().is_none());
    }

    #[test]
    fn test_env_map_replaces_environment() {
        let mut env = CommandEnv::new();
        env.insert("ROOTPM_MARKER".to_string(), "set".to_string());
        env.insert("PATH".to_string(), "/usr/bin:/bin".to_string());

        let result = Cmd::new("sh")
            .args(["-c", "echo $ROOTPM_MARKER:${HOME:-unset}"])
            .env_map(&env)
            .run()
            .unwrap();

        assert_eq!(result.stdout.trim(), "set:unset");
    }

    #[test]
    fn test_system_runner_call_returns_status() {
        let result = SystemRunner
            .call(&Invocation::new("false"), None)
            .unwrap();
        assert!(!result.success());
    }

    #[test]
    fn test_system_runner_run_fails_on_status() {
        assert!(SystemRunner.run(&Invocation::new("false"), None).is_err());
    }

    #[test]
    fn test_invocation_display() {
        let inv = Invocation::new("chroot")
            .arg_path(Path::new("/tmp/root"))
            .args(["rpm", "--rebuilddb"]);
        assert_eq!(inv.to_string(), "chroot /tmp/root rpm --rebuilddb");
    }
}
