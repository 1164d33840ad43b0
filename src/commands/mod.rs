//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `install` - Bootstrap and image phase installs
//! - `delete` - Remove installed packages from the root
//! - `maintenance` - Upgrade and rpm database checks
//! - `show` - Display configuration

mod delete;
mod install;
mod maintenance;
mod show;

pub use delete::cmd_delete;
pub use install::{cmd_install, InstallPhase, InstallRequest};
pub use maintenance::{cmd_check_db, cmd_update};
pub use show::cmd_show_config;

use anyhow::{bail, Result};
use rootpm::CommandResult;

/// Turn a non-zero package manager status into an error carrying its stderr.
fn ensure_success(result: CommandResult, what: &str) -> Result<CommandResult> {
    if result.success() {
        return Ok(result);
    }
    let stderr = result.stderr_trimmed();
    if stderr.is_empty() {
        bail!("{} failed (exit code {})", what, result.code());
    }
    bail!("{} failed (exit code {}):\n{}", what, result.code(), stderr)
}
