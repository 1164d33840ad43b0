//! rootpm library exports.
//!
//! Package install orchestration for root filesystem image builds. Requests
//! are queued on a [`PackageManager`] and turned into package manager
//! invocations for the bootstrap phase (host side, `--installroot`) or the
//! image phase (inside `chroot <root>`).

pub mod args;
pub mod binary;
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod matcher;
pub mod process;
pub mod request;
pub mod root_bind;

pub use config::RuntimeConfig;
pub use error::RequestError;
pub use manager::{create_package_manager, PackageManager, PackageManagerKind, PackageManagerYum};
pub use process::{CommandResult, CommandRunner, Invocation};
