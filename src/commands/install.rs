//! Install command - bootstrap or image phase package installation.

use anyhow::Result;

use rootpm::PackageManager;

use super::ensure_success;

/// Which side of the chroot the install runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPhase {
    Bootstrap,
    Image,
}

/// Requests collected from the command line.
#[derive(Debug, Default)]
pub struct InstallRequest {
    pub packages: Vec<String>,
    pub collections: Vec<String>,
    pub excludes: Vec<String>,
    pub only_required: bool,
}

/// Execute the install command.
pub fn cmd_install(
    pm: &mut dyn PackageManager,
    phase: InstallPhase,
    request: InstallRequest,
) -> Result<()> {
    if request.only_required {
        pm.process_only_required();
    } else {
        pm.process_plus_recommended();
    }
    for package in &request.packages {
        pm.request_package(package);
    }
    for collection in &request.collections {
        pm.request_collection(collection);
    }
    for exclude in &request.excludes {
        pm.request_package_exclusion(exclude);
    }

    let result = match phase {
        InstallPhase::Bootstrap => pm.process_install_requests_bootstrap()?,
        InstallPhase::Image => pm.process_install_requests()?,
    };
    let result = ensure_success(result, "Package installation")?;

    let installed: Vec<&str> = request
        .packages
        .iter()
        .filter(|name| {
            result
                .stdout
                .lines()
                .any(|line| pm.match_package_installed(name, line))
        })
        .map(String::as_str)
        .collect();
    println!("Installed {} of {} requested packages", installed.len(), request.packages.len());
    Ok(())
}
