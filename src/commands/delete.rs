//! Delete command - tolerant removal of installed packages.

use anyhow::Result;

use rootpm::PackageManager;

use super::ensure_success;

/// Execute the delete command.
pub fn cmd_delete(pm: &mut dyn PackageManager, packages: &[String]) -> Result<()> {
    for package in packages {
        pm.request_package(package);
    }
    let result = ensure_success(pm.process_delete_requests(false)?, "Package removal")?;

    for package in packages {
        let removed = result
            .stdout
            .lines()
            .any(|line| pm.match_package_deleted(package, line));
        if removed {
            println!("  removed {}", package);
        }
    }
    Ok(())
}
