//! Update and database check commands.

use anyhow::{bail, Result};

use rootpm::PackageManager;

use super::ensure_success;

/// Execute the update command.
pub fn cmd_update(pm: &mut dyn PackageManager) -> Result<()> {
    ensure_success(pm.update()?, "Package upgrade")?;
    println!("Root is up to date");
    Ok(())
}

/// Execute the check-db command.
pub fn cmd_check_db(pm: &dyn PackageManager) -> Result<()> {
    if !pm.database_consistent() {
        bail!("Package database is not consistent");
    }
    println!("Package database OK");
    Ok(())
}
