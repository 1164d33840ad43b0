//! Show command - displays the effective configuration.

use rootpm::RuntimeConfig;

/// Execute the show-config command.
pub fn cmd_show_config(config: &RuntimeConfig) {
    config.print();
}
