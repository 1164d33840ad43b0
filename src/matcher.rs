//! Classification of yum transaction output lines.
//!
//! These are heuristics. `foo` also matches a line reporting `foobar`, since
//! sub packages commonly start with the base package name.

use regex::Regex;

fn matches(marker: &str, package_name: &str, line: &str) -> bool {
    let pattern = format!("^.*{}{}", marker, regex::escape(package_name));
    Regex::new(&pattern).is_ok_and(|re| re.is_match(line))
}

/// Does `line` report `package_name` as being installed?
pub fn match_package_installed(package_name: &str, line: &str) -> bool {
    matches("Installing : ", package_name, line)
}

/// Does `line` report `package_name` as being removed?
pub fn match_package_deleted(package_name: &str, line: &str) -> bool {
    matches("Removing: ", package_name, line)
}
