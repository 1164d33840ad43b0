//! Runtime configuration for package manager invocations.
//!
//! Reads an optional JSON file, then environment variables. Environment
//! variables take precedence over the file. `.env` loading happens in the
//! binary before [`RuntimeConfig::load`] is called.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::process::CommandEnv;

/// Base yum arguments used when nothing else is configured.
pub const DEFAULT_YUM_ARGS: &[&str] = &["-y"];

/// Base arguments and command environment shared by every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Arguments placed right after the yum binary name.
    pub yum_args: Vec<String>,
    /// Environment for install, update and delete invocations.
    pub command_env: CommandEnv,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let mut command_env: CommandEnv = std::env::vars().collect();
        // Output matchers rely on untranslated yum messages.
        command_env.insert("LANG".to_string(), "C".to_string());
        command_env.insert("LC_ALL".to_string(), "C".to_string());

        Self {
            yum_args: DEFAULT_YUM_ARGS.iter().map(|s| s.to_string()).collect(),
            command_env,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from `config_file` (if any) and the environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let env_vars: HashMap<String, String> = std::env::vars().collect();
        Ok(config.with_overrides(&env_vars))
    }

    /// Read a JSON configuration file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Apply `ROOTPM_*` overrides.
    pub fn with_overrides(mut self, env_vars: &HashMap<String, String>) -> Self {
        if let Some(args) = env_vars.get("ROOTPM_YUM_ARGS") {
            self.yum_args = args.split_whitespace().map(str::to_string).collect();
        }
        if let Some(conf) = env_vars.get("ROOTPM_YUM_CONFIG") {
            let conf = conf.trim();
            if !conf.is_empty() {
                self.yum_args.push("-c".to_string());
                self.yum_args.push(conf.to_string());
            }
        }
        self
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  yum_args: {}", self.yum_args.join(" "));
        println!("  command_env: {} variables", self.command_env.len());
        for key in ["LANG", "LC_ALL", "PATH"] {
            if let Some(value) = self.command_env.get(key) {
                println!("    {}={}", key, value);
            }
        }
    }
}
