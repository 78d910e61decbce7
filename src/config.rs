/*!
 * Harness Configuration
 * Target specifications and suite-level settings
 */

use crate::core::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

fn default_timeout_secs() -> u64 {
    30
}

fn default_expected_exit() -> i32 {
    0
}

fn default_true() -> bool {
    true
}

/// One target binary the harness should run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TargetSpec {
    pub name: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    /// Per-target deadline; falls back to the suite default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_expected_exit")]
    pub expected_exit: i32,
    #[serde(default = "default_true")]
    pub capture_output: bool,
    /// Inspect the target file before spawning (only meaningful for
    /// path commands; `$PATH` lookups cannot be stat'ed up front)
    #[serde(default = "default_true")]
    pub preflight: bool,
}

impl TargetSpec {
    pub fn new(name: String, command: String) -> Self {
        Self {
            name,
            command,
            args: vec![],
            env: vec![],
            working_dir: None,
            timeout_secs: None,
            expected_exit: 0,
            capture_output: true,
            preflight: true,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_expected_exit(mut self, code: i32) -> Self {
        self.expected_exit = code;
        self
    }

    /// Whether the command names a file on disk rather than a `$PATH` entry
    pub fn is_path_command(&self) -> bool {
        self.command.contains('/') || self.command.contains(std::path::MAIN_SEPARATOR)
    }
}

/// Top-level harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HarnessConfig {
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,
    pub targets: Vec<TargetSpec>,
}

impl HarnessConfig {
    /// Load a suite from a JSON file
    pub fn load(path: &Path) -> HarnessResult<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| HarnessError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| HarnessError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// One-target suite matching the original smoke invocation:
    /// run a single binary, wait for it, expect exit 0
    pub fn single(command: String, args: Vec<String>) -> Self {
        let name = Path::new(&command)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&command)
            .to_string();

        Self {
            default_timeout_secs: default_timeout_secs(),
            targets: vec![TargetSpec::new(name, command).with_args(args)],
        }
    }

    /// Apply environment overrides
    ///
    /// `HARNESS_TIMEOUT_SECS` replaces the suite default timeout.
    pub fn with_env_overrides(mut self) -> HarnessResult<Self> {
        if let Ok(raw) = std::env::var("HARNESS_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                HarnessError::Config(format!("HARNESS_TIMEOUT_SECS is not a number: {}", raw))
            })?;
            self.default_timeout_secs = secs;
        }
        Ok(self)
    }

    pub fn validate(&self) -> HarnessResult<()> {
        if self.targets.is_empty() {
            return Err(HarnessError::Config("no targets configured".to_string()));
        }

        if self.default_timeout_secs == 0 {
            return Err(HarnessError::Config(
                "default_timeout_secs must be positive".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if target.name.is_empty() {
                return Err(HarnessError::Config(
                    "target name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(target.name.as_str()) {
                return Err(HarnessError::Config(format!(
                    "duplicate target name: {}",
                    target.name
                )));
            }
            if target.timeout_secs == Some(0) {
                return Err(HarnessError::Config(format!(
                    "target '{}' has a zero timeout",
                    target.name
                )));
            }
        }

        Ok(())
    }

    /// Effective deadline for a target
    pub fn timeout_for(&self, target: &TargetSpec) -> Duration {
        Duration::from_secs(target.timeout_secs.unwrap_or(self.default_timeout_secs))
    }
}
