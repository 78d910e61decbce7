/*!
 * Process Types
 * Common types for child process execution
 */

use serde::{Deserialize, Serialize};

/// Configuration for process execution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExecutionConfig {
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub capture_output: bool,
}

impl ExecutionConfig {
    pub fn new(command: String) -> Self {
        Self {
            command,
            args: vec![],
            env_vars: vec![],
            working_dir: None,
            capture_output: true,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_env(mut self, env_vars: Vec<(String, String)>) -> Self {
        self.env_vars = env_vars;
        self
    }

    pub fn with_working_dir(mut self, dir: String) -> Self {
        self.working_dir = Some(dir);
        self
    }

    pub fn with_output_capture(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }
}

/// Summary of a reaped child
///
/// `code` is `None` when the child was terminated by a signal.
/// Captured streams are present only when the execution config
/// requested output capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExitSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl ExitSummary {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn signaled(&self) -> bool {
        self.code.is_none()
    }
}
