/*!
 * Process Executor
 * Handles OS-level process spawning, supervision, and reaping
 */

use super::types::{ExecutionConfig, ExitSummary};
use super::validation;
use crate::core::{HarnessError, HarnessResult, Pid};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{error, info, warn};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Poll interval for deadline-bounded waits
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Represents an executing OS process
#[derive(Debug)]
pub struct ExecutingProcess {
    pub pid: Pid,    // Internal PID
    pub os_pid: u32, // OS-level PID
    pub name: String,
    pub command: String,
    capture: bool,
    child: Child,
}

/// Manages OS process execution
///
/// Children are registered under a harness-internal pid. Each pid is
/// consumed by exactly one successful `wait`, `wait_timeout`, or `kill`;
/// a consumed pid reports `ProcessNotFound` afterwards.
pub struct ProcessExecutor {
    processes: Arc<DashMap<Pid, ExecutingProcess>>,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        info!("Process executor initialized");
        Self {
            processes: Arc::new(DashMap::new()),
        }
    }

    /// Spawn a new OS process
    pub fn spawn(&self, pid: Pid, name: String, config: ExecutionConfig) -> HarnessResult<u32> {
        validation::validate_command(&config.command)?;
        for arg in &config.args {
            validation::validate_argument(arg)?;
        }

        let mut cmd = Command::new(&config.command);

        if !config.args.is_empty() {
            cmd.args(&config.args);
        }

        // Clean-slate environment: targets see only what the config grants
        cmd.env_clear();
        for (key, value) in &config.env_vars {
            cmd.env(key, value);
        }

        if let Some(ref dir) = config.working_dir {
            cmd.current_dir(dir);
        }

        if config.capture_output {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        } else {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }

        let child = cmd
            .spawn()
            .map_err(|e| HarnessError::SpawnFailed(format!("{}: {}", config.command, e)))?;

        let os_pid = child.id();

        info!(
            "Spawned OS process: '{}' (PID: {}, OS PID: {})",
            name, pid, os_pid
        );

        let mut process = ExecutingProcess {
            pid,
            os_pid,
            name,
            command: config.command,
            capture: config.capture_output,
            child,
        };

        // Registration must be atomic with the duplicate check: losing a
        // spawned child out of the map would leave it unreaped
        match self.processes.entry(pid) {
            Entry::Occupied(_) => {
                warn!(
                    "PID {} already registered, discarding duplicate spawn (OS PID: {})",
                    pid, os_pid
                );
                let _ = process.child.kill();
                let _ = process.child.wait();
                Err(HarnessError::SpawnFailed(format!(
                    "pid {} already registered",
                    pid
                )))
            }
            Entry::Vacant(entry) => {
                entry.insert(process);
                Ok(os_pid)
            }
        }
    }

    /// Wait for a process to complete
    pub fn wait(&self, pid: Pid) -> HarnessResult<ExitSummary> {
        let (_, mut process) = self
            .processes
            .remove(&pid)
            .ok_or(HarnessError::ProcessNotFound(pid))?;

        let name = process.name.clone();

        // wait_with_output drains both pipes while waiting, so a chatty
        // child cannot fill a pipe and stall the wait
        let result = if process.capture {
            process.child.wait_with_output().map(|output| ExitSummary {
                code: output.status.code(),
                stdout: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
                stderr: Some(String::from_utf8_lossy(&output.stderr).into_owned()),
            })
        } else {
            process.child.wait().map(|status| ExitSummary {
                code: status.code(),
                stdout: None,
                stderr: None,
            })
        };

        match result {
            Ok(summary) => {
                info!(
                    "Process '{}' (PID: {}) exited with code {:?}",
                    name, pid, summary.code
                );
                Ok(summary)
            }
            Err(e) => {
                error!("Failed to wait for process PID {}: {}", pid, e);
                Err(HarnessError::WaitFailed(e.to_string()))
            }
        }
    }

    /// Wait for a process with a deadline
    ///
    /// On deadline the child is killed and reaped before `Timeout` is
    /// returned, so no zombie survives the call.
    pub fn wait_timeout(&self, pid: Pid, timeout: Duration) -> HarnessResult<ExitSummary> {
        let (_, mut process) = self
            .processes
            .remove(&pid)
            .ok_or(HarnessError::ProcessNotFound(pid))?;

        // Drain the pipes off-thread while polling: a child that writes
        // more than a pipe buffer would otherwise block on write, never
        // exit, and hit the deadline
        let stdout = process.child.stdout.take().map(drain_in_background);
        let stderr = process.child.stderr.take().map(drain_in_background);

        let deadline = Instant::now() + timeout;

        loop {
            match process.child.try_wait() {
                Ok(Some(status)) => {
                    let summary = ExitSummary {
                        code: status.code(),
                        stdout: join_drain(stdout),
                        stderr: join_drain(stderr),
                    };
                    info!(
                        "Process '{}' (PID: {}) exited with code {:?}",
                        process.name, pid, summary.code
                    );
                    return Ok(summary);
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        warn!(
                            "Process '{}' (PID: {}) exceeded deadline of {:?}, killing",
                            process.name, pid, timeout
                        );
                        if let Err(e) = process.child.kill() {
                            error!("Failed to kill timed-out process PID {}: {}", pid, e);
                        }
                        let _ = process.child.wait();
                        // Pipes hit EOF once the child is reaped
                        join_drain(stdout);
                        join_drain(stderr);
                        return Err(HarnessError::Timeout(timeout.as_millis() as u64));
                    }
                    std::thread::sleep(WAIT_POLL_INTERVAL);
                }
                Err(e) => {
                    error!("Failed to wait for process PID {}: {}", pid, e);
                    return Err(HarnessError::WaitFailed(e.to_string()));
                }
            }
        }
    }

    /// Kill a running process
    pub fn kill(&self, pid: Pid) -> HarnessResult<()> {
        let (_, mut process) = self
            .processes
            .remove(&pid)
            .ok_or(HarnessError::ProcessNotFound(pid))?;

        match process.child.kill() {
            Ok(_) => {
                info!("Killed OS process PID {} (OS PID: {})", pid, process.os_pid);
                // Reap so the child does not linger as a zombie
                let _ = process.child.wait();
                Ok(())
            }
            Err(e) => {
                error!("Failed to kill process PID {}: {}", pid, e);
                Err(HarnessError::WaitFailed(e.to_string()))
            }
        }
    }

    /// Check if a process is still registered
    pub fn is_running(&self, pid: Pid) -> bool {
        self.processes.contains_key(&pid)
    }

    /// Get OS PID for an internal PID
    pub fn os_pid(&self, pid: Pid) -> Option<u32> {
        self.processes.get(&pid).map(|p| p.os_pid)
    }

    /// Get count of registered processes
    pub fn count(&self) -> usize {
        self.processes.len()
    }

    /// Reap children that exited without an explicit wait
    pub fn cleanup(&self) {
        let mut to_remove = Vec::new();

        for mut entry in self.processes.iter_mut() {
            let pid = *entry.key();
            let process = entry.value_mut();

            match process.child.try_wait() {
                Ok(Some(status)) => {
                    info!(
                        "Process PID {} exited with status: {:?}",
                        pid,
                        status.code()
                    );
                    to_remove.push(pid);
                }
                Ok(None) => {
                    // Still running
                }
                Err(e) => {
                    warn!("Error checking process PID {}: {}", pid, e);
                    to_remove.push(pid);
                }
            }
        }

        for pid in to_remove {
            self.processes.remove(&pid);
        }

        let count = self.processes.len();
        if count > 0 {
            info!("Cleanup: {} active processes remain", count);
        }
    }
}

fn drain_in_background<R: Read + Send + 'static>(mut stream: R) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = stream.read_to_end(&mut buf) {
            warn!("Failed to read captured stream: {}", e);
        }
        buf
    })
}

fn join_drain(handle: Option<JoinHandle<Vec<u8>>>) -> Option<String> {
    let buf = handle?.join().ok()?;
    Some(String::from_utf8_lossy(&buf).into_owned())
}

impl Clone for ProcessExecutor {
    fn clone(&self) -> Self {
        Self {
            processes: Arc::clone(&self.processes),
        }
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}
