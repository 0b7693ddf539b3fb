//! Access to the scheduler table text.

use std::io::Write;
use std::process::{Command, Stdio};

use parking_lot::Mutex;
use tracing::debug;

use qorjob_config::CrontabConfig;

use crate::error::CronError;

/// Reads and replaces the raw scheduler table.
pub trait CrontabBackend: Send + Sync {
    /// Return the current table text.
    fn list(&self) -> Result<String, CronError>;

    /// Replace the table with `content`.
    fn install(&self, content: &str) -> Result<(), CronError>;
}

/// Backend driving the system `crontab` command (or a configured substitute).
#[derive(Debug, Clone)]
pub struct SystemCrontab {
    config: CrontabConfig,
}

impl SystemCrontab {
    /// Create a backend from configuration.
    pub fn new(config: CrontabConfig) -> Self {
        Self { config }
    }

    fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.config.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for SystemCrontab {
    fn default() -> Self {
        Self::new(CrontabConfig::default())
    }
}

impl CrontabBackend for SystemCrontab {
    fn list(&self) -> Result<String, CronError> {
        let command = self.command_line(&self.config.list_args);

        let output = Command::new(&self.config.program)
            .args(&self.config.list_args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| CronError::CommandExecution {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CronError::CommandExecution {
                command,
                reason: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        debug!("Listed scheduler table with '{}'", command);
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn install(&self, content: &str) -> Result<(), CronError> {
        let command = self.command_line(&self.config.install_args);
        let failed = |reason: String| CronError::CommandExecution {
            command: command.clone(),
            reason,
        };

        let mut child = Command::new(&self.config.program)
            .args(&self.config.install_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| failed(e.to_string()))?;

        // Closing stdin on scope exit signals end of input.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(content.as_bytes()),
            None => Ok(()),
        };

        // Reap the child even when the write failed; its stderr says why.
        let output = child
            .wait_with_output()
            .map_err(|e| failed(e.to_string()))?;

        if let Err(e) = written {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!(
                "failed to write table: {} ({}; {})",
                e,
                stderr.trim(),
                output.status
            )));
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!("{} ({})", stderr.trim(), output.status)));
        }

        debug!("Installed scheduler table with '{}' ({} bytes)", command, content.len());
        Ok(())
    }
}

/// In-process scheduler table.
///
/// Listing an empty table fails, like `crontab -l` for a user with no table.
#[derive(Debug, Default)]
pub struct MemoryCrontab {
    content: Mutex<Option<String>>,
    installs: Mutex<usize>,
}

impl MemoryCrontab {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding `content`.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(Some(content.into())),
            installs: Mutex::new(0),
        }
    }

    /// Current table text, if any was set or installed.
    pub fn content(&self) -> Option<String> {
        self.content.lock().clone()
    }

    /// Number of successful installs.
    pub fn install_count(&self) -> usize {
        *self.installs.lock()
    }
}

impl CrontabBackend for MemoryCrontab {
    fn list(&self) -> Result<String, CronError> {
        self.content
            .lock()
            .clone()
            .ok_or_else(|| CronError::CommandExecution {
                command: "memory list".to_string(),
                reason: "no table installed".to_string(),
            })
    }

    fn install(&self, content: &str) -> Result<(), CronError> {
        *self.content.lock() = Some(content.to_string());
        *self.installs.lock() += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
