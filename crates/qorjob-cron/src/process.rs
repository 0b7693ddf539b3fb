//! Detached worker process control.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::error::CronError;

/// A process resolved from a recorded id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessHandle {
    pid: u32,
}

impl ProcessHandle {
    /// Wrap a process id.
    pub fn new(pid: u32) -> Self {
        Self { pid }
    }

    /// The process id.
    pub fn pid(&self) -> u32 {
        self.pid
    }
}

/// Spawns, resolves and terminates worker processes.
#[cfg_attr(test, automock)]
pub trait ProcessController: Send + Sync {
    /// Start `program` detached and return its process id.
    ///
    /// The caller keeps only the id; the child is never waited on.
    fn spawn(&self, program: &Path, args: &[String]) -> Result<u32, CronError>;

    /// Resolve a recorded process id to a live process.
    fn resolve(&self, pid: u32) -> Result<ProcessHandle, CronError>;

    /// Terminate a resolved process.
    fn terminate(&self, handle: &ProcessHandle) -> Result<(), CronError>;
}

/// Process control through the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessController;

impl SystemProcessController {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessController for SystemProcessController {
    fn spawn(&self, program: &Path, args: &[String]) -> Result<u32, CronError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Own process group, so terminal signals aimed at the caller skip the worker.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd.spawn().map_err(|e| CronError::ProcessSpawn {
            program: program.display().to_string(),
            reason: e.to_string(),
        })?;

        let pid = child.id();
        drop(child);

        debug!("Spawned detached worker {} (PID: {})", program.display(), pid);
        Ok(pid)
    }

    #[cfg(unix)]
    fn resolve(&self, pid: u32) -> Result<ProcessHandle, CronError> {
        use nix::sys::signal::{kill, Signal};

        let raw = to_raw_pid(pid)?;
        // Signal 0 checks existence and permission without delivering anything.
        kill(raw, None::<Signal>).map_err(|e| CronError::ProcessLookup {
            pid,
            reason: e.to_string(),
        })?;

        Ok(ProcessHandle::new(pid))
    }

    #[cfg(not(unix))]
    fn resolve(&self, pid: u32) -> Result<ProcessHandle, CronError> {
        Err(CronError::ProcessLookup {
            pid,
            reason: "process lookup is not supported on this platform".to_string(),
        })
    }

    #[cfg(unix)]
    fn terminate(&self, handle: &ProcessHandle) -> Result<(), CronError> {
        use nix::sys::signal::{kill, Signal};

        let pid = handle.pid();
        let raw = to_raw_pid(pid).map_err(|e| CronError::ProcessTermination {
            pid,
            reason: e.to_string(),
        })?;

        kill(raw, Signal::SIGKILL).map_err(|e| CronError::ProcessTermination {
            pid,
            reason: e.to_string(),
        })?;

        debug!("Sent SIGKILL to PID {}", pid);
        Ok(())
    }

    #[cfg(not(unix))]
    fn terminate(&self, handle: &ProcessHandle) -> Result<(), CronError> {
        Err(CronError::ProcessTermination {
            pid: handle.pid(),
            reason: "process termination is not supported on this platform".to_string(),
        })
    }
}

/// Convert a recorded id to a signal target.
///
/// `0` and ids outside the positive `pid_t` range would address process
/// groups, so they never resolve.
#[cfg(unix)]
fn to_raw_pid(pid: u32) -> Result<nix::unistd::Pid, CronError> {
    match i32::try_from(pid) {
        Ok(raw) if raw > 0 => Ok(nix::unistd::Pid::from_raw(raw)),
        _ => Err(CronError::ProcessLookup {
            pid,
            reason: "not a valid process id".to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
