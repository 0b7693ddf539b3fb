//! Job records embedded in the scheduler table.

use serde::{Deserialize, Serialize};

/// A job owned by this crate, as recorded in one table block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CronJob {
    /// Job identifier.
    #[serde(rename = "JobID")]
    pub job_id: String,
    /// Worker process id. `0` means no worker was recorded.
    #[serde(rename = "Pid")]
    pub pid: u32,
    /// Command line placed inside the block.
    #[serde(rename = "Command")]
    pub command: String,
    /// Drop this record on the next write. Never serialized.
    #[serde(skip)]
    pub marked_for_deletion: bool,
}

impl CronJob {
    /// Create a record for a freshly spawned worker.
    pub fn new(job_id: impl Into<String>, pid: u32) -> Self {
        Self {
            job_id: job_id.into(),
            pid,
            command: String::new(),
            marked_for_deletion: false,
        }
    }

    /// Whether a worker process id is recorded.
    pub fn has_process(&self) -> bool {
        self.pid != 0
    }

    /// Flag the record for removal on the next write.
    pub fn mark_for_deletion(&mut self) {
        self.marked_for_deletion = true;
    }
}
