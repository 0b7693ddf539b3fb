//! Scheduler table codec.
//!
//! A table is an ordered list of foreign lines (anything this crate does not
//! own, kept verbatim) plus the job records decoded from owned blocks.

use tracing::warn;

use crate::error::CronError;
use crate::record::CronJob;

/// Prefix of the line opening an owned block.
pub const BEGIN_MARKER: &str = "## BEGIN QOR JOB";

/// Prefix of the line closing an owned block.
pub const END_MARKER: &str = "## END QOR JOB";

/// Parsed snapshot of the scheduler table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CronTable {
    /// Lines outside owned blocks, in original order.
    pub lines: Vec<String>,
    /// Records decoded from owned blocks.
    pub jobs: Vec<CronJob>,
}

impl CronTable {
    /// Parse raw table text.
    ///
    /// Lines inside an owned block never reach `lines`. A begin marker whose
    /// payload cannot be decoded still opens a block, so the whole block is
    /// dropped. A block with no end marker swallows the rest of the table.
    pub fn parse(raw: &str) -> Self {
        let mut table = CronTable::default();
        let raw = raw.trim_end_matches(['\n', '\r']);
        if raw.trim().is_empty() {
            return table;
        }

        let mut in_block = false;
        for line in raw.split('\n') {
            if line.starts_with(BEGIN_MARKER) {
                in_block = true;
                match decode_begin_marker(line) {
                    Ok(job) => table.jobs.push(job),
                    Err(e) => warn!("Dropping job block: {}", e),
                }
            }

            if !in_block {
                table.lines.push(line.to_string());
            }

            if line.starts_with(END_MARKER) {
                in_block = false;
            }
        }

        table
    }

    /// Render the table back to text, skipping records marked for deletion.
    pub fn render(&self) -> Result<String, CronError> {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        for job in self.live_jobs() {
            out.push_str(&encode_block(job)?);
        }
        Ok(out)
    }

    /// Records not marked for deletion.
    pub fn live_jobs(&self) -> impl Iterator<Item = &CronJob> {
        self.jobs.iter().filter(|job| !job.marked_for_deletion)
    }

    /// First live record with the given id.
    pub fn find(&self, job_id: &str) -> Option<&CronJob> {
        self.live_jobs().find(|job| job.job_id == job_id)
    }

    /// First live record with the given id, mutably.
    pub fn find_mut(&mut self, job_id: &str) -> Option<&mut CronJob> {
        self.jobs
            .iter_mut()
            .find(|job| !job.marked_for_deletion && job.job_id == job_id)
    }

    /// Mark every live record with the given id for deletion.
    ///
    /// Returns the number of records marked.
    pub fn mark_for_deletion(&mut self, job_id: &str) -> usize {
        let mut marked = 0;
        for job in self
            .jobs
            .iter_mut()
            .filter(|job| !job.marked_for_deletion && job.job_id == job_id)
        {
            job.mark_for_deletion();
            marked += 1;
        }
        marked
    }
}

/// Decode the record carried by a begin-marker line.
///
/// The JSON payload starts one character before the first `{`, which is the
/// delimiter following `#`.
pub fn decode_begin_marker(line: &str) -> Result<CronJob, CronError> {
    let payload = line
        .find('{')
        .filter(|idx| *idx > 1)
        .and_then(|idx| line.get(idx - 1..))
        .ok_or_else(|| CronError::MalformedRecord(format!("no JSON payload in '{}'", line)))?;

    serde_json::from_str(payload)
        .map_err(|e| CronError::MalformedRecord(format!("{} in '{}'", e, line)))
}

/// Check that a job id survives a write/parse cycle of its begin marker.
///
/// The id precedes the JSON payload on the marker line, so it must not
/// contain `{` or a line break.
pub fn validate_job_id(job_id: &str) -> Result<(), CronError> {
    let reason = if job_id.contains('{') {
        "job id contains '{'"
    } else if job_id.contains(['\n', '\r']) {
        "job id contains a line break"
    } else {
        return Ok(());
    };

    Err(CronError::InvalidJobId {
        id: job_id.to_string(),
        reason: reason.to_string(),
    })
}

/// Encode one record as a begin/command/end block.
fn encode_block(job: &CronJob) -> Result<String, CronError> {
    let payload =
        serde_json::to_string(job).map_err(|e| CronError::RecordEncoding(e.to_string()))?;
    Ok(format!(
        "{} {} # {}\n{}\n{}\n",
        BEGIN_MARKER, job.job_id, payload, job.command, END_MARKER
    ))
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
