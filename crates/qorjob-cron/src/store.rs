//! Job registry backed by the scheduler table.
//!
//! Every mutating operation runs one locked cycle: reload the table, mutate
//! the snapshot, write it back. The write happens on every path out of the
//! cycle, including failed mutations.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use qorjob_config::{CrontabConfig, WorkerConfig};

use crate::backend::{CrontabBackend, SystemCrontab};
use crate::error::CronError;
use crate::job::JobDescriptor;
use crate::process::{ProcessController, SystemProcessController};
use crate::record::CronJob;
use crate::table::{validate_job_id, CronTable};

/// Scheduler-table job store.
///
/// The lock only serializes callers inside this process; other editors of
/// the same table are not excluded.
pub struct CronStore {
    backend: Arc<dyn CrontabBackend>,
    processes: Arc<dyn ProcessController>,
    worker: WorkerConfig,
    table: Mutex<CronTable>,
}

impl CronStore {
    /// Create a store over the given backend and process controller.
    pub fn new(
        backend: Arc<dyn CrontabBackend>,
        processes: Arc<dyn ProcessController>,
        worker: WorkerConfig,
    ) -> Self {
        Self {
            backend,
            processes,
            worker,
            table: Mutex::new(CronTable::default()),
        }
    }

    /// Create a store driving the system scheduler table and real processes.
    pub fn from_config(crontab: &CrontabConfig, worker: WorkerConfig) -> Self {
        Self::new(
            Arc::new(SystemCrontab::new(crontab.clone())),
            Arc::new(SystemProcessController::new()),
            worker,
        )
    }

    /// Reload the snapshot from the scheduler table.
    ///
    /// A table that cannot be listed is treated as empty.
    pub fn refresh(&self) {
        let mut table = self.table.lock();
        self.reload(&mut table);
    }

    /// Write the current snapshot back to the scheduler table.
    pub fn persist(&self) -> Result<(), CronError> {
        let table = self.table.lock();
        self.write(&table)
    }

    /// Live records in the current snapshot.
    pub fn jobs(&self) -> Vec<CronJob> {
        self.table.lock().live_jobs().cloned().collect()
    }

    /// Live record with the given id in the current snapshot.
    pub fn find(&self, job_id: &str) -> Option<CronJob> {
        self.table.lock().find(job_id).cloned()
    }

    /// Foreign lines in the current snapshot.
    pub fn foreign_lines(&self) -> Vec<String> {
        self.table.lock().lines.clone()
    }

    /// Start a detached worker for the job and record its process id.
    ///
    /// The worker is the configured program (or the running executable)
    /// invoked with the worker flag and the job id. Ids that cannot be read
    /// back from the table are refused before anything is spawned.
    pub fn add(&self, descriptor: &dyn JobDescriptor) -> Result<u32, CronError> {
        let job_id = descriptor.job_id();
        validate_job_id(job_id)?;

        self.with_table(|table| {
            if table.find(job_id).is_some() {
                warn!("Job '{}' is already in the scheduler table", job_id);
            }

            let (program, args) = self.worker_command(job_id)?;
            let pid = self.processes.spawn(&program, &args)?;
            table.jobs.push(CronJob::new(job_id, pid));

            info!("Registered job '{}' (PID: {})", job_id, pid);
            Ok(pid)
        })
    }

    /// Execute the job handler, then drop every record of the job.
    ///
    /// A failing handler leaves the table untouched so the job stays
    /// scheduled.
    pub fn run(&self, descriptor: &dyn JobDescriptor) -> Result<(), CronError> {
        let job = descriptor.job();
        let Some(handler) = job.handler.as_ref() else {
            return Err(CronError::NoHandler(job.name.clone()));
        };

        let job_id = descriptor.job_id();
        debug!("Running job '{}' ({})", job_id, job.name);
        handler(descriptor.serializable_argument(), descriptor).map_err(CronError::Handler)?;

        self.with_table(|table| {
            let completed = table.mark_for_deletion(job_id);
            info!("Job '{}' completed, {} record(s) removed", job_id, completed);
            Ok(())
        })
    }

    /// Terminate the job's worker process and drop its record.
    pub fn kill(&self, descriptor: &dyn JobDescriptor) -> Result<(), CronError> {
        let job_id = descriptor.job_id();

        self.with_table(|table| {
            let record = table
                .find_mut(job_id)
                .ok_or_else(|| CronError::NotFound(job_id.to_string()))?;

            let handle = self.processes.resolve(record.pid)?;
            self.processes.terminate(&handle)?;
            record.mark_for_deletion();

            info!("Killed job '{}' (PID: {})", job_id, handle.pid());
            Ok(())
        })
    }

    /// Drop records of a job that has no worker process.
    ///
    /// A matching record with a worker fails with [`CronError::JobRunning`]
    /// and stops the scan. Otherwise this returns [`CronError::NotFound`]
    /// even when records were dropped; the drop is still written.
    pub fn remove(&self, descriptor: &dyn JobDescriptor) -> Result<(), CronError> {
        let job_id = descriptor.job_id();

        self.with_table(|table| {
            for record in table.jobs.iter_mut().filter(|job| job.job_id == job_id) {
                if record.has_process() {
                    return Err(CronError::JobRunning(job_id.to_string()));
                }
                record.mark_for_deletion();
                info!("Removed pending job '{}'", job_id);
            }
            Err(CronError::NotFound(job_id.to_string()))
        })
    }

    /// Run one reload/mutate/write cycle under the lock.
    ///
    /// When both the mutation and the write fail, the mutation error wins.
    fn with_table<T>(
        &self,
        mutate: impl FnOnce(&mut CronTable) -> Result<T, CronError>,
    ) -> Result<T, CronError> {
        let mut table = self.table.lock();
        self.reload(&mut table);

        let outcome = mutate(&mut *table);
        let persisted = self.write(&table);

        match (outcome, persisted) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) | (Err(e), Ok(())) => Err(e),
            (Err(e), Err(write_err)) => {
                warn!("Failed to write scheduler table after error '{}': {}", e, write_err);
                Err(e)
            }
        }
    }

    fn reload(&self, table: &mut CronTable) {
        *table = match self.backend.list() {
            Ok(raw) => CronTable::parse(&raw),
            Err(e) => {
                debug!("Scheduler table unavailable, starting empty: {}", e);
                CronTable::default()
            }
        };
        debug!(
            "Loaded {} job(s) and {} foreign line(s)",
            table.jobs.len(),
            table.lines.len()
        );
    }

    fn write(&self, table: &CronTable) -> Result<(), CronError> {
        let content = table.render()?;
        self.backend.install(&content)?;
        debug!("Wrote {} job(s) to scheduler table", table.live_jobs().count());
        Ok(())
    }

    fn worker_command(&self, job_id: &str) -> Result<(PathBuf, Vec<String>), CronError> {
        let program = match self.worker.program_path() {
            Some(program) => program,
            None => std::env::current_exe().map_err(|e| CronError::ProcessSpawn {
                program: "current executable".to_string(),
                reason: e.to_string(),
            })?,
        };

        let mut args = self.worker.args.clone();
        args.push(self.worker.flag.clone());
        args.push(job_id.to_string());
        Ok((program, args))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
