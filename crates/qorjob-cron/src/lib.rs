//! # qorjob Cron
//!
//! Identifiable job queue layered on top of the system scheduler table
//! (`crontab`).
//!
//! Jobs owned by this crate live in the table as self-delimited blocks:
//!
//! ```text
//! ## BEGIN QOR JOB <id> # {"JobID":"<id>","Pid":<pid>,"Command":"<command>"}
//! <command>
//! ## END QOR JOB
//! ```
//!
//! Every other line in the table is preserved verbatim.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qorjob_cron::CronStore;
//! use qorjob_config::Config;
//!
//! let config = Config::default();
//! let store = CronStore::from_config(&config.crontab, config.worker.clone());
//! store.add(&descriptor)?;      // spawn a detached worker and record it
//! store.run(&descriptor)?;      // inside the worker: run + mark complete
//! store.kill(&descriptor)?;     // terminate a running worker
//! ```

pub mod backend;
pub mod error;
pub mod job;
pub mod process;
pub mod record;
pub mod store;
pub mod table;

// Re-exports
pub use backend::{CrontabBackend, MemoryCrontab, SystemCrontab};
pub use error::CronError;
pub use job::{Job, JobDescriptor, JobHandler};
pub use process::{ProcessController, ProcessHandle, SystemProcessController};
pub use record::CronJob;
pub use store::CronStore;
pub use table::{decode_begin_marker, validate_job_id, CronTable, BEGIN_MARKER, END_MARKER};
