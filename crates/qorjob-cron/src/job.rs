//! Job descriptor contract supplied by the host program.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Handler invoked with the job's serializable argument and its descriptor.
pub type JobHandler = Arc<dyn Fn(Value, &dyn JobDescriptor) -> anyhow::Result<()> + Send + Sync>;

/// A runnable job.
#[derive(Clone)]
pub struct Job {
    /// Job name, used in error messages.
    pub name: String,
    /// Handler executing the job. `None` means the job cannot run.
    pub handler: Option<JobHandler>,
}

impl Job {
    /// Create a job with a handler.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value, &dyn JobDescriptor) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            handler: Some(Arc::new(handler)),
        }
    }

    /// Create a job without a handler.
    pub fn without_handler(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handler: None,
        }
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("name", &self.name)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Describes one job instance to the store.
pub trait JobDescriptor {
    /// Identifier written into the scheduler table.
    fn job_id(&self) -> &str;

    /// The job definition.
    fn job(&self) -> &Job;

    /// Argument passed to the job handler.
    fn serializable_argument(&self) -> Value;
}
