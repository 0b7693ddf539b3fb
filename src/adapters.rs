//! Adapter types and utility functions for qorjob.

use std::process::Command;

use anyhow::{bail, Context};
use serde_json::Value;

use qorjob_config::JobDefinition;
use qorjob_cron::{Job, JobDescriptor};

/// Adapter: bridges a configured [`JobDefinition`] to the store's
/// [`JobDescriptor`] contract.
///
/// The handler runs the definition's command through the platform shell with
/// the job id as `$0` and the configured args as positional parameters.
pub(crate) struct ShellJob {
    id: String,
    job: Job,
    args: Vec<String>,
}

impl ShellJob {
    /// Build a runnable descriptor from a definition.
    pub(crate) fn from_definition(definition: &JobDefinition) -> Self {
        let command = definition.command.clone();
        Self {
            id: definition.id.clone(),
            job: Job::new(definition.display_name(), move |argument, descriptor| {
                run_shell(&command, argument, descriptor)
            }),
            args: definition.args.clone(),
        }
    }

    /// A descriptor naming a job id only, for kill and remove.
    pub(crate) fn reference(job_id: &str) -> Self {
        Self {
            id: job_id.to_string(),
            job: Job::without_handler(job_id),
            args: Vec::new(),
        }
    }
}

impl JobDescriptor for ShellJob {
    fn job_id(&self) -> &str {
        &self.id
    }

    fn job(&self) -> &Job {
        &self.job
    }

    fn serializable_argument(&self) -> Value {
        Value::from(self.args.clone())
    }
}

fn run_shell(command: &str, argument: Value, descriptor: &dyn JobDescriptor) -> anyhow::Result<()> {
    let args: Vec<String> =
        serde_json::from_value(argument).context("job argument must be a list of strings")?;

    let (shell, flag) = if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    };

    let status = Command::new(shell)
        .arg(flag)
        .arg(command)
        .arg(descriptor.job_id())
        .args(&args)
        .env("QOR_JOB_ID", descriptor.job_id())
        .status()
        .with_context(|| format!("failed to start '{}'", command))?;

    if !status.success() {
        bail!("job {} exited with {}", descriptor.job_id(), status);
    }
    Ok(())
}
