//! Job subcommand handlers for qorjob.

use tracing::{info, warn};

use qorjob_config::Config;
use qorjob_cron::CronStore;

use crate::adapters::ShellJob;
use crate::cli::Commands;

/// Handle job subcommands.
pub(crate) fn handle_job_command(
    command: Commands,
    store: &CronStore,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::List { format } => job_list(store, &format),
        Commands::Add { job_id } => job_add(store, config, &job_id),
        Commands::Run { job_id } => job_run(store, config, &job_id),
        Commands::Kill { job_id } => job_kill(store, &job_id),
        Commands::Remove { job_id } => job_remove(store, &job_id),
    }
}

/// Run a job inside a detached worker.
pub(crate) fn run_worker(
    store: &CronStore,
    config: &Config,
    job_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Worker started for job '{}' (PID: {})", job_id, std::process::id());
    job_run(store, config, job_id)
}

fn configured_job(config: &Config, job_id: &str) -> Result<ShellJob, Box<dyn std::error::Error>> {
    config
        .job(job_id)
        .map(ShellJob::from_definition)
        .ok_or_else(|| format!("Job '{}' is not defined in the configuration", job_id).into())
}

/// List jobs recorded in the scheduler table.
fn job_list(store: &CronStore, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    store.refresh();
    let jobs = store.jobs();

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&jobs)?;
            println!("{}", json);
        }
        "table" => {
            if jobs.is_empty() {
                println!("No jobs scheduled.");
                return Ok(());
            }

            println!("{:<30} {:<10} {}", "JOB ID", "PID", "STATE");
            println!("{}", "-".repeat(50));
            for job in jobs {
                let state = if job.has_process() { "started" } else { "pending" };
                println!("{:<30} {:<10} {}", job.job_id, job.pid, state);
            }
        }
        other => return Err(format!("Unknown format '{}', expected table or json", other).into()),
    }

    Ok(())
}

/// Start a job as a detached worker.
fn job_add(
    store: &CronStore,
    config: &Config,
    job_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let job = configured_job(config, job_id)?;
    let pid = store.add(&job)?;
    println!("Job '{}' started (PID: {})", job_id, pid);
    Ok(())
}

/// Run a job in the foreground.
fn job_run(
    store: &CronStore,
    config: &Config,
    job_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let job = configured_job(config, job_id)?;
    store.run(&job)?;
    println!("Job '{}' completed", job_id);
    Ok(())
}

/// Kill a job's worker.
fn job_kill(store: &CronStore, job_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    store.kill(&ShellJob::reference(job_id))?;
    println!("Job '{}' killed", job_id);
    Ok(())
}

/// Remove a job without a worker.
///
/// The store reports a pending record it dropped as not found, so the
/// record's presence is checked first to report the outcome correctly.
fn job_remove(store: &CronStore, job_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    store.refresh();
    let was_recorded = store.find(job_id).is_some();

    match store.remove(&ShellJob::reference(job_id)) {
        Ok(()) => {}
        Err(e) if e.is_not_found() && was_recorded => {
            warn!("Store reported '{}' for a job that was recorded", e);
        }
        Err(e) => return Err(e.into()),
    }

    println!("Job '{}' removed", job_id);
    Ok(())
}
