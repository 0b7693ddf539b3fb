//! CLI definitions for qorjob.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// qorjob CLI.
#[derive(Parser)]
#[command(name = "qorjob")]
#[command(about = "Identifiable job queue on top of the system scheduler table")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.qorjob/config.toml)
    #[arg(short, long, global = true, env = "QORJOB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run the given job as a detached worker
    #[arg(long = "qor-job", value_name = "JOB_ID", hide = true)]
    pub qor_job: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List jobs recorded in the scheduler table
    List {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Start a configured job as a detached worker and record it
    Add {
        /// Job ID
        job_id: String,
    },

    /// Run a configured job in the foreground and mark it complete
    Run {
        /// Job ID
        job_id: String,
    },

    /// Kill a job's worker process and drop its record
    Kill {
        /// Job ID
        job_id: String,
    },

    /// Drop the record of a job that has no worker process
    Remove {
        /// Job ID
        job_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_worker_flag() {
        let cli = Cli::try_parse_from(["qorjob", "--qor-job", "nightly"]).unwrap();
        assert_eq!(cli.qor_job.as_deref(), Some("nightly"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_worker_flag_with_config() {
        let cli = Cli::try_parse_from([
            "qorjob",
            "--config",
            "/etc/qorjob.toml",
            "--qor-job",
            "nightly",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/qorjob.toml")));
        assert_eq!(cli.qor_job.as_deref(), Some("nightly"));
    }

    #[test]
    fn test_parse_list_format() {
        let cli = Cli::try_parse_from(["qorjob", "list", "--format", "json"]).unwrap();
        match cli.command {
            Some(Commands::List { format }) => assert_eq!(format, "json"),
            _ => panic!("Expected list command"),
        }
    }

    #[test]
    fn test_parse_remove() {
        let cli = Cli::try_parse_from(["qorjob", "remove", "abc"]).unwrap();
        match cli.command {
            Some(Commands::Remove { job_id }) => assert_eq!(job_id, "abc"),
            _ => panic!("Expected remove command"),
        }
    }
}
