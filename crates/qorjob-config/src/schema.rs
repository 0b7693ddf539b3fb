//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::loader::ConfigLoader;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crontab: CrontabConfig,

    #[serde(default)]
    pub worker: WorkerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub jobs: Vec<JobDefinition>,
}

impl Config {
    /// Look up a job definition by id.
    pub fn job(&self, id: &str) -> Option<&JobDefinition> {
        self.jobs.iter().find(|job| job.id == id)
    }
}

/// Scheduler table command configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrontabConfig {
    /// Program managing the scheduler table.
    #[serde(default = "default_crontab_program")]
    pub program: String,

    /// Arguments that print the current table to stdout.
    #[serde(default = "default_list_args")]
    pub list_args: Vec<String>,

    /// Arguments that replace the table with stdin.
    #[serde(default = "default_install_args")]
    pub install_args: Vec<String>,
}

impl Default for CrontabConfig {
    fn default() -> Self {
        Self {
            program: default_crontab_program(),
            list_args: default_list_args(),
            install_args: default_install_args(),
        }
    }
}

fn default_crontab_program() -> String {
    "crontab".to_string()
}

fn default_list_args() -> Vec<String> {
    vec!["-l".to_string()]
}

fn default_install_args() -> Vec<String> {
    vec!["-".to_string()]
}

/// Detached worker re-invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Flag that names the job id for the re-invoked program.
    #[serde(default = "default_worker_flag")]
    pub flag: String,

    /// Program to re-invoke. Defaults to the running executable.
    #[serde(default)]
    pub program: Option<PathBuf>,

    /// Extra arguments placed before the job flag.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            flag: default_worker_flag(),
            program: None,
            args: Vec::new(),
        }
    }
}

fn default_worker_flag() -> String {
    "--qor-job".to_string()
}

impl WorkerConfig {
    /// Worker program with `~` expanded, if one is configured.
    pub fn program_path(&self) -> Option<PathBuf> {
        self.program
            .as_ref()
            .map(|p| PathBuf::from(ConfigLoader::expand_path(&p.to_string_lossy())))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files. Console only when unset.
    #[serde(default)]
    pub dir: Option<String>,

    /// Number of rotated log files to keep.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
            max_files: default_max_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_files() -> usize {
    7
}

impl LoggingConfig {
    /// Log directory with `~` expanded.
    pub fn dir_path(&self) -> Option<PathBuf> {
        self.dir
            .as_deref()
            .map(|d| PathBuf::from(ConfigLoader::expand_path(d)))
    }
}

/// A job the host program knows how to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDefinition {
    /// Identifier written into the scheduler table.
    pub id: String,

    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,

    /// Shell command executed by the handler.
    pub command: String,

    /// Positional arguments passed to the command.
    #[serde(default)]
    pub args: Vec<String>,
}

impl JobDefinition {
    /// Name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".qorjob").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".qorjob/config.toml"))
}
