//! Configuration validation.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_crontab(config, &mut result);
        Self::validate_worker(config, &mut result);
        Self::validate_logging(config, &mut result);
        Self::validate_jobs(config, &mut result);

        result
    }

    fn validate_crontab(config: &Config, result: &mut ValidationResult) {
        if config.crontab.program.trim().is_empty() {
            result.add_error(ValidationError::new(
                "crontab.program",
                "Scheduler table program cannot be empty",
            ));
        }

        if config.crontab.install_args.is_empty() {
            result.add_warning(ValidationWarning::new(
                "crontab.install_args",
                "No install arguments; most scheduler tools need '-' to read stdin",
            ));
        }
    }

    fn validate_worker(config: &Config, result: &mut ValidationResult) {
        if config.worker.flag.trim().is_empty() {
            result.add_error(ValidationError::new(
                "worker.flag",
                "Worker flag cannot be empty",
            ));
        }

        if let Some(program) = config.worker.program_path() {
            if !program.exists() {
                result.add_warning(ValidationWarning::new(
                    "worker.program",
                    format!("Worker program does not exist: {}", program.display()),
                ));
            }
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        if config.logging.dir.is_some() && config.logging.max_files == 0 {
            result.add_error(ValidationError::new(
                "logging.max_files",
                "max_files must be greater than 0 when a log directory is set",
            ));
        }
    }

    fn validate_jobs(config: &Config, result: &mut ValidationResult) {
        let mut seen = HashSet::new();

        for (index, job) in config.jobs.iter().enumerate() {
            if job.id.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("jobs[{}].id", index),
                    "Job id cannot be empty",
                ));
            } else if job.id.contains(['{', '\n', '\r']) {
                result.add_error(ValidationError::new(
                    format!("jobs[{}].id", index),
                    format!("Job id '{}' cannot contain '{{' or a line break", job.id.escape_debug()),
                ));
            } else if !seen.insert(job.id.as_str()) {
                result.add_error(ValidationError::new(
                    format!("jobs[{}].id", index),
                    format!("Duplicate job id '{}'", job.id),
                ));
            }

            if job.command.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("jobs[{}].command", index),
                    "Job command cannot be empty",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
