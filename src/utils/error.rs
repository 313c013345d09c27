use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to {action} config file {}: {source}", .path.display())]
    ConfigFileError {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error executing {command}: {source}")]
    CommandSpawnError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error executing {command}: {status}")]
    CommandFailedError { command: String, status: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required argument: {field}")]
    MissingConfigError { field: String },
}

/// Fatal errors stop the run with exit status 1, advisory ones are logged
/// and the run carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Advisory,
    Fatal,
}

impl ProvisionError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ProvisionError::CommandSpawnError { .. } | ProvisionError::CommandFailedError { .. } => {
                ErrorSeverity::Advisory
            }
            _ => ErrorSeverity::Fatal,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Advisory => 0,
            ErrorSeverity::Fatal => 1,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ProvisionError::ConfigFileError { action, path, .. } => {
                format!("Could not {} the HAProxy config at {}", action, path.display())
            }
            ProvisionError::CommandSpawnError { command, .. }
            | ProvisionError::CommandFailedError { command, .. } => {
                format!("Command did not succeed: {}", command)
            }
            ProvisionError::ConfigValidationError { field, .. }
            | ProvisionError::InvalidConfigValueError { field, .. } => {
                format!("Setting '{}' is not usable", field)
            }
            ProvisionError::MissingConfigError { field } => format!("'{}' is required", field),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ProvisionError::ConfigFileError { .. } | ProvisionError::IoError(_) => {
                "Check that the config directory exists and that the tool runs with write permission"
            }
            ProvisionError::CommandSpawnError { .. } => {
                "Make sure the program is installed and on PATH"
            }
            ProvisionError::CommandFailedError { .. } => {
                "Re-run the command by hand to see the full output"
            }
            ProvisionError::ConfigError { .. }
            | ProvisionError::ConfigValidationError { .. }
            | ProvisionError::InvalidConfigValueError { .. } => {
                "Fix the settings file and try again"
            }
            ProvisionError::MissingConfigError { .. } => {
                "Pass the frontend address and a comma separated backend list"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
