use std::process::{Command, Stdio};

use crate::domain::model::CommandInvocation;
use crate::domain::ports::{CommandRunner, PresenceProbe};
use crate::utils::error::{ProvisionError, Result};

/// Runs commands on the local host. Output goes straight to the caller's
/// stdout/stderr so operators see the tools' own progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, invocation: &CommandInvocation) -> Result<()> {
        tracing::debug!("Running: {}", invocation);

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ProvisionError::CommandSpawnError {
                command: invocation.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ProvisionError::CommandFailedError {
                command: invocation.to_string(),
                status: status.to_string(),
            })
        }
    }
}

/// `command -v` through `sh`, since `command` is a shell builtin.
#[derive(Debug, Clone)]
pub struct ShellPresenceProbe {
    shell: String,
}

impl ShellPresenceProbe {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellPresenceProbe {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl PresenceProbe for ShellPresenceProbe {
    fn is_available(&self, name: &str) -> bool {
        // the name is passed as $1, never spliced into the script
        let status = Command::new(&self.shell)
            .args(["-c", "command -v \"$1\"", "sh", name])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => status.success(),
            Err(e) => {
                tracing::warn!("⚠️ Could not probe for {}: {}", name, e);
                false
            }
        }
    }
}
