use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::config::toml_config::HaproxySettings;
use crate::core::{CommandInvocation, CommandRunner, ProvisioningRequest, Result};
use crate::domain::model::{ApplyOutcome, ConfigOutcome, ExistingFilePolicy};
use crate::utils::error::ProvisionError;

/// Writes the frontend/backend stanzas for the control-plane API port and
/// restarts HAProxy so they take effect.
pub struct ConfigWriter<R: CommandRunner> {
    settings: HaproxySettings,
    runner: R,
}

impl<R: CommandRunner> ConfigWriter<R> {
    pub fn new(settings: HaproxySettings, runner: R) -> Self {
        Self { settings, runner }
    }

    pub fn settings(&self) -> &HaproxySettings {
        &self.settings
    }

    /// Renders the configuration fragment for `request`. Servers are numbered
    /// from 1 in the order the backends were given.
    pub fn render(&self, request: &ProvisioningRequest) -> String {
        let s = &self.settings;
        let mut out = String::new();

        // writing into a String cannot fail
        let _ = writeln!(out, "frontend {}", s.frontend_name);
        let _ = writeln!(out, "    bind {}:{}", request.frontend_address(), s.frontend_port);
        let _ = writeln!(out, "    mode tcp");
        let _ = writeln!(out, "    option tcplog");
        let _ = writeln!(out, "    default_backend {}", s.backend_name);
        let _ = writeln!(out);
        let _ = writeln!(out, "backend {}", s.backend_name);
        let _ = writeln!(out, "    mode tcp");
        let _ = writeln!(out, "    balance {}", s.balance);
        for (i, backend) in request.backend_addresses().iter().enumerate() {
            let _ = writeln!(
                out,
                "    server {}{} {}:{} check fall {} rise {}",
                s.server_prefix,
                i + 1,
                backend,
                s.backend_port,
                s.fall,
                s.rise
            );
        }
        let _ = writeln!(out);
        out
    }

    /// Creates the config file, or adds to it when it already exists.
    pub fn write(&self, request: &ProvisioningRequest) -> Result<ConfigOutcome> {
        let path = self.settings.config_path.as_path();
        let (file, outcome) = self.open(path)?;

        let mut writer = BufWriter::new(file);
        writer
            .write_all(self.render(request).as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|source| ProvisionError::ConfigFileError {
                action: "write",
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(
            "HAProxy configuration has been updated ({} backends, {})",
            request.backend_addresses().len(),
            path.display()
        );
        Ok(outcome)
    }

    fn open(&self, path: &Path) -> Result<(File, ConfigOutcome)> {
        let exists = match std::fs::metadata(path) {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(source) => {
                return Err(ProvisionError::ConfigFileError {
                    action: "check",
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let (action, mut options, outcome) = match (exists, self.settings.on_existing) {
            (false, _) => ("create", OpenOptions::new(), ConfigOutcome::Created),
            (true, ExistingFilePolicy::Append) => {
                tracing::warn!(
                    "⚠️ Config file {} already exists; existing content is kept and the new stanzas are appended",
                    path.display()
                );
                ("open", OpenOptions::new(), ConfigOutcome::Appended)
            }
            (true, ExistingFilePolicy::Replace) => {
                tracing::warn!(
                    "⚠️ Config file {} already exists; replacing its content",
                    path.display()
                );
                ("open", OpenOptions::new(), ConfigOutcome::Replaced)
            }
        };

        match outcome {
            ConfigOutcome::Appended => options.append(true),
            ConfigOutcome::Created | ConfigOutcome::Replaced => {
                options.write(true).create(true).truncate(true)
            }
        };

        let file = options
            .open(path)
            .map_err(|source| ProvisionError::ConfigFileError {
                action,
                path: path.to_path_buf(),
                source,
            })?;
        Ok((file, outcome))
    }

    pub fn restart_service(&self) -> Result<()> {
        let cmd = CommandInvocation::elevated(
            self.settings.use_sudo,
            "systemctl",
            ["restart", self.settings.service.as_str()],
        );
        self.runner.run(&cmd)
    }

    /// Writes the configuration and restarts the service. Only file errors are
    /// returned; a failed restart is logged and reported in the outcome.
    pub fn apply(&self, request: &ProvisioningRequest) -> Result<ApplyOutcome> {
        let config = self.write(request)?;

        let restarted = match self.restart_service() {
            Ok(()) => {
                tracing::info!("{} has been restarted", self.settings.service);
                true
            }
            Err(e) => {
                tracing::error!("❌ {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                false
            }
        };

        Ok(ApplyOutcome {
            path: self.settings.config_path.clone(),
            config,
            restarted,
        })
    }
}
