use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::utils::error::{ProvisionError, Result};

/// Frontend address plus the ordered control-plane backends it fronts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    frontend_address: String,
    backend_addresses: Vec<String>,
}

impl ProvisioningRequest {
    /// Builds a request from the two command-line values. The backend list is
    /// split on commas; order and count are kept as given.
    pub fn parse(frontend: &str, backends_csv: &str) -> Result<Self> {
        let frontend_address = frontend.trim();
        if frontend_address.is_empty() {
            return Err(ProvisionError::MissingConfigError {
                field: "frontend address".to_string(),
            });
        }

        let backend_addresses: Vec<String> = backends_csv
            .split(',')
            .map(|entry| entry.trim().to_string())
            .collect();

        if let Some(position) = backend_addresses.iter().position(|b| b.is_empty()) {
            return Err(ProvisionError::InvalidConfigValueError {
                field: "backend addresses".to_string(),
                value: backends_csv.to_string(),
                reason: format!("entry {} is empty", position + 1),
            });
        }

        Ok(Self {
            frontend_address: frontend_address.to_string(),
            backend_addresses,
        })
    }

    pub fn frontend_address(&self) -> &str {
        &self.frontend_address
    }

    pub fn backend_addresses(&self) -> &[String] {
        &self.backend_addresses
    }
}

/// One external program execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandInvocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Runs `program` through `sudo` when `use_sudo` is set.
    pub fn elevated<I, S>(use_sudo: bool, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let program = program.into();
        if !use_sudo {
            return Self::new(program, args);
        }
        let mut all_args = vec![program];
        all_args.extend(args.into_iter().map(Into::into));
        Self::new("sudo", all_args)
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Ordered set of required package names; duplicates are dropped on build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSet(Vec<String>);

impl PackageSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut packages: Vec<String> = Vec::new();
        for name in names.into_iter().map(Into::into) {
            if !packages.contains(&name) {
                packages.push(name);
            }
        }
        Self(packages)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What to do when the HAProxy config file is already on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingFilePolicy {
    /// Keep the existing content and add the new stanzas after it.
    #[default]
    Append,
    /// Truncate the file and write only the new stanzas.
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOutcome {
    Created,
    Appended,
    Replaced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub path: PathBuf,
    pub config: ConfigOutcome,
    pub restarted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    AlreadyPresent(String),
    Installed(String),
    Failed { name: String, reason: String },
}

impl PackageOutcome {
    pub fn name(&self) -> &str {
        match self {
            PackageOutcome::AlreadyPresent(name) | PackageOutcome::Installed(name) => name,
            PackageOutcome::Failed { name, .. } => name,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PackageOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    pub index_refreshed: bool,
    pub packages: Vec<PackageOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub apply: ApplyOutcome,
    pub packages: PackageReport,
}

impl ProvisionReport {
    /// Number of advisory failures that were logged and skipped.
    pub fn advisory_failures(&self) -> usize {
        let restart = usize::from(!self.apply.restarted);
        let refresh = usize::from(!self.packages.index_refreshed);
        let installs = self.packages.packages.iter().filter(|p| p.is_failed()).count();
        restart + refresh + installs
    }
}
