use crate::domain::model::{ExistingFilePolicy, PackageSet};
use crate::utils::error::{ProvisionError, Result};
use crate::utils::validation::{
    validate_identifier, validate_path, validate_positive_number, validate_unique_names, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file contents. Every key is optional; the defaults describe a
/// Kubernetes API server load balancer on an apt based host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub haproxy: HaproxySettings,
    pub packages: PackageSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HaproxySettings {
    pub config_path: PathBuf,
    pub frontend_name: String,
    pub backend_name: String,
    pub server_prefix: String,
    pub frontend_port: u16,
    pub backend_port: u16,
    pub fall: u32,
    pub rise: u32,
    pub balance: String,
    pub service: String,
    pub use_sudo: bool,
    pub on_existing: ExistingFilePolicy,
}

impl Default for HaproxySettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("/etc/haproxy/haproxy.cfg"),
            frontend_name: "kubernetes-frontend".to_string(),
            backend_name: "kubernetes-backend".to_string(),
            server_prefix: "kmaster".to_string(),
            frontend_port: 6443,
            backend_port: 6443,
            fall: 3,
            rise: 2,
            balance: "roundrobin".to_string(),
            service: "haproxy".to_string(),
            use_sudo: true,
            on_existing: ExistingFilePolicy::Append,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageSettings {
    pub required: Vec<String>,
    pub manager: String,
    pub use_sudo: bool,
    /// Arguments for the index refresh, e.g. `["update", "-y"]`.
    pub update_args: Vec<String>,
    /// Arguments placed before the package name on install.
    pub install_args: Vec<String>,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            required: vec!["haproxy".to_string(), "keepalived".to_string()],
            manager: "apt-get".to_string(),
            use_sudo: true,
            update_args: vec!["update".to_string(), "-y".to_string()],
            install_args: vec!["install".to_string(), "-y".to_string()],
        }
    }
}

impl PackageSettings {
    pub fn package_set(&self) -> PackageSet {
        PackageSet::new(self.required.iter().cloned())
    }
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProvisionError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ProvisionError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ProvisionError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for HaproxySettings {
    fn validate(&self) -> Result<()> {
        validate_path("haproxy.config_path", &self.config_path.to_string_lossy())?;
        validate_identifier("haproxy.frontend_name", &self.frontend_name)?;
        validate_identifier("haproxy.backend_name", &self.backend_name)?;
        validate_identifier("haproxy.server_prefix", &self.server_prefix)?;
        validate_identifier("haproxy.balance", &self.balance)?;
        validate_identifier("haproxy.service", &self.service)?;
        validate_positive_number("haproxy.frontend_port", u32::from(self.frontend_port), 1)?;
        validate_positive_number("haproxy.backend_port", u32::from(self.backend_port), 1)?;
        validate_positive_number("haproxy.fall", self.fall, 1)?;
        validate_positive_number("haproxy.rise", self.rise, 1)?;
        Ok(())
    }
}

impl Validate for PackageSettings {
    fn validate(&self) -> Result<()> {
        validate_identifier("packages.manager", &self.manager)?;
        if self.install_args.is_empty() {
            return Err(ProvisionError::ConfigValidationError {
                field: "packages.install_args".to_string(),
                message: "The install subcommand is required".to_string(),
            });
        }
        validate_unique_names("packages.required", &self.required)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        self.haproxy.validate()?;
        self.packages.validate()
    }
}
