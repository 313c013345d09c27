use clap::Parser;
use std::path::PathBuf;

use crate::domain::model::ProvisioningRequest;
use crate::utils::error::{ProvisionError, Result};

#[derive(Debug, Clone, Parser)]
#[command(name = "lb-bootstrap")]
#[command(about = "Configure HAProxy in front of the Kubernetes control plane and install its packages")]
pub struct CliConfig {
    /// Optional TOML settings file; built-in defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Print the configuration and the commands without changing the host
    #[arg(long)]
    pub dry_run: bool,

    /// <HAProxy_IP> <Master_Node_IPs>
    #[arg(value_name = "ADDRESSES", num_args = 0..)]
    pub addresses: Vec<String>,
}

impl CliConfig {
    /// The request when exactly two positional values were given.
    pub fn request(&self) -> Result<ProvisioningRequest> {
        match self.addresses.as_slice() {
            [frontend, backends] => ProvisioningRequest::parse(frontend, backends),
            _ => Err(ProvisionError::MissingConfigError {
                field: "<HAProxy_IP> <Master_Node_IPs>".to_string(),
            }),
        }
    }

    pub fn has_expected_arity(&self) -> bool {
        self.addresses.len() == 2
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <HAProxy_IP> <Master_Node_IPs>\nExample: {program} 10.0.1.84 '10.0.1.24,10.0.1.100'"
    )
}
