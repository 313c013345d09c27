pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{DryRunRunner, ShellPresenceProbe, SystemCommandRunner};
pub use config::{HaproxySettings, PackageSettings, Settings};
pub use crate::core::{
    config_writer::ConfigWriter, package_provisioner::PackageProvisioner, provision::Provisioner,
};
pub use domain::model::{CommandInvocation, ProvisionReport, ProvisioningRequest};
pub use domain::ports::{CommandRunner, PresenceProbe};
pub use utils::error::{ProvisionError, Result};
