pub mod config_writer;
pub mod package_provisioner;
pub mod provision;

pub use crate::domain::model::{CommandInvocation, ProvisioningRequest};
pub use crate::domain::ports::{CommandRunner, PresenceProbe};
pub use crate::utils::error::Result;
