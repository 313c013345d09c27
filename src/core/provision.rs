use crate::core::config_writer::ConfigWriter;
use crate::core::package_provisioner::PackageProvisioner;
use crate::core::{CommandRunner, PresenceProbe, ProvisioningRequest, Result};
use crate::domain::model::ProvisionReport;

/// Runs the two provisioning steps in order: HAProxy configuration first,
/// then the package check.
pub struct Provisioner<R: CommandRunner, P: PresenceProbe> {
    writer: ConfigWriter<R>,
    packages: PackageProvisioner<R, P>,
}

impl<R: CommandRunner, P: PresenceProbe> Provisioner<R, P> {
    pub fn new(writer: ConfigWriter<R>, packages: PackageProvisioner<R, P>) -> Self {
        Self { writer, packages }
    }

    pub fn run(&self, request: &ProvisioningRequest) -> Result<ProvisionReport> {
        tracing::info!(
            "Configuring HAProxy on {} for {} backend(s)",
            request.frontend_address(),
            request.backend_addresses().len()
        );
        let apply = self.writer.apply(request)?;

        tracing::info!("Checking required packages ({})", self.packages.packages().len());
        let packages = self.packages.ensure_all();

        Ok(ProvisionReport { apply, packages })
    }
}
