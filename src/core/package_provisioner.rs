use crate::config::toml_config::PackageSettings;
use crate::core::{CommandInvocation, CommandRunner, PresenceProbe};
use crate::domain::model::{PackageOutcome, PackageReport, PackageSet};

/// Makes sure the load balancer packages are installed. Every step is
/// best-effort: failures are logged and the next package is still tried.
pub struct PackageProvisioner<R: CommandRunner, P: PresenceProbe> {
    packages: PackageSet,
    manager: String,
    use_sudo: bool,
    update_args: Vec<String>,
    install_args: Vec<String>,
    runner: R,
    probe: P,
}

impl<R: CommandRunner, P: PresenceProbe> PackageProvisioner<R, P> {
    pub fn new(settings: &PackageSettings, runner: R, probe: P) -> Self {
        Self {
            packages: settings.package_set(),
            manager: settings.manager.clone(),
            use_sudo: settings.use_sudo,
            update_args: settings.update_args.clone(),
            install_args: settings.install_args.clone(),
            runner,
            probe,
        }
    }

    pub fn packages(&self) -> &PackageSet {
        &self.packages
    }

    /// Refreshes the package index. Returns whether the update command succeeded.
    pub fn refresh_index(&self) -> bool {
        let cmd = CommandInvocation::elevated(
            self.use_sudo,
            self.manager.as_str(),
            self.update_args.iter().map(String::as_str),
        );
        match self.runner.run(&cmd) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("❌ {}", e);
                false
            }
        }
    }

    pub fn ensure(&self, name: &str) -> PackageOutcome {
        if self.probe.is_available(name) {
            tracing::debug!("{} is already available, skipping install", name);
            return PackageOutcome::AlreadyPresent(name.to_string());
        }

        tracing::info!("Installing {}...", name);
        let args = self.install_args.iter().map(String::as_str).chain([name]);
        let cmd = CommandInvocation::elevated(self.use_sudo, self.manager.as_str(), args);
        match self.runner.run(&cmd) {
            Ok(()) => {
                tracing::info!("✅ {} installed", name);
                PackageOutcome::Installed(name.to_string())
            }
            Err(e) => {
                tracing::error!("❌ {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                PackageOutcome::Failed {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn ensure_all(&self) -> PackageReport {
        let index_refreshed = self.refresh_index();
        let packages = self.packages.iter().map(|name| self.ensure(name)).collect();

        PackageReport {
            index_refreshed,
            packages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::dry_run::DryRunRunner;

    struct Installed(&'static [&'static str]);

    impl PresenceProbe for Installed {
        fn is_available(&self, name: &str) -> bool {
            self.0.contains(&name)
        }
    }

    #[test]
    fn test_skips_packages_already_on_path() {
        let runner = DryRunRunner::new();
        let provisioner =
            PackageProvisioner::new(&PackageSettings::default(), &runner, Installed(&["haproxy"]));

        let report = provisioner.ensure_all();

        assert!(report.index_refreshed);
        assert_eq!(
            report.packages,
            [
                PackageOutcome::AlreadyPresent("haproxy".to_string()),
                PackageOutcome::Installed("keepalived".to_string()),
            ]
        );
        let commands: Vec<String> = runner.invocations().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            commands,
            ["sudo apt-get update -y", "sudo apt-get install -y keepalived"]
        );
    }

    #[test]
    fn test_package_manager_is_configurable() {
        let settings = PackageSettings {
            required: vec!["haproxy".to_string()],
            manager: "dnf".to_string(),
            use_sudo: false,
            ..PackageSettings::default()
        };
        let runner = DryRunRunner::new();
        PackageProvisioner::new(&settings, &runner, Installed(&[])).ensure_all();

        let commands: Vec<String> = runner.invocations().iter().map(|c| c.to_string()).collect();
        assert_eq!(commands, ["dnf update -y", "dnf install -y haproxy"]);
    }

    #[test]
    fn test_package_manager_args_are_configurable() {
        let settings = PackageSettings {
            required: vec!["haproxy".to_string()],
            manager: "zypper".to_string(),
            update_args: vec!["--non-interactive".to_string(), "refresh".to_string()],
            install_args: vec!["--non-interactive".to_string(), "install".to_string()],
            ..PackageSettings::default()
        };
        let runner = DryRunRunner::new();
        PackageProvisioner::new(&settings, &runner, Installed(&[])).ensure_all();

        let commands: Vec<String> = runner.invocations().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            commands,
            [
                "sudo zypper --non-interactive refresh",
                "sudo zypper --non-interactive install haproxy",
            ]
        );
    }
}
