use lb_bootstrap::domain::model::{ConfigOutcome, PackageOutcome};
use lb_bootstrap::{
    CommandInvocation, CommandRunner, ConfigWriter, HaproxySettings, PackageProvisioner,
    PackageSettings, PresenceProbe, ProvisionError, ProvisioningRequest, Provisioner, Result,
};
use std::cell::RefCell;
use std::collections::HashSet;
use tempfile::TempDir;

/// Records every command; commands whose rendering contains one of the
/// `failing` fragments report a non-zero exit.
#[derive(Default)]
struct RecordingRunner {
    calls: RefCell<Vec<String>>,
    failing: Vec<&'static str>,
}

impl RecordingRunner {
    fn failing(fragments: &[&'static str]) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            failing: fragments.to_vec(),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &CommandInvocation) -> Result<()> {
        let rendered = invocation.to_string();
        self.calls.borrow_mut().push(rendered.clone());
        if self.failing.iter().any(|f| rendered.contains(f)) {
            return Err(ProvisionError::CommandFailedError {
                command: rendered,
                status: "exit status: 100".to_string(),
            });
        }
        Ok(())
    }
}

struct FakePath(HashSet<&'static str>);

impl FakePath {
    fn with(names: &[&'static str]) -> Self {
        Self(names.iter().copied().collect())
    }
}

impl PresenceProbe for FakePath {
    fn is_available(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

#[test]
fn test_present_packages_are_never_installed() {
    let runner = RecordingRunner::default();
    let provisioner = PackageProvisioner::new(
        &PackageSettings::default(),
        &runner,
        FakePath::with(&["haproxy", "keepalived"]),
    );

    let report = provisioner.ensure_all();

    assert!(report.index_refreshed);
    assert!(report
        .packages
        .iter()
        .all(|p| matches!(p, PackageOutcome::AlreadyPresent(_))));
    assert_eq!(runner.calls(), ["sudo apt-get update -y"]);
}

#[test]
fn test_install_failure_does_not_stop_the_list() {
    let runner = RecordingRunner::failing(&["install -y haproxy"]);
    let provisioner =
        PackageProvisioner::new(&PackageSettings::default(), &runner, FakePath::with(&[]));

    let report = provisioner.ensure_all();

    assert_eq!(report.packages.len(), 2);
    assert!(report.packages[0].is_failed());
    assert_eq!(report.packages[0].name(), "haproxy");
    assert_eq!(
        report.packages[1],
        PackageOutcome::Installed("keepalived".to_string())
    );
    assert_eq!(
        runner.calls(),
        [
            "sudo apt-get update -y",
            "sudo apt-get install -y haproxy",
            "sudo apt-get install -y keepalived",
        ]
    );
}

#[test]
fn test_index_refresh_failure_is_advisory() {
    let runner = RecordingRunner::failing(&["update"]);
    let provisioner =
        PackageProvisioner::new(&PackageSettings::default(), &runner, FakePath::with(&["haproxy"]));

    let report = provisioner.ensure_all();

    assert!(!report.index_refreshed);
    assert_eq!(
        report.packages,
        [
            PackageOutcome::AlreadyPresent("haproxy".to_string()),
            PackageOutcome::Installed("keepalived".to_string()),
        ]
    );
}

#[test]
fn test_restart_failure_still_provisions_packages() {
    let temp_dir = TempDir::new().unwrap();
    let settings = HaproxySettings {
        config_path: temp_dir.path().join("haproxy.cfg"),
        ..HaproxySettings::default()
    };
    let runner = RecordingRunner::failing(&["systemctl restart"]);
    let writer = ConfigWriter::new(settings, &runner);
    let packages =
        PackageProvisioner::new(&PackageSettings::default(), &runner, FakePath::with(&[]));

    let request = ProvisioningRequest::parse("10.0.1.84", "10.0.1.24,10.0.1.100").unwrap();
    let report = Provisioner::new(writer, packages).run(&request).unwrap();

    assert_eq!(report.apply.config, ConfigOutcome::Created);
    assert!(!report.apply.restarted);
    assert_eq!(report.advisory_failures(), 1);
    assert_eq!(
        runner.calls(),
        [
            "sudo systemctl restart haproxy",
            "sudo apt-get update -y",
            "sudo apt-get install -y haproxy",
            "sudo apt-get install -y keepalived",
        ]
    );
}

#[test]
fn test_config_error_stops_before_packages() {
    let temp_dir = TempDir::new().unwrap();
    let settings = HaproxySettings {
        config_path: temp_dir.path().join("missing").join("haproxy.cfg"),
        ..HaproxySettings::default()
    };
    let runner = RecordingRunner::default();
    let writer = ConfigWriter::new(settings, &runner);
    let packages =
        PackageProvisioner::new(&PackageSettings::default(), &runner, FakePath::with(&[]));

    let request = ProvisioningRequest::parse("10.0.1.84", "10.0.1.24").unwrap();
    let err = Provisioner::new(writer, packages).run(&request).unwrap_err();

    assert_eq!(err.exit_code(), 1);
    assert!(runner.calls().is_empty());
}
