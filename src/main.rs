use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use lb_bootstrap::config::cli::usage;
use lb_bootstrap::domain::model::{ConfigOutcome, PackageOutcome, ProvisionReport};
use lb_bootstrap::utils::{logger, validation::Validate};
use lb_bootstrap::{
    CliConfig, ConfigWriter, DryRunRunner, PackageProvisioner, ProvisionError, ProvisioningRequest,
    Provisioner, Settings, ShellPresenceProbe, SystemCommandRunner,
};

fn main() {
    // 參數不對時只印用法，不碰檔案系統
    let config = match CliConfig::try_parse() {
        Ok(config) if config.has_expected_arity() => config,
        Ok(_) => exit_with_usage(),
        Err(e) => {
            if !matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                eprintln!("{}", e);
            }
            exit_with_usage()
        }
    };

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting lb-bootstrap");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let settings = match load_settings(&config) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    };

    let request = match config.request() {
        Ok(request) => request,
        Err(e) => fail(e),
    };

    if config.dry_run {
        dry_run(&settings, &request);
        return;
    }

    let runner = SystemCommandRunner;
    let writer = ConfigWriter::new(settings.haproxy.clone(), &runner);
    let packages = PackageProvisioner::new(&settings.packages, &runner, ShellPresenceProbe::default());

    match Provisioner::new(writer, packages).run(&request) {
        Ok(report) => log_report(&report),
        Err(e) => fail(e),
    }
}

fn load_settings(config: &CliConfig) -> anyhow::Result<Settings> {
    let settings = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading settings from: {}", path.display());
            Settings::from_file(path)
                .with_context(|| format!("Failed to load settings file '{}'", path.display()))?
        }
        None => Settings::default(),
    };

    settings.validate().context("Settings validation failed")?;
    Ok(settings)
}

fn dry_run(settings: &Settings, request: &ProvisioningRequest) {
    tracing::info!("🔍 DRY RUN MODE - nothing on this host will be changed");

    let runner = DryRunRunner::new();
    let writer = ConfigWriter::new(settings.haproxy.clone(), &runner);
    println!("# {}", writer.settings().config_path.display());
    print!("{}", writer.render(request));

    if let Err(e) = writer.restart_service() {
        tracing::error!("❌ {}", e);
    }
    PackageProvisioner::new(&settings.packages, &runner, ShellPresenceProbe::default()).ensure_all();

    tracing::info!("🔍 {} command(s) would run", runner.invocations().len());
}

fn log_report(report: &ProvisionReport) {
    let action = match report.apply.config {
        ConfigOutcome::Created => "created",
        ConfigOutcome::Appended => "appended to",
        ConfigOutcome::Replaced => "replaced",
    };
    tracing::info!("📁 Config {} {}", action, report.apply.path.display());

    for package in &report.packages.packages {
        match package {
            PackageOutcome::AlreadyPresent(name) => tracing::info!("{}: already present", name),
            PackageOutcome::Installed(name) => tracing::info!("{}: installed", name),
            PackageOutcome::Failed { name, reason } => {
                tracing::warn!("⚠️ {}: not installed ({})", name, reason)
            }
        }
    }

    match report.advisory_failures() {
        0 => tracing::info!("✅ Provisioning completed successfully!"),
        n => tracing::warn!("⚠️ Provisioning completed with {} advisory failure(s)", n),
    }
}

fn exit_with_usage() -> ! {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "lb-bootstrap".to_string());
    println!("{}", usage(&program));
    std::process::exit(1);
}

fn fail(e: ProvisionError) -> ! {
    tracing::error!("❌ {} (Severity: {:?})", e, e.severity());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(e.exit_code().max(1));
}
