// Adapters layer: concrete implementations of the domain ports for the local host.

pub mod dry_run;
pub mod system;

pub use dry_run::DryRunRunner;
pub use system::{ShellPresenceProbe, SystemCommandRunner};
