use crate::domain::model::CommandInvocation;
use crate::utils::error::Result;

/// Runs one external program to completion. Implementations report the
/// outcome and leave the fatal/advisory decision to the caller.
pub trait CommandRunner {
    fn run(&self, invocation: &CommandInvocation) -> Result<()>;
}

/// Answers whether an executable with the given name is already on PATH.
pub trait PresenceProbe {
    fn is_available(&self, name: &str) -> bool;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, invocation: &CommandInvocation) -> Result<()> {
        (**self).run(invocation)
    }
}

impl<T: PresenceProbe + ?Sized> PresenceProbe for &T {
    fn is_available(&self, name: &str) -> bool {
        (**self).is_available(name)
    }
}
