use std::cell::RefCell;

use crate::domain::model::CommandInvocation;
use crate::domain::ports::CommandRunner;
use crate::utils::error::Result;

/// Logs and records each command instead of executing it.
#[derive(Debug, Default)]
pub struct DryRunRunner {
    invocations: RefCell<Vec<CommandInvocation>>,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.invocations.borrow().clone()
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&self, invocation: &CommandInvocation) -> Result<()> {
        tracing::info!("🔍 Would run: {}", invocation);
        self.invocations.borrow_mut().push(invocation.clone());
        Ok(())
    }
}
