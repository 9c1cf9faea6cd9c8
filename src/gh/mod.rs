//! Boundary to the GitHub CLI.
//!
//! Only `gh secret set` is used. The token is always passed by file path,
//! never as an argument.

use crate::traits::CommandExecutor;
use anyhow::Result;
use std::process::Output;

/// Captured result of an external command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

impl From<Output> for CommandResult {
    fn from(output: Output) -> Self {
        Self {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Thin wrapper that shapes `gh` invocations
pub struct GhCli<'a> {
    executor: &'a dyn CommandExecutor,
    program: &'a str,
}

impl<'a> GhCli<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, program: &'a str) -> Self {
        Self { executor, program }
    }

    pub fn program(&self) -> &str {
        self.program
    }

    /// Arguments for registering `secret_name` from `file` against `repository`
    pub fn set_secret_args<'b>(
        secret_name: &'b str,
        file: &'b str,
        repository: &'b str,
    ) -> [&'b str; 7] {
        ["secret", "set", secret_name, "-f", file, "-R", repository]
    }

    /// Register the contents of `file` as `secret_name` on `repository`.
    ///
    /// Returns an error only when the program could not be launched; a
    /// non-zero exit is reported through [`CommandResult::exit_code`].
    pub fn set_secret(
        &self,
        secret_name: &str,
        file: &str,
        repository: &str,
    ) -> Result<CommandResult> {
        let args = Self::set_secret_args(secret_name, file, repository);
        let output = self.executor.execute(self.program, &args)?;

        Ok(CommandResult::from(output))
    }
}
