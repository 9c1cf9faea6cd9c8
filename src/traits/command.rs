use anyhow::{Context, Result};
use std::process::{Command, Output, Stdio};

/// Trait for executing external programs, allowing for mocking in tests
pub trait CommandExecutor: Send + Sync {
    /// Execute a program with arguments and capture its output
    fn execute(&self, command: &str, args: &[&str]) -> Result<Output>;
}

/// Real command executor using std::process::Command
pub struct RealCommandExecutor;

impl RealCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for RealCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<Output> {
        // Stdin is closed so the child can never block waiting on the operator
        let output = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .context("Failed to spawn process")?;

        Ok(output)
    }
}

/// Mock command executor for testing
#[cfg(test)]
pub struct MockCommandExecutor {
    /// Pre-configured outputs for commands
    outputs: std::sync::Mutex<Vec<MockCommandResult>>,
    /// Every invocation seen, in order
    invocations: std::sync::Mutex<Vec<MockInvocation>>,
}

#[cfg(test)]
#[derive(Clone, Debug)]
pub struct MockCommandResult {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// When set, the command fails to launch with this message
    pub launch_error: Option<String>,
}

#[cfg(test)]
impl MockCommandResult {
    pub fn exited(command: &str, exit_code: i32, stderr: &str) -> Self {
        Self {
            command: command.to_string(),
            exit_code,
            stdout: String::new(),
            stderr: stderr.to_string(),
            launch_error: None,
        }
    }

    pub fn launch_failure(command: &str, message: &str) -> Self {
        Self {
            command: command.to_string(),
            exit_code: -1,
            stdout: String::new(),
            stderr: String::new(),
            launch_error: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub struct MockInvocation {
    pub command: String,
    pub args: Vec<String>,
}

#[cfg(test)]
impl MockCommandExecutor {
    pub fn new() -> Self {
        Self {
            outputs: std::sync::Mutex::new(Vec::new()),
            invocations: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_outputs(outputs: Vec<MockCommandResult>) -> Self {
        Self {
            outputs: std::sync::Mutex::new(outputs),
            invocations: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn invocations(&self) -> Vec<MockInvocation> {
        self.invocations.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Default for MockCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl CommandExecutor for MockCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<Output> {
        self.invocations.lock().unwrap().push(MockInvocation {
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });

        let mut outputs = self.outputs.lock().unwrap();

        if let Some(result) = outputs.iter().position(|r| r.command == command) {
            let mock_result = outputs.remove(result);

            if let Some(message) = mock_result.launch_error {
                anyhow::bail!("Failed to launch '{}': {}", command, message);
            }

            return Ok(Output {
                status: create_exit_status(mock_result.exit_code),
                stdout: mock_result.stdout.into_bytes(),
                stderr: mock_result.stderr.into_bytes(),
            });
        }

        // Default: successful empty output
        Ok(Output {
            status: create_exit_status(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }
}

#[cfg(test)]
pub fn create_exit_status(code: i32) -> std::process::ExitStatus {
    // ExitStatus can't be constructed directly; from_raw takes a wait status on Unix
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        std::process::ExitStatus::from_raw((code & 0xff) << 8)
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_returns_configured_output() {
        let executor = MockCommandExecutor::with_outputs(vec![MockCommandResult {
            command: "test".to_string(),
            exit_code: 0,
            stdout: "success".to_string(),
            stderr: String::new(),
            launch_error: None,
        }]);

        let output = executor.execute("test", &[]).unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "success");
    }

    #[test]
    fn test_mock_executor_default_success() {
        let executor = MockCommandExecutor::new();
        let output = executor.execute("unknown", &[]).unwrap();
        assert!(output.status.success());
    }

    #[test]
    fn test_mock_executor_exit_code_roundtrips() {
        let executor =
            MockCommandExecutor::with_outputs(vec![MockCommandResult::exited("gh", 1, "boom")]);

        let output = executor.execute("gh", &["secret"]).unwrap();
        assert_eq!(output.status.code(), Some(1));
        assert_eq!(String::from_utf8_lossy(&output.stderr), "boom");
    }

    #[test]
    fn test_mock_executor_launch_failure() {
        let executor = MockCommandExecutor::with_outputs(vec![MockCommandResult::launch_failure(
            "gh",
            "not found",
        )]);

        let err = executor.execute("gh", &[]).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_mock_executor_records_invocations() {
        let executor = MockCommandExecutor::new();
        executor.execute("gh", &["secret", "set"]).unwrap();

        assert_eq!(
            executor.invocations(),
            vec![MockInvocation {
                command: "gh".to_string(),
                args: vec!["secret".to_string(), "set".to_string()],
            }]
        );
    }

    #[test]
    fn test_real_executor_missing_binary() {
        let executor = RealCommandExecutor::new();
        let result = executor.execute("provision-secret-no-such-binary", &[]);
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_real_executor_captures_exit_code() {
        let executor = RealCommandExecutor::new();

        let ok = executor.execute("true", &[]).unwrap();
        assert!(ok.status.success());

        let failed = executor.execute("false", &[]).unwrap();
        assert_eq!(failed.status.code(), Some(1));
    }
}
