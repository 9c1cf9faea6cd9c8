use std::fmt;

/// Error types for a single provisioning run
#[derive(Debug)]
pub enum ProvisionError {
    /// The operator supplied nothing but whitespace
    EmptyInput,

    /// Repository identifier or secret name failed validation
    InvalidConfig(String),

    /// The interactive prompt failed or was cancelled
    Prompt(String),

    /// Creating or writing the staged file failed
    Staging(std::io::Error),

    /// The external CLI could not be started
    Launch { program: String, message: String },

    /// The external CLI ran and exited unsuccessfully
    Delegation {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The staged file could not be removed
    Cleanup(std::io::Error),
}

impl fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionError::EmptyInput => write!(f, "No token provided"),
            ProvisionError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            ProvisionError::Prompt(msg) => write!(f, "Could not read the token: {}", msg),
            ProvisionError::Staging(err) => write!(f, "Could not stage the token: {}", err),
            ProvisionError::Launch { program, message } => {
                write!(f, "Could not run '{}': {}", program, message)
            }
            ProvisionError::Delegation { exit_code, stderr } => {
                match exit_code {
                    Some(code) => write!(f, "Failed to set the secret (exit code {})", code)?,
                    None => write!(f, "Failed to set the secret (terminated by signal)")?,
                }
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, "\nError: {}", stderr)?;
                }
                Ok(())
            }
            ProvisionError::Cleanup(err) => {
                write!(f, "Could not remove the staged token file: {}", err)
            }
        }
    }
}

impl std::error::Error for ProvisionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProvisionError::Staging(err) | ProvisionError::Cleanup(err) => Some(err),
            _ => None,
        }
    }
}
