use crate::error::ProvisionError;
use crate::secrets::{validate_repository, validate_secret_name};
use std::path::PathBuf;

pub const DEFAULT_REPOSITORY: &str = "Avares-AI/focalboard";
pub const DEFAULT_SECRET_NAME: &str = "SCORECARD_READ_TOKEN";
pub const DEFAULT_GH_PROGRAM: &str = "gh";

/// Resolved settings for one provisioning run
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionConfig {
    /// Target repository in `owner/name` form
    pub repository: String,
    pub secret_name: String,
    /// Executable implementing `secret set`
    pub gh_program: String,
    /// Where the token is staged; `None` uses the platform temp dir
    pub temp_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl ProvisionConfig {
    pub fn new(repository: impl Into<String>, secret_name: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            secret_name: secret_name.into(),
            ..Self::default()
        }
    }

    pub fn with_gh_program(mut self, program: impl Into<String>) -> Self {
        self.gh_program = program.into();
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the repository identifier and secret name before anything runs
    pub fn validate(&self) -> Result<(), ProvisionError> {
        validate_repository(&self.repository)
            .map_err(|e| ProvisionError::InvalidConfig(e.to_string()))?;
        validate_secret_name(&self.secret_name)
            .map_err(|e| ProvisionError::InvalidConfig(e.to_string()))?;

        if self.gh_program.trim().is_empty() {
            return Err(ProvisionError::InvalidConfig(
                "secret command must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            secret_name: DEFAULT_SECRET_NAME.to_string(),
            gh_program: DEFAULT_GH_PROGRAM.to_string(),
            temp_dir: None,
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_scorecard_secret() {
        let config = ProvisionConfig::default();
        assert_eq!(config.repository, "Avares-AI/focalboard");
        assert_eq!(config.secret_name, "SCORECARD_READ_TOKEN");
        assert_eq!(config.gh_program, "gh");
        assert!(config.temp_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ProvisionConfig::new("octo/repo", "MY_TOKEN")
            .with_gh_program("/usr/local/bin/gh")
            .with_temp_dir("/tmp/staging")
            .with_verbose(true);

        assert_eq!(config.repository, "octo/repo");
        assert_eq!(config.secret_name, "MY_TOKEN");
        assert_eq!(config.gh_program, "/usr/local/bin/gh");
        assert_eq!(config.temp_dir, Some(PathBuf::from("/tmp/staging")));
        assert!(config.verbose);
    }

    #[test]
    fn test_validate_rejects_bad_repository() {
        let config = ProvisionConfig::new("no-slash", "MY_TOKEN");
        assert!(matches!(
            config.validate(),
            Err(ProvisionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_secret_name() {
        let config = ProvisionConfig::new("octo/repo", "GITHUB_TOKEN");
        assert!(matches!(
            config.validate(),
            Err(ProvisionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_program() {
        let config = ProvisionConfig::default().with_gh_program("  ");
        assert!(config.validate().is_err());
    }
}
