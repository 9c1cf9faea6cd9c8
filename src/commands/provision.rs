use crate::config::{DEFAULT_SECRET_NAME, ProvisionConfig};
use crate::context::Context;
use crate::error::ProvisionError;
use crate::gh::GhCli;
use crate::secrets::{SecretValue, StagedSecret};

const TOKEN_URL: &str = "https://github.com/settings/tokens/new";
const TOKEN_PROMPT: &str = "Paste your GitHub token here (it will not be displayed):";

/// Final outcome of a provisioning run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStatus {
    Success,
    Failure,
}

impl ProvisionStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            ProvisionStatus::Success => 0,
            ProvisionStatus::Failure => 1,
        }
    }
}

/// Handles provisioning a repository secret from operator input
pub struct ProvisionCommand;

impl ProvisionCommand {
    /// Run the whole flow and report any failure to the operator
    pub fn run(ctx: &Context, config: &ProvisionConfig) -> ProvisionStatus {
        match Self::execute(ctx, config) {
            Ok(()) => ProvisionStatus::Success,
            Err(err) => {
                ctx.output.blank();
                ctx.output.error(&err.to_string());
                ProvisionStatus::Failure
            }
        }
    }

    /// Prompt, stage, delegate and clean up.
    ///
    /// The staged file is removed before this returns, whatever the outcome.
    pub fn execute(ctx: &Context, config: &ProvisionConfig) -> Result<(), ProvisionError> {
        config.validate()?;

        Self::print_instructions(ctx, config);

        let secret = Self::read_secret(ctx)?;

        if config.verbose {
            ctx.output.dimmed("Received token");
        }

        let staged = StagedSecret::stage(&secret, config.temp_dir.as_deref(), &ctx.cleanup)?;
        drop(secret);
        let staged_path = staged.path_str()?;

        ctx.output.blank();
        ctx.output.info(&format!(
            "Setting {} for {}...",
            config.secret_name, config.repository
        ));

        let gh = GhCli::new(&*ctx.command, &config.gh_program);

        if config.verbose {
            ctx.output
                .dimmed(&format!("Staged token at {}", staged.path().display()));
            ctx.output.dimmed(&format!(
                "Running: {} secret set {} -f {} -R {}",
                gh.program(),
                config.secret_name,
                staged_path,
                config.repository
            ));
        }

        let delegated = gh
            .set_secret(&config.secret_name, staged_path, &config.repository)
            .map_err(|e| ProvisionError::Launch {
                program: config.gh_program.clone(),
                message: format!("{:#}", e),
            })
            .and_then(|result| {
                if result.success() {
                    Ok(result)
                } else {
                    Err(ProvisionError::Delegation {
                        exit_code: result.exit_code,
                        stderr: result.stderr,
                    })
                }
            });

        let cleanup = staged.discard();

        let result = match (delegated, cleanup) {
            (Ok(result), Ok(())) => result,
            (Ok(_), Err(cleanup_err)) => return Err(cleanup_err),
            (Err(err), Ok(())) => return Err(err),
            (Err(err), Err(cleanup_err)) => {
                ctx.output.warning(&cleanup_err.to_string());
                return Err(err);
            }
        };

        if config.verbose && !result.stdout.trim().is_empty() {
            ctx.output.dimmed(result.stdout.trim());
        }

        ctx.output.blank();
        ctx.output.success(&format!(
            "Success! {} has been set.",
            config.secret_name
        ));
        ctx.output.dimmed(&Self::follow_up_hint(config));

        Ok(())
    }

    fn print_instructions(ctx: &Context, config: &ProvisionConfig) {
        ctx.output.section(&format!("{} Setup", config.secret_name));
        ctx.output.info(&format!(
            "This will help you create {} and set it as a GitHub Actions secret",
            config.secret_name
        ));
        ctx.output.key_value("Repository", &config.repository);
        ctx.output.blank();

        ctx.output.step(1, &format!("Visit: {}", TOKEN_URL));
        ctx.output
            .step(2, "Enter a note like 'Scorecard Read-Only Token'");
        ctx.output.step(3, "Select ONLY the 'public_repo' scope");
        ctx.output.step(4, "Click 'Generate token'");
        ctx.output.step(5, "Copy the generated token");
        ctx.output.blank();
    }

    fn read_secret(ctx: &Context) -> Result<SecretValue, ProvisionError> {
        let raw = ctx
            .input
            .password(TOKEN_PROMPT)
            .map_err(|e| ProvisionError::Prompt(format!("{:#}", e)))?;

        SecretValue::from_input(raw)
    }

    fn follow_up_hint(config: &ProvisionConfig) -> String {
        if config.secret_name == DEFAULT_SECRET_NAME {
            "The Scorecards workflow should now pass on future runs.".to_string()
        } else {
            format!(
                "Workflows in {} can now reference secrets.{}",
                config.repository, config.secret_name
            )
        }
    }
}
