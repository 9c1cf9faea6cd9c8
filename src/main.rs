mod commands;
mod config;
mod context;
mod error;
mod gh;
mod output;
mod secrets;
mod traits;

use clap::Parser;
use commands::ProvisionCommand;
use config::{DEFAULT_GH_PROGRAM, DEFAULT_REPOSITORY, DEFAULT_SECRET_NAME, ProvisionConfig};
use context::Context;
use std::path::PathBuf;
use std::process::ExitCode;

/// Conventional exit status for SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Parser)]
#[command(name = "provision-secret")]
#[command(about = "Prompt for a GitHub token and register it as a repository secret", long_about = None)]
#[command(version)]
struct Cli {
    /// Target repository in owner/name form
    #[arg(short = 'R', long = "repo", default_value = DEFAULT_REPOSITORY)]
    repository: String,

    /// Name of the secret to set
    #[arg(short = 'n', long, default_value = DEFAULT_SECRET_NAME)]
    secret_name: String,

    /// GitHub CLI executable used to set the secret
    #[arg(long = "gh-bin", default_value = DEFAULT_GH_PROGRAM)]
    gh_bin: String,

    /// Directory to stage the token in (defaults to the system temp directory)
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Print diagnostic details (the token itself is never printed)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> ProvisionConfig {
        let config = ProvisionConfig::new(self.repository, self.secret_name)
            .with_gh_program(self.gh_bin)
            .with_verbose(self.verbose);

        match self.temp_dir {
            Some(dir) => config.with_temp_dir(dir),
            None => config,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let ctx = Context::new();

    install_interrupt_cleanup(&ctx);

    let status = ProvisionCommand::run(&ctx, &cli.into_config());
    ExitCode::from(status.exit_code())
}

/// Remove any staged token if the operator interrupts a running command
fn install_interrupt_cleanup(ctx: &Context) {
    let registry = ctx.cleanup.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        registry.purge();
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }) {
        ctx.output
            .warning(&format!("Could not install interrupt handler: {}", e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_uses_fixed_target() {
        let cli = Cli::try_parse_from(["provision-secret"]).unwrap();
        assert_eq!(cli.into_config(), ProvisionConfig::default());
    }

    #[test]
    fn test_flags_override_target() {
        let cli = Cli::try_parse_from([
            "provision-secret",
            "-R",
            "octo/repo",
            "--secret-name",
            "DEPLOY_TOKEN",
            "--gh-bin",
            "/opt/gh",
            "--temp-dir",
            "/tmp/stage",
            "-v",
        ])
        .unwrap();

        let config = cli.into_config();
        assert_eq!(config.repository, "octo/repo");
        assert_eq!(config.secret_name, "DEPLOY_TOKEN");
        assert_eq!(config.gh_program, "/opt/gh");
        assert_eq!(config.temp_dir, Some(PathBuf::from("/tmp/stage")));
        assert!(config.verbose);
    }

    #[test]
    fn test_rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["provision-secret", "extra"]).is_err());
    }
}
