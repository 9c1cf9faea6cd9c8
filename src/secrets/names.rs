//! Validation for the identifiers passed to the secret command.

use anyhow::Result;

const RESERVED_PREFIX: &str = "GITHUB_";

/// Validate a GitHub Actions secret name.
///
/// Only ASCII alphanumerics and underscores are allowed, the name may not
/// start with a digit, and the `GITHUB_` prefix is reserved.
pub fn validate_secret_name(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("Secret name cannot be empty");
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        anyhow::bail!("Secret name '{}' contains invalid character '{}'", name, bad);
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        anyhow::bail!("Secret name '{}' cannot start with a digit", name);
    }

    if name.to_ascii_uppercase().starts_with(RESERVED_PREFIX) {
        anyhow::bail!(
            "Secret name '{}' cannot start with the reserved prefix {}",
            name,
            RESERVED_PREFIX
        );
    }

    Ok(())
}

/// Validate a repository identifier of the form `owner/name`.
pub fn validate_repository(repository: &str) -> Result<()> {
    let Some((owner, name)) = repository.split_once('/') else {
        anyhow::bail!(
            "Repository '{}' must be in owner/name form",
            repository
        );
    };

    if owner.is_empty() || name.is_empty() || name.contains('/') {
        anyhow::bail!(
            "Repository '{}' must be in owner/name form",
            repository
        );
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    if !owner.chars().all(allowed) || !name.chars().all(allowed) {
        anyhow::bail!("Repository '{}' contains invalid characters", repository);
    }

    if name == "." || name == ".." {
        anyhow::bail!("Repository name cannot be '{}'", name);
    }

    Ok(())
}
