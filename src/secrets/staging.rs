//! Transient on-disk staging for a secret value.
//!
//! The external CLI reads the token from a file so it never shows up in
//! process arguments. The file must be gone on every exit path: normal
//! return, error, panic unwinding, or an operator interrupt.

use super::SecretValue;
use crate::error::ProvisionError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::{Builder, NamedTempFile};

const STAGED_PREFIX: &str = "secret-";

/// Paths of staged files that still exist.
///
/// Shared with the interrupt handler, which cannot rely on destructors
/// because it exits the process directly.
#[derive(Clone, Default)]
pub struct CleanupRegistry {
    paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, path: &Path) {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_path_buf());
    }

    fn release(&self, path: &Path) {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|p| p != path);
    }

    #[cfg(test)]
    pub fn pending(&self) -> Vec<PathBuf> {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Delete every registered file, returning how many were removed
    pub fn purge(&self) -> usize {
        let mut paths = self.paths.lock().unwrap_or_else(PoisonError::into_inner);
        paths
            .drain(..)
            .filter(|path| std::fs::remove_file(path).is_ok())
            .count()
    }
}

/// A secret written to a uniquely named temp file.
///
/// Dropping the value deletes the file. Use [`StagedSecret::discard`] to
/// delete it explicitly and observe deletion errors.
pub struct StagedSecret {
    file: Option<NamedTempFile>,
    path: PathBuf,
    registry: CleanupRegistry,
}

impl StagedSecret {
    /// Write `secret` to a fresh file in `dir` (or the platform temp dir).
    ///
    /// On Unix the file is created with mode 0600.
    pub fn stage(
        secret: &SecretValue,
        dir: Option<&Path>,
        registry: &CleanupRegistry,
    ) -> Result<Self, ProvisionError> {
        let mut builder = Builder::new();
        builder.prefix(STAGED_PREFIX);

        let file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(ProvisionError::Staging)?;

        let path = file.path().to_path_buf();
        registry.register(&path);

        // Owned from here on, so a failed write still removes the file
        let mut staged = Self {
            file: Some(file),
            path,
            registry: registry.clone(),
        };

        if let Some(file) = staged.file.as_mut() {
            secret
                .use_secret(|value| {
                    file.write_all(value.as_bytes())?;
                    file.flush()
                })
                .map_err(ProvisionError::Staging)?;
        }

        Ok(staged)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The staged path as UTF-8, for passing on a command line
    pub fn path_str(&self) -> Result<&str, ProvisionError> {
        self.path.to_str().ok_or_else(|| {
            ProvisionError::Staging(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("staged file path is not valid UTF-8: {:?}", self.path),
            ))
        })
    }

    /// Delete the staged file now
    pub fn discard(mut self) -> Result<(), ProvisionError> {
        let result = match self.file.take() {
            Some(file) => file.close().map_err(ProvisionError::Cleanup),
            None => Ok(()),
        };
        self.registry.release(&self.path);
        result
    }
}

impl Drop for StagedSecret {
    fn drop(&mut self) {
        // NamedTempFile removes itself on drop
        self.file.take();
        self.registry.release(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn secret(value: &str) -> SecretValue {
        SecretValue::from_input(value.to_string()).unwrap()
    }

    #[test]
    fn test_stage_writes_value_into_dir() {
        let dir = TempDir::new().unwrap();
        let registry = CleanupRegistry::new();

        let staged = StagedSecret::stage(&secret("ghp_abc"), Some(dir.path()), &registry).unwrap();

        assert!(staged.path().starts_with(dir.path()));
        assert_eq!(std::fs::read_to_string(staged.path()).unwrap(), "ghp_abc");
        assert_eq!(registry.pending(), vec![staged.path().to_path_buf()]);

        let name = staged.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(STAGED_PREFIX));
    }

    #[test]
    fn test_discard_removes_file_and_registration() {
        let dir = TempDir::new().unwrap();
        let registry = CleanupRegistry::new();

        let staged = StagedSecret::stage(&secret("ghp_abc"), Some(dir.path()), &registry).unwrap();
        let path = staged.path().to_path_buf();
        staged.discard().unwrap();

        assert!(!path.exists());
        assert!(registry.pending().is_empty());
    }

    #[test]
    fn test_drop_removes_file() {
        let dir = TempDir::new().unwrap();
        let registry = CleanupRegistry::new();

        let path = {
            let staged =
                StagedSecret::stage(&secret("ghp_abc"), Some(dir.path()), &registry).unwrap();
            staged.path().to_path_buf()
        };

        assert!(!path.exists());
        assert!(registry.pending().is_empty());
    }

    #[test]
    fn test_drop_during_panic_removes_file() {
        let dir = TempDir::new().unwrap();
        let registry = CleanupRegistry::new();
        let staged_dir = dir.path().to_path_buf();
        let inner_registry = registry.clone();

        let result = std::panic::catch_unwind(move || {
            let _staged =
                StagedSecret::stage(&secret("ghp_abc"), Some(&staged_dir), &inner_registry)
                    .unwrap();
            panic!("delegation blew up");
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(registry.pending().is_empty());
    }

    #[test]
    fn test_stage_into_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let registry = CleanupRegistry::new();

        let result = StagedSecret::stage(&secret("ghp_abc"), Some(&missing), &registry);

        assert!(matches!(result, Err(ProvisionError::Staging(_))));
        assert!(registry.pending().is_empty());
    }

    #[test]
    fn test_purge_removes_pending_files() {
        let dir = TempDir::new().unwrap();
        let registry = CleanupRegistry::new();

        let staged = StagedSecret::stage(&secret("ghp_abc"), Some(dir.path()), &registry).unwrap();
        let path = staged.path().to_path_buf();

        assert_eq!(registry.purge(), 1);
        assert!(!path.exists());
        assert!(registry.pending().is_empty());

        // The guard still drops cleanly after the file is already gone
        drop(staged);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_path_is_a_staging_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let odd = dir.path().join(OsStr::from_bytes(b"stage-\xff"));
        std::fs::create_dir(&odd).unwrap();
        let registry = CleanupRegistry::new();

        let staged =
            StagedSecret::stage(&secret("ghp_abc"), Some(odd.as_path()), &registry).unwrap();
        assert!(matches!(staged.path_str(), Err(ProvisionError::Staging(_))));

        drop(staged);
        assert_eq!(std::fs::read_dir(&odd).unwrap().count(), 0);
    }

    #[test]
    fn test_path_str_matches_path() {
        let dir = TempDir::new().unwrap();
        let registry = CleanupRegistry::new();
        let staged =
            StagedSecret::stage(&secret("ghp_abc"), Some(dir.path()), &registry).unwrap();

        assert_eq!(Path::new(staged.path_str().unwrap()), staged.path());
    }

    #[cfg(unix)]
    #[test]
    fn test_staged_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let registry = CleanupRegistry::new();
        let staged = StagedSecret::stage(&secret("ghp_abc"), Some(dir.path()), &registry).unwrap();

        let mode = std::fs::metadata(staged.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
