//! Secret handling for the provisioner.
//!
//! Covers the in-memory token, validation of the names it is registered
//! under, and the temp file it is staged in for the external CLI.

mod names;
mod staging;
mod value;

pub use names::{validate_repository, validate_secret_name};
pub use staging::{CleanupRegistry, StagedSecret};
pub use value::SecretValue;
