//! Driven port for generating credentials for newly hired users.
//!
//! Hashing and activation flows belong to the identity collaborator; this
//! port only hands the onboarding transaction something safe to store.

use crate::domain::{Error, IssuedCredentials};

#[cfg_attr(test, mockall::automock)]
pub trait CredentialIssuer: Send + Sync {
    /// Produce credentials for an account awaiting activation.
    fn issue(&self) -> Result<IssuedCredentials, Error>;
}
