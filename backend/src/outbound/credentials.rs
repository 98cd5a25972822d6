//! Default credential issuer for newly onboarded users.
//!
//! The stored password is a non-verifiable marker: no password hash can
//! ever match it, so the account cannot be used until the identity
//! collaborator runs its activation flow and replaces it.

use rand::RngCore;
use rand::rngs::OsRng;

use crate::domain::ports::CredentialIssuer;
use crate::domain::{Error, IssuedCredentials};

/// Prefix marking a password column that holds no usable hash.
pub const PENDING_ACTIVATION_PREFIX: &str = "!pending-activation:";

const TOTP_SECRET_BYTES: usize = 20;
const ACTIVATION_NONCE_BYTES: usize = 16;

/// Issues random TOTP secrets and pending-activation password markers.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCredentialIssuer;

impl RandomCredentialIssuer {
    pub fn new() -> Self {
        Self
    }
}

fn random_hex<const N: usize>() -> Result<String, Error> {
    let mut bytes = [0_u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|err| Error::internal(format!("entropy source unavailable: {err}")))?;
    Ok(hex::encode(bytes))
}

impl CredentialIssuer for RandomCredentialIssuer {
    fn issue(&self) -> Result<IssuedCredentials, Error> {
        let nonce = random_hex::<ACTIVATION_NONCE_BYTES>()?;
        let totp_secret = random_hex::<TOTP_SECRET_BYTES>()?;
        Ok(IssuedCredentials::new(
            format!("{PENDING_ACTIVATION_PREFIX}{nonce}"),
            totp_secret,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn issues_marker_password_and_hex_secret() {
        let credentials = RandomCredentialIssuer::new().issue().expect("credentials");

        assert!(credentials.password().starts_with(PENDING_ACTIVATION_PREFIX));
        assert_eq!(credentials.totp_secret_key().len(), TOTP_SECRET_BYTES * 2);
        assert!(
            credentials
                .totp_secret_key()
                .chars()
                .all(|c| c.is_ascii_hexdigit())
        );
    }

    #[rstest]
    fn every_issue_is_fresh() {
        let issuer = RandomCredentialIssuer::new();
        let first = issuer.issue().expect("first");
        let second = issuer.issue().expect("second");
        assert_ne!(first.totp_secret_key(), second.totp_secret_key());
    }
}
