//! Sources of username/password.

use ceda_core::{CedaError, Credentials, Result};

/// Environment variable holding the archive username
pub const USERNAME_VAR: &str = "CEDA_USERNAME";

/// Environment variable holding the archive password
pub const PASSWORD_VAR: &str = "CEDA_PASSWORD";

/// Supplies login credentials when a credential has to be refreshed.
///
/// Only consulted on the refresh path, so a prompt is never shown while a
/// cached credential is still usable.
pub trait CredentialProvider: Send + Sync {
    /// Return the username/password, or [`CedaError::MissingCredentials`]
    fn credentials(&self) -> Result<Credentials>;
}

/// Fixed credentials, mostly for tests and embedding
impl CredentialProvider for Credentials {
    fn credentials(&self) -> Result<Credentials> {
        Ok(self.clone())
    }
}

/// Reads credentials from environment variables
#[derive(Debug, Clone)]
pub struct EnvCredentialProvider {
    username_var: String,
    password_var: String,
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvCredentialProvider {
    /// Use `CEDA_USERNAME` / `CEDA_PASSWORD`
    #[must_use]
    pub fn new() -> Self {
        Self::with_vars(USERNAME_VAR, PASSWORD_VAR)
    }

    /// Use custom variable names
    #[must_use]
    pub fn with_vars(username_var: impl Into<String>, password_var: impl Into<String>) -> Self {
        Self {
            username_var: username_var.into(),
            password_var: password_var.into(),
        }
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn credentials(&self) -> Result<Credentials> {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        match (read(&self.username_var), read(&self.password_var)) {
            (Some(username), Some(password)) => Ok(Credentials::new(username, password)),
            _ => Err(CedaError::MissingCredentials(format!(
                "please set {} and {} as environment variables",
                self.username_var, self.password_var
            ))),
        }
    }
}
