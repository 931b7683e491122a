//! Interactive login prompt.

use ceda::{CedaError, CredentialProvider, Credentials, Result, USERNAME_VAR};
use dialoguer::{Input, Password};

/// Asks for the archive username and password on the terminal.
///
/// The username defaults to `CEDA_USERNAME` when set. The password is never echoed.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptCredentialProvider;

impl CredentialProvider for PromptCredentialProvider {
    fn credentials(&self) -> Result<Credentials> {
        let mut input = Input::<String>::new().with_prompt("CEDA username");
        if let Ok(default) = std::env::var(USERNAME_VAR) {
            if !default.is_empty() {
                input = input.default(default);
            }
        }

        let username = input
            .interact_text()
            .map_err(|e| CedaError::MissingCredentials(format!("could not read username: {e}")))?;

        let password = Password::new()
            .with_prompt("CEDA password")
            .interact()
            .map_err(|e| CedaError::MissingCredentials(format!("could not read password: {e}")))?;

        Ok(Credentials::new(username.trim(), password))
    }
}
