//! Command implementations.

pub mod cert;
pub mod config;
pub mod download;
pub mod token;

use std::time::Duration;

use ceda::{
    CedaClient, CedaClientBuilder, CedaError, CredentialManager, CredentialPaths,
    EnvCredentialProvider,
};

use crate::config::Config;
use crate::output::OutputFormat;
use crate::prompt::PromptCredentialProvider;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration
    pub config: Config,

    /// Output format
    pub output_format: OutputFormat,
}

impl Context {
    /// Client builder with configured endpoints and timeout.
    pub fn client_builder(&self) -> CedaClientBuilder {
        let mut builder = CedaClient::builder().endpoints(self.config.endpoints());
        if let Some(secs) = self.config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
    }

    /// Create a client for the credential services and anonymous downloads.
    pub fn client(&self) -> anyhow::Result<CedaClient> {
        Ok(self.client_builder().build()?)
    }

    /// Configured credential locations.
    pub fn paths(&self) -> anyhow::Result<CredentialPaths> {
        self.config.credential_paths()
    }

    /// Credential manager reading logins from the environment, or from a
    /// prompt when `interactive` is set.
    pub fn manager(&self, interactive: bool) -> anyhow::Result<CredentialManager> {
        let client = self.client()?;
        let paths = self.paths()?;

        let manager = if interactive {
            CredentialManager::new(client, paths, PromptCredentialProvider)
        } else {
            CredentialManager::new(client, paths, EnvCredentialProvider::new())
        };

        Ok(manager.token_min_lifetime(self.config.token_min_lifetime()))
    }
}

/// Turn a library error into a CLI error with a hint for the common cases.
pub(crate) fn explain(err: CedaError) -> anyhow::Error {
    let hint = match &err {
        CedaError::MissingCredentials(_) => Some(
            "Provide your CEDA login with one of:\n  \
             1. CEDA_USERNAME and CEDA_PASSWORD environment variables\n  \
             2. --interactive to be prompted",
        ),
        CedaError::Download {
            status: 401 | 403, ..
        } => Some("The archive refused the request. Check that your account has access to this dataset."),
        _ if err.is_auth_error() => Some("Check your CEDA username and password."),
        _ => None,
    };

    match hint {
        Some(hint) => anyhow::anyhow!("{err}\n\n{hint}"),
        None => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builds_client_from_config() {
        let ctx = Context {
            config: Config {
                token_url: Some("http://127.0.0.1:9/api/token/create/".into()),
                timeout_secs: Some(5),
                ..Config::default()
            },
            output_format: OutputFormat::Json,
        };

        let client = ctx.client().unwrap();
        assert_eq!(client.endpoints().token, "http://127.0.0.1:9/api/token/create/");
        assert!(!client.presents_identity());
    }

    #[test]
    fn test_explain_adds_hints() {
        let missing = explain(CedaError::MissingCredentials("no login".into())).to_string();
        assert!(missing.contains("--interactive"));

        let refused = explain(CedaError::Download {
            status: 403,
            url: "https://dap.ceda.ac.uk/x.nc".into(),
        })
        .to_string();
        assert!(refused.contains("access to this dataset"));

        let plain = explain(CedaError::Http("connection reset".into())).to_string();
        assert!(!plain.contains("\n\n"));
    }
}
