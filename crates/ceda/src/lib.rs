//! Certificate and download-token access to the CEDA archive.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ceda::{CedaClient, CredentialManager, CredentialPaths, EnvCredentialProvider};
//!
//! #[tokio::main]
//! async fn main() -> ceda::Result<()> {
//!     let client = CedaClient::new()?;
//!     let manager = CredentialManager::new(
//!         client.clone(),
//!         CredentialPaths::from_home()?,
//!         EnvCredentialProvider::new(),
//!     );
//!
//!     // Bearer token flow
//!     let (token, _) = manager.get_or_refresh_token().await?;
//!     let bytes = client
//!         .data()
//!         .fetch("https://dap.ceda.ac.uk/badc/some/file.nc", Some(&token))
//!         .await?;
//!     println!("Fetched {} bytes", bytes.len());
//!
//!     // Certificate flow
//!     manager.ensure_certificate(false).await?;
//!     let cert_client = manager.certificate_client(CedaClient::builder()).await?;
//!     cert_client
//!         .data()
//!         .download("https://dap.ceda.ac.uk/badc/some/file.nc", None, "file.nc".as_ref())
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/ceda/0.1.0")]

// Re-export core types
pub use ceda_core::*;

// Re-export client
pub use ceda_client::{
    file_name_from_url, CedaClient, CedaClientBuilder, ServiceEndpoints, DEFAULT_CERTIFICATE_URL,
    DEFAULT_TOKEN_URL, DEFAULT_TRUSTROOTS_URL,
};

// Re-export credential management
pub use ceda_auth::{
    check_certificate, check_certificate_at, is_certificate_valid, CredentialManager,
    CredentialPaths, CredentialProvider, EnvCredentialProvider, TokenCache, TokenCacheState,
    PASSWORD_VAR, USERNAME_VAR,
};

// Re-export runtime for convenience
pub use tokio;
