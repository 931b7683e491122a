//! Credential lifecycle management for the CEDA archive.
//!
//! Decides whether the existing short-lived certificate or cached download
//! token is still usable, and if not, fetches a new one and persists it.
//!
//! # Example
//!
//! ```rust,ignore
//! use ceda_auth::{CredentialManager, CredentialPaths, EnvCredentialProvider};
//! use ceda_client::CedaClient;
//!
//! #[tokio::main]
//! async fn main() -> ceda_core::Result<()> {
//!     let manager = CredentialManager::new(
//!         CedaClient::new()?,
//!         CredentialPaths::from_home()?,
//!         EnvCredentialProvider::new(),
//!     );
//!
//!     let (token, outcome) = manager.get_or_refresh_token().await?;
//!     println!("{outcome} token {} valid until {}", token.masked(), token.expires);
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/ceda-auth/0.1.0")]

mod certificate;
mod keygen;
mod manager;
mod paths;
mod provider;
mod store;
mod token_cache;

pub use certificate::{check_certificate, check_certificate_at, is_certificate_valid, read_validity};
pub use keygen::{generate_request, CertificateRequest};
pub use manager::CredentialManager;
pub use paths::CredentialPaths;
pub use provider::{CredentialProvider, EnvCredentialProvider, PASSWORD_VAR, USERNAME_VAR};
pub use token_cache::{TokenCache, TokenCacheState};
