//! Core types and errors shared by the CEDA credential crates.
//!
//! - **Types**: download tokens, certificate validity windows, login credentials
//!   and the reused/refreshed [`Outcome`] of a credential check
//! - **Errors**: the [`CedaError`] taxonomy used across the workspace
//!
//! # Example
//!
//! ```rust,ignore
//! use ceda_core::{DownloadToken, Result};
//!
//! fn announce(token: &DownloadToken) -> Result<()> {
//!     println!("Using download token '{}'", token.masked());
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/ceda-core/0.1.0")]

mod error;
pub mod types;

pub use error::{CedaError, Result};
pub use types::*;
