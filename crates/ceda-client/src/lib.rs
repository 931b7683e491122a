//! HTTP client for the CEDA credential services and archive.
//!
//! This crate provides [`CedaClient`], which talks to the trust-root,
//! certificate-issuance and download-token services and fetches archive
//! files with either a bearer token or a client certificate.

#![doc(html_root_url = "https://docs.rs/ceda-client/0.1.0")]

mod client;
mod config;
pub mod api;

pub use api::file_name_from_url;
pub use client::{CedaClient, CedaClientBuilder};
pub use config::*;
pub use ceda_core::{CedaError, Result};
