//! # ceda-cli
//!
//! Command-line interface for downloading CEDA archive data.
//!
//! ## Features
//!
//! - **Certificates**: set up and check short-lived X.509 credentials
//! - **Download tokens**: obtain, cache and inspect bearer tokens
//! - **Downloads**: fetch files with a token, a certificate, or anonymously
//! - **Multiple output formats**: pretty text or JSON

pub mod cli;
pub mod config;
pub mod output;
pub mod prompt;

pub use cli::run;
