//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{AuthMethod, MAX_MIN_LIFETIME_SECS};
use crate::output::OutputFormat;

/// Fetch data from the CEDA archive
///
/// Keeps a short-lived X.509 certificate and a bearer download token
/// up to date, and uses them to download archive files.
///
/// Login details come from CEDA_USERNAME and CEDA_PASSWORD,
/// or from a prompt when --interactive is given.
#[derive(Parser, Debug)]
#[command(name = "cedafetch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Short-lived certificate management
    Cert(CertArgs),

    /// Download token management
    Token(TokenArgs),

    /// Download a file from the archive
    Download(DownloadArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Cert command
// ============================================================================

#[derive(Args, Debug)]
pub struct CertArgs {
    #[command(subcommand)]
    pub command: CertCommands,
}

#[derive(Subcommand, Debug)]
pub enum CertCommands {
    /// Make sure a valid certificate, trust roots and client config are on disk
    Setup {
        /// Fetch a new certificate even if the current one is valid
        #[arg(short, long)]
        force: bool,

        /// Prompt for username and password
        #[arg(short, long)]
        interactive: bool,
    },

    /// Show the validity of the stored certificate
    Check {
        /// Required remaining lifetime in seconds
        #[arg(
            short,
            long,
            default_value = "0",
            value_parser = clap::value_parser!(u64).range(..=MAX_MIN_LIFETIME_SECS)
        )]
        min_lifetime: u64,
    },
}

// ============================================================================
// Token command
// ============================================================================

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommands,
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// Return a usable download token, refreshing it if needed
    Get {
        /// Prompt for username and password
        #[arg(short, long)]
        interactive: bool,

        /// Print the full token instead of a masked one
        #[arg(long)]
        reveal: bool,
    },

    /// Delete the cached token
    Clear,
}

// ============================================================================
// Download command
// ============================================================================

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// URL of the archive file
    pub url: String,

    /// Authentication method (default from config, else token)
    #[arg(short, long, value_enum)]
    pub auth: Option<AuthMethod>,

    /// Destination file (default: last URL path segment in the current directory)
    #[arg(short = 'O', long)]
    pub out_file: Option<PathBuf>,

    /// Refresh the certificate before downloading
    #[arg(long)]
    pub force_refresh: bool,

    /// Prompt for username and password
    #[arg(short, long)]
    pub interactive: bool,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set ("none" clears optional keys)
        value: String,
    },

    /// Show config file path
    Path,
}
