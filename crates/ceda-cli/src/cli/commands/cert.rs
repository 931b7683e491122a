//! `cedafetch cert` - short-lived certificate management.

use anyhow::Result;
use ceda::{check_certificate, CertificateStatus, Outcome};
use chrono::Utc;
use colored::Colorize;
use serde_json::json;

use super::{explain, Context};
use crate::config::margin_from_secs;
use crate::cli::args::{CertArgs, CertCommands};
use crate::output::{format_remaining, OutputFormat};

pub async fn execute(ctx: Context, args: CertArgs) -> Result<()> {
    match args.command {
        CertCommands::Setup { force, interactive } => setup(ctx, force, interactive).await,
        CertCommands::Check { min_lifetime } => check(&ctx, min_lifetime),
    }
}

async fn setup(ctx: Context, force: bool, interactive: bool) -> Result<()> {
    let manager = ctx.manager(interactive)?;
    let outcome = manager.ensure_certificate(force).await.map_err(explain)?;
    let paths = manager.paths();

    match ctx.output_format {
        OutputFormat::Json => {
            let output = json!({
                "outcome": outcome,
                "credentials": paths.credentials,
                "trustroots": paths.trustroots_dir,
                "dodsrc": paths.dodsrc,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Pretty => {
            match outcome {
                Outcome::Reused => println!(
                    "{} Security credentials already set up.",
                    "Ok:".green().bold()
                ),
                Outcome::Refreshed => {
                    println!("{} Security credentials set up.", "Success:".green().bold());
                }
            }
            println!(
                "  {} {}",
                "credentials:".bold(),
                paths.credentials.display().to_string().cyan()
            );
            println!("  {} {}", "trust roots:".bold(), paths.trustroots_dir.display());
            if let Some(dodsrc) = &paths.dodsrc {
                println!("  {} {}", "client config:".bold(), dodsrc.display());
            }
        }
    }

    Ok(())
}

fn check(ctx: &Context, min_lifetime: u64) -> Result<()> {
    let paths = ctx.paths()?;
    let margin = margin_from_secs(min_lifetime);
    let status = check_certificate(&paths.credentials, margin);
    let remaining = status.validity().map(|v| v.remaining_at(Utc::now()));

    match ctx.output_format {
        OutputFormat::Json => {
            let output = json!({
                "path": paths.credentials,
                "min_lifetime_secs": min_lifetime,
                "remaining_secs": remaining.map(|r| r.num_seconds()),
                "certificate": status,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Pretty => {
            println!(
                "{} {}",
                "Certificate:".bold(),
                paths.credentials.display().to_string().cyan()
            );

            match &status {
                CertificateStatus::Valid { .. } => {
                    println!("  {} {}", "status:".bold(), "valid".green());
                }
                CertificateStatus::Invalid { reason, .. } => {
                    println!("  {} {}", "status:".bold(), "invalid".red());
                    println!("  {} {}", "reason:".bold(), reason);
                }
            }

            if let Some(validity) = status.validity() {
                println!("  {} {}", "not before:".bold(), validity.not_before.to_rfc3339());
                println!("  {} {}", "not after:".bold(), validity.not_after.to_rfc3339());
            }
            if let Some(remaining) = remaining {
                println!("  {} {}", "remaining:".bold(), format_remaining(remaining));
            }
            if !status.is_valid() {
                println!();
                println!("Run {} to obtain a new one.", "cedafetch cert setup".cyan());
            }
        }
    }

    Ok(())
}
