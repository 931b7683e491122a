//! `cedafetch config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&key, &value),
        ConfigCommands::Path => show_path(),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Pretty => {
            let endpoints = config.endpoints();
            let paths = ctx.paths()?;
            let unset = || "(not set)".dimmed().to_string();

            println!("{}", "Current Configuration:".bold());
            println!();

            println!("  {} {}", "trustroots_url:".bold(), endpoints.trustroots);
            println!("  {} {}", "certificate_url:".bold(), endpoints.certificate);
            println!("  {} {}", "token_url:".bold(), endpoints.token);
            println!("  {} {}", "certs_dir:".bold(), paths.certs_dir.display());
            println!(
                "  {} {}",
                "dodsrc:".bold(),
                paths
                    .dodsrc
                    .as_ref()
                    .map_or_else(|| "(disabled)".dimmed().to_string(), |p| p.display().to_string())
            );
            println!("  {} {}", "cookie_jar:".bold(), paths.cookie_jar.display());
            println!("  {} {}", "token_cache:".bold(), paths.token_cache.display());
            println!(
                "  {} {}",
                "default_auth:".bold(),
                config.default_auth.unwrap_or_default()
            );
            println!(
                "  {} {}s",
                "token_min_lifetime:".bold(),
                config.token_min_lifetime_secs
            );
            println!(
                "  {} {}",
                "timeout:".bold(),
                config
                    .timeout_secs
                    .map_or_else(unset, |secs| format!("{secs}s"))
            );
            println!(
                "  {} {}",
                "output_format:".bold(),
                config.output_format.unwrap_or_default()
            );
        }
    }

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    let name = config.set(key, value)?;
    config.save()?;

    println!(
        "{} {} set to {}.",
        "Success:".green().bold(),
        name,
        value.cyan()
    );
    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}
