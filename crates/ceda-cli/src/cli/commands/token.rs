//! `cedafetch token` - download token management.

use anyhow::Result;
use ceda::TokenCache;
use chrono::Utc;
use colored::Colorize;
use serde_json::json;

use super::{explain, Context};
use crate::cli::args::{TokenArgs, TokenCommands};
use crate::output::{format_remaining, OutputFormat};

pub async fn execute(ctx: Context, args: TokenArgs) -> Result<()> {
    match args.command {
        TokenCommands::Get {
            interactive,
            reveal,
        } => get(ctx, interactive, reveal).await,
        TokenCommands::Clear => clear(&ctx).await,
    }
}

async fn get(ctx: Context, interactive: bool, reveal: bool) -> Result<()> {
    let manager = ctx.manager(interactive)?;
    let (token, outcome) = manager.get_or_refresh_token().await.map_err(explain)?;

    let shown = if reveal {
        token.access_token.clone()
    } else {
        token.masked()
    };
    let remaining = token.expires.with_timezone(&Utc) - Utc::now();

    match ctx.output_format {
        OutputFormat::Json => {
            let output = json!({
                "outcome": outcome,
                "access_token": shown,
                "expires": token.expires.to_rfc3339(),
                "remaining_secs": remaining.num_seconds(),
                "cache": manager.paths().token_cache,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Pretty => {
            let label = if outcome.is_refreshed() {
                "Obtained new download token"
            } else {
                "Using cached download token"
            };
            println!("{} {}", label.bold(), shown.yellow());
            println!(
                "  {} {} ({})",
                "expires:".bold(),
                token.expires.to_rfc3339(),
                format_remaining(remaining)
            );
        }
    }

    Ok(())
}

async fn clear(ctx: &Context) -> Result<()> {
    let paths = ctx.paths()?;
    TokenCache::new(&paths.token_cache).clear().await?;

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", json!({ "cleared": paths.token_cache }));
        }
        OutputFormat::Pretty => println!(
            "{} Removed {}",
            "Success:".green().bold(),
            paths.token_cache.display()
        ),
    }

    Ok(())
}
