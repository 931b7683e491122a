//! `cedafetch download` - fetch an archive file.

use std::path::PathBuf;

use anyhow::Result;
use ceda::{file_name_from_url, CedaClient, DownloadToken};
use colored::Colorize;
use serde_json::json;

use super::{explain, Context};
use crate::cli::args::DownloadArgs;
use crate::config::AuthMethod;
use crate::output::{spinner, OutputFormat};

pub async fn execute(ctx: Context, args: DownloadArgs) -> Result<()> {
    let auth = args.auth.or(ctx.config.default_auth).unwrap_or_default();
    let dest = match args.out_file {
        Some(path) => path,
        None => PathBuf::from(file_name_from_url(&args.url)?),
    };
    let pretty = ctx.output_format == OutputFormat::Pretty;

    if pretty {
        println!("Fetching {}", format!("'{}'", args.url).cyan());
    }

    let (client, token) = authenticate(&ctx, auth, args.interactive, args.force_refresh).await?;

    if let (true, Some(token)) = (pretty, &token) {
        println!("  {} {}", "token:".bold(), token.masked().yellow());
    }

    let bar = if pretty {
        spinner(format!("Downloading to {}", dest.display()))
    } else {
        indicatif::ProgressBar::hidden()
    };
    let result = client.data().download(&args.url, token.as_ref(), &dest).await;
    bar.finish_and_clear();
    let bytes = result.map_err(explain)?;

    match ctx.output_format {
        OutputFormat::Json => {
            let output = json!({
                "url": args.url,
                "auth": auth,
                "path": dest,
                "bytes": bytes,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Pretty => println!(
            "{} Saved {} bytes to {}",
            "Success:".green().bold(),
            bytes,
            dest.display().to_string().cyan()
        ),
    }

    Ok(())
}

/// Build the data client for `auth`, refreshing credentials as needed.
async fn authenticate(
    ctx: &Context,
    auth: AuthMethod,
    interactive: bool,
    force_refresh: bool,
) -> Result<(CedaClient, Option<DownloadToken>)> {
    match auth {
        AuthMethod::Token => {
            let manager = ctx.manager(interactive)?;
            let (token, _) = manager.get_or_refresh_token().await.map_err(explain)?;
            Ok((ctx.client()?, Some(token)))
        }
        AuthMethod::Cert => {
            let manager = ctx.manager(interactive)?;
            manager
                .ensure_certificate(force_refresh)
                .await
                .map_err(explain)?;
            let client = manager.certificate_client(ctx.client_builder()).await?;
            Ok((client, None))
        }
        AuthMethod::None => Ok((ctx.client()?, None)),
    }
}
