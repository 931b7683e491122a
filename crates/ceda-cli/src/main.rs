//! cedafetch - fetch CEDA archive data with short-lived certificates or download tokens.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    ceda_cli::run().await
}
