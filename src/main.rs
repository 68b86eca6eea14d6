//! Custom account walkthrough.
//!
//! ```text
//! config (TOML + PXE_URL + --url)
//!     → wait for the PXE
//!     → deploy a signature-checking account (AuthorizedWallet)
//!     → deploy a token from it, mint 100 privately, check the balance
//! ```

use std::path::PathBuf;

use clap::Parser;

use pxe_wallet::config::load_config_or_default;
use pxe_wallet::observability::logging::init_logging;
use pxe_wallet::scripts::account_abstraction;

#[derive(Parser)]
#[command(name = "pxe-wallet")]
#[command(about = "Deploy and use a custom account contract", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// PXE URL, overrides the config file and PXE_URL
    #[arg(short, long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config_or_default(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.pxe.url = url;
    }
    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        pxe_url = %config.pxe.url,
        "pxe-wallet starting"
    );

    let report = account_abstraction::run(&config).await?;

    println!("account: {}", report.account);
    println!("token:   {}", report.token);
    println!("private balance: {}", report.private_balance);
    Ok(())
}
