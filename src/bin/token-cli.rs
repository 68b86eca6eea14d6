use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pxe_wallet::config::{load_config_or_default, AppConfig};
use pxe_wallet::observability::logging::init_logging;
use pxe_wallet::scripts::token_dapp::{self, BalanceChange};
use pxe_wallet::scripts::Balance;

#[derive(Parser)]
#[command(name = "token-cli")]
#[command(about = "Token operations against a PXE node using its test accounts", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// PXE URL, overrides the config file and PXE_URL
    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show node information
    Info,
    /// List registered accounts
    Accounts,
    /// Deploy a token owned by the first test account
    DeployToken,
    /// Show token balances of every registered account
    Balances {
        /// Show public instead of private balances
        #[arg(long)]
        public: bool,
    },
    /// Mint tokens privately to the owner
    MintPrivate {
        #[arg(default_value_t = token_dapp::PRIVATE_MINT_AMOUNT)]
        amount: u128,
    },
    /// Mint tokens publicly to the owner and print the emitted logs
    MintPublic {
        #[arg(default_value_t = token_dapp::PUBLIC_MINT_AMOUNT)]
        amount: u128,
    },
    /// Transfer tokens privately from the first test account to the second
    Transfer {
        #[arg(default_value_t = token_dapp::TRANSFER_AMOUNT)]
        amount: u128,
    },
    /// Deploy a token and run every flow
    Demo,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config_or_default(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.pxe.url = url;
    }
    init_logging(&config.observability);

    match cli.command {
        Commands::Info => {
            let pxe = token_dapp::connect(&config).await?;
            let info = pxe.get_node_info().await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::Accounts => {
            let pxe = token_dapp::connect(&config).await?;
            for account in pxe.get_registered_accounts().await? {
                println!("{}", account.address);
            }
        }
        Commands::DeployToken => {
            let pxe = token_dapp::connect(&config).await?;
            let token = token_dapp::deploy_token(&config, &pxe).await?;
            println!("token: {}", token.address());
        }
        Commands::Balances { public } => {
            let pxe = token_dapp::connect(&config).await?;
            let balances = if public {
                token_dapp::show_public_balances(&config, &pxe).await?
            } else {
                token_dapp::show_private_balances(&config, &pxe).await?
            };
            print_balances(&balances);
        }
        Commands::MintPrivate { amount } => {
            let pxe = token_dapp::connect(&config).await?;
            let change = token_dapp::mint_private_funds(&config, &pxe, amount).await?;
            print_change(&format!("minted {} privately", amount), &change);
        }
        Commands::MintPublic { amount } => {
            let pxe = token_dapp::connect(&config).await?;
            let report = token_dapp::mint_public_funds(&config, &pxe, amount).await?;
            println!("public balances before:");
            print_balances(&report.before);
            println!("minted {} publicly in tx {}", amount, report.receipt.tx_hash);
            for log in &report.logs {
                println!("log: {}", log);
            }
            println!("public balances after:");
            print_balances(&report.after);
        }
        Commands::Transfer { amount } => {
            let pxe = token_dapp::connect(&config).await?;
            let change = token_dapp::transfer_private_funds(&config, &pxe, amount).await?;
            print_change(&format!("transferred {}", amount), &change);
        }
        Commands::Demo => run_demo(&config).await?,
    }

    Ok(())
}

async fn run_demo(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let report = token_dapp::run_all(config).await?;
    println!("token: {}", report.token);
    println!("private balances before:");
    print_balances(&report.initial_private);
    println!("public balances after mint:");
    print_balances(&report.public_mint.after);
    println!("private balances after:");
    print_balances(&report.final_private);
    Ok(())
}

fn print_change(action: &str, change: &BalanceChange) {
    println!("private balances before:");
    print_balances(&change.before);
    println!("{} in tx {}", action, change.receipt.tx_hash);
    println!("private balances after:");
    print_balances(&change.after);
}

fn print_balances(balances: &[Balance]) {
    for balance in balances {
        println!("{}: {}", balance.account, balance.amount);
    }
}
