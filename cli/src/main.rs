//! Tally — command-line client for platform-hosted addresses.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use tally_platform::Platform;
use tally_types::{AddressId, Decimal, NetworkId, PrivateKey, WalletId};
use tally_utils::LogFormat;
use tally_wallet_core::{Address, ClientConfig};

#[derive(Parser, Debug)]
#[command(name = "tally", about = "Balances, transfers and trades for a platform-hosted address")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the platform API.
    #[arg(long, env = "TALLY_API_URL")]
    api_url: Option<String>,

    /// Platform API key.
    #[arg(long, env = "TALLY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Network: "base-sepolia", "base-mainnet", "ethereum-holesky", "ethereum-mainnet".
    #[arg(long, env = "TALLY_NETWORK")]
    network: Option<NetworkId>,

    /// Let the platform's server signer sign and broadcast.
    #[arg(long, env = "TALLY_SERVER_SIGNER")]
    server_signer: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TALLY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "TALLY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Wallet the address belongs to.
    #[arg(long, env = "TALLY_WALLET_ID")]
    wallet_id: String,

    /// Address to act on.
    #[arg(long, env = "TALLY_ADDRESS_ID")]
    address_id: String,

    /// Hex private key of the address, for local signing.
    #[arg(long, env = "TALLY_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Balance of one asset.
    Balance {
        /// Asset id, e.g. "eth", "gwei", "usdc".
        asset: String,
    },
    /// Balances of every asset held.
    Balances,
    /// Transfer an asset to another address.
    Transfer {
        amount: Decimal,
        asset: String,
        destination: String,
    },
    /// Trade one asset for another.
    Trade {
        amount: Decimal,
        from_asset: String,
        to_asset: String,
    },
    /// List transfers made by the address.
    Transfers,
    /// List trades made by the address.
    Trades,
    /// Request testnet funds.
    Faucet,
    /// Print the address's private key as hex.
    Export,
}

/// Merge the optional config file with CLI flags and env vars, flags winning.
fn resolve_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ClientConfig::default(),
    };

    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(api_key) = &cli.api_key {
        config.api_key = api_key.clone();
    }
    if let Some(network) = cli.network {
        config.network = network;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    config.use_server_signer |= cli.server_signer;
    Ok(config)
}

fn build_address(cli: &Cli, config: &ClientConfig) -> anyhow::Result<Address> {
    let platform: Arc<dyn Platform> = Arc::new(config.platform_client()?);
    let key = cli
        .private_key
        .as_deref()
        .map(PrivateKey::from_hex)
        .transpose()
        .context("parsing private key")?;
    let address = Address::new(
        config.network,
        AddressId::new(cli.address_id.as_str())?,
        WalletId::new(cli.wallet_id.as_str())?,
        None,
        platform,
        config.custody_mode(),
    );
    if let Some(key) = key {
        address.set_key(key)?;
    }
    Ok(address)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    tally_utils::init_logging(config.log_format, &config.log_level);
    tracing::debug!(?config, "configuration resolved");

    let address = build_address(&cli, &config)?;
    tracing::info!(%address, custody = ?address.custody(), "address loaded");

    match cli.command {
        Command::Balance { asset } => {
            println!("{} {asset}", address.balance(&asset).await?);
        }
        Command::Balances => {
            for (asset, amount) in address.balances().await?.iter() {
                println!("{amount} {asset}");
            }
        }
        Command::Transfer {
            amount,
            asset,
            destination,
        } => {
            let transfer = address.transfer(amount, &asset, destination).await?;
            print_json(&transfer)?;
        }
        Command::Trade {
            amount,
            from_asset,
            to_asset,
        } => {
            let trade = address.trade(amount, &from_asset, &to_asset).await?;
            print_json(&trade)?;
        }
        Command::Transfers => print_json(&address.transfers().await?)?,
        Command::Trades => print_json(&address.trades().await?)?,
        Command::Faucet => {
            let tx = address.faucet().await?;
            println!("{}", tx.transaction_hash);
        }
        Command::Export => println!("{}", address.export()?),
    }

    Ok(())
}
