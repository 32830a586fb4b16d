//! Fork Seeder
//!
//! Command-line entry point: chain checks, ABI smoke tests, and WETH seeding.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fork_seeder::{
    abi::{AbiStore, SMOKE_TEST_ABIS},
    config::{load_dotenv, Config, RpcConfig, SeedConfig, SmokeConfig},
    ethereum::{ChainClient, EthereumClient, WalletManager},
    services::{abi_report, check_chain, sdk_smoke, BalanceService, Seeder},
};

#[derive(Debug, Parser)]
#[command(name = "fork-seeder", version, about = "Ethereum fork helpers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check connectivity, chain ID and the configured key's balance.
    Check,
    /// Top up WETH for the liquidator and borrower accounts.
    Seed,
    /// Load ABI files by name and report their entry counts.
    Abi {
        /// ABI names (default: erc20 aave_pool aave_oracle).
        names: Vec<String>,
    },
    /// Bind WETH with the erc20 ABI and read decimals and a balance.
    Smoke,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    load_dotenv();
    let config = Config::from_env()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Command::Check => check(&config).await?,
        Command::Seed => seed(&config).await?,
        Command::Abi { names } => abi(&config, names),
        Command::Smoke => smoke(&config).await?,
    }

    Ok(())
}

async fn check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let rpc = RpcConfig::from_env()?;
    let policy = config.retry_policy()?;

    let wallet = rpc.private_key.as_deref().map(WalletManager::from_private_key).transpose()?;
    let client: Arc<dyn ChainClient> = Arc::new(EthereumClient::connect(&rpc).await?);
    let balances = BalanceService::new(client.clone(), policy.clone());

    let mut report =
        check_chain(client.as_ref(), &balances, &rpc.rpc_url, wallet.as_ref(), &policy).await?;

    if let Some(ws_url) = &rpc.ws_url {
        report.ws = Some(
            EthereumClient::connect_ws(ws_url)
                .await
                .map(|ws| ws.connected_chain_id())
                .map_err(|e| e.to_string()),
        );
    }

    print!("{}", report);
    Ok(())
}

async fn seed(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // All required settings are validated before connecting
    let rpc = RpcConfig::from_env()?;
    let seed = SeedConfig::from_env()?;
    let policy = config.retry_policy()?;
    let wallet = WalletManager::from_private_key(&seed.funding_private_key)?;

    let client = EthereumClient::connect(&rpc).await?;
    println!("Connected to: {}", client.rpc_url());

    let seeder = Seeder::new(Arc::new(client), wallet, seed.weth_address, policy)
        .with_gas_limit(seed.gas_limit)
        .with_receipt_polling(rpc.receipt_poll_interval, rpc.receipt_timeout);

    let report = seeder.run(&seed.targets()).await?;
    print!("{}", report);

    if report.failures() > 0 {
        tracing::warn!(failures = report.failures(), "Some accounts were not funded");
    }
    Ok(())
}

fn abi(config: &Config, names: Vec<String>) {
    let store = AbiStore::new(&config.abi_dir);
    let names = if names.is_empty() {
        SMOKE_TEST_ABIS.iter().map(|s| s.to_string()).collect()
    } else {
        names
    };

    println!("ABI smoke test:");
    for result in abi_report(&store, &names) {
        println!("{}", result);
    }
}

async fn smoke(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let rpc = RpcConfig::from_env()?;
    let smoke = SmokeConfig::from_env()?;
    let policy = config.retry_policy()?;
    let store = AbiStore::new(&config.abi_dir);

    println!("Using RPC: {}", rpc.rpc_url);
    println!("WETH address: {}", smoke.weth_address);
    println!("Test account: {}", smoke.test_account);

    let client = EthereumClient::connect(&rpc).await?;
    println!("Connected: true");

    let report = sdk_smoke(&client, &store, &smoke, &policy).await?;
    print!("{}", report);
    Ok(())
}
