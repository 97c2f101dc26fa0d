//! Provision a custody smart wallet administered by the local signing key.
//!
//! Prints the new wallet address; export it as `SMART_WALLET_ADDRESS` for the
//! chat agent.

use alloy::signers::local::PrivateKeySigner;
use anyhow::Context;
use uniswap_runtime::wallet::SmartWalletClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_log();

    let base_url =
        std::env::var("SMART_WALLET_API_URL").context("SMART_WALLET_API_URL is not set")?;
    let api_key =
        std::env::var("SMART_WALLET_API_KEY").context("SMART_WALLET_API_KEY is not set")?;
    let private_key =
        std::env::var("WALLET_PRIVATE_KEY").context("WALLET_PRIVATE_KEY is not set")?;

    let signer: PrivateKeySigner = private_key
        .parse()
        .context("WALLET_PRIVATE_KEY is not a valid private key")?;
    let admin = signer.address();

    tracing::info!(%admin, "Creating smart wallet");
    let wallet = SmartWalletClient::create_wallet(&base_url, &api_key, admin).await?;

    println!("Smart wallet created");
    println!("  address: {}", wallet.address);
    println!("  type:    {}", wallet.wallet_type);
    println!("  admin:   {admin}");
    Ok(())
}

fn setup_log() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};
    if tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .is_err()
    {}
}
