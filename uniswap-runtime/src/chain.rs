//! Read-only chain client for querying pool state over JSON-RPC.
//!
//! Write paths go through [`crate::wallet::WalletClient`]; this client only
//! serves the public reads (`slot0`, `liquidity`) the operations need before
//! building calldata.

use alloy::network::Ethereum;
use alloy::primitives::{Address, U256};
use alloy::providers::RootProvider;

use crate::contracts::IUniswapV3Pool;
use crate::error::UniswapError;
use crate::types::PoolState;

/// A read-only RPC client bound to one chain.
#[derive(Debug, Clone)]
pub struct ChainClient {
    provider: RootProvider<Ethereum>,
    pub chain_id: u64,
}

impl ChainClient {
    /// Connect to an RPC endpoint.
    pub fn new(rpc_url: &str, chain_id: u64) -> Result<Self, UniswapError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| UniswapError::ConfigError(format!("Invalid RPC URL: {e}")))?;
        Ok(Self {
            provider: RootProvider::new_http(url),
            chain_id,
        })
    }

    /// Fetch current `slot0` and in-range liquidity for a pool.
    ///
    /// Fails with an RPC error when the address has no pool deployed.
    pub async fn pool_state(&self, pool: Address) -> Result<PoolState, UniswapError> {
        let contract = IUniswapV3Pool::new(pool, &self.provider);

        let slot0 = contract
            .slot0()
            .call()
            .await
            .map_err(|e| UniswapError::RpcError(format!("slot0 call failed: {e}")))?;
        let liquidity = contract
            .liquidity()
            .call()
            .await
            .map_err(|e| UniswapError::RpcError(format!("liquidity call failed: {e}")))?;

        let tick: i32 = slot0
            .tick
            .try_into()
            .map_err(|_| UniswapError::RpcError("tick out of i32 range".into()))?;

        Ok(PoolState {
            sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
            tick,
            liquidity,
        })
    }

    pub fn provider(&self) -> &RootProvider<Ethereum> {
        &self.provider
    }
}
