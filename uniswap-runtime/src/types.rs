use alloy::primitives::{Address, Bytes, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ERC-20 token metadata as the agent supplies it and the subgraph returns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenInfo {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

/// Full pool state as resolved from the subgraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub pool_address: Address,
    pub token0: TokenInfo,
    pub token1: TokenInfo,
    pub fee_tier: u32,
    /// Raw in-range liquidity, decimal string as reported by the subgraph.
    pub liquidity: String,
    /// Current sqrtPriceX96, decimal string.
    pub sqrt_price: String,
    pub tick: i32,
    pub token0_price: String,
    pub token1_price: String,
    pub volume_usd: Decimal,
    pub fees_usd: Decimal,
}

/// Aggregate pool figures returned by the scan query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStats {
    pub pool_address: Address,
    pub token0: TokenInfo,
    pub token1: TokenInfo,
    pub fee_tier: u32,
    pub liquidity: String,
    pub volume_usd: Decimal,
    pub fees_usd: Decimal,
    /// Annualized fee APR percentage derived from feesUSD and volumeUSD.
    pub fee_apr: Decimal,
    pub tx_count: u64,
}

/// An NFT-represented liquidity position, as indexed by the subgraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionDetail {
    pub id: String,
    pub owner: Address,
    pub liquidity: String,
    pub token0: TokenInfo,
    pub token1: TokenInfo,
    pub deposited_token0: String,
    pub deposited_token1: String,
    pub withdrawn_token0: String,
    pub withdrawn_token1: String,
    pub collected_fees_token0: String,
    pub collected_fees_token1: String,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// A calldata payload ready for submission through a wallet client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedTransaction {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

/// Outcome of a submitted transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxOutcome {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub gas_used: Option<u128>,
}

/// Result of a swap tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub amount_in: String,
    pub amount_out: String,
    pub tx_hash: String,
}

/// On-chain pool state read directly over RPC.
#[derive(Debug, Clone)]
pub struct PoolState {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub liquidity: u128,
}
