//! Tool parameter types.
//!
//! Each struct mirrors one tool's JSON parameter schema. Validation happens
//! here, before any calldata is built: fee tiers, tick alignment, slippage
//! bounds, and numeric parsing. Amounts arrive as decimal strings (raw token
//! units) and are parsed into `U256` on demand.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::UniswapError;

/// Fee tiers with live Uniswap V3 deployments, in hundredths of a bip.
pub const FEE_TIERS: &[u32] = &[100, 500, 3000, 10000];

/// Tick spacing for a fee tier. `None` for unknown tiers.
pub fn tick_spacing(fee_tier: u32) -> Option<i32> {
    match fee_tier {
        100 => Some(1),
        500 => Some(10),
        3000 => Some(60),
        10000 => Some(200),
        _ => None,
    }
}

/// Parse a decimal string into a U256, mapping failures to a parameter error.
pub fn parse_amount(field: &str, raw: &str) -> Result<U256, UniswapError> {
    U256::from_str_radix(raw, 10)
        .map_err(|e| UniswapError::InvalidParameter(format!("{field}: '{raw}': {e}")))
}

/// Token metadata as supplied by the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenParam {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLiquidityParams {
    pub token0: TokenParam,
    pub token1: TokenParam,
    /// Fee tier of the pool (100, 500, 3000, 10000).
    pub fee: u32,
    pub amount0_desired: String,
    pub amount1_desired: String,
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// Slippage tolerance in bips (1 = 0.01%).
    pub slippage_tolerance: u32,
}

impl AddLiquidityParams {
    pub fn validate(&self) -> Result<(), UniswapError> {
        validate_fee_tier(self.fee)?;
        validate_tick_range(self.fee, self.tick_lower, self.tick_upper)?;
        validate_slippage_bips(self.slippage_tolerance)?;
        parse_amount("amount0Desired", &self.amount0_desired)?;
        parse_amount("amount1Desired", &self.amount1_desired)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLiquidityParams {
    /// The NFT token ID of the position.
    pub token_id: u64,
    /// Amount of liquidity to remove, raw decimal string.
    pub liquidity: String,
    /// Maximum allowed slippage percentage (0-100).
    pub slippage_tolerance: u32,
}

impl RemoveLiquidityParams {
    pub fn validate(&self) -> Result<(), UniswapError> {
        if self.slippage_tolerance > 100 {
            return Err(UniswapError::InvalidParameter(format!(
                "slippageTolerance must be 0-100 percent, got {}",
                self.slippage_tolerance
            )));
        }
        parse_amount("liquidity", &self.liquidity)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectFeesParams {
    /// The NFT token ID of the position.
    pub token_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapExactInputParams {
    pub token_in: TokenParam,
    pub token_out: TokenParam,
    pub fee: u32,
    pub amount_in: String,
    pub amount_out_minimum: String,
    #[serde(default)]
    pub sqrt_price_limit_x96: Option<String>,
}

impl SwapExactInputParams {
    pub fn validate(&self) -> Result<(), UniswapError> {
        validate_fee_tier(self.fee)?;
        parse_amount("amountIn", &self.amount_in)?;
        parse_amount("amountOutMinimum", &self.amount_out_minimum)?;
        if let Some(limit) = &self.sqrt_price_limit_x96 {
            parse_amount("sqrtPriceLimitX96", limit)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapExactOutputParams {
    pub token_in: TokenParam,
    pub token_out: TokenParam,
    pub fee: u32,
    pub amount_out: String,
    pub amount_in_maximum: String,
    #[serde(default)]
    pub sqrt_price_limit_x96: Option<String>,
}

impl SwapExactOutputParams {
    pub fn validate(&self) -> Result<(), UniswapError> {
        validate_fee_tier(self.fee)?;
        parse_amount("amountOut", &self.amount_out)?;
        parse_amount("amountInMaximum", &self.amount_in_maximum)?;
        if let Some(limit) = &self.sqrt_price_limit_x96 {
            parse_amount("sqrtPriceLimitX96", limit)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapAndAddLiquidityParams {
    /// Address of the first token in the pair (lower address).
    pub token0_address: Address,
    /// Address of the second token in the pair (higher address).
    pub token1_address: Address,
    pub amount0_desired: String,
    pub amount1_desired: String,
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// Maximum allowed slippage in bips. Value between 0-10000.
    pub slippage_tolerance: u32,
}

impl SwapAndAddLiquidityParams {
    pub fn validate(&self) -> Result<(), UniswapError> {
        if self.tick_lower >= self.tick_upper {
            return Err(UniswapError::InvalidParameter(format!(
                "tickLower {} must be below tickUpper {}",
                self.tick_lower, self.tick_upper
            )));
        }
        validate_slippage_bips(self.slippage_tolerance)?;
        parse_amount("amount0Desired", &self.amount0_desired)?;
        parse_amount("amount1Desired", &self.amount1_desired)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PoolOrder {
    /// Highest accumulated fees first.
    Fees,
    /// Most recently created first.
    Newest,
}

impl Default for PoolOrder {
    fn default() -> Self {
        PoolOrder::Fees
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanPoolsParams {
    /// Minimum accumulated fees in USD.
    #[serde(default)]
    pub min_liquidity: f64,
    /// Minimum volume in USD.
    #[serde(default)]
    pub min_volume24h: f64,
    /// Minimum fee APR percentage.
    #[serde(default)]
    pub min_fee_apr: f64,
    #[serde(default)]
    pub token0: Option<Address>,
    #[serde(default)]
    pub token1: Option<Address>,
    #[serde(default)]
    pub order: PoolOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolInfoParams {
    pub token0_address: Address,
    pub token1_address: Address,
}

fn validate_fee_tier(fee: u32) -> Result<(), UniswapError> {
    if !FEE_TIERS.contains(&fee) {
        return Err(UniswapError::InvalidParameter(format!(
            "fee tier {fee} is not one of {FEE_TIERS:?}"
        )));
    }
    Ok(())
}

fn validate_tick_range(fee: u32, tick_lower: i32, tick_upper: i32) -> Result<(), UniswapError> {
    if tick_lower >= tick_upper {
        return Err(UniswapError::InvalidParameter(format!(
            "tickLower {tick_lower} must be below tickUpper {tick_upper}"
        )));
    }
    let spacing = tick_spacing(fee)
        .ok_or_else(|| UniswapError::InvalidParameter(format!("unknown fee tier {fee}")))?;
    for (label, tick) in [("tickLower", tick_lower), ("tickUpper", tick_upper)] {
        if tick % spacing != 0 {
            return Err(UniswapError::InvalidParameter(format!(
                "{label} {tick} is not a multiple of tick spacing {spacing}"
            )));
        }
    }
    Ok(())
}

fn validate_slippage_bips(bips: u32) -> Result<(), UniswapError> {
    if bips > 10_000 {
        return Err(UniswapError::InvalidParameter(format!(
            "slippageTolerance must be 0-10000 bips, got {bips}"
        )));
    }
    Ok(())
}
