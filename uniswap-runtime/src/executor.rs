//! Operation pipeline: validated params in, calldata out, transaction
//! submitted through the wallet.
//!
//! Every write follows the same shape. Validate the parameters, check the
//! pool or position actually exists, build calldata with an encoder, hand
//! the prepared transaction to the [`WalletClient`] and wait for the
//! outcome. Reads go straight to the subgraph.

use std::sync::Arc;

use alloy::primitives::aliases::U160;
use alloy::primitives::{Address, U256};
use tracing::{debug, info};

use crate::chain::ChainClient;
use crate::contracts::{FACTORY_ADDRESS, compute_pool_address};
use crate::encoders::{MintArgs, PositionManagerEncoder, SwapRouterEncoder};
use crate::error::UniswapError;
use crate::params::{
    AddLiquidityParams, CollectFeesParams, PoolInfoParams, RemoveLiquidityParams, ScanPoolsParams,
    SwapAndAddLiquidityParams, SwapExactInputParams, SwapExactOutputParams, parse_amount,
    tick_spacing,
};
use crate::subgraph::SubgraphClient;
use crate::types::{
    PoolSnapshot, PoolStats, PositionDetail, SwapOutcome, TxOutcome,
};
use crate::wallet::WalletClient;

pub struct UniswapExecutor {
    chain: ChainClient,
    wallet: Arc<dyn WalletClient>,
    subgraph: SubgraphClient,
    position_manager: PositionManagerEncoder,
    swap_router: SwapRouterEncoder,
    factory: Address,
}

impl UniswapExecutor {
    pub fn new(
        chain: ChainClient,
        wallet: Arc<dyn WalletClient>,
        subgraph: SubgraphClient,
    ) -> Result<Self, UniswapError> {
        if chain.chain_id != wallet.chain_id() {
            return Err(UniswapError::ConfigError(format!(
                "RPC chain {} does not match wallet chain {}",
                chain.chain_id,
                wallet.chain_id()
            )));
        }
        let factory = FACTORY_ADDRESS
            .parse()
            .map_err(|e| UniswapError::ConfigError(format!("factory address: {e}")))?;
        Ok(Self {
            chain,
            wallet,
            subgraph,
            position_manager: PositionManagerEncoder::new(),
            swap_router: SwapRouterEncoder::new(),
            factory,
        })
    }

    pub fn wallet_address(&self) -> Address {
        self.wallet.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain.chain_id
    }

    /// Mint a new position. Tokens are sorted into pool order before
    /// encoding; minimums are derived from the desired amounts and the
    /// slippage tolerance in bips.
    pub async fn add_liquidity(
        &self,
        params: &AddLiquidityParams,
    ) -> Result<TxOutcome, UniswapError> {
        params.validate()?;

        let (token0, token1, amount0_desired, amount1_desired) = sort_pair(
            params.token0.address,
            params.token1.address,
            parse_amount("amount0Desired", &params.amount0_desired)?,
            parse_amount("amount1Desired", &params.amount1_desired)?,
        );

        let pool = compute_pool_address(self.factory, token0, token1, params.fee)
            .ok_or(UniswapError::PoolNotFound)?;
        self.ensure_pool_initialized(pool).await?;

        info!(
            %pool,
            fee = params.fee,
            tick_lower = params.tick_lower,
            tick_upper = params.tick_upper,
            "Adding liquidity"
        );

        let tx = self.position_manager.encode_mint(&MintArgs {
            token0,
            token1,
            fee: params.fee,
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
            amount0_desired,
            amount1_desired,
            amount0_min: apply_slippage_bips(amount0_desired, params.slippage_tolerance)?,
            amount1_min: apply_slippage_bips(amount1_desired, params.slippage_tolerance)?,
            recipient: self.wallet.address(),
        })?;
        self.wallet.send_transaction(&tx).await
    }

    /// Decrease liquidity on an owned position, then collect the freed
    /// tokens and any accrued fees in a second transaction.
    ///
    /// The two calls are sequenced; collect only runs once the decrease is
    /// confirmed. The hash of the collect transaction is returned.
    pub async fn remove_liquidity(
        &self,
        params: &RemoveLiquidityParams,
    ) -> Result<TxOutcome, UniswapError> {
        params.validate()?;

        let position = self.owned_position(params.token_id).await?;
        let liquidity: u128 = params
            .liquidity
            .parse()
            .map_err(|e| UniswapError::InvalidParameter(format!("liquidity: {e}")))?;
        let total: u128 = position
            .liquidity
            .parse()
            .map_err(|e| UniswapError::SubgraphError(format!("position liquidity: {e}")))?;
        if liquidity > total {
            return Err(UniswapError::InvalidParameter(format!(
                "liquidity {liquidity} exceeds position liquidity {total}"
            )));
        }

        let fraction = if total == 0 {
            0.0
        } else {
            liquidity as f64 / total as f64
        };
        let amount0_min = min_amount_for_withdrawal(
            &position.deposited_token0,
            position.token0.decimals,
            fraction,
            params.slippage_tolerance,
        )?;
        let amount1_min = min_amount_for_withdrawal(
            &position.deposited_token1,
            position.token1.decimals,
            fraction,
            params.slippage_tolerance,
        )?;

        info!(
            token_id = params.token_id,
            liquidity,
            slippage = params.slippage_tolerance,
            "Removing liquidity"
        );

        let decrease = self.position_manager.encode_decrease_liquidity(
            U256::from(params.token_id),
            liquidity,
            amount0_min,
            amount1_min,
        );
        let outcome = self.wallet.send_transaction(&decrease).await?;
        debug!(tx_hash = %outcome.tx_hash, "Decrease confirmed, collecting");

        let collect = self
            .position_manager
            .encode_collect_all(U256::from(params.token_id), self.wallet.address());
        self.wallet.send_transaction(&collect).await
    }

    /// Collect all accrued fees on an owned position.
    pub async fn collect_fees(
        &self,
        params: &CollectFeesParams,
    ) -> Result<TxOutcome, UniswapError> {
        self.owned_position(params.token_id).await?;

        info!(token_id = params.token_id, "Collecting fees");
        let tx = self
            .position_manager
            .encode_collect_all(U256::from(params.token_id), self.wallet.address());
        self.wallet.send_transaction(&tx).await
    }

    /// All positions owned by the wallet.
    pub async fn get_positions(&self) -> Result<Vec<PositionDetail>, UniswapError> {
        self.subgraph.positions_by_owner(self.wallet.address()).await
    }

    /// Current state of the pool for a token pair.
    pub async fn get_pool_info(
        &self,
        params: &PoolInfoParams,
    ) -> Result<PoolSnapshot, UniswapError> {
        let (token0, token1) = if params.token0_address < params.token1_address {
            (params.token0_address, params.token1_address)
        } else {
            (params.token1_address, params.token0_address)
        };
        self.subgraph
            .pool_by_pair(token0, token1)
            .await?
            .ok_or(UniswapError::PoolNotFound)
    }

    /// Scan pools by fee yield or creation time.
    pub async fn scan_pools(
        &self,
        params: &ScanPoolsParams,
    ) -> Result<Vec<PoolStats>, UniswapError> {
        self.subgraph.scan_pools(params).await
    }

    /// Swap a fixed input amount through a single pool.
    pub async fn swap_exact_input(
        &self,
        params: &SwapExactInputParams,
    ) -> Result<SwapOutcome, UniswapError> {
        params.validate()?;
        self.ensure_pair_pool(params.token_in.address, params.token_out.address, params.fee)
            .await?;

        info!(
            token_in = %params.token_in.symbol,
            token_out = %params.token_out.symbol,
            amount_in = %params.amount_in,
            "Swapping exact input"
        );

        let tx = self.swap_router.encode_exact_input_single(
            params.token_in.address,
            params.token_out.address,
            params.fee,
            self.wallet.address(),
            parse_amount("amountIn", &params.amount_in)?,
            parse_amount("amountOutMinimum", &params.amount_out_minimum)?,
            parse_price_limit(params.sqrt_price_limit_x96.as_deref())?,
        );
        let outcome = self.wallet.send_transaction(&tx).await?;
        Ok(SwapOutcome {
            amount_in: params.amount_in.clone(),
            amount_out: params.amount_out_minimum.clone(),
            tx_hash: outcome.tx_hash,
        })
    }

    /// Swap up to a maximum input for a fixed output amount.
    pub async fn swap_exact_output(
        &self,
        params: &SwapExactOutputParams,
    ) -> Result<SwapOutcome, UniswapError> {
        params.validate()?;
        self.ensure_pair_pool(params.token_in.address, params.token_out.address, params.fee)
            .await?;

        info!(
            token_in = %params.token_in.symbol,
            token_out = %params.token_out.symbol,
            amount_out = %params.amount_out,
            "Swapping exact output"
        );

        let tx = self.swap_router.encode_exact_output_single(
            params.token_in.address,
            params.token_out.address,
            params.fee,
            self.wallet.address(),
            parse_amount("amountOut", &params.amount_out)?,
            parse_amount("amountInMaximum", &params.amount_in_maximum)?,
            parse_price_limit(params.sqrt_price_limit_x96.as_deref())?,
        );
        let outcome = self.wallet.send_transaction(&tx).await?;
        Ok(SwapOutcome {
            amount_in: params.amount_in_maximum.clone(),
            amount_out: params.amount_out.clone(),
            tx_hash: outcome.tx_hash,
        })
    }

    /// Mint into the pool for a token pair, resolving the fee tier from the
    /// subgraph instead of taking it as a parameter.
    pub async fn swap_and_add_liquidity(
        &self,
        params: &SwapAndAddLiquidityParams,
    ) -> Result<TxOutcome, UniswapError> {
        params.validate()?;

        let (token0, token1, amount0_desired, amount1_desired) = sort_pair(
            params.token0_address,
            params.token1_address,
            parse_amount("amount0Desired", &params.amount0_desired)?,
            parse_amount("amount1Desired", &params.amount1_desired)?,
        );

        let pool = self
            .subgraph
            .pool_by_pair(token0, token1)
            .await?
            .ok_or(UniswapError::PoolNotFound)?;
        let spacing = tick_spacing(pool.fee_tier).ok_or_else(|| {
            UniswapError::SubgraphError(format!("pool reports unknown fee tier {}", pool.fee_tier))
        })?;
        for (label, tick) in [
            ("tickLower", params.tick_lower),
            ("tickUpper", params.tick_upper),
        ] {
            if tick % spacing != 0 {
                return Err(UniswapError::InvalidParameter(format!(
                    "{label} {tick} is not a multiple of tick spacing {spacing}"
                )));
            }
        }

        info!(
            pool = %pool.pool_address,
            fee = pool.fee_tier,
            "Adding liquidity to resolved pool"
        );

        let tx = self.position_manager.encode_mint(&MintArgs {
            token0,
            token1,
            fee: pool.fee_tier,
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
            amount0_desired,
            amount1_desired,
            amount0_min: apply_slippage_bips(amount0_desired, params.slippage_tolerance)?,
            amount1_min: apply_slippage_bips(amount1_desired, params.slippage_tolerance)?,
            recipient: self.wallet.address(),
        })?;
        self.wallet.send_transaction(&tx).await
    }

    async fn owned_position(&self, token_id: u64) -> Result<PositionDetail, UniswapError> {
        let positions = self
            .subgraph
            .positions_by_owner(self.wallet.address())
            .await?;
        let id = token_id.to_string();
        positions
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(UniswapError::PositionNotFound(token_id))
    }

    async fn ensure_pair_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee: u32,
    ) -> Result<Address, UniswapError> {
        let pool = compute_pool_address(self.factory, token_a, token_b, fee)
            .ok_or(UniswapError::PoolNotFound)?;
        self.ensure_pool_initialized(pool).await?;
        Ok(pool)
    }

    async fn ensure_pool_initialized(&self, pool: Address) -> Result<(), UniswapError> {
        let state = self
            .chain
            .pool_state(pool)
            .await
            .map_err(|_| UniswapError::PoolNotFound)?;
        if state.sqrt_price_x96.is_zero() {
            return Err(UniswapError::PoolNotFound);
        }
        debug!(%pool, tick = state.tick, "Pool state checked");
        Ok(())
    }
}

/// Order a token pair and its desired amounts into pool order.
fn sort_pair(
    token_a: Address,
    token_b: Address,
    amount_a: U256,
    amount_b: U256,
) -> (Address, Address, U256, U256) {
    if token_a < token_b {
        (token_a, token_b, amount_a, amount_b)
    } else {
        (token_b, token_a, amount_b, amount_a)
    }
}

fn apply_slippage_bips(amount: U256, bips: u32) -> Result<U256, UniswapError> {
    let scaled = amount
        .checked_mul(U256::from(10_000u32 - bips))
        .ok_or_else(|| {
            UniswapError::InvalidParameter(format!(
                "amount {amount} too large for slippage arithmetic"
            ))
        })?;
    Ok(scaled / U256::from(10_000u32))
}

/// Minimum raw amount expected back when withdrawing `fraction` of a
/// position, given its human-readable deposited amount and a slippage
/// percentage. Slippage floors tolerate f64 rounding here.
fn min_amount_for_withdrawal(
    deposited: &str,
    decimals: u8,
    fraction: f64,
    slippage_percent: u32,
) -> Result<U256, UniswapError> {
    let deposited: f64 = deposited
        .parse()
        .map_err(|e| UniswapError::SubgraphError(format!("deposited amount: {e}")))?;
    let raw = deposited * 10f64.powi(i32::from(decimals)) * fraction
        * f64::from(100 - slippage_percent)
        / 100.0;
    if !raw.is_finite() || raw < 0.0 {
        return Err(UniswapError::InvalidParameter(
            "withdrawal minimum is not representable".into(),
        ));
    }
    Ok(U256::from(raw as u128))
}

fn parse_price_limit(limit: Option<&str>) -> Result<U160, UniswapError> {
    match limit {
        None => Ok(U160::ZERO),
        Some(raw) => U160::from_str_radix(raw, 10)
            .map_err(|e| UniswapError::InvalidParameter(format!("sqrtPriceLimitX96: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_A: &str = "0x0000000000000000000000000000000000000001";
    const TOKEN_B: &str = "0x0000000000000000000000000000000000000002";

    #[test]
    fn test_sort_pair_keeps_amounts_with_tokens() {
        let a: Address = TOKEN_A.parse().unwrap();
        let b: Address = TOKEN_B.parse().unwrap();
        let (t0, t1, amt0, amt1) = sort_pair(b, a, U256::from(2u64), U256::from(1u64));
        assert_eq!(t0, a);
        assert_eq!(t1, b);
        assert_eq!(amt0, U256::from(1u64));
        assert_eq!(amt1, U256::from(2u64));
    }

    #[test]
    fn test_apply_slippage_bips() {
        // 50 bips off 1_000_000 leaves 995_000
        assert_eq!(
            apply_slippage_bips(U256::from(1_000_000u64), 50).unwrap(),
            U256::from(995_000u64)
        );
        assert_eq!(
            apply_slippage_bips(U256::from(1_000_000u64), 0).unwrap(),
            U256::from(1_000_000u64)
        );
    }

    #[test]
    fn test_apply_slippage_bips_overflow_is_an_error() {
        let err = apply_slippage_bips(U256::MAX, 50).unwrap_err();
        assert!(matches!(err, UniswapError::InvalidParameter(_)));
    }

    #[test]
    fn test_min_amount_for_withdrawal() {
        // 1000 tokens with 6 decimals, half withdrawn, 1% slippage:
        // 1000 * 1e6 * 0.5 * 0.99 = 495_000_000
        let min = min_amount_for_withdrawal("1000", 6, 0.5, 1).unwrap();
        assert_eq!(min, U256::from(495_000_000u64));
    }

    #[test]
    fn test_min_amount_rejects_garbage() {
        assert!(min_amount_for_withdrawal("abc", 6, 1.0, 0).is_err());
    }

    #[test]
    fn test_parse_price_limit() {
        assert_eq!(parse_price_limit(None).unwrap(), U160::ZERO);
        assert_eq!(
            parse_price_limit(Some("79228162514264337593543950336")).unwrap(),
            U160::from_str_radix("79228162514264337593543950336", 10).unwrap()
        );
        assert!(parse_price_limit(Some("not-a-number")).is_err());
    }
}
