use alloy::primitives::aliases::{I24, U24};
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::contracts::{INonfungiblePositionManager, POSITION_MANAGER_ADDRESS};
use crate::error::UniswapError;
use crate::types::EncodedTransaction;

use super::{MAX_UINT128, deadline_from_now};

/// Arguments for minting a new position.
#[derive(Debug, Clone)]
pub struct MintArgs {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0_desired: U256,
    pub amount1_desired: U256,
    pub amount0_min: U256,
    pub amount1_min: U256,
    pub recipient: Address,
}

/// Calldata builder for the NonfungiblePositionManager.
#[derive(Debug, Clone)]
pub struct PositionManagerEncoder {
    address: Address,
}

impl PositionManagerEncoder {
    pub fn new() -> Self {
        Self {
            address: POSITION_MANAGER_ADDRESS
                .parse()
                .expect("valid position manager address"),
        }
    }

    pub fn with_address(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Encode `mint(MintParams)`.
    pub fn encode_mint(&self, args: &MintArgs) -> Result<EncodedTransaction, UniswapError> {
        let call = INonfungiblePositionManager::mintCall {
            params: INonfungiblePositionManager::MintParams {
                token0: args.token0,
                token1: args.token1,
                fee: U24::from(args.fee),
                tickLower: parse_tick("tickLower", args.tick_lower)?,
                tickUpper: parse_tick("tickUpper", args.tick_upper)?,
                amount0Desired: args.amount0_desired,
                amount1Desired: args.amount1_desired,
                amount0Min: args.amount0_min,
                amount1Min: args.amount1_min,
                recipient: args.recipient,
                deadline: deadline_from_now(),
            },
        };
        Ok(EncodedTransaction {
            to: self.address,
            data: Bytes::from(call.abi_encode()),
            value: U256::ZERO,
        })
    }

    /// Encode `decreaseLiquidity(DecreaseLiquidityParams)`.
    pub fn encode_decrease_liquidity(
        &self,
        token_id: U256,
        liquidity: u128,
        amount0_min: U256,
        amount1_min: U256,
    ) -> EncodedTransaction {
        let call = INonfungiblePositionManager::decreaseLiquidityCall {
            params: INonfungiblePositionManager::DecreaseLiquidityParams {
                tokenId: token_id,
                liquidity,
                amount0Min: amount0_min,
                amount1Min: amount1_min,
                deadline: deadline_from_now(),
            },
        };
        EncodedTransaction {
            to: self.address,
            data: Bytes::from(call.abi_encode()),
            value: U256::ZERO,
        }
    }

    /// Encode `collect(CollectParams)` with uncapped amounts, sweeping all
    /// owed tokens and fees to `recipient`.
    pub fn encode_collect_all(&self, token_id: U256, recipient: Address) -> EncodedTransaction {
        let call = INonfungiblePositionManager::collectCall {
            params: INonfungiblePositionManager::CollectParams {
                tokenId: token_id,
                recipient,
                amount0Max: MAX_UINT128,
                amount1Max: MAX_UINT128,
            },
        };
        EncodedTransaction {
            to: self.address,
            data: Bytes::from(call.abi_encode()),
            value: U256::ZERO,
        }
    }
}

impl Default for PositionManagerEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_tick(field: &str, tick: i32) -> Result<I24, UniswapError> {
    I24::try_from(tick).map_err(|_| UniswapError::EncodingError {
        operation: "position_manager".into(),
        message: format!("{field} {tick} out of int24 range"),
    })
}
