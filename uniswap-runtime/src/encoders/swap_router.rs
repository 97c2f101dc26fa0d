use alloy::primitives::aliases::{U24, U160};
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::contracts::{ISwapRouter, SWAP_ROUTER_ADDRESS};
use crate::types::EncodedTransaction;

use super::deadline_from_now;

/// Calldata builder for the SwapRouter.
#[derive(Debug, Clone)]
pub struct SwapRouterEncoder {
    address: Address,
}

impl SwapRouterEncoder {
    pub fn new() -> Self {
        Self {
            address: SWAP_ROUTER_ADDRESS
                .parse()
                .expect("valid swap router address"),
        }
    }

    pub fn with_address(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Encode `exactInputSingle`.
    #[allow(clippy::too_many_arguments)]
    pub fn encode_exact_input_single(
        &self,
        token_in: Address,
        token_out: Address,
        fee: u32,
        recipient: Address,
        amount_in: U256,
        amount_out_minimum: U256,
        sqrt_price_limit_x96: U160,
    ) -> EncodedTransaction {
        let call = ISwapRouter::exactInputSingleCall {
            params: ISwapRouter::ExactInputSingleParams {
                tokenIn: token_in,
                tokenOut: token_out,
                fee: U24::from(fee),
                recipient,
                deadline: deadline_from_now(),
                amountIn: amount_in,
                amountOutMinimum: amount_out_minimum,
                sqrtPriceLimitX96: sqrt_price_limit_x96,
            },
        };
        EncodedTransaction {
            to: self.address,
            data: Bytes::from(call.abi_encode()),
            value: U256::ZERO,
        }
    }

    /// Encode `exactOutputSingle`.
    #[allow(clippy::too_many_arguments)]
    pub fn encode_exact_output_single(
        &self,
        token_in: Address,
        token_out: Address,
        fee: u32,
        recipient: Address,
        amount_out: U256,
        amount_in_maximum: U256,
        sqrt_price_limit_x96: U160,
    ) -> EncodedTransaction {
        let call = ISwapRouter::exactOutputSingleCall {
            params: ISwapRouter::ExactOutputSingleParams {
                tokenIn: token_in,
                tokenOut: token_out,
                fee: U24::from(fee),
                recipient,
                deadline: deadline_from_now(),
                amountOut: amount_out,
                amountInMaximum: amount_in_maximum,
                sqrtPriceLimitX96: sqrt_price_limit_x96,
            },
        };
        EncodedTransaction {
            to: self.address,
            data: Bytes::from(call.abi_encode()),
            value: U256::ZERO,
        }
    }
}

impl Default for SwapRouterEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_A: &str = "0x0000000000000000000000000000000000000001";
    const TOKEN_B: &str = "0x0000000000000000000000000000000000000002";
    const RECIPIENT: &str = "0x0000000000000000000000000000000000000003";

    #[test]
    fn test_encode_exact_input_single() {
        let encoder = SwapRouterEncoder::new();
        let tx = encoder.encode_exact_input_single(
            TOKEN_A.parse().unwrap(),
            TOKEN_B.parse().unwrap(),
            3000,
            RECIPIENT.parse().unwrap(),
            U256::from(1_000_000u64),
            U256::from(990_000u64),
            U160::ZERO,
        );
        assert_eq!(tx.to, SWAP_ROUTER_ADDRESS.parse::<Address>().unwrap());
        assert_eq!(&tx.data[..4], ISwapRouter::exactInputSingleCall::SELECTOR);

        let decoded = ISwapRouter::exactInputSingleCall::abi_decode(&tx.data).unwrap();
        assert_eq!(decoded.params.amountIn, U256::from(1_000_000u64));
        assert_eq!(decoded.params.amountOutMinimum, U256::from(990_000u64));
    }

    #[test]
    fn test_encode_exact_output_single() {
        let encoder = SwapRouterEncoder::new();
        let tx = encoder.encode_exact_output_single(
            TOKEN_A.parse().unwrap(),
            TOKEN_B.parse().unwrap(),
            500,
            RECIPIENT.parse().unwrap(),
            U256::from(1_000_000u64),
            U256::from(1_010_000u64),
            U160::ZERO,
        );
        assert_eq!(&tx.data[..4], ISwapRouter::exactOutputSingleCall::SELECTOR);

        let decoded = ISwapRouter::exactOutputSingleCall::abi_decode(&tx.data).unwrap();
        assert_eq!(decoded.params.amountOut, U256::from(1_000_000u64));
    }

    #[test]
    fn test_swap_encodings_differ() {
        let encoder = SwapRouterEncoder::new();
        let input = encoder.encode_exact_input_single(
            TOKEN_A.parse().unwrap(),
            TOKEN_B.parse().unwrap(),
            3000,
            RECIPIENT.parse().unwrap(),
            U256::from(1u64),
            U256::ZERO,
            U160::ZERO,
        );
        let output = encoder.encode_exact_output_single(
            TOKEN_A.parse().unwrap(),
            TOKEN_B.parse().unwrap(),
            3000,
            RECIPIENT.parse().unwrap(),
            U256::from(1u64),
            U256::ZERO,
            U160::ZERO,
        );
        assert_ne!(input.data, output.data);
    }
}
