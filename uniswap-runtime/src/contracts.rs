//! Solidity contract bindings for all Uniswap V3 interactions.
//!
//! Uses alloy's `sol!` macro to generate type-safe ABI encoders/decoders for
//! the pool, factory, position manager, and swap router contracts.

use alloy::primitives::{Address, B256, keccak256};
use alloy::sol;
use alloy::sol_types::SolValue;

use crate::params::tick_spacing;

sol! {
    #[sol(rpc)]
    interface IUniswapV3Pool {
        function slot0() external view returns (
            uint160 sqrtPriceX96,
            int24 tick,
            uint16 observationIndex,
            uint16 observationCardinality,
            uint16 observationCardinalityNext,
            uint8 feeProtocol,
            bool unlocked
        );
        function liquidity() external view returns (uint128);
        function fee() external view returns (uint24);
        function tickSpacing() external view returns (int24);
    }

    #[sol(rpc)]
    interface IUniswapV3Factory {
        function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool);
    }

    interface INonfungiblePositionManager {
        struct MintParams {
            address token0;
            address token1;
            uint24 fee;
            int24 tickLower;
            int24 tickUpper;
            uint256 amount0Desired;
            uint256 amount1Desired;
            uint256 amount0Min;
            uint256 amount1Min;
            address recipient;
            uint256 deadline;
        }
        function mint(MintParams calldata params) external payable
            returns (uint256 tokenId, uint128 liquidity, uint256 amount0, uint256 amount1);

        struct DecreaseLiquidityParams {
            uint256 tokenId;
            uint128 liquidity;
            uint256 amount0Min;
            uint256 amount1Min;
            uint256 deadline;
        }
        function decreaseLiquidity(DecreaseLiquidityParams calldata params) external payable
            returns (uint256 amount0, uint256 amount1);

        struct CollectParams {
            uint256 tokenId;
            address recipient;
            uint128 amount0Max;
            uint128 amount1Max;
        }
        function collect(CollectParams calldata params) external payable
            returns (uint256 amount0, uint256 amount1);
    }

    interface ISwapRouter {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }
        function exactInputSingle(ExactInputSingleParams calldata params) external payable
            returns (uint256 amountOut);

        struct ExactOutputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 deadline;
            uint256 amountOut;
            uint256 amountInMaximum;
            uint160 sqrtPriceLimitX96;
        }
        function exactOutputSingle(ExactOutputSingleParams calldata params) external payable
            returns (uint256 amountIn);
    }
}

/// Uniswap V3 factory (canonical deployment, shared across major EVM chains).
pub const FACTORY_ADDRESS: &str = "0x1F98431c8aD98523631AE4a59f267346ea31F984";

/// NonfungiblePositionManager (canonical deployment).
pub const POSITION_MANAGER_ADDRESS: &str = "0xC36442b4a4522E871399CD717aBDD847Ab11FE88";

/// SwapRouter (canonical deployment).
pub const SWAP_ROUTER_ADDRESS: &str = "0x68b3465833fb72A70ecDF485E0e4C7bD8665Fc45";

/// keccak256 of the UniswapV3Pool creation code, used for CREATE2 derivation.
pub const POOL_INIT_CODE_HASH: &str =
    "0xe34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54";

/// Chain IDs the canonical deployments cover (mainnet, Optimism, Polygon,
/// Base, Arbitrum, Base Sepolia).
pub const SUPPORTED_CHAINS: &[u64] = &[1, 10, 137, 8453, 42161, 84532];

/// Compute a V3 pool address via CREATE2 from the factory, the sorted token
/// pair, and the fee tier. Returns `None` for unknown fee tiers.
pub fn compute_pool_address(
    factory: Address,
    token_a: Address,
    token_b: Address,
    fee: u32,
) -> Option<Address> {
    tick_spacing(fee)?;
    let (token0, token1) = if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };
    let salt = keccak256(
        (
            token0,
            token1,
            alloy::primitives::aliases::U24::from(fee),
        )
            .abi_encode(),
    );
    let init_code_hash: B256 = POOL_INIT_CODE_HASH
        .parse()
        .expect("valid pool init code hash");
    Some(factory.create2(salt, init_code_hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_addresses_parse() {
        assert!(FACTORY_ADDRESS.parse::<Address>().is_ok());
        assert!(POSITION_MANAGER_ADDRESS.parse::<Address>().is_ok());
        assert!(SWAP_ROUTER_ADDRESS.parse::<Address>().is_ok());
        assert!(POOL_INIT_CODE_HASH.parse::<B256>().is_ok());
    }

    #[test]
    fn test_compute_pool_address_known_mainnet_pool() {
        // USDC/WETH 0.05% on mainnet.
        let factory: Address = FACTORY_ADDRESS.parse().unwrap();
        let usdc: Address = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".parse().unwrap();
        let weth: Address = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse().unwrap();
        let expected: Address = "0x88e6A0c2dDD26FEEb64F039a2c41296FcB3f5640".parse().unwrap();

        let computed = compute_pool_address(factory, usdc, weth, 500).unwrap();
        assert_eq!(computed, expected);
    }

    #[test]
    fn test_compute_pool_address_order_independent() {
        let factory: Address = FACTORY_ADDRESS.parse().unwrap();
        let a: Address = "0x0000000000000000000000000000000000000001".parse().unwrap();
        let b: Address = "0x0000000000000000000000000000000000000002".parse().unwrap();
        assert_eq!(
            compute_pool_address(factory, a, b, 3000),
            compute_pool_address(factory, b, a, 3000)
        );
    }

    #[test]
    fn test_compute_pool_address_unknown_fee_tier() {
        let factory: Address = FACTORY_ADDRESS.parse().unwrap();
        let a: Address = "0x0000000000000000000000000000000000000001".parse().unwrap();
        let b: Address = "0x0000000000000000000000000000000000000002".parse().unwrap();
        assert!(compute_pool_address(factory, a, b, 1234).is_none());
    }
}
