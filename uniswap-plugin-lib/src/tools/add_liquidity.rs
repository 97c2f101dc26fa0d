use async_trait::async_trait;
use serde_json::{Value, json};
use uniswap_runtime::UniswapError;
use uniswap_runtime::params::AddLiquidityParams;

use super::{amount_schema, token_schema};
use crate::tool::{AgentTool, ToolContext};

/// Mint a new concentrated-liquidity position.
pub struct AddLiquidityTool;

#[async_trait]
impl AgentTool for AddLiquidityTool {
    fn name(&self) -> &'static str {
        "uniswap_add_liquidity"
    }

    fn description(&self) -> &'static str {
        "Add liquidity to a Uniswap V3 pool by minting a new position in the given tick range"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "token0": token_schema("The first token of the pair"),
                "token1": token_schema("The second token of the pair"),
                "fee": {
                    "type": "integer",
                    "enum": [100, 500, 3000, 10000],
                    "description": "Fee tier of the pool, in hundredths of a bip",
                },
                "amount0Desired": amount_schema("Desired amount of token0 to deposit"),
                "amount1Desired": amount_schema("Desired amount of token1 to deposit"),
                "tickLower": {
                    "type": "integer",
                    "description": "Lower tick of the position, aligned to the pool's tick spacing",
                },
                "tickUpper": {
                    "type": "integer",
                    "description": "Upper tick of the position, aligned to the pool's tick spacing",
                },
                "slippageTolerance": {
                    "type": "integer",
                    "description": "Maximum allowed slippage in bips (1 = 0.01%)",
                },
            },
            "required": [
                "token0", "token1", "fee", "amount0Desired", "amount1Desired",
                "tickLower", "tickUpper", "slippageTolerance",
            ],
        })
    }

    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<Value, UniswapError> {
        let params: AddLiquidityParams = serde_json::from_value(params)?;
        let outcome = ctx.executor.add_liquidity(&params).await?;
        Ok(serde_json::to_value(outcome)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_matches_params_type() {
        let sample = json!({
            "token0": {
                "address": "0x0000000000000000000000000000000000000001",
                "decimals": 6, "symbol": "USDC", "name": "USD Coin",
            },
            "token1": {
                "address": "0x0000000000000000000000000000000000000002",
                "decimals": 18, "symbol": "WETH", "name": "Wrapped Ether",
            },
            "fee": 500,
            "amount0Desired": "1000000",
            "amount1Desired": "500000000000000000",
            "tickLower": -600,
            "tickUpper": 600,
            "slippageTolerance": 50,
        });
        let params: AddLiquidityParams = serde_json::from_value(sample).unwrap();
        assert_eq!(params.fee, 500);
        assert!(params.validate().is_ok());
    }
}
