use async_trait::async_trait;
use serde_json::{Value, json};
use uniswap_runtime::UniswapError;
use uniswap_runtime::params::SwapAndAddLiquidityParams;

use super::amount_schema;
use crate::tool::{AgentTool, ToolContext};

/// Mint into a pair's pool, resolving the pool and fee tier from on-chain
/// data instead of taking the tier as a parameter.
pub struct SwapAndAddLiquidityTool;

#[async_trait]
impl AgentTool for SwapAndAddLiquidityTool {
    fn name(&self) -> &'static str {
        "uniswap_swap_and_add_liquidity"
    }

    fn description(&self) -> &'static str {
        "Add liquidity to the pool for a token pair, resolving the pool and its fee tier automatically"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "token0Address": {
                    "type": "string",
                    "description": "Contract address of the first token in the pair",
                },
                "token1Address": {
                    "type": "string",
                    "description": "Contract address of the second token in the pair",
                },
                "amount0Desired": amount_schema("Desired amount of the first token to deposit"),
                "amount1Desired": amount_schema("Desired amount of the second token to deposit"),
                "tickLower": {
                    "type": "integer",
                    "description": "Lower tick of the position",
                },
                "tickUpper": {
                    "type": "integer",
                    "description": "Upper tick of the position",
                },
                "slippageTolerance": {
                    "type": "integer",
                    "description": "Maximum allowed slippage in bips (1 = 0.01%)",
                },
            },
            "required": [
                "token0Address", "token1Address", "amount0Desired", "amount1Desired",
                "tickLower", "tickUpper", "slippageTolerance",
            ],
        })
    }

    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<Value, UniswapError> {
        let params: SwapAndAddLiquidityParams = serde_json::from_value(params)?;
        let outcome = ctx.executor.swap_and_add_liquidity(&params).await?;
        Ok(serde_json::to_value(outcome)?)
    }
}
