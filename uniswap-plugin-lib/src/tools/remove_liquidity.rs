use async_trait::async_trait;
use serde_json::{Value, json};
use uniswap_runtime::UniswapError;
use uniswap_runtime::params::RemoveLiquidityParams;

use super::amount_schema;
use crate::tool::{AgentTool, ToolContext};

/// Decrease liquidity on an owned position and collect the proceeds.
pub struct RemoveLiquidityTool;

#[async_trait]
impl AgentTool for RemoveLiquidityTool {
    fn name(&self) -> &'static str {
        "uniswap_remove_liquidity"
    }

    fn description(&self) -> &'static str {
        "Remove liquidity from an existing Uniswap V3 position and collect the withdrawn tokens and accrued fees"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "tokenId": {
                    "type": "integer",
                    "description": "NFT token ID of the position",
                },
                "liquidity": amount_schema("Amount of liquidity to remove"),
                "slippageTolerance": {
                    "type": "integer",
                    "description": "Maximum allowed slippage percentage (0-100)",
                },
            },
            "required": ["tokenId", "liquidity", "slippageTolerance"],
        })
    }

    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<Value, UniswapError> {
        let params: RemoveLiquidityParams = serde_json::from_value(params)?;
        let outcome = ctx.executor.remove_liquidity(&params).await?;
        Ok(serde_json::to_value(outcome)?)
    }
}
