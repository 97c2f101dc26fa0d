use async_trait::async_trait;
use serde_json::{Value, json};
use uniswap_runtime::UniswapError;
use uniswap_runtime::params::PoolInfoParams;

use crate::tool::{AgentTool, ToolContext};

/// Look up the pool for a token pair.
pub struct GetPoolInfoTool;

#[async_trait]
impl AgentTool for GetPoolInfoTool {
    fn name(&self) -> &'static str {
        "uniswap_get_pool_info"
    }

    fn description(&self) -> &'static str {
        "Get current price, liquidity, and volume statistics for the Uniswap V3 pool of a token pair"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "token0Address": {
                    "type": "string",
                    "description": "Contract address of the first token",
                },
                "token1Address": {
                    "type": "string",
                    "description": "Contract address of the second token",
                },
            },
            "required": ["token0Address", "token1Address"],
        })
    }

    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<Value, UniswapError> {
        let params: PoolInfoParams = serde_json::from_value(params)?;
        let pool = ctx.executor.get_pool_info(&params).await?;
        Ok(serde_json::to_value(pool)?)
    }
}
