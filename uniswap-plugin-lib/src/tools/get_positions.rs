use async_trait::async_trait;
use serde_json::{Value, json};
use uniswap_runtime::UniswapError;

use crate::tool::{AgentTool, ToolContext};

/// List the wallet's liquidity positions.
pub struct GetPositionsTool;

#[async_trait]
impl AgentTool for GetPositionsTool {
    fn name(&self) -> &'static str {
        "uniswap_get_positions"
    }

    fn description(&self) -> &'static str {
        "Get all Uniswap V3 liquidity positions owned by the wallet"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": [],
        })
    }

    async fn call(&self, ctx: &ToolContext, _params: Value) -> Result<Value, UniswapError> {
        let positions = ctx.executor.get_positions().await?;
        Ok(serde_json::to_value(positions)?)
    }
}
