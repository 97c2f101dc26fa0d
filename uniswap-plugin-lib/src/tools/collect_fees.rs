use async_trait::async_trait;
use serde_json::{Value, json};
use uniswap_runtime::UniswapError;
use uniswap_runtime::params::CollectFeesParams;

use crate::tool::{AgentTool, ToolContext};

/// Sweep accrued fees from an owned position.
pub struct CollectFeesTool;

#[async_trait]
impl AgentTool for CollectFeesTool {
    fn name(&self) -> &'static str {
        "uniswap_collect_fees"
    }

    fn description(&self) -> &'static str {
        "Collect all accumulated fees from a Uniswap V3 position"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "tokenId": {
                    "type": "integer",
                    "description": "NFT token ID of the position",
                },
            },
            "required": ["tokenId"],
        })
    }

    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<Value, UniswapError> {
        let params: CollectFeesParams = serde_json::from_value(params)?;
        let outcome = ctx.executor.collect_fees(&params).await?;
        Ok(serde_json::to_value(outcome)?)
    }
}
