use async_trait::async_trait;
use serde_json::{Value, json};
use uniswap_runtime::UniswapError;
use uniswap_runtime::params::SwapExactInputParams;

use super::{amount_schema, token_schema};
use crate::tool::{AgentTool, ToolContext};

/// Single-pool exact-input swap.
pub struct SwapExactInputTool;

#[async_trait]
impl AgentTool for SwapExactInputTool {
    fn name(&self) -> &'static str {
        "uniswap_swap_exact_input"
    }

    fn description(&self) -> &'static str {
        "Swap an exact amount of an input token for as much of an output token as possible"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "tokenIn": token_schema("The token being sold"),
                "tokenOut": token_schema("The token being bought"),
                "fee": {
                    "type": "integer",
                    "enum": [100, 500, 3000, 10000],
                    "description": "Fee tier of the pool to swap through",
                },
                "amountIn": amount_schema("Exact amount of the input token to sell"),
                "amountOutMinimum": amount_schema("Minimum acceptable amount of the output token"),
                "sqrtPriceLimitX96": {
                    "type": "string",
                    "description": "Optional Q64.96 price limit; 0 or omitted for no limit",
                },
            },
            "required": ["tokenIn", "tokenOut", "fee", "amountIn", "amountOutMinimum"],
        })
    }

    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<Value, UniswapError> {
        let params: SwapExactInputParams = serde_json::from_value(params)?;
        let outcome = ctx.executor.swap_exact_input(&params).await?;
        Ok(serde_json::to_value(outcome)?)
    }
}
