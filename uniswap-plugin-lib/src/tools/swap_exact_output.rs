use async_trait::async_trait;
use serde_json::{Value, json};
use uniswap_runtime::UniswapError;
use uniswap_runtime::params::SwapExactOutputParams;

use super::{amount_schema, token_schema};
use crate::tool::{AgentTool, ToolContext};

/// Single-pool exact-output swap.
pub struct SwapExactOutputTool;

#[async_trait]
impl AgentTool for SwapExactOutputTool {
    fn name(&self) -> &'static str {
        "uniswap_swap_exact_output"
    }

    fn description(&self) -> &'static str {
        "Swap as little of an input token as possible for an exact amount of an output token"
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
                "amountOut": amount_schema("Exact amount of the output token to receive"),
                "amountInMaximum": amount_schema("Maximum amount of the input token to spend"),
                "sqrtPriceLimitX96": {
                    "type": "string",
                    "description": "Optional Q64.96 price limit; 0 or omitted for no limit",
                },
            },
            "required": ["tokenIn", "tokenOut", "fee", "amountOut", "amountInMaximum"],
        })
    }

    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<Value, UniswapError> {
        let params: SwapExactOutputParams = serde_json::from_value(params)?;
        let outcome = ctx.executor.swap_exact_output(&params).await?;
        Ok(serde_json::to_value(outcome)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_matches_params_type() {
        let sample = json!({
            "tokenIn": {
                "address": "0x0000000000000000000000000000000000000001",
                "decimals": 6, "symbol": "USDC", "name": "USD Coin",
            },
            "tokenOut": {
                "address": "0x0000000000000000000000000000000000000002",
                "decimals": 18, "symbol": "WETH", "name": "Wrapped Ether",
            },
            "fee": 3000,
            "amountOut": "500000000000000000",
            "amountInMaximum": "2000000000",
            "sqrtPriceLimitX96": "79228162514264337593543950336",
        });
        let params: SwapExactOutputParams = serde_json::from_value(sample).unwrap();
        assert!(params.sqrt_price_limit_x96.is_some());
        assert!(params.validate().is_ok());
    }
}
