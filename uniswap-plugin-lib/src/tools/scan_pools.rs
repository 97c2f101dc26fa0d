use async_trait::async_trait;
use serde_json::{Value, json};
use uniswap_runtime::UniswapError;
use uniswap_runtime::params::ScanPoolsParams;

use crate::tool::{AgentTool, ToolContext};

/// Search pools by fee yield or creation time.
pub struct ScanPoolsTool;

#[async_trait]
impl AgentTool for ScanPoolsTool {
    fn name(&self) -> &'static str {
        "uniswap_scan_pools"
    }

    fn description(&self) -> &'static str {
        "Scan Uniswap V3 pools by fee yield or creation time to find liquidity-provision opportunities"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "minLiquidity": {
                    "type": "number",
                    "description": "Minimum accumulated fees in USD",
                },
                "minVolume24h": {
                    "type": "number",
                    "description": "Minimum volume in USD",
                },
                "minFeeAPR": {
                    "type": "number",
                    "description": "Minimum annualized fee APR percentage",
                },
                "token0": {
                    "type": "string",
                    "description": "Restrict to pools whose first token is this address",
                },
                "token1": {
                    "type": "string",
                    "description": "Restrict to pools whose second token is this address",
                },
                "order": {
                    "type": "string",
                    "enum": ["fees", "newest"],
                    "description": "Sort by highest accumulated fees (default) or most recently created",
                },
            },
            "required": [],
        })
    }

    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<Value, UniswapError> {
        let params: ScanPoolsParams = serde_json::from_value(params)?;
        let pools = ctx.executor.scan_pools(&params).await?;
        Ok(serde_json::to_value(pools)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uniswap_runtime::params::PoolOrder;

    #[test]
    fn test_schema_matches_params_type() {
        let sample = json!({
            "minVolume24h": 100000.0,
            "order": "newest",
        });
        let params: ScanPoolsParams = serde_json::from_value(sample).unwrap();
        assert!(matches!(params.order, PoolOrder::Newest));
        assert_eq!(params.min_fee_apr, 0.0);
    }
}
