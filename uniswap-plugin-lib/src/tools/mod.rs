//! One module per agent-facing operation.

pub mod add_liquidity;
pub mod collect_fees;
pub mod get_pool_info;
pub mod get_positions;
pub mod remove_liquidity;
pub mod scan_pools;
pub mod swap_and_add_liquidity;
pub mod swap_exact_input;
pub mod swap_exact_output;

use serde_json::{Value, json};

/// JSON schema for a token argument (address plus display metadata).
pub(crate) fn token_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "description": description,
        "properties": {
            "address": { "type": "string", "description": "Token contract address" },
            "decimals": { "type": "integer", "description": "Token decimals" },
            "symbol": { "type": "string", "description": "Token symbol" },
            "name": { "type": "string", "description": "Token name" },
        },
        "required": ["address", "decimals", "symbol", "name"],
    })
}

pub(crate) fn amount_schema(description: &str) -> Value {
    json!({
        "type": "string",
        "description": format!("{description}, as a decimal string in base units"),
    })
}
