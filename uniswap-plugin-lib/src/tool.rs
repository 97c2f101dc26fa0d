//! The tool trait and registry.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde_json::Value;
use uniswap_runtime::{UniswapError, UniswapExecutor};

use crate::tools;

/// Shared state handed to every tool invocation.
#[derive(Clone)]
pub struct ToolContext {
    pub executor: Arc<UniswapExecutor>,
}

/// Trait implemented by each agent-facing operation.
///
/// Tools are zero-size structs that return `&'static str` constants plus a
/// JSON-schema parameter description. Adding an operation means implementing
/// this trait and registering the tool in [`ToolRegistry::with_builtins`].
#[async_trait]
pub trait AgentTool: Send + Sync {
    /// Tool identifier presented to the model, e.g. `"uniswap_swap_exact_input"`.
    fn name(&self) -> &'static str;

    /// One-sentence description presented to the model.
    fn description(&self) -> &'static str;

    /// JSON schema for the tool's parameters.
    fn parameters(&self) -> Value;

    /// Deserialize `params`, run the operation, and serialize the result.
    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<Value, UniswapError>;
}

/// Registry of all known tools.
pub struct ToolRegistry {
    tools: HashMap<&'static str, Box<dyn AgentTool>>,
}

impl ToolRegistry {
    fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Panics on duplicate names (programming error).
    pub fn register(&mut self, tool: Box<dyn AgentTool>) {
        let name = tool.name();
        if self.tools.contains_key(name) {
            panic!("Duplicate tool name: {name}");
        }
        self.tools.insert(name, tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn AgentTool> {
        self.tools.get(name).map(|b| b.as_ref())
    }

    /// All tool names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.tools.keys().copied().collect();
        names.sort();
        names
    }

    /// All tools.
    pub fn all(&self) -> Vec<&dyn AgentTool> {
        self.tools.values().map(|b| b.as_ref()).collect()
    }

    /// Build a registry with all built-in tools.
    fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register(Box::new(tools::add_liquidity::AddLiquidityTool));
        reg.register(Box::new(tools::remove_liquidity::RemoveLiquidityTool));
        reg.register(Box::new(tools::collect_fees::CollectFeesTool));
        reg.register(Box::new(tools::get_positions::GetPositionsTool));
        reg.register(Box::new(tools::get_pool_info::GetPoolInfoTool));
        reg.register(Box::new(tools::scan_pools::ScanPoolsTool));
        reg.register(Box::new(tools::swap_exact_input::SwapExactInputTool));
        reg.register(Box::new(tools::swap_exact_output::SwapExactOutputTool));
        reg.register(Box::new(tools::swap_and_add_liquidity::SwapAndAddLiquidityTool));
        reg
    }
}

static REGISTRY: OnceLock<ToolRegistry> = OnceLock::new();

/// Get the global tool registry (lazily initialized with all built-in tools
/// on first access).
pub fn registry() -> &'static ToolRegistry {
    REGISTRY.get_or_init(ToolRegistry::with_builtins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_all_builtin_tools() {
        let reg = registry();
        let names = reg.names();
        for expected in &[
            "uniswap_add_liquidity",
            "uniswap_remove_liquidity",
            "uniswap_collect_fees",
            "uniswap_get_positions",
            "uniswap_get_pool_info",
            "uniswap_scan_pools",
            "uniswap_swap_exact_input",
            "uniswap_swap_exact_output",
            "uniswap_swap_and_add_liquidity",
        ] {
            assert!(names.contains(expected), "missing tool {expected}");
        }
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn test_every_tool_has_description_and_object_schema() {
        for tool in registry().all() {
            assert!(!tool.description().is_empty(), "{}", tool.name());
            let schema = tool.parameters();
            assert_eq!(
                schema.get("type").and_then(Value::as_str),
                Some("object"),
                "{} schema must be an object",
                tool.name()
            );
            assert!(schema.get("properties").is_some(), "{}", tool.name());
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let reg = registry();
        assert!(reg.get("uniswap_add_liquidity").is_some());
        assert!(reg.get("uniswap_launch_rocket").is_none());
    }
}
