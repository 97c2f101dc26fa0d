//! Tool-modular Uniswap V3 plugin.
//!
//! Each on-chain operation is encapsulated as an [`AgentTool`] that carries
//! its own JSON parameter schema and dispatches into the runtime executor.
//! An LLM host lists the registry, presents the schemas to the model, and
//! routes tool calls back through [`UniswapPlugin::dispatch`].

pub mod plugin;
pub mod tool;
pub mod tools;

pub use plugin::{PluginConfig, UniswapPlugin, WalletBackend};
pub use tool::{AgentTool, ToolContext, ToolRegistry, registry};
