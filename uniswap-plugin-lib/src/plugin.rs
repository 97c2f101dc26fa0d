//! Plugin assembly: configuration in, ready-to-dispatch tool surface out.

use std::sync::Arc;

use alloy::primitives::Address;
use serde_json::Value;
use tracing::info;
use uniswap_runtime::chain::ChainClient;
use uniswap_runtime::contracts::SUPPORTED_CHAINS;
use uniswap_runtime::subgraph::{DEFAULT_SUBGRAPH_URL, SubgraphClient};
use uniswap_runtime::wallet::{LocalWallet, SmartWalletClient, WalletClient};
use uniswap_runtime::{UniswapError, UniswapExecutor};

use crate::tool::{ToolContext, registry};

/// Which wallet submits transactions.
pub enum WalletBackend {
    /// Sign locally with a raw private key.
    Local { private_key: String },
    /// Delegate signing to a custody smart-wallet API.
    Smart {
        base_url: String,
        api_key: String,
        wallet_address: Address,
    },
}

pub struct PluginConfig {
    pub rpc_url: String,
    /// Defaults to the hosted Uniswap V3 subgraph when unset.
    pub subgraph_url: Option<String>,
    pub chain_id: Option<u64>,
    pub wallet: WalletBackend,
}

/// The assembled plugin: one executor shared by every registered tool.
pub struct UniswapPlugin {
    executor: Arc<UniswapExecutor>,
}

impl std::fmt::Debug for UniswapPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniswapPlugin").finish_non_exhaustive()
    }
}

impl UniswapPlugin {
    pub fn supports_chain(chain_id: u64) -> bool {
        SUPPORTED_CHAINS.contains(&chain_id)
    }

    pub fn new(config: PluginConfig) -> Result<Self, UniswapError> {
        let chain_id = config.chain_id.ok_or(UniswapError::ChainIdRequired)?;
        if !Self::supports_chain(chain_id) {
            return Err(UniswapError::ConfigError(format!(
                "chain {chain_id} is not supported (expected one of {SUPPORTED_CHAINS:?})"
            )));
        }

        let chain = ChainClient::new(&config.rpc_url, chain_id)?;
        let wallet: Arc<dyn WalletClient> = match config.wallet {
            WalletBackend::Local { private_key } => Arc::new(LocalWallet::new(
                &config.rpc_url,
                &private_key,
                chain_id,
            )?),
            WalletBackend::Smart {
                base_url,
                api_key,
                wallet_address,
            } => Arc::new(SmartWalletClient::new(
                base_url,
                api_key,
                wallet_address,
                chain_id,
            )),
        };
        let subgraph = SubgraphClient::new(
            config
                .subgraph_url
                .unwrap_or_else(|| DEFAULT_SUBGRAPH_URL.to_string()),
        );

        let executor = Arc::new(UniswapExecutor::new(chain, wallet, subgraph)?);
        info!(
            chain_id,
            wallet = %executor.wallet_address(),
            "Uniswap plugin ready"
        );
        Ok(Self { executor })
    }

    pub fn context(&self) -> ToolContext {
        ToolContext {
            executor: self.executor.clone(),
        }
    }

    /// Route a tool call by name. Unknown names are a parameter error, not a
    /// panic; the model chose the name.
    pub async fn dispatch(&self, name: &str, params: Value) -> Result<Value, UniswapError> {
        let tool = registry()
            .get(name)
            .ok_or_else(|| UniswapError::InvalidParameter(format!("unknown tool '{name}'")))?;
        info!(tool = name, "Dispatching tool call");
        tool.call(&self.context(), params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Hardhat account #0; never holds real funds.
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn local_config(chain_id: Option<u64>) -> PluginConfig {
        PluginConfig {
            rpc_url: "http://localhost:8545".into(),
            subgraph_url: None,
            chain_id,
            wallet: WalletBackend::Local {
                private_key: TEST_KEY.into(),
            },
        }
    }

    #[test]
    fn test_supported_chains() {
        assert!(UniswapPlugin::supports_chain(1));
        assert!(UniswapPlugin::supports_chain(8453));
        assert!(!UniswapPlugin::supports_chain(56));
    }

    #[test]
    fn test_missing_chain_id_is_rejected() {
        let err = UniswapPlugin::new(local_config(None)).unwrap_err();
        assert!(matches!(err, UniswapError::ChainIdRequired));
        assert_eq!(err.to_string(), "Chain ID is required");
    }

    #[test]
    fn test_unsupported_chain_is_rejected() {
        let err = UniswapPlugin::new(local_config(Some(56))).unwrap_err();
        assert!(matches!(err, UniswapError::ConfigError(_)));
    }

    #[test]
    fn test_plugin_builds_for_supported_chain() {
        let plugin = UniswapPlugin::new(local_config(Some(84532))).unwrap();
        assert_eq!(plugin.context().executor.chain_id(), 84532);
    }

    #[tokio::test]
    async fn test_dispatch_rejects_unknown_tool() {
        let plugin = UniswapPlugin::new(local_config(Some(84532))).unwrap();
        let err = plugin
            .dispatch("uniswap_launch_rocket", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, UniswapError::InvalidParameter(_)));
    }
}
