//! Wallet abstraction for transaction submission.
//!
//! Operations build an [`EncodedTransaction`] and hand it to a
//! [`WalletClient`]; the two implementations submit either directly with a
//! local signer, or through a custody API that manages a smart wallet.

use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::Address;
use alloy::providers::fillers::{
    BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller,
};
use alloy::providers::{Identity, Provider, ProviderBuilder, RootProvider};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::UniswapError;
use crate::types::{EncodedTransaction, TxOutcome};

/// The concrete provider type produced by `ProviderBuilder::new().wallet(...).connect_http(...)`.
pub type SigningProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider<Ethereum>,
    Ethereum,
>;

/// Submits prepared transactions on behalf of the agent.
///
/// `send_transaction` resolves once the transaction is confirmed; callers
/// that sequence dependent calls (decrease then collect) rely on this.
#[async_trait]
pub trait WalletClient: Send + Sync {
    fn address(&self) -> Address;
    fn chain_id(&self) -> u64;
    async fn send_transaction(&self, tx: &EncodedTransaction) -> Result<TxOutcome, UniswapError>;
}

/// Wallet backed by a local private key and an alloy signing provider.
pub struct LocalWallet {
    provider: SigningProvider,
    address: Address,
    chain_id: u64,
}

impl LocalWallet {
    /// Create a wallet from an RPC URL and hex-encoded private key
    /// (with or without "0x" prefix).
    pub fn new(rpc_url: &str, private_key: &str, chain_id: u64) -> Result<Self, UniswapError> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| UniswapError::ConfigError(format!("Invalid private key: {e}")))?;
        let address = signer.address();
        let wallet = EthereumWallet::from(signer);

        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| UniswapError::ConfigError(format!("Invalid RPC URL: {e}")))?;

        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

        Ok(Self {
            provider,
            address,
            chain_id,
        })
    }
}

#[async_trait]
impl WalletClient for LocalWallet {
    fn address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn send_transaction(&self, tx: &EncodedTransaction) -> Result<TxOutcome, UniswapError> {
        let request = alloy::rpc::types::TransactionRequest::default()
            .to(tx.to)
            .input(tx.data.clone().into())
            .value(tx.value);

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| UniswapError::WalletError(format!("Transaction send failed: {e}")))?;

        let tx_hash = format!("0x{}", hex::encode(pending.tx_hash().as_slice()));
        debug!(tx_hash = %tx_hash, "Transaction submitted, awaiting receipt");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| UniswapError::WalletError(format!("Receipt fetch failed: {e}")))?;

        info!(tx_hash = %tx_hash, block = ?receipt.block_number, "Transaction confirmed");

        Ok(TxOutcome {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: Some(receipt.gas_used.into()),
        })
    }
}

/// Wallet backed by a custody API managing an EVM smart wallet.
///
/// The signer key never leaves the custody service; we submit prepared
/// calldata and poll until the service reports the transaction on-chain.
pub struct SmartWalletClient {
    base_url: String,
    api_key: String,
    wallet_address: Address,
    chain_id: u64,
    client: reqwest::Client,
}

/// Response from the custody wallet-creation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedWallet {
    pub address: Address,
    #[serde(rename = "type")]
    pub wallet_type: String,
}

#[derive(Debug, Deserialize)]
struct SubmittedTransaction {
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default, rename = "onChain")]
    on_chain: Option<OnChainInfo>,
}

#[derive(Debug, Deserialize)]
struct OnChainInfo {
    #[serde(rename = "txId")]
    tx_id: Option<String>,
}

impl SmartWalletClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        wallet_address: Address,
        chain_id: u64,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            wallet_address,
            chain_id,
            client: reqwest::Client::new(),
        }
    }

    /// Custody chain identifier for a chain ID.
    pub fn chain_name(chain_id: u64) -> Result<&'static str, UniswapError> {
        match chain_id {
            1 => Ok("ethereum"),
            10 => Ok("optimism"),
            137 => Ok("polygon"),
            8453 => Ok("base"),
            42161 => Ok("arbitrum"),
            84532 => Ok("base-sepolia"),
            other => Err(UniswapError::ConfigError(format!(
                "No custody chain name for chain ID {other}"
            ))),
        }
    }

    /// Provision a new smart wallet administered by `admin_signer`.
    pub async fn create_wallet(
        base_url: &str,
        api_key: &str,
        admin_signer: Address,
    ) -> Result<CreatedWallet, UniswapError> {
        let client = reqwest::Client::new();
        let response = client
            .post(format!("{base_url}/api/v1-alpha2/wallets"))
            .header("X-API-KEY", api_key)
            .json(&json!({
                "type": "evm-smart-wallet",
                "config": {
                    "adminSigner": {
                        "type": "evm-keypair",
                        "address": admin_signer,
                    },
                },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UniswapError::WalletError(format!("API error: {body}")));
        }
        Ok(response.json().await?)
    }

    async fn poll_transaction(&self, id: &str) -> Result<SubmittedTransaction, UniswapError> {
        let url = format!(
            "{}/api/v1-alpha2/wallets/{}/transactions/{id}",
            self.base_url, self.wallet_address
        );
        let response = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .send()
            .await?;
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UniswapError::WalletError(format!("API error: {body}")));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl WalletClient for SmartWalletClient {
    fn address(&self) -> Address {
        self.wallet_address
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn send_transaction(&self, tx: &EncodedTransaction) -> Result<TxOutcome, UniswapError> {
        let chain = Self::chain_name(self.chain_id)?;
        let url = format!(
            "{}/api/v1-alpha2/wallets/{}/transactions",
            self.base_url, self.wallet_address
        );

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({
                "params": {
                    "chain": chain,
                    "calls": [{
                        "to": tx.to,
                        "value": tx.value.to_string(),
                        "data": tx.data,
                    }],
                },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UniswapError::WalletError(format!("API error: {body}")));
        }
        let mut submitted: SubmittedTransaction = response.json().await?;
        debug!(id = %submitted.id, "Custody transaction accepted");

        while submitted.status != "success" {
            if submitted.status == "failed" {
                return Err(UniswapError::WalletError(format!(
                    "Custody transaction {} failed",
                    submitted.id
                )));
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
            submitted = self.poll_transaction(&submitted.id).await?;
        }

        let tx_hash = submitted
            .on_chain
            .and_then(|o| o.tx_id)
            .ok_or_else(|| UniswapError::WalletError("Missing on-chain tx hash".into()))?;

        info!(tx_hash = %tx_hash, "Custody transaction confirmed");

        Ok(TxOutcome {
            tx_hash,
            block_number: None,
            gas_used: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Bytes, U256};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_WALLET: &str = "0x00000000000000000000000000000000000000Aa";

    #[test]
    fn test_local_wallet_creation() {
        // Well-known test private key (Hardhat account #0).
        let private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let wallet = LocalWallet::new("http://localhost:8545", private_key, 84532);
        assert!(wallet.is_ok());
        assert_eq!(wallet.unwrap().chain_id(), 84532);
    }

    #[test]
    fn test_local_wallet_invalid_key() {
        assert!(LocalWallet::new("http://localhost:8545", "not-a-key", 1).is_err());
    }

    #[test]
    fn test_chain_name_mapping() {
        assert_eq!(SmartWalletClient::chain_name(84532).unwrap(), "base-sepolia");
        assert_eq!(SmartWalletClient::chain_name(8453).unwrap(), "base");
        assert!(SmartWalletClient::chain_name(99999).is_err());
    }

    #[tokio::test]
    async fn test_create_wallet() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1-alpha2/wallets"))
            .and(header("X-API-KEY", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": TEST_WALLET,
                "type": "evm-smart-wallet",
            })))
            .mount(&server)
            .await;

        let signer: Address = "0x0000000000000000000000000000000000000001".parse().unwrap();
        let created = SmartWalletClient::create_wallet(&server.uri(), "test-key", signer)
            .await
            .unwrap();
        assert_eq!(created.address, TEST_WALLET.parse::<Address>().unwrap());
        assert_eq!(created.wallet_type, "evm-smart-wallet");
    }

    #[tokio::test]
    async fn test_create_wallet_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1-alpha2/wallets"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid signer",
            })))
            .mount(&server)
            .await;

        let signer: Address = "0x0000000000000000000000000000000000000001".parse().unwrap();
        let result = SmartWalletClient::create_wallet(&server.uri(), "test-key", signer).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_smart_wallet_send_transaction() {
        let server = MockServer::start().await;
        let wallet_addr: Address = TEST_WALLET.parse().unwrap();

        Mock::given(method("POST"))
            .and(path(format!(
                "/api/v1-alpha2/wallets/{wallet_addr}/transactions"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "tx-1",
                "status": "success",
                "onChain": { "txId": "0xabc123" },
            })))
            .mount(&server)
            .await;

        let wallet = SmartWalletClient::new(server.uri(), "test-key", wallet_addr, 84532);
        let tx = EncodedTransaction {
            to: "0x0000000000000000000000000000000000000002".parse().unwrap(),
            data: Bytes::from(vec![0x12, 0x34]),
            value: U256::ZERO,
        };
        let outcome = wallet.send_transaction(&tx).await.unwrap();
        assert_eq!(outcome.tx_hash, "0xabc123");
    }
}
