use thiserror::Error;

#[derive(Error, Debug)]
pub enum UniswapError {
    #[error("Chain ID is required")]
    ChainIdRequired,

    #[error("Pool not found")]
    PoolNotFound,

    #[error("Position {0} not found")]
    PositionNotFound(u64),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Encoding error in {operation}: {message}")]
    EncodingError { operation: String, message: String },

    #[error("Subgraph error: {0}")]
    SubgraphError(String),

    #[error("Wallet error: {0}")]
    WalletError(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),
}

impl From<reqwest::Error> for UniswapError {
    fn from(e: reqwest::Error) -> Self {
        UniswapError::HttpError(e.to_string())
    }
}

impl From<serde_json::Error> for UniswapError {
    fn from(e: serde_json::Error) -> Self {
        UniswapError::SerializationError(e.to_string())
    }
}
