//! Uniswap V3 runtime: parameter validation, calldata encoding, subgraph
//! reads, and transaction submission through pluggable wallets.
//!
//! The [`UniswapExecutor`] is the single entry point an agent host needs; the
//! lower-level modules (encoders, chain client, subgraph client) are public
//! for callers that want to compose their own pipeline.

pub mod cache;
pub mod chain;
pub mod contracts;
pub mod encoders;
pub mod error;
pub mod executor;
pub mod params;
pub mod subgraph;
pub mod types;
pub mod wallet;

pub use error::UniswapError;
pub use executor::UniswapExecutor;
pub use types::*;
