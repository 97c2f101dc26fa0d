//! GraphQL client for the Uniswap V3 subgraph.
//!
//! Read queries (pool scans, pool lookups, positions by owner) go through
//! here. Scan results are cached for five minutes; position lookups are
//! always fresh.

use alloy::primitives::Address;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::cache::TtlCache;
use crate::error::UniswapError;
use crate::params::{PoolOrder, ScanPoolsParams};
use crate::types::{PoolSnapshot, PoolStats, PositionDetail, TokenInfo};

/// Hosted subgraph endpoint used when none is configured.
pub const DEFAULT_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/uniswap/uniswap-v3-base";

const POOL_FIELDS: &str = "\
id
token0 { id symbol decimals name }
token1 { id symbol decimals name }
feeTier
liquidity
volumeUSD
feesUSD
txCount";

const SNAPSHOT_FIELDS: &str = "\
id
token0 { id symbol decimals name }
token1 { id symbol decimals name }
feeTier
liquidity
sqrtPrice
tick
token0Price
token1Price
volumeUSD
feesUSD";

const POSITIONS_QUERY: &str = r"
query getPositions($owner: String!) {
    positions(where: { owner: $owner }) {
        id
        owner
        liquidity
        depositedToken0
        depositedToken1
        withdrawnToken0
        withdrawnToken1
        collectedFeesToken0
        collectedFeesToken1
        token0 { id symbol decimals name }
        token1 { id symbol decimals name }
        tickLower { tickIdx }
        tickUpper { tickIdx }
    }
}";

pub struct SubgraphClient {
    endpoint: String,
    client: reqwest::Client,
    cache: TtlCache<Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PoolsData {
    pools: Vec<RawPool>,
}

#[derive(Debug, Deserialize)]
struct PositionsData {
    #[serde(default)]
    positions: Vec<RawPosition>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawToken {
    id: Address,
    symbol: String,
    decimals: String,
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPool {
    id: Address,
    token0: RawToken,
    token1: RawToken,
    fee_tier: String,
    liquidity: String,
    #[serde(rename = "volumeUSD")]
    volume_usd: String,
    #[serde(rename = "feesUSD")]
    fees_usd: String,
    #[serde(default)]
    tx_count: Option<String>,
    #[serde(default)]
    sqrt_price: Option<String>,
    #[serde(default)]
    tick: Option<String>,
    #[serde(default)]
    token0_price: Option<String>,
    #[serde(default)]
    token1_price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTick {
    #[serde(rename = "tickIdx")]
    tick_idx: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPosition {
    id: String,
    owner: Address,
    liquidity: String,
    deposited_token0: String,
    deposited_token1: String,
    withdrawn_token0: String,
    withdrawn_token1: String,
    collected_fees_token0: String,
    collected_fees_token1: String,
    token0: RawToken,
    token1: RawToken,
    tick_lower: RawTick,
    tick_upper: RawTick,
}

impl SubgraphClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
            cache: TtlCache::default(),
        }
    }

    async fn query<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: Value,
    ) -> Result<T, UniswapError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": document, "variables": variables }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UniswapError::SubgraphError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: GraphQlResponse<T> = response.json().await?;
        if let Some(errors) = body.errors {
            return Err(UniswapError::SubgraphError(errors.to_string()));
        }
        body.data
            .ok_or_else(|| UniswapError::SubgraphError("Failed to fetch pool data".into()))
    }

    /// Pools above the fee/volume thresholds, optionally filtered by token
    /// pair, ordered by accumulated fees or creation time. Cached.
    pub async fn scan_pools(&self, params: &ScanPoolsParams) -> Result<Vec<PoolStats>, UniswapError> {
        let cache_key = format!(
            "scan-pools-{}-{}-{}-{:?}-{:?}-{:?}",
            params.min_liquidity,
            params.min_volume24h,
            params.min_fee_apr,
            params.token0,
            params.token1,
            params.order,
        );
        if let Some(cached) = self.cache.get(&cache_key) {
            debug!(key = %cache_key, "Subgraph cache hit");
            return Ok(serde_json::from_value(cached)?);
        }

        let document = scan_pools_document(params);
        let mut variables = json!({});
        if matches!(params.order, PoolOrder::Fees) {
            variables["minVolume"] = json!(params.min_volume24h);
            variables["minFees"] = json!(params.min_liquidity);
        }
        if let Some(token0) = params.token0 {
            variables["token0"] = json!(lowercase(token0));
        }
        if let Some(token1) = params.token1 {
            variables["token1"] = json!(lowercase(token1));
        }

        let data: PoolsData = self.query(&document, variables).await?;
        let mut pools = data
            .pools
            .into_iter()
            .map(pool_stats)
            .collect::<Result<Vec<_>, _>>()?;

        let min_apr = Decimal::try_from(params.min_fee_apr)
            .map_err(|e| UniswapError::InvalidParameter(format!("minFeeAPR: {e}")))?;
        pools.retain(|p| p.fee_apr >= min_apr);

        self.cache.insert(cache_key, serde_json::to_value(&pools)?);
        Ok(pools)
    }

    /// All positions owned by `owner`. Not cached; balances move with every
    /// transaction.
    pub async fn positions_by_owner(
        &self,
        owner: Address,
    ) -> Result<Vec<PositionDetail>, UniswapError> {
        let data: PositionsData = self
            .query(POSITIONS_QUERY, json!({ "owner": lowercase(owner) }))
            .await?;
        data.positions.into_iter().map(position_detail).collect()
    }

    /// The first pool for a token pair, or `None`.
    pub async fn pool_by_pair(
        &self,
        token0: Address,
        token1: Address,
    ) -> Result<Option<PoolSnapshot>, UniswapError> {
        let document = format!(
            "query getPool($token0: String!, $token1: String!) {{
    pools(where: {{ token0: $token0, token1: $token1 }}, first: 1) {{
{SNAPSHOT_FIELDS}
    }}
}}"
        );
        let data: PoolsData = self
            .query(
                &document,
                json!({ "token0": lowercase(token0), "token1": lowercase(token1) }),
            )
            .await?;
        data.pools.into_iter().next().map(pool_snapshot).transpose()
    }
}

fn scan_pools_document(params: &ScanPoolsParams) -> String {
    let mut args = Vec::new();
    let mut filters = Vec::new();
    // Freshly created pools report zero volume and fees; the `_gt` thresholds
    // would drop all of them, so they only apply to the fee-ordered scan.
    if matches!(params.order, PoolOrder::Fees) {
        args.push("$minVolume: Float!".to_string());
        args.push("$minFees: Float!".to_string());
        filters.push("volumeUSD_gt: $minVolume".to_string());
        filters.push("feesUSD_gt: $minFees".to_string());
    }
    if params.token0.is_some() {
        args.push("$token0: String".into());
        filters.push("token0: $token0".into());
    }
    if params.token1.is_some() {
        args.push("$token1: String".into());
        filters.push("token1: $token1".into());
    }
    let (order_by, first) = match params.order {
        PoolOrder::Fees => ("feesUSD", 50),
        PoolOrder::Newest => ("createdAtTimestamp", 20),
    };
    let arg_list = if args.is_empty() {
        String::new()
    } else {
        format!("({})", args.join(", "))
    };
    let where_clause = if filters.is_empty() {
        String::new()
    } else {
        format!("where: {{ {} }}, ", filters.join(", "))
    };
    format!(
        "query ScanPools{arg_list} {{
    pools({where_clause}orderBy: {order_by}, orderDirection: desc, first: {first}) {{
{POOL_FIELDS}
    }}
}}"
    )
}

fn lowercase(address: Address) -> String {
    format!("{address:#x}")
}

fn token_info(raw: RawToken) -> Result<TokenInfo, UniswapError> {
    let decimals: u8 = raw
        .decimals
        .parse()
        .map_err(|e| UniswapError::SubgraphError(format!("token decimals: {e}")))?;
    Ok(TokenInfo {
        address: raw.id,
        decimals,
        symbol: raw.symbol,
        name: raw.name,
    })
}

fn parse_usd(field: &str, raw: &str) -> Result<Decimal, UniswapError> {
    let value: f64 = raw
        .parse()
        .map_err(|e| UniswapError::SubgraphError(format!("{field}: {e}")))?;
    Decimal::try_from(value).map_err(|e| UniswapError::SubgraphError(format!("{field}: {e}")))
}

fn parse_num<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T, UniswapError>
where
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| UniswapError::SubgraphError(format!("{field}: {e}")))
}

fn pool_stats(raw: RawPool) -> Result<PoolStats, UniswapError> {
    let volume: f64 = parse_num("volumeUSD", &raw.volume_usd)?;
    let fees: f64 = parse_num("feesUSD", &raw.fees_usd)?;
    // Annualized: feesUSD * 365 / volumeUSD * 100. Zero-volume pools report
    // zero instead of dividing.
    let fee_apr = if volume == 0.0 {
        Decimal::ZERO
    } else {
        Decimal::try_from(fees * 365.0 / volume * 100.0)
            .map_err(|e| UniswapError::SubgraphError(format!("feeAPR: {e}")))?
    };
    Ok(PoolStats {
        pool_address: raw.id,
        token0: token_info(raw.token0)?,
        token1: token_info(raw.token1)?,
        fee_tier: parse_num("feeTier", &raw.fee_tier)?,
        liquidity: raw.liquidity,
        volume_usd: parse_usd("volumeUSD", &raw.volume_usd)?,
        fees_usd: parse_usd("feesUSD", &raw.fees_usd)?,
        fee_apr,
        tx_count: raw
            .tx_count
            .as_deref()
            .map(|t| parse_num("txCount", t))
            .transpose()?
            .unwrap_or(0),
    })
}

fn pool_snapshot(raw: RawPool) -> Result<PoolSnapshot, UniswapError> {
    Ok(PoolSnapshot {
        pool_address: raw.id,
        fee_tier: parse_num("feeTier", &raw.fee_tier)?,
        liquidity: raw.liquidity,
        sqrt_price: raw
            .sqrt_price
            .ok_or_else(|| UniswapError::SubgraphError("missing sqrtPrice".into()))?,
        tick: raw
            .tick
            .as_deref()
            .map(|t| parse_num("tick", t))
            .transpose()?
            .ok_or_else(|| UniswapError::SubgraphError("missing tick".into()))?,
        token0_price: raw.token0_price.unwrap_or_default(),
        token1_price: raw.token1_price.unwrap_or_default(),
        volume_usd: parse_usd("volumeUSD", &raw.volume_usd)?,
        fees_usd: parse_usd("feesUSD", &raw.fees_usd)?,
        token0: token_info(raw.token0)?,
        token1: token_info(raw.token1)?,
    })
}

fn position_detail(raw: RawPosition) -> Result<PositionDetail, UniswapError> {
    Ok(PositionDetail {
        id: raw.id,
        owner: raw.owner,
        liquidity: raw.liquidity,
        token0: token_info(raw.token0)?,
        token1: token_info(raw.token1)?,
        deposited_token0: raw.deposited_token0,
        deposited_token1: raw.deposited_token1,
        withdrawn_token0: raw.withdrawn_token0,
        withdrawn_token1: raw.withdrawn_token1,
        collected_fees_token0: raw.collected_fees_token0,
        collected_fees_token1: raw.collected_fees_token1,
        tick_lower: parse_num("tickLower", &raw.tick_lower.tick_idx)?,
        tick_upper: parse_num("tickUpper", &raw.tick_upper.tick_idx)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn raw_token_json(addr: &str, symbol: &str) -> Value {
        json!({
            "id": addr,
            "symbol": symbol,
            "decimals": "18",
            "name": symbol,
        })
    }

    fn scan_response() -> Value {
        json!({
            "data": {
                "pools": [{
                    "id": "0x1111111111111111111111111111111111111111",
                    "token0": raw_token_json("0x0000000000000000000000000000000000000001", "AAA"),
                    "token1": raw_token_json("0x0000000000000000000000000000000000000002", "BBB"),
                    "feeTier": "3000",
                    "liquidity": "123456789",
                    "volumeUSD": "1000000",
                    "feesUSD": "3000",
                    "txCount": "42",
                }]
            }
        })
    }

    fn default_scan_params() -> ScanPoolsParams {
        serde_json::from_value(json!({})).unwrap()
    }

    #[tokio::test]
    async fn test_scan_pools_parses_and_derives_apr() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(scan_response()))
            .mount(&server)
            .await;

        let client = SubgraphClient::new(server.uri());
        let pools = client.scan_pools(&default_scan_params()).await.unwrap();

        assert_eq!(pools.len(), 1);
        let pool = &pools[0];
        assert_eq!(pool.fee_tier, 3000);
        assert_eq!(pool.tx_count, 42);
        // 3000 * 365 / 1_000_000 * 100 = 109.5
        assert_eq!(pool.fee_apr, Decimal::try_from(109.5).unwrap());
    }

    #[tokio::test]
    async fn test_scan_pools_second_call_hits_cache() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(scan_response()))
            .expect(1)
            .mount(&server)
            .await;

        let client = SubgraphClient::new(server.uri());
        let first = client.scan_pools(&default_scan_params()).await.unwrap();
        let second = client.scan_pools(&default_scan_params()).await.unwrap();
        assert_eq!(first.len(), second.len());
    }

    #[tokio::test]
    async fn test_scan_pools_min_apr_filter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(scan_response()))
            .mount(&server)
            .await;

        let client = SubgraphClient::new(server.uri());
        let mut params = default_scan_params();
        params.min_fee_apr = 500.0; // above the fixture's 109.5
        let pools = client.scan_pools(&params).await.unwrap();
        assert!(pools.is_empty());
    }

    #[test]
    fn test_newest_scan_document_has_no_threshold_filters() {
        let mut params = default_scan_params();
        params.order = PoolOrder::Newest;
        let document = scan_pools_document(&params);
        assert!(!document.contains("volumeUSD_gt"));
        assert!(!document.contains("feesUSD_gt"));
        assert!(document.contains("orderBy: createdAtTimestamp"));
        assert!(document.contains("first: 20"));
    }

    #[test]
    fn test_fees_scan_document_keeps_threshold_filters() {
        let document = scan_pools_document(&default_scan_params());
        assert!(document.contains("volumeUSD_gt: $minVolume"));
        assert!(document.contains("feesUSD_gt: $minFees"));
        assert!(document.contains("orderBy: feesUSD"));
    }

    #[tokio::test]
    async fn test_newest_scan_includes_zero_volume_pools() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "pools": [{
                    "id": "0x2222222222222222222222222222222222222222",
                    "token0": raw_token_json("0x0000000000000000000000000000000000000001", "AAA"),
                    "token1": raw_token_json("0x0000000000000000000000000000000000000002", "BBB"),
                    "feeTier": "500",
                    "liquidity": "0",
                    "volumeUSD": "0",
                    "feesUSD": "0",
                    "txCount": "1",
                }]}
            })))
            .mount(&server)
            .await;

        let client = SubgraphClient::new(server.uri());
        let mut params = default_scan_params();
        params.order = PoolOrder::Newest;
        let pools = client.scan_pools(&params).await.unwrap();
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].fee_apr, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_pool_by_pair_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "pools": [] } })),
            )
            .mount(&server)
            .await;

        let client = SubgraphClient::new(server.uri());
        let pool = client
            .pool_by_pair(
                "0x0000000000000000000000000000000000000001".parse().unwrap(),
                "0x0000000000000000000000000000000000000002".parse().unwrap(),
            )
            .await
            .unwrap();
        assert!(pool.is_none());
    }

    #[tokio::test]
    async fn test_positions_by_owner_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "positions": [] } })),
            )
            .mount(&server)
            .await;

        let client = SubgraphClient::new(server.uri());
        let positions = client
            .positions_by_owner("0x0000000000000000000000000000000000000003".parse().unwrap())
            .await
            .unwrap();
        assert!(positions.is_empty());
    }

    #[tokio::test]
    async fn test_positions_by_owner_parses_ticks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "positions": [{
                    "id": "12345",
                    "owner": "0x0000000000000000000000000000000000000003",
                    "liquidity": "987654321",
                    "depositedToken0": "1000",
                    "depositedToken1": "2000",
                    "withdrawnToken0": "0",
                    "withdrawnToken1": "0",
                    "collectedFeesToken0": "10",
                    "collectedFeesToken1": "20",
                    "token0": raw_token_json("0x0000000000000000000000000000000000000001", "AAA"),
                    "token1": raw_token_json("0x0000000000000000000000000000000000000002", "BBB"),
                    "tickLower": { "tickIdx": "-600" },
                    "tickUpper": { "tickIdx": "600" },
                }]}
            })))
            .mount(&server)
            .await;

        let client = SubgraphClient::new(server.uri());
        let positions = client
            .positions_by_owner("0x0000000000000000000000000000000000000003".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].tick_lower, -600);
        assert_eq!(positions[0].tick_upper, 600);
        assert_eq!(positions[0].id, "12345");
    }

    #[tokio::test]
    async fn test_graphql_errors_propagate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "rate limited" }],
            })))
            .mount(&server)
            .await;

        let client = SubgraphClient::new(server.uri());
        let result = client.scan_pools(&default_scan_params()).await;
        assert!(matches!(result, Err(UniswapError::SubgraphError(_))));
    }
}
