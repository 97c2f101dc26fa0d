//! Interactive chat agent wired to the Uniswap tool registry.
//!
//! Talks to any OpenAI-compatible chat-completions endpoint. Each user turn
//! runs a bounded tool loop: the model may call registered tools up to
//! [`MAX_TOOL_STEPS`] times before it must answer in prose.

use std::io::Write as _;

use alloy::primitives::Address;
use anyhow::{Context, anyhow};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, BufReader};
use uniswap_plugin_lib::{PluginConfig, UniswapPlugin, WalletBackend, registry};

const MAX_TOOL_STEPS: usize = 5;

const SYSTEM_PROMPT: &str = "You are a DeFi assistant managing Uniswap V3 liquidity \
and swaps for the user's wallet. Use the provided tools for any on-chain action or \
data lookup. Amounts are raw base units unless the user says otherwise. Confirm \
destructive actions by restating them before calling a tool.";

struct AgentConfig {
    api_key: String,
    base_url: String,
    model: String,
}

impl AgentConfig {
    fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            api_key: std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?,
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".into()),
        })
    }
}

fn plugin_config_from_env() -> anyhow::Result<PluginConfig> {
    let chain_id = match std::env::var("CHAIN_ID") {
        Ok(raw) => Some(raw.parse::<u64>().context("CHAIN_ID must be a number")?),
        Err(_) => None,
    };
    let wallet = if let (Ok(base_url), Ok(api_key), Ok(address)) = (
        std::env::var("SMART_WALLET_API_URL"),
        std::env::var("SMART_WALLET_API_KEY"),
        std::env::var("SMART_WALLET_ADDRESS"),
    ) {
        WalletBackend::Smart {
            base_url,
            api_key,
            wallet_address: address
                .parse::<Address>()
                .context("SMART_WALLET_ADDRESS is not a valid address")?,
        }
    } else {
        WalletBackend::Local {
            private_key: std::env::var("WALLET_PRIVATE_KEY")
                .context("set WALLET_PRIVATE_KEY or the SMART_WALLET_* variables")?,
        }
    };
    Ok(PluginConfig {
        rpc_url: std::env::var("RPC_URL").context("RPC_URL is not set")?,
        subgraph_url: std::env::var("SUBGRAPH_URL").ok(),
        chain_id,
        wallet,
    })
}

/// Tool definitions in the chat-completions `tools` wire format.
fn tool_definitions() -> Vec<Value> {
    registry()
        .all()
        .into_iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.parameters(),
                },
            })
        })
        .collect()
}

async fn chat_completion(
    client: &reqwest::Client,
    config: &AgentConfig,
    messages: &[Value],
    tools: &[Value],
) -> anyhow::Result<Value> {
    let response = client
        .post(format!("{}/chat/completions", config.base_url))
        .bearer_auth(&config.api_key)
        .json(&json!({
            "model": config.model,
            "messages": messages,
            "tools": tools,
        }))
        .send()
        .await?;
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("chat API returned {status}: {body}"));
    }
    let body: Value = response.json().await?;
    body.pointer("/choices/0/message")
        .cloned()
        .ok_or_else(|| anyhow!("chat API response had no message"))
}

/// Run one user turn: call the model, execute tool calls, repeat until the
/// model answers in prose or the step budget runs out.
async fn run_turn(
    client: &reqwest::Client,
    config: &AgentConfig,
    plugin: &UniswapPlugin,
    messages: &mut Vec<Value>,
    tools: &[Value],
) -> anyhow::Result<String> {
    for _ in 0..MAX_TOOL_STEPS {
        let message = chat_completion(client, config, messages, tools).await?;
        let Some(tool_calls) = message.get("tool_calls").and_then(Value::as_array).cloned()
        else {
            let content = message
                .get("content")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            messages.push(message);
            return Ok(content);
        };

        messages.push(message.clone());
        for call in &tool_calls {
            let id = call.get("id").and_then(Value::as_str).unwrap_or_default();
            let name = call
                .pointer("/function/name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let arguments = call
                .pointer("/function/arguments")
                .and_then(Value::as_str)
                .unwrap_or("{}");
            let params: Value = serde_json::from_str(arguments).unwrap_or_else(|_| json!({}));

            tracing::info!(tool = name, "Model requested tool call");
            let content = match plugin.dispatch(name, params).await {
                Ok(result) => result.to_string(),
                Err(e) => json!({ "error": e.to_string() }).to_string(),
            };
            messages.push(json!({
                "role": "tool",
                "tool_call_id": id,
                "content": content,
            }));
        }
    }
    Ok("Tool step budget exhausted; please narrow the request.".into())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_log();

    let agent_config = AgentConfig::from_env()?;
    let plugin = UniswapPlugin::new(plugin_config_from_env()?)?;
    let tools = tool_definitions();
    let client = reqwest::Client::new();

    let mut messages = vec![json!({ "role": "system", "content": SYSTEM_PROMPT })];

    println!("Uniswap chat agent ready ({} tools). Ctrl-D to exit.", tools.len());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        messages.push(json!({ "role": "user", "content": line }));
        match run_turn(&client, &agent_config, &plugin, &mut messages, &tools).await {
            Ok(reply) => println!("agent> {reply}"),
            Err(e) => eprintln!("error: {e:#}"),
        }
    }
    Ok(())
}

fn setup_log() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};
    if tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .is_err()
    {}
}
