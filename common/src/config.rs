use config::{Config, ConfigError};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub chain: ChainConfig,
    #[serde(default = "default_gateway_config")]
    pub gateway: GatewayConfig,
    #[serde(default = "default_pipeline_config")]
    pub pipeline: PipelineConfig,
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChainConfig {
    pub endpoint: String,
    pub contract_address: String,
    #[serde(default = "default_chain_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_base")]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Maximum in-flight metadata fetches. None fires all at once.
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

fn default_gateway_config() -> GatewayConfig {
    GatewayConfig {
        base_url: default_gateway_base(),
    }
}

fn default_pipeline_config() -> PipelineConfig {
    PipelineConfig {
        fetch_timeout_ms: default_fetch_timeout_ms(),
        max_concurrency: None,
    }
}

fn default_gateway_base() -> String {
    "https://ipfs.io".to_string()
}

fn default_chain_timeout_ms() -> u64 {
    15_000
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_api_port() -> u16 {
    3000
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        // Build the configuration
        let config = builder.build()?;

        // Try to deserialize the entire configuration
        let settings: Settings = config.try_deserialize()?;

        debug!(
            gateway = %settings.gateway.base_url,
            chain = %settings.chain.endpoint,
            "Loaded configuration"
        );

        Ok(settings)
    }
}
