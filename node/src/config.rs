//! Node settings, loadable from TOML. Every field has a default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use aegis_registry::layout::{DEFAULT_PROVIDERS, DEFAULT_REGIONS};
use aegis_registry::RegistryLayout;
use aegis_types::{NetworkParams, ValidatorType};

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for an Aegis node.
///
/// Read with [`NodeConfig::from_toml_file`]; missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Number of simulated validator nodes.
    #[serde(default = "default_node_count")]
    pub node_count: usize,

    /// Regions nodes are spread across, round-robin.
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,

    /// Hosting providers nodes are spread across, round-robin.
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,

    /// Leading zero hex digits required of a block hash.
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,

    /// Seconds between network monitor ticks.
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,

    /// Maximum transactions decided per consensus cycle.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Consensus rounds are skipped while fewer nodes are active.
    #[serde(default = "default_min_active_nodes")]
    pub min_active_nodes: usize,

    #[serde(default = "default_min_validators")]
    pub min_validators: usize,

    #[serde(default = "default_max_validators")]
    pub max_validators: usize,

    /// How long `validate_security_event` waits for a decision.
    #[serde(default = "default_validation_wait_ms")]
    pub validation_wait_ms: u64,

    #[serde(default = "default_vote_delay_min_ms")]
    pub vote_delay_min_ms: u64,

    #[serde(default = "default_vote_delay_max_ms")]
    pub vote_delay_max_ms: u64,

    /// Optional cap on the proof-of-work nonce search.
    #[serde(default)]
    pub max_nonce: Option<u64>,

    /// Serve the HTTP API.
    #[serde(default = "default_true")]
    pub enable_rpc: bool,

    /// Interface the RPC server binds to.
    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,

    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Whether to expose Prometheus metrics on the RPC server.
    #[serde(default)]
    pub enable_metrics: bool,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seed for a reproducible simulation. Unseeded runs use OS entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

// ── Defaults ────────────────────────────────────────────────────────────

fn default_node_count() -> usize {
    NetworkParams::default().node_count
}

fn default_regions() -> Vec<String> {
    DEFAULT_REGIONS.iter().map(|s| s.to_string()).collect()
}

fn default_providers() -> Vec<String> {
    DEFAULT_PROVIDERS.iter().map(|s| s.to_string()).collect()
}

fn default_difficulty() -> u32 {
    NetworkParams::default().difficulty
}

fn default_tick_interval_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    NetworkParams::default().batch_size
}

fn default_min_active_nodes() -> usize {
    NetworkParams::default().min_active_nodes
}

fn default_min_validators() -> usize {
    NetworkParams::default().min_validators
}

fn default_max_validators() -> usize {
    NetworkParams::default().max_validators
}

fn default_validation_wait_ms() -> u64 {
    2_000
}

fn default_vote_delay_min_ms() -> u64 {
    NetworkParams::default().vote_delay_min_ms
}

fn default_vote_delay_max_ms() -> u64 {
    NetworkParams::default().vote_delay_max_ms
}

fn default_true() -> bool {
    true
}

fn default_rpc_host() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    7100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl NodeConfig {
    /// Read and parse `path`.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(format!("{path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// The effective settings as TOML, as printed by `aegis-daemon print-config`.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Engine parameters derived from this configuration.
    pub fn network_params(&self) -> NetworkParams {
        NetworkParams {
            node_count: self.node_count,
            min_active_nodes: self.min_active_nodes,
            min_validators: self.min_validators,
            max_validators: self.max_validators,
            batch_size: self.batch_size,
            vote_delay_min_ms: self.vote_delay_min_ms,
            vote_delay_max_ms: self.vote_delay_max_ms,
            difficulty: self.difficulty,
            max_nonce: self.max_nonce,
        }
    }

    /// Placement lists for the registry. Validator types always cycle
    /// through every type.
    pub fn layout(&self) -> RegistryLayout {
        RegistryLayout {
            regions: self.regions.clone(),
            providers: self.providers.clone(),
            validator_types: ValidatorType::ALL.to_vec(),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    pub fn validation_wait(&self) -> Duration {
        Duration::from_millis(self.validation_wait_ms)
    }

    /// Reject settings the engines cannot run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        self.network_params().validate()?;
        self.layout().validate()?;
        if self.tick_interval_secs == 0 {
            return Err(NodeError::Config("tick_interval_secs must be positive".into()));
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_count: default_node_count(),
            regions: default_regions(),
            providers: default_providers(),
            difficulty: default_difficulty(),
            tick_interval_secs: default_tick_interval_secs(),
            batch_size: default_batch_size(),
            min_active_nodes: default_min_active_nodes(),
            min_validators: default_min_validators(),
            max_validators: default_max_validators(),
            validation_wait_ms: default_validation_wait_ms(),
            vote_delay_min_ms: default_vote_delay_min_ms(),
            vote_delay_max_ms: default_vote_delay_max_ms(),
            max_nonce: None,
            enable_rpc: default_true(),
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            enable_metrics: false,
            log_format: LogFormat::Human,
            log_level: default_log_level(),
            rng_seed: None,
        }
    }
}
