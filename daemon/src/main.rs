//! Aegis daemon: entry point for running a simulated security network.

use std::path::PathBuf;

use aegis_node::{init_logging, AegisNode, LogFormat, NodeConfig};
use aegis_rpc::RpcServer;
use clap::Parser;

#[derive(Parser)]
#[command(name = "aegis-daemon", about = "Aegis security ledger daemon")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "AEGIS_CONFIG")]
    config: Option<PathBuf>,

    /// Number of validator nodes created at startup.
    #[arg(long, env = "AEGIS_NODE_COUNT")]
    node_count: Option<usize>,

    /// Proof-of-work difficulty in leading zero hex digits.
    #[arg(long, env = "AEGIS_DIFFICULTY")]
    difficulty: Option<u32>,

    /// Seconds between monitor ticks.
    #[arg(long, env = "AEGIS_TICK_SECS")]
    tick_secs: Option<u64>,

    /// Disable the RPC server.
    #[arg(long, env = "AEGIS_DISABLE_RPC")]
    no_rpc: bool,

    /// RPC bind host.
    #[arg(long, env = "AEGIS_RPC_HOST")]
    rpc_host: Option<String>,

    /// RPC server port.
    #[arg(long, env = "AEGIS_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Enable the Prometheus metrics endpoint.
    #[arg(long, env = "AEGIS_ENABLE_METRICS")]
    metrics: bool,

    /// Log output: "human" or "json".
    #[arg(long, env = "AEGIS_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "AEGIS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Seed for a reproducible simulation.
    #[arg(long, env = "AEGIS_SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the network until interrupted.
    Run,
    /// Print the effective configuration as TOML and exit.
    PrintConfig,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::from_toml_file(&path.to_string_lossy())?,
            None => NodeConfig::default(),
        };

        if let Some(n) = self.node_count {
            config.node_count = n;
        }
        if let Some(d) = self.difficulty {
            config.difficulty = d;
        }
        if let Some(secs) = self.tick_secs {
            config.tick_interval_secs = secs;
        }
        if self.no_rpc {
            config.enable_rpc = false;
        }
        if let Some(host) = &self.rpc_host {
            config.rpc_host = host.clone();
        }
        if let Some(port) = self.rpc_port {
            config.rpc_port = port;
        }
        config.enable_metrics |= self.metrics;
        if let Some(format) = &self.log_format {
            config.log_format = format.parse::<LogFormat>()?;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if self.seed.is_some() {
            config.rng_seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    match cli.command {
        Command::PrintConfig => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Run => {
            init_logging(config.log_format, &config.log_level)?;
            tracing::info!(
                nodes = config.node_count,
                difficulty = config.difficulty,
                rpc = config.enable_rpc,
                "starting Aegis network"
            );

            let mut node = AegisNode::new(config)?;
            node.start()?;

            if node.config().enable_rpc {
                let server = RpcServer::new(
                    &node.config().rpc_host,
                    node.config().rpc_port,
                    node.network().clone(),
                    node.config().enable_metrics,
                );
                let shutdown_rx = node.shutdown_controller().subscribe();
                let handle = tokio::spawn(async move {
                    if let Err(e) = server.start(shutdown_rx).await {
                        tracing::error!(error = %e, "RPC server failed");
                    }
                });
                node.track(handle);
            }

            node.shutdown_controller().wait_for_signal().await;
            tracing::info!("shutdown signal received, stopping node");
            node.stop().await?;
            tracing::info!("Aegis daemon exited cleanly");
        }
    }

    Ok(())
}
