//! CLI command definitions and handlers.

use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use dockhand_common::ClientConfig;
use dockhand_common::config::DEFAULT_HOST;
use dockhand_network::NetworkClient;
use dockhand_transport::{CallContext, CancelToken};

pub mod network;

pub use network::NetworkCommand;

/// dockhand - Docker Engine network client
#[derive(Parser, Debug)]
#[command(name = "dockhand")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Daemon address (tcp://host:port, http(s)://host:port)
    #[arg(
        short = 'H',
        long,
        global = true,
        env = "DOCKER_HOST",
        default_value = DEFAULT_HOST
    )]
    pub host: String,

    /// Pin requests to an Engine API version (e.g. 1.41)
    #[arg(long, global = true, env = "DOCKER_API_VERSION")]
    pub api_version: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "DOCKHAND_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// Use TLS for tcp:// addresses (also enabled by DOCKER_TLS_VERIFY)
    #[arg(long, global = true)]
    pub tls: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage networks
    #[command(subcommand)]
    Network(NetworkCommand),
}

impl Cli {
    /// Client configuration from flags, falling back to the environment.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default()
            .with_host(self.host.clone())
            .with_timeout(Duration::from_secs(self.timeout))
            .with_tls(self.tls || ClientConfig::from_env().tls);
        if let Some(version) = &self.api_version {
            config = config.with_api_version(version.clone());
        }
        config
    }

    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        let config = self.client_config();
        tracing::debug!(host = %config.host, api_version = ?config.api_version, "Using daemon");
        let client = NetworkClient::from_config(&config)?;

        // Ctrl-C aborts the in-flight request
        let token = CancelToken::new();
        let interrupt = {
            let token = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::debug!("Interrupted");
                    token.cancel();
                }
            })
        };
        let ctx = CallContext::background().with_cancel(token);

        let result = match self.command {
            Commands::Network(command) => command.run(&client, &ctx).await,
        };

        interrupt.abort();
        result
    }
}
