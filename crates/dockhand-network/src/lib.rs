//! # dockhand-network
//!
//! Typed access to the Docker Engine `/networks` endpoints.
//!
//! ```no_run
//! use dockhand_common::ClientConfig;
//! use dockhand_network::{CreateNetworkOptions, NetworkClient, NetworkFilters};
//! use dockhand_transport::CallContext;
//!
//! # async fn example() -> dockhand_common::DockhandResult<()> {
//! let client = NetworkClient::from_config(&ClientConfig::from_env())?;
//! let ctx = CallContext::background();
//!
//! let created = client
//!     .create_network(&CreateNetworkOptions::new("backend").with_driver("bridge"), &ctx)
//!     .await?;
//!
//! let bridges = client
//!     .filtered_list_networks(&NetworkFilters::new().with("driver", "bridge"), &ctx)
//!     .await?;
//! assert!(bridges.iter().any(|n| n.id == created.id));
//!
//! client.remove_network(&created.id, &ctx).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod filter;
pub mod types;

pub use client::NetworkClient;
pub use filter::NetworkFilters;
pub use types::{
    CreateNetworkOptions, CreateNetworkResponse, Endpoint, EndpointConfig, EndpointIpamConfig,
    IpamConfig, IpamOptions, Network, NetworkConnectionOptions,
};
