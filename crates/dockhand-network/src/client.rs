//! The network API façade.

use dockhand_common::{ClientConfig, DockhandError, DockhandResult};
use dockhand_transport::{ApiRequest, CallContext, HttpTransport, Transport, path_segment};

use crate::filter::NetworkFilters;
use crate::types::{CreateNetworkOptions, CreateNetworkResponse, Network, NetworkConnectionOptions};

const NOT_FOUND: u16 = 404;
const CONFLICT: u16 = 409;

/// Client for the `/networks` endpoints of the Engine API.
///
/// Every method performs exactly one request through the transport. Errors
/// pass through unchanged except for the statuses each endpoint documents:
/// 404 becomes [`DockhandError::NoSuchNetwork`] or
/// [`DockhandError::NoSuchNetworkOrContainer`], and 409 on create becomes
/// [`DockhandError::NetworkAlreadyExists`].
#[derive(Debug, Clone)]
pub struct NetworkClient<T> {
    transport: T,
}

impl NetworkClient<HttpTransport> {
    /// Create a client talking HTTP to the daemon described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon address is unusable.
    pub fn from_config(config: &ClientConfig) -> DockhandResult<Self> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> NetworkClient<T> {
    /// Create a client over `transport`.
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// List all networks.
    ///
    /// # Errors
    ///
    /// Returns the transport's error, or a serialization error if the reply
    /// is not a list of networks.
    pub async fn list_networks(&self, ctx: &CallContext) -> DockhandResult<Vec<Network>> {
        let response = self.transport.send(ApiRequest::get("/networks"), ctx).await?;
        let networks: Vec<Network> = response.json()?;
        tracing::debug!(count = networks.len(), "Listed networks");
        Ok(networks)
    }

    /// List networks matching `filters`.
    ///
    /// # Errors
    ///
    /// Same as [`list_networks`](Self::list_networks).
    pub async fn filtered_list_networks(
        &self,
        filters: &NetworkFilters,
        ctx: &CallContext,
    ) -> DockhandResult<Vec<Network>> {
        let request = ApiRequest::get("/networks").query("filters", filters.to_json()?);
        let response = self.transport.send(request, ctx).await?;
        let networks: Vec<Network> = response.json()?;
        tracing::debug!(count = networks.len(), "Listed filtered networks");
        Ok(networks)
    }

    /// Inspect a network by ID or name.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::NoSuchNetwork`] if the daemon answers 404,
    /// or [`DockhandError::Config`] for an empty, `.` or `..` ID.
    pub async fn network_info(&self, id: &str, ctx: &CallContext) -> DockhandResult<Network> {
        let response = self
            .transport
            .send(ApiRequest::get(network_path(id)?), ctx)
            .await
            .map_err(|err| match err {
                DockhandError::Api {
                    status: NOT_FOUND, ..
                } => DockhandError::NoSuchNetwork { id: id.to_string() },
                other => other,
            })?;
        response.json()
    }

    /// Create a network.
    ///
    /// The returned network only carries the name and driver that were
    /// requested plus the ID assigned by the daemon; call
    /// [`network_info`](Self::network_info) for the full record.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::NetworkAlreadyExists`] if the daemon answers
    /// 409.
    pub async fn create_network(
        &self,
        opts: &CreateNetworkOptions,
        ctx: &CallContext,
    ) -> DockhandResult<Network> {
        let request = ApiRequest::post("/networks/create").json(opts)?;
        let response = self
            .transport
            .send(request, ctx)
            .await
            .map_err(|err| match err {
                DockhandError::Api {
                    status: CONFLICT, ..
                } => DockhandError::NetworkAlreadyExists,
                other => other,
            })?;

        let created: CreateNetworkResponse = response.json()?;
        if !created.warning.is_empty() {
            tracing::warn!(network = %opts.name, warning = %created.warning, "Daemon warning");
        }
        tracing::info!(network = %opts.name, id = %created.id, "Created network");

        Ok(Network {
            name: opts.name.clone(),
            id: created.id,
            driver: opts.driver.clone(),
            ..Network::default()
        })
    }

    /// Remove a network.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::NoSuchNetwork`] if the daemon answers 404.
    pub async fn remove_network(&self, id: &str, ctx: &CallContext) -> DockhandResult<()> {
        self.transport
            .send(ApiRequest::delete(network_path(id)?), ctx)
            .await
            .map_err(|err| match err {
                DockhandError::Api {
                    status: NOT_FOUND, ..
                } => DockhandError::NoSuchNetwork { id: id.to_string() },
                other => other,
            })?;
        tracing::info!(network = %id, "Removed network");
        Ok(())
    }

    /// Attach a container to a network.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::NoSuchNetworkOrContainer`] if the daemon
    /// answers 404.
    pub async fn connect_network(
        &self,
        id: &str,
        opts: &NetworkConnectionOptions,
        ctx: &CallContext,
    ) -> DockhandResult<()> {
        self.endpoint_call(id, "connect", opts, ctx).await?;
        tracing::info!(network = %id, container = %opts.container, "Connected container");
        Ok(())
    }

    /// Detach a container from a network.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::NoSuchNetworkOrContainer`] if the daemon
    /// answers 404.
    pub async fn disconnect_network(
        &self,
        id: &str,
        opts: &NetworkConnectionOptions,
        ctx: &CallContext,
    ) -> DockhandResult<()> {
        self.endpoint_call(id, "disconnect", opts, ctx).await?;
        tracing::info!(network = %id, container = %opts.container, "Disconnected container");
        Ok(())
    }

    async fn endpoint_call(
        &self,
        id: &str,
        action: &str,
        opts: &NetworkConnectionOptions,
        ctx: &CallContext,
    ) -> DockhandResult<()> {
        let request = ApiRequest::post(format!("{}/{action}", network_path(id)?)).json(opts)?;
        self.transport
            .send(request, ctx)
            .await
            .map_err(|err| match err {
                DockhandError::Api {
                    status: NOT_FOUND, ..
                } => DockhandError::NoSuchNetworkOrContainer {
                    network_id: id.to_string(),
                    container_id: opts.container.clone(),
                },
                other => other,
            })?;
        Ok(())
    }
}

fn network_path(id: &str) -> DockhandResult<String> {
    Ok(format!("/networks/{}", path_segment(id)?))
}
