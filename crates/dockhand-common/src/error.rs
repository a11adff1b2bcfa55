//! Error types shared by every dockhand crate.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using [`DockhandError`].
pub type DockhandResult<T> = Result<T, DockhandError>;

/// Errors returned by the dockhand client.
#[derive(Error, Diagnostic, Debug)]
pub enum DockhandError {
    /// The daemon answered with a non-2xx status.
    ///
    /// Call sites that know what a status means for their endpoint translate
    /// this into one of the named variants below; everything else surfaces
    /// it unchanged.
    #[error("API error ({status}): {message}")]
    #[diagnostic(code(dockhand::api))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message reported by the daemon.
        message: String,
    },

    /// The network does not exist.
    #[error("No such network: {id}")]
    #[diagnostic(code(dockhand::network::not_found))]
    NoSuchNetwork {
        /// The network ID or name that was requested.
        id: String,
    },

    /// Either the network or the container does not exist.
    #[error("No such network ({network_id}) or container ({container_id})")]
    #[diagnostic(code(dockhand::network::endpoint_not_found))]
    NoSuchNetworkOrContainer {
        /// The network ID or name.
        network_id: String,
        /// The container ID or name.
        container_id: String,
    },

    /// A network with the same name already exists.
    #[error("network already exists")]
    #[diagnostic(
        code(dockhand::network::already_exists),
        help("Pick another name or remove the existing network first")
    )]
    NetworkAlreadyExists,

    /// The request never produced an HTTP response.
    #[error("Transport error: {message}")]
    #[diagnostic(
        code(dockhand::transport),
        help("Check that the Docker daemon is running and DOCKER_HOST is correct")
    )]
    Transport {
        /// The error message.
        message: String,
    },

    /// The request did not complete before its deadline.
    #[error("Request timed out after {timeout:?}")]
    #[diagnostic(code(dockhand::timeout))]
    Timeout {
        /// The deadline that elapsed.
        timeout: Duration,
    },

    /// The caller cancelled the request.
    #[error("Request cancelled")]
    #[diagnostic(code(dockhand::cancelled))]
    Cancelled,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    #[diagnostic(code(dockhand::serialization))]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(dockhand::config))]
    Config {
        /// The error message.
        message: String,
    },
}

impl DockhandError {
    /// HTTP status carried by an [`DockhandError::Api`] error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the daemon reported the given status.
    #[must_use]
    pub fn is_status(&self, status: u16) -> bool {
        self.status() == Some(status)
    }
}

impl From<serde_json::Error> for DockhandError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
