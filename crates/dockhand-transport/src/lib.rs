//! # dockhand-transport
//!
//! Request dispatch for the dockhand Docker Engine client.
//!
//! The API crates describe each call as an [`ApiRequest`] and hand it to a
//! [`Transport`]. A transport is status-agnostic: any non-2xx reply comes
//! back as [`DockhandError::Api`](dockhand_common::DockhandError::Api)
//! carrying the status and the daemon's message, and it is up to the caller
//! to decide what a given status means for its endpoint.
//!
//! [`HttpTransport`] talks to a daemon over TCP with `reqwest`.

#![warn(missing_docs)]

use std::sync::Arc;

use async_trait::async_trait;
use dockhand_common::DockhandResult;

pub mod context;
pub mod http;
pub mod request;

pub use context::{CallContext, CancelToken};
pub use http::HttpTransport;
pub use request::{ApiRequest, ApiResponse, Method, path_segment};

/// Performs one HTTP exchange with the daemon.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the fully-read response.
    ///
    /// Implementations must abort when the context's cancel token fires or
    /// its timeout elapses, and must map non-2xx statuses to
    /// [`DockhandError::Api`](dockhand_common::DockhandError::Api).
    async fn send(&self, request: ApiRequest, ctx: &CallContext) -> DockhandResult<ApiResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: ApiRequest, ctx: &CallContext) -> DockhandResult<ApiResponse> {
        (**self).send(request, ctx).await
    }
}
