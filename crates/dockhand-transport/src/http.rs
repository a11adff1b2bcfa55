//! reqwest-backed transport for daemons reachable over TCP.

use std::time::Duration;

use async_trait::async_trait;
use dockhand_common::{ClientConfig, DockhandError, DockhandResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::context::CallContext;
use crate::request::{ApiRequest, ApiResponse, Method};
use crate::Transport;

const USER_AGENT: &str = concat!("dockhand/", env!("CARGO_PKG_VERSION"));

/// Error body returned by the Engine API.
#[derive(Debug, Deserialize)]
struct EngineError {
    message: String,
}

/// HTTP transport for a Docker daemon.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    version_prefix: String,
    default_timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for the daemon described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon address is unusable or the HTTP client
    /// cannot be built.
    pub fn new(config: &ClientConfig) -> DockhandResult<Self> {
        let base_url = config.base_url()?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        // Loopback daemons must never be routed through HTTP(S)_PROXY.
        if is_loopback(&base_url) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| DockhandError::Config {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url,
            version_prefix: config.version_prefix(),
            default_timeout: config.timeout,
        })
    }

    /// Base URL of the daemon.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a request.
    #[must_use]
    pub fn url_for(&self, request: &ApiRequest) -> Url {
        let mut url = self.base_url.clone();
        let base_path = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{base_path}{}{}", self.version_prefix, request.path));
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        url
    }

    async fn exchange(&self, request: ApiRequest) -> DockhandResult<ApiResponse> {
        let url = self.url_for(&request);
        tracing::debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self.client.request(to_reqwest(request.method), url.clone());
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await.map_err(|e| DockhandError::Transport {
            message: format!("Failed to send {} {}: {}", request.method, url, e),
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| DockhandError::Transport {
            message: format!("Failed to read response body: {e}"),
        })?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Received response");

        if !status.is_success() {
            return Err(DockhandError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        Ok(ApiResponse::new(status.as_u16(), body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest, ctx: &CallContext) -> DockhandResult<ApiResponse> {
        if ctx.is_cancelled() {
            return Err(DockhandError::Cancelled);
        }

        let timeout = ctx.timeout().unwrap_or(self.default_timeout);
        let exchange = tokio::time::timeout(timeout, self.exchange(request));

        let result = match ctx.cancel_token() {
            Some(token) => tokio::select! {
                result = exchange => result,
                () = token.cancelled() => {
                    tracing::debug!("Request cancelled");
                    return Err(DockhandError::Cancelled);
                }
            },
            None => exchange.await,
        };

        result.map_err(|_| DockhandError::Timeout { timeout })?
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

const fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Best-effort message for a failed call: the Engine's `message` field, the
/// raw body, or the status reason phrase.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(err) = serde_json::from_slice::<EngineError>(body) {
        return err.message;
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if !text.is_empty() {
        return text;
    }

    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(host: &str, version: Option<&str>) -> HttpTransport {
        let mut config = ClientConfig::default().with_host(host);
        if let Some(v) = version {
            config = config.with_api_version(v);
        }
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn url_includes_version_prefix() {
        let t = transport("tcp://127.0.0.1:2375", Some("1.41"));
        let url = t.url_for(&ApiRequest::get("/networks/abc"));
        assert_eq!(url.as_str(), "http://127.0.0.1:2375/v1.41/networks/abc");
    }

    #[test]
    fn url_encodes_query() {
        let t = transport("tcp://127.0.0.1:2375", None);
        let request = ApiRequest::get("/networks").query("filters", r#"{"name":{"a b":true}}"#);
        let url = t.url_for(&request);

        assert_eq!(url.path(), "/networks");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("filters".to_string(), r#"{"name":{"a b":true}}"#.to_string())]
        );
    }

    #[test]
    fn base_url_follows_tls_setting() {
        let config = ClientConfig::default()
            .with_host("tcp://docker.internal:2376")
            .with_tls(true);
        let t = HttpTransport::new(&config).unwrap();
        assert_eq!(t.base_url().as_str(), "https://docker.internal:2376/");
    }

    #[test]
    fn url_keeps_escaped_segments() {
        let t = transport("tcp://127.0.0.1:2375", Some("1.41"));
        let path = format!("/networks/{}", crate::path_segment("../containers").unwrap());
        let url = t.url_for(&ApiRequest::get(path));
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:2375/v1.41/networks/..%2Fcontainers"
        );
    }

    #[test]
    fn url_keeps_base_path() {
        let t = transport("http://proxy.local/docker/", None);
        let url = t.url_for(&ApiRequest::get("/networks"));
        assert_eq!(url.as_str(), "http://proxy.local/docker/networks");
    }

    #[test]
    fn loopback_detection() {
        assert!(is_loopback(&Url::parse("http://localhost:2375").unwrap()));
        assert!(is_loopback(&Url::parse("http://127.0.0.1:2375").unwrap()));
        assert!(is_loopback(&Url::parse("http://[::1]:2375").unwrap()));
        assert!(!is_loopback(&Url::parse("http://docker.internal:2375").unwrap()));
        assert!(!is_loopback(&Url::parse("http://10.0.0.4:2375").unwrap()));
    }

    #[test]
    fn error_message_prefers_engine_body() {
        let msg = error_message(
            StatusCode::NOT_FOUND,
            br#"{"message":"network foo not found"}"#,
        );
        assert_eq!(msg, "network foo not found");
    }

    #[test]
    fn error_message_falls_back_to_text_then_reason() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, b"  daemon exploded\n"),
            "daemon exploded"
        );
        assert_eq!(error_message(StatusCode::CONFLICT, b""), "Conflict");
    }
}
