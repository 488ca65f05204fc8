//! Pass-through proxy to the engine's REST API.
//!
//! Forwards an arbitrary sub-path and method to `{base}/api/v1/{path}` and
//! relays the engine's status, headers, and body verbatim. Used for engine
//! surface area Flowgate has no named route for; the abstraction layer
//! stays the preferred path.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, CONNECTION, CONTENT_LENGTH, HOST, TRANSFER_ENCODING};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};

use flowgate_types::error::EngineError;

use super::login::truncate_detail;

const PROXY_TIMEOUT: Duration = Duration::from_secs(30);

/// Request to forward. Headers arrive as the caller sent them; hop-by-hop
/// headers are stripped before forwarding.
#[derive(Debug)]
pub struct ProxiedRequest {
    pub method: Method,
    /// Sub-path under the engine's `/api/v1/`, without a leading slash.
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// The engine's answer, relayed verbatim.
#[derive(Debug)]
pub struct ProxiedResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Headers that describe the connection rather than the request and must
/// not be forwarded.
const STRIPPED_REQUEST_HEADERS: [HeaderName; 2] = [HOST, CONTENT_LENGTH];
const STRIPPED_RESPONSE_HEADERS: [HeaderName; 3] = [CONNECTION, CONTENT_LENGTH, TRANSFER_ENCODING];

pub(crate) fn strip_headers(headers: &HeaderMap, stripped: &[HeaderName]) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in headers {
        if !stripped.contains(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

/// Reqwest-based pass-through proxy.
pub struct EngineProxy {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl EngineProxy {
    pub fn new(base_url: String, api_key: Option<SecretString>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(PROXY_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str, query: Option<&str>) -> String {
        let path = path.trim_start_matches('/');
        match query {
            Some(query) if !query.is_empty() => {
                format!("{}/api/v1/{path}?{query}", self.base_url)
            }
            _ => format!("{}/api/v1/{path}", self.base_url),
        }
    }

    /// Forward one request. Gateway-class engine answers (502/503/504) and
    /// connection failures surface as [`EngineError::Unreachable`]; every
    /// other status is relayed to the caller untouched. Never retries.
    pub async fn forward(&self, request: ProxiedRequest) -> Result<ProxiedResponse, EngineError> {
        let url = self.url(&request.path, request.query.as_deref());
        let headers = strip_headers(&request.headers, &STRIPPED_REQUEST_HEADERS);

        tracing::debug!(method = %request.method, url = %url, "forwarding engine request");

        let mut builder = self
            .client
            .request(request.method, &url)
            .headers(headers)
            .body(request.body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|err| EngineError::Unreachable {
            status: None,
            detail: err.to_string(),
        })?;

        let status = response.status().as_u16();
        let headers = strip_headers(response.headers(), &STRIPPED_RESPONSE_HEADERS);
        let body = response
            .bytes()
            .await
            .map_err(|err| EngineError::Deserialization(err.to_string()))?
            .to_vec();

        if matches!(status, 502 | 503 | 504) {
            return Err(EngineError::Unreachable {
                status: Some(status),
                detail: truncate_detail(&String::from_utf8_lossy(&body)),
            });
        }

        Ok(ProxiedResponse {
            status,
            headers,
            body,
        })
    }
}
