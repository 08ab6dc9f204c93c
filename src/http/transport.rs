//! The platform request primitive the client sits on.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::http::{Method, RawResponse};

/// A fully resolved request, ready to go on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// Absolute URL including any query string
    pub url: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    /// JSON body; always `None` for GET
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// Issues exactly one request. No retries, no cancellation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse>;
}

// == Reqwest Transport ==
/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse> {
        let timeout_ms = u64::try_from(request.timeout.as_millis()).unwrap_or(u64::MAX);
        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                ClientError::Timeout(timeout_ms)
            } else {
                ClientError::Network(e.to_string())
            }
        };

        let response = builder.send().await.map_err(map_err)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_err)?;

        debug!(method = %request.method, url = %request.url, status, "transport response");
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let transport = ReqwestTransport::new();
        let request = TransportRequest {
            // Port 9 (discard) on localhost is not expected to accept HTTP
            url: "http://127.0.0.1:9/regions".to_string(),
            method: Method::Get,
            headers: BTreeMap::new(),
            body: None,
            timeout: Duration::from_secs(2),
        };

        let result = transport.send(request).await;
        assert!(matches!(
            result,
            Err(ClientError::Network(_)) | Err(ClientError::Timeout(_))
        ));
    }
}
