//! Built-in interceptors and the configured client factory.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::http::{
    ApiResponse, ErrorInterceptor, HttpClient, RequestInterceptor, RequestOptions,
    ResponseInterceptor, Transport,
};
use crate::storage::LocalStorage;

/// Forces every request to use the configured timeout.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutInterceptor {
    pub timeout: Duration,
}

impl TimeoutInterceptor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl RequestInterceptor for TimeoutInterceptor {
    fn intercept(&self, options: RequestOptions) -> Result<RequestOptions> {
        Ok(options.with_timeout(self.timeout))
    }
}

/// Adds `Authorization: Bearer <token>` when local storage holds a token.
#[derive(Debug, Clone)]
pub struct AuthInterceptor {
    storage: Arc<LocalStorage>,
}

impl AuthInterceptor {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }
}

impl RequestInterceptor for AuthInterceptor {
    fn intercept(&self, options: RequestOptions) -> Result<RequestOptions> {
        match self.storage.auth_token() {
            Some(token) => Ok(options.with_header("Authorization", format!("Bearer {}", token))),
            None => Ok(options),
        }
    }
}

// == Loggers ==
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

impl RequestInterceptor for RequestLogger {
    fn intercept(&self, options: RequestOptions) -> Result<RequestOptions> {
        info!(
            method = %options.method,
            url = %options.url,
            params = ?options.params,
            data = ?options.data,
            "http request"
        );
        Ok(options)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseLogger;

#[async_trait]
impl ResponseInterceptor for ResponseLogger {
    async fn intercept(&self, response: ApiResponse<Value>) -> Result<ApiResponse<Value>> {
        info!(code = response.code, message = %response.message, "http response");
        Ok(response)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorLogger;

impl ErrorInterceptor for ErrorLogger {
    fn intercept(&self, err: ClientError) -> std::result::Result<ClientError, ClientError> {
        error!(error = %err, code = ?err.code(), "http error");
        Ok(err)
    }
}

// == Factory ==
/// Builds a client against `config.api.api_base_url`.
///
/// The timeout interceptor is always installed. The auth interceptor follows
/// when storage is given; the loggers only when `enable_log` is on.
pub fn build_client(
    config: &Config,
    transport: Arc<dyn Transport>,
    storage: Option<Arc<LocalStorage>>,
) -> HttpClient {
    let mut client = HttpClient::new(config.api.api_base_url.clone(), transport);

    client.add_request_interceptor(TimeoutInterceptor::new(config.api.timeout()));
    if let Some(storage) = storage {
        client.add_request_interceptor(AuthInterceptor::new(storage));
    }

    if config.api.enable_log {
        client
            .add_request_interceptor(RequestLogger)
            .add_response_interceptor(ResponseLogger)
            .add_error_interceptor(ErrorLogger);
    }

    let (request, response, error) = client.interceptors().counts();
    debug!(request, response, error, "interceptors registered");
    client
}
