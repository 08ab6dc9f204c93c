//! Request, response and error interceptor chains.
//!
//! Each chain runs in registration order, feeding the output of one
//! interceptor into the next. There is no priority or removal API.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::http::{ApiResponse, RequestOptions};

/// Transforms request options before the request is issued.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, options: RequestOptions) -> Result<RequestOptions>;
}

impl<F> RequestInterceptor for F
where
    F: Fn(RequestOptions) -> Result<RequestOptions> + Send + Sync,
{
    fn intercept(&self, options: RequestOptions) -> Result<RequestOptions> {
        self(options)
    }
}

/// Transforms a parsed envelope before its code is checked. May be async.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    async fn intercept(&self, response: ApiResponse<Value>) -> Result<ApiResponse<Value>>;
}

#[async_trait]
impl<F> ResponseInterceptor for F
where
    F: Fn(ApiResponse<Value>) -> Result<ApiResponse<Value>> + Send + Sync,
{
    async fn intercept(&self, response: ApiResponse<Value>) -> Result<ApiResponse<Value>> {
        self(response)
    }
}

/// Observes or transforms a failure on its way back to the caller.
///
/// `Ok(error)` passes a (possibly different) error to the next interceptor.
/// `Err(error)` means the interceptor itself failed; that error replaces the
/// one being processed and the chain carries on.
pub trait ErrorInterceptor: Send + Sync {
    fn intercept(&self, error: ClientError) -> std::result::Result<ClientError, ClientError>;
}

impl<F> ErrorInterceptor for F
where
    F: Fn(ClientError) -> std::result::Result<ClientError, ClientError> + Send + Sync,
{
    fn intercept(&self, error: ClientError) -> std::result::Result<ClientError, ClientError> {
        self(error)
    }
}

// == Interceptors ==
/// The three ordered chains owned by an [`HttpClient`](crate::http::HttpClient).
#[derive(Default)]
pub struct Interceptors {
    request: Vec<Box<dyn RequestInterceptor>>,
    response: Vec<Box<dyn ResponseInterceptor>>,
    error: Vec<Box<dyn ErrorInterceptor>>,
}

impl Interceptors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_request<I: RequestInterceptor + 'static>(&mut self, interceptor: I) -> &mut Self {
        self.request.push(Box::new(interceptor));
        self
    }

    pub fn add_response<I: ResponseInterceptor + 'static>(&mut self, interceptor: I) -> &mut Self {
        self.response.push(Box::new(interceptor));
        self
    }

    pub fn add_error<I: ErrorInterceptor + 'static>(&mut self, interceptor: I) -> &mut Self {
        self.error.push(Box::new(interceptor));
        self
    }

    /// Given `[f1, f2]`, returns `f2(f1(options))`. Stops at the first failure.
    pub fn run_request(&self, options: RequestOptions) -> Result<RequestOptions> {
        self.request
            .iter()
            .try_fold(options, |opts, interceptor| interceptor.intercept(opts))
    }

    /// Awaits each response interceptor in turn. Stops at the first failure.
    pub async fn run_response(&self, response: ApiResponse<Value>) -> Result<ApiResponse<Value>> {
        let mut result = response;
        for interceptor in &self.response {
            result = interceptor.intercept(result).await?;
        }
        Ok(result)
    }

    /// Runs every error interceptor; a failing interceptor's error replaces
    /// the current one.
    pub fn run_error(&self, error: ClientError) -> ClientError {
        self.error
            .iter()
            .fold(error, |err, interceptor| match interceptor.intercept(err) {
                Ok(next) | Err(next) => next,
            })
    }

    /// Number of (request, response, error) interceptors.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.request.len(), self.response.len(), self.error.len())
    }
}

impl std::fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptors")
            .field("request", &self.request.len())
            .field("response", &self.response.len())
            .field("error", &self.error.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_chain_preserves_order() {
        let mut chain = Interceptors::new();
        chain
            .add_request(|mut opts: RequestOptions| -> Result<RequestOptions> {
                opts.url.push_str("/f1");
                Ok(opts)
            })
            .add_request(|mut opts: RequestOptions| -> Result<RequestOptions> {
                opts.url.push_str("/f2");
                Ok(opts)
            });

        let out = chain.run_request(RequestOptions::get("/base")).unwrap();
        assert_eq!(out.url, "/base/f1/f2");
    }

    #[test]
    fn test_request_chain_stops_on_failure() {
        let mut chain = Interceptors::new();
        chain
            .add_request(|_: RequestOptions| -> Result<RequestOptions> {
                Err(ClientError::Interceptor("rejected".to_string()))
            })
            .add_request(|_: RequestOptions| -> Result<RequestOptions> {
                panic!("second interceptor must not run")
            });

        let result = chain.run_request(RequestOptions::get("/x"));
        assert!(matches!(result, Err(ClientError::Interceptor(_))));
    }

    #[tokio::test]
    async fn test_response_chain_runs_sequentially() {
        let mut chain = Interceptors::new();
        chain
            .add_response(|mut resp: ApiResponse<Value>| -> Result<ApiResponse<Value>> {
                resp.message.push('a');
                Ok(resp)
            })
            .add_response(|mut resp: ApiResponse<Value>| -> Result<ApiResponse<Value>> {
                resp.message.push('b');
                Ok(resp)
            });

        let out = chain
            .run_response(ApiResponse::ok(json!(null)))
            .await
            .unwrap();
        assert_eq!(out.message, "okab");
    }

    #[test]
    fn test_error_chain_failure_replaces_error() {
        let mut chain = Interceptors::new();
        chain
            .add_error(|_: ClientError| -> std::result::Result<ClientError, ClientError> {
                Err(ClientError::Interceptor("logger crashed".to_string()))
            })
            .add_error(|err: ClientError| -> std::result::Result<ClientError, ClientError> {
                // Sees the replacement, not the original
                assert!(matches!(err, ClientError::Interceptor(_)));
                Ok(ClientError::business(99, "rewritten", None))
            });

        let out = chain.run_error(ClientError::Timeout(10));
        assert_eq!(out.to_string(), "rewritten");
    }

    #[test]
    fn test_empty_chains_are_identity() {
        let chain = Interceptors::new();
        let opts = RequestOptions::get("/same");
        assert_eq!(chain.run_request(opts.clone()).unwrap(), opts);
        assert!(matches!(
            chain.run_error(ClientError::Timeout(5)),
            ClientError::Timeout(5)
        ));
        assert_eq!(chain.counts(), (0, 0, 0));
    }
}
