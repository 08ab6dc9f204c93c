//! Generic HTTP client with interceptor pipeline.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::http::request::{format_params, full_url};
use crate::http::{
    ApiResponse, ErrorInterceptor, Interceptors, Method, Notifier, Params, RequestInterceptor,
    RequestOptions, ResponseInterceptor, TracingNotifier, Transport, TransportRequest,
};

/// Performs one logical request at a time, applying interceptors, loading
/// feedback and error notification uniformly.
///
/// Interceptors are registered during setup through `&mut self`; once the
/// client is shared behind an `Arc` the chains are fixed.
pub struct HttpClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    interceptors: Interceptors,
}

/// Hides the loading indicator when dropped, whatever the outcome.
struct LoadingGuard<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> LoadingGuard<'a> {
    fn show(notifier: &'a dyn Notifier, title: &str) -> Self {
        notifier.show_loading(title);
        Self { notifier }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.notifier.hide_loading();
    }
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            notifier: Arc::new(TracingNotifier),
            interceptors: Interceptors::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn interceptors(&self) -> &Interceptors {
        &self.interceptors
    }

    pub fn interceptors_mut(&mut self) -> &mut Interceptors {
        &mut self.interceptors
    }

    pub fn add_request_interceptor<I: RequestInterceptor + 'static>(&mut self, interceptor: I) -> &mut Self {
        self.interceptors.add_request(interceptor);
        self
    }

    pub fn add_response_interceptor<I: ResponseInterceptor + 'static>(&mut self, interceptor: I) -> &mut Self {
        self.interceptors.add_response(interceptor);
        self
    }

    pub fn add_error_interceptor<I: ErrorInterceptor + 'static>(&mut self, interceptor: I) -> &mut Self {
        self.interceptors.add_error(interceptor);
        self
    }

    /// Resolves `url` against this client's base URL.
    pub fn full_url(&self, url: &str) -> String {
        full_url(&self.base_url, url)
    }

    // == Request ==
    /// Runs one request through the pipeline and returns the envelope's `data`.
    ///
    /// 1. Request interceptors, in registration order
    /// 2. Loading indicator, if requested
    /// 3. URL resolution; GET appends the query string, other methods send `data`
    /// 4. One transport call
    /// 5. Non-2xx status fails; the body is parsed as an envelope
    /// 6. Response interceptors, awaited in order
    /// 7. `code != 0` fails with the envelope message
    ///
    /// Any failure passes through the error interceptors, is toasted unless
    /// `ignore_error` is set, and is returned to the caller.
    pub async fn request<T: DeserializeOwned>(&self, options: RequestOptions) -> Result<T> {
        let ignore_error = options.ignore_error;

        let options = match self.interceptors.run_request(options) {
            Ok(options) => options,
            Err(error) => return Err(self.fail(error, ignore_error)),
        };

        let _loading = options
            .show_loading
            .then(|| LoadingGuard::show(self.notifier.as_ref(), options.effective_loading_title()));

        match self.execute(&options).await {
            Ok(value) => Ok(value),
            Err(error) => Err(self.fail(error, options.ignore_error)),
        }
    }

    async fn execute<T: DeserializeOwned>(&self, options: &RequestOptions) -> Result<T> {
        let is_get = options.method == Method::Get;
        let mut url = self.full_url(&options.url);
        if is_get {
            url.push_str(&format_params(options.params.as_ref()));
        }

        let request = TransportRequest {
            url,
            method: options.method,
            headers: options.headers.clone(),
            body: if is_get { None } else { options.data.clone() },
            timeout: options.effective_timeout(),
        };

        debug!(method = %request.method, url = %request.url, "sending request");
        let raw = self.transport.send(request).await?;

        if !raw.is_success() {
            return Err(ClientError::Status {
                status: raw.status,
                body: raw.body_json(),
            });
        }

        let envelope = ApiResponse::<Value>::parse(&raw.body)?;
        let envelope = self.interceptors.run_response(envelope).await?;
        let data = envelope.into_result()?;

        serde_json::from_value(data).map_err(|e| {
            ClientError::MalformedEnvelope(format!("unexpected `data` shape: {}", e))
        })
    }

    fn fail(&self, error: ClientError, ignore_error: bool) -> ClientError {
        let error = self.interceptors.run_error(error);
        if !ignore_error {
            self.notifier.show_toast(&error.user_message());
        }
        error
    }

    /// Serializes a request body. A failure takes the same error path as
    /// any other request failure.
    fn encode_body<B: Serialize>(&self, data: Option<&B>, ignore_error: bool) -> Result<Option<Value>> {
        data.map(serde_json::to_value)
            .transpose()
            .map_err(|e| self.fail(ClientError::Encode(e.to_string()), ignore_error))
    }

    // == Convenience Methods ==
    pub async fn get<T: DeserializeOwned>(&self, url: &str, params: Option<Params>) -> Result<T> {
        self.request(RequestOptions {
            params,
            ..RequestOptions::get(url)
        })
        .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, url: &str, data: Option<&B>) -> Result<T> {
        self.request(RequestOptions {
            data: self.encode_body(data, false)?,
            ..RequestOptions::post(url)
        })
        .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, url: &str, data: Option<&B>) -> Result<T> {
        self.request(RequestOptions {
            data: self.encode_body(data, false)?,
            ..RequestOptions::put(url)
        })
        .await
    }

    /// DELETE carries its parameters in `params`, which non-GET requests do
    /// not send. Use [`request`](Self::request) with `data` for a body.
    pub async fn delete<T: DeserializeOwned>(&self, url: &str, params: Option<Params>) -> Result<T> {
        self.request(RequestOptions {
            params,
            ..RequestOptions::delete(url)
        })
        .await
    }

    /// GET with extra options (headers, loading, ...). `url`, method and
    /// params override whatever `options` holds.
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        url: &str,
        params: Option<Params>,
        options: RequestOptions,
    ) -> Result<T> {
        self.request(RequestOptions {
            url: url.to_string(),
            method: Method::Get,
            params,
            ..options
        })
        .await
    }

    /// PUT with extra options. `url`, method and data override `options`.
    pub async fn put_with<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        data: Option<&B>,
        options: RequestOptions,
    ) -> Result<T> {
        self.request(RequestOptions {
            url: url.to_string(),
            method: Method::Put,
            data: self.encode_body(data, options.ignore_error)?,
            ..options
        })
        .await
    }
}


impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NETWORK_FAILURE_MESSAGE;
    use crate::http::testing::{FnTransport, Notice, RecordingNotifier};
    use crate::http::RawResponse;
    use serde_json::json;

    const BASE: &str = "https://api.example.com";

    fn client_with(
        handler: impl Fn(&TransportRequest) -> Result<RawResponse> + Send + Sync + 'static,
    ) -> (HttpClient, Arc<FnTransport>, Arc<RecordingNotifier>) {
        let transport = Arc::new(FnTransport::new(handler));
        let notifier = Arc::new(RecordingNotifier::new());
        let client = HttpClient::new(BASE, transport.clone()).with_notifier(notifier.clone());
        (client, transport, notifier)
    }

    #[tokio::test]
    async fn test_get_builds_url_and_returns_data() {
        let (client, transport, notifier) = client_with(|_| {
            Ok(RawResponse::envelope(
                0,
                json!({"list": [], "total": 6, "current": 1, "pageSize": 6}),
                "ok",
            ))
        });

        let params = Params::new().with("current", 1).with("pageSize", 6);
        let data: Value = client.get("/regions", Some(params)).await.unwrap();

        assert_eq!(data["total"], 6);
        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "https://api.example.com/regions?current=1&pageSize=6");
        assert_eq!(sent[0].method, Method::Get);
        assert!(sent[0].body.is_none());
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_business_error_rejects_and_toasts() {
        let (client, _transport, notifier) =
            client_with(|_| Ok(RawResponse::json(200, &json!({"code": 1, "message": "not found"}))));

        let err = client.get::<Value>("/regions/zzz", None).await.unwrap_err();

        assert_eq!(err.to_string(), "not found");
        assert_eq!(notifier.toasts(), vec!["not found".to_string()]);
    }

    #[tokio::test]
    async fn test_http_status_error() {
        let (client, _transport, notifier) =
            client_with(|_| Ok(RawResponse::json(503, &json!({"error": "busy"}))));

        let err = client.get::<Value>("/regions", None).await.unwrap_err();

        match &err {
            ClientError::Status { status, body } => {
                assert_eq!(*status, 503);
                assert_eq!(body.as_ref(), Some(&json!({"error": "busy"})));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(notifier.toasts(), vec!["HTTP Error: 503".to_string()]);
    }

    #[tokio::test]
    async fn test_network_error_gets_generic_toast() {
        let (client, _transport, notifier) =
            client_with(|_| Err(ClientError::Network("connection refused".to_string())));

        let err = client.get::<Value>("/regions", None).await.unwrap_err();

        assert!(matches!(err, ClientError::Network(_)));
        assert_eq!(notifier.toasts(), vec![NETWORK_FAILURE_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_ignore_error_suppresses_toast() {
        let (client, _transport, notifier) =
            client_with(|_| Ok(RawResponse::envelope(2, Value::Null, "denied")));

        let result: Result<Value> = client
            .request(RequestOptions::get("/regions").ignoring_errors())
            .await;

        assert!(result.is_err());
        assert!(notifier.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_envelope_is_distinct_error() {
        let (client, _transport, _notifier) =
            client_with(|_| Ok(RawResponse::new(200, "<html>gateway</html>")));

        let err = client.get::<Value>("/regions", None).await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedEnvelope(_)));
    }

    #[tokio::test]
    async fn test_non_get_sends_body_and_ignores_params() {
        let (client, transport, _notifier) =
            client_with(|_| Ok(RawResponse::envelope(0, json!({"isOn": true}), "ok")));

        let options = RequestOptions::put("/devices/1/status")
            .with_data(json!({"isOn": true}))
            .with_params(Params::new().with("dropped", 1));
        let _: Value = client.request(options).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].url, "https://api.example.com/devices/1/status");
        assert_eq!(sent[0].method, Method::Put);
        assert_eq!(sent[0].body, Some(json!({"isOn": true})));
    }

    #[tokio::test]
    async fn test_absolute_url_bypasses_base() {
        let (client, transport, _notifier) =
            client_with(|_| Ok(RawResponse::envelope(0, Value::Null, "ok")));

        let _: Value = client.get("http://x/y", None).await.unwrap();
        assert_eq!(transport.requests()[0].url, "http://x/y");
    }

    #[tokio::test]
    async fn test_loading_shown_and_hidden_on_success_and_failure() {
        let (client, _transport, notifier) =
            client_with(|req| match req.url.ends_with("/ok") {
                true => Ok(RawResponse::envelope(0, Value::Null, "ok")),
                false => Ok(RawResponse::envelope(1, Value::Null, "bad")),
            });

        let _: Value = client
            .request(RequestOptions::get("/ok").with_loading("Fetching"))
            .await
            .unwrap();
        let _ = client
            .request::<Value>(RequestOptions::get("/fail").with_loading("Fetching"))
            .await;

        assert_eq!(
            notifier.notices(),
            vec![
                Notice::ShowLoading("Fetching".to_string()),
                Notice::HideLoading,
                Notice::ShowLoading("Fetching".to_string()),
                Notice::Toast("bad".to_string()),
                Notice::HideLoading,
            ]
        );
    }

    #[tokio::test]
    async fn test_request_interceptors_apply_in_order() {
        let (mut client, transport, _notifier) =
            client_with(|_| Ok(RawResponse::envelope(0, Value::Null, "ok")));
        client
            .add_request_interceptor(|opts: RequestOptions| -> Result<RequestOptions> {
                Ok(opts.with_header("x-order", "f1"))
            })
            .add_request_interceptor(|mut opts: RequestOptions| -> Result<RequestOptions> {
                let prev = opts.headers.get("x-order").cloned().unwrap_or_default();
                opts.headers.insert("x-order".to_string(), format!("{}>f2", prev));
                Ok(opts)
            });

        let _: Value = client.get("/regions", None).await.unwrap();
        assert_eq!(
            transport.requests()[0].headers.get("x-order").map(String::as_str),
            Some("f1>f2")
        );
    }

    #[tokio::test]
    async fn test_response_interceptor_can_turn_success_into_failure() {
        let (mut client, _transport, notifier) =
            client_with(|_| Ok(RawResponse::envelope(0, json!(1), "ok")));
        client.add_response_interceptor(
            |mut resp: ApiResponse<Value>| -> Result<ApiResponse<Value>> {
                resp.code = 401;
                resp.message = "session expired".to_string();
                Ok(resp)
            },
        );

        let err = client.get::<Value>("/regions", None).await.unwrap_err();
        assert_eq!(err.code(), Some(401));
        assert_eq!(notifier.toasts(), vec!["session expired".to_string()]);
    }

    #[tokio::test]
    async fn test_error_interceptors_transform_before_toast() {
        let (mut client, _transport, notifier) =
            client_with(|_| Err(ClientError::Timeout(10_000)));
        client.add_error_interceptor(
            |_: ClientError| -> std::result::Result<ClientError, ClientError> {
                Ok(ClientError::business(-1, "server is slow", None))
            },
        );

        let err = client.get::<Value>("/regions", None).await.unwrap_err();
        assert_eq!(err.to_string(), "server is slow");
        assert_eq!(notifier.toasts(), vec!["server is slow".to_string()]);
    }

    #[tokio::test]
    async fn test_failing_request_interceptor_skips_transport() {
        let (mut client, transport, notifier) =
            client_with(|_| Ok(RawResponse::envelope(0, Value::Null, "ok")));
        client.add_request_interceptor(|_: RequestOptions| -> Result<RequestOptions> {
            Err(ClientError::Interceptor("no token".to_string()))
        });

        let err = client.get::<Value>("/regions", None).await.unwrap_err();
        assert!(matches!(err, ClientError::Interceptor(_)));
        assert_eq!(transport.call_count(), 0);
        assert_eq!(notifier.toasts(), vec![NETWORK_FAILURE_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_data_shape_mismatch_is_malformed() {
        let (client, _transport, _notifier) =
            client_with(|_| Ok(RawResponse::envelope(0, json!("text"), "ok")));

        let err = client.get::<Vec<u32>>("/regions", None).await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedEnvelope(_)));
    }

    #[tokio::test]
    async fn test_unencodable_body_takes_error_path() {
        use std::collections::HashMap;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let (mut client, transport, notifier) =
            client_with(|_| Ok(RawResponse::envelope(0, Value::Null, "ok")));
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        client.add_error_interceptor(
            move |e: ClientError| -> std::result::Result<ClientError, ClientError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(e)
            },
        );

        // Tuple keys cannot become JSON object keys
        let body: HashMap<(i32, i32), i32> = HashMap::from([((1, 2), 3)]);
        let err = client.post::<Value, _>("/devices/1/status", Some(&body)).await.unwrap_err();

        assert!(matches!(err, ClientError::Encode(_)));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(transport.call_count(), 0);
        assert_eq!(notifier.toasts(), vec![NETWORK_FAILURE_MESSAGE.to_string()]);
    }
}
