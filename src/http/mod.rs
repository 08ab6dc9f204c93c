//! HTTP layer
//!
//! A thin client over a pluggable transport. Every call goes through the
//! same pipeline: request interceptors, one transport call, envelope
//! validation, response interceptors, business code check. Failures take
//! the error interceptor chain and end up as a toast unless suppressed.

pub mod builtin;
pub mod client;
pub mod interceptor;
pub mod notifier;
pub mod request;
pub mod response;
#[cfg(test)]
pub mod testing;
pub mod transport;


pub use builtin::{
    build_client, AuthInterceptor, ErrorLogger, RequestLogger, ResponseLogger, TimeoutInterceptor,
};
pub use client::HttpClient;
pub use interceptor::{ErrorInterceptor, Interceptors, RequestInterceptor, ResponseInterceptor};
pub use notifier::{Notifier, TracingNotifier};
pub use request::{format_params, full_url, Method, Params, RequestOptions};
pub use response::{ApiResponse, RawResponse};
pub use transport::{ReqwestTransport, Transport, TransportRequest};
