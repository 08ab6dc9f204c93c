//! MES Client - telemetry client core for equipment monitoring
//!
//! An interceptor-driven HTTP client, a TTL cache-aside layer, and the
//! region / customer / device services built on both.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod services;
pub mod storage;

pub use config::{Config, Environment};
pub use error::{ClientError, Result};
pub use http::{HttpClient, ReqwestTransport};
pub use services::Services;
pub use storage::LocalStorage;
