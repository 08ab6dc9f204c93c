//! Configuration Module
//!
//! Environment-keyed client configuration. `APP_ENV` selects one of three
//! presets; individual values can then be overridden by environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

// == Environment ==
/// Deployment environment the client is talking to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// Parses an environment name. Unknown names fall back to development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "test" => Environment::Test,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// Reads `APP_ENV`, defaulting to development.
    pub fn from_env() -> Self {
        env::var("APP_ENV")
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }
}

// == Env Config ==
/// Per-environment endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// Base URL prepended to relative API paths
    pub api_base_url: String,
    /// Upload endpoint
    pub upload_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Whether the logging interceptors are installed
    pub enable_log: bool,
    /// Whether the in-process mock backend is used
    pub enable_mock: bool,
}

impl EnvConfig {
    /// Returns the preset for the given environment.
    pub fn preset(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                api_base_url: "http://localhost:3000/api".to_string(),
                upload_url: "http://localhost:3000/upload".to_string(),
                timeout_ms: 10_000,
                enable_log: true,
                enable_mock: true,
            },
            Environment::Test => Self {
                api_base_url: "https://test-api.example.com".to_string(),
                upload_url: "https://test-api.example.com/upload".to_string(),
                timeout_ms: 15_000,
                enable_log: true,
                enable_mock: false,
            },
            Environment::Production => Self {
                api_base_url: "https://api.example.com".to_string(),
                upload_url: "https://api.example.com/upload".to_string(),
                timeout_ms: 20_000,
                enable_log: false,
                enable_mock: false,
            },
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// == Config ==
/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selected environment
    pub env: Environment,
    /// Endpoint settings for `env`
    pub api: EnvConfig,
    /// How long a cached list stays fresh, in seconds
    pub cache_ttl_secs: u64,
    /// Maximum number of keys each service cache holds
    pub max_cache_items: usize,
    /// Port the mock backend binds to when `api.enable_mock` is set
    pub mock_port: u16,
    /// Location of the local storage file (None = platform default)
    pub storage_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `APP_ENV` - `development` (default), `test` or `production`
    /// - `API_BASE_URL`, `UPLOAD_URL` - endpoint overrides
    /// - `REQUEST_TIMEOUT_MS` - request timeout override
    /// - `ENABLE_LOG`, `ENABLE_MOCK` - `true`/`false` overrides
    /// - `CACHE_TTL_SECS` - cache freshness window (default: 300)
    /// - `MAX_CACHE_ITEMS` - keys per service cache (default: 100)
    /// - `MOCK_PORT` - mock backend port (default: 3000)
    /// - `STORAGE_PATH` - local storage file
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let preset = EnvConfig::preset(env);
        let defaults = Self::for_env(env);

        Self {
            env,
            api: EnvConfig {
                api_base_url: env::var("API_BASE_URL").unwrap_or(preset.api_base_url),
                upload_url: env::var("UPLOAD_URL").unwrap_or(preset.upload_url),
                timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(preset.timeout_ms),
                enable_log: env::var("ENABLE_LOG")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(preset.enable_log),
                enable_mock: env::var("ENABLE_MOCK")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(preset.enable_mock),
            },
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
            max_cache_items: env::var("MAX_CACHE_ITEMS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_cache_items),
            mock_port: env::var("MOCK_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.mock_port),
            storage_path: env::var("STORAGE_PATH").ok().map(PathBuf::from),
        }
    }

    /// Returns the unmodified preset configuration for `env`.
    pub fn for_env(env: Environment) -> Self {
        Self {
            env,
            api: EnvConfig::preset(env),
            cache_ttl_secs: 300,
            max_cache_items: 100,
            mock_port: 3000,
            storage_path: None,
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_env(Environment::Development)
    }
}
