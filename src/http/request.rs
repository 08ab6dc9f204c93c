//! Request options and URL helpers.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Number, Value};
use url::form_urlencoded;

/// Timeout applied when neither the caller nor an interceptor sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Loading indicator title used when none is given.
pub const DEFAULT_LOADING_TITLE: &str = "Loading...";

// == Method ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

// == Params ==
/// Query parameters in insertion order.
///
/// Setting an existing key replaces its value in place. `Value::Null`
/// entries are kept here and dropped when the query string is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, Value)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

// == Request Options ==
/// Everything needed to issue one logical request.
///
/// Interceptors receive the options by value and hand back a (possibly
/// modified) copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Absolute URL or path relative to the client's base URL
    pub url: String,
    pub method: Method,
    /// JSON body, sent for non-GET requests only
    pub data: Option<Value>,
    /// Query parameters, used for GET requests only
    pub params: Option<Params>,
    pub headers: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
    pub show_loading: bool,
    pub loading_title: Option<String>,
    /// Skip the user-facing toast on failure
    pub ignore_error: bool,
}

impl RequestOptions {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            ..Self::default()
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Shows the loading indicator with `title` while the request runs.
    pub fn with_loading(mut self, title: impl Into<String>) -> Self {
        self.show_loading = true;
        self.loading_title = Some(title.into());
        self
    }

    pub fn ignoring_errors(mut self) -> Self {
        self.ignore_error = true;
        self
    }

    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn effective_loading_title(&self) -> &str {
        self.loading_title.as_deref().unwrap_or(DEFAULT_LOADING_TITLE)
    }
}

// == URL Helpers ==
/// Resolves `url` against `base_url`.
///
/// URLs that already carry an `http://` or `https://` scheme are returned
/// unchanged. Otherwise the two parts are joined with exactly one `/`.
pub fn full_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        url.trim_start_matches('/')
    )
}

/// Builds `?k=v&...` from `params`, or an empty string when nothing remains.
///
/// Null values are dropped. Objects and arrays are JSON-encoded before being
/// percent-encoded; strings are used as-is.
pub fn format_params(params: Option<&Params>) -> String {
    let Some(params) = params else {
        return String::new();
    };

    let pairs: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Number(n) => format_number(n),
                other => other.to_string(),
            };
            Some(format!(
                "{}={}",
                encode_uri_component(key),
                encode_uri_component(&text)
            ))
        })
        .collect();

    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

/// Largest float whose integer part is exact.
const MAX_SAFE_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Integral floats print without a fraction, so `1.0` becomes `1`.
fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_SAFE_FLOAT => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Characters left unescaped in a URI component.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Reverses [`encode_uri_component`]. Invalid escapes are kept literally.
pub fn decode_uri_component(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}

/// Splits a query string (with or without the leading `?`) into decoded pairs.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}
