//! In-memory stand-ins for the transport and notifier seams.
//!
//! Compiled for unit tests only.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::http::{Notifier, RawResponse, Transport, TransportRequest};

type Handler = Box<dyn Fn(&TransportRequest) -> Result<RawResponse> + Send + Sync>;

/// Transport that answers every request with a closure and records what it saw.
pub struct FnTransport {
    handler: Handler,
    requests: Mutex<Vec<TransportRequest>>,
}

impl FnTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&TransportRequest) -> Result<RawResponse> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of requests whose URL starts with `prefix`.
    pub fn calls_to(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.url.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl Transport for FnTransport {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse> {
        let response = (self.handler)(&request);
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        response
    }
}

/// Something the client asked the notifier to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ShowLoading(String),
    HideLoading,
    Toast(String),
}

/// Notifier that keeps every call for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn toasts(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|n| match n {
                Notice::Toast(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn push(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}

impl Notifier for RecordingNotifier {
    fn show_loading(&self, title: &str) {
        self.push(Notice::ShowLoading(title.to_string()));
    }

    fn hide_loading(&self) {
        self.push(Notice::HideLoading);
    }

    fn show_toast(&self, message: &str) {
        self.push(Notice::Toast(message.to_string()));
    }
}
