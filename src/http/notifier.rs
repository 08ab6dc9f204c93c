//! User-facing feedback: loading indicator and toast.

use tracing::{info, warn};

/// Surface for the loading indicator and transient error toasts.
pub trait Notifier: Send + Sync {
    fn show_loading(&self, title: &str);
    fn hide_loading(&self);
    fn show_toast(&self, message: &str);
}

/// Default notifier that turns feedback into log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_loading(&self, title: &str) {
        info!(title, "loading");
    }

    fn hide_loading(&self) {
        info!("loading finished");
    }

    fn show_toast(&self, message: &str) {
        warn!(message, "toast");
    }
}
