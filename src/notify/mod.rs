//! Outcome notifications
//!
//! The backup lifecycle only needs to hand a message to something that
//! delivers it. Delivery problems are logged by the notifier and never
//! reach the caller.

mod webhook;

#[cfg(test)]
pub(crate) mod testing;

pub use webhook::WebhookNotifier;

use tracing::debug;

use crate::config::settings::ExternalSettings;

/// Delivers a human-readable message somewhere; never fails
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Used when no endpoint is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, message: &str) {
        debug!("No notification endpoint configured, dropping: {}", message);
    }
}

/// Build the notifier described by the `External` settings section
pub fn notifier_from_settings(external: &ExternalSettings) -> Box<dyn Notifier> {
    let url = external.webhook_url.trim();
    if url.is_empty() {
        Box::new(NoopNotifier)
    } else {
        Box::new(WebhookNotifier::new(url, external.webhook_timeout()))
    }
}
