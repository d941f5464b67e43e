//! JSON webhook delivery (Discord-compatible `{"content": ...}` payload)

use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};

use super::Notifier;

/// Posts each message to a webhook URL
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    timeout: Duration,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    fn post(&self, message: &str) -> Result<u16, ureq::Error> {
        let body = serde_json::to_vec(&json!({ "content": message }))
            .map_err(|e| ureq::Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        let config = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build();
        let agent = ureq::Agent::new_with_config(config);

        let response = agent
            .post(&self.url)
            .header("Content-Type", "application/json")
            .send(&body[..])?;

        Ok(response.status().as_u16())
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, message: &str) {
        match self.post(message) {
            Ok(status) if (200..300).contains(&status) => {
                info!("Notification sent (status {})", status);
            }
            Ok(status) => {
                warn!("Failed to send notification. Status code: {}", status);
            }
            Err(ureq::Error::StatusCode(status)) => {
                warn!("Failed to send notification. Status code: {}", status);
            }
            Err(e) => {
                warn!("Error sending notification: {}", e);
            }
        }
    }
}
