// Outbound webhook dispatch
//
// Builds the derived payload for a contact execution and POSTs it to the
// operator-configured webhook URL. One attempt per execution, bounded by a
// timeout; no retries.

use crate::contact::ContactRecord;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Identifies the host platform in every outbound payload.
pub const SOURCE: &str = "SalesforceMarketingCloud";

/// Fixed-shape payload delivered to the configured webhook.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundPayload {
    pub source: &'static str,
    /// ISO-8601 timestamp taken at request-processing time.
    pub timestamp: String,
    pub contact_key: String,
    pub email: String,
    pub first_name: String,
    pub journey_name: String,
}

impl OutboundPayload {
    pub fn new(contact: ContactRecord) -> Self {
        Self {
            source: SOURCE,
            // Millisecond precision to match the host ecosystem's ISO strings
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            contact_key: contact.contact_key,
            email: contact.email_address,
            first_name: contact.first_name,
            journey_name: contact.journey_name,
        }
    }
}

/// Why a dispatch did not reach a server.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The activity configuration carries no destination URL
    #[error("No webhookUrl configured")]
    Unconfigured,

    /// Transport-level failure: DNS, connect, timeout, malformed response
    #[error("{0}")]
    Transport(String),
}

/// Webhook dispatcher over a shared HTTP client.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl WebhookDispatcher {
    /// Create a dispatcher whose outbound calls are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Deliver one contact execution to the configured webhook.
    ///
    /// An empty or missing `webhook_url` fails fast with no network attempt.
    /// Any HTTP answer from the remote endpoint counts as delivered and its
    /// status code is returned as-is; the webhook's own semantics are not
    /// policed here. Transport failures carry the client's diagnostic.
    pub async fn dispatch(
        &self,
        webhook_url: Option<&str>,
        contact: ContactRecord,
    ) -> Result<u16, DispatchError> {
        let url = match webhook_url {
            Some(url) if !url.is_empty() => url,
            _ => return Err(DispatchError::Unconfigured),
        };

        let payload = OutboundPayload::new(contact);
        debug!(url, payload = ?payload, "Sending payload to webhook");

        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        debug!(url, status, "Webhook answered");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_contact() -> ContactRecord {
        ContactRecord::from_in_arguments(&[])
    }

    #[test]
    fn test_payload_shape() {
        let payload = OutboundPayload::new(sample_contact());
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["source"], "SalesforceMarketingCloud");
        assert_eq!(value["contactKey"], "N/A");
        assert_eq!(value["email"], "N/A");
        assert_eq!(value["firstName"], "N/A");
        assert_eq!(value["journeyName"], "N/A");
        // Renamed fields only; the record's own names must not leak
        assert!(value.get("emailAddress").is_none());
    }

    #[test]
    fn test_payload_timestamp_is_rfc3339() {
        let payload = OutboundPayload::new(sample_contact());
        assert!(chrono::DateTime::parse_from_rfc3339(&payload.timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_missing_url_fails_fast() {
        let dispatcher = WebhookDispatcher::new(Duration::from_secs(1));
        let result = dispatcher.dispatch(None, sample_contact()).await;
        assert!(matches!(result, Err(DispatchError::Unconfigured)));
    }

    #[tokio::test]
    async fn test_empty_url_fails_fast() {
        let dispatcher = WebhookDispatcher::new(Duration::from_secs(1));
        let result = dispatcher.dispatch(Some(""), sample_contact()).await;
        assert!(matches!(result, Err(DispatchError::Unconfigured)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let dispatcher = WebhookDispatcher::new(Duration::from_secs(1));
        // Port 9 on localhost is expected to refuse connections
        let result = dispatcher
            .dispatch(Some("http://127.0.0.1:9/hook"), sample_contact())
            .await;

        match result {
            Err(DispatchError::Transport(msg)) => assert!(!msg.is_empty()),
            other => panic!("expected transport failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unconfigured_message_is_host_contract() {
        assert_eq!(
            DispatchError::Unconfigured.to_string(),
            "No webhookUrl configured"
        );
    }
}
