use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ActionError, FetchError};
use crate::model::{ServiceAction, ServiceStatusRecord};

const LATEST_STATUSES: &str = "/api/svc/get_latest_statuses";
const REMOVE_SERVICE: &str = "/api/hosts/remove_service";

/// Remote side of the dashboard: the service monitor's HTTP API.
///
/// Every call is one round trip. Nothing is retried, cached or deduplicated
/// here; whether repeating a call is harmless is up to the remote end.
pub trait StatusRepository: Send + Sync + 'static {
    /// Latest status row for every followed service on every host.
    fn fetch_snapshot(
        &self,
    ) -> impl Future<Output = Result<Vec<ServiceStatusRecord>, FetchError>> + Send;

    /// Run `systemctl <action>` for a service. The returned value is whatever the
    /// monitor put in `data`; a success only means the command was delivered.
    fn invoke_action(
        &self,
        hostname: &str,
        service: &str,
        action: ServiceAction,
    ) -> impl Future<Output = Result<Value, ActionError>> + Send;

    /// Remove a service from the monitored set.
    fn unfollow_service(
        &self,
        hostname: &str,
        service: &str,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;

    /// `systemctl status` output lines.
    fn service_status(
        &self,
        hostname: &str,
        service: &str,
    ) -> impl Future<Output = Result<Vec<String>, ActionError>> + Send;

    /// `systemctl show` properties.
    fn service_properties(
        &self,
        hostname: &str,
        service: &str,
    ) -> impl Future<Output = Result<BTreeMap<String, String>, ActionError>> + Send;
}

/// reqwest-backed [`StatusRepository`].
#[derive(Clone)]
pub struct StatusClient {
    base_url: String,
    client: Client,
}

impl StatusClient {
    /// `base_url` is scheme + host (+ optional port), e.g. `http://monitor:8000`.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|e| {
                    warn!(error = %e, "http client setup failed, falling back to defaults without a timeout");
                    Client::new()
                }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn systemctl<T: DeserializeOwned>(
        &self,
        operation: &str,
        hostname: &str,
        service: &str,
    ) -> Result<T, ActionError> {
        let resp = self
            .client
            .get(self.url(&format!("/api/systemctl/{}", operation)))
            .query(&[("host", hostname), ("service", service)])
            .send()
            .await;
        read_data(resp)
            .await
            .map_err(|f| f.into_action(operation, hostname, service))
    }
}

impl StatusRepository for StatusClient {
    async fn fetch_snapshot(&self) -> Result<Vec<ServiceStatusRecord>, FetchError> {
        let resp = self.client.get(self.url(LATEST_STATUSES)).send().await;
        read_data(resp).await.map_err(CallFailure::into_fetch)
    }

    async fn invoke_action(
        &self,
        hostname: &str,
        service: &str,
        action: ServiceAction,
    ) -> Result<Value, ActionError> {
        self.systemctl(action.as_str(), hostname, service).await
    }

    async fn unfollow_service(&self, hostname: &str, service: &str) -> Result<(), ActionError> {
        let body = serde_json::json!({ "hostname": hostname, "service": service });
        let resp = self.client.patch(self.url(REMOVE_SERVICE)).json(&body).send().await;
        // Success replies carry only a status/message envelope, no `data`.
        read_ack(resp)
            .await
            .map_err(|f| f.into_action("unfollow", hostname, service))
    }

    async fn service_status(&self, hostname: &str, service: &str) -> Result<Vec<String>, ActionError> {
        self.systemctl("status", hostname, service).await
    }

    async fn service_properties(
        &self,
        hostname: &str,
        service: &str,
    ) -> Result<BTreeMap<String, String>, ActionError> {
        self.systemctl("show", hostname, service).await
    }
}

// --- Response decoding ---

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct Ack {
    status: String,
    message: Option<String>,
}

#[derive(Deserialize)]
struct FailureEnvelope {
    message: Option<String>,
}

/// Why a call failed, before it is tagged with what was being attempted.
#[derive(Debug)]
enum CallFailure {
    Transport(String),
    Status { code: u16, message: String },
    Decode(String),
}

impl CallFailure {
    fn into_fetch(self) -> FetchError {
        match self {
            CallFailure::Transport(reason) => FetchError::Transport(reason),
            CallFailure::Status { code, message } => FetchError::Status { code, message },
            CallFailure::Decode(reason) => FetchError::Decode(reason),
        }
    }

    fn into_action(self, operation: &str, hostname: &str, service: &str) -> ActionError {
        let operation = operation.to_string();
        let hostname = hostname.to_string();
        let service = service.to_string();
        match self {
            CallFailure::Transport(reason) => ActionError::Transport { operation, hostname, service, reason },
            CallFailure::Status { code, message } => {
                ActionError::Status { operation, hostname, service, code, message }
            }
            CallFailure::Decode(reason) => ActionError::Decode { operation, hostname, service, reason },
        }
    }
}

/// Body of a 2xx response. Non-2xx bodies are mined for the monitor's
/// `{"status": "fail", "message": ...}` envelope.
async fn read_body(resp: Result<Response, reqwest::Error>) -> Result<Vec<u8>, CallFailure> {
    let resp = resp.map_err(|e| CallFailure::Transport(e.to_string()))?;
    let status = resp.status();
    let body = resp
        .bytes()
        .await
        .map_err(|e| CallFailure::Transport(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_slice::<FailureEnvelope>(&body)
            .ok()
            .and_then(|f| f.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unexpected status").to_string());
        return Err(CallFailure::Status { code: status.as_u16(), message });
    }

    Ok(body.to_vec())
}

async fn read_data<T: DeserializeOwned>(
    resp: Result<Response, reqwest::Error>,
) -> Result<T, CallFailure> {
    let body = read_body(resp).await?;
    serde_json::from_slice::<Envelope<T>>(&body)
        .map(|e| e.data)
        .map_err(|e| CallFailure::Decode(e.to_string()))
}

/// A 2xx reply that must still be the monitor's `{status, message}` envelope.
async fn read_ack(resp: Result<Response, reqwest::Error>) -> Result<(), CallFailure> {
    let body = read_body(resp).await?;
    let ack = serde_json::from_slice::<Ack>(&body).map_err(|e| CallFailure::Decode(e.to_string()))?;
    debug!(status = %ack.status, message = ?ack.message, "acknowledged");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = StatusClient::new("http://monitor:8000/", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://monitor:8000");
        assert_eq!(client.url(LATEST_STATUSES), "http://monitor:8000/api/svc/get_latest_statuses");
    }

    #[test]
    fn call_failures_keep_their_kind() {
        let fetch = CallFailure::Status { code: 404, message: "Not Found".into() }.into_fetch();
        assert_eq!(fetch, FetchError::Status { code: 404, message: "Not Found".into() });

        let action = CallFailure::Decode("expected value".into()).into_action("show", "web1", "nginx");
        assert!(matches!(action, ActionError::Decode { ref operation, .. } if operation == "show"));
    }
}
