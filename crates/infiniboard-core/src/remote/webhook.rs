//! Webhook-backed remote store.
//!
//! A single endpoint receives `POST {action, data}` and answers with
//! `{success, result?, error?}`.

use super::{DocumentSummary, LoadResponse, RemoteError, RemoteResult, RemoteStore, SaveRequest};
use crate::storage::BoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookAction {
    Save,
    Load,
    List,
}

#[derive(Debug, Serialize)]
struct WebhookRequest<'a, T: Serialize> {
    action: WebhookAction,
    data: &'a T,
}

/// Response wrapper shared by every action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookEnvelope {
    pub success: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl WebhookEnvelope {
    /// Parse a raw HTTP response into the envelope, mapping failures.
    pub fn from_response(status: u16, body: &str) -> RemoteResult<Self> {
        if !(200..300).contains(&status) {
            return Err(RemoteError::Status {
                status,
                body: body.to_string(),
            });
        }
        let envelope: WebhookEnvelope =
            serde_json::from_str(body).map_err(|e| RemoteError::Protocol(e.to_string()))?;
        if !envelope.success {
            let message = envelope.error.unwrap_or_else(|| "request failed".to_string());
            return Err(RemoteError::Rejected(message));
        }
        Ok(envelope)
    }

    /// Decode `result` into `T`; a missing result is a protocol error.
    pub fn into_result<T: DeserializeOwned>(self) -> RemoteResult<T> {
        let value = self
            .result
            .ok_or_else(|| RemoteError::Protocol("response has no result".to_string()))?;
        serde_json::from_value(value).map_err(|e| RemoteError::Protocol(e.to_string()))
    }
}

pub struct WebhookClient {
    http: reqwest::Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> RemoteResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, url: url.into() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: Serialize + Sync>(&self, action: WebhookAction, data: &T) -> RemoteResult<WebhookEnvelope> {
        log::debug!("webhook {action:?} -> {}", self.url);
        let response = self
            .http
            .post(&self.url)
            .json(&WebhookRequest { action, data })
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        WebhookEnvelope::from_response(status, &body).inspect_err(|e| log::warn!("webhook {action:?} failed: {e}"))
    }
}

impl RemoteStore for WebhookClient {
    fn save(&self, request: &SaveRequest) -> BoxFuture<'_, RemoteResult<Value>> {
        let request = request.clone();
        Box::pin(async move {
            let envelope = self.call(WebhookAction::Save, &request).await?;
            log::info!("saved drawing '{}' ({} elements)", request.name, request.elements.len());
            Ok(envelope.result.unwrap_or(Value::Null))
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, RemoteResult<LoadResponse>> {
        let data = serde_json::json!({ "id": id });
        Box::pin(async move { self.call(WebhookAction::Load, &data).await?.into_result() })
    }

    fn list(&self) -> BoxFuture<'_, RemoteResult<Vec<DocumentSummary>>> {
        Box::pin(async move {
            let envelope = self.call(WebhookAction::List, &serde_json::json!({})).await?;
            // A successful list with no result means no drawings.
            match envelope.result {
                None | Some(Value::Null) => Ok(Vec::new()),
                Some(value) => serde_json::from_value(value).map_err(|e| RemoteError::Protocol(e.to_string())),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let data = serde_json::json!({ "id": "abc" });
        let body = serde_json::to_value(WebhookRequest {
            action: WebhookAction::Load,
            data: &data,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "action": "load", "data": { "id": "abc" } }));
    }

    #[test]
    fn test_envelope_success() {
        let envelope =
            WebhookEnvelope::from_response(200, r#"{"success":true,"result":{"elements":[],"viewport":null}}"#).unwrap();
        let loaded: LoadResponse = envelope.into_result().unwrap();
        assert!(loaded.elements.is_empty());
        assert!(loaded.viewport.is_none());
    }

    #[test]
    fn test_envelope_rejection_carries_message() {
        let err = WebhookEnvelope::from_response(200, r#"{"success":false,"error":"Drawing not found"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Drawing not found");
    }

    #[test]
    fn test_envelope_http_failure() {
        let err = WebhookEnvelope::from_response(502, "bad gateway").unwrap_err();
        assert!(matches!(err, RemoteError::Status { status: 502, .. }));
    }

    #[test]
    fn test_envelope_malformed() {
        assert!(matches!(
            WebhookEnvelope::from_response(200, "<html>"),
            Err(RemoteError::Protocol(_))
        ));
        let envelope = WebhookEnvelope::from_response(200, r#"{"success":true}"#).unwrap();
        assert!(matches!(envelope.into_result::<LoadResponse>(), Err(RemoteError::Protocol(_))));
    }

    #[test]
    fn test_client_keeps_url() {
        let client = WebhookClient::new("http://localhost:5678/webhook/canvas").unwrap();
        assert_eq!(client.url(), "http://localhost:5678/webhook/canvas");
    }
}
