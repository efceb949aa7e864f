use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use super::messages::random_message;
use spin_persistence::repositories::NotificationRepository;
use spin_types::NotificationToken;

/// Body of one batched push request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub notification_id: Uuid,
    pub title: String,
    pub body: String,
    pub target_url: String,
    pub tokens: Vec<String>,
}

/// Result of delivering to one endpoint. Each endpoint is accounted for on
/// its own so one failure cannot skew the totals of another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointOutcome {
    pub url: String,
    pub success: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deactivated: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub success: bool,
    pub sent: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub results: Vec<EndpointOutcome>,
}

impl DispatchSummary {
    pub fn no_tokens() -> Self {
        Self {
            success: true,
            sent: 0,
            failed: 0,
            message: Some("No active tokens found".to_string()),
            results: Vec::new(),
        }
    }

    pub fn from_outcomes(results: Vec<EndpointOutcome>) -> Self {
        let (sent, failed) = results.iter().fold((0, 0), |(sent, failed), outcome| {
            if outcome.success {
                (sent + outcome.count, failed)
            } else {
                (sent, failed + outcome.count)
            }
        });

        Self {
            success: true,
            sent,
            failed,
            message: None,
            results,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to fetch tokens: {0}")]
    TokenFetch(String),
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub target_url: String,
    pub request_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            target_url: "https://www.spinon.xyz".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

pub struct NotificationDispatcher {
    client: Client,
    repository: Arc<NotificationRepository>,
    target_url: String,
}

impl NotificationDispatcher {
    pub fn new(
        repository: Arc<NotificationRepository>,
        config: DispatcherConfig,
    ) -> Result<Self, DispatchError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            repository,
            target_url: config.target_url,
        })
    }

    /// Send one batched message per distinct endpoint to every active token
    pub async fn run(&self) -> Result<DispatchSummary, DispatchError> {
        let tokens = self
            .repository
            .active_tokens()
            .await
            .map_err(|e| DispatchError::TokenFetch(e.to_string()))?;

        if tokens.is_empty() {
            tracing::info!("No active notification tokens");
            return Ok(DispatchSummary::no_tokens());
        }

        tracing::info!("Found {} active notification tokens", tokens.len());

        let outcomes = join_all(
            group_by_endpoint(tokens)
                .into_iter()
                .map(|(url, tokens)| self.send_to_endpoint(url, tokens)),
        )
        .await;

        let summary = DispatchSummary::from_outcomes(outcomes);

        let results = serde_json::to_value(&summary.results).unwrap_or(Value::Null);
        if let Err(e) = self
            .repository
            .record_history(
                summary.sent as i32,
                summary.failed as i32,
                random_message().title,
                results,
            )
            .await
        {
            tracing::warn!("Could not log notification history: {}", e);
        }

        tracing::info!(
            "Notification run complete: {} sent, {} failed",
            summary.sent,
            summary.failed
        );
        Ok(summary)
    }

    /// Like `run`, but folds job failures into the `{success: false, error}`
    /// response shape
    pub async fn run_to_json(&self) -> (bool, Value) {
        match self.run().await {
            Ok(summary) => (true, serde_json::to_value(summary).unwrap_or(Value::Null)),
            Err(e) => {
                tracing::error!("Notification run failed: {}", e);
                (false, json!({ "success": false, "error": e.to_string() }))
            }
        }
    }

    async fn send_to_endpoint(&self, url: String, tokens: Vec<NotificationToken>) -> EndpointOutcome {
        let message = random_message();
        let payload = NotificationPayload {
            notification_id: Uuid::new_v4(),
            title: message.title.to_string(),
            body: message.body.to_string(),
            target_url: self.target_url.clone(),
            tokens: tokens
                .iter()
                .map(|t| t.notification_token.clone())
                .collect(),
        };
        let count = tokens.len();

        tracing::info!("Sending notification to {} users via {}", count, url);

        let response = match self.client.post(&url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error sending to {}: {}", url, e);
                return EndpointOutcome {
                    url,
                    success: false,
                    count,
                    response: None,
                    error: Some(Value::String(e.to_string())),
                    deactivated: Vec::new(),
                };
            }
        };

        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or_else(|_| json!({}));

        if status.is_success() {
            tracing::info!("Successfully sent to {} users via {}", count, url);
            return EndpointOutcome {
                url,
                success: true,
                count,
                response: Some(body),
                error: None,
                deactivated: Vec::new(),
            };
        }

        tracing::error!("Failed to send via {} ({}): {}", url, status, body);
        let deactivated = self.deactivate_invalid_tokens(&body).await;

        EndpointOutcome {
            url,
            success: false,
            count,
            response: None,
            error: Some(body),
            deactivated,
        }
    }

    async fn deactivate_invalid_tokens(&self, body: &Value) -> Vec<String> {
        let invalid: Vec<String> = body
            .get("invalidTokens")
            .and_then(Value::as_array)
            .map(|tokens| {
                tokens
                    .iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        if invalid.is_empty() {
            return invalid;
        }

        match self.repository.deactivate_tokens(&invalid).await {
            Ok(changed) => {
                tracing::info!("Deactivated {} invalid tokens", changed);
                invalid
            }
            Err(e) => {
                tracing::warn!("Failed to deactivate invalid tokens: {}", e);
                Vec::new()
            }
        }
    }
}

/// Tokens keyed by delivery endpoint, in a stable order
pub fn group_by_endpoint(tokens: Vec<NotificationToken>) -> BTreeMap<String, Vec<NotificationToken>> {
    let mut grouped: BTreeMap<String, Vec<NotificationToken>> = BTreeMap::new();
    for token in tokens {
        grouped
            .entry(token.notification_url.clone())
            .or_default()
            .push(token);
    }
    grouped
}
