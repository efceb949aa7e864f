use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use crate::SyncRequest;
use spin_types::{LocalTotals, SpinHistoryEntry, SpinOutcome, UserIdentity, UserStats};

pub const MAX_REPORT_ATTEMPTS: u32 = 3;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Stats service returned {0}")]
    Status(StatusCode),
    #[error("Invalid stats service URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Transport failures and 5xx responses may succeed on a second try
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Request(_) => true,
            ClientError::Status(status) => status.is_server_error(),
            ClientError::InvalidUrl(_) => false,
        }
    }
}

/// HTTP client for the stats service.
///
/// The `*_in_background` variants never block the caller: they spawn the
/// request, retry transient failures, and log instead of returning errors.
/// Retrying a spin report is safe because the server applies each spin id
/// at most once.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
    base_url: Url,
}

impl StatsClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// `{base}/users/{user_id}/{resource}` with the user id percent-encoded
    /// as a single path segment
    fn user_url(&self, user_id: &str, resource: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["users", user_id, resource]);
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        Ok(response.json::<T>().await?)
    }

    /// Remote record for a user, `None` when the user has never synced
    pub async fn get_stats(&self, user_id: &str) -> Result<Option<UserStats>, ClientError> {
        let response = self
            .client
            .get(self.user_url(user_id, "stats")?)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::read_json(response).await.map(Some)
    }

    pub async fn sync(
        &self,
        identity: &UserIdentity,
        local: &LocalTotals,
    ) -> Result<UserStats, ClientError> {
        let body = SyncRequest::from((identity, local));

        let response = self
            .client
            .post(self.user_url(&identity.user_id, "sync")?)
            .json(&body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    pub async fn report_spin(
        &self,
        user_id: &str,
        outcome: &SpinOutcome,
    ) -> Result<UserStats, ClientError> {
        let response = self
            .client
            .post(self.user_url(user_id, "spins")?)
            .json(outcome)
            .send()
            .await?;
        Self::read_json(response).await
    }

    pub async fn history(
        &self,
        user_id: &str,
        limit: Option<u64>,
    ) -> Result<Vec<SpinHistoryEntry>, ClientError> {
        let mut request = self.client.get(self.user_url(user_id, "history")?);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        Self::read_json(request.send().await?).await
    }

    pub fn report_spin_in_background(
        &self,
        user_id: impl Into<String>,
        outcome: SpinOutcome,
    ) -> JoinHandle<Option<UserStats>> {
        let client = self.clone();
        let user_id = user_id.into();

        tokio::spawn(async move {
            let mut attempt = 1;
            loop {
                match client.report_spin(&user_id, &outcome).await {
                    Ok(stats) => return Some(stats),
                    Err(e) if e.is_retryable() && attempt < MAX_REPORT_ATTEMPTS => {
                        tracing::debug!(
                            "Retrying spin report {} (attempt {}): {}",
                            outcome.spin_id,
                            attempt,
                            e
                        );
                        tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                        attempt += 1;
                    }
                    Err(e) => {
                        tracing::warn!("Dropping spin report {}: {}", outcome.spin_id, e);
                        return None;
                    }
                }
            }
        })
    }

    pub fn sync_in_background(
        &self,
        identity: UserIdentity,
        local: LocalTotals,
    ) -> JoinHandle<Option<UserStats>> {
        let client = self.clone();

        tokio::spawn(async move {
            match client.sync(&identity, &local).await {
                Ok(stats) => Some(stats),
                Err(e) => {
                    tracing::warn!("Stats sync for {} failed: {}", identity.user_id, e);
                    None
                }
            }
        })
    }
}

impl From<(&UserIdentity, &LocalTotals)> for SyncRequest {
    fn from((identity, local): (&UserIdentity, &LocalTotals)) -> Self {
        Self {
            username: identity.username.clone(),
            avatar_url: identity.avatar_url.clone(),
            local: local.clone(),
        }
    }
}
