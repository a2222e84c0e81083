use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use tracing::debug;

use super::errors::StoreError;
use super::types::{Instance, InstanceId, Transition};

/// Read/transition access to workflow instances. The store is the single
/// owner of instance status: a step never writes a status value, it only
/// requests a named transition and re-reads.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait InstanceStore: Send + Sync {
    /// Read one instance by id. `None` when the store has no matching
    /// record; callers must branch on that rather than assume presence.
    async fn read_by_id(&self, id: InstanceId) -> Result<Option<Instance>, StoreError>;

    /// Ask the store to apply a named status transition. The store validates
    /// it against the current status and either applies it cleanly or fails;
    /// callers must re-read afterwards instead of assuming the new status.
    async fn request_transition(
        &self,
        id: InstanceId,
        transition: Transition,
    ) -> Result<(), StoreError>;
}

/// JSON-over-HTTP implementation against the platform's instance API.
#[derive(Debug, Clone)]
pub struct HttpInstanceStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpInstanceStore {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl InstanceStore for HttpInstanceStore {
    async fn read_by_id(&self, id: InstanceId) -> Result<Option<Instance>, StoreError> {
        let url = format!("{}/instances/{}", self.base_url, id);
        let response = self.authorize(self.client.get(&url)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<Instance>().await?)),
            status => Err(StoreError::Unexpected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn request_transition(
        &self,
        id: InstanceId,
        transition: Transition,
    ) -> Result<(), StoreError> {
        let url = format!("{}/instances/{}/transitions", self.base_url, id);
        debug!(instance = %id, transition = %transition, "requesting status transition");

        let response = self
            .authorize(self.client.post(&url))
            .json(&json!({ "name": transition.name() }))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(id)),
            StatusCode::CONFLICT => Err(StoreError::InvalidTransition {
                id,
                transition: transition.name(),
                reason: response.text().await.unwrap_or_default(),
            }),
            status if status.is_success() => Ok(()),
            status => Err(StoreError::Unexpected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}
