use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use tracing::debug;

use super::errors::GatewayError;
use super::{ColumnFilter, ElementGateway, TableRow};

/// JSON-over-HTTP implementation against the platform's element API.
#[derive(Debug, Clone)]
pub struct HttpElementGateway {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpElementGateway {
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
impl ElementGateway for HttpElementGateway {
    async fn query_table(
        &self,
        element: &str,
        table_id: u32,
        filters: &[ColumnFilter],
    ) -> Result<Vec<TableRow>, GatewayError> {
        let url = format!("{}/elements/{}/tables/{}", self.base_url, element, table_id);
        let query: Vec<(&str, String)> = filters
            .iter()
            .map(|filter| ("filter", format!("{}:{}", filter.pid, filter.value)))
            .collect();

        let response = self
            .authorize(self.client.get(&url))
            .query(&query)
            .send()
            .await?;

        match response.status() {
            // A table the element has not populated yet reads as empty.
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status if status.is_success() => Ok(response.json::<Vec<TableRow>>().await?),
            status => Err(GatewayError::Unexpected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn set_parameter(
        &self,
        element: &str,
        parameter_id: u32,
        value: &str,
    ) -> Result<(), GatewayError> {
        let url = format!(
            "{}/elements/{}/parameters/{}",
            self.base_url, element, parameter_id
        );
        debug!(element, parameter_id, "writing standalone parameter");

        let response = self
            .authorize(self.client.put(&url))
            .json(&json!({ "value": value }))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(GatewayError::ElementNotFound(element.to_string())),
            status if status.is_success() => Ok(()),
            status => Err(GatewayError::Unexpected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn set_parameter_by_key(
        &self,
        element: &str,
        parameter_id: u32,
        key: &str,
        value: &str,
    ) -> Result<(), GatewayError> {
        let url = format!(
            "{}/elements/{}/parameters/{}/keys/{}",
            self.base_url, element, parameter_id, key
        );
        debug!(element, parameter_id, key, "writing keyed parameter");

        let response = self
            .authorize(self.client.put(&url))
            .json(&json!({ "value": value }))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(GatewayError::ElementNotFound(element.to_string())),
            status if status.is_success() => Ok(()),
            status => Err(GatewayError::Unexpected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}
