//! `reqwest`-backed HTTP capability.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use vantage_api_models::ResponseType;

use crate::capability::{HttpCapability, HttpReply};
use crate::request::ActionRequest;

/// Default timeout applied to action requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Production [`HttpCapability`] posting multipart action requests to the
/// panel backend.
#[derive(Clone)]
pub struct ReqwestCapability {
    client: Client,
    base_url: String,
}

impl ReqwestCapability {
    /// Build a capability rooted at `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| anyhow!("failed to build HTTP client: {err}"))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Build a capability around a caller-configured client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl HttpCapability for ReqwestCapability {
    async fn post_action(
        &self,
        endpoint: &str,
        request: &ActionRequest,
        _response_type: ResponseType,
    ) -> anyhow::Result<HttpReply> {
        let url = format!("{}{endpoint}", self.base_url);

        let mut form = reqwest::multipart::Form::new();
        for entry in &request.entries {
            form = form.text(entry.name.clone(), entry.value.clone());
        }

        let response = self
            .client
            .post(&url)
            .query(&request.query)
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = header_string(&response, CONTENT_TYPE);
        let content_disposition = header_string(&response, CONTENT_DISPOSITION);
        let body = response.bytes().await?.to_vec();

        Ok(HttpReply {
            status,
            content_type,
            content_disposition,
            body,
        })
    }
}

fn header_string(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
