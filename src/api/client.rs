//! Monitoring API Client
//!
//! A JSON-over-HTTP client for the task-queue monitoring backend.

use crate::api::error::ApiError;
use crate::api::types::{ListPendingTasksResponse, PageOptions};
use crate::api::TaskQueueApi;
use crate::consts::cli_consts::http;
use crate::environment::Environment;
use log::debug;
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("queue-monitor/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    environment: Environment,
}

impl ApiClient {
    pub fn new(environment: Environment) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            environment,
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.environment.api_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn pending_tasks_endpoint(queue: &str, page: PageOptions) -> String {
        format!(
            "api/queues/{}/pending_tasks?page={}&size={}",
            urlencoding::encode(queue),
            page.page,
            page.size
        )
    }

    fn decode_response<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
        serde_json::from_slice(bytes).map_err(ApiError::Decode)
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Self::decode_response(&response_bytes)
    }
}

#[async_trait::async_trait]
impl TaskQueueApi for ApiClient {
    async fn list_pending_tasks(
        &self,
        queue: &str,
        page: PageOptions,
    ) -> Result<ListPendingTasksResponse, ApiError> {
        self.get_request(&Self::pending_tasks_endpoint(queue, page))
            .await
    }
}
