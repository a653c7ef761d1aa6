use super::types::{Command, CommandResponse, Movie, QualityProfile, QueuePage, QueueRecord, Tag};
use crate::config::RadarrConfig;
use crate::error::{ExternalServiceError, ServiceResult};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Connection timeout for Radarr API requests
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// The parts of the Radarr v3 API the relay uses
#[async_trait::async_trait]
pub trait RadarrApi: Send + Sync {
    /// Search movies by name
    async fn lookup_movie(&self, term: &str) -> ServiceResult<Vec<Movie>>;

    async fn get_movie(&self, movie_id: i64) -> ServiceResult<Movie>;

    async fn list_tags(&self) -> ServiceResult<Vec<Tag>>;

    async fn list_quality_profiles(&self) -> ServiceResult<Vec<QualityProfile>>;

    /// Queue a named command
    async fn post_command(&self, command: &Command) -> ServiceResult<CommandResponse>;

    /// Current download queue
    async fn get_queue(&self) -> ServiceResult<Vec<QueueRecord>>;
}

pub struct RadarrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RadarrClient {
    pub fn new(config: &RadarrConfig) -> Self {
        let client = Client::builder()
            .timeout(CONNECTION_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v3{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> ServiceResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .query(query)
            .send()
            .await?;

        let response = check_status(response, path).await?;
        Ok(response.json().await?)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ServiceResult<T> {
        let response = self
            .client
            .post(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let response = check_status(response, path).await?;
        Ok(response.json().await?)
    }
}

/// Turn a non-success response into a classified error, keeping Radarr's
/// `message` when the body has one.
async fn check_status(response: Response, path: &str) -> ServiceResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(body);

    Err(ExternalServiceError::from_status(status.as_u16(), path, message))
}

#[async_trait::async_trait]
impl RadarrApi for RadarrClient {
    async fn lookup_movie(&self, term: &str) -> ServiceResult<Vec<Movie>> {
        self.get("/movie/lookup", &[("term", term)]).await
    }

    async fn get_movie(&self, movie_id: i64) -> ServiceResult<Movie> {
        self.get(&format!("/movie/{}", movie_id), &[]).await
    }

    async fn list_tags(&self) -> ServiceResult<Vec<Tag>> {
        self.get("/tag", &[]).await
    }

    async fn list_quality_profiles(&self) -> ServiceResult<Vec<QualityProfile>> {
        self.get("/qualityprofile", &[]).await
    }

    async fn post_command(&self, command: &Command) -> ServiceResult<CommandResponse> {
        self.post("/command", command).await
    }

    async fn get_queue(&self) -> ServiceResult<Vec<QueueRecord>> {
        let page: QueuePage = self.get("/queue", &[("pageSize", "1000")]).await?;
        Ok(page.records)
    }
}
