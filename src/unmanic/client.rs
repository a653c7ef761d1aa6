use super::types::{CreateTaskRequest, FileTestRequest, FileTestResult, Library, LibraryList};
use crate::config::{LibraryId, UnmanicConfig};
use crate::error::{ExternalServiceError, ServiceResult};
use reqwest::{Client, Response};
use std::path::Path;
use std::time::Duration;

/// Connection timeout for Unmanic API requests
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of the library catalog
#[async_trait::async_trait]
pub trait LibraryCatalogProvider: Send + Sync {
    async fn list_libraries(&self) -> ServiceResult<Vec<Library>>;
}

/// Unmanic's pending task queue
#[async_trait::async_trait]
pub trait PendingTaskService: Send + Sync {
    /// Ask whether `path` needs processing in `library_id`
    async fn test_file(&self, path: &Path, library_id: LibraryId) -> ServiceResult<FileTestResult>;

    /// Add `path` to the pending tasks of `library_id`
    async fn create_task(&self, path: &Path, library_id: LibraryId, priority: i64) -> ServiceResult<()>;
}

pub struct UnmanicClient {
    client: Client,
    base_url: String,
}

impl UnmanicClient {
    pub fn new(config: &UnmanicConfig) -> Self {
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
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/unmanic/api/v2{}", self.base_url, path)
    }
}

async fn check_status(response: Response, path: &str) -> ServiceResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ExternalServiceError::from_status(status.as_u16(), path, body))
}

#[async_trait::async_trait]
impl LibraryCatalogProvider for UnmanicClient {
    async fn list_libraries(&self) -> ServiceResult<Vec<Library>> {
        let path = "/settings/libraries";
        let response = self.client.get(self.url(path)).send().await?;
        let list: LibraryList = check_status(response, path).await?.json().await?;
        Ok(list.libraries)
    }
}

#[async_trait::async_trait]
impl PendingTaskService for UnmanicClient {
    async fn test_file(&self, path: &Path, library_id: LibraryId) -> ServiceResult<FileTestResult> {
        let endpoint = "/pending/test";
        let response = self
            .client
            .post(self.url(endpoint))
            .json(&FileTestRequest { path, library_id })
            .send()
            .await?;
        Ok(check_status(response, endpoint).await?.json().await?)
    }

    async fn create_task(&self, path: &Path, library_id: LibraryId, priority: i64) -> ServiceResult<()> {
        let endpoint = "/pending/create";
        let response = self
            .client
            .post(self.url(endpoint))
            .json(&CreateTaskRequest {
                path,
                library_id,
                task_type: "local",
                priority_score: priority,
            })
            .send()
            .await?;
        check_status(response, endpoint).await?;
        Ok(())
    }
}
