//! In-memory fakes for the external collaborators, used by unit tests.

use crate::arr::{Command, CommandResponse, Movie, QualityProfile, QueueRecord, RadarrApi, Tag};
use crate::config::LibraryId;
use crate::error::{ExternalServiceError, ServiceResult};
use crate::unmanic::{FileTestResult, Library, LibraryCatalogProvider, PendingTaskService};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn unavailable() -> ExternalServiceError {
    ExternalServiceError::Connection("connection refused".to_string())
}

/// Scripted Radarr. `None` fields make the matching call fail.
#[derive(Default)]
pub struct FakeRadarr {
    pub lookups: HashMap<String, Vec<Movie>>,
    pub movies: HashMap<i64, Movie>,
    pub tags: Option<Vec<Tag>>,
    pub profiles: Option<Vec<QualityProfile>>,
    pub queue: Option<Vec<QueueRecord>>,
    /// Command names that fail with a connection error
    pub failing_commands: Vec<&'static str>,
    /// Command names whose response carries a refusal message
    pub refused_commands: Vec<&'static str>,
    pub calls: Mutex<Vec<String>>,
    pub commands: Mutex<Vec<Command>>,
}

impl FakeRadarr {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

#[async_trait::async_trait]
impl RadarrApi for FakeRadarr {
    async fn lookup_movie(&self, term: &str) -> ServiceResult<Vec<Movie>> {
        self.record(format!("lookup_movie:{}", term));
        Ok(self.lookups.get(term).cloned().unwrap_or_default())
    }

    async fn get_movie(&self, movie_id: i64) -> ServiceResult<Movie> {
        self.record(format!("get_movie:{}", movie_id));
        self.movies
            .get(&movie_id)
            .cloned()
            .ok_or_else(|| ExternalServiceError::NotFound(format!("/movie/{}", movie_id)))
    }

    async fn list_tags(&self) -> ServiceResult<Vec<Tag>> {
        self.record("list_tags");
        self.tags.clone().ok_or_else(unavailable)
    }

    async fn list_quality_profiles(&self) -> ServiceResult<Vec<QualityProfile>> {
        self.record("list_quality_profiles");
        self.profiles.clone().ok_or_else(unavailable)
    }

    async fn post_command(&self, command: &Command) -> ServiceResult<CommandResponse> {
        self.record(format!("command:{}", command.name));
        self.commands.lock().push(command.clone());
        if self.failing_commands.contains(&command.name) {
            return Err(unavailable());
        }
        Ok(CommandResponse {
            id: Some(1),
            name: Some(command.name.to_string()),
            status: Some("queued".to_string()),
            message: self
                .refused_commands
                .contains(&command.name)
                .then(|| "Command refused".to_string()),
        })
    }

    async fn get_queue(&self) -> ServiceResult<Vec<QueueRecord>> {
        self.record("get_queue");
        self.queue.clone().ok_or_else(unavailable)
    }
}

/// Scripted Unmanic. Paths listed in `failing_tests` fail the necessity test.
#[derive(Default)]
pub struct FakeUnmanic {
    pub libraries: Option<Vec<Library>>,
    pub needs_processing: bool,
    pub priority: i64,
    pub failing_tests: Vec<PathBuf>,
    pub fail_create: bool,
    pub tested: Mutex<Vec<(PathBuf, LibraryId)>>,
    pub created: Mutex<Vec<(PathBuf, LibraryId, i64)>>,
}

impl FakeUnmanic {
    pub fn with_libraries(libraries: &[(i64, &str)]) -> Self {
        Self {
            libraries: Some(
                libraries
                    .iter()
                    .map(|(id, path)| Library {
                        id: LibraryId(*id),
                        name: format!("Library {}", id),
                        path: PathBuf::from(path),
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub fn tested(&self) -> Vec<(PathBuf, LibraryId)> {
        self.tested.lock().clone()
    }

    pub fn created(&self) -> Vec<(PathBuf, LibraryId, i64)> {
        self.created.lock().clone()
    }
}

#[async_trait::async_trait]
impl LibraryCatalogProvider for FakeUnmanic {
    async fn list_libraries(&self) -> ServiceResult<Vec<Library>> {
        self.libraries.clone().ok_or_else(unavailable)
    }
}

#[async_trait::async_trait]
impl PendingTaskService for FakeUnmanic {
    async fn test_file(&self, path: &Path, library_id: LibraryId) -> ServiceResult<FileTestResult> {
        self.tested.lock().push((path.to_path_buf(), library_id));
        if self.failing_tests.iter().any(|p| p == path) {
            return Err(unavailable());
        }
        Ok(FileTestResult {
            needs_processing: self.needs_processing,
            priority: self.priority,
        })
    }

    async fn create_task(&self, path: &Path, library_id: LibraryId, priority: i64) -> ServiceResult<()> {
        if self.fail_create {
            return Err(ExternalServiceError::Status {
                status: 500,
                message: "boom".to_string(),
            });
        }
        self.created.lock().push((path.to_path_buf(), library_id, priority));
        Ok(())
    }
}
