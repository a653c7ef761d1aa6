//! Task-completion notifications sent to Radarr.
//!
//! After Unmanic finishes a task, each destination file is either refreshed
//! (and optionally renamed) in Radarr, or handed to Radarr for import.

use crate::arr::{Command, RadarrApi};
use crate::config::{parse_size, Config, LibraryId, NotifyMode, NotifySettings};
use path_clean::PathClean;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Unmanic's completion event for one task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskResults {
    #[serde(default)]
    pub library_id: Option<LibraryId>,
    #[serde(default)]
    pub task_processing_success: bool,
    #[serde(default)]
    pub file_move_processes_success: bool,
    #[serde(default)]
    pub destination_files: Vec<PathBuf>,
    #[serde(default)]
    pub source_data: SourceData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceData {
    pub abspath: Option<PathBuf>,
}

impl TaskResults {
    pub fn succeeded(&self) -> bool {
        self.task_processing_success && self.file_move_processes_success
    }
}

/// What happened to one destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Refreshed,
    /// Refreshed, then renamed
    Renamed,
    /// Refresh went through but the rename did not
    RenameFailed,
    ImportQueued,
    /// At or below the import size threshold
    TooSmall,
    /// No Radarr movie matched the file name
    NotFound,
    Failed,
}

/// Notify Radarr about every destination file of `results`, in order.
///
/// Returns one outcome per destination file, or nothing when the task did
/// not succeed or Radarr is not configured.
pub async fn process_task_results(
    results: &TaskResults,
    config: &Config,
    radarr: &dyn RadarrApi,
) -> Vec<FileOutcome> {
    if !results.succeeded() {
        tracing::debug!(
            "Task for {:?} did not complete successfully, nothing to notify",
            results.source_data.abspath
        );
        return Vec::new();
    }

    if !config.radarr.has_api_key() {
        tracing::error!("Radarr API key is not configured, cannot notify Radarr");
        return Vec::new();
    }

    let settings = &config.notify;
    let mut outcomes = Vec::with_capacity(results.destination_files.len());
    for file in &results.destination_files {
        let outcome = match settings.mode {
            NotifyMode::UpdateMode => update_movie(file, settings, radarr).await,
            NotifyMode::ImportMode => {
                import_movie(file, results.source_data.abspath.as_deref(), settings, radarr).await
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Refresh the movie owning `file`, then rename it if configured.
pub async fn update_movie(file: &Path, settings: &NotifySettings, radarr: &dyn RadarrApi) -> FileOutcome {
    let term = basename(file);
    let movies = match radarr.lookup_movie(&term).await {
        Ok(movies) => movies,
        Err(e) => {
            tracing::error!("Movie lookup for '{}' failed: {}", term, e);
            return FileOutcome::Failed;
        }
    };

    let Some((movie_id, movie)) = movies.iter().find_map(|m| m.id.map(|id| (id, m))) else {
        tracing::error!("No Radarr movie found for '{}'", term);
        return FileOutcome::NotFound;
    };
    let title = movie.title.as_deref().unwrap_or("unknown");

    match radarr.post_command(&Command::refresh_movie(movie_id)).await {
        Ok(response) => {
            if let Some(message) = response.message {
                tracing::error!("Radarr refused refresh of '{}': {}", title, message);
                return FileOutcome::Failed;
            }
            tracing::info!("Triggered refresh for '{}' (movie {})", title, movie_id);
        }
        Err(e) => {
            tracing::error!("Failed to trigger refresh for '{}': {}", title, e);
            return FileOutcome::Failed;
        }
    }

    if !settings.rename_files {
        return FileOutcome::Refreshed;
    }

    // Radarr needs the refresh applied before it can rename
    tokio::time::sleep(Duration::from_secs(settings.rename_delay_secs)).await;

    match radarr.post_command(&Command::rename_movie(movie_id)).await {
        Ok(response) if response.message.is_none() => {
            tracing::info!("Triggered rename for '{}' (movie {})", title, movie_id);
            FileOutcome::Renamed
        }
        Ok(response) => {
            tracing::error!(
                "Radarr refused rename of '{}': {}",
                title,
                response.message.unwrap_or_default()
            );
            FileOutcome::RenameFailed
        }
        Err(e) => {
            tracing::error!("Failed to trigger rename for '{}': {}", title, e);
            FileOutcome::RenameFailed
        }
    }
}

/// Ask Radarr to import `file`, linking it to its queue entry when possible.
pub async fn import_movie(
    file: &Path,
    source: Option<&Path>,
    settings: &NotifySettings,
    radarr: &dyn RadarrApi,
) -> FileOutcome {
    if settings.limit_import_on_file_size {
        let minimum = match parse_size(&settings.minimum_file_size) {
            Ok(minimum) => minimum,
            Err(e) => {
                tracing::error!(
                    "Invalid minimum file size '{}': {}",
                    settings.minimum_file_size,
                    e
                );
                return FileOutcome::Failed;
            }
        };

        let size = match tokio::fs::metadata(file).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::error!("Cannot read size of {:?}: {}", file, e);
                return FileOutcome::Failed;
            }
        };

        if size <= minimum {
            tracing::info!(
                "Skipping import of {:?}: {} bytes is not above the {} byte minimum",
                file,
                size,
                minimum
            );
            return FileOutcome::TooSmall;
        }
    }

    let download_id = match source {
        Some(source) => find_download_id(source, radarr).await,
        None => None,
    };

    let target = absolute_path(file);
    let command = Command::downloaded_movies_scan(target.to_string_lossy().into_owned(), download_id);
    match radarr.post_command(&command).await {
        Ok(response) => {
            if let Some(message) = response.message {
                tracing::error!("Radarr refused import of {:?}: {}", file, message);
                return FileOutcome::Failed;
            }
            tracing::info!("Triggered import of {:?}", file);
            FileOutcome::ImportQueued
        }
        Err(e) => {
            tracing::error!("Failed to trigger import of {:?}: {}", file, e);
            FileOutcome::Failed
        }
    }
}

/// `file` made absolute against the working directory and lexically cleaned.
fn absolute_path(file: &Path) -> PathBuf {
    if file.is_absolute() {
        return file.clean();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(file).clean(),
        Err(e) => {
            tracing::warn!("Cannot resolve {:?} against the working directory: {}", file, e);
            file.clean()
        }
    }
}

async fn find_download_id(source: &Path, radarr: &dyn RadarrApi) -> Option<String> {
    let source_name = basename(source);
    let records = match radarr.get_queue().await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Failed to read the Radarr queue: {}", e);
            return None;
        }
    };

    let record = records.into_iter().find(|r| {
        r.output_path
            .as_deref()
            .map(|p| basename(Path::new(p)) == source_name)
            .unwrap_or(false)
    })?;

    tracing::debug!(
        "Matched {} to queued download {:?} ({:?})",
        source_name,
        record.title,
        record.download_id
    );
    record.download_id
}
