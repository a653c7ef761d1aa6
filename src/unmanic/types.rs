use crate::config::LibraryId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A configured Unmanic library
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Library {
    pub id: LibraryId,
    #[serde(default)]
    pub name: String,
    pub path: PathBuf,
}

/// Response of `GET /unmanic/api/v2/settings/libraries`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryList {
    #[serde(default)]
    pub libraries: Vec<Library>,
}

/// Read-only snapshot of library roots, taken once per webhook call.
#[derive(Debug, Clone, Default)]
pub struct LibraryCatalog {
    libraries: BTreeMap<LibraryId, Library>,
}

impl LibraryCatalog {
    pub fn new(libraries: Vec<Library>) -> Self {
        Self {
            libraries: libraries.into_iter().map(|l| (l.id, l)).collect(),
        }
    }

    pub fn root(&self, id: LibraryId) -> Option<&Path> {
        self.libraries.get(&id).map(|l| l.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

/// Result of asking Unmanic whether a file needs processing
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FileTestResult {
    #[serde(rename = "add_file_to_pending_tasks", default)]
    pub needs_processing: bool,
    /// Priority hint to pass on when creating the task
    #[serde(rename = "priority_score", default)]
    pub priority: i64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct FileTestRequest<'a> {
    pub path: &'a Path,
    pub library_id: LibraryId,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateTaskRequest<'a> {
    pub path: &'a Path,
    pub library_id: LibraryId,
    #[serde(rename = "type")]
    pub task_type: &'static str,
    pub priority_score: i64,
}
