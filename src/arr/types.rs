use serde::{Deserialize, Serialize};

/// Radarr webhook payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrWebhook {
    pub event_type: String,
    pub movie: Option<WebhookMovie>,
    pub movie_file: Option<WebhookMovieFile>,
    pub movie_files: Option<Vec<WebhookMovieFile>>,
}

impl RadarrWebhook {
    /// Radarr's "Test" button sends this event type.
    pub fn is_test(&self) -> bool {
        self.event_type.eq_ignore_ascii_case("test")
    }

    pub fn is_download(&self) -> bool {
        self.event_type == "Download"
    }

    /// All file entries, single `movieFile` first.
    pub fn files(&self) -> Vec<&WebhookMovieFile> {
        self.movie_file
            .iter()
            .chain(self.movie_files.iter().flatten())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMovie {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub tmdb_id: Option<i64>,
    /// Movie folder; newer Radarr versions send `folderPath`
    #[serde(alias = "folderPath")]
    pub path: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagRef>,
    pub quality_profile_id: Option<i64>,
}

/// Tags arrive as IDs, or as labels from newer Radarr versions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagRef {
    Id(i64),
    Label(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMovieFile {
    pub id: Option<i64>,
    pub relative_path: Option<String>,
    pub path: Option<String>,
    pub quality: Option<String>,
    pub quality_version: Option<f64>,
}

/// Movie resource from `/api/v3/movie` and `/api/v3/movie/lookup`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Lookup results for movies not in the library carry no id
    pub id: Option<i64>,
    pub title: Option<String>,
    pub tmdb_id: Option<i64>,
    pub path: Option<String>,
    pub quality_profile_id: Option<i64>,
    #[serde(default)]
    pub tags: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tag {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QualityProfile {
    pub id: i64,
    pub name: String,
}

/// Body for `POST /api/v3/command`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub movie_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_client_id: Option<String>,
}

impl Command {
    pub fn refresh_movie(movie_id: i64) -> Self {
        Self {
            name: "RefreshMovie",
            movie_ids: vec![movie_id],
            path: None,
            download_client_id: None,
        }
    }

    pub fn rename_movie(movie_id: i64) -> Self {
        Self {
            name: "RenameMovie",
            movie_ids: vec![movie_id],
            path: None,
            download_client_id: None,
        }
    }

    pub fn downloaded_movies_scan(path: String, download_client_id: Option<String>) -> Self {
        Self {
            name: "DownloadedMoviesScan",
            movie_ids: Vec::new(),
            path: Some(path),
            download_client_id,
        }
    }
}

/// Response to a queued command. Radarr reports refusals in `message`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
}

/// One page of `/api/v3/queue`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueuePage {
    #[serde(default)]
    pub records: Vec<QueueRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRecord {
    pub title: Option<String>,
    pub download_id: Option<String>,
    pub output_path: Option<String>,
}
