//! Flatten a Radarr webhook into one record per movie file.

use super::paths::{is_within, normalize};
use crate::arr::{RadarrApi, RadarrWebhook, TagRef, WebhookMovie, WebhookMovieFile};
use radarr_relay_rules::{Bindings, Value};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Per-file attributes exposed to rule queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRecord {
    pub event_type: String,
    pub movie_title: Option<String>,
    pub movie_id: Option<i64>,
    /// TMDb id
    pub external_id: Option<i64>,
    pub root_path: Option<String>,
    pub tags: Vec<String>,
    pub quality_profile: Option<String>,
    pub quality: Option<String>,
    pub quality_version: Option<f64>,
    pub relative_path: Option<String>,
    /// Absolute, normalized file path
    pub path: String,
}

/// Names a query can reference.
pub const FIELD_NAMES: &[&str] = &[
    "event_type",
    "movie_title",
    "movie_id",
    "external_id",
    "root_path",
    "tags",
    "quality_profile",
    "quality",
    "quality_version",
    "relative_path",
    "path",
];

impl Bindings for FlatRecord {
    fn lookup(&self, name: &str) -> Option<Value> {
        let value = match name {
            "event_type" => Value::from(self.event_type.as_str()),
            "movie_title" => self.movie_title.clone().into(),
            "movie_id" => self.movie_id.into(),
            "external_id" => self.external_id.into(),
            "root_path" => self.root_path.clone().into(),
            "tags" => self.tags.clone().into(),
            "quality_profile" => self.quality_profile.clone().into(),
            "quality" => self.quality.clone().into(),
            "quality_version" => self.quality_version.into(),
            "relative_path" => self.relative_path.clone().into(),
            "path" => Value::from(self.path.as_str()),
            _ => return None,
        };
        Some(value)
    }
}

/// Build one [`FlatRecord`] per file in `payload`.
///
/// Tag and quality profile lookups go through `radarr`; their failures leave
/// the field empty. Files whose path cannot be resolved, or that resolve
/// outside the movie folder, are dropped.
pub async fn flatten(payload: &RadarrWebhook, radarr: &dyn RadarrApi) -> Vec<FlatRecord> {
    let Some(movie) = payload.movie.as_ref() else {
        return Vec::new();
    };

    let files = payload.files();
    if files.is_empty() {
        tracing::debug!("Webhook for {:?} carries no movie files", movie.title);
        return Vec::new();
    }

    let tags = resolve_tags(&movie.tags, radarr).await;
    let quality_profile = resolve_quality_profile(movie, radarr).await;
    let root = movie_root(movie);

    files
        .into_iter()
        .filter_map(|file| {
            let path = resolve_file_path(file, root, movie)?;
            Some(FlatRecord {
                event_type: payload.event_type.clone(),
                movie_title: movie.title.clone(),
                movie_id: movie.id,
                external_id: movie.tmdb_id,
                root_path: root.map(str::to_string),
                tags: tags.clone(),
                quality_profile: quality_profile.clone(),
                quality: file.quality.clone(),
                quality_version: file.quality_version,
                relative_path: file.relative_path.clone(),
                path: path.to_string_lossy().into_owned(),
            })
        })
        .collect()
}

/// The movie folder, when it is usable as a containment root.
fn movie_root(movie: &WebhookMovie) -> Option<&str> {
    let root = movie.path.as_deref().filter(|p| !p.is_empty())?;
    if !normalize(Path::new(root)).is_absolute() {
        tracing::warn!("Ignoring movie root {:?} of {:?}: not an absolute path", root, movie.title);
        return None;
    }
    Some(root)
}

fn resolve_file_path(file: &WebhookMovieFile, root: Option<&str>, movie: &WebhookMovie) -> Option<PathBuf> {
    let candidate = match (file.path.as_deref().filter(|p| !p.is_empty()), root, file.relative_path.as_deref()) {
        (Some(path), _, _) => PathBuf::from(path),
        (None, Some(root), Some(relative)) if !relative.is_empty() => Path::new(root).join(relative),
        _ => {
            tracing::warn!(
                "Dropping file of {:?}: no path and no relative path under a movie root",
                movie.title
            );
            return None;
        }
    };

    if !candidate.is_absolute() {
        tracing::warn!("Dropping file {:?} of {:?}: path is not absolute", candidate, movie.title);
        return None;
    }

    let path = normalize(&candidate);
    if let Some(root) = root {
        if !is_within(&path, Path::new(root)) {
            tracing::warn!(
                "Dropping file {:?} of {:?}: outside movie root {}",
                path,
                movie.title,
                root
            );
            return None;
        }
    }

    Some(path)
}

async fn resolve_tags(tags: &[TagRef], radarr: &dyn RadarrApi) -> Vec<String> {
    if tags.is_empty() {
        return Vec::new();
    }

    let labels: HashMap<i64, String> = if tags.iter().any(|t| matches!(t, TagRef::Id(_))) {
        match radarr.list_tags().await {
            Ok(all) => all.into_iter().map(|t| (t.id, t.label)).collect(),
            Err(e) => {
                tracing::warn!("Failed to resolve movie tags, continuing without them: {}", e);
                return Vec::new();
            }
        }
    } else {
        HashMap::new()
    };

    tags.iter()
        .filter_map(|tag| match tag {
            TagRef::Label(label) => Some(label.clone()),
            TagRef::Id(id) => {
                let label = labels.get(id).cloned();
                if label.is_none() {
                    tracing::debug!("Unknown tag id {}", id);
                }
                label
            }
        })
        .collect()
}

async fn resolve_quality_profile(movie: &WebhookMovie, radarr: &dyn RadarrApi) -> Option<String> {
    let profile_id = match (movie.quality_profile_id, movie.id) {
        (Some(id), _) => id,
        (None, Some(movie_id)) => match radarr.get_movie(movie_id).await {
            Ok(m) => m.quality_profile_id?,
            Err(e) => {
                tracing::warn!("Failed to fetch movie {} for its quality profile: {}", movie_id, e);
                return None;
            }
        },
        (None, None) => return None,
    };

    match radarr.list_quality_profiles().await {
        Ok(profiles) => {
            let name = profiles.into_iter().find(|p| p.id == profile_id).map(|p| p.name);
            if name.is_none() {
                tracing::debug!("Unknown quality profile id {}", profile_id);
            }
            name
        }
        Err(e) => {
            tracing::warn!("Failed to resolve quality profile {}: {}", profile_id, e);
            None
        }
    }
}
