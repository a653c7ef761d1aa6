use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of rule slots accepted from configuration.
pub const MAX_RULE_SLOTS: usize = 10;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub radarr: RadarrConfig,

    #[serde(default)]
    pub unmanic: UnmanicConfig,

    #[serde(default)]
    pub notify: NotifySettings,

    #[serde(default)]
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8787
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RadarrConfig {
    /// Base URL, e.g. `http://localhost:7878`
    #[serde(default = "default_radarr_url")]
    pub url: String,

    #[serde(default)]
    pub api_key: String,
}

fn default_radarr_url() -> String {
    "http://localhost:7878".to_string()
}

impl Default for RadarrConfig {
    fn default() -> Self {
        Self {
            url: default_radarr_url(),
            api_key: String::new(),
        }
    }
}

impl RadarrConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnmanicConfig {
    /// Base URL of the Unmanic API, e.g. `http://localhost:8888`
    #[serde(default = "default_unmanic_url")]
    pub url: String,
}

fn default_unmanic_url() -> String {
    "http://localhost:8888".to_string()
}

impl Default for UnmanicConfig {
    fn default() -> Self {
        Self {
            url: default_unmanic_url(),
        }
    }
}

/// What to tell Radarr when a processing task completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyMode {
    /// Refresh (and optionally rename) the movie the file belongs to.
    #[default]
    UpdateMode,
    /// Ask Radarr to import the newly written file.
    ImportMode,
}

impl fmt::Display for NotifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateMode => write!(f, "update_mode"),
            Self::ImportMode => write!(f, "import_mode"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifySettings {
    #[serde(default)]
    pub mode: NotifyMode,

    /// Trigger a rename after the refresh (update mode only)
    #[serde(default)]
    pub rename_files: bool,

    /// Seconds to wait between refresh and rename (default: 10)
    #[serde(default = "default_rename_delay")]
    pub rename_delay_secs: u64,

    /// Only import files larger than `minimum_file_size` (import mode only)
    #[serde(default = "default_true")]
    pub limit_import_on_file_size: bool,

    /// Human readable size such as `100MB` or `1.5GiB`
    #[serde(default = "default_minimum_file_size")]
    pub minimum_file_size: String,
}

fn default_rename_delay() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_minimum_file_size() -> String {
    "100MB".to_string()
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            mode: NotifyMode::default(),
            rename_files: false,
            rename_delay_secs: default_rename_delay(),
            limit_import_on_file_size: true,
            minimum_file_size: default_minimum_file_size(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebhookConfig {
    /// Accept inbound Radarr webhooks on `POST /webhook`
    #[serde(default)]
    pub enabled: bool,

    /// Shared secret for HMAC-SHA256 signature verification
    #[serde(default)]
    pub signature_secret: Option<String>,

    /// Rule slots, evaluated in order. Slot numbers are 1-based positions.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// Unmanic library identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LibraryId(pub i64);

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Query to evaluate; empty disables the slot
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub library_id: Option<LibraryId>,

    /// Run the Unmanic file test for matches (default: true)
    #[serde(default = "default_true")]
    pub trigger_test: bool,

    /// Create a pending task when the test says the file needs work
    #[serde(default)]
    pub create_task: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            query: String::new(),
            library_id: None,
            trigger_test: true,
            create_task: false,
        }
    }
}

impl RuleConfig {
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// A slot takes part in routing only with both a query and a library.
    pub fn is_active(&self) -> bool {
        self.has_query() && self.library_id.is_some()
    }
}
