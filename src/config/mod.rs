mod size;
mod types;

pub use size::parse_size;
pub use types::*;

use anyhow::{Context, Result};
use radarr_relay_rules::Query;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./radarr-relay.toml",
        "~/.config/radarr-relay/config.toml",
        "/etc/radarr-relay/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    parse_size(&config.notify.minimum_file_size).with_context(|| {
        format!(
            "Invalid notify.minimum_file_size '{}'",
            config.notify.minimum_file_size
        )
    })?;

    let rules = &config.webhook.rules;
    if rules.len() > MAX_RULE_SLOTS {
        anyhow::bail!(
            "At most {} webhook rule slots are supported, found {}",
            MAX_RULE_SLOTS,
            rules.len()
        );
    }

    for (i, rule) in rules.iter().enumerate() {
        let slot = i + 1;
        if rule.has_query() && rule.library_id.is_none() {
            anyhow::bail!("Webhook rule {} has a query but no library_id", slot);
        }
        if rule.create_task && !rule.trigger_test {
            tracing::warn!(
                "Webhook rule {} sets create_task without trigger_test; no task will be created",
                slot
            );
        }
        // A bad query disables only its own slot at runtime
        if rule.has_query() {
            if let Err(e) = Query::compile(&rule.query) {
                tracing::warn!("Webhook rule {} query will never match: {}", slot, e);
            }
        }
    }

    if config.webhook.enabled && !config.radarr.has_api_key() {
        tracing::warn!("Webhook is enabled but radarr.api_key is empty; the endpoint stays disabled");
    }

    Ok(())
}
