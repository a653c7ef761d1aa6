//! Webhook routing: flatten the event, match rule slots, trigger Unmanic.
//!
//! ```text
//! RadarrWebhook -> flatten -> [FlatRecord] -> route -> [MatchResult] -> trigger -> [ActionReport]
//! ```

mod flatten;
mod paths;
mod router;
mod trigger;

pub use flatten::{flatten, FlatRecord, FIELD_NAMES};
pub use paths::{is_within, normalize, service_root, translate};
pub use router::{compile_rules, route, CompiledRule, MatchResult};
pub use trigger::{trigger, trigger_all, ActionOutcome, ActionReport};

use crate::arr::{RadarrApi, RadarrWebhook};
use crate::config::RuleConfig;
use crate::unmanic::{LibraryCatalog, LibraryCatalogProvider};

/// Flatten `payload` and match it against `rules` without side effects on
/// Unmanic. The library catalog is fetched once; if that fails every match
/// is dropped as an unknown library.
pub async fn plan(
    payload: &RadarrWebhook,
    rules: &[RuleConfig],
    radarr: &dyn RadarrApi,
    catalog: &dyn LibraryCatalogProvider,
) -> Vec<MatchResult> {
    let records = flatten(payload, radarr).await;
    if records.is_empty() {
        return Vec::new();
    }

    let catalog = match catalog.list_libraries().await {
        Ok(libraries) => LibraryCatalog::new(libraries),
        Err(e) => {
            tracing::error!("Failed to fetch Unmanic libraries: {}", e);
            LibraryCatalog::default()
        }
    };

    if catalog.is_empty() {
        tracing::warn!("Unmanic reports no libraries; every match will be dropped");
    } else {
        tracing::debug!("Routing against {} Unmanic libraries", catalog.len());
    }

    route(&records, rules, &catalog)
}
