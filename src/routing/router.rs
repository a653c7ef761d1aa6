//! Match flat records against rule slots.

use super::flatten::FlatRecord;
use super::paths::translate;
use crate::config::{LibraryId, RuleConfig};
use crate::error::RoutingError;
use crate::unmanic::LibraryCatalog;
use radarr_relay_rules::Query;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A slot whose query matched a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub library_id: LibraryId,
    /// 1-based slot position
    pub slot_index: usize,
    pub translated_path: PathBuf,
    /// Original path as Radarr reported it
    pub source_path: String,
    pub trigger_test: bool,
    pub create_task: bool,
}

/// An active slot with its query compiled.
#[derive(Debug)]
pub struct CompiledRule<'a> {
    pub index: usize,
    pub library_id: LibraryId,
    pub query: Query,
    pub config: &'a RuleConfig,
}

/// Compile every active slot. Slots that fail to parse are logged and left
/// out, which makes them non-matching.
pub fn compile_rules(rules: &[RuleConfig]) -> Vec<CompiledRule<'_>> {
    rules
        .iter()
        .enumerate()
        .filter_map(|(i, rule)| {
            let index = i + 1;
            if !rule.has_query() {
                return None;
            }
            let Some(library_id) = rule.library_id else {
                tracing::warn!("Rule {} has a query but no library id, skipping", index);
                return None;
            };
            match Query::compile(&rule.query) {
                Ok(query) => Some(CompiledRule {
                    index,
                    library_id,
                    query,
                    config: rule,
                }),
                Err(e) => {
                    tracing::error!("Rule {} ({:?}) is invalid: {}", index, rule.query, e);
                    None
                }
            }
        })
        .collect()
}

/// Evaluate every active slot against every record.
///
/// Results keep record order, then slot order. A match whose library is not
/// in `catalog`, or whose path cannot be translated, is dropped.
pub fn route(records: &[FlatRecord], rules: &[RuleConfig], catalog: &LibraryCatalog) -> Vec<MatchResult> {
    let compiled = compile_rules(rules);
    if compiled.is_empty() {
        tracing::debug!("No active rules configured");
        return Vec::new();
    }

    let mut matches = Vec::new();
    for record in records {
        for rule in &compiled {
            match rule.query.matches(record) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::trace!("Rule {} did not match {}", rule.index, record.path);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Rule {} failed on {}: {}", rule.index, record.path, e);
                    continue;
                }
            }

            match build_match(record, rule, catalog) {
                Ok(result) => {
                    tracing::info!(
                        "Rule {} matched {} -> library {} ({})",
                        rule.index,
                        record.path,
                        result.library_id,
                        result.translated_path.display()
                    );
                    matches.push(result);
                }
                Err(e) => {
                    tracing::warn!(
                        "Discarding match of rule {} for {}: {}",
                        rule.index,
                        record.path,
                        e
                    );
                }
            }
        }
    }

    matches
}

fn build_match(
    record: &FlatRecord,
    rule: &CompiledRule<'_>,
    catalog: &LibraryCatalog,
) -> Result<MatchResult, RoutingError> {
    let library_root = catalog
        .root(rule.library_id)
        .ok_or(RoutingError::UnknownLibrary(rule.library_id))?;
    let translated_path = translate(
        Path::new(&record.path),
        record.root_path.as_deref().map(Path::new),
        library_root,
    )?;

    Ok(MatchResult {
        library_id: rule.library_id,
        slot_index: rule.index,
        translated_path,
        source_path: record.path.clone(),
        trigger_test: rule.config.trigger_test,
        create_task: rule.config.create_task,
    })
}
