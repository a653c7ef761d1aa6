//! Run the Unmanic necessity test and task creation for matches.

use super::router::MatchResult;
use crate::config::LibraryId;
use crate::unmanic::PendingTaskService;
use serde::Serialize;
use std::fmt;

/// Terminal state of one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// `trigger_test` off, nothing was called
    Skipped,
    /// Tested; no processing needed or task creation disabled
    TestOnly,
    TaskCreated,
    TestFailed,
    TaskFailed,
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionOutcome::Skipped => "skipped",
            ActionOutcome::TestOnly => "test_only",
            ActionOutcome::TaskCreated => "task_created",
            ActionOutcome::TestFailed => "test_failed",
            ActionOutcome::TaskFailed => "task_failed",
        };
        write!(f, "{}", s)
    }
}

/// Per-match entry of the webhook response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionReport {
    pub library_id: LibraryId,
    pub action: ActionOutcome,
    pub rule_index: usize,
}

/// Drive one match through test and task creation.
pub async fn trigger(result: &MatchResult, tasks: &dyn PendingTaskService) -> ActionOutcome {
    if !result.trigger_test {
        tracing::debug!(
            "Rule {}: test disabled, not contacting Unmanic for {}",
            result.slot_index,
            result.translated_path.display()
        );
        return ActionOutcome::Skipped;
    }

    let test = match tasks.test_file(&result.translated_path, result.library_id).await {
        Ok(test) => test,
        Err(e) => {
            tracing::error!(
                "Rule {}: test of {} in library {} failed: {}",
                result.slot_index,
                result.translated_path.display(),
                result.library_id,
                e
            );
            return ActionOutcome::TestFailed;
        }
    };

    if !test.needs_processing || !result.create_task {
        tracing::info!(
            "Rule {}: {} tested in library {} (needs processing: {})",
            result.slot_index,
            result.translated_path.display(),
            result.library_id,
            test.needs_processing
        );
        return ActionOutcome::TestOnly;
    }

    match tasks
        .create_task(&result.translated_path, result.library_id, test.priority)
        .await
    {
        Ok(()) => {
            tracing::info!(
                "Rule {}: queued {} in library {} (priority {})",
                result.slot_index,
                result.translated_path.display(),
                result.library_id,
                test.priority
            );
            ActionOutcome::TaskCreated
        }
        Err(e) => {
            tracing::error!(
                "Rule {}: creating task for {} in library {} failed: {}",
                result.slot_index,
                result.translated_path.display(),
                result.library_id,
                e
            );
            ActionOutcome::TaskFailed
        }
    }
}

/// Trigger every match in order, one at a time.
pub async fn trigger_all(matches: &[MatchResult], tasks: &dyn PendingTaskService) -> Vec<ActionReport> {
    let mut reports = Vec::with_capacity(matches.len());
    for result in matches {
        let action = trigger(result, tasks).await;
        reports.push(ActionReport {
            library_id: result.library_id,
            action,
            rule_index: result.slot_index,
        });
    }
    reports
}
