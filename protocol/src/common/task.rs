//! Task records returned by the task queue endpoints
//!
//! A task is created server-side when an analysis job is submitted and moves
//! through `queued -> processing -> {completed | failed}`. Clients only ever
//! observe these transitions, they never drive them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a server-tracked analysis job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    /// Any status string this client version does not know
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// True while the task still occupies the queue (not yet terminal)
    pub fn is_open(&self) -> bool {
        matches!(self, TaskStatus::Queued | TaskStatus::Processing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// One server-tracked analysis job
///
/// `result_preview_html` and `download_links` are only populated on the
/// single-task endpoint and only once the task has completed. `error_message`
/// is present iff the task failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub source_name: String,
    pub model_id: String,
    pub status: TaskStatus,
    pub submit_time: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub completion_time: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    #[serde(default)]
    pub result_preview_html: Option<String>,
    /// Report format (e.g. "md") to server download path
    #[serde(default)]
    pub download_links: Option<BTreeMap<String, String>>,
}

impl Task {
    /// First eight characters of the task id, used everywhere a task is
    /// referenced in user-facing text
    pub fn short_id(&self) -> &str {
        match self.task_id.char_indices().nth(8) {
            Some((end, _)) => &self.task_id[..end],
            None => &self.task_id,
        }
    }
}
