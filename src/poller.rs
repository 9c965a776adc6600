//! Task queue poller
//!
//! One background task refreshes the queue on a fixed interval. Structural
//! guards keep it single-flight: starting is a no-op while a poll loop is
//! already live, the loop stops itself once no task is open, and any fetch
//! error stops it rather than letting a broken loop spin.

use std::sync::Arc;
use std::time::Duration;

use audigest_protocol::Task;
use tokio::task::JoinHandle;

use crate::client::{endpoints, ApiClient};
use crate::error::Result;
use crate::ui::{LogOptions, LogTarget, Severity, StatusLog};
use crate::view;

/// Time between queue refreshes
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

pub struct TaskPoller<C> {
    client: Arc<C>,
    log: StatusLog,
    handle: Option<JoinHandle<()>>,
}

impl<C: ApiClient + 'static> TaskPoller<C> {
    pub fn new(client: Arc<C>, log: StatusLog) -> Self {
        Self {
            client,
            log,
            handle: None,
        }
    }

    /// True while the background loop is live
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start polling; returns false (and changes nothing) when a loop is
    /// already running
    pub fn start(&mut self) -> bool {
        if self.is_active() {
            tracing::debug!("poll loop already running");
            return false;
        }

        let client = Arc::clone(&self.client);
        let log = self.log.clone();
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(POLL_INTERVAL);
            loop {
                ticker.tick().await;
                match fetch_and_render(client.as_ref(), &log).await {
                    Ok(tasks) => {
                        if !tasks.iter().any(|t| t.status.is_open()) {
                            log.success("All tasks have been processed.");
                            tracing::debug!("no open tasks, poll loop stopping");
                            break;
                        }
                    }
                    Err(e) => {
                        log.error(&format!("Failed to fetch the task queue: {}", e));
                        tracing::debug!(error = %e, "poll loop stopping on error");
                        break;
                    }
                }
            }
        }));
        tracing::debug!("poll loop started");
        true
    }

    /// Start the loop unless one is already live; either way a refresh
    /// happens promptly (the new loop ticks immediately, an existing one is
    /// refreshed in place)
    pub async fn ensure_running(&mut self) -> Result<()> {
        if self.start() {
            return Ok(());
        }
        self.force_refresh().await.map(|_| ())
    }

    /// One immediate fetch-and-render outside the interval
    pub async fn force_refresh(&self) -> Result<Vec<Task>> {
        fetch_and_render(self.client.as_ref(), &self.log).await
    }

    /// Block until the loop stops on its own (all tasks settled, or a fetch
    /// error)
    pub async fn wait(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("poll loop aborted");
        }
    }
}

impl<C> Drop for TaskPoller<C> {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

/// Fetch the queue and replace the rendered queue view with the fresh state
async fn fetch_and_render<C: ApiClient>(client: &C, log: &StatusLog) -> Result<Vec<Task>> {
    let tasks: Vec<Task> = client.get_json(endpoints::TASKS).await?;

    let lines = view::render_task_list(&tasks);
    log.log_with(
        &lines.join("\n"),
        Severity::Info,
        LogOptions {
            target: LogTarget::Result,
            append: false,
            clear_existing: false,
        },
    );
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AudigestError;
    use crate::tests::mocks::MockApiClient;
    use crate::theme::Theme;
    use serde_json::json;

    fn settled_queue() -> serde_json::Value {
        json!([{
            "task_id": "0c9d1e2f3a4b",
            "source_name": "meeting.mp3",
            "model_id": "models/gemini-pro",
            "status": "completed",
            "submit_time": "2025-05-20T09:30:00+00:00",
            "start_time": "2025-05-20T09:30:05+00:00",
            "completion_time": "2025-05-20T09:31:00+00:00",
            "error_message": null
        }])
    }

    #[tokio::test]
    async fn test_loop_stops_when_all_tasks_settled() {
        let mock = Arc::new(MockApiClient::new());
        mock.queue_response(endpoints::TASKS, settled_queue());
        let log = StatusLog::silent(Theme::Dark);
        let mut poller = TaskPoller::new(mock.clone(), log.clone());

        assert!(poller.start());
        poller.wait().await;

        assert!(!poller.is_active());
        assert!(log.contains("All tasks have been processed."));
        assert_eq!(mock.requests().len(), 1);
        // queue view rendered into the result buffer
        assert!(log
            .result_entries()
            .iter()
            .any(|e| e.line.contains("0c9d1e2f")));
    }

    #[tokio::test]
    async fn test_loop_stops_on_fetch_error() {
        let mock = Arc::new(MockApiClient::new());
        mock.queue_error(endpoints::TASKS, AudigestError::network("connection reset"));
        let log = StatusLog::silent(Theme::Dark);
        let mut poller = TaskPoller::new(mock, log.clone());

        poller.start();
        poller.wait().await;

        assert!(!poller.is_active());
        assert!(log.contains("Failed to fetch the task queue"));
        assert!(log.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_second_start_is_a_no_op() {
        let mock = Arc::new(MockApiClient::new());
        // open task keeps the first loop alive across the check
        mock.queue_response(
            endpoints::TASKS,
            json!([{
                "task_id": "1111222233334444",
                "source_name": "talk.mp3",
                "model_id": "models/gemini-pro",
                "status": "processing",
                "submit_time": "2025-05-20T09:30:00+00:00",
                "start_time": null,
                "completion_time": null,
                "error_message": null
            }]),
        );
        let log = StatusLog::silent(Theme::Dark);
        let mut poller = TaskPoller::new(mock, log);

        assert!(poller.start());
        // give the spawned loop its first tick
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(poller.is_active());
        assert!(!poller.start());
        poller.stop();
        assert!(!poller.is_active());
    }

    #[tokio::test]
    async fn test_force_refresh_renders_once() {
        let mock = Arc::new(MockApiClient::new());
        mock.queue_response(endpoints::TASKS, settled_queue());
        let log = StatusLog::silent(Theme::Dark);
        let poller = TaskPoller::new(mock.clone(), log.clone());

        let tasks = poller.force_refresh().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(mock.requests().len(), 1);
        // a lone refresh never emits the settled message
        assert!(!log.contains("All tasks have been processed."));
    }
}
