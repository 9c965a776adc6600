//! Report viewing and download
//!
//! A completed task carries a server-rendered HTML preview and per-format
//! download paths. The view step classifies the task first; preview text and
//! links exist only in the completed case.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use audigest_protocol::{Task, TaskStatus};

use crate::client::{endpoints, ApiClient};
use crate::error::{AudigestError, Result};
use crate::view;

/// What a report request resolved to
#[derive(Debug, Clone)]
pub enum ReportView {
    /// Finished task with a preview; `links` are `(LABEL, absolute URL)`
    Completed {
        task: Task,
        preview_text: String,
        links: Vec<(String, String)>,
    },
    Failed {
        task: Task,
        message: String,
    },
    /// The task exists but has not produced a result yet
    NotReady {
        task: Task,
    },
}

pub struct ReportService<C> {
    client: Arc<C>,
}

impl<C: ApiClient> ReportService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Fetch one task and classify it for display
    pub async fn view(&self, task_id: &str) -> Result<ReportView> {
        let task: Task = self
            .client
            .get_json(&endpoints::task(task_id))
            .await
            .map_err(|e| match e.api_status() {
                Some(404) => AudigestError::task(format!("No task matches id '{}'.", task_id)),
                _ => e,
            })?;

        match task.status {
            TaskStatus::Completed if task.result_preview_html.is_some() => {
                let preview_text = task
                    .result_preview_html
                    .as_deref()
                    .map(view::html_preview_to_text)
                    .unwrap_or_default();
                let base_url = &self.client.config().base_url;
                let links = task
                    .download_links
                    .as_ref()
                    .map(|l| view::render_download_links(l.iter(), base_url))
                    .unwrap_or_default();
                Ok(ReportView::Completed {
                    task,
                    preview_text,
                    links,
                })
            }
            TaskStatus::Failed => {
                let message = task
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "Task failed without an error message.".to_string());
                Ok(ReportView::Failed { task, message })
            }
            _ => Ok(ReportView::NotReady { task }),
        }
    }

    /// Download every report format of a completed task into `dir`, returning
    /// the written paths
    pub async fn download(&self, task: &Task, dir: &Path) -> Result<Vec<PathBuf>> {
        let Some(links) = task.download_links.as_ref().filter(|l| !l.is_empty()) else {
            return Err(AudigestError::report_unavailable(format!(
                "Task {} has no downloadable reports.",
                task.short_id()
            )));
        };

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AudigestError::io_from_error("Creating download directory", e))?;

        let mut written = Vec::with_capacity(links.len());
        for (format, path) in links {
            let bytes = self.client.get_bytes(path).await.map_err(|e| {
                AudigestError::download(format!("Fetching the {} report: {}", format, e))
            })?;
            let file_name = Path::new(path)
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(format!("{}-report.{}", task.short_id(), format)));
            let target = dir.join(file_name);
            tokio::fs::write(&target, bytes).await.map_err(|e| {
                AudigestError::io_from_error(format!("Writing {}", target.display()), e)
            })?;
            tracing::info!(file = %target.display(), "report downloaded");
            written.push(target);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiDetail, ErrorCode};
    use crate::tests::mocks::MockApiClient;
    use crate::tests::utils::test_helpers::create_temp_dir;
    use serde_json::json;

    fn completed_task_body() -> serde_json::Value {
        json!({
            "task_id": "0c9d1e2f3a4b",
            "source_name": "meeting.mp3",
            "model_id": "models/gemini-pro",
            "status": "completed",
            "submit_time": "2025-05-20T09:30:00+00:00",
            "start_time": "2025-05-20T09:30:05+00:00",
            "completion_time": "2025-05-20T09:31:00+00:00",
            "error_message": null,
            "result_preview_html": "<h3>Summary</h3><p>Key findings.</p>",
            "download_links": {
                "md": "/download/0c9d1e2f3a4b/report.md",
                "txt": "/download/0c9d1e2f3a4b/report.txt"
            }
        })
    }

    #[tokio::test]
    async fn test_completed_view_has_preview_and_links() {
        let mock = Arc::new(MockApiClient::new());
        mock.queue_response(&endpoints::task("0c9d1e2f3a4b"), completed_task_body());
        let service = ReportService::new(mock);

        match service.view("0c9d1e2f3a4b").await.unwrap() {
            ReportView::Completed {
                preview_text,
                links,
                ..
            } => {
                assert!(preview_text.contains("Summary"));
                assert!(preview_text.contains("Key findings."));
                assert!(!preview_text.contains('<'));
                assert_eq!(links.len(), 2);
                assert_eq!(links[0].0, "MD");
                assert!(links[0].1.starts_with("http://"));
            }
            other => panic!("expected Completed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_view_carries_error_message() {
        let mock = Arc::new(MockApiClient::new());
        mock.queue_response(
            &endpoints::task("deadbeef0000"),
            json!({
                "task_id": "deadbeef0000",
                "source_name": "talk.mp3",
                "model_id": "models/gemini-pro",
                "status": "failed",
                "submit_time": "2025-05-20T09:30:00+00:00",
                "start_time": null,
                "completion_time": "2025-05-20T09:30:10+00:00",
                "error_message": "yt-dlp exited with 1"
            }),
        );
        let service = ReportService::new(mock);

        match service.view("deadbeef0000").await.unwrap() {
            ReportView::Failed { message, .. } => assert_eq!(message, "yt-dlp exited with 1"),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_completed_without_preview_is_not_ready() {
        let mock = Arc::new(MockApiClient::new());
        mock.queue_response(
            &endpoints::task("1111222233334444"),
            json!({
                "task_id": "1111222233334444",
                "source_name": "talk.mp3",
                "model_id": "models/gemini-pro",
                "status": "completed",
                "submit_time": "2025-05-20T09:30:00+00:00",
                "start_time": null,
                "completion_time": null,
                "error_message": null
            }),
        );
        let service = ReportService::new(mock);

        assert!(matches!(
            service.view("1111222233334444").await.unwrap(),
            ReportView::NotReady { .. }
        ));
    }

    #[tokio::test]
    async fn test_download_writes_every_format() {
        let mock = Arc::new(MockApiClient::new());
        mock.queue_response(&endpoints::task("0c9d1e2f3a4b"), completed_task_body());
        mock.queue_bytes("/download/0c9d1e2f3a4b/report.md", b"# report".to_vec());
        mock.queue_bytes("/download/0c9d1e2f3a4b/report.txt", b"report".to_vec());
        let service = ReportService::new(mock);

        let view = service.view("0c9d1e2f3a4b").await.unwrap();
        let ReportView::Completed { task, .. } = view else {
            panic!("expected Completed");
        };

        let dir = create_temp_dir();
        let written = service.download(&task, dir.path()).await.unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("report.md")).unwrap(),
            "# report"
        );
    }

    #[tokio::test]
    async fn test_unknown_task_id_maps_to_task_error() {
        let mock = Arc::new(MockApiClient::new());
        mock.queue_error(
            &endpoints::task("no-such-task"),
            AudigestError::api(404, ApiDetail::Message("Task not found".to_string())),
        );
        let service = ReportService::new(mock);

        let err = service.view("no-such-task").await.unwrap_err();
        assert!(matches!(
            err,
            AudigestError::Task {
                code: ErrorCode::TaskNotFound,
                ..
            }
        ));
        assert!(err.to_string().contains("no-such-task"));
    }

    #[tokio::test]
    async fn test_failed_fetch_maps_to_download_error() {
        let mock = Arc::new(MockApiClient::new());
        mock.queue_response(&endpoints::task("0c9d1e2f3a4b"), completed_task_body());
        mock.queue_error(
            "/download/0c9d1e2f3a4b/report.md",
            AudigestError::api(500, ApiDetail::Message("storage offline".to_string())),
        );
        let service = ReportService::new(mock);

        let view = service.view("0c9d1e2f3a4b").await.unwrap();
        let ReportView::Completed { task, .. } = view else {
            panic!("expected Completed");
        };

        let dir = create_temp_dir();
        let err = service.download(&task, dir.path()).await.unwrap_err();
        assert!(matches!(
            err,
            AudigestError::Task {
                code: ErrorCode::DownloadFailed,
                ..
            }
        ));
        assert!(err.to_string().contains("md"));
    }

    #[tokio::test]
    async fn test_download_without_links_is_rejected() {
        let mock = Arc::new(MockApiClient::new());
        let service = ReportService::new(mock);

        let task: Task = serde_json::from_value(json!({
            "task_id": "deadbeef0000",
            "source_name": "talk.mp3",
            "model_id": "models/gemini-pro",
            "status": "completed",
            "submit_time": "2025-05-20T09:30:00+00:00",
            "start_time": null,
            "completion_time": null,
            "error_message": null
        }))
        .unwrap();

        let dir = create_temp_dir();
        assert!(service.download(&task, dir.path()).await.is_err());
    }
}
