//! Pure renderers for backend data
//!
//! Every function here maps data to text with no I/O, so rendering behavior
//! is testable without a terminal or a backend. Callers decide where the text
//! goes and how it is colored.

use audigest_protocol::{ModelInfo, Task, TaskStatus};
use chrono::{DateTime, Local, Utc};

use crate::ui::Severity;

/// Status word shown next to a task
pub fn status_word(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Queued => "queued",
        TaskStatus::Processing => "processing",
        TaskStatus::Completed => "completed",
        TaskStatus::Failed => "failed",
        TaskStatus::Unknown => "unknown",
    }
}

pub fn status_severity(status: TaskStatus) -> Severity {
    match status {
        TaskStatus::Queued | TaskStatus::Processing => Severity::Info,
        TaskStatus::Completed => Severity::Success,
        TaskStatus::Failed => Severity::Error,
        TaskStatus::Unknown => Severity::Warning,
    }
}

fn local_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "N/A".to_string(),
    }
}

/// Render one task as the lines of its queue card
pub fn render_task(task: &Task) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Task {} - {}  [{}]",
            task.short_id(),
            task.source_name,
            status_word(task.status)
        ),
        format!("  Model:      {}", task.model_id),
        format!("  Submitted:  {}", local_time(Some(task.submit_time))),
        format!("  Started:    {}", local_time(task.start_time)),
        format!("  Completed:  {}", local_time(task.completion_time)),
    ];

    if task.status == TaskStatus::Failed {
        if let Some(message) = &task.error_message {
            lines.push(format!("  Error:      {}", message));
        }
    }
    if task.status == TaskStatus::Completed {
        lines.push(format!(
            "  View with:  audigest report {}",
            task.short_id()
        ));
    }

    lines
}

/// Render the whole task queue, newest submissions as the backend orders them
pub fn render_task_list(tasks: &[Task]) -> Vec<String> {
    if tasks.is_empty() {
        return vec!["No tasks in the queue.".to_string()];
    }
    let mut lines = Vec::new();
    for (i, task) in tasks.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(render_task(task));
    }
    lines
}

/// Render a model's detail panel; descriptive fields are omitted when absent,
/// the raw id always closes the panel
pub fn render_model_detail(model: &ModelInfo) -> Vec<String> {
    let mut lines = vec![match &model.chinese_summary_parenthesized {
        Some(summary) if !summary.is_empty() => {
            format!("Name: {} {}", model.detail_name(), summary)
        }
        _ => format!("Name: {}", model.detail_name()),
    }];

    if let Some(io) = model
        .chinese_input_output
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        lines.push(format!("Input/output: {}", io));
    }
    if let Some(uses) = model
        .chinese_suitable_for
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        lines.push(format!("Suitable for: {}", uses));
    }
    if let Some(desc) = model
        .original_description_from_api
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        lines.push(format!("API description: {}", desc));
    }
    lines.push(format!("Model ID: {}", model.id));
    lines
}

/// Render the selection list, marking the current selection
pub fn render_model_list(models: &[ModelInfo], selected: Option<&str>) -> Vec<String> {
    models
        .iter()
        .map(|model| {
            let marker = if selected == Some(model.id.as_str()) {
                "*"
            } else {
                " "
            };
            format!("{} {}", marker, model.label())
        })
        .collect()
}

/// Flatten the server-rendered HTML preview into terminal text
///
/// The preview is trusted output of the backend's own renderer, so this only
/// needs tag stripping and entity decoding, not a real HTML parser.
pub fn html_preview_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        if in_tag {
            if c != '>' {
                tag.push(c);
                continue;
            }
            in_tag = false;
            let name: String = tag
                .split_whitespace()
                .next()
                .unwrap_or("")
                .trim_end_matches('/')
                .to_ascii_lowercase();
            match name.as_str() {
                "br" => text.push('\n'),
                "/p" | "/div" | "/h1" | "/h2" | "/h3" | "/h4" => text.push_str("\n\n"),
                "/li" => text.push('\n'),
                "li" => text.push_str("- "),
                _ => {}
            }
        } else if c == '<' {
            in_tag = true;
            tag.clear();
        } else {
            text.push(c);
        }
    }

    // `&amp;` must decode last so escaped entities stay escaped
    let decoded = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");

    // collapse runs of blank lines left over from adjacent block tags
    let mut out = String::with_capacity(decoded.len());
    let mut blank_run = 0usize;
    for line in decoded.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            out.push('\n');
        } else {
            out.push_str(line.trim_end());
            out.push('\n');
        }
        if !line.trim().is_empty() {
            blank_run = 0;
        }
    }
    out.trim().to_string()
}

/// Render download links as `(label, absolute_url)` pairs, format labels
/// uppercased
pub fn render_download_links<'a, I>(links: I, base_url: &str) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    links
        .into_iter()
        .map(|(format, path)| {
            let url = if path.starts_with("http://") || path.starts_with("https://") {
                path.clone()
            } else {
                format!(
                    "{}/{}",
                    base_url.trim_end_matches('/'),
                    path.trim_start_matches('/')
                )
            };
            (format.to_uppercase(), url)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn task(status: &str, error: Option<&str>) -> Task {
        serde_json::from_value(json!({
            "task_id": "0c9d1e2f3a4b5c6d",
            "source_name": "meeting.mp3",
            "model_id": "models/gemini-1.5-flash-latest",
            "status": status,
            "submit_time": "2025-05-20T09:30:00+00:00",
            "start_time": null,
            "completion_time": null,
            "error_message": error
        }))
        .unwrap()
    }

    #[test]
    fn test_task_card_uses_short_id() {
        let lines = render_task(&task("queued", None));
        assert!(lines[0].contains("0c9d1e2f"));
        assert!(!lines[0].contains("0c9d1e2f3a4b"));
        assert!(lines[0].contains("meeting.mp3"));
    }

    #[test]
    fn test_error_line_only_when_failed() {
        let failed = render_task(&task("failed", Some("yt-dlp exited with 1")));
        assert!(failed.iter().any(|l| l.contains("yt-dlp exited with 1")));

        // a stale error message on a non-failed task is not rendered
        let queued = render_task(&task("queued", Some("stale")));
        assert!(!queued.iter().any(|l| l.contains("stale")));
    }

    #[test]
    fn test_completed_task_offers_report_command() {
        let lines = render_task(&task("completed", None));
        assert!(lines.iter().any(|l| l.contains("report 0c9d1e2f")));
    }

    #[test]
    fn test_empty_queue_message() {
        let lines = render_task_list(&[]);
        assert_eq!(lines, vec!["No tasks in the queue.".to_string()]);
    }

    #[test]
    fn test_model_detail_omits_missing_fields_and_keeps_raw_id_last() {
        let model: ModelInfo = serde_json::from_value(json!({
            "id": "models/gemini-1.5-pro-latest",
            "dropdown_display_name": "Gemini 1.5 Pro",
            "chinese_suitable_for": "Long documents"
        }))
        .unwrap();
        let lines = render_model_detail(&model);
        assert_eq!(lines[0], "Name: Gemini 1.5 Pro");
        assert!(lines.iter().any(|l| l == "Suitable for: Long documents"));
        assert!(!lines.iter().any(|l| l.starts_with("Input/output")));
        assert_eq!(lines.last().unwrap(), "Model ID: models/gemini-1.5-pro-latest");
    }

    #[test]
    fn test_model_list_marks_selection() {
        let models: Vec<ModelInfo> = serde_json::from_value(json!([
            { "id": "models/gemini-1.5-flash-latest" },
            { "id": "models/gemini-1.5-pro-latest" }
        ]))
        .unwrap();
        let lines = render_model_list(&models, Some("models/gemini-1.5-pro-latest"));
        assert_eq!(lines[0], "  gemini-1.5-flash-latest");
        assert_eq!(lines[1], "* gemini-1.5-pro-latest");
    }

    #[test]
    fn test_html_preview_flattening() {
        let html = "<h3>Summary</h3><p>First &amp; second.<br>Next line.</p><ul><li>One</li><li>Two</li></ul>";
        let text = html_preview_to_text(html);
        assert!(text.starts_with("Summary"));
        assert!(text.contains("First & second.\nNext line."));
        assert!(text.contains("- One\n- Two"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_html_entities_decoded() {
        assert_eq!(
            html_preview_to_text("A &lt;tag&gt; &quot;quoted&quot; &#39;x&#39;&nbsp;end"),
            "A <tag> \"quoted\" 'x' end"
        );
    }

    #[test]
    fn test_escaped_entities_decode_once() {
        assert_eq!(html_preview_to_text("&amp;lt;b&amp;gt;"), "&lt;b&gt;");
        assert_eq!(html_preview_to_text("a &amp;&amp; b"), "a && b");
    }

    #[test]
    fn test_single_pdf_link_renders_exactly_once() {
        let mut links = BTreeMap::new();
        links.insert("pdf".to_string(), "/download/abc/report.pdf".to_string());

        let rendered = render_download_links(links.iter(), "http://127.0.0.1:8000");
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].0, "PDF");
        assert_eq!(rendered[0].1, "http://127.0.0.1:8000/download/abc/report.pdf");
    }

    #[test]
    fn test_download_links_absolute_and_uppercased() {
        let mut links = BTreeMap::new();
        links.insert("md".to_string(), "/download/abc/report.md".to_string());
        links.insert("txt".to_string(), "http://cdn.example/report.txt".to_string());

        let rendered = render_download_links(links.iter(), "http://127.0.0.1:8000/");
        assert_eq!(
            rendered[0],
            (
                "MD".to_string(),
                "http://127.0.0.1:8000/download/abc/report.md".to_string()
            )
        );
        assert_eq!(
            rendered[1],
            ("TXT".to_string(), "http://cdn.example/report.txt".to_string())
        );
    }
}
