//! Application controller
//!
//! Owns the cross-command state (session, loaded catalog, poll loop) and
//! sequences the services: key gate before catalog, processed source before
//! analysis, analysis before polling. Commands are thin wrappers over these
//! methods.

use std::path::Path;
use std::sync::Arc;

use audigest_protocol::{CustomPrompts, SubmitReportResponse, Task};

use crate::analyze::{AnalysisDraft, AnalysisService, ExtraFormat, PrimaryFormat};
use crate::catalog::{Catalog, CatalogService};
use crate::error::{AudigestError, Result};
use crate::keygate::{KeyGate, KeyGateState};
use crate::poller::TaskPoller;
use crate::report::{ReportService, ReportView};
use crate::session::Session;
use crate::source::{SourceInput, SourceService};
use crate::ui::{LogOptions, LogTarget, Severity, StatusLog};
use crate::view;
use crate::client::ApiClient;

pub struct Controller<C> {
    client: Arc<C>,
    log: StatusLog,
    session: Session,
    catalog: Option<Catalog>,
    poller: TaskPoller<C>,
}

impl<C: ApiClient + 'static> Controller<C> {
    pub fn new(client: Arc<C>, log: StatusLog, session: Session) -> Self {
        let poller = TaskPoller::new(Arc::clone(&client), log.clone());
        Self {
            client,
            log,
            session,
            catalog: None,
            poller,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn log(&self) -> &StatusLog {
        &self.log
    }

    /// Check the key gate and, when the key is valid, load the catalog.
    /// Returns the gate state so callers can decide whether to prompt.
    pub async fn init(&mut self) -> Result<KeyGateState> {
        self.log.info("Checking API key status...");
        let gate = KeyGate::new(Arc::clone(&self.client));
        let (state, message) = gate.check().await;

        match &state {
            KeyGateState::Valid => {
                self.log.success("API key status: set and valid.");
                self.load_catalog().await?;
            }
            KeyGateState::Invalid => {
                self.log
                    .warning("API key status: set but invalid. Please set it again.");
            }
            KeyGateState::NotSet => {
                self.log
                    .warning("API key status: not set. Please set an API key.");
            }
            KeyGateState::CheckFailed(reason) => {
                self.log
                    .error(&format!("API key status check failed: {}", reason));
            }
        }
        if let Some(message) = message {
            tracing::debug!(%message, "key status message");
        }
        Ok(state)
    }

    /// Submit an API key; on success the catalog is (re)loaded
    pub async fn set_api_key(&mut self, api_key: &str) -> Result<()> {
        self.log.info("Submitting API key for validation...");
        let gate = KeyGate::new(Arc::clone(&self.client));
        let response = gate.set_key(api_key).await?;
        self.log.success(&response.message);
        self.load_catalog().await
    }

    /// Load the model catalog and apply the sentinel rule
    pub async fn load_catalog(&mut self) -> Result<()> {
        self.log.info("Fetching the AI model catalog...");
        let catalog = CatalogService::new(Arc::clone(&self.client)).load().await?;

        match &catalog {
            Catalog::Unavailable { placeholder } => {
                for line in view::render_model_detail(placeholder) {
                    self.log.log(&line, Severity::Warning);
                }
                self.log.error(
                    placeholder
                        .dropdown_display_name
                        .as_deref()
                        .unwrap_or("Cannot load models: API key or network problem"),
                );
                self.session.set_selected_model(None)?;
            }
            Catalog::Empty => {
                self.log.warning("The backend returned no models.");
                self.session.set_selected_model(None)?;
            }
            Catalog::Available {
                models,
                default_selection,
            } => {
                self.log
                    .success(&format!("Loaded {} AI models.", models.len()));
                let keep_current = self
                    .session
                    .selected_model()
                    .is_some_and(|id| models.iter().any(|m| m.id == id));
                if !keep_current {
                    self.session
                        .set_selected_model(Some(default_selection.clone()))?;
                }
            }
        }

        self.catalog = Some(catalog);
        Ok(())
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Select a model by id, unprefixed id, or display label
    pub fn select_model(&mut self, reference: &str) -> Result<()> {
        let catalog = self
            .catalog
            .as_ref()
            .ok_or_else(|| AudigestError::invalid_input("Model catalog is not loaded."))?;
        let model = catalog.resolve(reference).ok_or_else(|| {
            AudigestError::invalid_input(format!("No model matches '{}'.", reference))
        })?;
        let id = model.id.clone();
        self.log.info(&format!("Selected model: {}", model.label()));
        self.session.set_selected_model(Some(id))
    }

    /// Process a source. A type change relative to the stored session resets
    /// the derived state first.
    pub async fn submit_source(&mut self, input: SourceInput) -> Result<()> {
        if self
            .session
            .source_type()
            .is_some_and(|t| t != input.source_type())
        {
            self.session.reset_source()?;
            self.log.clear();
            self.log
                .info("Audio source type changed; process the new source.");
        }

        if let Err((severity, message)) = input.validate() {
            self.log.log(&message, severity);
            return Err(AudigestError::invalid_input(message));
        }

        let service = SourceService::new(Arc::clone(&self.client));
        let spinner = crate::ui::create_spinner("Processing audio source...");
        let submitted = service.submit(&input).await;
        spinner.finish_and_clear();
        let response = submitted.map_err(|e| {
            let detail = e
                .api_detail()
                .map(|d| d.render_lines())
                .unwrap_or_else(|| e.to_string());
            self.log
                .error(&format!("Audio source processing failed: {}", detail));
            e
        })?;

        self.session.set_source(
            input.source_type(),
            response.processed_audio_path.clone(),
            input.display_name(),
        )?;
        self.log.success(&format!(
            "Audio source processed successfully: {}",
            response.message
        ));
        Ok(())
    }

    pub async fn reset_source(&mut self) -> Result<()> {
        self.session.reset_source()?;
        self.log.info("Audio source cleared.");
        Ok(())
    }

    /// Submit an analysis job from the current session state and keep the
    /// poll loop running afterwards
    pub async fn submit_analysis(
        &mut self,
        primary: Option<PrimaryFormat>,
        extras: Vec<ExtraFormat>,
        custom_prompts: Option<CustomPrompts>,
    ) -> Result<SubmitReportResponse> {
        let draft = AnalysisDraft {
            source_type: self.session.source_type(),
            source_path: self.session.source_path().map(String::from),
            model_id: self.session.selected_model().map(String::from),
            primary,
            extras,
            custom_prompts,
        };

        self.log.info("Submitting AI analysis task...");
        let service = AnalysisService::new(Arc::clone(&self.client));
        let response = service.submit(draft).await.map_err(|e| {
            let detail = e
                .api_detail()
                .map(|d| d.render_detailed())
                .unwrap_or_else(|| e.to_string());
            self.log
                .error(&format!("Failed to submit the analysis task: {}", detail));
            e
        })?;

        self.log.success(&format!(
            "Task {} submitted successfully: {}",
            response.task_id, response.message
        ));
        self.poller.ensure_running().await?;
        Ok(response)
    }

    /// Refresh the queue once; with `watch`, keep the poll loop running until
    /// every task settles
    pub async fn show_tasks(&mut self, watch: bool) -> Result<Vec<Task>> {
        if watch {
            self.poller.ensure_running().await?;
            self.poller.wait().await;
            Ok(Vec::new())
        } else {
            self.poller.force_refresh().await
        }
    }

    /// Fetch and render one task's report; optionally download every format
    pub async fn view_report(&mut self, task_id: &str, download_dir: Option<&Path>) -> Result<()> {
        let short: String = task_id.chars().take(8).collect();
        self.log.log_with(
            &format!("Loading the report for task {}...", short),
            Severity::Info,
            LogOptions {
                clear_existing: true,
                ..Default::default()
            },
        );

        let service = ReportService::new(Arc::clone(&self.client));
        match service.view(task_id).await? {
            ReportView::Completed {
                task,
                preview_text,
                links,
            } => {
                self.log.log_with(
                    &preview_text,
                    Severity::Info,
                    LogOptions {
                        target: LogTarget::Result,
                        append: false,
                        clear_existing: false,
                    },
                );
                for (label, url) in &links {
                    self.log.info(&format!("Download {} report: {}", label, url));
                }
                if let Some(dir) = download_dir {
                    let written = service.download(&task, dir).await?;
                    for path in written {
                        self.log.success(&format!("Saved {}", path.display()));
                    }
                }
            }
            ReportView::Failed { message, task } => {
                self.log
                    .error(&format!("Task {} failed: {}", task.short_id(), message));
            }
            ReportView::NotReady { task } => {
                self.log.warning(&format!(
                    "Task {} is not finished yet or its result is unavailable.",
                    task.short_id()
                ));
            }
        }
        Ok(())
    }

    /// End-to-end pipeline: source -> analysis -> watch until settled
    pub async fn run(
        &mut self,
        input: SourceInput,
        primary: PrimaryFormat,
        extras: Vec<ExtraFormat>,
        custom_prompts: Option<CustomPrompts>,
    ) -> Result<()> {
        self.log.info("Step 1/4: checking API key and models");
        let state = self.init().await?;
        if state.requires_key() {
            return Err(AudigestError::key(
                "A valid API key is required. Run `audigest login` first.",
            ));
        }

        self.log.info("Step 2/4: processing the audio source");
        self.submit_source(input).await?;

        self.log.info("Step 3/4: submitting the analysis task");
        let response = self
            .submit_analysis(Some(primary), extras, custom_prompts)
            .await?;

        self.log.info("Step 4/4: waiting for the task to settle");
        self.poller.wait().await;
        self.view_report(&response.task_id, None).await
    }
}
