//! CLI command dispatch

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::analyze::{ExtraFormat, PrimaryFormat};
use crate::client::HttpClient;
use crate::config::{default_config_path, AppConfig};
use crate::controller::Controller;
use crate::error::{AudigestError, Result};
use crate::keygate::KeyGateState;
use crate::prompts::{self, DEFAULT_SUMMARY_PROMPT, DEFAULT_TRANSCRIPT_PROMPT};
use crate::session::Session;
use crate::source::SourceInput;
use crate::theme::{FontSize, Theme};
use crate::ui::{StatusLog, UI};
use crate::view;
use crate::{
    AnalyzeArgs, Commands, ConfigArgs, ConfigCommand, LoginArgs, ReportArgs, RunArgs, SourceArgs,
    SourceCommand, TasksArgs,
};

/// CLI handler for processing commands
pub struct CliHandler {
    config_path: Option<PathBuf>,
    config: AppConfig,
    ui: UI,
}

impl CliHandler {
    /// Create a handler, loading configuration from the given path or the
    /// default location
    pub async fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config = AppConfig::load(config_path.as_deref()).await?;
        let ui = UI::new(config.theme, config.font_size.scale());
        Ok(Self {
            config_path,
            config,
            ui,
        })
    }

    fn config_file(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(default_config_path)
    }

    fn controller(&self) -> Result<Controller<HttpClient>> {
        let client = Arc::new(HttpClient::new(self.config.to_client_config())?);
        let log = StatusLog::new(self.config.theme);
        let session = Session::load()?;
        Ok(Controller::new(client, log, session))
    }

    /// Execute a CLI command
    pub async fn execute(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Status => self.handle_status().await,
            Commands::Login(args) => self.handle_login(args).await,
            Commands::Models => self.handle_models().await,
            Commands::Source(args) => self.handle_source(args).await,
            Commands::Analyze(args) => self.handle_analyze(args).await,
            Commands::Tasks(args) => self.handle_tasks(args).await,
            Commands::Report(args) => self.handle_report(args).await,
            Commands::Run(args) => self.handle_run(args).await,
            Commands::Config(args) => self.handle_config(args).await,
        }
    }

    /// Handle status command
    async fn handle_status(&mut self) -> Result<()> {
        let mut controller = self.controller()?;
        let state = controller.init().await?;

        let key_status = match &state {
            KeyGateState::Valid => "set and valid".to_string(),
            KeyGateState::Invalid => "set but invalid".to_string(),
            KeyGateState::NotSet => "not set".to_string(),
            KeyGateState::CheckFailed(reason) => format!("check failed ({})", reason),
        };
        let models = match controller.catalog() {
            Some(catalog) if !catalog.analysis_blocked() => {
                format!("{} available", catalog.models().len())
            }
            Some(_) => "unavailable".to_string(),
            None => "not loaded".to_string(),
        };
        let source = controller
            .session()
            .state()
            .source_name
            .clone()
            .unwrap_or_else(|| "none".to_string());

        self.ui.card(
            "Status",
            vec![
                ("Endpoint", self.config.endpoint.clone()),
                ("API key", key_status),
                ("Models", models),
                ("Processed source", source),
                ("Theme", format!("{:?}", self.config.theme).to_lowercase()),
                (
                    "Font size",
                    format!("{:?}", self.config.font_size).to_lowercase(),
                ),
            ],
        );
        Ok(())
    }

    /// Handle login command
    async fn handle_login(&mut self, args: LoginArgs) -> Result<()> {
        let api_key = match args.api_key {
            Some(key) => key,
            None => dialoguer::Password::new()
                .with_prompt("Google API key")
                .interact()?,
        };
        let mut controller = self.controller()?;
        controller.set_api_key(&api_key).await
    }

    /// Handle models command
    async fn handle_models(&mut self) -> Result<()> {
        let mut controller = self.controller()?;
        controller.load_catalog().await?;

        let Some(catalog) = controller.catalog() else {
            return Ok(());
        };
        if catalog.analysis_blocked() {
            return Ok(());
        }

        self.ui.header("AI Models");
        let selected = controller.session().selected_model();
        for line in view::render_model_list(catalog.models(), selected) {
            println!("{}", line);
        }

        if let Some(model) = selected.and_then(|id| catalog.find(id)) {
            self.ui.blank_line();
            self.ui.separator();
            for line in view::render_model_detail(model) {
                println!("{}", line);
            }
        }
        Ok(())
    }

    /// Handle source command
    async fn handle_source(&mut self, args: SourceArgs) -> Result<()> {
        let mut controller = self.controller()?;
        match args.command {
            SourceCommand::Url { url } => controller.submit_source(SourceInput::Youtube(url)).await,
            SourceCommand::File { path } => {
                controller.submit_source(SourceInput::Upload(path)).await
            }
            SourceCommand::Reset => controller.reset_source().await,
        }
    }

    /// Handle analyze command
    async fn handle_analyze(&mut self, args: AnalyzeArgs) -> Result<()> {
        let primary: PrimaryFormat = args.output.parse()?;
        let extras = args
            .extra
            .iter()
            .map(|s| s.parse::<ExtraFormat>())
            .collect::<Result<Vec<_>>>()?;

        let summary = resolve_prompt(
            args.summary_prompt,
            args.summary_prompt_file.as_deref(),
            DEFAULT_SUMMARY_PROMPT,
        )
        .await?;
        let transcript = resolve_prompt(
            args.transcript_prompt,
            args.transcript_prompt_file.as_deref(),
            DEFAULT_TRANSCRIPT_PROMPT,
        )
        .await?;
        let custom_prompts =
            prompts::build_custom_prompts(Some(&summary), Some(&transcript));

        let mut controller = self.controller()?;
        if let Some(model) = &args.model {
            controller.load_catalog().await?;
            controller.select_model(model)?;
        }

        controller
            .submit_analysis(Some(primary), extras, custom_prompts)
            .await?;
        if args.watch {
            controller.show_tasks(true).await?;
        }
        Ok(())
    }

    /// Handle tasks command
    async fn handle_tasks(&mut self, args: TasksArgs) -> Result<()> {
        let mut controller = self.controller()?;
        controller.show_tasks(args.watch).await?;
        Ok(())
    }

    /// Handle report command
    async fn handle_report(&mut self, args: ReportArgs) -> Result<()> {
        let mut controller = self.controller()?;
        controller
            .view_report(&args.task_id, args.download.as_deref())
            .await
    }

    /// Handle run command: source -> analyze -> watch -> report
    async fn handle_run(&mut self, args: RunArgs) -> Result<()> {
        let input = match (args.url, args.file) {
            (Some(url), None) => SourceInput::Youtube(url),
            (None, Some(path)) => SourceInput::Upload(path),
            _ => {
                return Err(AudigestError::invalid_input(
                    "Provide exactly one of --url or --file.",
                ))
            }
        };
        let primary: PrimaryFormat = args.output.parse()?;
        let extras = args
            .extra
            .iter()
            .map(|s| s.parse::<ExtraFormat>())
            .collect::<Result<Vec<_>>>()?;

        let mut controller = self.controller()?;
        if let Some(model) = &args.model {
            controller.load_catalog().await?;
            controller.select_model(model)?;
        }
        controller.run(input, primary, extras, None).await
    }

    /// Handle config command
    async fn handle_config(&mut self, args: ConfigArgs) -> Result<()> {
        match args.command {
            ConfigCommand::Show => {
                self.ui.card(
                    "Configuration",
                    vec![
                        ("Endpoint", self.config.endpoint.clone()),
                        ("Timeout", format!("{}s", self.config.timeout)),
                        ("Verbose", self.config.verbose.to_string()),
                        ("Theme", format!("{:?}", self.config.theme).to_lowercase()),
                        (
                            "Font size",
                            format!("{:?}", self.config.font_size).to_lowercase(),
                        ),
                        ("File", self.config_file().display().to_string()),
                    ],
                );
                return Ok(());
            }
            ConfigCommand::SetEndpoint { url } => {
                if url.trim().is_empty() {
                    return Err(AudigestError::config("Endpoint URL cannot be empty"));
                }
                self.config.endpoint = url;
            }
            ConfigCommand::SetTimeout { seconds } => {
                if seconds == 0 {
                    return Err(AudigestError::config("Timeout must be at least 1 second"));
                }
                self.config.timeout = seconds;
            }
            ConfigCommand::SetTheme { theme } => {
                self.config.theme = match theme.to_lowercase().as_str() {
                    "light" => Theme::Light,
                    "dark" => Theme::Dark,
                    other => {
                        return Err(AudigestError::config(format!(
                            "Unknown theme '{}'. Choose light or dark.",
                            other
                        )))
                    }
                };
            }
            ConfigCommand::ToggleTheme => {
                self.config.theme = self.config.theme.toggled();
            }
            ConfigCommand::SetFontSize { size } => {
                self.config.font_size = match size.to_lowercase().as_str() {
                    "small" => FontSize::Small,
                    "default" => FontSize::Default,
                    "large" => FontSize::Large,
                    other => {
                        return Err(AudigestError::config(format!(
                            "Unknown font size '{}'. Choose small, default or large.",
                            other
                        )))
                    }
                };
            }
            ConfigCommand::Reset => {
                self.config = AppConfig::default();
            }
        }

        self.config.save(&self.config_file()).await?;
        self.ui = UI::new(self.config.theme, self.config.font_size.scale());
        self.ui.success("Configuration updated.");
        Ok(())
    }
}

/// Resolve a prompt override: explicit text wins, then file content, then
/// the built-in default
async fn resolve_prompt(
    text: Option<String>,
    file: Option<&Path>,
    default: &str,
) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AudigestError::io_from_error(format!("Reading {}", path.display()), e));
    }
    Ok(default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::test_helpers::create_temp_dir;
    use crate::ConfigArgs;

    #[tokio::test]
    async fn test_config_toggle_theme_flips_and_persists() {
        let dir = create_temp_dir();
        let config_file = dir.path().join("config.json");

        let mut handler = CliHandler::new(Some(config_file.clone())).await.unwrap();
        assert_eq!(handler.config.theme, Theme::Dark);

        handler
            .handle_config(ConfigArgs {
                command: ConfigCommand::ToggleTheme,
            })
            .await
            .unwrap();
        assert_eq!(handler.config.theme, Theme::Light);

        // the flipped theme is what the next invocation loads
        let reloaded = AppConfig::load(Some(&config_file)).await.unwrap();
        assert_eq!(reloaded.theme, Theme::Light);

        handler
            .handle_config(ConfigArgs {
                command: ConfigCommand::ToggleTheme,
            })
            .await
            .unwrap();
        assert_eq!(handler.config.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn test_prompt_resolution_order() {
        let dir = create_temp_dir();
        let path = dir.path().join("prompt.txt");
        tokio::fs::write(&path, "from file").await.unwrap();

        let text = resolve_prompt(Some("inline".to_string()), Some(&path), "default")
            .await
            .unwrap();
        assert_eq!(text, "inline");

        let text = resolve_prompt(None, Some(&path), "default").await.unwrap();
        assert_eq!(text, "from file");

        let text = resolve_prompt(None, None, "default").await.unwrap();
        assert_eq!(text, "default");
    }
}
