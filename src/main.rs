use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod analyze;
mod catalog;
mod cli;
mod client;
mod config;
mod controller;
mod error;
mod keygate;
mod poller;
mod prompts;
mod report;
mod session;
mod source;
mod theme;
mod ui;
mod view;

#[cfg(test)]
mod tests;

use cli::CliHandler;

#[derive(Parser)]
#[command(
    name = "audigest",
    about = "Audio analysis client for YouTube and local audio",
    long_about = "Audigest - AI audio analysis client

OVERVIEW:
  This tool submits YouTube URLs or local audio files to an audigest backend,
  runs AI analysis jobs over them, and fetches the finished reports.

WORKFLOW:
  1. Login with your Google API key
  2. Process an audio source (YouTube URL or file upload)
  3. Start the analysis and watch the task queue
  4. View or download the report once the task completes

QUICK START:
  audigest login                            # Store and validate your API key
  audigest source url <YOUTUBE_URL>         # Fetch audio from YouTube
  audigest source file <AUDIO_FILE>         # Upload a local audio file
  audigest analyze --watch                  # Submit a job and follow the queue
  audigest report <TASK_ID>                 # Show a finished report
  audigest run --url <YOUTUBE_URL>          # Complete workflow in one command",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use an alternate config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show backend, API key and session status
    #[command(aliases = &["st"])]
    Status,

    /// Store and validate a Google API key
    Login(LoginArgs),

    /// List available AI models
    #[command(aliases = &["ls"])]
    Models,

    /// Process an audio source
    Source(SourceArgs),

    /// Submit an analysis job for the processed source
    Analyze(AnalyzeArgs),

    /// Show the task queue
    Tasks(TasksArgs),

    /// View a finished report
    Report(ReportArgs),

    /// Complete workflow: source + analyze + watch + report
    Run(RunArgs),

    /// Configure settings
    #[command(aliases = &["cfg"])]
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct LoginArgs {
    /// API key; prompted for interactively when omitted
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Args)]
pub struct SourceArgs {
    #[command(subcommand)]
    pub command: SourceCommand,
}

#[derive(Subcommand)]
pub enum SourceCommand {
    /// Fetch audio from a YouTube URL
    Url { url: String },

    /// Upload a local audio file
    File { path: PathBuf },

    /// Clear the processed source
    Reset,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Model to use (id or display name); defaults to the current selection
    #[arg(short, long)]
    pub model: Option<String>,

    /// Primary report format: summary_tc, summary_transcript_tc,
    /// transcript_bilingual_summary
    #[arg(short, long, default_value = "summary_tc")]
    pub output: String,

    /// Extra downloadable formats (md, txt); repeatable
    #[arg(short, long)]
    pub extra: Vec<String>,

    /// Custom summary prompt text
    #[arg(long)]
    pub summary_prompt: Option<String>,

    /// Read the custom summary prompt from a file
    #[arg(long, conflicts_with = "summary_prompt")]
    pub summary_prompt_file: Option<PathBuf>,

    /// Custom transcript prompt text
    #[arg(long)]
    pub transcript_prompt: Option<String>,

    /// Read the custom transcript prompt from a file
    #[arg(long, conflicts_with = "transcript_prompt")]
    pub transcript_prompt_file: Option<PathBuf>,

    /// Follow the task queue until every task settles
    #[arg(short, long)]
    pub watch: bool,
}

#[derive(Args)]
pub struct TasksArgs {
    /// Keep refreshing until every task settles
    #[arg(short, long)]
    pub watch: bool,
}

#[derive(Args)]
pub struct ReportArgs {
    pub task_id: String,

    /// Download every report format into this directory
    #[arg(short, long)]
    pub download: Option<PathBuf>,
}

#[derive(Args)]
pub struct RunArgs {
    /// YouTube URL to analyze
    #[arg(long, conflicts_with = "file")]
    pub url: Option<String>,

    /// Local audio file to analyze
    #[arg(long)]
    pub file: Option<PathBuf>,

    #[arg(short, long)]
    pub model: Option<String>,

    #[arg(short, long, default_value = "summary_tc")]
    pub output: String,

    #[arg(short, long)]
    pub extra: Vec<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    SetEndpoint { url: String },
    SetTimeout { seconds: u64 },
    SetTheme { theme: String },
    /// Switch between the light and dark theme
    ToggleTheme,
    SetFontSize { size: String },
    Reset,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(format!("audigest={}", log_level));
    subscriber.init();

    let mut handler = match CliHandler::new(cli.config).await {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = handler.execute(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
