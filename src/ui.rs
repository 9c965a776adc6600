//! Terminal UI utilities and the status log
//!
//! [`UI`] wraps styled console output (color only where the terminal supports
//! it). [`StatusLog`] is the append-only message sink every operation reports
//! through; it retains rendered entries in a buffer so behavior is assertable
//! in tests without a terminal.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use console::{strip_ansi_codes, Term};
use owo_colors::{AnsiColors, OwoColorize};
use unicode_width::UnicodeWidthStr;

use crate::theme::{Palette, Scale, Theme};

/// How strongly a log entry signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn color(self, palette: &Palette) -> AnsiColors {
        match self {
            Severity::Info => palette.info,
            Severity::Success => palette.success,
            Severity::Warning => palette.warning,
            Severity::Error => palette.error,
        }
    }
}

/// Which retained buffer an entry lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogTarget {
    #[default]
    Status,
    Result,
}

/// Options for a single log call
#[derive(Debug, Clone, Copy)]
pub struct LogOptions {
    pub target: LogTarget,
    pub append: bool,
    pub clear_existing: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            target: LogTarget::Status,
            append: true,
            clear_existing: false,
        }
    }
}

/// One rendered log line
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub line: String,
}

struct LogState {
    palette: Palette,
    quiet: bool,
    entries: Vec<LogEntry>,
    result_entries: Vec<LogEntry>,
}

/// Most recent entries kept in the default buffer (auto-scroll analog)
const STATUS_BUFFER_CAP: usize = 200;

/// Timestamped, severity-colored message sink
#[derive(Clone)]
pub struct StatusLog {
    inner: Arc<Mutex<LogState>>,
}

impl StatusLog {
    pub fn new(theme: Theme) -> Self {
        Self::with_quiet(theme, false)
    }

    /// A log that retains entries but never writes to the terminal
    pub fn silent(theme: Theme) -> Self {
        Self::with_quiet(theme, true)
    }

    fn with_quiet(theme: Theme, quiet: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogState {
                palette: theme.palette(),
                quiet,
                entries: Vec::new(),
                result_entries: Vec::new(),
            })),
        }
    }

    /// Re-apply a theme, recomputing the derived palette
    pub fn apply_theme(&self, theme: Theme) {
        let mut state = self.inner.lock().unwrap();
        state.palette = theme.palette();
    }

    pub fn log(&self, message: &str, severity: Severity) {
        self.log_with(message, severity, LogOptions::default());
    }

    /// Append a message; multi-line messages render one entry per line
    pub fn log_with(&self, message: &str, severity: Severity, options: LogOptions) {
        let mut state = self.inner.lock().unwrap();

        if options.clear_existing || (!options.append && options.target != LogTarget::Status) {
            match options.target {
                LogTarget::Status => state.entries.clear(),
                LogTarget::Result => state.result_entries.clear(),
            }
        }

        let timestamp = Local::now();
        for line in message.split('\n') {
            let entry = LogEntry {
                timestamp,
                severity,
                line: line.to_string(),
            };
            if !state.quiet {
                print_entry(&entry, &state.palette);
            }
            match options.target {
                LogTarget::Status => state.entries.push(entry),
                LogTarget::Result => state.result_entries.push(entry),
            }
        }

        let len = state.entries.len();
        if len > STATUS_BUFFER_CAP {
            state.entries.drain(..len - STATUS_BUFFER_CAP);
        }
    }

    pub fn info(&self, message: &str) {
        self.log(message, Severity::Info);
    }

    pub fn success(&self, message: &str) {
        self.log(message, Severity::Success);
    }

    pub fn warning(&self, message: &str) {
        self.log(message, Severity::Warning);
    }

    pub fn error(&self, message: &str) {
        self.log(message, Severity::Error);
    }

    /// Snapshot of the retained default-target entries
    pub fn entries(&self) -> Vec<LogEntry> {
        self.inner.lock().unwrap().entries.clone()
    }

    pub fn result_entries(&self) -> Vec<LogEntry> {
        self.inner.lock().unwrap().result_entries.clone()
    }

    /// True when any retained entry contains the fragment
    pub fn contains(&self, fragment: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .entries
            .iter()
            .any(|e| e.line.contains(fragment))
    }

    pub fn clear(&self) {
        let mut state = self.inner.lock().unwrap();
        state.entries.clear();
        state.result_entries.clear();
    }
}

fn print_entry(entry: &LogEntry, palette: &Palette) {
    let color = entry.severity.color(palette);
    let stamp = entry.timestamp.format("%H:%M:%S");
    if Term::stdout().features().colors_supported() {
        match entry.severity {
            Severity::Error => eprintln!("[{}] {}", stamp, entry.line.color(color).bold()),
            _ => println!("[{}] {}", stamp, entry.line.color(color)),
        }
    } else {
        match entry.severity {
            Severity::Error => eprintln!("[{}] {}", stamp, entry.line),
            _ => println!("[{}] {}", stamp, entry.line),
        }
    }
}

/// Styled console output helpers
pub struct UI {
    term: Term,
    palette: Palette,
    scale: Scale,
}

impl UI {
    pub fn new(theme: Theme, scale: Scale) -> Self {
        Self {
            term: Term::stdout(),
            palette: theme.palette(),
            scale,
        }
    }

    fn colorize<F>(&self, text: &str, color_fn: F) -> String
    where
        F: FnOnce(&str) -> String,
    {
        if self.supports_color() {
            color_fn(text)
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, message: &str) {
        let color = self.palette.success;
        println!("{}", self.colorize(message, |m| m.color(color).bold().to_string()));
    }

    pub fn blank_line(&self) {
        println!();
    }

    /// Print a section header, sized by the active font-size scale
    pub fn header(&self, title: &str) {
        let rule_width = self.scale.heading_width();
        let title_len = title.width() + 4;
        let line_len = if rule_width > title_len {
            (rule_width - title_len) / 2
        } else {
            0
        };

        let line = "═".repeat(line_len);
        println!();
        if self.supports_color() {
            let accent = self.palette.accent;
            println!(
                "{} {} {}",
                line.color(accent),
                title.color(accent).bold(),
                line.color(accent)
            );
        } else {
            println!("{} {} {}", line, title, line);
        }
        println!();
    }

    pub fn separator(&self) {
        let width = self.width().min(self.scale.heading_width().max(40));
        let line = "─".repeat(width);
        if self.supports_color() {
            println!("{}", line.color(self.palette.dim));
        } else {
            println!("{}", line);
        }
    }

    /// Card-style display for labeled information
    pub fn card(&self, title: &str, content: Vec<(&str, String)>) {
        let card_width = self
            .width()
            .saturating_sub(4)
            .clamp(50, 80);

        println!("╭{}╮", "─".repeat(card_width - 2));
        let title_width = title.width();
        let title_spaces = card_width.saturating_sub(title_width + 4);
        if self.supports_color() {
            let accent = self.palette.accent;
            println!("│ {} {}│", title.color(accent).bold(), " ".repeat(title_spaces));
        } else {
            println!("│ {} {}│", title, " ".repeat(title_spaces));
        }
        println!("├{}┤", "─".repeat(card_width - 2));

        for (label, value) in content {
            let label_plain = strip_ansi_codes(label);
            let value_plain = strip_ansi_codes(&value);

            let content_width = label_plain.width() + value_plain.width() + 4;
            let spaces = if content_width < card_width - 1 {
                card_width - content_width - 1
            } else {
                1
            };

            if self.supports_color() {
                println!(
                    "│ {}: {}{}│",
                    label.color(self.palette.dim),
                    value,
                    " ".repeat(spaces)
                );
            } else {
                println!("│ {}: {}{}│", label, value, " ".repeat(spaces));
            }
        }

        println!("╰{}╯", "─".repeat(card_width - 2));
        println!();
    }

    pub fn width(&self) -> usize {
        self.term.size().1 as usize
    }

    pub fn supports_color(&self) -> bool {
        self.term.features().colors_supported()
    }
}

/// Spinner shown while a long-running backend call is in flight
pub fn create_spinner(message: &str) -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    spinner
}
