//! Output management and formatting.

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use stencil_core::domain::ProgressEvent;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    verbose: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = args.output_format.unwrap_or(config.output.format);
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            verbose: args.verbose > 0,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode and JSON output.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("✓ {msg}")
        } else {
            format!("{} {}", "✓".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`.  *Not* suppressed in quiet mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("✗ {msg}")
        } else {
            format!("{} {}", "✗".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("⚠ {msg}")
        } else {
            format!("{} {}", "⚠".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("ℹ {msg}")
        } else {
            format!("{} {}", "ℹ".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// One JSON document on its own line. Printed even in quiet mode.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let line = serde_json::to_string(value).map_err(io::Error::other)?;
        self.term.write_line(&line)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Human-oriented lines are dropped in quiet mode and under JSON output.
    fn is_silent(&self) -> bool {
        self.quiet || self.resolved_format == OutputFormat::Json
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    /// Renderer for the events of one scaffold run.
    pub fn progress(&self) -> ProgressView<'_> {
        ProgressView {
            output: self,
            spinner: None,
        }
    }
}

// ── Progress rendering ───────────────────────────────────────────────────────

/// Renders scaffold progress events in the resolved format.
///
/// Human output shows a spinner for the running phase and turns it into a
/// check mark once the next event reports the phase's outcome.
pub struct ProgressView<'a> {
    output: &'a OutputManager,
    spinner: Option<ProgressBar>,
}

impl ProgressView<'_> {
    pub fn on_event(&mut self, event: &ProgressEvent) -> io::Result<()> {
        match self.output.format() {
            OutputFormat::Json => self.output.json(event),
            OutputFormat::Human if !self.output.is_quiet() => self.render_human(event),
            _ => self.render_plain(event),
        }
    }

    /// Stop the spinner after a failed run, leaving its line visible.
    pub fn abandon(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.abandon();
        }
    }

    fn render_human(&mut self, event: &ProgressEvent) -> io::Result<()> {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        if let Some(outcome) = &event.last_operation_message {
            self.output.success(outcome)?;
        }

        if event.is_terminal() {
            return self.render_summary(event);
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(event.status_message.clone());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
        Ok(())
    }

    fn render_plain(&mut self, event: &ProgressEvent) -> io::Result<()> {
        if let Some(outcome) = &event.last_operation_message {
            self.output.success(outcome)?;
        }
        if event.is_terminal() {
            return self.render_summary(event);
        }
        self.output.info(&event.status_message)
    }

    fn render_summary(&self, event: &ProgressEvent) -> io::Result<()> {
        let files = event.generated_file_paths.as_deref().unwrap_or_default();
        self.output.header(&format!(
            "{} ({} files generated)",
            event.status_message,
            files.len()
        ))?;
        if self.output.is_verbose() {
            for file in files {
                self.output.print(&format!("  {}", file.display()))?;
            }
        }
        for advisory in &event.output_messages {
            self.output.warning(advisory)?;
        }
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
