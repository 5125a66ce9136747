//! Terminal output for CLI handlers.
//!
//! Human mode prints indented, colored lines to stdout. JSON mode prints
//! one `{"type": ..., "payload": ...}` object per line instead, and
//! commands with a natural result (a search outcome, an alert list) print
//! that value once through [`json_output`]. Quiet mode keeps warnings and
//! errors only. Errors always go to stderr.

use std::fmt::Display;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Flags that shape every line a command prints.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static CONFIG: RwLock<OutputConfig> = parking_lot::const_rwlock(OutputConfig::new(false, false));

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Install the global flags. Called once before any handler runs.
pub fn configure(config: OutputConfig) {
    *CONFIG.write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    CONFIG.read().json
}

/// Emit either a JSON event or the human rendering.
///
/// `essential` lines survive quiet mode.
fn emit(kind: &str, payload: Value, essential: bool, human: impl FnOnce()) {
    let config = *CONFIG.read();
    if config.json {
        println!("{}", json!({ "type": kind, "payload": payload }));
    } else if essential || !config.quiet {
        human();
    }
}

/// Startup banner with the binary version.
pub fn header(version: &str) {
    emit("header", json!({ "app": "hangar", "version": version }), false, || {
        println!("{} {}", "hangar".bold(), version.dimmed());
        println!();
    });
}

/// A `label value` row.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit("field", json!({ "label": label, "value": value }), false, || {
        println!("  {:<14} {}", label.dimmed(), value);
    });
}

pub fn success(message: &str) {
    emit("success", json!({ "message": message }), false, || {
        println!("  {} {}", "✓".green(), message);
    });
}

pub fn warning(message: &str) {
    emit("warning", json!({ "message": message }), true, || {
        println!("  {} {}", "⚠".yellow(), message);
    });
}

pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

pub fn section(title: &str) {
    emit("section", json!({ "title": title }), false, || {
        println!();
        println!("{}", title.bold());
    });
}

pub fn note(message: &str) {
    emit("note", json!({ "message": message }), false, || {
        println!("  {}", message.dimmed());
    });
}

pub fn hint(message: &str) {
    emit("hint", json!({ "message": message }), false, || {
        println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed());
    });
}

/// Render rows as a rounded table, indented like every other line.
pub fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    lines(&table.to_string());
}

/// Print pre-rendered text, indenting each line.
pub fn lines(content: &str) {
    emit("lines", json!({ "content": content }), false, || {
        for line in content.lines() {
            println!("  {line}");
        }
    });
}

/// Print a command's result value as a single JSON document.
pub fn json_output(value: Value) {
    println!("{value}");
}

/// A running spinner. Hidden in JSON and quiet modes.
pub fn spinner(message: &str) -> ProgressBar {
    let config = *CONFIG.read();
    let pb = if config.json || config.quiet {
        ProgressBar::hidden()
    } else {
        let style = ProgressStyle::default_spinner()
            .tick_strings(SPINNER_FRAMES)
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let pb = ProgressBar::new_spinner().with_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    };
    pb.set_message(message.to_string());
    pb
}

pub fn spinner_success(pb: &ProgressBar, message: &str) {
    finish(pb, "spinner_success", message, false, format!("{} {message}", "✓".green()));
}

pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    finish(pb, "spinner_fail", message, true, format!("{} {message}", "×".red()));
}

fn finish(pb: &ProgressBar, kind: &str, message: &str, essential: bool, rendered: String) {
    let config = *CONFIG.read();
    if config.json {
        println!("{}", json!({ "type": kind, "payload": { "message": message } }));
        pb.finish_and_clear();
    } else if config.quiet && !essential {
        pb.finish_and_clear();
    } else {
        pb.finish_with_message(rendered);
    }
}

/// A USD amount with two decimals.
#[must_use]
pub fn money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

/// Green in human mode, plain in JSON mode.
pub fn positive(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.to_string().green().to_string()
    }
}

/// Cyan in human mode, plain in JSON mode.
pub fn highlight(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.to_string().cyan().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_rounds_to_cents() {
        assert_eq!(money(dec!(60)), "$60.00");
        assert_eq!(money(dec!(45.505)), "$45.50");
        assert_eq!(money(dec!(0.1)), "$0.10");
    }
}
