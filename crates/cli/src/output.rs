//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use clap::ValueEnum;
use owo_colors::OwoColorize;
use photobeam_core::Error;
use serde::Serialize;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored human-readable text
    #[default]
    Text,
    /// One JSON document on stdout
    Json,
}

impl OutputFormat {
    /// Whether JSON output was requested
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned key/value line
    pub fn field(key: &str, value: impl std::fmt::Display) {
        println!("  {:<16} {}", format!("{}:", key).dimmed(), value);
    }

    /// Print a share link on its own line so it can be copied
    pub fn link(url: &str) {
        println!();
        println!("  {}", url.cyan().bold().underline());
        println!();
    }

    /// Print an error with its code and suggestion to stderr
    pub fn report(error: &Error) {
        eprintln!("{} {}", format!("Error [{}]:", error.code).red().bold(), error.message);
        if let Some(context) = &error.context {
            eprintln!("  {} {}", "Context:".dimmed(), context);
        }
        if let Some(suggestion) = &error.suggestion {
            eprintln!("  {} {}", "Suggestion:".yellow(), suggestion);
        }
    }
}

/// Render a value as pretty JSON
pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Size change as a signed percentage, e.g. `-12.5%`
pub fn format_size_change(before: u64, after: u64) -> String {
    if before == 0 {
        return "n/a".to_string();
    }
    let change = (after as f64 - before as f64) / before as f64 * 100.0;
    format!("{:+.1}%", change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        assert_eq!(format_duration(Duration::from_secs_f32(5.5)), "5.5s");
    }

    #[test]
    fn test_format_duration_mins() {
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_format_size_change() {
        assert_eq!(format_size_change(1000, 800), "-20.0%");
        assert_eq!(format_size_change(1000, 1250), "+25.0%");
        assert_eq!(format_size_change(0, 10), "n/a");
    }

    #[test]
    fn test_output_format_values() {
        assert_eq!(OutputFormat::from_str("json", true).unwrap(), OutputFormat::Json);
        assert!(OutputFormat::default() == OutputFormat::Text);
        assert!(OutputFormat::Json.is_json());
    }

    #[test]
    fn test_to_json() {
        #[derive(Serialize)]
        struct Row {
            link: &'static str,
        }
        let json = to_json(&Row { link: "https://host/abc123" }).unwrap();
        assert!(json.contains(r#""link": "https://host/abc123""#));
    }
}
