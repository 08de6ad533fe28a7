//! Process execution utilities
//!
//! Used to hand a link to the platform's URL handler (the "open" action).

use crate::error::{Error, Result};
use std::process::{Command, Output, Stdio};

/// Result of a command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
    /// Exit code of the command
    pub exit_code: i32,
    /// Standard error
    pub stderr: String,
}

impl CommandResult {
    /// Create from std::process::Output
    pub fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Run a command and capture output
pub fn run_command(program: &str, args: &[&str]) -> Result<CommandResult> {
    let output = Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| Error::process(format!("Failed to execute {}: {}", program, e)))?;

    Ok(CommandResult::from_output(output))
}

/// Characters that are never valid unescaped in a link and that a shell would
/// interpret.
const UNSAFE_URL_CHARS: &[char] = &['"', '\'', '`', '^', '|', '<', '>', '\\', '{', '}'];

/// Program followed by leading arguments that open a URL on this platform.
///
/// None of them go through a command interpreter.
fn url_opener() -> Vec<&'static str> {
    if cfg!(target_os = "macos") {
        vec!["open"]
    } else if cfg!(windows) {
        vec!["rundll32", "url.dll,FileProtocolHandler"]
    } else {
        vec!["xdg-open"]
    }
}

/// Reject anything but a plain http(s) link.
fn check_openable(url: &str) -> Result<()> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::invalid_input(format!("Refusing to open non-web link: {}", url)));
    }
    if url.chars().any(|c| c.is_whitespace() || c.is_control() || UNSAFE_URL_CHARS.contains(&c)) {
        return Err(Error::invalid_input(format!(
            "Refusing to open link with unsafe characters: {}",
            url.escape_debug()
        )));
    }
    Ok(())
}

/// Open a link with the system's default handler
pub fn open_url(url: &str) -> Result<()> {
    check_openable(url)?;

    let mut args: Vec<&str> = url_opener();
    let program = args.remove(0);
    if which::which(program).is_err() {
        return Err(Error::command_not_found(program));
    }
    args.push(url);

    let result = run_command(program, &args)?;
    if result.success {
        Ok(())
    } else {
        Err(Error::process(format!(
            "{} exited with code {}: {}",
            program,
            result.exit_code,
            result.stderr.trim()
        )))
    }
}
