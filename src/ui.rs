// UI layer: terminal presentation for the CLI. Results are printed to
// stdout as indented JSON (or raw lines) so they can be piped into other
// tools; spinners, prompts and logs stay on stderr.

use crate::normalize::Output;
use crate::Result;
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// Render a normalized result the way `print_output` writes it. `None`
/// renders as an empty string.
pub fn render_output(output: &Output) -> Result<String> {
    let text = match output {
        Output::None => String::new(),
        Output::Lines(lines) => lines.join("\n"),
        Output::Dict(map) => to_pretty_json(map)?,
        Output::List(items) => to_pretty_json(items)?,
    };
    Ok(text)
}

/// JSON with four-space indentation.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn print_output(output: &Output) -> Result<()> {
    let text = render_output(output)?;
    if text.is_empty() {
        return Ok(());
    }
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}

/// Run `f` while a spinner with `message` ticks on stderr. The spinner is
/// hidden when stderr is not a terminal.
pub fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = f();
    spinner.finish_and_clear();
    result
}

/// One-line error report. The `error:` prefix is coloured when `styled`.
pub fn error_line(message: &str, styled: bool) -> String {
    if styled {
        format!("{} {message}", "error:".red().bold())
    } else {
        format!("error: {message}")
    }
}

/// Report a failure on stderr, with colour only when stderr is a terminal.
pub fn print_error(message: &str) {
    let stderr = std::io::stderr();
    let line = error_line(message, stderr.is_tty());
    let _ = writeln!(stderr.lock(), "{line}");
}

pub fn stdin_is_tty() -> bool {
    std::io::stdin().is_tty()
}

/// Ask for the password of `username` without echoing it.
pub fn prompt_password(username: &str) -> Result<String> {
    let password = Password::new()
        .with_prompt(format!("Apollo password for {username}"))
        .interact()?;
    Ok(password)
}
