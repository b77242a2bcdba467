//! Output formatting utilities.

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
    /// Quiet (minimal output).
    Quiet,
}

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Banner framing the backend console output.
pub const CONSOLE_BANNER: &str = "================== KEYCLOAK STDOUT ==================";

/// Prints captured backend console output to stderr.
///
/// Printed for every format so JSON on stdout stays parseable.
pub fn console_dump(console_output: &str) {
    eprintln!("{}", render_console(console_output));
}

/// Frames backend console output with the banner.
#[must_use]
pub fn render_console(console_output: &str) -> String {
    let body = console_output.trim_end();
    if body.is_empty() {
        format!("{CONSOLE_BANNER}\n(no console output captured)")
    } else {
        format!("{CONSOLE_BANNER}\n{body}")
    }
}

/// Outputs rows in the specified format.
pub fn output<T: Tabled + serde::Serialize>(
    data: &[T],
    format: OutputFormat,
) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                info("No results found.");
            } else {
                println!("{}", render_table(data));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

/// Outputs a single item as pretty JSON unless quiet.
pub fn output_single<T: serde::Serialize>(item: &T, format: OutputFormat) -> crate::CliResult<()> {
    if format != OutputFormat::Quiet {
        let json = serde_json::to_string_pretty(item)?;
        println!("{json}");
    }
    Ok(())
}

/// Renders rows as a rounded table.
#[must_use]
pub fn render_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).with(Style::rounded()).to_string()
}
