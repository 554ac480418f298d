//! Terminal output helpers.

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use tabled::{settings::Style, Table, Tabled};

use crate::error::Result;
use crate::OutputFormat;

pub fn info(msg: &str) {
    eprintln!("{} {}", "ℹ".blue(), msg);
}

pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

pub fn warn(msg: &str) {
    eprintln!("{} {}", "⚠".yellow(), msg);
}

/// Print a list of rows as a table or a JSON array.
pub fn print_data<T: Serialize + Tabled>(items: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("  {}", "(none)".dimmed());
            } else {
                println!("{}", Table::new(items).with(Style::rounded()));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
    }
    Ok(())
}

/// Print an arbitrary JSON payload. Tables have no shape for it, so both
/// formats print JSON; table mode prints strings bare.
pub fn print_value(value: &Value, format: OutputFormat) -> Result<()> {
    match (format, value) {
        (OutputFormat::Table, Value::String(s)) => println!("{}", s),
        _ => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// Print a yes/no answer.
pub fn print_flag(label: &str, flag: bool, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let answer = if flag { "yes".green() } else { "no".red() };
            println!("{}: {}", label, answer);
        }
        OutputFormat::Json => println!("{}", serde_json::json!({ label: flag })),
    }
    Ok(())
}
