//! Terminal output for CLI commands
//!
//! Human output goes to stdout with a status glyph; warnings go to stderr.
//! JSON output prints one document per command result and drops the
//! informational detail lines.

use serde_json::{json, Value};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &Value);
}

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter;

impl HumanFormatter {
    fn success_line(message: &str) -> String {
        format!("\u{2713} {message}")
    }

    fn warn_line(message: &str) -> String {
        format!("\u{26a0} Warning: {message}")
    }
}

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("{}", Self::success_line(message));
    }
    fn warn(&self, message: &str) {
        eprintln!("{}", Self::warn_line(message));
    }
    fn info(&self, message: &str) {
        println!("  {message}");
    }
    fn print_json(&self, _value: &Value) {}
}

/// JSON output formatter
pub struct JsonFormatter;

impl JsonFormatter {
    fn success_doc(message: &str) -> Value {
        json!({"success": true, "message": message})
    }

    fn warn_doc(message: &str) -> Value {
        json!({"level": "warning", "message": message})
    }
}

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!("{}", Self::success_doc(message));
    }
    fn warn(&self, message: &str) {
        eprintln!("{}", Self::warn_doc(message));
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &Value) {
        println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
    }
}

pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter)
    }
}
