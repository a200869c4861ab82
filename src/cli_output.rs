// Mode-aware CLI output: colours for terminals, plain text for pipes, JSON for tools
use crate::error::DashError;
use colored::Colorize;
use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;
use std::io::{self, IsTerminal};
use std::str::FromStr;

/// Output mode for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with colors
    Human,
    /// Machine-readable JSON output
    Json,
    /// Plain text without colors (for pipes/logs)
    Plain,
}

impl OutputMode {
    /// Auto-detect output mode based on environment
    pub fn auto() -> Self {
        if std::env::var("SCENARIO_DASH_JSON").is_ok() {
            Self::Json
        } else if !io::stdout().is_terminal() {
            Self::Plain
        } else {
            Self::Human
        }
    }
}

impl FromStr for OutputMode {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            _ => Err(DashError::UnknownFormat(s.to_string())),
        }
    }
}

/// CLI output writer with mode awareness
pub struct OutputWriter {
    mode: OutputMode,
}

impl OutputWriter {
    pub fn new(mode: OutputMode) -> Self {
        if mode != OutputMode::Human {
            colored::control::set_override(false);
        }
        Self { mode }
    }

    /// Section header text, empty in JSON mode
    pub fn section_text(&self, title: &str) -> String {
        let rule_len = title.chars().count();
        match self.mode {
            OutputMode::Human => format!(
                "\n{}\n{}\n",
                title.cyan().bold(),
                "═".repeat(rule_len).cyan()
            ),
            OutputMode::Plain => format!("\n{}\n{}\n", title, "=".repeat(rule_len)),
            OutputMode::Json => String::new(),
        }
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        print!("{}", self.section_text(title));
    }

    pub fn warning_text(&self, message: &str) -> String {
        match self.mode {
            OutputMode::Human => format!("  {} {}\n", "⚠".yellow(), message),
            OutputMode::Plain => format!("  [WARN] {}\n", message),
            OutputMode::Json => String::new(),
        }
    }

    pub fn caption_text(&self, message: &str) -> String {
        match self.mode {
            OutputMode::Human => format!("  {}\n", message.dimmed()),
            OutputMode::Plain => format!("  {}\n", message),
            OutputMode::Json => String::new(),
        }
    }

    /// Print pre-rendered text (charts, cards)
    pub fn block(&self, text: &str) {
        if self.mode != OutputMode::Json {
            print!("{}", text);
        }
    }

    /// Print a key-value table
    pub fn key_values(&self, rows: &[(&str, String)]) {
        let max_key_len = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        match self.mode {
            OutputMode::Human => {
                for (key, value) in rows {
                    let key = format!("{:width$}", key, width = max_key_len);
                    println!("  {} │ {}", key.yellow(), value);
                }
            }
            OutputMode::Plain => {
                for (key, value) in rows {
                    println!("  {:width$} : {}", key, value, width = max_key_len);
                }
            }
            OutputMode::Json => {}
        }
    }

    /// Bordered data table text, empty in JSON mode
    pub fn table_text(&self, header: &[&str], rows: Vec<Vec<String>>) -> String {
        if self.mode == OutputMode::Json {
            return String::new();
        }
        format!("{}\n", build_table(self.mode, header, rows))
    }

    /// Print a bordered data table
    pub fn table(&self, header: &[&str], rows: Vec<Vec<String>>) {
        print!("{}", self.table_text(header, rows));
    }

    /// Emit a structured document (JSON mode only)
    pub fn emit_json<T: Serialize>(&self, value: &T) -> serde_json::Result<()> {
        if self.mode == OutputMode::Json {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        Ok(())
    }

    pub fn is_json(&self) -> bool {
        matches!(self.mode, OutputMode::Json)
    }
}

/// UTF-8 borders for terminals, ASCII borders otherwise
pub fn build_table(mode: OutputMode, header: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut table = Table::new();
    let preset = if mode == OutputMode::Human {
        UTF8_FULL
    } else {
        ASCII_FULL
    };
    table
        .load_preset(preset)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());

    for row in rows {
        table.add_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_mode() {
        let mode = OutputMode::auto();
        assert!(matches!(
            mode,
            OutputMode::Plain | OutputMode::Human | OutputMode::Json
        ));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("json".parse::<OutputMode>().unwrap(), OutputMode::Json);
        assert_eq!("PLAIN".parse::<OutputMode>().unwrap(), OutputMode::Plain);
        assert_eq!("text".parse::<OutputMode>().unwrap(), OutputMode::Human);
        assert!("xml".parse::<OutputMode>().is_err());
    }

    #[test]
    fn test_build_table() {
        let table = build_table(
            OutputMode::Plain,
            &["scenario", "value"],
            vec![vec!["Coles Based".to_string(), "A$1.00".to_string()]],
        );
        let rendered = table.to_string();
        assert!(rendered.contains("scenario"));
        assert!(rendered.contains("Coles Based"));
    }

    #[test]
    fn test_plain_text_helpers() {
        let out = OutputWriter::new(OutputMode::Plain);
        assert_eq!(out.section_text("Coles"), "\nColes\n=====\n");
        assert_eq!(out.warning_text("careful"), "  [WARN] careful\n");
        assert_eq!(out.caption_text("total"), "  total\n");

        let json = OutputWriter::new(OutputMode::Json);
        assert!(json.section_text("Coles").is_empty());
        assert!(json.table_text(&["a"], vec![vec!["b".to_string()]]).is_empty());
    }
}
