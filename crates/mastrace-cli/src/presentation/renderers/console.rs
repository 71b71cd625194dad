use anyhow::Result;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt::Display;
use std::io::Write;

use super::traits::{CsvTable, Renderer};
use crate::presentation::view_models::{CommandResultViewModel, StatusLevel};
use crate::types::OutputFormat;

pub struct ConsoleRenderer {
    format: OutputFormat,
    color: bool,
}

impl ConsoleRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: format == OutputFormat::Plain && std::io::stdout().is_terminal(),
        }
    }

    fn render_csv<T: CsvTable>(&self, content: &T) -> Result<()> {
        let stdout = std::io::stdout();
        let mut writer = csv::Writer::from_writer(stdout.lock());
        writer.write_record(content.csv_header())?;
        for row in content.csv_rows() {
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn render_plain<T: Display>(&self, result: &CommandResultViewModel<T>) -> Result<()>
    where
        T: Serialize,
    {
        let mut out = std::io::stdout().lock();

        if let Some(badge) = &result.badge {
            if self.color {
                let label = match badge.level {
                    StatusLevel::Success => badge.label.green().bold().to_string(),
                    StatusLevel::Info => badge.label.bold().to_string(),
                    StatusLevel::Warning => badge.label.yellow().bold().to_string(),
                };
                writeln!(out, "{} {}", badge.icon(), label)?;
            } else {
                writeln!(out, "{} {}", badge.icon(), badge.label)?;
            }
            writeln!(out)?;
        }

        write!(out, "{}", result.content)?;

        if !result.suggestions.is_empty() {
            let heading = "💡 Tips:";
            if self.color {
                writeln!(out, "\n{}", heading.yellow().bold())?;
            } else {
                writeln!(out, "\n{}", heading)?;
            }
            for tip in &result.suggestions {
                write!(out, "  • {}", tip.description)?;
                if let Some(cmd) = &tip.command {
                    if self.color {
                        write!(out, ": {}", cmd.cyan())?;
                    } else {
                        write!(out, ": {}", cmd)?;
                    }
                }
                writeln!(out)?;
            }
        }

        Ok(())
    }
}

impl Renderer for ConsoleRenderer {
    fn render<T>(&self, result: CommandResultViewModel<T>) -> Result<()>
    where
        T: Serialize + Display + CsvTable,
    {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&result)?);
                Ok(())
            }
            OutputFormat::Csv => self.render_csv(&result.content),
            OutputFormat::Plain => self.render_plain(&result),
        }
    }
}
