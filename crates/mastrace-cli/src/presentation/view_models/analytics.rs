use serde::Serialize;
use std::fmt;

use crate::presentation::formatters::format_cost;
use crate::presentation::renderers::CsvTable;

#[derive(Debug, Serialize)]
pub struct AnalyticsViewModel {
    pub total_sessions: usize,
    pub total_llm_calls: usize,
    pub total_cost: f64,
    pub top_sessions: Vec<SessionCostRow>,
    pub daily_cost: Vec<DailyCost>,
    pub tokens_by_model: Vec<ModelTokens>,
    pub hourly_tokens: Vec<HourlyTokens>,
}

#[derive(Debug, Serialize)]
pub struct SessionCostRow {
    pub session_id: String,
    pub cost: f64,
}

#[derive(Debug, Serialize)]
pub struct DailyCost {
    pub date: String,
    pub cost: f64,
}

#[derive(Debug, Serialize)]
pub struct ModelTokens {
    pub model: String,
    pub tokens: i64,
}

#[derive(Debug, Serialize)]
pub struct HourlyTokens {
    pub hour: u32,
    pub tokens: i64,
}

impl fmt::Display for AnalyticsViewModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Sessions:   {}", self.total_sessions)?;
        writeln!(f, "LLM calls:  {}", self.total_llm_calls)?;
        writeln!(f, "Total cost: {}", format_cost(self.total_cost))?;

        if !self.top_sessions.is_empty() {
            writeln!(f)?;
            writeln!(f, "Cost by session:")?;
            for row in &self.top_sessions {
                writeln!(f, "  {:<40} {}", row.session_id, format_cost(row.cost))?;
            }
        }

        if !self.daily_cost.is_empty() {
            writeln!(f)?;
            writeln!(f, "Daily cost:")?;
            for row in &self.daily_cost {
                writeln!(f, "  {}  {}", row.date, format_cost(row.cost))?;
            }
        }

        if !self.tokens_by_model.is_empty() {
            writeln!(f)?;
            writeln!(f, "Tokens by model:")?;
            for row in &self.tokens_by_model {
                writeln!(f, "  {:<24} {}", row.model, row.tokens)?;
            }
        }

        if !self.hourly_tokens.is_empty() {
            writeln!(f)?;
            writeln!(f, "Tokens by hour (UTC):")?;
            for row in &self.hourly_tokens {
                writeln!(f, "  {:02}:00  {}", row.hour, row.tokens)?;
            }
        }
        Ok(())
    }
}

impl CsvTable for AnalyticsViewModel {
    fn csv_header(&self) -> Vec<&'static str> {
        vec!["metric", "key", "value"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        let row = |metric: &str, key: String, value: String| vec![metric.to_string(), key, value];

        let mut rows = vec![
            row("total_sessions", String::new(), self.total_sessions.to_string()),
            row("total_llm_calls", String::new(), self.total_llm_calls.to_string()),
            row("total_cost", String::new(), self.total_cost.to_string()),
        ];
        rows.extend(
            self.top_sessions
                .iter()
                .map(|r| row("session_cost", r.session_id.clone(), r.cost.to_string())),
        );
        rows.extend(
            self.daily_cost
                .iter()
                .map(|r| row("daily_cost", r.date.clone(), r.cost.to_string())),
        );
        rows.extend(
            self.tokens_by_model
                .iter()
                .map(|r| row("model_tokens", r.model.clone(), r.tokens.to_string())),
        );
        rows.extend(
            self.hourly_tokens
                .iter()
                .map(|r| row("hourly_tokens", r.hour.to_string(), r.tokens.to_string())),
        );
        rows
    }
}
