use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::presentation::formatters::{format_cost, format_duration, one_line};
use crate::presentation::renderers::CsvTable;

// --------------------------------------------------------
// Session list
// --------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SessionListViewModel {
    pub sessions: Vec<SessionSummaryRow>,
    /// Matching sessions before `limit` was applied
    pub total_count: usize,
    pub applied_filters: FilterSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummaryRow {
    pub session_id: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_seconds: f64,
    pub status: String,
    pub num_messages: usize,
    pub num_llm_calls: usize,
    pub num_function_calls: usize,
    pub total_cost: f64,
    pub total_tokens: i64,
    pub participants: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FilterSummary {
    pub status: Option<String>,
    pub limit: usize,
}

impl fmt::Display for SessionListViewModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.sessions.is_empty() {
            writeln!(f, "No sessions found.")?;
            if let Some(status) = &self.applied_filters.status {
                writeln!(f, "Status filter: {}", status)?;
            }
            return Ok(());
        }

        for s in &self.sessions {
            writeln!(
                f,
                "{}  {}  {:<9}  {:>8}  msgs={} llm={} fn={}  {}  {} tokens",
                s.session_id,
                s.start_time,
                s.status,
                format_duration(s.duration_seconds),
                s.num_messages,
                s.num_llm_calls,
                s.num_function_calls,
                format_cost(s.total_cost),
                s.total_tokens,
            )?;
        }

        if self.total_count > self.sessions.len() {
            writeln!(f)?;
            writeln!(
                f,
                "Showing {} of {} sessions",
                self.sessions.len(),
                self.total_count
            )?;
        }
        Ok(())
    }
}

impl CsvTable for SessionListViewModel {
    fn csv_header(&self) -> Vec<&'static str> {
        vec![
            "session_id",
            "start_time",
            "end_time",
            "duration_seconds",
            "status",
            "num_messages",
            "num_llm_calls",
            "num_function_calls",
            "total_cost",
            "total_tokens",
            "participants",
        ]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.sessions
            .iter()
            .map(|s| {
                vec![
                    s.session_id.clone(),
                    s.start_time.clone(),
                    s.end_time.clone(),
                    s.duration_seconds.to_string(),
                    s.status.clone(),
                    s.num_messages.to_string(),
                    s.num_llm_calls.to_string(),
                    s.num_function_calls.to_string(),
                    s.total_cost.to_string(),
                    s.total_tokens.to_string(),
                    s.participants.join(";"),
                ]
            })
            .collect()
    }
}

// --------------------------------------------------------
// Session detail
// --------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SessionDetailViewModel {
    pub session: SessionSummaryRow,
    pub event_counts: BTreeMap<String, usize>,
    pub functions: Vec<String>,
    pub models: Vec<String>,
    pub timeline: Vec<TimelineRow>,
}

#[derive(Debug, Serialize)]
pub struct TimelineRow {
    pub timestamp: String,
    pub event_type: String,
    pub source_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<String>,
    pub summary: String,
}

impl fmt::Display for SessionDetailViewModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = &self.session;
        writeln!(f, "Session:      {}", s.session_id)?;
        writeln!(f, "Status:       {}", s.status)?;
        writeln!(f, "Started:      {}", s.start_time)?;
        writeln!(f, "Ended:        {}", s.end_time)?;
        writeln!(f, "Duration:     {}", format_duration(s.duration_seconds))?;
        writeln!(f, "Cost:         {}", format_cost(s.total_cost))?;
        writeln!(f, "Tokens:       {}", s.total_tokens)?;
        writeln!(f, "Participants: {}", s.participants.join(", "))?;
        if !self.models.is_empty() {
            writeln!(f, "Models:       {}", self.models.join(", "))?;
        }
        if !self.functions.is_empty() {
            writeln!(f, "Functions:    {}", self.functions.join(", "))?;
        }

        writeln!(f)?;
        writeln!(f, "Events:")?;
        for (event_type, count) in &self.event_counts {
            writeln!(f, "  {:<24} {}", event_type, count)?;
        }

        writeln!(f)?;
        writeln!(f, "Timeline:")?;
        for row in &self.timeline {
            writeln!(
                f,
                "  {}  {:<22}  {:<16}  {}",
                row.timestamp,
                row.event_type,
                row.source_name,
                one_line(&row.summary, 80)
            )?;
        }
        Ok(())
    }
}

impl CsvTable for SessionDetailViewModel {
    fn csv_header(&self) -> Vec<&'static str> {
        vec!["timestamp", "event_type", "source_name", "invocation_id", "summary"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.timeline
            .iter()
            .map(|row| {
                vec![
                    row.timestamp.clone(),
                    row.event_type.clone(),
                    row.source_name.clone(),
                    row.invocation_id.clone().unwrap_or_default(),
                    row.summary.clone(),
                ]
            })
            .collect()
    }
}

// --------------------------------------------------------
// Conversation flow
// --------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ConversationViewModel {
    pub session_id: String,
    pub messages: Vec<MessageRow>,
}

#[derive(Debug, Serialize)]
pub struct MessageRow {
    pub timestamp: Option<String>,
    pub sender: String,
    pub receiver: String,
    pub role: String,
    pub kind: String,
    pub content: String,
    pub full_content: String,
}

impl fmt::Display for ConversationViewModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.messages.is_empty() {
            return writeln!(f, "No conversation messages found in this session.");
        }

        for m in &self.messages {
            let time = m.timestamp.as_deref().unwrap_or("--:--:--");
            let marker = if m.kind == "function" { "ƒ" } else { "›" };
            writeln!(
                f,
                "[{}] {} {} → {} ({})",
                time, marker, m.sender, m.receiver, m.role
            )?;
            for line in m.content.lines() {
                writeln!(f, "    {}", line)?;
            }
        }
        Ok(())
    }
}

impl CsvTable for ConversationViewModel {
    fn csv_header(&self) -> Vec<&'static str> {
        vec!["timestamp", "sender", "receiver", "role", "kind", "content"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.messages
            .iter()
            .map(|m| {
                vec![
                    m.timestamp.clone().unwrap_or_default(),
                    m.sender.clone(),
                    m.receiver.clone(),
                    m.role.clone(),
                    m.kind.clone(),
                    m.full_content.clone(),
                ]
            })
            .collect()
    }
}
